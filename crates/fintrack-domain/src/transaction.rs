//! Income and expense entries recorded by the user.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::period::Period;

/// A single money movement. Immutable once recorded; removed by id only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub kind: FlowKind,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
        kind: FlowKind,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount: amount.abs(),
            date: date.format("%Y-%m-%d").to_string(),
            category: category.into(),
            kind,
        }
    }

    /// Parsed transaction date, `None` when the stored text is not a date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn effective_category(&self) -> &str {
        effective_category(&self.category)
    }

    pub fn period(&self) -> Option<Period> {
        self.parsed_date().map(Period::from_date)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount.abs()
    }
}

impl Periodic for Transaction {
    fn falls_in(&self, period: Period) -> bool {
        self.parsed_date()
            .map(|date| period.contains(date))
            .unwrap_or(false)
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} [{}] {}",
            self.date,
            self.kind.as_str(),
            self.effective_category(),
            self.description
        )
    }
}
