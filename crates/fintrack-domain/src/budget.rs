//! Periodic spending and income targets per category.

use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::period::Period;

/// Target amount for one category and flow type in one calendar month.
///
/// The `(category, type, month, year)` slot is unique by convention only;
/// duplicates are tracked independently by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: FlowKind,
    pub month: u32,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Budget {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        kind: FlowKind,
        period: Period,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            amount,
            kind,
            month: period.month,
            year: period.year,
            notes: None,
            is_recurring: false,
        }
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }

    pub fn effective_category(&self) -> &str {
        effective_category(&self.category)
    }

    /// Returns `true` when this budget sits in the given slot.
    pub fn occupies_slot(&self, category: &str, kind: FlowKind, period: Period) -> bool {
        self.category == category && self.kind == kind && self.period() == period
    }

    /// Copies this budget into another period under a new id.
    pub fn carried_to(&self, id: impl Into<String>, period: Period) -> Self {
        Self {
            id: id.into(),
            month: period.month,
            year: period.year,
            ..self.clone()
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Budget {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Periodic for Budget {
    fn falls_in(&self, period: Period) -> bool {
        self.period() == period
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        let recurring = if self.is_recurring { " (recurring)" } else { "" };
        format!(
            "{} {} {}{}",
            self.period(),
            self.kind.as_str(),
            self.effective_category(),
            recurring
        )
    }
}
