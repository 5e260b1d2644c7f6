//! Savings goals with a deadline and an expected monthly contribution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// A savings target. Edited only by full-record replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub target: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub collected: f64,
    pub deadline: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub monthly_contribution: f64,
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        target: f64,
        collected: f64,
        deadline: NaiveDate,
        monthly_contribution: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target,
            collected,
            deadline,
            description: None,
            monthly_contribution,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn remaining(&self) -> f64 {
        self.target - self.collected
    }
}

impl Identifiable for Goal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Goal {
    fn amount(&self) -> f64 {
        self.target
    }
}

impl Displayable for Goal {
    fn display_label(&self) -> String {
        format!("{} (due {})", self.title, self.deadline.format("%Y-%m-%d"))
    }
}
