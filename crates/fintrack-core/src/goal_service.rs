//! Savings goal projections.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use fintrack_domain::{Goal, Period};

/// How long the current contribution rate needs to close a goal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "status", content = "months", rename_all = "camelCase")]
pub enum Completion {
    AlreadyComplete,
    InMonths(u32),
    /// No contribution is scheduled, so the goal is never reached.
    Never,
}

impl Completion {
    pub fn months(self) -> Option<u32> {
        match self {
            Completion::AlreadyComplete => Some(0),
            Completion::InMonths(months) => Some(months),
            Completion::Never => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub goal_id: String,
    /// Signed month boundaries between today and the deadline.
    pub months_remaining: i32,
    /// Negative when over-funded.
    pub remaining_amount: f64,
    pub monthly_needed: f64,
    pub completion: Completion,
    /// `None` when the goal is never reached at the current rate.
    pub projected_date: Option<NaiveDate>,
    pub on_track: bool,
    pub progress_percent: f64,
    /// Collected amount plus contributions until the deadline.
    pub projected_amount: f64,
}

/// Chart-ready row comparing current, projected and target amounts.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalChartRow {
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub projected: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalHighlight {
    pub goal_id: String,
    pub title: String,
    pub target: f64,
    pub collected: f64,
    pub progress_percent: f64,
}

/// Collected amount as a percent of target; a non-positive target counts as met.
pub fn goal_progress_percent(goal: &Goal) -> f64 {
    if goal.target <= 0.0 {
        return 100.0;
    }
    (goal.collected / goal.target) * 100.0
}

pub struct GoalService;

impl GoalService {
    pub fn project(goal: &Goal, today: NaiveDate) -> GoalProjection {
        let months_remaining = Period::from_date(today).months_until(Period::from_date(goal.deadline));
        let remaining_amount = goal.remaining();
        let contribution = goal.monthly_contribution;

        let (monthly_needed, completion) = if remaining_amount <= 0.0 {
            (0.0, Completion::AlreadyComplete)
        } else {
            let needed = if months_remaining > 0 {
                remaining_amount / f64::from(months_remaining)
            } else {
                remaining_amount
            };
            let completion = if contribution > 0.0 {
                let months = (remaining_amount / contribution).ceil();
                if months <= f64::from(u32::MAX) {
                    Completion::InMonths(months as u32)
                } else {
                    Completion::Never
                }
            } else {
                Completion::Never
            };
            (needed, completion)
        };

        let projected_date = completion
            .months()
            .and_then(|months| today.checked_add_months(Months::new(months)));

        GoalProjection {
            goal_id: goal.id.clone(),
            months_remaining,
            remaining_amount,
            monthly_needed,
            completion,
            projected_date,
            on_track: contribution >= monthly_needed,
            progress_percent: goal_progress_percent(goal),
            projected_amount: goal.collected + f64::from(months_remaining.max(0)) * contribution,
        }
    }

    pub fn project_all(goals: &[Goal], today: NaiveDate) -> Vec<GoalProjection> {
        goals.iter().map(|goal| Self::project(goal, today)).collect()
    }

    pub fn chart_rows(goals: &[Goal], today: NaiveDate) -> Vec<GoalChartRow> {
        goals
            .iter()
            .map(|goal| GoalChartRow {
                name: goal.title.clone(),
                current: goal.collected,
                target: goal.target,
                projected: Self::project(goal, today).projected_amount,
            })
            .collect()
    }

    /// The first `limit` goals in stored order with their progress.
    pub fn highlights(goals: &[Goal], limit: usize) -> Vec<GoalHighlight> {
        goals
            .iter()
            .take(limit)
            .map(|goal| GoalHighlight {
                goal_id: goal.id.clone(),
                title: goal.title.clone(),
                target: goal.target,
                collected: goal.collected,
                progress_percent: goal_progress_percent(goal),
            })
            .collect()
    }
}
