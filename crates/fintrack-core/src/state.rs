//! In-memory collections owned by the application root.

use fintrack_domain::{Budget, Goal, Identifiable, Transaction};

use crate::CoreError;

/// The three record collections. Engines only borrow them; every mutation
/// goes through the methods below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinanceState {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
}

impl FinanceState {
    pub fn new(transactions: Vec<Transaction>, budgets: Vec<Budget>, goals: Vec<Goal>) -> Self {
        Self {
            transactions,
            budgets,
            goals,
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), CoreError> {
        validate_id(&transaction.id)?;
        validate_amount("transaction amount", transaction.amount)?;
        self.transactions.push(transaction);
        Ok(())
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction, CoreError> {
        remove_by_id(&mut self.transactions, id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))
    }

    pub fn add_budget(&mut self, budget: Budget) -> Result<(), CoreError> {
        validate_budget(&budget)?;
        self.budgets.push(budget);
        Ok(())
    }

    /// Replaces the stored budget that shares `budget.id`.
    pub fn update_budget(&mut self, budget: Budget) -> Result<(), CoreError> {
        validate_budget(&budget)?;
        let slot = self
            .budgets
            .iter_mut()
            .find(|existing| existing.id == budget.id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget.id.clone()))?;
        *slot = budget;
        Ok(())
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<Budget, CoreError> {
        remove_by_id(&mut self.budgets, id).ok_or_else(|| CoreError::BudgetNotFound(id.to_string()))
    }

    pub fn add_goal(&mut self, goal: Goal) -> Result<(), CoreError> {
        validate_goal(&goal)?;
        self.goals.push(goal);
        Ok(())
    }

    /// Replaces the stored goal that shares `goal.id`.
    pub fn update_goal(&mut self, goal: Goal) -> Result<(), CoreError> {
        validate_goal(&goal)?;
        let slot = self
            .goals
            .iter_mut()
            .find(|existing| existing.id == goal.id)
            .ok_or_else(|| CoreError::GoalNotFound(goal.id.clone()))?;
        *slot = goal;
        Ok(())
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<Goal, CoreError> {
        remove_by_id(&mut self.goals, id).ok_or_else(|| CoreError::GoalNotFound(id.to_string()))
    }

    pub fn budget(&self, id: &str) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }
}

fn remove_by_id<T: Identifiable>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

fn validate_id(id: &str) -> Result<(), CoreError> {
    if id.trim().is_empty() {
        return Err(CoreError::Validation("record id must not be empty".into()));
    }
    Ok(())
}

fn validate_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn validate_budget(budget: &Budget) -> Result<(), CoreError> {
    validate_id(&budget.id)?;
    validate_amount("budget amount", budget.amount)?;
    if budget.month > 11 {
        return Err(CoreError::Validation(format!(
            "budget month must be between 0 and 11, got {}",
            budget.month
        )));
    }
    Ok(())
}

fn validate_goal(goal: &Goal) -> Result<(), CoreError> {
    validate_id(&goal.id)?;
    if !goal.target.is_finite() || goal.target <= 0.0 {
        return Err(CoreError::Validation(format!(
            "goal target must be positive, got {}",
            goal.target
        )));
    }
    validate_amount("goal collected amount", goal.collected)?;
    validate_amount("goal monthly contribution", goal.monthly_contribution)?;
    Ok(())
}
