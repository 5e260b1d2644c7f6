//! Carries recurring budgets forward into the current calendar month.

use tracing::{debug, info};

use fintrack_domain::{Budget, Period};

use crate::{ids::IdGenerator, state::FinanceState, time::Clock};

pub struct RecurrenceService;

impl RecurrenceService {
    /// Budgets that must be created so every recurring `(category, type)`
    /// has a counterpart in `current`.
    ///
    /// A slot already occupied in `current`, either by an existing budget or
    /// by one planned earlier in this pass, is skipped. When several recurring
    /// sources share a slot the most recent period wins.
    pub fn pending_rollovers(
        budgets: &[Budget],
        current: Period,
        ids: &dyn IdGenerator,
    ) -> Vec<Budget> {
        let mut sources: Vec<&Budget> = budgets
            .iter()
            .filter(|budget| budget.is_recurring && budget.period() != current)
            .collect();
        // Stable sort keeps input order among sources of the same period.
        sources.sort_by(|a, b| b.period().cmp(&a.period()));

        let mut planned: Vec<Budget> = Vec::new();
        for source in sources {
            let occupied = budgets
                .iter()
                .chain(planned.iter())
                .any(|existing| existing.occupies_slot(&source.category, source.kind, current));
            if occupied {
                debug!(
                    category = %source.category,
                    kind = %source.kind,
                    "recurring budget already present for current period"
                );
                continue;
            }
            planned.push(source.carried_to(ids.next_id(), current));
        }
        planned
    }

    /// Materializes pending rollovers for the clock's current month into
    /// `state`, returning the budgets that were added.
    pub fn roll_forward(
        state: &mut FinanceState,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Vec<Budget> {
        let current = clock.current_period();
        let created = Self::pending_rollovers(&state.budgets, current, ids);
        for budget in &created {
            info!(
                id = %budget.id,
                category = %budget.category,
                period = %current,
                "materialized recurring budget"
            );
        }
        state.budgets.extend(created.iter().cloned());
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ids::SequenceIdGenerator, time::FixedClock};
    use chrono::NaiveDate;
    use fintrack_domain::FlowKind;

    fn period(month: u32, year: i32) -> Period {
        Period::new(month, year).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[test]
    fn copies_recurring_budget_into_current_month() {
        let mut state = FinanceState::default();
        state.budgets.push(
            Budget::new("b1", "Food", 150.0, FlowKind::Expense, period(4, 2024))
                .recurring()
                .with_notes("weekly shop"),
        );
        let ids = SequenceIdGenerator::new("roll");
        let created = RecurrenceService::roll_forward(&mut state, &clock(), &ids);

        assert_eq!(created.len(), 1);
        let copy = &created[0];
        assert_eq!(copy.id, "roll-1");
        assert_eq!(copy.period(), period(5, 2024));
        assert_eq!(copy.amount, 150.0);
        assert_eq!(copy.notes.as_deref(), Some("weekly shop"));
        assert!(copy.is_recurring);
        assert_eq!(state.budgets.len(), 2);
    }

    #[test]
    fn skips_non_recurring_and_occupied_slots() {
        let mut state = FinanceState::default();
        state.budgets.extend([
            Budget::new("b1", "Rent", 900.0, FlowKind::Expense, period(4, 2024)),
            Budget::new("b2", "Food", 150.0, FlowKind::Expense, period(4, 2024)).recurring(),
            Budget::new("b3", "Food", 175.0, FlowKind::Expense, period(5, 2024)),
            Budget::new("b4", "Salary", 4000.0, FlowKind::Income, period(5, 2024)).recurring(),
        ]);
        let ids = SequenceIdGenerator::new("roll");
        let created = RecurrenceService::roll_forward(&mut state, &clock(), &ids);
        assert!(created.is_empty());
        assert_eq!(state.budgets.len(), 4);
    }

    #[test]
    fn same_category_with_other_type_is_a_distinct_slot() {
        let budgets = vec![
            Budget::new("b1", "Other", 100.0, FlowKind::Expense, period(4, 2024)).recurring(),
            Budget::new("b2", "Other", 50.0, FlowKind::Income, period(5, 2024)),
        ];
        let ids = SequenceIdGenerator::new("roll");
        let created = RecurrenceService::pending_rollovers(&budgets, period(5, 2024), &ids);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].kind, FlowKind::Expense);
    }

    #[test]
    fn rolling_twice_is_idempotent() {
        let mut state = FinanceState::default();
        state.budgets.extend([
            Budget::new("b1", "Food", 150.0, FlowKind::Expense, period(3, 2024)).recurring(),
            Budget::new("b2", "Salary", 4000.0, FlowKind::Income, period(2, 2024)).recurring(),
        ]);
        let ids = SequenceIdGenerator::new("roll");
        let first = RecurrenceService::roll_forward(&mut state, &clock(), &ids);
        let second = RecurrenceService::roll_forward(&mut state, &clock(), &ids);
        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        let current: Vec<_> = state
            .budgets
            .iter()
            .filter(|b| b.period() == period(5, 2024))
            .collect();
        assert_eq!(current.len(), 2);
    }

    #[test]
    fn multiple_sources_for_one_slot_yield_a_single_copy_from_latest() {
        let budgets = vec![
            Budget::new("jan", "Food", 120.0, FlowKind::Expense, period(0, 2024)).recurring(),
            Budget::new("apr", "Food", 160.0, FlowKind::Expense, period(3, 2024)).recurring(),
            Budget::new("feb", "Food", 140.0, FlowKind::Expense, period(1, 2024)).recurring(),
        ];
        let ids = SequenceIdGenerator::new("roll");
        let created = RecurrenceService::pending_rollovers(&budgets, period(5, 2024), &ids);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].amount, 160.0);
    }

    #[test]
    fn future_recurring_budget_also_rolls_into_current() {
        let budgets =
            vec![Budget::new("b1", "Gym", 40.0, FlowKind::Expense, period(8, 2024)).recurring()];
        let ids = SequenceIdGenerator::new("roll");
        let created = RecurrenceService::pending_rollovers(&budgets, period(5, 2024), &ids);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].period(), period(5, 2024));
    }
}
