use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fintrack_core::{AggregationService, SequenceIdGenerator, RecurrenceService, SummaryService};
use fintrack_domain::{Budget, FlowKind, Period, Transaction};

const CATEGORIES: [&str; 6] = ["Food", "Housing", "Transportation", "Utilities", "Health", ""];

fn sample_transactions(count: usize) -> Vec<Transaction> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let kind = if idx % 10 == 0 {
                FlowKind::Income
            } else {
                FlowKind::Expense
            };
            Transaction::new(
                format!("t{idx}"),
                "Sample",
                5.0 + (idx % 200) as f64,
                start + Duration::days((idx % 365) as i64),
                CATEGORIES[idx % CATEGORIES.len()],
                kind,
            )
        })
        .collect()
}

fn sample_budgets() -> Vec<Budget> {
    (0..12)
        .flat_map(|month| {
            let period = Period::new(month, 2024).unwrap();
            CATEGORIES.iter().enumerate().map(move |(idx, category)| {
                let budget = Budget::new(
                    format!("b{month}-{idx}"),
                    *category,
                    500.0,
                    FlowKind::Expense,
                    period,
                );
                if idx % 2 == 0 {
                    budget.recurring()
                } else {
                    budget
                }
            })
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let transactions = sample_transactions(black_box(10_000));
    let budgets = sample_budgets();
    let march = Period::new(2, 2024).unwrap();

    c.bench_function("budget_overview_10k", |b| {
        b.iter(|| black_box(AggregationService::overview(&budgets, &transactions, march)))
    });

    c.bench_function("dashboard_10k", |b| {
        b.iter(|| black_box(SummaryService::dashboard(&transactions, &budgets, &[], march)))
    });

    c.bench_function("pending_rollovers_72", |b| {
        let ids = SequenceIdGenerator::new("r");
        let next = Period::new(0, 2025).unwrap();
        b.iter(|| black_box(RecurrenceService::pending_rollovers(&budgets, next, &ids)))
    });
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
