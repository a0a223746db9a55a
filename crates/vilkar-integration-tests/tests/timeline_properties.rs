//! # Timeline Properties
//!
//! Property tests for reconciliation and merge, and for the partition
//! check the aggregate enforces.

use proptest::prelude::*;
use vilkar_aggregate::{AggregateError, CriterionAggregate, ProcessingStep};
use vilkar_core::{
    has_overlapping, minimal_covering_partition, CaseTrack, CriterionKind, Month, Period,
    Timestamp,
};
use vilkar_criteria::{Criterion, Verdict};
use vilkar_sats::AssetLimitTable;

fn ts() -> Timestamp {
    Timestamp::parse("2021-01-01T12:00:00Z").unwrap()
}

fn base() -> Month {
    Month::new(2019, 1).unwrap()
}

fn arb_verdict() -> impl Strategy<Value = Verdict> {
    prop_oneof![
        Just(Verdict::Approved),
        Just(Verdict::Denied),
        Just(Verdict::Undetermined),
    ]
}

/// Ordered, non-overlapping periods, possibly with gaps between them.
fn arb_timeline() -> impl Strategy<Value = Vec<(Period, Verdict)>> {
    timeline_with_gaps(0..4)
}

/// Ordered periods covering one unbroken span.
fn arb_contiguous_timeline() -> impl Strategy<Value = Vec<(Period, Verdict)>> {
    timeline_with_gaps(0..1)
}

fn timeline_with_gaps(
    gaps: std::ops::Range<i32>,
) -> impl Strategy<Value = Vec<(Period, Verdict)>> {
    (0i32..24, prop::collection::vec((gaps, 1i32..8, arb_verdict()), 1..5)).prop_map(
        |(offset, pieces)| {
            let mut cursor = base().plus(offset).unwrap();
            let mut out = Vec::new();
            for (gap, len, verdict) in pieces {
                let first = cursor.plus(gap).unwrap();
                let last = first.plus(len - 1).unwrap();
                out.push((Period::from_months(first, last).unwrap(), verdict));
                cursor = last.plus(1).unwrap();
            }
            out
        },
    )
}

fn arb_target() -> impl Strategy<Value = Period> {
    (0i32..60, 1i32..18).prop_map(|(offset, len)| {
        let first = base().plus(offset).unwrap();
        Period::from_months(first, first.plus(len - 1).unwrap()).unwrap()
    })
}

fn criterion(kind: CriterionKind, timeline: &[(Period, Verdict)]) -> Criterion {
    Criterion::from_verdicts(kind, ts(), timeline).unwrap()
}

// The assets member is never assessed here, so no limits are consulted.
fn no_limits() -> AssetLimitTable {
    AssetLimitTable::flat(base().to_period(), 0)
}

proptest! {
    #[test]
    fn reconcile_covers_exactly_the_target(timeline in arb_timeline(), target in arb_target()) {
        let c = criterion(CriterionKind::LawfulStay, &timeline);
        let moved = c.reconcile(target, &no_limits()).unwrap();
        let periods = moved.periods();
        prop_assert!(!has_overlapping(&periods));
        prop_assert_eq!(minimal_covering_partition(&periods), vec![target]);
    }

    #[test]
    fn reconcile_onto_own_span_changes_nothing_after_merge(timeline in arb_contiguous_timeline()) {
        let c = criterion(CriterionKind::ForeignStay, &timeline);
        let span = c.covering_period().unwrap();
        let moved = c.reconcile(span, &no_limits()).unwrap();
        prop_assert!(moved.merge_equal_periods().is_equivalent(&c.merge_equal_periods()));
    }

    #[test]
    fn merge_is_idempotent(timeline in arb_timeline()) {
        let c = criterion(CriterionKind::DisclosureDuty, &timeline);
        let once = c.merge_equal_periods();
        prop_assert_eq!(once.merge_equal_periods(), once.clone());
        prop_assert_eq!(minimal_covering_partition(&once.periods()), c.partition());
    }

    #[test]
    fn clip_never_leaves_the_window(timeline in arb_timeline(), window in arb_target()) {
        let c = criterion(CriterionKind::InstitutionalStay, &timeline);
        for p in c.clip_to(window).periods() {
            prop_assert!(window.contains(&p));
        }
    }

    #[test]
    fn aggregate_rejects_exactly_the_differing_partitions(
        a in arb_timeline(),
        b in arb_timeline(),
    ) {
        let first = criterion(CriterionKind::LawfulStay, &a);
        let second = criterion(CriterionKind::ForeignStay, &b);
        let same = first.partition() == second.partition();
        let result = CriterionAggregate::try_new(
            ProcessingStep::Application,
            CaseTrack::Age,
            vec![first, second],
        );
        match result {
            Ok(_) => prop_assert!(same),
            Err(AggregateError::PartitionMismatch { .. }) => prop_assert!(!same),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn case_verdict_is_the_meet_of_members(
        a in arb_timeline(),
        verdict in arb_verdict(),
    ) {
        let first = criterion(CriterionKind::LawfulStay, &a);
        let partition = first.partition();
        let uniform: Vec<(Period, Verdict)> = partition.iter().map(|p| (*p, verdict)).collect();
        let criteria: Vec<Criterion> = CaseTrack::Age
            .criteria()
            .into_iter()
            .map(|kind| {
                if kind == CriterionKind::LawfulStay {
                    first.clone()
                } else {
                    criterion(kind, &uniform)
                }
            })
            .collect();
        let aggregate =
            CriterionAggregate::try_new(ProcessingStep::Application, CaseTrack::Age, criteria)
                .unwrap();
        let expected = Verdict::meet_all(aggregate.criteria().iter().map(Criterion::verdict));
        prop_assert_eq!(aggregate.outcome().verdict(), expected);
    }
}
