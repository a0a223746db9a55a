//! Persistence hand-off shapes.
//!
//! A case update replaces a criterion's stored assessment periods by
//! deleting every row for (case, kind) and inserting the new ones, inside
//! the caller's case-update transaction. [`ReplacementBatch`] carries one
//! such replacement per criterion so the store can apply them atomically.
//! Periods are merged before hand-off so the stored rows stay minimal.

use serde::Serialize;
use vilkar_core::{AssessmentId, CaseId, CaseTrack, CriterionKind};
use vilkar_criteria::Criterion;

use crate::aggregate::{CriterionAggregate, ProcessingStep};

/// Rows to insert for one criterion after deleting its previous rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionSnapshot {
    pub kind: CriterionKind,
    /// Ids of the rows being inserted, in period order.
    pub assessment_ids: Vec<AssessmentId>,
    pub criterion: Criterion,
}

impl CriterionSnapshot {
    /// Snapshot of `criterion` after merging equal adjacent periods.
    pub fn of(criterion: &Criterion) -> Self {
        let merged = criterion.merge_equal_periods();
        Self {
            kind: merged.kind(),
            assessment_ids: merged.assessment_ids(),
            criterion: merged,
        }
    }
}

/// Every criterion replacement for one case update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplacementBatch {
    pub case_id: CaseId,
    pub step: ProcessingStep,
    pub track: CaseTrack,
    pub criteria: Vec<CriterionSnapshot>,
}

impl ReplacementBatch {
    /// Replace every member of `aggregate`.
    pub fn for_aggregate(case_id: CaseId, aggregate: &CriterionAggregate) -> Self {
        Self {
            case_id,
            step: aggregate.step(),
            track: aggregate.track(),
            criteria: aggregate
                .criteria()
                .iter()
                .map(CriterionSnapshot::of)
                .collect(),
        }
    }

    /// Only the members whose content differs from `before`.
    ///
    /// A member is unchanged when it is equivalent to the same kind in
    /// `before`, ignoring ids and creation times.
    pub fn changed_since(
        case_id: CaseId,
        before: &CriterionAggregate,
        after: &CriterionAggregate,
    ) -> Self {
        let mut batch = Self::for_aggregate(case_id, after);
        batch.criteria.retain(|snapshot| {
            !before
                .get(snapshot.kind)
                .is_some_and(|old| old.merge_equal_periods().is_equivalent(&snapshot.criterion))
        });
        batch
    }

    pub fn kinds(&self) -> Vec<CriterionKind> {
        self.criteria.iter().map(|s| s.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use vilkar_criteria::Verdict;

    #[test]
    fn snapshot_merges_before_hand_off() {
        let split = plain(
            CriterionKind::LawfulStay,
            &[
                (months(2021, 1, 2021, 6), Verdict::Approved),
                (months(2021, 7, 2021, 12), Verdict::Approved),
            ],
        );
        let snapshot = CriterionSnapshot::of(&split);
        assert_eq!(snapshot.kind, CriterionKind::LawfulStay);
        assert_eq!(snapshot.assessment_ids.len(), 1);
        assert_eq!(snapshot.criterion.periods(), vec![year(2021)]);
    }

    #[test]
    fn batch_covers_every_member() {
        let agg = full_bundle(CaseTrack::Age, year(2021));
        let batch = ReplacementBatch::for_aggregate(CaseId::new(), &agg);
        assert_eq!(batch.kinds(), CaseTrack::Age.criteria());
        assert_eq!(batch.step, ProcessingStep::Application);
    }

    #[test]
    fn changed_since_skips_equivalent_members() {
        let before = full_bundle(CaseTrack::Disability, year(2021));
        let after = before
            .replace_criterion(plain(CriterionKind::ForeignStay, &[(year(2021), Verdict::Denied)]))
            .unwrap();
        let batch = ReplacementBatch::changed_since(CaseId::new(), &before, &after);
        assert_eq!(batch.kinds(), vec![CriterionKind::ForeignStay]);

        let none = ReplacementBatch::changed_since(CaseId::new(), &before, &before.copy_with_new_ids());
        assert!(none.criteria.is_empty());
    }

    #[test]
    fn batch_serializes_case_and_rows() {
        let agg = full_bundle(CaseTrack::Age, year(2021));
        let case_id = CaseId::new();
        let json = serde_json::to_value(ReplacementBatch::for_aggregate(case_id, &agg)).unwrap();
        assert_eq!(json["track"], "age");
        assert_eq!(json["criteria"][0]["kind"], "assets");
        assert_eq!(json["criteria"][0]["criterion"]["assessment"]["status"], "assessed");
    }
}
