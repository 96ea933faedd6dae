//! Streaming k-way merge over per-population record streams.

use std::cmp::Ordering;

use thiserror::Error;

use super::locus::locus_cmp;
use crate::mafs::{LocusRecord, MafsError, SourceRole};

/// Abstraction over one population's record stream.
///
/// The engine pulls records on demand. Implementations must yield records
/// in non-decreasing locus order; unsorted input makes the grouping
/// undefined (this is a precondition, not an enforced check).
pub trait RecordSource {
    /// Role of this stream.
    fn role(&self) -> SourceRole;

    /// Next record in locus order, or `None` at end of stream.
    fn next_record(&mut self) -> Result<Option<LocusRecord>, MafsError>;
}

/// A source stream broke mid-merge.
///
/// The merge halts where it stands; output already emitted is left alone.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Advancing a source cursor returned a read or parse failure.
    #[error("merge halted by the {role} source")]
    SourceFailed {
        /// Stream that failed.
        role: SourceRole,
        /// Underlying read/parse failure.
        #[source]
        cause: MafsError,
    },
}

/// Records from different sources that share one genomic site.
///
/// Holds at most one record per role; inserting a role twice keeps the
/// later record.
#[derive(Debug, Clone, PartialEq)]
pub struct LocusGroup {
    chromosome: String,
    position: u64,
    records: [Option<LocusRecord>; 3],
}

impl LocusGroup {
    /// Start a group keyed at `record`'s locus, containing `record`.
    pub fn new(record: LocusRecord) -> Self {
        let mut group = Self {
            chromosome: record.chromosome.clone(),
            position: record.position,
            records: [None, None, None],
        };
        group.insert(record);
        group
    }

    /// Chromosome of the shared site.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Position of the shared site.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether `record` lies on this group's site.
    pub fn covers(&self, record: &LocusRecord) -> bool {
        record.chromosome == self.chromosome && record.position == self.position
    }

    /// Add a record sharing the group's locus; a repeated role keeps the
    /// later record.
    pub fn insert(&mut self, record: LocusRecord) {
        let index = record.role.index();
        self.records[index] = Some(record);
    }

    /// Record contributed by `role`, if that source had this site.
    pub fn record(&self, role: SourceRole) -> Option<&LocusRecord> {
        self.records[role.index()].as_ref()
    }

    /// Number of sources that contributed to this site.
    pub fn len(&self) -> usize {
        self.records.iter().flatten().count()
    }

    /// Whether the group holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.iter().all(Option::is_none)
    }

    /// The record whose fields provide the shared VCF row prefix: the
    /// first present role in target, divergent, ancestral order.
    pub fn representative(&self) -> Option<&LocusRecord> {
        self.records.iter().flatten().next()
    }
}

/// Streaming k-way merge over two or three population streams.
///
/// At most one pending record is held per source. Each [`next_group`] call
/// pops the minimum pending locus, folds in every other pending record on
/// the same locus (refilling its source as it goes), and returns the
/// completed group. Pending records on a later locus stay in their slots
/// untouched, so no record is ever dropped between groups, and every step
/// either advances a cursor or emits a group.
///
/// [`next_group`]: MergeEngine::next_group
#[derive(Debug)]
pub struct MergeEngine<S> {
    slots: Vec<Slot<S>>,
    primed: bool,
}

#[derive(Debug)]
struct Slot<S> {
    source: S,
    pending: Option<LocusRecord>,
}

impl<S: RecordSource> MergeEngine<S> {
    /// Build an engine over the given sources.
    ///
    /// Slots are scanned in the order given; keep sources in role priority
    /// order (target, divergent, ancestral) so equal-locus pops resolve
    /// deterministically.
    pub fn new(sources: Vec<S>) -> Self {
        let slots = sources
            .into_iter()
            .map(|source| Slot {
                source,
                pending: None,
            })
            .collect();
        Self {
            slots,
            primed: false,
        }
    }

    fn refill(&mut self, idx: usize) -> Result<(), MergeError> {
        let slot = &mut self.slots[idx];
        slot.pending = slot
            .source
            .next_record()
            .map_err(|cause| MergeError::SourceFailed {
                role: slot.source.role(),
                cause,
            })?;
        Ok(())
    }

    /// Slot holding the smallest pending locus; earlier slots win ties.
    fn min_index(&self) -> Option<usize> {
        let mut best: Option<(usize, &LocusRecord)> = None;
        for (idx, slot) in self.slots.iter().enumerate() {
            let Some(record) = slot.pending.as_ref() else {
                continue;
            };
            let replace = match best {
                Some((_, current)) => locus_cmp(record, current) == Ordering::Less,
                None => true,
            };
            if replace {
                best = Some((idx, record));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Produce the next locus group, or `None` once every source is done.
    pub fn next_group(&mut self) -> Result<Option<LocusGroup>, MergeError> {
        if !self.primed {
            self.primed = true;
            for idx in 0..self.slots.len() {
                self.refill(idx)?;
            }
        }

        let Some(idx) = self.min_index() else {
            return Ok(None);
        };
        let Some(first) = self.slots[idx].pending.take() else {
            return Ok(None);
        };
        let mut group = LocusGroup::new(first);
        self.refill(idx)?;

        while let Some(idx) = self.min_index() {
            let matched = self.slots[idx]
                .pending
                .as_ref()
                .is_some_and(|record| group.covers(record));
            if !matched {
                break;
            }
            if let Some(record) = self.slots[idx].pending.take() {
                group.insert(record);
            }
            self.refill(idx)?;
        }

        Ok(Some(group))
    }
}

impl<S: RecordSource> Iterator for MergeEngine<S> {
    type Item = Result<LocusGroup, MergeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_group().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::mafs::MalformedRecord;

    struct ScriptedSource {
        role: SourceRole,
        records: VecDeque<LocusRecord>,
        fail_at_end: bool,
    }

    impl ScriptedSource {
        fn new(role: SourceRole, loci: &[(&str, u64)]) -> Self {
            let records = loci
                .iter()
                .map(|&(chromosome, position)| record(chromosome, position, role))
                .collect();
            Self {
                role,
                records,
                fail_at_end: false,
            }
        }

        fn failing(mut self) -> Self {
            self.fail_at_end = true;
            self
        }
    }

    impl RecordSource for ScriptedSource {
        fn role(&self) -> SourceRole {
            self.role
        }

        fn next_record(&mut self) -> Result<Option<LocusRecord>, MafsError> {
            if let Some(record) = self.records.pop_front() {
                return Ok(Some(record));
            }
            if self.fail_at_end {
                self.fail_at_end = false;
                return Err(MafsError::Malformed {
                    role: self.role,
                    line: 99,
                    cause: MalformedRecord::ColumnCount(5),
                });
            }
            Ok(None)
        }
    }

    fn record(chromosome: &str, position: u64, role: SourceRole) -> LocusRecord {
        LocusRecord {
            chromosome: chromosome.to_string(),
            position,
            major_allele: "A".to_string(),
            minor_allele: "G".to_string(),
            known_frequency: 0.5,
            unknown_frequency: 0.1,
            sample_count: 10,
            role,
        }
    }

    fn collect_groups(engine: &mut MergeEngine<ScriptedSource>) -> Vec<(String, u64, usize)> {
        let mut groups = Vec::new();
        while let Some(group) = engine.next_group().expect("merge succeeds") {
            groups.push((group.chromosome().to_string(), group.position(), group.len()));
        }
        groups
    }

    #[test]
    fn interleaved_sources_emit_each_locus_once() {
        let target = ScriptedSource::new(
            SourceRole::Target,
            &[("chr1", 100), ("chr1", 250), ("chr2", 5)],
        );
        let divergent = ScriptedSource::new(
            SourceRole::Divergent,
            &[("chr1", 100), ("chr1", 300), ("chr2", 5)],
        );

        let mut engine = MergeEngine::new(vec![target, divergent]);
        let groups = collect_groups(&mut engine);
        assert_eq!(
            groups,
            vec![
                ("chr1".to_string(), 100, 2),
                ("chr1".to_string(), 250, 1),
                ("chr1".to_string(), 300, 1),
                ("chr2".to_string(), 5, 2),
            ]
        );
    }

    #[test]
    fn three_sources_collapse_a_shared_locus_into_one_group() {
        let target = ScriptedSource::new(SourceRole::Target, &[("chr1", 100)]);
        let divergent = ScriptedSource::new(SourceRole::Divergent, &[("chr1", 100)]);
        let ancestral = ScriptedSource::new(SourceRole::Ancestral, &[("chr1", 100)]);

        let mut engine = MergeEngine::new(vec![target, divergent, ancestral]);
        let group = engine.next_group().unwrap().unwrap();
        assert_eq!(group.len(), 3);
        assert!(group.record(SourceRole::Target).is_some());
        assert!(group.record(SourceRole::Divergent).is_some());
        assert!(group.record(SourceRole::Ancestral).is_some());
        assert!(engine.next_group().unwrap().is_none());
    }

    #[test]
    fn representative_prefers_target_then_divergent() {
        let target = ScriptedSource::new(SourceRole::Target, &[("chr1", 100)]);
        let divergent = ScriptedSource::new(SourceRole::Divergent, &[("chr1", 100)]);
        let ancestral = ScriptedSource::new(SourceRole::Ancestral, &[("chr1", 50)]);

        let mut engine = MergeEngine::new(vec![target, divergent, ancestral]);
        let first = engine.next_group().unwrap().unwrap();
        assert_eq!(
            first.representative().map(|r| r.role),
            Some(SourceRole::Ancestral)
        );
        let second = engine.next_group().unwrap().unwrap();
        assert_eq!(
            second.representative().map(|r| r.role),
            Some(SourceRole::Target)
        );
    }

    #[test]
    fn lookahead_never_drops_a_pending_record() {
        // divergent runs one locus ahead while target stays behind
        let target = ScriptedSource::new(SourceRole::Target, &[("chr1", 1), ("chr1", 3)]);
        let divergent = ScriptedSource::new(SourceRole::Divergent, &[("chr1", 2)]);

        let mut engine = MergeEngine::new(vec![target, divergent]);
        let groups = collect_groups(&mut engine);
        assert_eq!(
            groups,
            vec![
                ("chr1".to_string(), 1, 1),
                ("chr1".to_string(), 2, 1),
                ("chr1".to_string(), 3, 1),
            ]
        );
    }

    #[test]
    fn repeated_locus_within_one_source_keeps_the_later_record() {
        let mut target = ScriptedSource::new(SourceRole::Target, &[("chr1", 100), ("chr1", 100)]);
        if let Some(second) = target.records.back_mut() {
            second.known_frequency = 1.0;
        }
        let divergent = ScriptedSource::new(SourceRole::Divergent, &[]);

        let mut engine = MergeEngine::new(vec![target, divergent]);
        let group = engine.next_group().unwrap().unwrap();
        assert_eq!(group.len(), 1);
        let kept = group.record(SourceRole::Target).unwrap();
        assert_eq!(kept.known_frequency, 1.0);
        assert!(engine.next_group().unwrap().is_none());
    }

    #[test]
    fn failing_source_surfaces_its_role() {
        let target = ScriptedSource::new(SourceRole::Target, &[("chr1", 1), ("chr1", 2)]);
        let divergent = ScriptedSource::new(SourceRole::Divergent, &[("chr1", 1)]).failing();

        let mut engine = MergeEngine::new(vec![target, divergent]);
        let first = engine.next_group();
        let err = match first {
            Err(err) => err,
            Ok(group) => panic!("expected failure, got {group:?}"),
        };
        let MergeError::SourceFailed { role, cause } = err;
        assert_eq!(role, SourceRole::Divergent);
        assert!(matches!(cause, MafsError::Malformed { .. }));
    }

    #[test]
    fn empty_sources_terminate_immediately() {
        let target = ScriptedSource::new(SourceRole::Target, &[]);
        let divergent = ScriptedSource::new(SourceRole::Divergent, &[]);
        let mut engine = MergeEngine::new(vec![target, divergent]);
        assert!(engine.next_group().unwrap().is_none());
        // stays done on repeated polls
        assert!(engine.next_group().unwrap().is_none());
    }
}
