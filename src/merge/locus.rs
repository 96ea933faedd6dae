//! Total order over locus records.
//!
//! Chromosome names compare as raw strings and positions numerically;
//! equality of the (chromosome, position) pair is the grouping key for the
//! merge engine. Inputs must be pre-sorted consistently with this order —
//! in particular there is no natural sort, so `chr10` orders before `chr2`.

use std::cmp::Ordering;

use crate::mafs::LocusRecord;

/// Compare two records by (chromosome, position).
pub fn locus_cmp(a: &LocusRecord, b: &LocusRecord) -> Ordering {
    a.chromosome
        .cmp(&b.chromosome)
        .then_with(|| a.position.cmp(&b.position))
}

/// Whether two records describe the same genomic site.
///
/// Role and allele content are ignored; co-located records from different
/// populations compare equal.
pub fn same_locus(a: &LocusRecord, b: &LocusRecord) -> bool {
    locus_cmp(a, b) == Ordering::Equal
}
