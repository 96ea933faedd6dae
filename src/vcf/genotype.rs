//! Frequency-threshold genotype policy.

use std::fmt;

use crate::mafs::{LocusRecord, SourceRole};
use crate::merge::LocusGroup;

/// knownEM frequency at and above which a site counts as fixed.
pub const DEFAULT_FIXED_THRESHOLD: f64 = 0.99;

/// A diploid genotype column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenotypeCall {
    /// Homozygous reference (`0/0`).
    HomozygousRef,
    /// Heterozygous (`0/1`).
    Heterozygous,
    /// Homozygous alternate (`1/1`).
    HomozygousAlt,
}

impl GenotypeCall {
    /// VCF `GT` token for this call.
    pub fn as_str(self) -> &'static str {
        match self {
            GenotypeCall::HomozygousRef => "0/0",
            GenotypeCall::Heterozygous => "0/1",
            GenotypeCall::HomozygousAlt => "1/1",
        }
    }
}

impl fmt::Display for GenotypeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps per-population knownEM frequencies to genotype calls.
///
/// A population whose frequency is at or above the fixed threshold is
/// called homozygous alternate at that site; below it, heterozygous. A
/// population with no record at the site is called homozygous reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypePolicy {
    fixed_threshold: f64,
}

impl Default for GenotypePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_THRESHOLD)
    }
}

impl GenotypePolicy {
    /// Policy with a custom fixed-site threshold.
    pub fn new(fixed_threshold: f64) -> Self {
        Self { fixed_threshold }
    }

    fn is_fixed(&self, record: &LocusRecord) -> bool {
        record.known_frequency >= self.fixed_threshold
    }

    /// Calls for the two synthetic target samples (SAMP1, SAMP2).
    pub fn target_calls(&self, record: Option<&LocusRecord>) -> [GenotypeCall; 2] {
        match record {
            None => [GenotypeCall::HomozygousRef; 2],
            Some(record) if self.is_fixed(record) => [GenotypeCall::HomozygousAlt; 2],
            Some(_) => [GenotypeCall::HomozygousRef, GenotypeCall::Heterozygous],
        }
    }

    /// Call for a single outgroup sample (divergent or ancestral).
    pub fn outgroup_call(&self, record: Option<&LocusRecord>) -> GenotypeCall {
        match record {
            None => GenotypeCall::HomozygousRef,
            Some(record) if self.is_fixed(record) => GenotypeCall::HomozygousAlt,
            Some(_) => GenotypeCall::Heterozygous,
        }
    }

    /// All genotype columns for one merged site.
    pub fn site_calls(&self, group: &LocusGroup, include_ancestral: bool) -> SiteCalls {
        SiteCalls {
            target: self.target_calls(group.record(SourceRole::Target)),
            divergent: self.outgroup_call(group.record(SourceRole::Divergent)),
            ancestral: include_ancestral
                .then(|| self.outgroup_call(group.record(SourceRole::Ancestral))),
        }
    }
}

/// Ordered genotype columns for one output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteCalls {
    /// Two synthetic target samples (SAMP1, SAMP2).
    pub target: [GenotypeCall; 2],
    /// Divergent sample (DIV1).
    pub divergent: GenotypeCall,
    /// Ancestral sample (ANC1), when an ancestral source is configured.
    pub ancestral: Option<GenotypeCall>,
}

impl SiteCalls {
    /// Genotype columns in output order.
    pub fn columns(&self) -> impl Iterator<Item = GenotypeCall> + '_ {
        self.target
            .into_iter()
            .chain(std::iter::once(self.divergent))
            .chain(self.ancestral)
    }
}
