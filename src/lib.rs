//! Merge per-population ANGSD `.mafs` allele-frequency tables into one VCF.
//!
//! Two or three populations — target, divergent, and optionally ancestral —
//! each contribute a position-sorted table of per-site major/minor alleles
//! and knownEM frequency estimates. The crate streams the inputs through a
//! k-way merge keyed on (chromosome, position), collapses co-located rows
//! into a single site, assigns per-population genotype calls from a
//! fixed-site frequency threshold, and emits one VCF v4.3 data line per
//! site, position-sorted.
//!
//! ## Usage example
//!
//! ```ignore
//! use mafs2vcf::{convert, ConvertOptions};
//!
//! let summary = convert(&ConvertOptions {
//!     target: "target.mafs".into(),
//!     divergent: "divergent.mafs".into(),
//!     ancestral: None,
//!     output: "merged.vcf".into(),
//! })?;
//! assert!(summary.sites > 0);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod convert;
pub mod mafs;
pub mod merge;
pub mod vcf;

// Re-exports for convenience
pub use convert::{convert, convert_streams, ConvertError, ConvertOptions, ConvertSummary};
pub use mafs::{parse_record, LocusRecord, MafsError, MafsReader, MalformedRecord, SourceRole};
pub use merge::{locus_cmp, same_locus, LocusGroup, MergeEngine, MergeError, RecordSource};
pub use vcf::{GenotypeCall, GenotypePolicy, SiteCalls, VcfWriter, DEFAULT_FIXED_THRESHOLD};
