//! Output-side VCF formatting: the genotype policy and the line emitter.

mod genotype;
mod writer;

pub use genotype::{GenotypeCall, GenotypePolicy, SiteCalls, DEFAULT_FIXED_THRESHOLD};
pub use writer::VcfWriter;
