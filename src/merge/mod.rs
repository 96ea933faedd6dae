//! The streaming merge core: locus ordering and the k-way merge engine.

mod engine;
mod locus;

pub use engine::{LocusGroup, MergeEngine, MergeError, RecordSource};
pub use locus::{locus_cmp, same_locus};
