//! Input-side handling of ANGSD `.mafs` allele-frequency tables.
//!
//! Each input file describes one population and is read as a pull-based
//! stream of [`LocusRecord`]s, pre-sorted by (chromosome, position).

mod reader;
mod record;

pub use reader::{MafsError, MafsReader};
pub use record::{parse_record, LocusRecord, MalformedRecord, SourceRole};
