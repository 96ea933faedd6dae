use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which population a `.mafs` input stream describes.
///
/// Roles are fixed: the target population drives two synthetic sample
/// columns in the output, divergent and ancestral drive one each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRole {
    /// Population of interest (SAMP1 and SAMP2 columns).
    Target,
    /// Divergent outgroup population (DIV1 column).
    Divergent,
    /// Ancestral outgroup population (ANC1 column); optional.
    Ancestral,
}

impl SourceRole {
    /// All roles in emission priority order.
    pub const ALL: [SourceRole; 3] = [
        SourceRole::Target,
        SourceRole::Divergent,
        SourceRole::Ancestral,
    ];

    /// Stable slot index for per-role storage.
    pub(crate) fn index(self) -> usize {
        match self {
            SourceRole::Target => 0,
            SourceRole::Divergent => 1,
            SourceRole::Ancestral => 2,
        }
    }

    /// Lower-case role name, as used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            SourceRole::Target => "target",
            SourceRole::Divergent => "divergent",
            SourceRole::Ancestral => "ancestral",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed `.mafs` row: a genomic site with its allele-frequency
/// statistics for a single population.
#[derive(Debug, Clone, PartialEq)]
pub struct LocusRecord {
    /// Chromosome/contig name, compared lexicographically.
    pub chromosome: String,
    /// Position within the chromosome, as given in the input.
    pub position: u64,
    /// Major allele, passed through to the REF column.
    pub major_allele: String,
    /// Minor allele, passed through to the ALT column.
    pub minor_allele: String,
    /// knownEM minor-allele frequency estimate; drives the genotype calls.
    pub known_frequency: f64,
    /// unknownEM value, carried through to the INFO field only.
    pub unknown_frequency: f64,
    /// Number of individuals behind the estimate, carried through to INFO.
    pub sample_count: u64,
    /// Population stream the row came from.
    pub role: SourceRole,
}

/// Why a single input line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// The line did not have 7 or 8 tab-separated columns.
    #[error("expected 7 or 8 tab-separated columns, found {0}")]
    ColumnCount(usize),
    /// A numeric column held something other than a number.
    #[error("invalid {field} value '{value}'")]
    InvalidNumber {
        /// Input column that failed to parse.
        field: &'static str,
        /// Offending text.
        value: String,
    },
}

/// Parse one tab-separated `.mafs` row into a [`LocusRecord`].
///
/// Two shapes are accepted: the 7-column layout
/// (`chromo position major minor knownEM unknownEM nInd`) and the 8-column
/// layout carrying an extra reference-allele column between the minor
/// allele and knownEM. The reference column is parsed away and not
/// retained. Trailing line terminators are stripped before the last column
/// is read as an integer.
pub fn parse_record(line: &str, role: SourceRole) -> Result<LocusRecord, MalformedRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let columns: Vec<&str> = line.split('\t').collect();

    let (chromosome, position, major, minor, known, unknown, count) = match columns.as_slice() {
        [chromo, pos, major, minor, known, unknown, count] => {
            (chromo, pos, major, minor, known, unknown, count)
        }
        [chromo, pos, major, minor, _reference, known, unknown, count] => {
            (chromo, pos, major, minor, known, unknown, count)
        }
        _ => return Err(MalformedRecord::ColumnCount(columns.len())),
    };

    Ok(LocusRecord {
        chromosome: (*chromosome).to_string(),
        position: parse_field(position, "position")?,
        major_allele: (*major).to_string(),
        minor_allele: (*minor).to_string(),
        known_frequency: parse_field(known, "knownEM")?,
        unknown_frequency: parse_field(unknown, "unknownEM")?,
        sample_count: parse_field(count, "nInd")?,
        role,
    })
}

fn parse_field<T: FromStr>(value: &str, field: &'static str) -> Result<T, MalformedRecord> {
    value
        .trim()
        .parse()
        .map_err(|_| MalformedRecord::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
