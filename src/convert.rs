//! The `convert` command: wires input readers, the merge engine, the
//! genotype policy, and the VCF writer together.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::mafs::{MafsReader, SourceRole};
use crate::merge::{LocusGroup, MergeEngine, MergeError};
use crate::vcf::{GenotypePolicy, VcfWriter};

/// Inputs and output of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Target population `.mafs` path.
    pub target: PathBuf,
    /// Divergent population `.mafs` path.
    pub divergent: PathBuf,
    /// Optional ancestral population `.mafs` path; enables the ANC1
    /// genotype column.
    pub ancestral: Option<PathBuf>,
    /// Output VCF path.
    pub output: PathBuf,
}

/// Why a conversion run failed.
///
/// A failed run may leave a partially written output file behind; it is
/// not deleted.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A configured input file could not be opened.
    #[error("{role} file '{}' could not be opened", .path.display())]
    FileUnavailable {
        /// Role the path was configured for.
        role: SourceRole,
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying open error.
        #[source]
        source: io::Error,
    },
    /// The output file could not be created.
    #[error("output file '{}' could not be created", .path.display())]
    OutputUnavailable {
        /// Path that failed to open for writing.
        path: PathBuf,
        /// Underlying create error.
        #[source]
        source: io::Error,
    },
    /// The merge halted on a malformed or unreadable source.
    #[error(transparent)]
    Merge(#[from] MergeError),
    /// Writing the output failed.
    #[error("failed to write output")]
    Io(#[from] io::Error),
}

/// Counts reported after a successful conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Data lines written, one per distinct locus.
    pub sites: u64,
    /// Records consumed from the target stream.
    pub target_records: u64,
    /// Records consumed from the divergent stream.
    pub divergent_records: u64,
    /// Records consumed from the ancestral stream.
    pub ancestral_records: u64,
}

impl ConvertSummary {
    fn count(&mut self, group: &LocusGroup) {
        self.sites += 1;
        if group.record(SourceRole::Target).is_some() {
            self.target_records += 1;
        }
        if group.record(SourceRole::Divergent).is_some() {
            self.divergent_records += 1;
        }
        if group.record(SourceRole::Ancestral).is_some() {
            self.ancestral_records += 1;
        }
    }
}

/// Run one conversion: read two or three `.mafs` inputs, write one VCF.
///
/// Target and divergent inputs are mandatory; the ancestral input is
/// optional and switches the output to the four-sample layout.
pub fn convert(options: &ConvertOptions) -> Result<ConvertSummary, ConvertError> {
    let target = open_source(&options.target, SourceRole::Target)?;
    let divergent = open_source(&options.divergent, SourceRole::Divergent)?;
    let ancestral = match options.ancestral.as_deref() {
        Some(path) => Some(open_source(path, SourceRole::Ancestral)?),
        None => None,
    };
    info!(
        target_path = %options.target.display(),
        divergent_path = %options.divergent.display(),
        with_ancestral = options.ancestral.is_some(),
        "starting conversion"
    );

    let output =
        File::create(&options.output).map_err(|source| ConvertError::OutputUnavailable {
            path: options.output.clone(),
            source,
        })?;
    let summary = convert_streams(
        target,
        divergent,
        ancestral,
        BufWriter::new(output),
        GenotypePolicy::default(),
    )?;
    info!(
        sites = summary.sites,
        output = %options.output.display(),
        "finished conversion"
    );
    Ok(summary)
}

fn open_source(
    path: &Path,
    role: SourceRole,
) -> Result<MafsReader<BufReader<File>>, ConvertError> {
    debug!(%role, path = %path.display(), "opening input");
    MafsReader::open(path, role).map_err(|source| ConvertError::FileUnavailable {
        role,
        path: path.to_path_buf(),
        source,
    })
}

/// Merge already-open record streams into `writer`.
///
/// This is the path-independent core of [`convert`]; tests drive it with
/// in-memory readers and sinks.
pub fn convert_streams<R, W>(
    target: MafsReader<R>,
    divergent: MafsReader<R>,
    ancestral: Option<MafsReader<R>>,
    writer: W,
    policy: GenotypePolicy,
) -> Result<ConvertSummary, ConvertError>
where
    R: BufRead,
    W: Write,
{
    let include_ancestral = ancestral.is_some();
    let mut vcf = VcfWriter::new(writer, include_ancestral);
    vcf.write_header()?;

    let mut sources = vec![target, divergent];
    sources.extend(ancestral);

    let mut engine = MergeEngine::new(sources);
    let mut summary = ConvertSummary::default();
    while let Some(group) = engine.next_group()? {
        let calls = policy.site_calls(&group, include_ancestral);
        vcf.write_site(&group, &calls)?;
        summary.count(&group);
    }
    vcf.finish()?;
    Ok(summary)
}
