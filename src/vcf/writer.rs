//! VCF text emission.

use std::io::{self, Write};

use super::genotype::SiteCalls;
use crate::merge::LocusGroup;

const FILE_PREAMBLE: &str = "##fileformat=VCFv4.3\n\
    ##INFO=<ID=KEM,Number=1,Type=Float,Description=\"knownEM frequency using -doMaf 1\">\n\
    ##INFO=<ID=PKEM,Number=1,Type=Float,Description=\"pK-EM\">\n\
    ##INFO=<ID=NI,Number=1,Type=Integer,Description=\"nInd\">\n";
const COLUMN_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMP1\tSAMP2\tDIV1";
const ANCESTRAL_COLUMN: &str = "\tANC1";
const MISSING: &str = ".";
const FILTER_PASS: &str = "PASS";

/// Writes the merged VCF: metadata preamble, column header, then one data
/// line per locus group in emission order.
#[derive(Debug)]
pub struct VcfWriter<W> {
    writer: W,
    include_ancestral: bool,
}

impl<W: Write> VcfWriter<W> {
    /// Wrap an output sink. `include_ancestral` widens the header and
    /// every data row by the ANC1 column.
    pub fn new(writer: W, include_ancestral: bool) -> Self {
        Self {
            writer,
            include_ancestral,
        }
    }

    /// Emit the metadata preamble and column header.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(FILE_PREAMBLE.as_bytes())?;
        self.writer.write_all(COLUMN_HEADER.as_bytes())?;
        if self.include_ancestral {
            self.writer.write_all(ANCESTRAL_COLUMN.as_bytes())?;
        }
        self.writer.write_all(b"\n")
    }

    /// Emit one data line for a merged site.
    ///
    /// The shared row prefix (CHROM through INFO) comes from the group's
    /// representative record; a group with no records writes nothing.
    pub fn write_site(&mut self, group: &LocusGroup, calls: &SiteCalls) -> io::Result<()> {
        let Some(representative) = group.representative() else {
            return Ok(());
        };
        write!(
            self.writer,
            "{chrom}\t{pos}\t{id}\t{reference}\t{alt}\t{qual}\t{filter}\tKEM={kem};PKEM={pkem};NI={ni}\tGT",
            chrom = representative.chromosome,
            pos = representative.position,
            id = MISSING,
            reference = representative.major_allele,
            alt = representative.minor_allele,
            qual = MISSING,
            filter = FILTER_PASS,
            kem = representative.known_frequency,
            pkem = representative.unknown_frequency,
            ni = representative.sample_count,
        )?;
        for call in calls.columns() {
            write!(self.writer, "\t{call}")?;
        }
        self.writer.write_all(b"\n")
    }

    /// Flush and hand back the underlying sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
