use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mafs2vcf::{convert, ConvertOptions};

#[derive(Parser, Debug)]
#[command(
    name = "mafs2vcf",
    about = "Merge ANGSD .mafs allele-frequency tables from two or three populations into a single VCF"
)]
struct Cli {
    /// Target species .mafs file.
    #[arg(short, long)]
    target: PathBuf,
    /// Divergent species .mafs file.
    #[arg(short, long)]
    divergent: PathBuf,
    /// Ancestral species .mafs file; adds the ANC1 genotype column.
    #[arg(short, long)]
    ancestral: Option<PathBuf>,
    /// Output VCF path.
    #[arg(short, long, default_value = "mafs2vcf_output.vcf")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let options = ConvertOptions {
        target: cli.target,
        divergent: cli.divergent,
        ancestral: cli.ancestral,
        output: cli.output.clone(),
    };

    let summary = convert(&options)
        .with_context(|| format!("conversion to {} failed", cli.output.display()))?;

    println!(
        "wrote {} sites to {} ({} target, {} divergent, {} ancestral records)",
        summary.sites,
        cli.output.display(),
        summary.target_records,
        summary.divergent_records,
        summary.ancestral_records
    );

    Ok(())
}
