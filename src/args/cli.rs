use clap::{Args, Parser, Subcommand};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compare two run reports and classify per-endpoint latency deltas
    Compare(CompareArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    /// Baseline run report (JSON)
    pub left: String,

    /// Candidate run report (JSON)
    pub right: String,

    /// Write the comparison report to this path instead of stdout
    #[arg(long, short)]
    pub output: Option<String>,

    /// Render comparison charts (PNG) into this directory
    #[arg(long)]
    pub charts: Option<String>,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load tester for Rosetta-style blockchain data APIs - block-range aware request batches, percentile latency stats, JSON run reports, and chart exports for comparing runs."
)]
pub struct TesterArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the test configuration file (YAML or JSON)
    #[arg(long, short)]
    pub config: Option<String>,

    /// Keep per-request timings in the run report
    #[arg(long, short)]
    pub verbose: bool,

    /// Destination for the serialized run report (defaults to results/<timestamp>.json)
    #[arg(long, short)]
    pub output: Option<String>,

    /// Render run charts (PNG) into this directory
    #[arg(long)]
    pub charts: Option<String>,
}
