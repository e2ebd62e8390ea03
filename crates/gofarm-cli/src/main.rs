// ABOUTME: gofarm CLI entry point
// ABOUTME: Spawns the engine farm and runs the operator loop over stdin/stdout

use clap::Parser;
use gofarm_core::{run_session, Farm, FarmOptions};
use std::path::PathBuf;
use tokio::io::BufReader;

#[derive(Parser)]
#[command(name = "gofarm")]
#[command(about = "Run several GTP engine processes as one logical engine")]
struct Cli {
    /// Number of engine processes; the first is the master
    processes: usize,
    /// Launch command for the master engine
    master: String,
    /// Launch command for slave engines
    slave: String,
    /// Extra arguments appended to every engine launch command.
    /// Everything after the slave command is passed to the engines
    /// verbatim, so gofarm flags must come before the positionals.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    engine_args: Vec<String>,
    /// Log every GTP exchange
    #[arg(long)]
    verbose: bool,
    /// Write per-member command transcripts to <PATH>.<ordinal>
    #[arg(long)]
    transcript: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        gofarm_log::init_verbose();
    } else {
        gofarm_log::init();
    }

    let options = FarmOptions {
        processes: cli.processes,
        master_command: cli.master,
        slave_command: cli.slave,
        engine_args: cli.engine_args.join(" "),
        verbose: cli.verbose,
        transcript: cli.transcript,
    };

    let mut farm = Farm::spawn(&options)?;

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_session(&mut farm, stdin, stdout).await
}
