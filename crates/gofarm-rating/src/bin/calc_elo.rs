// ABOUTME: calc-elo binary: print the Elo difference for a winning proportion
// ABOUTME: Thin CLI over gofarm_rating::elo::calc_elo

use clap::Parser;
use gofarm_rating::elo::calc_elo;

#[derive(Parser)]
#[command(name = "calc-elo")]
#[command(about = "Calculate the Elo difference from a winning proportion in [0, 1]")]
struct Cli {
    /// Proportion of wins between 0 and 1
    pwin: f64,
}

fn main() -> anyhow::Result<()> {
    gofarm_log::init();
    let cli = Cli::parse();
    println!("{}", calc_elo(cli.pwin)?);
    Ok(())
}
