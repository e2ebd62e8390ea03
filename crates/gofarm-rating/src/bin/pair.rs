// ABOUTME: pair binary: select an opponent index from "name wins" lines on stdin
// ABOUTME: Thin CLI over gofarm_rating::pair::pair

use anyhow::Context;
use clap::Parser;
use gofarm_rating::pair::{pair, PairEntry};
use std::io::BufRead;

#[derive(Parser)]
#[command(name = "pair")]
#[command(about = "Select an opponent with approximately equal results")]
struct Cli {
    /// Number of entries to read from stdin, one "name wins" per line
    entries: usize,
    /// Index of the baseline entry to pair against
    baseline: usize,
}

fn main() -> anyhow::Result<()> {
    gofarm_log::init();
    let cli = Cli::parse();

    let stdin = std::io::stdin();
    let mut field = Vec::with_capacity(cli.entries);
    for line in stdin.lock().lines().take(cli.entries) {
        let line = line?;
        let mut parts = line.split_whitespace();
        let name = parts.next().context("missing program name")?;
        let wins: u64 = parts
            .next()
            .context("missing win count")?
            .parse()
            .with_context(|| format!("bad win count in {line:?}"))?;
        field.push(PairEntry::new(name, wins));
    }
    anyhow::ensure!(
        field.len() == cli.entries,
        "expected {} entries on stdin, got {}",
        cli.entries,
        field.len()
    );

    let selected = pair(cli.baseline, &field, &mut rand::thread_rng())?;
    println!("{selected}");
    Ok(())
}
