//! Neighbour run command

use std::path::PathBuf;

use clap::Args;
use coexpr_engine::commands::coexpr::coexpr_run;
use coexpr_engine::JsonReportSink;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Database created with `coexpr database create`
    pub database: PathBuf,
    /// YAML job description
    pub job: PathBuf,
    /// Neighbour report destination
    #[arg(long, default_value = "neighbors.json")]
    pub report: PathBuf,
}

pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut sink = JsonReportSink::new(&args.report);
    let outcome = coexpr_run(&args.database, &args.job, &mut sink)?;

    println!(
        "Run {}: {} neighbour groups for {} baits",
        outcome.run_id,
        outcome.neighbors.len(),
        outcome.report.baits.len()
    );
    for ranking in &outcome.rankings {
        println!(
            "Ranked {} candidates of {} in {}",
            ranking.ranked.len(),
            ranking.clustering,
            ranking.matrix
        );
    }
    for path in &outcome.correlation_files {
        println!("Wrote {}", path.display());
    }
    println!("Wrote {}", sink.path().display());
    Ok(())
}
