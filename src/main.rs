use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use peerset::cli::Cli;
use peerset::config::Config;
use peerset::directory::github::GhDirectory;
use peerset::orchestrator::ReviewOrchestrator;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    info!("peerset starting");

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    info!(?config, "config loaded");

    let seed = config.seed;
    let json = config.json;
    let orchestrator = ReviewOrchestrator::new(GhDirectory::new(), config);

    let result = match seed {
        Some(seed) => orchestrator.run(&mut StdRng::seed_from_u64(seed)),
        None => orchestrator.run(&mut rand::rng()),
    };

    match result {
        Ok(report) => {
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        eprintln!("error: failed to serialize report: {e}");
                        std::process::exit(1);
                    }
                }
            }
            let mode = if report.dry_run { "simulated" } else { "dispatched" };
            info!(
                reviewees = report.assignment.len(),
                pairs = report.pairs.len(),
                mode,
                "run complete"
            );
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
