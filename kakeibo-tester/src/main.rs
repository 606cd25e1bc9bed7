mod scenarios;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use scenarios::{ScenarioCtx, list_scenarios, run_scenario};

#[derive(Debug, Parser)]
#[command(name = "kakeibo-tester", version)]
#[command(about = "Automated QA for the Kakeibo Quest engine - scripted and seeded logic simulations")]
struct Args {
    /// Scenarios to run (comma-separated), or "all"
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// Base RNG seed for the randomized scenarios
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of months the long simulation covers
    #[arg(long, default_value_t = 6)]
    months: u32,

    /// Print per-day detail while simulating
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let ctx = ScenarioCtx {
        seed: args.seed,
        months: args.months,
        verbose: args.verbose,
    };

    let selected: Vec<&str> = if args.scenarios == "all" {
        list_scenarios()
    } else {
        args.scenarios
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    };

    let mut failures = 0usize;
    for name in &selected {
        print!("{} {name} ... ", "run".cyan().bold());
        match run_scenario(name, &ctx) {
            Ok(summary) => println!("{} {summary}", "ok".green().bold()),
            Err(err) => {
                failures += 1;
                println!("{}", "FAILED".red().bold());
                eprintln!("    {err:#}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} scenarios failed", selected.len());
    }
    println!(
        "{}",
        format!("all {} scenarios passed", selected.len())
            .green()
            .bold()
    );
    Ok(())
}
