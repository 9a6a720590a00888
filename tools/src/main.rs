//! rotation-runner: headless training-rotation planner.
//!
//! Usage:
//!   rotation-runner --input data.csv --output plan.txt
//!   rotation-runner --config rotation.json --input data.csv --output plan.txt --cycles 24
//!   rotation-runner --synthetic 12345 --output plan.txt --snapshot final.json
//!
//! Options:
//!   --config <json>        SimConfig file (defaults apply when omitted)
//!   --input <csv>          roster export, see input.rs for the columns
//!   --synthetic <seed>     generate a roster instead of reading one
//!   --output <txt>         plan file (default plan.txt)
//!   --cycles <n>           overrides the config's cycle count
//!   --date-format <fmt>    chrono format of "Date Recrutement" (default %m/%d/%Y)
//!   --snapshot <json>      write the final state as JSON

mod input;
mod report;

use anyhow::{bail, Context, Result};
use input::Roster;
use report::PlanReport;
use rotation_core::{
    clock::SimClock,
    config::SimConfig,
    engine::SimEngine,
    synthetic::{SyntheticParams, SyntheticRoster},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = parse_str_arg(&args, "--config");
    let input_path = parse_str_arg(&args, "--input");
    let output = parse_str_arg(&args, "--output").unwrap_or("plan.txt");
    let date_format = parse_str_arg(&args, "--date-format").unwrap_or(input::DEFAULT_DATE_FORMAT);
    let snapshot_path = parse_str_arg(&args, "--snapshot");
    let synthetic_seed = parse_str_arg(&args, "--synthetic")
        .map(|s| s.parse::<u64>().with_context(|| format!("--synthetic expects a number, got '{s}'")))
        .transpose()?;

    let mut config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    config.cycles = parse_arg(&args, "--cycles", config.cycles);

    let clock = SimClock::new();
    let roster = match (input_path, synthetic_seed) {
        (Some(path), _) => input::load_roster(path, date_format)?,
        (None, Some(seed)) => {
            let generated = SyntheticRoster::generate(seed, SyntheticParams::default(), clock.now());
            Roster {
                departments: generated.departments,
                employees: generated.employees,
            }
        }
        (None, None) => bail!("either --input <csv> or --synthetic <seed> is required"),
    };

    println!("rotation-runner");
    println!("  input:     {}", input_path.unwrap_or("(synthetic)"));
    println!("  output:    {output}");
    println!("  cycles:    {}", config.cycles);
    println!("  rules:     {}", config.rules.iter().map(|r| r.name()).collect::<Vec<_>>().join(", "));
    println!();

    let run_id = format!("run-{}", clock.now().format("%Y%m%d%H%M%S"));
    let mut engine = SimEngine::build(run_id, config, &roster.departments, &roster.employees, clock)?;

    let mut plan = PlanReport::new();
    plan.record(&engine.population, engine.clock.now(), false);
    for _ in 0..engine.config().cycles {
        let now = engine.cycle()?.now;
        plan.record(&engine.population, now, true);
    }

    if plan.is_empty() {
        log::warn!("no movement recorded; writing an empty plan");
    }
    std::fs::write(output, plan.render()).with_context(|| format!("Cannot write {output}"))?;

    if let Some(path) = snapshot_path {
        std::fs::write(path, engine.snapshot().to_json()?).with_context(|| format!("Cannot write {path}"))?;
    }

    print_summary(&engine, output);
    Ok(())
}

fn print_summary(engine: &SimEngine, output: &str) {
    let summary = engine.summary();
    let events: usize = engine.cycle_log().iter().map(|r| r.events.len()).sum();

    println!("=== RUN SUMMARY ===");
    println!("  run_id:       {}", engine.run_id);
    println!("  cycles run:   {}", engine.current_cycle());
    println!("  final date:   {}", engine.clock.now().format("%Y-%m-%d"));
    println!("  departments:  {}", engine.population.department_count());
    println!("  events:       {events}");
    println!("  waiting:      {}", summary.waiting);
    println!("  assigned:     {}", summary.assigned);
    println!("  finished:     {}", summary.finished);
    println!("  plan:         {output}");
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn parse_str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
