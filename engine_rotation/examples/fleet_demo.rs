//! Usage: `cargo run --example fleet_demo -- [config.json] [--scip] [--time SECS] [--lp OUT.lp] [--json]`
//!
//! Without a config file the built-in six-engine roster is planned. Set
//! `RUST_LOG=engine_rotation=debug` for per-component row counts.

use engine_rotation::{
    plan_fleet, FleetConfig, MicroLpBackend, ScipCliBackend, SolverBackend, SolverOptions,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config_path = None;
    let mut use_scip = false;
    let mut lp_out = None;
    let mut json = false;
    let mut opts = SolverOptions::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scip" => use_scip = true,
            "--json" => json = true,
            "--lp" => lp_out = Some(args.next().ok_or("--lp needs a path")?),
            "--time" => opts.time_limit_secs = args.next().ok_or("--time needs seconds")?.parse()?,
            _ => config_path = Some(arg),
        }
    }

    let cfg = match &config_path {
        Some(path) => FleetConfig::from_json_file(path)?,
        None => FleetConfig::demo(),
    };

    let backend: Box<dyn SolverBackend> = if use_scip {
        Box::new(ScipCliBackend::new())
    } else {
        Box::new(MicroLpBackend)
    };

    let (model, outcome) = plan_fleet(&cfg, backend.as_ref(), &opts)?;
    if let Some(path) = &lp_out {
        model.ilp().write_lp(path)?;
        println!("wrote {path}");
    }

    println!("status: {} ({:.1?} on {})", outcome.status, outcome.elapsed, outcome.backend);
    let Some(schedule) = outcome.schedule(&model) else {
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        print!("{}", schedule.render_text());
        println!("pool occupancy: {:?}", schedule.pool_occupancy());
    }
    Ok(())
}
