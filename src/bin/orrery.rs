//! Headless driver: builds the registry from a body table and ticks it,
//! logging poses at a fixed interval.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use orrery_simulation::{BodyKind, OrbitRegistry, SystemConfig, logging};

#[derive(Debug, Parser)]
#[command(name = "orrery", about = "Run the orbit propagator without a renderer")]
struct CliArgs {
    /// RON body table; the built-in inner solar system is used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: usize,

    /// Log poses every N ticks (0 disables).
    #[arg(long, default_value_t = 60)]
    report_every: usize,

    /// Log filter, overrides the config's `log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match SystemConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("orrery: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::init_logging(Some(args.log_level.as_deref().unwrap_or(&config.log_level)));

    let mut registry = match OrbitRegistry::from_config(&config) {
        Ok(registry) => registry,
        Err(err) => {
            tracing::error!(%err, "invalid body table");
            return ExitCode::FAILURE;
        }
    };

    for _ in 0..args.ticks {
        registry.step();
        if args.report_every != 0 && registry.frame() % args.report_every == 0 {
            report(&registry);
        }
    }

    tracing::info!(
        frames = registry.frame(),
        non_converged = registry.non_converged_solves(),
        "simulation finished"
    );
    ExitCode::SUCCESS
}

fn report(registry: &OrbitRegistry) {
    for pose in registry.poses() {
        let p = pose.pose.position;
        match (pose.kind, pose.light_direction) {
            (BodyKind::Satellite, Some(light)) => tracing::info!(
                frame = registry.frame(),
                body = pose.name,
                x = p.x,
                y = p.y,
                z = p.z,
                light_x = light.x,
                light_z = light.z,
                "satellite pose"
            ),
            _ => tracing::info!(
                frame = registry.frame(),
                body = pose.name,
                x = p.x,
                y = p.y,
                z = p.z,
                spin = pose.pose.spin,
                "pose"
            ),
        }
    }
}
