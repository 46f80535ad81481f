use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;
use tessella::scenario::{ScenarioDefinition, ScenarioExecutor, ScenarioExecutorConfig};
use tessella::{AppConfig, HeadlessSession};
use tessella_core::simulation::Materials;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ticks to simulate (ignored with --scenario)
    #[arg(long, default_value = "300")]
    ticks: u64,

    /// Simulation seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Side length of the square pixel buffer (overrides config)
    #[arg(long)]
    resolution: Option<u32>,

    /// Run a RON scenario script instead of a plain simulation
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Output directory for snapshots and reports (overrides config)
    #[arg(long)]
    output: Option<String>,

    /// Write a snapshot every N ticks, 0 for none (overrides config)
    #[arg(long)]
    snapshot_every: Option<u64>,

    /// Check the full tiling around every edit
    #[arg(long)]
    verify_tiling: bool,

    /// Log every scenario action
    #[arg(long)]
    verbose: bool,

    /// List materials and their brush keys
    #[arg(long)]
    list_materials: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Handle --list-materials flag
    if args.list_materials {
        list_materials();
        return Ok(());
    }

    let mut config = AppConfig::load()?;
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(resolution) = args.resolution {
        config.render.resolution = resolution;
    }
    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(every) = args.snapshot_every {
        config.output.snapshot_every = every;
    }
    if args.verify_tiling {
        config.simulation.verify_tiling = true;
    }
    if config.render.resolution == 0 {
        bail!("Resolution must be at least 1 pixel");
    }

    log::info!("Starting Tessella");
    let mut session = HeadlessSession::new(&config);

    match args.scenario {
        Some(path) => {
            let scenario = ScenarioDefinition::from_file(&path)?;
            log::info!("Loaded scenario '{}' from {}", scenario.name, path.display());

            let mut executor = ScenarioExecutor::with_config(ScenarioExecutorConfig {
                verbose: args.verbose,
            });
            let report = executor.execute_scenario(&scenario, &mut session)?;

            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .context("Scenario path has no file name")?;
            let report_path = session.output_dir().join(format!("{}.json", stem));
            report.save_json(&report_path)?;
            log::info!("Report written: {}", report_path.display());

            if !report.passed {
                bail!(
                    "Scenario '{}' failed {} verification(s)",
                    scenario.name,
                    report.verification_failures.len()
                );
            }
        }
        None => {
            session.run(args.ticks)?;
            session.snapshot("final")?;
        }
    }

    Ok(())
}

fn list_materials() {
    let materials = Materials::new();
    println!("Materials:");
    for material in materials.iter() {
        let key = material
            .key
            .map(|key| key.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {:<8} {:?}, density {}",
            key, material.name, material.material_type, material.density
        );
    }
}
