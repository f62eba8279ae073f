use galsim::{Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "galaxy.yaml")]
    file_name: String,
}

// load here to keep main clean
fn load_scenario_from_yaml() -> Result<ScenarioConfig> {
    let args = Args::parse();

    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(&args.file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening scenario file {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing scenario file {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let scenario_cfg = load_scenario_from_yaml()?;
    let scenario = Scenario::build_scenario(scenario_cfg).context("building scenario")?;

    let (final_system, diagnostics) = scenario.run();

    println!(
        "final state: t = {:.2} Myr, {} stars, {} black holes",
        final_system.t,
        final_system.stars().count(),
        final_system.black_holes().count(),
    );
    if let (Some(dispersion), Some(max_bh)) = (
        diagnostics.velocity_dispersions.last(),
        diagnostics.max_bh_masses.last(),
    ) {
        println!(
            "last record: velocity dispersion = {dispersion:.2} km/s, max BH mass = {max_bh:.2}"
        );
    }
    println!("{} diagnostic records collected", diagnostics.len());

    Ok(())
}
