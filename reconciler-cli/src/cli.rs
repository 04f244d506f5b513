use std::fs;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use inquire::CustomType;
use log::info;

use reconciler_core::{Observation, Reconciler, ReconcilerConfig, SourceWeights, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-report", version, about = "Multi-source weather report CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively configure source trust weights.
    Configure,

    /// Reconcile two observation files into one weather report.
    Merge {
        /// JSON observation produced by the primary (API) source.
        obs1: String,

        /// JSON observation produced by the secondary (scraped) source.
        obs2: String,

        /// Override configured weights, e.g. "0.7,0.3".
        #[arg(long)]
        weights: Option<String>,

        /// Print the merged report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Merge { obs1, obs2, weights, json } => {
                merge(&obs1, &obs2, weights.as_deref(), json)
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = ReconcilerConfig::load()?;

    let source1 = CustomType::<f64>::new("Trust weight for the primary source [0-1]:")
        .with_default(config.weights.source1)
        .prompt()?;
    let source2 = CustomType::<f64>::new("Trust weight for the secondary source [0-1]:")
        .with_default(config.weights.source2)
        .prompt()?;

    config.weights = SourceWeights::new(source1, source2)?;
    config.save()?;

    println!("Saved weights to {}", ReconcilerConfig::config_file_path()?.display());

    Ok(())
}

fn merge(obs1_path: &str, obs2_path: &str, weights: Option<&str>, json: bool) -> Result<()> {
    let mut config = ReconcilerConfig::load()?;

    if let Some(raw) = weights {
        config.weights = parse_weights(raw)?;
    }

    let obs1 = read_observation(obs1_path)?;
    let obs2 = read_observation(obs2_path)?;

    info!("reconciling {obs1_path} and {obs2_path}");

    let reconciler = Reconciler::new(config);
    let report = reconciler.reconcile(&obs1, &obs2);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render(&report));
    }

    Ok(())
}

fn read_observation(path: &str) -> Result<Observation> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read observation file: {path}"))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse observation JSON: {path}"))
}

fn parse_weights(raw: &str) -> Result<SourceWeights> {
    let (w1, w2) = raw.split_once(',').ok_or_else(|| {
        anyhow!("Invalid weights '{raw}'. Expected two comma-separated numbers, e.g. 0.7,0.3.")
    })?;

    let w1: f64 = w1.trim().parse().with_context(|| format!("Invalid weight '{w1}'"))?;
    let w2: f64 = w2.trim().parse().with_context(|| format!("Invalid weight '{w2}'"))?;

    Ok(SourceWeights::new(w1, w2)?)
}
