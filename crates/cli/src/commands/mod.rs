//! CLI commands for the prop arbitrage scanner.

pub mod evaluate;
pub mod normalize;
pub mod scan;

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use prop_arb_core::{AppConfig, ConfigLoader};

pub use evaluate::{run_evaluate, EvaluateArgs};
pub use normalize::{run_normalize, NormalizeArgs};
pub use scan::{run_scan, ScanArgs};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Loads config from an explicit file, or from the default location plus
/// environment when none is given.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => ConfigLoader::load_from(path),
        None => ConfigLoader::load(),
    }
}
