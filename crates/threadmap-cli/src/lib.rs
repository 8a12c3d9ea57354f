//! Threadmap CLI library
//!
//! This module contains the core CLI logic: read a scene, lay it out, and
//! write a placement report.

pub mod error_adapter;
pub mod report;
pub mod scene;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::fs;

use log::{debug, info};

use threadmap::layout::{Engine, RecomputeOptions};

use report::Report;
use scene::Scene;

/// Run the Threadmap CLI application
///
/// This function lays out the scene named by `args.input` and writes the
/// resulting report to `args.output`.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scene errors
/// - Report serialization errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let options = recompute_options(args, RecomputeOptions::from_config(app_config.layout()));
    debug!(options:?; "Recompute options");

    let source = fs::read_to_string(&args.input)?;
    let mut forest = Scene::parse(&source)
        .and_then(|scene| scene.build())
        .map_err(|err| CliError::new_scene_error(err, source.as_str()))?;

    let engine = Engine::new(app_config.layout().clone());
    let heights = forest.heights().clone();
    let stats = engine.recompute(forest.tree_mut(), &heights, options);
    let layout = engine.placements(forest.tree(), &heights);

    let report = Report::new(&forest, &layout, stats).to_toml()?;
    fs::write(&args.output, report)?;

    info!(output_file = args.output; "Layout report written");

    Ok(())
}

/// Applies command-line centering overrides on top of the configured options.
fn recompute_options(args: &Args, configured: RecomputeOptions) -> RecomputeOptions {
    let mut options = configured;
    if args.center_parents {
        options = options.with_center_parents(true);
    }
    if let Some(passes) = args.centering_passes {
        options = options.with_centering_passes(passes);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            input: "scene.toml".to_string(),
            output: "layout.toml".to_string(),
            config: None,
            center_parents: false,
            centering_passes: None,
            log_level: "off".to_string(),
        }
    }

    #[test]
    fn test_overrides_keep_configured_options() {
        let configured = RecomputeOptions::new()
            .with_center_parents(true)
            .with_centering_passes(3);
        assert_eq!(recompute_options(&args(), configured), configured);
    }

    #[test]
    fn test_overrides_apply() {
        let args = Args {
            center_parents: true,
            centering_passes: Some(5),
            ..args()
        };
        let options = recompute_options(&args, RecomputeOptions::new());
        assert!(options.center_parents());
        assert_eq!(options.centering_passes(), 5);
    }
}
