// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dentaview command-line front end. Results are printed to stdout as JSON;
// logs go to stderr.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dentaview_analysis::camera::{image_statistics, score_profiles};
use dentaview_analysis::{
    PresetCategory, analyze_shade, auto_enhance, detect_features, detect_profile, enhance,
    find_preset, list_presets, photo, presets_in,
};
use dentaview_core::error::Result;
use dentaview_core::human_errors::humanize_error;
use dentaview_core::{DentaviewError, EngineConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dentaview")]
#[command(version, about = "Dental photo analysis and enhancement", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect teeth, gum line, smile zones, plaque and restorations
    Detect {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Enhance a photo and write the result
    Enhance {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file; format follows the extension
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Preset id (defaults to the configured preset)
        #[arg(short, long, value_name = "ID")]
        preset: Option<String>,

        /// Skip feature detection; contrast uses the estimated gum band
        #[arg(long)]
        no_detect: bool,

        /// Overlay the matched camera profile's optimizations
        #[arg(long)]
        auto: bool,
    },

    /// Match the photo against the camera profile catalog
    Profile {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Classify tooth pixels against the VITA shade guide
    Shade {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// List enhancement presets
    Presets {
        /// Only presets of this category (clinical, aesthetic, diagnostic)
        #[arg(long, value_name = "CATEGORY")]
        category: Option<PresetCategory>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => fail(&err),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command, &config) {
        fail(&err);
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

fn fail(err: &DentaviewError) -> ! {
    let human = humanize_error(err);
    eprintln!("Error: {}", human.message);
    eprintln!("  {}", human.suggestion);
    std::process::exit(1);
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(command: Commands, config: &EngineConfig) -> Result<()> {
    match command {
        Commands::Detect { input } => {
            let img = photo::open(&input)?;
            print_json(&detect_features(&img))
        }

        Commands::Enhance {
            input,
            output,
            preset,
            no_detect,
            auto,
        } => {
            let img = photo::open(&input)?;
            let preset_id = preset.unwrap_or_else(|| config.default_preset.clone());

            let summary = if auto {
                let config = EngineConfig {
                    default_preset: preset_id,
                    auto_camera_profile: true,
                    detect_before_enhance: !no_detect,
                    ..config.clone()
                };
                let outcome = auto_enhance(&img, &config)?;
                photo::save(&outcome.image, &output)?;
                serde_json::json!({
                    "output": output,
                    "preset": outcome.preset,
                    "profile": outcome.profile,
                    "options": outcome.options,
                    "detected": outcome.detection.is_some(),
                })
            } else {
                let preset = find_preset(&preset_id)?;
                let detection = (!no_detect).then(|| detect_features(&img));
                let enhanced = enhance(&img, detection.as_ref(), &preset.settings);
                photo::save(&enhanced, &output)?;
                serde_json::json!({
                    "output": output,
                    "preset": preset.id,
                    "options": preset.settings,
                    "detected": detection.is_some(),
                })
            };

            info!(output = %output.display(), "Enhanced photo written");
            print_json(&summary)
        }

        Commands::Profile { input } => {
            let img = photo::open(&input)?;
            let stats = image_statistics(&img);
            let matched = detect_profile(&img);
            print_json(&serde_json::json!({
                "profile": matched,
                "statistics": stats,
                "noise_level": stats.noise_level(),
                "color_cast": stats.color_cast(),
                "specular_level": stats.specular_level(),
                "scores": score_profiles(&stats),
            }))
        }

        Commands::Shade { input } => {
            let img = photo::open(&input)?;
            match analyze_shade(&img) {
                Some(analysis) => print_json(&analysis),
                None => {
                    info!("No tooth-coloured pixels found");
                    print_json(&serde_json::Value::Null)
                }
            }
        }

        Commands::Presets { category } => match category {
            Some(category) => print_json(&presets_in(category).collect::<Vec<_>>()),
            None => print_json(list_presets()),
        },
    }
}
