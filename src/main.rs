// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{crate_version, Parser, Subcommand, ValueEnum};
use samplemap::config::Settings;
use samplemap::import::{import_samples, scan_directory, ImportReport};
use samplemap::{compute_layout, parser, pitch};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Maps sample files to keys, velocity layers and round robins."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Parses the given sample file names and prints what they encode.
    Parse {
        /// The file names to parse.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Imports every sample in a directory and prints the resulting key mapping.
    Scan {
        /// The directory holding the samples.
        path: String,
        /// The path to a settings file.
        #[arg[short, long]]
        config: Option<String>,
        /// The output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Prints the layout rectangles of one key of an imported directory.
    Layout {
        /// The directory holding the samples.
        path: String,
        /// The key, as a MIDI note number (36) or note name (C1).
        note: String,
        /// The path to a settings file.
        #[arg[short, long]]
        config: Option<String>,
        /// Overrides the configured layout width.
        #[arg(long)]
        width: Option<f64>,
        /// Overrides the configured layout height.
        #[arg(long)]
        height: Option<f64>,
        /// Overrides the configured slot and layer spacing.
        #[arg(long)]
        spacing: Option<f64>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { files } => {
            for info in parser::parse_batch(&files) {
                println!("{}", info);
            }
        }
        Commands::Scan {
            path,
            config,
            format,
        } => {
            let settings = Settings::load(config.as_deref().map(Path::new))?;
            let report = import_directory(&PathBuf::from(&path), &settings)?;

            match format {
                Format::Text => print_report(&report),
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                Format::Yaml => print!("{}", serde_yml::to_string(&report)?),
            }
        }
        Commands::Layout {
            path,
            note,
            config,
            width,
            height,
            spacing,
        } => {
            let midi_note = pitch::resolve(&note)
                .ok_or_else(|| format!("'{}' is not a MIDI note number or note name", note))?;
            let settings = Settings::load(config.as_deref().map(Path::new))?;
            let layout = settings.layout().with_overrides(width, height, spacing);
            let report = import_directory(&PathBuf::from(&path), &settings)?;

            let Some(mapping) = report.instrument.key(midi_note) else {
                println!(
                    "No samples mapped to {} ({}).",
                    pitch::note_name(midi_note),
                    midi_note
                );
                return Ok(());
            };

            let layouts = compute_layout(
                mapping.layers(),
                layout.width(),
                layout.height(),
                layout.spacing(),
            );
            for (layer, layer_layout) in mapping.layers().iter().zip(layouts.iter()) {
                println!(
                    "Layer {} v{}: {}",
                    layer.id(),
                    layer.velocity_range(),
                    layer_layout.layer_rect
                );
                if layer_layout.round_robin_count == 0 {
                    println!("  (no round robin slots)");
                    continue;
                }
                for (index, rect) in layer_layout.slot_rects.iter().enumerate() {
                    let sample = layer.sample(index).map_or("-", |s| s.file_name());
                    println!("  rr{} {}: {}", index + 1, rect, sample);
                }
            }
        }
    }

    Ok(())
}

fn import_directory(path: &Path, settings: &Settings) -> Result<ImportReport, Box<dyn Error>> {
    let files = scan_directory(path, &settings.import().extensions())?;
    Ok(import_samples(&files, settings.import())?)
}

fn print_report(report: &ImportReport) {
    if report.instrument.mapped_notes().is_empty() {
        println!("No samples mapped.");
    }

    for (note, mapping) in report.instrument.keys() {
        println!("{} ({}):", pitch::note_name(note), note);
        for layer in mapping.layers() {
            println!("- {}", layer);
        }
    }

    if !report.unassigned.is_empty() {
        println!("\nUnassigned (count: {}):", report.unassigned.len());
        for info in report.unassigned.iter() {
            println!("- {}", info.original_file_name);
        }
    }
}
