mod render;
mod simulate;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fretline_core::chart::{
    assign_lanes, load_chart, prepare_session, ChartSource, ChartSummary, LoadedChart, PitchRange,
};
use fretline_core::config::GameConfig;
use log::LevelFilter;

use crate::simulate::SimulateOptions;

#[derive(Debug, Parser)]
#[command(name = "fretline")]
#[command(about = "Three-lane rhythm game driven by MIDI charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// JSON file overriding the default session, judge, playfield and synth settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Keep only pitches 40..=84 before assigning lanes.
    #[arg(long, global = true)]
    guitar_range: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a chart and write its notes with lanes as JSON.
    Dump {
        chart: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a timing summary of a chart.
    Inspect { chart: PathBuf },
    /// Play a whole session with an autoplayer and report the result.
    Simulate {
        chart: PathBuf,
        /// Autoplayer timing error in milliseconds; negative presses early.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset_ms: f64,
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,
        /// Follow the wall clock instead of stepping as fast as possible.
        #[arg(long)]
        realtime: bool,
        /// Play the session through the default output device.
        #[arg(long)]
        audio: bool,
        #[arg(long)]
        json: bool,
    },
    /// Render the session's synthesized audio to a WAV file.
    Render {
        chart: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };
    if cli.guitar_range {
        config.session.pitch_range = Some(PitchRange::GUITAR);
    }

    match cli.command {
        Command::Dump { chart, output } => {
            let loaded = load(&chart)?;
            let notes = assign_lanes(&loaded.notes, config.session.pitch_range);
            let json = serde_json::to_string_pretty(&notes).context("failed to serialize notes")?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed to write: {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Inspect { chart } => {
            let loaded = load(&chart)?;
            if let ChartSource::Fallback { reason } = &loaded.source {
                println!("Chart could not be decoded ({reason}); showing demonstration notes.");
            }
            let notes = assign_lanes(&loaded.notes, config.session.pitch_range);
            print!("{}", ChartSummary::from_notes(&notes));
        }
        Command::Simulate {
            chart,
            offset_ms,
            fps,
            realtime,
            audio,
            json,
        } => {
            let loaded = load(&chart)?;
            let plan = prepare_session(&loaded.notes, &config.session);
            let options = SimulateOptions {
                offset_seconds: offset_ms / 1000.0,
                fps,
                realtime,
                audio,
            };
            let report = simulate::run_simulation(plan, &config, &options)?;
            if json {
                let json =
                    serde_json::to_string_pretty(&report).context("failed to serialize report")?;
                println!("{json}");
            } else {
                print!("{report}");
            }
        }
        Command::Render { chart, output } => {
            let loaded = load(&chart)?;
            let plan = prepare_session(&loaded.notes, &config.session);
            render::render_wav(&plan, &config.synth, &output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn load(path: &Path) -> anyhow::Result<LoadedChart> {
    load_chart(path).with_context(|| format!("failed to load chart: {}", path.display()))
}
