// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The CLI (command-line interface) tool turns a MIDI file into G-code.

use anyhow::Context;
use clap::Parser;
use motorsong::{Converter, IOHelper};
use std::{path::PathBuf, time::Instant};

#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Standard MIDI File to play
    input: PathBuf,

    /// Where to write the G-code program
    output: PathBuf,

    /// YAML machine description (defaults to the reference machine)
    #[clap(short = 'c', long, value_parser)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short = 'd', long, value_parser)]
    debug: bool,

    /// Log only warnings and errors
    #[clap(short = 'q', long, value_parser)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let input = std::path::absolute(&args.input)
        .with_context(|| format!("couldn't resolve {}", args.input.display()))?;
    let output = std::path::absolute(&args.output)
        .with_context(|| format!("couldn't resolve {}", args.output.display()))?;
    let config = match &args.config {
        Some(path) => Some(
            std::path::absolute(path)
                .with_context(|| format!("couldn't resolve {}", path.display()))?,
        ),
        None => None,
    };

    let config = IOHelper::machine_config_from_yaml_file(config.as_deref())?;
    let start_instant = Instant::now();
    Converter::new_with(config).convert_file(&input, &output)?;
    log::debug!("Conversion time: {:.2?}", start_instant.elapsed());
    Ok(())
}
