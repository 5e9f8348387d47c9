//! minecrafter CLI
//!
//! `minecrafter <mesh file> <out file>`: voxelize a mesh onto the
//! 128-block world grid and write the voxel tree.
//!
//! Author: Moroya Sakamoto

#![allow(clippy::uninlined_format_args)]

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use minecrafter::prelude::*;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "minecrafter")]
#[command(author = "Moroya Sakamoto")]
#[command(version = minecrafter::VERSION)]
#[command(about = "Voxelize a triangle mesh for block-world construction", long_about = None)]
struct Cli {
    /// Input mesh (.obj or .ply)
    input: PathBuf,
    /// Output voxel tree file
    output: PathBuf,
}

#[cfg(feature = "cli")]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    // Wrong arity prints usage and exits with a non-zero status
    let cli = Cli::parse();

    match convert_file(&cli.input, &cli.output, &ConvertConfig::default()) {
        Ok(summary) => {
            log::info!(
                "Converted {} -> {} ({} faces, primary axis {}, range {})",
                cli.input.display(),
                cli.output.display(),
                summary.face_count,
                summary.primary_axis,
                summary.normalized_range
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI not enabled. Build with --features cli");
    std::process::exit(1);
}
