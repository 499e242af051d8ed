//! Command implementations for the bottom elevation CLI.
//!
//! Provides subcommands for computing bottom elevation of a bathymetric
//! survey and for inspecting the water level loggers.

use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod compute;
pub mod loggers;

/// Input files shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct LoggerInputs {
    /// Fairway reference points: longitude;latitude;id;distance
    #[arg(short = 'f', long, default_value = "fairway_points.csv")]
    pub fairway_points_filepath: PathBuf,

    /// Logger locations: longitude;latitude;name
    #[arg(short = 'l', long, default_value = "logger_points.csv")]
    pub logger_points_filepath: PathBuf,

    /// Logger readings: name;timestamp;elevation, or a workbook with one sheet per logger
    #[arg(short = 'x', long, default_value = "logger_data.csv")]
    pub logger_data_filepath: PathBuf,

    /// Project every point into this UTM zone instead of its own
    #[arg(long)]
    pub utm_zone: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute water and bottom elevation for every sounding
    Compute {
        /// Directory with bathymetry *.csv files
        #[arg(short = 'b', long, default_value = "bathymetry_data/")]
        bathymetry_directory: PathBuf,

        #[command(flatten)]
        inputs: LoggerInputs,

        /// Output path for the computed soundings
        #[arg(short = 'o', long, default_value = "output.csv")]
        output_filepath: PathBuf,

        /// JSON file with engine settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum gap between logger readings, in minutes
        #[arg(long)]
        switch_off_minutes: Option<i64>,

        /// Leave soundings outside the logger range without a result
        #[arg(long)]
        reject_extrapolation: bool,

        /// Evaluate soundings on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// List loggers with their shore distance and reading span
    Loggers {
        #[command(flatten)]
        inputs: LoggerInputs,

        /// Also report whether each logger is usable at this time
        #[arg(long)]
        at: Option<String>,

        /// Maximum gap between logger readings, in minutes
        #[arg(long)]
        switch_off_minutes: Option<i64>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Compute {
            bathymetry_directory,
            inputs,
            output_filepath,
            config,
            switch_off_minutes,
            reject_extrapolation,
            sequential,
        } => {
            let overrides = compute::Overrides {
                switch_off_minutes,
                reject_extrapolation,
                sequential,
            };
            let config = compute::resolve_config(config.as_deref(), &overrides)?;
            compute::run_compute(&bathymetry_directory, &inputs, &output_filepath, &config)?;
            Ok(())
        }
        Command::Loggers {
            inputs,
            at,
            switch_off_minutes,
        } => {
            let at = at
                .as_deref()
                .map(bathy_utils::dates::parse_timestamp)
                .transpose()?;
            loggers::run_loggers(&inputs, at, switch_off_minutes)
        }
    }
}
