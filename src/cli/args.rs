use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sensor-data-processor")]
#[command(about = "Smart home sensor data generator, cleaner and dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a synthetic sensor dataset
    Generate {
        #[arg(short, long, help = "Output CSV file [default: configured data file]")]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Number of days to simulate")]
        days: Option<u32>,

        #[arg(long, help = "Hourly records per day")]
        records_per_day: Option<u32>,

        #[arg(long, help = "Random seed")]
        seed: Option<u64>,
    },

    /// Summarize the raw, uncleaned data
    Explore {
        #[arg(short, long, help = "Input CSV file [default: configured data file]")]
        input_file: Option<PathBuf>,

        #[arg(short, long, help = "Sample rows to print [default: configured sample rows]")]
        sample: Option<usize>,

        #[arg(long, help = "Print the raw summary and leading records as JSON")]
        json: bool,
    },

    /// Clean the data and write the prepared table
    Prepare {
        #[arg(short, long, help = "Input CSV file [default: configured data file]")]
        input_file: Option<PathBuf>,

        #[arg(short, long, help = "Output CSV file for the cleaned table")]
        output_file: PathBuf,
    },

    /// Clean the data and show dashboard insights
    Dashboard {
        #[arg(short, long, help = "Input CSV file [default: configured data file]")]
        input_file: Option<PathBuf>,

        #[arg(long, help = "Print insights and chart series as JSON")]
        json: bool,
    },
}
