use crate::analyzers::{ExplorationAnalyzer, InsightsAnalyzer};
use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::generators::{GeneratorConfig, SyntheticGenerator};
use crate::models::SensorTable;
use crate::processors::DataPreparer;
use crate::readers::SensorReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::csv_writer::{format_value, CsvWriter};
use serde_json::json;
use std::path::Path;
use tracing::info;

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    // Debug output on stderr would garble the spinner
    let silent = cli.verbose;

    match cli.command {
        Commands::Generate {
            output_file,
            days,
            records_per_day,
            seed,
        } => {
            let mut generator_config = config.generator.clone();
            if let Some(days) = days {
                generator_config.num_days = days;
            }
            if let Some(records_per_day) = records_per_day {
                generator_config.records_per_day = records_per_day;
            }
            if let Some(seed) = seed {
                generator_config.seed = seed;
            }
            let output_file = output_file.unwrap_or_else(|| config.data_file.clone());

            generate(generator_config, &output_file, silent)
        }

        Commands::Explore {
            input_file,
            sample,
            json,
        } => {
            let input_file = input_file.unwrap_or_else(|| config.data_file.clone());
            let sample = sample.unwrap_or(config.display.sample_rows);
            explore(&input_file, sample, config.display.record_limit, json)
        }

        Commands::Prepare {
            input_file,
            output_file,
        } => {
            let input_file = input_file.unwrap_or_else(|| config.data_file.clone());
            prepare(&input_file, &output_file)
        }

        Commands::Dashboard { input_file, json } => {
            let input_file = input_file.unwrap_or_else(|| config.data_file.clone());
            dashboard(&input_file, config.display.chart_points, json)
        }
    }
}

fn load_or_missing(path: &Path) -> Result<SensorTable> {
    SensorReader::new().load(path)?.ok_or_else(|| {
        ProcessingError::MissingData(format!(
            "data file {} not found, run `generate` first",
            path.display()
        ))
    })
}

fn generate(
    generator_config: GeneratorConfig,
    output_file: &Path,
    silent: bool,
) -> Result<()> {
    info!(
        days = generator_config.num_days,
        records_per_day = generator_config.records_per_day,
        seed = generator_config.seed,
        "Generating synthetic sensor data"
    );

    let progress = ProgressReporter::new_spinner("Generating smart home sensor data...", silent);
    let generator = SyntheticGenerator::new(generator_config)?;
    let table = generator.generate()?;

    progress.set_message("Writing CSV...");
    CsvWriter::new().write_table(&table, output_file)?;
    progress.finish_with_message(&format!("Generated {} records", table.num_rows()));

    println!("Saved to: {}", output_file.display());
    println!("Total records: {}", table.num_rows());
    println!("Columns: {}", table.column_names().join(", "));
    println!("Missing values: {}", table.missing_count());
    println!("Duplicates: {}", table.duplicate_count());

    Ok(())
}

fn explore(input_file: &Path, sample: usize, record_limit: usize, as_json: bool) -> Result<()> {
    let table = load_or_missing(input_file)?;
    let summary = ExplorationAnalyzer::new().summarize(&table);

    if as_json {
        let output = json!({
            "summary": summary,
            "records": table.to_json_records(record_limit)?,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", summary.summary());

    if sample > 0 {
        let head = table.head(sample);
        println!("Sample Records (showing {} of {}):", head.num_rows(), table.num_rows());
        println!("  {}", head.column_names().join(", "));
        for row in head.rows() {
            let cells: Vec<String> = row.iter().map(format_value).collect();
            println!("  {}", cells.join(", "));
        }
    }

    Ok(())
}

fn prepare(input_file: &Path, output_file: &Path) -> Result<()> {
    let raw = load_or_missing(input_file)?;
    let prepared = DataPreparer::new().prepare(&raw)?;

    CsvWriter::new().write_table(&prepared.table, output_file)?;

    println!("Raw records: {}", raw.num_rows());
    println!("Missing values filled: {}", prepared.missing_values_filled);
    println!("Duplicates removed: {}", prepared.duplicates_removed);
    println!("Clean records: {}", prepared.table.num_rows());
    if let Some(threshold) = prepared.peak_threshold {
        println!("Peak usage threshold: {:.2} kWh", threshold);
    }
    println!("Saved to: {}", output_file.display());

    Ok(())
}

fn dashboard(input_file: &Path, chart_points: usize, as_json: bool) -> Result<()> {
    let raw = load_or_missing(input_file)?;
    let prepared = DataPreparer::new().prepare(&raw)?;

    let analyzer = InsightsAnalyzer::with_chart_points(chart_points);
    let insights = analyzer.summarize(&prepared.table)?;
    let chart_data = analyzer.chart_series(&prepared.table)?;

    if as_json {
        let output = json!({
            "insights": insights,
            "chart_data": chart_data,
            "duplicates_removed": prepared.duplicates_removed,
            "total_records": prepared.table.num_rows(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("=== Dashboard ===");
    println!(
        "Records: {} ({} duplicates removed)\n",
        prepared.table.num_rows(),
        prepared.duplicates_removed
    );
    println!("{}", insights.summary());

    println!("\nAverage Energy by Hour:");
    for (hour, energy) in chart_data
        .hourly_energy
        .hours
        .iter()
        .zip(&chart_data.hourly_energy.values)
    {
        println!("  {:02}:00  {:.2} kWh", hour, energy);
    }

    println!("\nAverage Energy by Day:");
    for (day, energy) in chart_data
        .daily_energy
        .days
        .iter()
        .zip(&chart_data.daily_energy.values)
    {
        match energy {
            Some(energy) => println!("  {:<9}  {:.2} kWh", day, energy),
            None => println!("  {:<9}  no data", day),
        }
    }

    Ok(())
}
