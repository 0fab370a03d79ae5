use serde::Serialize;

/// Dashboard scalars computed from a cleaned table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_humidity: f64,
    pub total_energy: f64,
    pub avg_energy: f64,
    pub motion_detections: u64,
    pub motion_percentage: f64,
    pub peak_hour: u32,
    pub appliances_on: u64,
    pub appliance_on_percentage: f64,
}

impl Insights {
    pub fn summary(&self) -> String {
        format!(
            "Temperature: avg {:.1}°C (min {:.1}°C, max {:.1}°C)\n\
            Humidity: avg {:.1}%\n\
            Energy: {:.2} kWh total, {:.2} kWh avg per reading\n\
            Motion: {} detections ({:.1}%)\n\
            Peak Hour: {:02}:00\n\
            Appliances ON: {} ({:.1}%)",
            self.avg_temperature,
            self.min_temperature,
            self.max_temperature,
            self.avg_humidity,
            self.total_energy,
            self.avg_energy,
            self.motion_detections,
            self.motion_percentage,
            self.peak_hour,
            self.appliances_on,
            self.appliance_on_percentage
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSeries {
    pub timestamps: Vec<Option<String>>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyEnergy {
    pub hours: Vec<u32>,
    pub values: Vec<f64>,
}

/// Mean energy per weekday, `values[i]` belongs to `days[i]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEnergy {
    pub days: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub temperature: TemperatureSeries,
    pub hourly_energy: HourlyEnergy,
    pub daily_energy: DailyEnergy,
}

/// `describe()`-style statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub data_type: String,
    pub missing: usize,
    pub numeric_summary: Option<NumericSummary>,
}

/// Exploration view of an uncleaned table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSummary {
    pub total_records: usize,
    pub total_columns: usize,
    pub columns: Vec<ColumnProfile>,
    pub missing_count: usize,
    pub duplicate_count: usize,
}

impl RawSummary {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Raw Data Summary ===\n");
        summary.push_str(&format!("Total Records: {}\n", self.total_records));
        summary.push_str(&format!("Total Columns: {}\n", self.total_columns));
        summary.push_str(&format!("Missing Values: {}\n", self.missing_count));
        summary.push_str(&format!("Duplicate Rows: {}\n", self.duplicate_count));

        summary.push_str("\nColumns:\n");
        for column in &self.columns {
            summary.push_str(&format!(
                "  {:<18} {:<9} missing={}\n",
                column.name, column.data_type, column.missing
            ));
        }

        let numeric: Vec<_> = self
            .columns
            .iter()
            .filter_map(|c| c.numeric_summary.as_ref().map(|s| (&c.name, s)))
            .collect();

        if !numeric.is_empty() {
            summary.push_str("\nNumeric Summary:\n");
            summary.push_str(&format!(
                "  {:<18} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
                "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            ));
            for (name, stats) in numeric {
                summary.push_str(&format!(
                    "  {:<18} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
                    name,
                    stats.count,
                    format_stat(stats.mean),
                    format_stat(stats.std),
                    format_stat(stats.min),
                    format_stat(stats.q25),
                    format_stat(stats.median),
                    format_stat(stats.q75),
                    format_stat(stats.max)
                ));
            }
        }

        summary
    }
}

fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{:.3}", v))
}
