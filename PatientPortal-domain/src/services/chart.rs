use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::vital_sign::{BloodPressureValue, ChartPoint, ReadingType, VitalSignReading};

/// Errors raised while shaping readings into a chart series
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// A reading's value does not parse for its type
    #[error("Reading {id} has malformed value '{value}'")]
    MalformedValue { id: String, value: String },
}

/// Calendar-date label (UTC) used on the chart axis
pub fn format_date_label(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Build the plot series for one reading type.
///
/// Only readings of `reading_type` are kept, ordered by ascending reading
/// date. Equal dates keep their input order. The first value that does not
/// parse aborts the whole series.
pub fn build_chart_series(
    readings: &[VitalSignReading],
    reading_type: ReadingType,
) -> Result<Vec<ChartPoint>, ChartError> {
    let mut selected: Vec<&VitalSignReading> = readings
        .iter()
        .filter(|reading| reading.reading_type == reading_type)
        .collect();
    // sort_by_key is stable
    selected.sort_by_key(|reading| reading.reading_date);

    selected
        .into_iter()
        .map(|reading| to_chart_point(reading, reading_type))
        .collect()
}

fn to_chart_point(reading: &VitalSignReading, reading_type: ReadingType) -> Result<ChartPoint, ChartError> {
    let malformed = || ChartError::MalformedValue {
        id: reading.id.clone(),
        value: reading.reading_value.clone(),
    };
    let date = format_date_label(&reading.reading_date);

    match reading_type {
        ReadingType::BloodPressure => {
            let BloodPressureValue { systolic, diastolic } =
                reading.reading_value.parse().map_err(|_| malformed())?;
            Ok(ChartPoint::BloodPressure { date, systolic, diastolic })
        }
        _ => {
            let value: f64 = reading.reading_value.trim().parse().map_err(|_| malformed())?;
            if !value.is_finite() {
                return Err(malformed());
            }
            Ok(ChartPoint::Value { date, value })
        }
    }
}
