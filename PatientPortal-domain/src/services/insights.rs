use chrono::Utc;

use crate::entities::insights::{BloodPressureCategory, BloodPressureInsights, BmiCategory};
use crate::entities::vital_sign::{BloodPressureValue, ReadingType, VitalSignReading};
use crate::services::chart::ChartError;
use crate::services::errors::ServiceError;

/// Categorize blood pressure based on measurements
pub fn categorize_blood_pressure(systolic: u16, diastolic: u16) -> BloodPressureCategory {
    if systolic >= 180 || diastolic >= 120 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140 || diastolic >= 90 {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130 || diastolic >= 80 {
        BloodPressureCategory::Hypertension1
    } else if systolic >= 120 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Aggregate the blood pressure readings among `readings`.
///
/// Readings of other types are ignored. Fails with `InsufficientData` when no
/// blood pressure reading is present, and with `MalformedReading` on the first
/// value that does not parse.
pub fn calculate_blood_pressure_insights(
    readings: &[VitalSignReading],
    period_days: u32,
) -> Result<BloodPressureInsights, ServiceError> {
    let values = readings
        .iter()
        .filter(|reading| reading.reading_type == ReadingType::BloodPressure)
        .map(|reading| {
            reading
                .reading_value
                .parse::<BloodPressureValue>()
                .map_err(|_| ChartError::MalformedValue {
                    id: reading.id.clone(),
                    value: reading.reading_value.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(ServiceError::InsufficientData(
            "No blood pressure readings available to generate insights".to_string(),
        ));
    }

    let count = values.len() as f64;
    let avg_systolic = values.iter().map(|v| f64::from(v.systolic)).sum::<f64>() / count;
    let avg_diastolic = values.iter().map(|v| f64::from(v.diastolic)).sum::<f64>() / count;

    let max_systolic = values.iter().map(|v| v.systolic).max().unwrap_or_default();
    let max_diastolic = values.iter().map(|v| v.diastolic).max().unwrap_or_default();
    let min_systolic = values.iter().map(|v| v.systolic).min().unwrap_or_default();
    let min_diastolic = values.iter().map(|v| v.diastolic).min().unwrap_or_default();

    // Category of the averages, truncated to whole mmHg
    let category = categorize_blood_pressure(avg_systolic as u16, avg_diastolic as u16);

    Ok(BloodPressureInsights {
        avg_systolic: round_one_decimal(avg_systolic),
        avg_diastolic: round_one_decimal(avg_diastolic),
        max_systolic,
        max_diastolic,
        min_systolic,
        min_diastolic,
        category,
        reading_count: values.len(),
        period_days,
        generated_at: Utc::now(),
    })
}

/// Body mass index (kg/m²) to one decimal; `None` unless both inputs are positive
pub fn calculate_bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let (height_cm, weight_kg) = (height_cm?, weight_kg?);
    if !(height_cm > 0.0 && weight_kg > 0.0) || !height_cm.is_finite() || !weight_kg.is_finite() {
        return None;
    }

    let height_m = height_cm / 100.0;
    Some(round_one_decimal(weight_kg / (height_m * height_m)))
}

/// WHO adult BMI category
pub fn categorize_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}
