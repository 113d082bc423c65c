use std::collections::BTreeMap;

use crate::entities::vital_sign::{LatestReadings, ReadingType, VitalSignReading};

/// One reading per type; a later reading in input order replaces an earlier one
pub fn aggregate_latest(readings: &[VitalSignReading]) -> LatestReadings {
    readings
        .iter()
        .map(|reading| (reading.reading_type, reading.clone()))
        .collect()
}

/// One reading per type, chosen by the most recent reading date.
///
/// Equal dates resolve to the reading that appears later in the input, so on
/// date-sorted input this agrees with [`aggregate_latest`].
pub fn aggregate_latest_by_date(readings: &[VitalSignReading]) -> LatestReadings {
    let mut latest = LatestReadings::new();
    for reading in readings {
        let newer = latest
            .get(&reading.reading_type)
            .map_or(true, |current| reading.reading_date >= current.reading_date);
        if newer {
            latest.insert(reading.reading_type, reading.clone());
        }
    }
    latest
}

/// Readings grouped per type, each group in input order
pub fn group_by_type(readings: &[VitalSignReading]) -> BTreeMap<ReadingType, Vec<VitalSignReading>> {
    let mut groups: BTreeMap<ReadingType, Vec<VitalSignReading>> = BTreeMap::new();
    for reading in readings {
        groups
            .entry(reading.reading_type)
            .or_default()
            .push(reading.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: &str, reading_type: ReadingType, date: &str) -> VitalSignReading {
        VitalSignReading {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            reading_type,
            reading_value: "1".to_string(),
            reading_unit: reading_type.default_unit().to_string(),
            reading_status: None,
            reading_date: date.parse().unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_latest(&[]).is_empty());
        assert!(aggregate_latest_by_date(&[]).is_empty());
        assert!(group_by_type(&[]).is_empty());
    }

    #[test]
    fn test_last_in_input_order_wins() {
        let readings = vec![
            reading("id1", ReadingType::HeartRate, "2024-01-02T00:00:00Z"),
            reading("id2", ReadingType::HeartRate, "2024-01-01T00:00:00Z"),
        ];

        let latest = aggregate_latest(&readings);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[&ReadingType::HeartRate].id, "id2");
    }

    #[test]
    fn test_absent_types_are_absent() {
        let readings = vec![
            reading("w", ReadingType::Weight, "2024-01-01T00:00:00Z"),
            reading("t", ReadingType::Temperature, "2024-01-01T00:00:00Z"),
        ];

        let latest = aggregate_latest(&readings);
        assert_eq!(latest.len(), 2);
        assert!(!latest.contains_key(&ReadingType::BloodPressure));
    }

    #[test]
    fn test_by_date_picks_most_recent() {
        let readings = vec![
            reading("new", ReadingType::HeartRate, "2024-01-02T00:00:00Z"),
            reading("old", ReadingType::HeartRate, "2024-01-01T00:00:00Z"),
            reading("tie", ReadingType::HeartRate, "2024-01-02T00:00:00Z"),
        ];

        let latest = aggregate_latest_by_date(&readings);
        assert_eq!(latest[&ReadingType::HeartRate].id, "tie");
    }

    #[test]
    fn test_group_by_type_keeps_input_order() {
        let readings = vec![
            reading("b2", ReadingType::BloodSugar, "2024-01-02T00:00:00Z"),
            reading("h1", ReadingType::HeartRate, "2024-01-01T00:00:00Z"),
            reading("b1", ReadingType::BloodSugar, "2024-01-01T00:00:00Z"),
        ];

        let groups = group_by_type(&readings);
        let ids: Vec<&str> = groups[&ReadingType::BloodSugar].iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b1"]);
        assert_eq!(groups[&ReadingType::HeartRate].len(), 1);
    }
}
