use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use validator::Validate;

use crate::entities::conversions;
use crate::entities::insights::BloodPressureInsights;
use crate::entities::vital_sign::{
    BloodPressureValue, ChartPoint, CreateVitalSignRequest, LatestReadings, ReadingType,
    VitalSignCard, VitalSignReading, VitalSignsDashboard,
};
use crate::services::chart::build_chart_series;
use crate::services::errors::ServiceError;
use crate::services::insights::calculate_blood_pressure_insights;
use crate::services::latest::aggregate_latest;
use patient_portal_data::gateway::HttpGateway;
use patient_portal_data::repository::{HistoryFilter, VitalSignsRepository, VitalSignsRepositoryTrait};

/// Window of blood pressure history summarized on the dashboard
pub const DASHBOARD_INSIGHT_DAYS: u32 = 30;

/// Longest insights window accepted
pub const MAX_TIMEFRAME_DAYS: u32 = 365;

/// Optional narrowing of a history request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryQuery {
    pub reading_type: Option<ReadingType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl HistoryQuery {
    fn to_filter(&self) -> Result<HistoryFilter, ServiceError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ServiceError::ValidationError(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }

        Ok(HistoryFilter {
            reading_type: self.reading_type.map(|t| t.as_str().to_string()),
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Plausible bounds for single-valued reading types
fn plausible_range(reading_type: ReadingType) -> Option<(f64, f64)> {
    match reading_type {
        ReadingType::BloodPressure => None,
        ReadingType::HeartRate => Some((20.0, 250.0)),
        ReadingType::Weight => Some((1.0, 500.0)),
        ReadingType::Temperature => Some((25.0, 45.0)),
        ReadingType::BloodSugar => Some((10.0, 1000.0)),
        ReadingType::OxygenSaturation => Some((50.0, 100.0)),
    }
}

fn validate_reading_value(reading_type: ReadingType, raw: &str) -> Result<(), ServiceError> {
    let invalid = |msg: String| Err(ServiceError::ValidationError(msg));

    match plausible_range(reading_type) {
        None => {
            let Ok(BloodPressureValue { systolic, diastolic }) = raw.parse::<BloodPressureValue>() else {
                return invalid("Blood pressure must be in the form systolic/diastolic, e.g. 120/80".to_string());
            };
            if !(40..=300).contains(&systolic) {
                return invalid("Systolic must be between 40 and 300".to_string());
            }
            if !(20..=200).contains(&diastolic) {
                return invalid("Diastolic must be between 20 and 200".to_string());
            }
            if systolic <= diastolic {
                return invalid("Systolic pressure must be greater than diastolic pressure".to_string());
            }
            Ok(())
        }
        Some((min, max)) => {
            let label = reading_type.label();
            let value = match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => return invalid(format!("{} must be a number", label)),
            };
            if value < min || value > max {
                return invalid(format!(
                    "{} must be between {} and {} {}",
                    label,
                    min,
                    max,
                    reading_type.default_unit()
                ));
            }
            Ok(())
        }
    }
}

fn build_card(reading: &VitalSignReading) -> VitalSignCard {
    let status = reading.status_class();
    VitalSignCard {
        reading_type: reading.reading_type,
        label: reading.reading_type.label(),
        value: reading.reading_value.clone(),
        unit: reading.reading_unit.clone(),
        status,
        color: status.display_color().to_string(),
        reading_date: reading.reading_date,
        notes: reading.notes.clone(),
    }
}

/// Trait for vital signs service operations
#[async_trait]
pub trait VitalSignsServiceTrait: Send + Sync {
    /// Validate a reading submission
    fn validate_create_request(&self, request: &CreateVitalSignRequest) -> Result<(), ServiceError>;

    /// Latest reading per type
    async fn get_latest_readings(&self, patient_id: &str) -> Result<LatestReadings, ServiceError>;

    /// Cards for every type with data plus the blood pressure trend
    async fn get_dashboard(&self, patient_id: &str) -> Result<VitalSignsDashboard, ServiceError>;

    /// Reading history, ordered by ascending reading date
    async fn get_history(
        &self,
        patient_id: &str,
        query: HistoryQuery,
    ) -> Result<Vec<VitalSignReading>, ServiceError>;

    /// Plot series for one reading type
    async fn get_chart_series(
        &self,
        patient_id: &str,
        reading_type: ReadingType,
    ) -> Result<Vec<ChartPoint>, ServiceError>;

    /// Blood pressure insights over the last `timeframe_days` days
    async fn get_blood_pressure_insights(
        &self,
        patient_id: &str,
        timeframe_days: u32,
    ) -> Result<BloodPressureInsights, ServiceError>;

    /// A single reading by id
    async fn get_reading_by_id(&self, id: &str) -> Result<VitalSignReading, ServiceError>;

    /// Validate and submit a new reading
    async fn record_reading(&self, request: CreateVitalSignRequest) -> Result<VitalSignReading, ServiceError>;
}

/// Vital signs service over a repository
pub struct VitalSignsService<R: VitalSignsRepositoryTrait> {
    repository: R,
}

impl<R: VitalSignsRepositoryTrait> VitalSignsService<R> {
    /// Create a new vital signs service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: VitalSignsRepositoryTrait> VitalSignsServiceTrait for VitalSignsService<R> {
    fn validate_create_request(&self, request: &CreateVitalSignRequest) -> Result<(), ServiceError> {
        request
            .validate()
            .map_err(|errors| ServiceError::from_validation(&errors))?;

        if let Some(reading_date) = request.reading_date {
            if reading_date > Utc::now() {
                return Err(ServiceError::ValidationError(
                    "Reading date cannot be in the future".to_string(),
                ));
            }
        }

        validate_reading_value(request.reading_type, &request.reading_value)
    }

    async fn get_latest_readings(&self, patient_id: &str) -> Result<LatestReadings, ServiceError> {
        let records = self.repository.get_latest(patient_id).await?;
        let readings = conversions::convert_to_domain_readings(records);
        Ok(aggregate_latest(&readings))
    }

    async fn get_dashboard(&self, patient_id: &str) -> Result<VitalSignsDashboard, ServiceError> {
        let now = Utc::now();
        let bp_filter = HistoryFilter {
            reading_type: Some(ReadingType::BloodPressure.as_str().to_string()),
            start_date: Some(now - Duration::days(i64::from(DASHBOARD_INSIGHT_DAYS))),
            end_date: None,
        };

        let (latest, bp_history) = futures::try_join!(
            self.repository.get_latest(patient_id),
            self.repository.get_history(patient_id, bp_filter),
        )?;

        let latest = aggregate_latest(&conversions::convert_to_domain_readings(latest));
        let cards: Vec<VitalSignCard> = ReadingType::ALL
            .iter()
            .filter_map(|reading_type| latest.get(reading_type))
            .map(build_card)
            .collect();

        let bp_history = conversions::convert_to_domain_readings(bp_history);
        let blood_pressure = match calculate_blood_pressure_insights(&bp_history, DASHBOARD_INSIGHT_DAYS) {
            Ok(insights) => Some(insights),
            Err(ServiceError::InsufficientData(_)) => None,
            Err(e) => {
                warn!("Omitting blood pressure trend for patient {}: {}", patient_id, e);
                None
            }
        };

        debug!("Dashboard for patient {} has {} cards", patient_id, cards.len());

        Ok(VitalSignsDashboard {
            patient_id: patient_id.to_string(),
            cards,
            blood_pressure,
            generated_at: now,
        })
    }

    async fn get_history(
        &self,
        patient_id: &str,
        query: HistoryQuery,
    ) -> Result<Vec<VitalSignReading>, ServiceError> {
        let filter = query.to_filter()?;
        let records = self.repository.get_history(patient_id, filter).await?;

        let mut readings = conversions::convert_to_domain_readings(records);
        readings.sort_by_key(|reading| reading.reading_date);
        Ok(readings)
    }

    async fn get_chart_series(
        &self,
        patient_id: &str,
        reading_type: ReadingType,
    ) -> Result<Vec<ChartPoint>, ServiceError> {
        let query = HistoryQuery {
            reading_type: Some(reading_type),
            ..Default::default()
        };
        let readings = self.get_history(patient_id, query).await?;
        Ok(build_chart_series(&readings, reading_type)?)
    }

    async fn get_blood_pressure_insights(
        &self,
        patient_id: &str,
        timeframe_days: u32,
    ) -> Result<BloodPressureInsights, ServiceError> {
        if timeframe_days == 0 {
            return Err(ServiceError::ValidationError(
                "Timeframe must be at least one day".to_string(),
            ));
        }
        let timeframe_days = timeframe_days.min(MAX_TIMEFRAME_DAYS);

        let query = HistoryQuery {
            reading_type: Some(ReadingType::BloodPressure),
            start_date: Some(Utc::now() - Duration::days(i64::from(timeframe_days))),
            end_date: None,
        };
        let readings = self.get_history(patient_id, query).await?;
        calculate_blood_pressure_insights(&readings, timeframe_days)
    }

    async fn get_reading_by_id(&self, id: &str) -> Result<VitalSignReading, ServiceError> {
        let not_found = || ServiceError::NotFound(format!("Vital sign reading with ID {} not found", id));

        let record = self.repository.get_by_id(id).await?.ok_or_else(not_found)?;
        conversions::convert_to_domain_reading(record).map_err(|e| {
            warn!("Reading {} has an unsupported type: {}", id, e);
            not_found()
        })
    }

    async fn record_reading(&self, request: CreateVitalSignRequest) -> Result<VitalSignReading, ServiceError> {
        self.validate_create_request(&request)?;

        let reading_date = request.reading_date.unwrap_or_else(Utc::now);
        let data_request = conversions::convert_to_data_create_request(&request, reading_date);

        let created = self.repository.create(data_request).await?;
        conversions::convert_to_domain_reading(created).map_err(|e| {
            ServiceError::GatewayError(format!("Backend returned an unexpected reading: {}", e))
        })
    }
}

/// Create a vital signs service talking to the portal backend
pub fn create_vital_signs_service(gateway: HttpGateway) -> VitalSignsService<VitalSignsRepository> {
    VitalSignsService::new(VitalSignsRepository::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::insights::BloodPressureCategory;
    use crate::entities::vital_sign::{ReadingStatus, StatusClass};
    use crate::testing::{mock_vital_signs_service, sample_record};
    use mockall::mock;
    use patient_portal_data::gateway::GatewayError;
    use patient_portal_data::models::{CreateVitalSignRecord, VitalSignRecord};
    use patient_portal_data::repository::{MockVitalSignsRepository, RepositoryError};

    mock! {
        Repo {}

        #[async_trait]
        impl VitalSignsRepositoryTrait for Repo {
            async fn get_latest(&self, patient_id: &str) -> Result<Vec<VitalSignRecord>, RepositoryError>;
            async fn get_history(&self, patient_id: &str, filter: HistoryFilter) -> Result<Vec<VitalSignRecord>, RepositoryError>;
            async fn get_by_id(&self, id: &str) -> Result<Option<VitalSignRecord>, RepositoryError>;
            async fn create(&self, record: CreateVitalSignRecord) -> Result<VitalSignRecord, RepositoryError>;
        }
    }

    fn request(reading_type: ReadingType, value: &str) -> CreateVitalSignRequest {
        CreateVitalSignRequest {
            patient_id: "p1".to_string(),
            reading_type,
            reading_value: value.to_string(),
            reading_unit: None,
            reading_status: None,
            reading_date: None,
            notes: None,
        }
    }

    fn days_ago(days: i64) -> String {
        (Utc::now() - Duration::days(days)).to_rfc3339()
    }

    #[test]
    fn test_validate_create_request_valid() {
        let service = mock_vital_signs_service(Vec::new());

        assert!(service.validate_create_request(&request(ReadingType::BloodPressure, "120/80")).is_ok());
        assert!(service.validate_create_request(&request(ReadingType::Temperature, "36.8")).is_ok());
        assert!(service.validate_create_request(&request(ReadingType::OxygenSaturation, "98")).is_ok());
    }

    #[test]
    fn test_validate_create_request_blood_pressure_rules() {
        let service = mock_vital_signs_service(Vec::new());

        let err = service
            .validate_create_request(&request(ReadingType::BloodPressure, "350/80"))
            .unwrap_err();
        assert!(err.to_string().contains("Systolic"));

        let err = service
            .validate_create_request(&request(ReadingType::BloodPressure, "120/250"))
            .unwrap_err();
        assert!(err.to_string().contains("Diastolic"));

        let err = service
            .validate_create_request(&request(ReadingType::BloodPressure, "80/80"))
            .unwrap_err();
        assert!(err.to_string().contains("greater than"));

        let err = service
            .validate_create_request(&request(ReadingType::BloodPressure, "120"))
            .unwrap_err();
        assert!(err.to_string().contains("systolic/diastolic"));
    }

    #[test]
    fn test_validate_create_request_ranges_and_dates() {
        let service = mock_vital_signs_service(Vec::new());

        let err = service
            .validate_create_request(&request(ReadingType::HeartRate, "400"))
            .unwrap_err();
        assert!(err.to_string().contains("Heart Rate must be between 20 and 250"));

        let err = service
            .validate_create_request(&request(ReadingType::Weight, "heavy"))
            .unwrap_err();
        assert!(err.to_string().contains("Weight must be a number"));

        let future = CreateVitalSignRequest {
            reading_date: Some(Utc::now() + Duration::days(1)),
            ..request(ReadingType::HeartRate, "70")
        };
        let err = service.validate_create_request(&future).unwrap_err();
        assert!(err.to_string().contains("future"));

        let empty_patient = CreateVitalSignRequest {
            patient_id: String::new(),
            ..request(ReadingType::HeartRate, "70")
        };
        let err = service.validate_create_request(&empty_patient).unwrap_err();
        assert!(err.to_string().contains("Patient id is required"));
    }

    #[tokio::test]
    async fn test_latest_readings_last_in_order_wins() {
        let service = mock_vital_signs_service(vec![
            sample_record("id1", "HEART_RATE", "70", &days_ago(1)),
            sample_record("id2", "HEART_RATE", "75", &days_ago(1)),
            sample_record("w1", "WEIGHT", "70.5", &days_ago(2)),
        ]);

        let latest = service.get_latest_readings("p1").await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&ReadingType::HeartRate].id, "id2");
        assert_eq!(latest[&ReadingType::Weight].reading_unit, "kg");
    }

    #[tokio::test]
    async fn test_dashboard_cards_and_trend() {
        let mut elevated = sample_record("bp2", "BLOOD_PRESSURE", "130/85", &days_ago(1));
        elevated.reading_status = Some("ELEVATED".to_string());

        let service = mock_vital_signs_service(vec![
            sample_record("hr", "HEART_RATE", "72", &days_ago(1)),
            sample_record("bp1", "BLOOD_PRESSURE", "120/80", &days_ago(3)),
            elevated,
            sample_record("old", "BLOOD_PRESSURE", "180/120", &days_ago(90)),
            sample_record("steps", "STEP_COUNT", "9000", &days_ago(1)),
        ]);

        let dashboard = service.get_dashboard("p1").await.unwrap();
        assert_eq!(dashboard.patient_id, "p1");
        assert_eq!(dashboard.cards.len(), 2);
        assert_eq!(dashboard.cards[0].reading_type, ReadingType::BloodPressure);
        assert_eq!(dashboard.cards[0].label, "Blood Pressure");
        assert_eq!(dashboard.cards[0].status, StatusClass::Elevated);
        assert_eq!(dashboard.cards[0].color, StatusClass::Elevated.display_color());
        assert_eq!(dashboard.cards[1].status, StatusClass::Unknown);

        let trend = dashboard.blood_pressure.unwrap();
        assert_eq!(trend.reading_count, 2);
        assert_eq!(trend.max_systolic, 130);
        assert_eq!(trend.category, BloodPressureCategory::Hypertension1);
    }

    #[tokio::test]
    async fn test_dashboard_without_blood_pressure_has_no_trend() {
        let service = mock_vital_signs_service(vec![sample_record("hr", "HEART_RATE", "72", &days_ago(1))]);

        let dashboard = service.get_dashboard("p1").await.unwrap();
        assert_eq!(dashboard.cards.len(), 1);
        assert!(dashboard.blood_pressure.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_omits_trend_for_malformed_blood_pressure() {
        let service = mock_vital_signs_service(vec![
            sample_record("bp-1", "BLOOD_PRESSURE", "118/76", &days_ago(3)),
            sample_record("bp-2", "BLOOD_PRESSURE", "120-80", &days_ago(1)),
        ]);

        let dashboard = service.get_dashboard("p1").await.unwrap();
        assert_eq!(dashboard.cards.len(), 1);
        assert_eq!(dashboard.cards[0].value, "120-80");
        assert!(dashboard.blood_pressure.is_none());
    }

    #[tokio::test]
    async fn test_history_is_sorted_and_validated() {
        let service = mock_vital_signs_service(vec![
            sample_record("b", "HEART_RATE", "70", &days_ago(1)),
            sample_record("a", "HEART_RATE", "71", &days_ago(5)),
            sample_record("w", "WEIGHT", "70", &days_ago(3)),
        ]);

        let history = service
            .get_history(
                "p1",
                HistoryQuery {
                    reading_type: Some(ReadingType::HeartRate),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let inverted = HistoryQuery {
            reading_type: None,
            start_date: Some(Utc::now()),
            end_date: Some(Utc::now() - Duration::days(1)),
        };
        let result = service.get_history("p1", inverted).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_chart_series_fails_on_malformed_value() {
        let service = mock_vital_signs_service(vec![
            sample_record("ok", "BLOOD_PRESSURE", "120/80", &days_ago(2)),
            sample_record("bad", "BLOOD_PRESSURE", "120-80", &days_ago(1)),
        ]);

        let result = service.get_chart_series("p1", ReadingType::BloodPressure).await;
        assert!(matches!(result, Err(ServiceError::MalformedReading(msg)) if msg.contains("bad")));

        let series = service.get_chart_series("p1", ReadingType::HeartRate).await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_blood_pressure_insights_window() {
        let service = mock_vital_signs_service(vec![
            sample_record("recent", "BLOOD_PRESSURE", "118/76", &days_ago(2)),
            sample_record("old", "BLOOD_PRESSURE", "160/100", &days_ago(40)),
        ]);

        let insights = service.get_blood_pressure_insights("p1", 7).await.unwrap();
        assert_eq!(insights.reading_count, 1);
        assert_eq!(insights.period_days, 7);
        assert_eq!(insights.category, BloodPressureCategory::Normal);

        let insights = service.get_blood_pressure_insights("p1", 1000).await.unwrap();
        assert_eq!(insights.reading_count, 2);
        assert_eq!(insights.period_days, MAX_TIMEFRAME_DAYS);

        let result = service.get_blood_pressure_insights("p1", 0).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));

        let result = service.get_blood_pressure_insights("nobody", 30).await;
        assert!(matches!(result, Err(ServiceError::InsufficientData(_))));
    }

    #[tokio::test]
    async fn test_get_reading_by_id() {
        let service = mock_vital_signs_service(vec![sample_record("r1", "WEIGHT", "70", &days_ago(1))]);

        let reading = service.get_reading_by_id("r1").await.unwrap();
        assert_eq!(reading.reading_type, ReadingType::Weight);

        let result = service.get_reading_by_id("missing").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_record_reading_defaults_unit_and_date() {
        let repository = MockVitalSignsRepository::new();
        let service = VitalSignsService::new(repository.clone());

        let reading = service
            .record_reading(CreateVitalSignRequest {
                reading_status: Some(ReadingStatus::Normal),
                ..request(ReadingType::OxygenSaturation, "97")
            })
            .await
            .unwrap();

        assert_eq!(reading.reading_unit, "%");
        assert_eq!(reading.reading_status, Some(ReadingStatus::Normal));
        assert!(reading.reading_date <= Utc::now());

        let stored = repository.storage().reading_by_id(&reading.id).unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_record_reading_rejects_invalid_value_before_backend() {
        let mut repo = MockRepo::new();
        repo.expect_create().times(0);
        let service = VitalSignsService::new(repo);

        let result = service.record_reading(request(ReadingType::Temperature, "99")).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_repository_errors_are_mapped() {
        let mut repo = MockRepo::new();
        repo.expect_get_latest()
            .times(1)
            .returning(|_| Err(RepositoryError::Gateway(GatewayError::Unauthorized)));
        repo.expect_get_by_id()
            .times(1)
            .returning(|_| Err(RepositoryError::Gateway(GatewayError::Backend("maintenance".to_string()))));
        let service = VitalSignsService::new(repo);

        let result = service.get_latest_readings("p1").await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));

        let result = service.get_reading_by_id("r1").await;
        assert!(matches!(result, Err(ServiceError::GatewayError(msg)) if msg.contains("maintenance")));
    }

    #[tokio::test]
    async fn test_dashboard_fails_when_either_call_fails() {
        let mut repo = MockRepo::new();
        repo.expect_get_latest().returning(|_| Ok(Vec::new()));
        repo.expect_get_history()
            .returning(|_, _| Err(RepositoryError::Gateway(GatewayError::Status {
                status: 503,
                message: "unavailable".to_string(),
            })));
        let service = VitalSignsService::new(repo);

        let result = service.get_dashboard("p1").await;
        assert!(matches!(result, Err(ServiceError::GatewayError(_))));
    }

    #[test]
    fn test_unavailable_backend_blocks_on_future() {
        let service = VitalSignsService::new(MockVitalSignsRepository::new().with_unavailable_backend());

        let result = tokio_test::block_on(service.get_latest_readings("p1"));
        assert!(matches!(result, Err(ServiceError::GatewayError(_))));
    }
}
