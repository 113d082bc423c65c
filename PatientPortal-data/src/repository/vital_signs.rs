use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::errors::RepositoryError;
use crate::gateway::{GatewayError, HttpGateway};
use crate::models::vital_sign::{CreateVitalSignRecord, VitalSignRecord};

/// Optional narrowing of a patient's reading history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Reading type code, e.g. `HEART_RATE`
    pub reading_type: Option<String>,
    /// Inclusive lower bound on the reading date
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the reading date
    pub end_date: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    /// Query string pairs understood by the backend history endpoint
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(reading_type) = &self.reading_type {
            query.push(("type", reading_type.clone()));
        }
        if let Some(start) = self.start_date {
            query.push(("startDate", start.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(end) = self.end_date {
            query.push(("endDate", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        query
    }

    /// Whether a record satisfies this filter
    pub fn matches(&self, record: &VitalSignRecord) -> bool {
        if let Some(reading_type) = &self.reading_type {
            if !record.reading_type.eq_ignore_ascii_case(reading_type) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if record.reading_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.reading_date > end {
                return false;
            }
        }
        true
    }
}

/// Repository trait for vital sign readings
#[async_trait]
pub trait VitalSignsRepositoryTrait: Send + Sync {
    /// Latest readings for a patient, in the order the backend returns them
    async fn get_latest(&self, patient_id: &str) -> Result<Vec<VitalSignRecord>, RepositoryError>;

    /// Reading history for a patient; order is not guaranteed
    async fn get_history(
        &self,
        patient_id: &str,
        filter: HistoryFilter,
    ) -> Result<Vec<VitalSignRecord>, RepositoryError>;

    /// A single reading by id
    async fn get_by_id(&self, id: &str) -> Result<Option<VitalSignRecord>, RepositoryError>;

    /// Submit a new reading; the backend assigns the id
    async fn create(&self, record: CreateVitalSignRecord) -> Result<VitalSignRecord, RepositoryError>;
}

/// Repository backed by the portal REST backend
#[derive(Debug, Clone)]
pub struct VitalSignsRepository {
    gateway: HttpGateway,
}

impl VitalSignsRepository {
    /// Create a new repository on top of a gateway
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }
}

fn patient_path(patient_id: &str) -> String {
    format!("/vital-signs/patient/{}", urlencoding::encode(patient_id))
}

#[async_trait]
impl VitalSignsRepositoryTrait for VitalSignsRepository {
    async fn get_latest(&self, patient_id: &str) -> Result<Vec<VitalSignRecord>, RepositoryError> {
        debug!("Fetching latest vital signs for patient {}", patient_id);
        let path = format!("{}/latest", patient_path(patient_id));
        Ok(self.gateway.get(&path, &[]).await?)
    }

    async fn get_history(
        &self,
        patient_id: &str,
        filter: HistoryFilter,
    ) -> Result<Vec<VitalSignRecord>, RepositoryError> {
        debug!("Fetching vital sign history for patient {} ({:?})", patient_id, filter);
        let path = patient_path(patient_id);
        Ok(self.gateway.get(&path, &filter.to_query()).await?)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<VitalSignRecord>, RepositoryError> {
        debug!("Fetching vital sign reading {}", id);
        let path = format!("/vital-signs/{}", urlencoding::encode(id));
        match self.gateway.get(&path, &[]).await {
            Ok(record) => Ok(Some(record)),
            Err(GatewayError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create(&self, record: CreateVitalSignRecord) -> Result<VitalSignRecord, RepositoryError> {
        debug!(
            "Submitting {} reading for patient {}",
            record.reading_type, record.patient_id
        );
        Ok(self.gateway.post("/vital-signs", &record).await?)
    }
}
