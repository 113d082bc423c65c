use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::errors::RepositoryError;
use super::vital_signs::HistoryFilter;
use crate::models::profile::{PatientProfileRecord, UpdatePatientProfileRecord};
use crate::models::vital_sign::{CreateVitalSignRecord, VitalSignRecord};

/// In-memory stand-in for the portal backend.
///
/// Readings keep insertion order, matching what a backend list endpoint
/// returns before any client-side sorting.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    readings: Arc<Mutex<Vec<VitalSignRecord>>>,
    profiles: Arc<Mutex<HashMap<String, PatientProfileRecord>>>,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an existing reading as-is
    pub fn store_reading(&self, record: VitalSignRecord) -> Result<VitalSignRecord, RepositoryError> {
        let mut readings = self.readings.lock()?;
        readings.push(record.clone());
        Ok(record)
    }

    /// Store a submitted reading, assigning it a fresh id
    pub fn create_reading(&self, request: CreateVitalSignRecord) -> Result<VitalSignRecord, RepositoryError> {
        let record = VitalSignRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: request.patient_id,
            reading_type: request.reading_type,
            reading_value: request.reading_value,
            reading_unit: Some(request.reading_unit),
            reading_status: request.reading_status,
            reading_date: request.reading_date,
            notes: request.notes,
        };
        self.store_reading(record)
    }

    /// All readings of a patient matching the filter, in insertion order
    pub fn readings_for_patient(
        &self,
        patient_id: &str,
        filter: &HistoryFilter,
    ) -> Result<Vec<VitalSignRecord>, RepositoryError> {
        let readings = self.readings.lock()?;
        Ok(readings
            .iter()
            .filter(|record| record.patient_id == patient_id && filter.matches(record))
            .cloned()
            .collect())
    }

    /// The most recent reading of each type for a patient, oldest first
    pub fn latest_for_patient(&self, patient_id: &str) -> Result<Vec<VitalSignRecord>, RepositoryError> {
        let mut latest: HashMap<String, VitalSignRecord> = HashMap::new();
        for record in self.readings_for_patient(patient_id, &HistoryFilter::default())? {
            let newer = latest
                .get(&record.reading_type)
                .map_or(true, |current| record.reading_date >= current.reading_date);
            if newer {
                latest.insert(record.reading_type.clone(), record);
            }
        }

        let mut readings: Vec<VitalSignRecord> = latest.into_values().collect();
        readings.sort_by(|a, b| a.reading_date.cmp(&b.reading_date));
        Ok(readings)
    }

    /// Get a reading by id
    pub fn reading_by_id(&self, id: &str) -> Result<Option<VitalSignRecord>, RepositoryError> {
        let readings = self.readings.lock()?;
        Ok(readings.iter().find(|record| record.id == id).cloned())
    }

    /// Store or replace a profile
    pub fn store_profile(&self, profile: PatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError> {
        let mut profiles = self.profiles.lock()?;
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    /// Get a profile by patient id
    pub fn profile(&self, patient_id: &str) -> Result<Option<PatientProfileRecord>, RepositoryError> {
        let profiles = self.profiles.lock()?;
        Ok(profiles.get(patient_id).cloned())
    }

    /// Apply a partial update to a stored profile
    pub fn update_profile(
        &self,
        patient_id: &str,
        update: &UpdatePatientProfileRecord,
    ) -> Result<PatientProfileRecord, RepositoryError> {
        let mut profiles = self.profiles.lock()?;
        let profile = profiles.get_mut(patient_id).ok_or_else(|| {
            RepositoryError::NotFound(format!("Profile for patient {} not found", patient_id))
        })?;
        update.apply_to(profile);
        Ok(profile.clone())
    }
}
