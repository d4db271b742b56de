//! Appointment Request Models
//!
//! Field names on the wire are camelCase to stay compatible with the
//! existing chat widget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AssistantError, Result};

/// Appointment request as submitted by the client
///
/// Only `name` is required. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub vehicle_make: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
    #[serde(default)]
    pub vehicle_year: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    pub fn with_preferred_slot(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.preferred_date = Some(date.into());
        self.preferred_time = Some(time.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AssistantError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Stored appointment request
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub details: NewAppointment,
}

impl Appointment {
    /// Legacy JSON shape returned by the API
    pub fn to_response(&self) -> AppointmentResponse {
        AppointmentResponse {
            id: self.id.to_string(),
            created_at: self.created_at,
            details: self.details.clone(),
        }
    }
}

/// Appointment as rendered to the client (string id, camelCase fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: NewAppointment,
}
