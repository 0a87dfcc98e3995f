//! # SpaceAPI Status Export
//!
//! Serves the hackerspace status document (<https://spaceapi.io/>) built
//! from the configured metadata and the latest reading of every door.
//!
//! Each door with a reading contributes one `sensors.door_locked` entry. The
//! primary door additionally drives `state.open` and `state.lastchange`.
//! Doors whose reading cannot be fetched are left out.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use doorky_timeseries::DoorReading;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ApiError;
use super::AppState;
use crate::config::ReceiverConfig;

/// SpaceAPI document. Doubles as the `[spaceapi]` configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceApiDocument {
    pub api: String,
    pub space: String,
    pub logo: String,
    pub url: String,
    pub location: SpaceLocation,
    pub contact: SpaceContact,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issue_report_channels: Vec<String>,
    #[serde(default)]
    pub state: SpaceState,
    #[serde(default, skip_serializing_if = "SpaceSensors::is_empty")]
    pub sensors: SpaceSensors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Open/closed state. `open` is `null` until the primary door reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceState {
    #[serde(default)]
    pub open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastchange: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSensors {
    #[serde(default)]
    pub door_locked: Vec<DoorLockedSensor>,
}

impl SpaceSensors {
    pub fn is_empty(&self) -> bool {
        self.door_locked.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLockedSensor {
    /// `true` when the door is closed.
    pub value: bool,
    pub location: String,
    pub name: String,
    pub description: String,
}

/// Exported status document, one variant per supported format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusDocument {
    SpaceApi(SpaceApiDocument),
}

impl StatusDocument {
    /// Render as pretty-printed JSON.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Door exported through SpaceAPI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDoor {
    pub name: String,
    pub location: String,
}

/// SpaceAPI exporter built from configuration.
#[derive(Debug, Clone)]
pub struct SpaceApi {
    template: SpaceApiDocument,
    doors: Vec<ExportedDoor>,
    primary_door: Option<String>,
}

impl SpaceApi {
    pub fn new(
        template: SpaceApiDocument,
        doors: Vec<ExportedDoor>,
        primary_door: Option<String>,
    ) -> Self {
        Self {
            template,
            doors,
            primary_door,
        }
    }

    /// `None` when the configuration has no `[spaceapi]` table.
    pub fn from_config(config: &ReceiverConfig) -> Option<Self> {
        let template = config.spaceapi.clone()?;
        let doors = config
            .doors
            .iter()
            .map(|d| ExportedDoor {
                name: d.name.clone(),
                location: d.location.clone(),
            })
            .collect();
        Some(Self::new(template, doors, config.primary_door.clone()))
    }

    pub fn doors(&self) -> &[ExportedDoor] {
        &self.doors
    }

    /// Assemble the document from per-door readings, in door order.
    pub fn build<'a, I>(&self, readings: I) -> StatusDocument
    where
        I: IntoIterator<Item = (&'a ExportedDoor, DoorReading)>,
    {
        let mut doc = self.template.clone();
        for (door, reading) in readings {
            doc.sensors.door_locked.push(DoorLockedSensor {
                value: !reading.open,
                location: door.location.clone(),
                name: door.name.clone(),
                description: format!("Last update: {}", format_timestamp(&reading)),
            });

            if self.primary_door.as_deref() == Some(door.name.as_str()) {
                doc.state.open = Some(reading.open);
                doc.state.lastchange = Some(reading.timestamp_seconds());
            }
        }
        StatusDocument::SpaceApi(doc)
    }
}

fn format_timestamp(reading: &DoorReading) -> String {
    let micros = reading.timestamp_micros;
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::<Utc>::from_timestamp(micros.div_euclid(1_000_000), nanos)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| format!("{}us", micros))
}

/// Handle `GET /api/spaceapi`.
pub async fn handle_spaceapi(State(state): State<AppState>) -> Result<Response, ApiError> {
    let spaceapi = state.spaceapi.clone().ok_or(ApiError::NotFound)?;
    state.metrics.record_spaceapi_request();

    let mut readings = Vec::with_capacity(spaceapi.doors().len());
    for door in spaceapi.doors() {
        let name = door.name.clone();
        match state.call_store(move |ts| ts.last_value(&name)).await {
            Ok(reading) => readings.push((door, reading)),
            Err(e) => {
                state.metrics.record_spaceapi_door_error();
                warn!(door = %door.name, error = %e, "Error fetching door status");
            }
        }
    }

    let body = spaceapi
        .build(readings)
        .render()
        .map_err(|e| ApiError::Render(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
