//! Wire payloads and their validation into typed core inputs.
//!
//! Request bodies are loosely typed JSON; everything is defaulted and checked
//! here so the core only ever sees [`NewComplaint`], [`StatusUpdate`],
//! [`ComplaintFilter`] and validated locations.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    Complaint, ComplaintFilter, ComplaintId, DEFAULT_REPORTER, DEFAULT_TITLE, Location,
    NewComplaint, Priority, Status, StatusUpdate,
};
use crate::planner::PlannedRoute;

/// Parse a JSON body; an empty body means "all fields absent".
pub fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| Error::invalid(format!("malformed JSON body: {err}")))
}

/// A coordinate as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn to_f64(&self, field: &str) -> Result<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| Error::invalid(format!("{field} must be numeric, got {text:?}"))),
        }
    }
}

/// `{lat, lng}` with either field optional; missing fields become `0`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    pub lat: Option<Coordinate>,
    pub lng: Option<Coordinate>,
}

impl LocationInput {
    pub fn into_location(self) -> Result<Location> {
        let lat = self.lat.map_or(Ok(0.0), |c| c.to_f64("lat"))?;
        let lng = self.lng.map_or(Ok(0.0), |c| c.to_f64("lng"))?;
        Location::new(lat, lng)
    }
}

fn optional_location(input: Option<LocationInput>) -> Result<Location> {
    input.unwrap_or_default().into_location()
}

/// Blank strings count as absent, matching how the web forms submit them.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateComplaintRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub reporter: Option<String>,
    pub location: Option<LocationInput>,
}

impl CreateComplaintRequest {
    pub fn into_new_complaint(self) -> Result<NewComplaint> {
        Ok(NewComplaint {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: self.description.unwrap_or_default(),
            priority: non_blank(self.priority)
                .map(|p| p.parse::<Priority>())
                .transpose()?
                .unwrap_or_default(),
            reporter: self.reporter.unwrap_or_else(|| DEFAULT_REPORTER.to_string()),
            location: optional_location(self.location)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

impl StatusRequest {
    pub fn into_update(self) -> Result<StatusUpdate> {
        Ok(StatusUpdate {
            status: non_blank(self.status).map(|s| s.parse::<Status>()).transpose()?,
            assigned_to: self.assigned_to,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl ListQuery {
    pub fn into_filter(self) -> Result<ComplaintFilter> {
        Ok(ComplaintFilter {
            status: non_blank(self.status).map(|s| s.parse::<Status>()).transpose()?,
            priority: non_blank(self.priority).map(|p| p.parse::<Priority>()).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteRequest {
    pub start: Option<LocationInput>,
    #[serde(default)]
    pub complaint_ids: Vec<String>,
}

impl RouteRequest {
    pub fn into_parts(self) -> Result<(Location, Vec<ComplaintId>)> {
        let start = optional_location(self.start)?;
        let ids = self
            .complaint_ids
            .iter()
            .map(|id| id.parse::<ComplaintId>())
            .collect::<Result<Vec<ComplaintId>>>()?;
        Ok((start, ids))
    }
}

#[derive(Debug, Serialize)]
pub struct ComplaintEnvelope {
    pub success: bool,
    pub complaint: Complaint,
}

impl From<Complaint> for ComplaintEnvelope {
    fn from(complaint: Complaint) -> Self {
        Self {
            success: true,
            complaint,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ComplaintList {
    pub complaints: Vec<Complaint>,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub route: Vec<Complaint>,
    pub legs_km: Vec<f64>,
    pub total_distance_km: f64,
    pub skipped: Vec<ComplaintId>,
}

impl From<PlannedRoute> for RouteResponse {
    fn from(planned: PlannedRoute) -> Self {
        Self {
            route: planned.stops,
            legs_km: planned.legs_km,
            total_distance_km: planned.total_distance_km,
            skipped: planned.skipped,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
    pub version: &'static str,
}
