//! Complaint records and the typed inputs that create and mutate them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const DEFAULT_TITLE: &str = "Untitled complaint";
pub const DEFAULT_REPORTER: &str = "anonymous";

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Build a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let location = Self { lat, lng };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::invalid(format!(
                "coordinates must be finite, got ({}, {})",
                self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::invalid(format!("latitude {} outside [-90, 90]", self.lat)));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::invalid(format!("longitude {} outside [-180, 180]", self.lng)));
        }
        Ok(())
    }
}

/// Opaque complaint identifier, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(Uuid);

impl ComplaintId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComplaintId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ComplaintId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::invalid(format!("malformed complaint id {s:?}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Severity rank used for listing; higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(Error::invalid(format!(
                "unknown priority {other:?}, expected low, medium or high"
            ))),
        }
    }
}

/// Lifecycle state of a complaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    New,
    Assigned,
    InProgress,
    Resolved,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Self::New,
        Self::Assigned,
        Self::InProgress,
        Self::Resolved,
        Self::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    /// Edges of the canonical workflow. Staying in the same state is always allowed.
    pub fn can_transition_to(self, next: Status) -> bool {
        use Status::*;

        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (New, Assigned) | (New, Rejected) | (Assigned, InProgress) | (Assigned, Rejected)
                | (InProgress, Resolved)
                | (InProgress, Rejected)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| Error::invalid(format!("unknown status {s:?}")))
    }
}

/// A citizen-reported sanitation issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    #[serde(rename = "_id", alias = "id")]
    pub id: ComplaintId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub reporter: String,
    pub location: Location,
    pub status: Status,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated, defaulted input for creating a complaint.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub reporter: String,
    pub location: Location,
}

impl Default for NewComplaint {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            priority: Priority::default(),
            reporter: DEFAULT_REPORTER.to_string(),
            location: Location::default(),
        }
    }
}

impl NewComplaint {
    pub fn into_complaint(self, id: ComplaintId, created_at: DateTime<Utc>) -> Complaint {
        Complaint {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            reporter: self.reporter,
            location: self.location,
            status: Status::New,
            assigned_to: None,
            created_at,
            updated_at: None,
        }
    }
}

/// Fields applied by a lifecycle update. Both may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: Option<Status>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.is_none_or(|status| complaint.status == status)
            && self.priority.is_none_or(|priority| complaint.priority == priority)
    }
}

/// Change notification pushed to observers after a store write.
#[derive(Debug, Clone, PartialEq)]
pub enum ComplaintEvent {
    Created(Complaint),
    StatusUpdated(Complaint),
}

impl ComplaintEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created(_) => "new_complaint",
            Self::StatusUpdated(_) => "status_update",
        }
    }

    pub fn complaint(&self) -> &Complaint {
        match self {
            Self::Created(complaint) | Self::StatusUpdated(complaint) => complaint,
        }
    }
}
