use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::AppError;

/// Fixed top-level categorisation of complaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    Food,
    Hospital,
    Hotel,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Food => "Food",
            Sector::Hospital => "Hospital",
            Sector::Hotel => "Hotel",
        }
    }

    /// Case-insensitive; "Healthcare" is accepted as the hospital sector.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "food" => Some(Sector::Food),
            "hospital" | "healthcare" => Some(Sector::Hospital),
            "hotel" => Some(Sector::Hotel),
            _ => None,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Sector::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("unknown complaint type '{}'", raw)))
    }
}

/// Complaint workflow status.
///
/// Intake never validates the status, so anything outside the four known
/// labels is kept verbatim in `Other` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
    Other(String),
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Rejected => "Rejected",
            ComplaintStatus::Other(raw) => raw,
        }
    }

    /// Lenient parse used where only known statuses are acceptable
    /// ("in_progress", "IN PROGRESS" and "in-progress" all map to `InProgress`).
    pub fn parse_known(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_lowercase() })
            .collect();
        match normalized.as_str() {
            "pending" => Some(ComplaintStatus::Pending),
            "in progress" => Some(ComplaintStatus::InProgress),
            "resolved" => Some(ComplaintStatus::Resolved),
            "rejected" => Some(ComplaintStatus::Rejected),
            _ => None,
        }
    }
}

impl From<&str> for ComplaintStatus {
    fn from(value: &str) -> Self {
        match value {
            "Pending" => ComplaintStatus::Pending,
            "In Progress" => ComplaintStatus::InProgress,
            "Resolved" => ComplaintStatus::Resolved,
            "Rejected" => ComplaintStatus::Rejected,
            other => ComplaintStatus::Other(other.to_string()),
        }
    }
}

impl Default for ComplaintStatus {
    fn default() -> Self {
        ComplaintStatus::Pending
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComplaintStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComplaintStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ComplaintStatus::from(raw.as_str()))
    }
}

/// Complaint record (stored in the `complaints` collection).
///
/// Only the server-owned keys are typed. Everything the client sent,
/// including the common fields (`status`, `description`, `email`, ...),
/// stays in `details` exactly as submitted and is read through accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,

    #[serde(rename = "type")]
    pub sector: Sector,

    /// Server timestamp (RFC 3339)
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Complaint {
    /// Builds a record from a raw submission payload.
    ///
    /// The server owns `id`, `createdAt` and `updatedAt`; client values for
    /// those keys are discarded. `status` defaults to Pending and
    /// `submittedAt` to `now` when missing.
    pub fn from_submission(
        payload: Value,
        id: String,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let mut map = match payload {
            Value::Object(map) => map,
            _ => {
                return Err(AppError::InvalidRequest(
                    "Complaint payload must be a JSON object".to_string(),
                ))
            }
        };

        let sector = map
            .get("type")
            .and_then(Value::as_str)
            .and_then(Sector::parse)
            .ok_or_else(|| {
                AppError::InvalidRequest(
                    "Complaint type must be one of Food, Hospital or Hotel".to_string(),
                )
            })?;

        map.remove("updatedAt");
        map.insert("id".to_string(), Value::String(id));
        map.insert("createdAt".to_string(), Value::String(now.to_rfc3339()));
        map.insert("type".to_string(), Value::String(sector.as_str().to_string()));

        if map.get("status").map_or(true, Value::is_null) {
            map.insert(
                "status".to_string(),
                Value::String(ComplaintStatus::Pending.as_str().to_string()),
            );
        }

        let submitted_missing = match map.get("submittedAt") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if submitted_missing {
            map.insert(
                "submittedAt".to_string(),
                Value::String(display_timestamp(now)),
            );
        }

        // Explicit nulls from the web forms ("userId": null) mean "absent".
        map.retain(|_, v| !v.is_null());

        serde_json::from_value(Value::Object(map))
            .map_err(|e| AppError::InvalidRequest(format!("Invalid complaint payload: {}", e)))
    }

    /// Status as submitted; a non-string value counts as an unknown status.
    pub fn status(&self) -> ComplaintStatus {
        match self.details.get("status") {
            None | Some(Value::Null) => ComplaintStatus::Pending,
            Some(Value::String(raw)) => ComplaintStatus::from(raw.as_str()),
            Some(other) => ComplaintStatus::Other(other.to_string()),
        }
    }

    pub fn set_status(&mut self, status: &ComplaintStatus) {
        self.details
            .insert("status".to_string(), Value::String(status.as_str().to_string()));
    }

    pub fn user_id(&self) -> Option<&str> {
        self.detail("userId")
    }

    pub fn email(&self) -> Option<&str> {
        self.detail("email")
    }

    pub fn description(&self) -> String {
        self.text("description")
    }

    pub fn submitted_at(&self) -> String {
        self.text("submittedAt")
    }

    /// Display text of any field. Non-string values are rendered as JSON.
    pub fn text(&self, key: &str) -> String {
        match self.details.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// String value of a field, ignoring blanks and non-strings.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Restaurant, hospital or hotel name, whichever the form carried.
    pub fn business_name(&self) -> Option<&str> {
        self.detail("businessName")
            .or_else(|| self.detail("restaurantName"))
            .or_else(|| self.detail("hospitalName"))
            .or_else(|| self.detail("hotelName"))
    }

    pub fn location(&self) -> Option<&str> {
        self.detail("location")
            .or_else(|| self.detail("restaurantAddress"))
            .or_else(|| self.detail("hospitalAddress"))
            .or_else(|| self.detail("hotelAddress"))
    }

    pub fn priority(&self) -> Option<&str> {
        self.detail("priority")
    }
}

/// Locale-style timestamp ("6/14/2025, 3:07:09 PM") matching what the web
/// forms put in `submittedAt`.
pub fn display_timestamp(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
