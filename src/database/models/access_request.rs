use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum AccessStatus {
    Pending,
    Approved,
    Rejected,
}

impl AccessStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessStatus::Pending => "pending",
            AccessStatus::Approved => "approved",
            AccessStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessRequest {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub status: AccessStatus,
    #[serde(skip_serializing)]
    pub invite_token: Option<String>,
    pub trial_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl AccessRequest {
    /// Whether a repeat request with `incoming` status may overwrite this row.
    /// Admin decisions stick; only an approved row may be re-approved (trial refresh).
    pub fn accepts_update(&self, incoming: AccessStatus) -> bool {
        match self.status {
            AccessStatus::Pending => true,
            AccessStatus::Approved => incoming == AccessStatus::Approved,
            AccessStatus::Rejected => false,
        }
    }
}

pub fn already_decided(status: AccessStatus) -> String {
    format!("Request is already {}", status.as_str())
}

/// Upsert keyed by (lowercased) email
#[derive(Debug, Clone)]
pub struct NewAccessRequest {
    pub email: String,
    pub name: Option<String>,
    pub status: AccessStatus,
    pub trial_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct AccessApproval {
    pub invite_token: String,
    pub trial_expires_at: DateTime<Utc>,
}
