//! Domain types shared across the watcher.

use serde::{Deserialize, Serialize};

/// Review verdict a submission can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    /// Parse the wire value. Returns `None` for anything outside the
    /// recognized set — the caller decides how to report it.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }
}

/// Last observed state of the tracked submission. Replaced wholesale on each
/// detected change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub name: String,
    pub status: ReviewStatus,
}

/// Validated API response for one tick. Items stay loosely typed so a
/// malformed submission fails on itself inside the verdict module, not on
/// the whole batch.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub homeworks: Vec<serde_json::Value>,
    pub current_date: Option<i64>,
}

/// Outcome of one notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed,
}
