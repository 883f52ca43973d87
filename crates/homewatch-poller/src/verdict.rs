//! Verdict formatting.
//!
//! `parse_submission` is the lazy half of validation: the batch container
//! was already checked upstream, per-item fields are checked here, on the
//! item that is actually used. `render_verdict` maps a parsed record to the
//! user-facing sentence — a fixed table, not logic.

use homewatch_core::error::{HomewatchError, Result};
use homewatch_core::types::{ReviewStatus, SubmissionRecord};
use serde_json::Value;

/// Per-item keys that must be present before a verdict can be rendered.
const ITEM_KEYS: [&str; 2] = ["homework_name", "status"];

/// Extract a typed record from one raw submission item.
pub fn parse_submission(raw: &Value) -> Result<SubmissionRecord> {
    for key in ITEM_KEYS {
        if raw.get(key).is_none() {
            return Err(HomewatchError::MissingField { key: key.into() });
        }
    }
    let name = string_field(raw, "homework_name")?;
    let status_raw = string_field(raw, "status")?;
    let status = ReviewStatus::parse(status_raw).ok_or_else(|| {
        HomewatchError::UnrecognizedStatus {
            status: status_raw.to_string(),
        }
    })?;
    Ok(SubmissionRecord {
        name: name.to_string(),
        status,
    })
}

fn string_field<'a>(raw: &'a Value, key: &str) -> Result<&'a str> {
    raw[key]
        .as_str()
        .ok_or_else(|| HomewatchError::MalformedResponse {
            expected: "string",
            actual: format!("`{key}` of another type"),
        })
}

/// The user-facing change announcement.
pub fn render_verdict(record: &SubmissionRecord) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        record.name,
        verdict_text(record.status)
    )
}

fn verdict_text(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
        ReviewStatus::Reviewing => "Работа взята на проверку ревьюером.",
        ReviewStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
    }
}
