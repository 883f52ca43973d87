//! The poll engine — fetch, validate, diff, notify, sleep.
//!
//! All mutable state (cursor, stored record, last reported error) lives
//! here, owned by the single task that drives `tick`. Two rules shape the
//! whole loop:
//!
//! - **Delivery-gated commit**: a detected change only replaces the stored
//!   record and advances the cursor once its notification is confirmed
//!   delivered; otherwise the next tick re-detects and re-attempts the same
//!   change.
//! - **Error dedup**: a recoverable failure is reported at most once per
//!   distinct error text; consecutive identical failures are logged but not
//!   re-sent.

use homewatch_api::validate::check_response;
use homewatch_core::error::{HomewatchError, Result};
use homewatch_core::traits::StatusSource;
use homewatch_core::types::{Delivery, StatusSnapshot, SubmissionRecord};

use crate::notify::Notifier;
use crate::verdict;

/// Prefix for error reports pushed to the chat.
const FAILURE_PREFIX: &str = "Сбой в работе программы: ";

/// What one tick did. Returned for observability and the scenario tests;
/// the run loop itself ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Empty batch — nothing to compare.
    NoUpdate,
    /// First record equals the stored one.
    Unchanged,
    /// Change detected, verdict delivered, state committed.
    Notified(SubmissionRecord),
    /// Change detected but delivery failed; state retained for a retry.
    NotifyFailed,
    /// New distinct error reported to the chat.
    ErrorReported(String),
    /// Same error as last reported — logged only.
    ErrorSuppressed,
    /// Distinct error, but the report itself failed to deliver; it stays
    /// eligible for the next tick.
    ErrorReportFailed,
}

/// Orchestrates one submission's status watch.
pub struct PollEngine {
    source: Box<dyn StatusSource>,
    notifier: Notifier,
    cursor: i64,
    last_seen: Option<SubmissionRecord>,
    last_error: Option<String>,
}

impl PollEngine {
    pub fn new(source: Box<dyn StatusSource>, notifier: Notifier, start_from: i64) -> Self {
        Self {
            source,
            notifier,
            cursor: start_from,
            last_seen: None,
            last_error: None,
        }
    }

    /// Lower bound of the next fetch window.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Run one full tick. Every recoverable error ends up in the shared
    /// report path; nothing escapes.
    pub async fn tick(&mut self) -> TickOutcome {
        match self.observe().await {
            Ok(outcome) => outcome,
            Err(error) => self.report_failure(error).await,
        }
    }

    async fn observe(&mut self) -> Result<TickOutcome> {
        let body = self.source.fetch(self.cursor).await?;
        let snapshot = check_response(body)?;

        let Some(first) = snapshot.homeworks.first() else {
            tracing::debug!("no new review statuses");
            self.adopt_cursor(&snapshot);
            return Ok(TickOutcome::NoUpdate);
        };

        let record = verdict::parse_submission(first)?;
        if self.last_seen.as_ref() == Some(&record) {
            tracing::debug!(
                "status unchanged: {} is still {}",
                record.name,
                record.status.as_str()
            );
            self.adopt_cursor(&snapshot);
            return Ok(TickOutcome::Unchanged);
        }

        let text = verdict::render_verdict(&record);
        match self.notifier.deliver(&text).await {
            Delivery::Delivered => {
                tracing::info!(
                    "📬 verdict change delivered: {} → {}",
                    record.name,
                    record.status.as_str()
                );
                self.last_seen = Some(record.clone());
                self.adopt_cursor(&snapshot);
                Ok(TickOutcome::Notified(record))
            }
            // Keep the old record and cursor: the next tick re-detects the
            // same change and retries the notification.
            Delivery::Failed => Ok(TickOutcome::NotifyFailed),
        }
    }

    async fn report_failure(&mut self, error: HomewatchError) -> TickOutcome {
        let text = format!("{FAILURE_PREFIX}{error}");
        tracing::error!("{text}");

        if self.last_error.as_deref() == Some(text.as_str()) {
            return TickOutcome::ErrorSuppressed;
        }
        match self.notifier.deliver(&text).await {
            Delivery::Delivered => {
                self.last_error = Some(text.clone());
                TickOutcome::ErrorReported(text)
            }
            Delivery::Failed => TickOutcome::ErrorReportFailed,
        }
    }

    fn adopt_cursor(&mut self, snapshot: &StatusSnapshot) {
        if let Some(date) = snapshot.current_date {
            self.cursor = date;
        }
    }

    /// Drive `tick` forever on a fixed interval. The first tick fires
    /// immediately, then once per period.
    pub async fn run(mut self, every: std::time::Duration) {
        tracing::info!("⏰ poll loop started (every {}s)", every.as_secs());
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use homewatch_core::traits::Messenger;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays a fixed sequence of fetch results.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Value>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Value>>) -> Box<Self> {
            Box::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch(&self, _from_date: i64) -> Result<Value> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("fetch script exhausted")
        }
    }

    /// Records every send attempt; an optional failure script makes
    /// individual sends bounce.
    struct RecordingMessenger {
        attempts: Mutex<Vec<String>>,
        failures: Mutex<VecDeque<bool>>,
    }

    impl RecordingMessenger {
        fn always_ok() -> Arc<Self> {
            Self::with_failures(vec![])
        }

        /// `failures[i]` = should the i-th send fail. Past the script's end
        /// every send succeeds.
        fn with_failures(failures: Vec<bool>) -> Arc<Self> {
            Arc::new(Self {
                attempts: Mutex::new(Vec::new()),
                failures: Mutex::new(failures.into()),
            })
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send(&self, _chat_id: &str, text: &str) -> Result<()> {
            self.attempts.lock().unwrap().push(text.to_string());
            let fail = self.failures.lock().unwrap().pop_front().unwrap_or(false);
            if fail {
                Err(HomewatchError::Channel("chat unreachable".into()))
            } else {
                Ok(())
            }
        }
    }

    fn engine(
        responses: Vec<Result<Value>>,
        messenger: Arc<RecordingMessenger>,
        start_from: i64,
    ) -> PollEngine {
        let notifier = Notifier::new(messenger, "4242".into());
        PollEngine::new(ScriptedSource::new(responses), notifier, start_from)
    }

    fn page(name: &str, status: &str, current_date: i64) -> Result<Value> {
        Ok(json!({
            "homeworks": [{"homework_name": name, "status": status}],
            "current_date": current_date,
        }))
    }

    fn transport_error() -> HomewatchError {
        HomewatchError::Transport {
            endpoint: "https://api.example/statuses/".into(),
            from_date: 0,
            reason: "connection refused".into(),
        }
    }

    #[tokio::test]
    async fn change_then_repeat_then_new_status() {
        let messenger = RecordingMessenger::always_ok();
        let mut engine = engine(
            vec![
                page("p1", "reviewing", 100),
                page("p1", "reviewing", 200),
                page("p1", "approved", 300),
            ],
            messenger.clone(),
            1,
        );

        let first = engine.tick().await;
        assert!(matches!(first, TickOutcome::Notified(_)));
        assert_eq!(engine.cursor(), 100);

        // Identical record: no second notification, cursor still adopted.
        assert_eq!(engine.tick().await, TickOutcome::Unchanged);
        assert_eq!(engine.cursor(), 200);

        // New status for the same submission: exactly one more message.
        let third = engine.tick().await;
        assert!(matches!(third, TickOutcome::Notified(_)));
        assert_eq!(engine.cursor(), 300);

        let attempts = messenger.attempts();
        assert_eq!(attempts.len(), 2);
        assert!(attempts[0].contains("взята на проверку"));
        assert!(attempts[1].contains("всё понравилось"));
    }

    #[tokio::test]
    async fn empty_batch_is_silent_and_adopts_current_date() {
        let messenger = RecordingMessenger::always_ok();
        let mut engine = engine(
            vec![
                Ok(json!({"homeworks": [], "current_date": 500})),
                Ok(json!({"homeworks": []})),
            ],
            messenger.clone(),
            1,
        );

        assert_eq!(engine.tick().await, TickOutcome::NoUpdate);
        assert_eq!(engine.cursor(), 500);

        // No current_date supplied: cursor is retained.
        assert_eq!(engine.tick().await, TickOutcome::NoUpdate);
        assert_eq!(engine.cursor(), 500);

        assert!(messenger.attempts().is_empty());
    }

    #[tokio::test]
    async fn identical_errors_are_reported_once() {
        let messenger = RecordingMessenger::always_ok();
        let mut engine = engine(
            vec![Err(transport_error()), Err(transport_error())],
            messenger.clone(),
            1,
        );

        assert!(matches!(engine.tick().await, TickOutcome::ErrorReported(_)));
        assert_eq!(engine.tick().await, TickOutcome::ErrorSuppressed);
        assert_eq!(messenger.attempts().len(), 1);
    }

    #[tokio::test]
    async fn differing_error_text_is_reported_again() {
        let messenger = RecordingMessenger::always_ok();
        let mut engine = engine(
            vec![
                Err(transport_error()),
                Err(HomewatchError::NotOkStatus {
                    status: 502,
                    endpoint: "https://api.example/statuses/".into(),
                    from_date: 0,
                }),
            ],
            messenger.clone(),
            1,
        );

        assert!(matches!(engine.tick().await, TickOutcome::ErrorReported(_)));
        assert!(matches!(engine.tick().await, TickOutcome::ErrorReported(_)));
        let attempts = messenger.attempts();
        assert_eq!(attempts.len(), 2);
        assert_ne!(attempts[0], attempts[1]);
    }

    #[tokio::test]
    async fn failed_change_delivery_keeps_state_and_retries() {
        // First send bounces, second succeeds.
        let messenger = RecordingMessenger::with_failures(vec![true]);
        let mut engine = engine(
            vec![page("p1", "approved", 100), page("p1", "approved", 200)],
            messenger.clone(),
            1,
        );

        assert_eq!(engine.tick().await, TickOutcome::NotifyFailed);
        // Nothing committed: the change must be re-attempted.
        assert_eq!(engine.cursor(), 1);

        let retried = engine.tick().await;
        assert!(matches!(retried, TickOutcome::Notified(_)));
        assert_eq!(engine.cursor(), 200);

        let attempts = messenger.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0], attempts[1]);
    }

    #[tokio::test]
    async fn failed_error_report_is_retried_next_tick() {
        let messenger = RecordingMessenger::with_failures(vec![true]);
        let mut engine = engine(
            vec![Err(transport_error()), Err(transport_error())],
            messenger.clone(),
            1,
        );

        // Report bounced: dedup state must not record the text.
        assert_eq!(engine.tick().await, TickOutcome::ErrorReportFailed);
        assert!(matches!(engine.tick().await, TickOutcome::ErrorReported(_)));
        assert_eq!(messenger.attempts().len(), 2);
    }

    #[tokio::test]
    async fn malformed_payloads_route_through_the_error_path() {
        let messenger = RecordingMessenger::always_ok();
        let mut engine = engine(
            vec![
                // Top-level list.
                Ok(json!([1, 2, 3])),
                // Item missing its status key.
                Ok(json!({"homeworks": [{"homework_name": "p1"}]})),
            ],
            messenger.clone(),
            1,
        );

        assert!(matches!(engine.tick().await, TickOutcome::ErrorReported(_)));
        assert!(matches!(engine.tick().await, TickOutcome::ErrorReported(_)));

        let attempts = messenger.attempts();
        assert_eq!(attempts.len(), 2);
        assert!(attempts[0].starts_with("Сбой в работе программы: "));
        assert!(attempts[1].contains("status"));
    }

    #[tokio::test]
    async fn unrecognized_status_is_an_error_not_a_change() {
        let messenger = RecordingMessenger::always_ok();
        let mut engine = engine(
            vec![page("p1", "resubmitted", 100)],
            messenger.clone(),
            1,
        );

        assert!(matches!(engine.tick().await, TickOutcome::ErrorReported(_)));
        // The bad item never became stored state, and its cursor was never
        // adopted.
        assert_eq!(engine.cursor(), 1);
        assert!(messenger.attempts()[0].contains("resubmitted"));
    }
}
