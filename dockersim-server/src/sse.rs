//! Server-Sent Events stream of log lines as they are appended.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

use dockersim::{LogCategory, LogEntry, LogEvent};

use crate::state::AppState;

#[derive(Serialize)]
struct SsePayload<'a> {
    category: LogCategory,
    #[serde(flatten)]
    entry: &'a LogEntry,
}

impl<'a> From<&'a LogEvent> for SsePayload<'a> {
    fn from(event: &'a LogEvent) -> Self {
        SsePayload {
            category: event.category,
            entry: &event.entry,
        }
    }
}

/// SSE endpoint handler.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.harness.subscribe();

    let stream = async_stream::stream! {
        // Send initial connected event
        yield Ok(Event::default().event("connected").data("{}"));

        loop {
            match rx.recv().await {
                Ok(log_event) => {
                    let payload = SsePayload::from(&log_event);
                    if let Ok(json) = serde_json::to_string(&payload) {
                        yield Ok(Event::default().event("log").data(json));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some log lines dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockersim::LogType;
    use dockersim::test_support::instant_harness;

    #[test]
    fn payload_flattens_entry_with_category() {
        let harness = instant_harness(1);
        let mut rx = harness.subscribe();
        harness.log(LogCategory::Deployment, "Blue environment stopped", LogType::Info);

        let event = rx.try_recv().expect("event");
        let value = serde_json::to_value(SsePayload::from(&event)).expect("serialize");
        assert_eq!(value["category"], "deployment");
        assert_eq!(value["message"], "Blue environment stopped");
        assert_eq!(value["type"], "info");
        assert_eq!(value["id"], event.entry.id);
    }

    #[tokio::test]
    async fn scenario_lines_reach_subscribers_in_order() {
        let harness = instant_harness(2);
        let mut rx = harness.subscribe();
        harness
            .run(dockersim::Scenario::Network)
            .await
            .expect("run");

        let mut messages = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.category, LogCategory::Network);
            messages.push(event.entry.message);
        }
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0], "Configuring advanced networking...");
        assert_eq!(
            messages[5],
            "Advanced networking configured. Service mesh operational."
        );
    }
}
