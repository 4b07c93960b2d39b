//! Server-sent-events framing for the observer stream.

use std::convert::Infallible;

use actix_web::web::Bytes;
use futures::Stream;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

use crate::model::ComplaintEvent;

pub const CONNECTED_EVENT: &str = "connected";

/// One SSE frame: `event: <name>` followed by a single JSON `data:` line.
pub fn sse_frame<T: Serialize>(event: &str, data: &T) -> Bytes {
    let payload = serde_json::to_string(data).unwrap_or_else(|_| "null".to_string());
    Bytes::from(format!("event: {event}\ndata: {payload}\n\n"))
}

/// Greets the observer, then forwards every event sent after `receiver` was created.
pub fn event_stream(
    mut receiver: broadcast::Receiver<ComplaintEvent>,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    async_stream::stream! {
        yield Ok::<_, Infallible>(sse_frame(
            CONNECTED_EVENT,
            &serde_json::json!({ "msg": "connected to backend" }),
        ));

        loop {
            match receiver.recv().await {
                Ok(event) => {
                    yield Ok(sse_frame(event.name(), event.complaint()));
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "observer fell behind, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
