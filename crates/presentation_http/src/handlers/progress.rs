//! Progress event stream

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde_json::json;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::debug;

use crate::state::AppState;

/// Name of each progress event
pub const PROGRESS_EVENT: &str = "progress_update";

async fn next_event(mut rx: Receiver<u8>) -> Option<(Result<Event, Infallible>, Receiver<u8>)> {
    loop {
        match rx.recv().await {
            Ok(percent) => {
                let event = Event::default()
                    .event(PROGRESS_EVENT)
                    .data(json!({ "progress": percent }).to_string());
                return Some((Ok(event), rx));
            },
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "Progress subscriber lagged");
            },
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Subscribe to batch progress as server-sent events
pub async fn progress_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.progress.subscribe();
    debug!("Progress subscriber connected");

    Sse::new(stream::unfold(rx, next_event)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
