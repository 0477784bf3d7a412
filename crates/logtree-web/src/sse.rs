//! Live-update event stream for one viewer

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::Event;
use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use logtree_app::{LiveEvent, ViewerSession};

/// Events for one subscriber: a hello with the current generation, then a
/// keep-alive every `keepalive` plus every invalidation broadcast by the
/// session.
///
/// The receiver is registered before the generation is read, so a change is
/// either reflected in the hello or delivered as an invalidation. A
/// subscriber that falls behind gets a single invalidation carrying the
/// current generation.
pub fn live_events(
    session: Arc<ViewerSession>,
    keepalive: Duration,
) -> impl Stream<Item = LiveEvent> {
    let rx = session.subscribe();
    let hello = LiveEvent::Hello {
        generation: session.generation(),
    };
    let mut ticker = interval_at(Instant::now() + keepalive, keepalive);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let updates = stream::unfold(
        (session, rx, ticker),
        |(session, mut rx, mut ticker)| async move {
            let event = tokio::select! {
                _ = ticker.tick() => LiveEvent::Keepalive,
                received = rx.recv() => match received {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Viewer lagged by {} event(s)", skipped);
                        LiveEvent::Invalidate {
                            generation: session.generation(),
                        }
                    }
                    Err(RecvError::Closed) => return None,
                },
            };
            Some((event, (session, rx, ticker)))
        },
    );

    stream::once(future::ready(hello)).chain(updates)
}

/// Wire frame for one event
pub fn to_sse_event(event: LiveEvent) -> Result<Event, Infallible> {
    let data = match event {
        LiveEvent::Keepalive => String::new(),
        LiveEvent::Hello { generation } | LiveEvent::Invalidate { generation } => {
            generation.to_string()
        }
    };
    Ok(Event::default().event(event.name()).data(data))
}
