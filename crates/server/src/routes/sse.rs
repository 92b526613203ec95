use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use utoipa::IntoParams;
use veto_core::ChannelId;

use crate::state::AppState;

pub const SSE_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventsQuery {
    /// Only stream events of this channel
    pub channel: Option<ChannelId>,
}

fn envelope_to_sse_event(envelope: &events::EventEnvelope) -> Result<Event, Infallible> {
    let data = serde_json::to_string(&envelope).unwrap_or_else(|_| "{}".to_string());

    Ok(Event::default()
        .id(envelope.id.to_string())
        .event(envelope.event.event_type())
        .data(data))
}

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "SSE event stream"),
    ),
    tag = "events"
)]
pub async fn events_stream(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Sse<KeepAliveStream<BoxStream<'static, Result<Event, Infallible>>>> {
    let stream = match query.channel {
        Some(channel) => {
            let subscription = state.event_bus.subscribe_channel(channel);
            stream::unfold(subscription, |mut subscription| async move {
                let envelope = subscription.recv().await?;
                Some((envelope_to_sse_event(&envelope), subscription))
            })
            .boxed()
        }
        None => BroadcastStream::new(state.event_bus.subscribe())
            .filter_map(|result| async move {
                match result {
                    Ok(envelope) => Some(envelope_to_sse_event(&envelope)),
                    Err(e) => {
                        tracing::warn!("SSE broadcast error: {:?}", e);
                        None
                    }
                }
            })
            .boxed(),
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(SSE_KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_to_sse_event_does_not_panic() {
        let envelope = events::EventEnvelope::new(events::Event::VetoCancelled { channel: 1 });
        let _event = envelope_to_sse_event(&envelope).unwrap();
    }

    #[test]
    fn test_events_query_parses_channel() {
        let query: EventsQuery = serde_json::from_str(r#"{"channel": 42}"#).unwrap();
        assert_eq!(query.channel, Some(42));
    }
}
