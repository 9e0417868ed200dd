//! Server-sent change events.
//!
//! Each connection mounts one observer per collection on the server's
//! browsing context. The observers live as long as the stream, so a client
//! disconnecting unmounts them.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use mosso_core::{Collection, CollectionKind};
use serde::Serialize;
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};
use tracing::instrument;

use crate::error::Result;
use crate::observer::CollectionObserver;
use crate::routes::blocking;
use crate::state::AppState;

/// Payload of a `cart` or `wishlist` event.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionChanged {
    pub kind: CollectionKind,
    /// Distinct product ids in the collection.
    pub count: usize,
}

fn change_event<C: Collection>(collection: &C) -> Event {
    let payload = CollectionChanged {
        kind: C::KIND,
        count: collection.len(),
    };
    Event::default()
        .event(C::KIND.as_str())
        .json_data(&payload)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to encode change event");
            Event::default().event(C::KIND.as_str())
        })
}

fn observe<C: Collection>(observer: CollectionObserver<C>) -> impl Stream<Item = Event> + Send {
    // The first item is the value seen at mount.
    WatchStream::new(observer.watch()).map(move |collection| {
        let _mounted = &observer;
        change_event(&collection)
    })
}

/// Stream cart and wishlist changes as server-sent events.
#[instrument(skip(state))]
pub async fn stream(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let context = state.context().clone();
    let (cart, wishlist) =
        blocking(move || Ok((context.observe_cart(), context.observe_wishlist()))).await?;

    tracing::debug!("Event stream opened");
    let events = observe(cart).merge(observe(wishlist)).map(Ok);

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
