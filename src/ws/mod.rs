//! WebSocket Module - realtime delivery of chat messages and notifications
//!
//! - HTTP -> WebSocket upgrade for an authenticated session
//! - One reader and one writer task per connection
//! - Per-conversation broadcast channels (`ChatMap`)
//! - Per-user internal signal channel (`UserMap`)

pub mod chatmap;
pub mod connection;
pub mod event_handlers;
pub mod usermap;
pub mod utils;

pub use connection::handle_socket;
pub use utils::{publish_message, send_error_to_user};

use crate::core::{AppState, Session};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

/// Slots of each conversation broadcast channel; slow receivers skip what they miss
pub const BROADCAST_CHANNEL_CAPACITY: usize = 64;
/// Flush period of the writer batch, in milliseconds
pub const BATCH_INTERVAL: u64 = 100;
/// A batch is flushed early once it holds this many events
pub const BATCH_MAX_SIZE: usize = 10;
/// Minimum spacing between two client frames, in milliseconds
pub const RATE_LIMITER_MILLIS: u64 = 10;
/// Idle connections are dropped after this many seconds without frames
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;

#[instrument(skip(ws, state, session), fields(user_id = session.user_id))]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Response {
    let user_id = session.user_id;
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}
