//! WebSocket Connection Management - reader and writer task per connection

use crate::core::AppState;
use crate::dtos::{WsClientEventDTO, WsEventDTO};
use crate::ws::event_handlers::process_client_event;
use crate::ws::usermap::InternalSignal;
use crate::ws::{BATCH_INTERVAL, BATCH_MAX_SIZE, RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Duration, interval, timeout};
use tokio_stream::StreamMap;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, instrument, warn};

#[instrument(skip(ws, state))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user_id: i64) {
    info!("WebSocket connection established");

    let (ws_tx, ws_rx) = ws.split();

    // unbounded so signals raised by HTTP handlers never wait on a slow socket
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    state.users_online.register_online(user_id, int_tx.clone());

    tokio::spawn(listen_ws(user_id, ws_rx, int_tx, state.clone()));
    tokio::spawn(write_ws(user_id, ws_tx, int_rx, state));
}

#[instrument(skip(websocket_tx, internal_rx, state))]
pub async fn write_ws(
    user_id: i64,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<InternalSignal>,
    state: Arc<AppState>,
) {
    debug!("Write task started");

    let conversation_ids: Vec<i64> = match state.conversation.list_for_user(user_id).await {
        Ok(conversations) => conversations.iter().map(|c| c.conversation_id).collect(),
        Err(e) => {
            error!("Failed to load user conversations: {:?}", e);
            return;
        }
    };
    info!(conversation_count = conversation_ids.len(), "Conversations loaded");

    let mut stream_map = StreamMap::new();
    state
        .chats_online
        .subscribe_multiple(&conversation_ids)
        .into_iter()
        .zip(conversation_ids.iter())
        .for_each(|(rx, &conversation_id)| {
            stream_map.insert(conversation_id, BroadcastStream::new(rx));
        });

    let mut batch: Vec<WsEventDTO> = Vec::new();
    let mut interval = interval(Duration::from_millis(BATCH_INTERVAL));
    interval.tick().await;

    'external: loop {
        tokio::select! {
            Some((_, result)) = tokio_stream::StreamExt::next(&mut stream_map) => {
                match result {
                    Ok(msg) => {
                        batch.push(WsEventDTO::NewMessage((*msg).clone()));
                        if batch.len() >= BATCH_MAX_SIZE {
                            if send_batch(&mut websocket_tx, &batch).await.is_err() {
                                warn!("Failed to send batch, closing connection");
                                break 'external;
                            }
                            batch.clear();
                        }
                    }
                    // lagged receiver: the skipped messages are in the history endpoint
                    Err(e) => warn!("Broadcast receiver lagged: {:?}", e),
                }
            }

            _ = interval.tick() => {
                if !batch.is_empty() {
                    if send_batch(&mut websocket_tx, &batch).await.is_err() {
                        warn!("Failed to send batch on interval, closing connection");
                        break 'external;
                    }
                    debug!(batch_size = batch.len(), "Batch sent on interval");
                    batch.clear();
                }
            }

            signal = internal_rx.recv() => {
                let event = match signal {
                    Some(InternalSignal::Shutdown) | None => {
                        info!("Shutdown signal received");
                        break 'external;
                    }
                    Some(InternalSignal::AddConversation { conversation_id, rx }) => {
                        if !stream_map.contains_key(&conversation_id) {
                            info!(conversation_id, "Adding conversation subscription");
                            stream_map.insert(conversation_id, BroadcastStream::new(rx));
                        }
                        continue;
                    }
                    Some(InternalSignal::Notification(notification)) => {
                        WsEventDTO::Notification(notification)
                    }
                    Some(InternalSignal::Error { code, message }) => {
                        WsEventDTO::Error { code, message }
                    }
                };
                // out-of-band events skip the batch
                if send_batch(&mut websocket_tx, &[event]).await.is_err() {
                    break 'external;
                }
            }
        }
    }

    if !batch.is_empty() {
        debug!(batch_size = batch.len(), "Sending final batch before shutdown");
        let _ = send_batch(&mut websocket_tx, &batch).await;
    }

    info!("Write task terminated");
}

#[instrument(skip(websocket_tx, batch), fields(batch_size = batch.len()))]
async fn send_batch(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    batch: &[WsEventDTO],
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(batch).map_err(|e| {
        error!("Failed to serialize batch: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx
        .send(Message::Text(Utf8Bytes::from(json)))
        .await
        .map_err(|e| {
            error!("Failed to send batch through WebSocket: {:?}", e);
            e
        })
}

#[instrument(skip(websocket_rx, internal_tx, state))]
pub async fn listen_ws(
    user_id: i64,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    debug!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, StreamExt::next(&mut websocket_rx)).await {
            Ok(Some(msg_result)) => {
                rate_limiter.tick().await;

                let msg = match msg_result {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<WsClientEventDTO>(&text) {
                        Ok(event) => process_client_event(&state, user_id, event).await,
                        Err(e) => {
                            warn!("Failed to deserialize client event: {}", e);
                            let _ = internal_tx.send(InternalSignal::Error {
                                code: 400,
                                message: "Malformed event".to_string(),
                            });
                        }
                    },
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(timeout_secs = TIMEOUT_DURATION_SECONDS, "Connection timeout");
                break;
            }
        }
    }

    let _ = internal_tx.send(InternalSignal::Shutdown);
    state.users_online.remove_from_online(user_id, &internal_tx);
    info!("Listen task terminated");
}
