use crate::dtos::ChatMessageDTO;
use crate::ws::BROADCAST_CHANNEL_CAPACITY;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::SendError;
use tokio::sync::broadcast::{Receiver, Sender};
use tracing::{debug, info, instrument, warn};

pub struct ChatMap {
    /// Sender half of the broadcast channel of each conversation, by conversation_id
    channels: DashMap<i64, Sender<Arc<ChatMessageDTO>>>,
}

impl Default for ChatMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatMap {
    pub fn new() -> Self {
        ChatMap {
            channels: DashMap::new(),
        }
    }

    #[instrument(skip(self))]
    pub fn subscribe(&self, conversation_id: i64) -> Receiver<Arc<ChatMessageDTO>> {
        // entry() keeps two first subscribers from creating two channels
        self.channels
            .entry(conversation_id)
            .or_insert_with(|| {
                info!("Creating broadcast channel for conversation");
                broadcast::channel::<Arc<ChatMessageDTO>>(BROADCAST_CHANNEL_CAPACITY).0
            })
            .subscribe()
    }

    #[instrument(skip(self, conversation_ids))]
    pub fn subscribe_multiple(&self, conversation_ids: &[i64]) -> Vec<Receiver<Arc<ChatMessageDTO>>> {
        debug!(count = conversation_ids.len(), "Subscribing to conversations");
        conversation_ids.iter().map(|id| self.subscribe(*id)).collect()
    }

    /// Fans the message out to every connection subscribed to the conversation.
    /// A channel left without receivers is dropped.
    #[instrument(skip(self, msg))]
    pub fn send(
        &self,
        conversation_id: i64,
        msg: Arc<ChatMessageDTO>,
    ) -> Result<usize, SendError<Arc<ChatMessageDTO>>> {
        let Some(channel) = self.channels.get(&conversation_id) else {
            debug!("No one listening on conversation");
            return Err(SendError(msg));
        };

        let result = channel.send(msg);
        match result {
            Ok(n) => {
                debug!(receivers = n, "Message broadcast to receivers");
                Ok(n)
            }
            Err(e) => {
                warn!("No active receivers, removing channel");
                drop(channel);
                self.channels
                    .remove_if(&conversation_id, |_, tx| tx.receiver_count() == 0);
                Err(e)
            }
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
