use crate::dtos::{ChatMessageDTO, NotificationDTO};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

/// Signals delivered to the writer task of a connection
#[derive(Debug)]
pub enum InternalSignal {
    Shutdown,
    /// Start forwarding a conversation opened after the connection was set up.
    /// The receiver is created by the sender of the signal so nothing published
    /// in between is lost.
    AddConversation {
        conversation_id: i64,
        rx: Receiver<Arc<ChatMessageDTO>>,
    },
    Notification(NotificationDTO),
    Error { code: u16, message: String },
}

impl InternalSignal {
    fn kind(&self) -> &'static str {
        match self {
            InternalSignal::Shutdown => "Shutdown",
            InternalSignal::AddConversation { .. } => "AddConversation",
            InternalSignal::Notification(_) => "Notification",
            InternalSignal::Error { .. } => "Error",
        }
    }
}

/// Online users. The latest connection of a user wins.
pub struct UserMap {
    users_online: DashMap<i64, UnboundedSender<InternalSignal>>,
}

impl Default for UserMap {
    fn default() -> Self {
        Self::new()
    }
}

impl UserMap {
    pub fn new() -> Self {
        UserMap {
            users_online: DashMap::new(),
        }
    }

    #[instrument(skip(self, tx))]
    pub fn register_online(&self, user_id: i64, tx: UnboundedSender<InternalSignal>) {
        self.users_online.insert(user_id, tx);
        info!(online = self.users_online.len(), "User registered as online");
    }

    /// Removes the user only if `tx` is still its registered connection
    #[instrument(skip(self, tx))]
    pub fn remove_from_online(&self, user_id: i64, tx: &UnboundedSender<InternalSignal>) {
        if self
            .users_online
            .remove_if(&user_id, |_, current| current.same_channel(tx))
            .is_some()
        {
            info!("User removed from online");
        }
    }

    /// Returns whether the signal reached a live connection
    #[instrument(skip(self, signal), fields(kind = signal.kind()))]
    pub fn send_if_online(&self, user_id: i64, signal: InternalSignal) -> bool {
        let Some(entry) = self.users_online.get(&user_id) else {
            debug!("User not online, signal dropped");
            return false;
        };
        match entry.value().send(signal) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send {} signal to user", e.0.kind());
                false
            }
        }
    }

    pub fn online_count(&self) -> usize {
        self.users_online.len()
    }

    pub fn is_user_online(&self, user_id: i64) -> bool {
        self.users_online.contains_key(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn stale_connection_does_not_evict_the_new_one() {
        let map = UserMap::new();
        let (old_tx, _old_rx) = unbounded_channel();
        let (new_tx, mut new_rx) = unbounded_channel();

        map.register_online(1, old_tx.clone());
        map.register_online(1, new_tx.clone());
        map.remove_from_online(1, &old_tx);
        assert!(map.is_user_online(1));

        let (_tx, rx) = broadcast::channel(1);
        assert!(map.send_if_online(1, InternalSignal::AddConversation { conversation_id: 9, rx }));
        assert!(matches!(
            new_rx.try_recv(),
            Ok(InternalSignal::AddConversation { conversation_id: 9, .. })
        ));

        map.remove_from_online(1, &new_tx);
        assert_eq!(map.online_count(), 0);
        assert!(!map.send_if_online(1, InternalSignal::Shutdown));
    }
}
