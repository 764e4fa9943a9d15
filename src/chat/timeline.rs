//! Client-side view of one conversation
//!
//! Outgoing messages appear immediately with a temporary correlation id and are
//! reconciled with the server row once the insert returns or the realtime echo
//! arrives, whichever comes first. Each server row ends up in exactly one entry.

use crate::dtos::ChatMessageDTO;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sending,
    Delivered,
    Failed,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    /// `tmp-<uuid>` while unconfirmed, `srv-<message_id>` afterwards
    pub client_ref: String,
    pub server_id: Option<i64>,
    pub sender_id: i64,
    pub content: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: DeliveryStatus,
}

impl TimelineEntry {
    fn from_server(message: &ChatMessageDTO) -> Self {
        Self {
            client_ref: server_ref(message.message_id),
            server_id: Some(message.message_id),
            sender_id: message.sender_id,
            content: message.content.clone(),
            image_path: message.image_path.clone(),
            created_at: message.created_at,
            status: DeliveryStatus::Delivered,
        }
    }

    fn merge(&mut self, message: &ChatMessageDTO) {
        self.client_ref = server_ref(message.message_id);
        self.server_id = Some(message.message_id);
        self.content = message.content.clone();
        self.image_path = message.image_path.clone();
        self.created_at = message.created_at;
        self.status = DeliveryStatus::Delivered;
    }
}

/// Outcome of feeding a realtime event into the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Echo of our own message, folded into its optimistic entry
    Merged,
    /// Message from the other participant; the thread should be marked read
    Incoming,
    /// Our own message sent from another session
    Appended,
    /// Row already on screen
    Duplicate,
    /// Event belongs to another conversation
    Ignored,
}

pub fn server_ref(message_id: i64) -> String {
    format!("srv-{message_id}")
}

#[derive(Debug, Clone)]
pub struct Timeline {
    conversation_id: i64,
    local_user: i64,
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new(conversation_id: i64, local_user: i64) -> Self {
        Self {
            conversation_id,
            local_user,
            entries: Vec::new(),
        }
    }

    /// Initial fetch; every entry is already delivered
    pub fn from_history(conversation_id: i64, local_user: i64, messages: &[ChatMessageDTO]) -> Self {
        let mut timeline = Self::new(conversation_id, local_user);
        for message in messages {
            if !timeline.contains_server_id(message.message_id) {
                timeline.entries.push(TimelineEntry::from_server(message));
            }
        }
        timeline
    }

    pub fn conversation_id(&self) -> i64 {
        self.conversation_id
    }

    pub fn local_user(&self) -> i64 {
        self.local_user
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, client_ref: &str) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.client_ref == client_ref)
    }

    /// Appends an unsent message and returns its correlation id
    pub fn push_optimistic(&mut self, content: &str, image_path: Option<String>) -> String {
        let client_ref = format!("tmp-{}", Uuid::new_v4());
        self.entries.push(TimelineEntry {
            client_ref: client_ref.clone(),
            server_id: None,
            sender_id: self.local_user,
            content: content.to_string(),
            image_path,
            created_at: Utc::now(),
            status: DeliveryStatus::Sending,
        });
        client_ref
    }

    /// Records the stored path of an attachment uploaded after the optimistic insert
    pub fn attach(&mut self, client_ref: &str, image_path: String) -> bool {
        match self.position_by_ref(client_ref) {
            Some(index) => {
                self.entries[index].image_path = Some(image_path);
                true
            }
            None => false,
        }
    }

    /// The entry stays on screen flagged as failed
    pub fn mark_failed(&mut self, client_ref: &str) -> bool {
        match self.position_by_ref(client_ref) {
            Some(index) if self.entries[index].status == DeliveryStatus::Sending => {
                self.entries[index].status = DeliveryStatus::Failed;
                true
            }
            _ => false,
        }
    }

    /// Binds the optimistic entry to the row returned by the insert.
    ///
    /// When the echo got there first and was appended on its own, the optimistic
    /// entry is dropped instead so the row is shown once.
    pub fn confirm(&mut self, client_ref: &str, message: &ChatMessageDTO) -> bool {
        let Some(index) = self.position_by_ref(client_ref) else {
            // already merged by the echo
            return self.contains_server_id(message.message_id);
        };

        if let Some(existing) = self.position_by_server_id(message.message_id) {
            if existing != index {
                debug!(client_ref, message_id = message.message_id, "Echo arrived first, dropping optimistic entry");
                self.entries.remove(index);
                return true;
            }
        }

        self.entries[index].merge(message);
        true
    }

    pub fn apply_event(&mut self, message: &ChatMessageDTO) -> Applied {
        if message.conversation_id != self.conversation_id {
            return Applied::Ignored;
        }

        if message.sender_id == self.local_user {
            let by_ref = message
                .client_ref
                .as_deref()
                .and_then(|client_ref| self.position_by_ref(client_ref));

            if let Some(index) = by_ref {
                if self.entries[index].server_id.is_none() {
                    self.entries[index].merge(message);
                    return Applied::Merged;
                }
            }

            if self.contains_server_id(message.message_id) {
                return Applied::Duplicate;
            }

            if let Some(index) = by_ref {
                self.entries[index].merge(message);
                return Applied::Merged;
            }

            self.entries.push(TimelineEntry::from_server(message));
            return Applied::Appended;
        }

        if self.contains_server_id(message.message_id) {
            return Applied::Duplicate;
        }
        self.entries.push(TimelineEntry::from_server(message));
        Applied::Incoming
    }

    fn position_by_ref(&self, client_ref: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.client_ref == client_ref)
    }

    fn position_by_server_id(&self, message_id: i64) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.server_id == Some(message_id))
    }

    fn contains_server_id(&self, message_id: i64) -> bool {
        self.position_by_server_id(message_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ME: i64 = 1;
    const OTHER: i64 = 2;

    fn row(id: i64, sender: i64, content: &str, client_ref: Option<&str>) -> ChatMessageDTO {
        ChatMessageDTO {
            message_id: id,
            conversation_id: 10,
            sender_id: sender,
            content: content.to_string(),
            image_path: None,
            image_url: None,
            created_at: Utc::now(),
            client_ref: client_ref.map(str::to_string),
        }
    }

    #[test]
    fn insert_then_echo_yields_one_entry() {
        let mut timeline = Timeline::new(10, ME);
        let client_ref = timeline.push_optimistic("hola", None);
        assert_eq!(timeline.entries()[0].status, DeliveryStatus::Sending);

        let stored = row(5, ME, "hola", None);
        assert!(timeline.confirm(&client_ref, &stored));

        let echo = row(5, ME, "hola", Some(&client_ref));
        assert_eq!(timeline.apply_event(&echo), Applied::Duplicate);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.entries()[0].status, DeliveryStatus::Delivered);
        assert_eq!(timeline.entries()[0].client_ref, "srv-5");
    }

    #[test]
    fn echo_then_insert_yields_one_entry() {
        let mut timeline = Timeline::new(10, ME);
        let client_ref = timeline.push_optimistic("hola", None);

        let echo = row(5, ME, "hola", Some(&client_ref));
        assert_eq!(timeline.apply_event(&echo), Applied::Merged);
        assert!(timeline.confirm(&client_ref, &row(5, ME, "hola", None)));

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.entries()[0].server_id, Some(5));
    }

    #[test]
    fn uncorrelated_echo_before_insert_is_deduplicated() {
        let mut timeline = Timeline::new(10, ME);
        let client_ref = timeline.push_optimistic("hola", None);

        assert_eq!(timeline.apply_event(&row(5, ME, "hola", None)), Applied::Appended);
        assert_eq!(timeline.len(), 2);

        assert!(timeline.confirm(&client_ref, &row(5, ME, "hola", None)));
        assert_eq!(timeline.len(), 1);
        assert!(timeline.find(&client_ref).is_none());
    }

    #[test]
    fn incoming_messages_are_appended_once() {
        let history = vec![row(1, OTHER, "buenas", None)];
        let mut timeline = Timeline::from_history(10, ME, &history);

        assert_eq!(timeline.apply_event(&row(1, OTHER, "buenas", None)), Applied::Duplicate);
        assert_eq!(timeline.apply_event(&row(2, OTHER, "¿qué tal?", None)), Applied::Incoming);
        assert_eq!(timeline.len(), 2);

        let mut foreign = row(3, OTHER, "otra", None);
        foreign.conversation_id = 99;
        assert_eq!(timeline.apply_event(&foreign), Applied::Ignored);
    }

    #[test]
    fn failed_entries_stay_visible() {
        let mut timeline = Timeline::new(10, ME);
        let client_ref = timeline.push_optimistic("hola", None);
        assert!(timeline.mark_failed(&client_ref));
        assert!(!timeline.mark_failed(&client_ref));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.entries()[0].status, DeliveryStatus::Failed);
    }
}
