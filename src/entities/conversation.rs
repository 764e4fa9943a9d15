//! Conversation entity - two-party thread with per-direction unread flags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `user_a` is always the smaller user id of the pair.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Conversation {
    pub conversation_id: i64,
    pub user_a: i64,
    pub user_b: i64,
    pub unread_a: bool,
    pub unread_b: bool,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn is_participant(&self, user_id: i64) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// The participant that is not `user_id`.
    pub fn other_participant(&self, user_id: i64) -> i64 {
        if self.user_a == user_id {
            self.user_b
        } else {
            self.user_a
        }
    }

    /// Unread flag as seen by `user_id`.
    pub fn unread_for(&self, user_id: i64) -> bool {
        if self.user_a == user_id {
            self.unread_a
        } else {
            self.unread_b
        }
    }
}

/// Orders a pair of user ids the way the conversations table stores them.
pub fn ordered_pair(first: i64, second: i64) -> (i64, i64) {
    if first < second {
        (first, second)
    } else {
        (second, first)
    }
}

#[cfg(test)]
mod tests {
    use crate::entities::{Conversation, ordered_pair};
    use chrono::Utc;

    #[test]
    fn pair_order_matches_stored_columns() {
        assert_eq!(ordered_pair(7, 3), (3, 7));
        assert_eq!(ordered_pair(3, 7), (3, 7));

        let (user_a, user_b) = ordered_pair(9, 4);
        let conversation = Conversation {
            conversation_id: 1,
            user_a,
            user_b,
            unread_a: true,
            unread_b: false,
            updated_at: Utc::now(),
        };
        assert_eq!(conversation.other_participant(9), 4);
        assert!(conversation.unread_for(4));
        assert!(!conversation.unread_for(9));
    }
}
