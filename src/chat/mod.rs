//! Chat client logic: optimistic timeline and send protocol
//!
//! [`Timeline`] is transport agnostic; [`ChatBackend`] abstracts the server
//! calls. [`LocalChatBackend`] runs them in-process against the application state.

pub mod local;
pub mod sender;
pub mod timeline;

pub use local::LocalChatBackend;
pub use sender::{Attachment, ChatBackend, SendOutcome, receive, send_message};
pub use timeline::{Applied, DeliveryStatus, Timeline, TimelineEntry};
