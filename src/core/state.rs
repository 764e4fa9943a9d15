//! Application State - shared by every route, middleware and realtime task

use crate::repositories::{
    AnnouncementRepository, AppointmentRepository, CommunityRepository, ContentRepository,
    ConversationRepository, MessageRepository, ModerationRepository, NotificationRepository,
    ProfileRepository, QuestionRepository, UserRepository,
};
use crate::storage::ObjectStore;
use crate::ws::chatmap::ChatMap;
use crate::ws::usermap::UserMap;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct AppState {
    pub user: UserRepository,
    pub profile: ProfileRepository,
    pub community: CommunityRepository,
    pub question: QuestionRepository,
    pub announcement: AnnouncementRepository,
    pub conversation: ConversationRepository,
    pub msg: MessageRepository,
    pub appointment: AppointmentRepository,
    pub content: ContentRepository,
    pub moderation: ModerationRepository,
    pub notification: NotificationRepository,

    /// Object storage for uploaded images
    pub store: Arc<dyn ObjectStore>,

    /// Secret key per JWT token
    pub jwt_secret: String,

    /// Online users with the sender side of their connection's signal channel
    pub users_online: UserMap,

    /// One broadcast channel per conversation with at least one subscriber
    pub chats_online: ChatMap,
}

impl AppState {
    /// Builds every repository over the shared connection pool.
    ///
    /// # Arguments
    /// * `pool` - Shared SQLite pool
    /// * `jwt_secret` - Key used to sign session tokens
    /// * `store` - Object storage backend
    pub fn new(pool: SqlitePool, jwt_secret: String, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            profile: ProfileRepository::new(pool.clone()),
            community: CommunityRepository::new(pool.clone()),
            question: QuestionRepository::new(pool.clone()),
            announcement: AnnouncementRepository::new(pool.clone()),
            conversation: ConversationRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            appointment: AppointmentRepository::new(pool.clone()),
            content: ContentRepository::new(pool.clone()),
            moderation: ModerationRepository::new(pool.clone()),
            notification: NotificationRepository::new(pool),
            store,
            jwt_secret,
            users_online: UserMap::new(),
            chats_online: ChatMap::new(),
        }
    }
}
