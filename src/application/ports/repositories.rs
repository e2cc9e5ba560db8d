use std::sync::Arc;

use super::{ConversationRepository, MessageRepository, UserRepository};

/// The set of storage adapters a running service is wired with.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub messages: Arc<dyn MessageRepository>,
}
