use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::pagination::{Page, PageRequest};
use crate::application::ports::{
    ConversationRepository, MessageRepository, RepositoryError, UserRepository,
};
use crate::domain::{
    Conversation, ConversationId, MAX_CONTENT_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
    Message, User, UserId, normalize_email,
};

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let slice = items.iter().skip(offset).take(limit).cloned().collect();
    Page::new(slice, items.len() as i64, page)
}

fn check_length(field: &str, value: &str, min: u64, max: u64) -> Result<(), RepositoryError> {
    let len = value.chars().count() as u64;
    if len < min || len > max {
        return Err(RepositoryError::InvalidData(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

fn check_conversation(conversation: &Conversation) -> Result<(), RepositoryError> {
    check_length("title", &conversation.title, 1, MAX_TITLE_LENGTH)?;
    if let Some(description) = &conversation.description {
        check_length("description", description, 0, MAX_DESCRIPTION_LENGTH)?;
    }
    Ok(())
}

/// Process-local user store. Insertion order is kept so listings are stable.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<User>, RepositoryError> {
        let users = self.users.read().await;
        let mut active: Vec<User> = users.iter().filter(|u| u.is_active).cloned().collect();
        // Ties on created_at resolve to the later insert.
        active.reverse();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&active, page))
    }

    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        let email = normalize_email(&user.email);
        if users.iter().any(|u| u.email == email) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "email {email} already exists"
            )));
        }
        let mut stored = user.clone();
        stored.email = email;
        users.push(stored);
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.is_active = false;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email == email))
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<Vec<Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_recent_activity(a: &Conversation, b: &Conversation) -> std::cmp::Ordering {
    // Never-messaged conversations sort after any with activity.
    match (a.last_message_at, b.last_message_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| b.created_at.cmp(&a.created_at))
}

impl InMemoryConversationRepository {
    async fn active_for(&self, user_id: UserId) -> Vec<Conversation> {
        let conversations = self.conversations.read().await;
        let mut owned: Vec<Conversation> = conversations
            .iter()
            .filter(|c| c.user_id == user_id && c.is_active)
            .cloned()
            .collect();
        owned.sort_by(by_recent_activity);
        owned
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let conversations = self.conversations.read().await;
        Ok(conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Conversation>, RepositoryError> {
        Ok(paginate(&self.active_for(user_id).await, page))
    }

    async fn find_active_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        Ok(self.active_for(user_id).await)
    }

    async fn create(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        check_conversation(conversation)?;
        let mut conversations = self.conversations.write().await;
        if conversations.iter().any(|c| c.id == conversation.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }
        conversations.push(conversation.clone());
        Ok(())
    }

    async fn delete(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let mut conversations = self.conversations.write().await;
        match conversations.iter_mut().find(|c| c.id == id) {
            Some(conversation) => {
                conversation.is_active = false;
                conversation.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_message_count(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let mut conversations = self.conversations.write().await;
        match conversations.iter_mut().find(|c| c.id == id) {
            Some(conversation) => {
                conversation.message_count += 1;
                conversation.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_last_message_time(
        &self,
        id: ConversationId,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut conversations = self.conversations.write().await;
        match conversations.iter_mut().find(|c| c.id == id) {
            Some(conversation) => {
                conversation.last_message_at = Some(timestamp);
                conversation.updated_at = timestamp;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn find_by_conversation_id(
        &self,
        conversation_id: ConversationId,
        page: PageRequest,
    ) -> Result<Page<Message>, RepositoryError> {
        let messages = self.messages.read().await;
        let mut thread: Vec<Message> = messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order.
        thread.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(paginate(&thread, page))
    }

    async fn create(&self, message: &Message) -> Result<(), RepositoryError> {
        check_length("content", &message.content, 1, MAX_CONTENT_LENGTH)?;
        let mut messages = self.messages.write().await;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "message {} already exists",
                message.id
            )));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn delete_by_conversation_id(
        &self,
        conversation_id: ConversationId,
    ) -> Result<u64, RepositoryError> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.conversation_id != conversation_id);
        Ok((before - messages.len()) as u64)
    }

    async fn count_by_conversation_id(
        &self,
        conversation_id: ConversationId,
    ) -> Result<i64, RepositoryError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageType, UserRole};

    fn user(email: &str) -> User {
        User::new(email, "Ada".to_string(), "hash".to_string(), UserRole::User)
    }

    #[tokio::test]
    async fn duplicate_email_differing_in_case_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("ada@example.com")).await.unwrap();

        let err = repo.create(&user("ADA@Example.com")).await.unwrap_err();

        assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn soft_deleted_user_is_hidden_from_listing_but_still_resolvable() {
        let repo = InMemoryUserRepository::new();
        let ada = user("ada@example.com");
        repo.create(&ada).await.unwrap();

        assert!(repo.delete(ada.id).await.unwrap());

        let page = repo.find_all(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(repo.find_by_id(ada.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn conversations_with_recent_messages_sort_first() {
        let repo = InMemoryConversationRepository::new();
        let owner = UserId::new();
        let quiet = Conversation::new(owner, "quiet".to_string(), None);
        let busy = Conversation::new(owner, "busy".to_string(), None);
        repo.create(&quiet).await.unwrap();
        repo.create(&busy).await.unwrap();

        repo.update_last_message_time(busy.id, Utc::now()).await.unwrap();

        let listed = repo.find_active_by_user_id(owner).await.unwrap();
        assert_eq!(listed[0].id, busy.id);
        assert_eq!(listed[1].id, quiet.id);
    }

    #[tokio::test]
    async fn overlong_title_is_invalid_data() {
        let repo = InMemoryConversationRepository::new();
        let conversation = Conversation::new(UserId::new(), "x".repeat(201), None);

        let err = repo.create(&conversation).await.unwrap_err();

        assert!(matches!(err, RepositoryError::InvalidData(_)));
    }

    #[tokio::test]
    async fn messages_come_back_oldest_first() {
        let repo = InMemoryMessageRepository::new();
        let conversation_id = ConversationId::new();
        let author = UserId::new();
        for content in ["first", "second", "third"] {
            let message = Message::new(
                conversation_id,
                author,
                content.to_string(),
                MessageType::User,
                None,
            );
            repo.create(&message).await.unwrap();
        }

        let page = repo
            .find_by_conversation_id(conversation_id, PageRequest::new(1, 2))
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let contents: Vec<_> = page.items.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second"]);
    }
}
