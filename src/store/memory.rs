use crate::domain::{Frequency, NewSubscriber, TokenKind};
use crate::models::{Subscription, Token, User};
use crate::store::{CreatedSubscriber, StoreError, SubscriberStore, SubscriberTokens, UserEmailInfo};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Process-local store with the same constraints as the Postgres schema.
///
/// All tables live behind one mutex, so every method is trivially atomic.
#[derive(Default)]
pub struct InMemorySubscriberStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    subscriptions: Vec<Subscription>,
    tokens: Vec<Token>,
}

impl InMemorySubscriberStore {
    pub fn new() -> InMemorySubscriberStore {
        InMemorySubscriberStore::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unexpected(anyhow::anyhow!("The store mutex is poisoned.")))
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().map(|t| t.users.clone()).unwrap_or_default()
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.lock()
            .map(|t| t.subscriptions.clone())
            .unwrap_or_default()
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.lock().map(|t| t.tokens.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let tables = self.lock()?;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_subscriber(
        &self,
        subscriber: &NewSubscriber,
        tokens: &SubscriberTokens,
    ) -> Result<CreatedSubscriber, StoreError> {
        let mut tables = self.lock()?;
        if tables
            .users
            .iter()
            .any(|u| u.email == subscriber.email.as_ref())
        {
            return Err(StoreError::DuplicateEmail);
        }
        let values = [
            (TokenKind::Confirm, tokens.confirm.as_ref()),
            (TokenKind::Unsubscribe, tokens.unsubscribe.as_ref()),
        ];
        if values[0].1 == values[1].1
            || tables
                .tokens
                .iter()
                .any(|t| values.iter().any(|(_, v)| t.value == *v))
        {
            return Err(StoreError::Duplicate("token value"));
        }

        let created_at = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: subscriber.email.as_ref().to_string(),
            is_confirmed: false,
            created_at,
        };
        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id: user.id,
            city: subscriber.city.as_ref().to_string(),
            frequency: subscriber.frequency.as_str().to_string(),
            created_at,
        };
        let created_tokens: Vec<Token> = values
            .iter()
            .map(|(kind, value)| Token {
                id: Uuid::new_v4(),
                value: value.to_string(),
                token_type: kind.as_str().to_string(),
                user_id: user.id,
                created_at,
            })
            .collect();

        tables.users.push(user.clone());
        tables.subscriptions.push(subscription.clone());
        tables.tokens.extend(created_tokens.iter().cloned());
        Ok(CreatedSubscriber {
            user,
            subscription,
            tokens: created_tokens,
        })
    }

    async fn find_token(&self, value: &str) -> Result<Token, StoreError> {
        let tables = self.lock()?;
        tables
            .tokens
            .iter()
            .find(|t| t.value == value)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn confirm_user(&self, token: &Token) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let position = tables
            .tokens
            .iter()
            .position(|t| t.id == token.id)
            .ok_or(StoreError::NotFound)?;
        tables.tokens.remove(position);
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == token.user_id) {
            user.is_confirmed = true;
        }
        Ok(())
    }

    async fn delete_subscriber(&self, token: &Token) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if !tables.tokens.iter().any(|t| t.id == token.id) {
            return Err(StoreError::NotFound);
        }
        let user_id = token.user_id;
        tables.tokens.retain(|t| t.user_id != user_id);
        tables.subscriptions.retain(|s| s.user_id != user_id);
        tables.users.retain(|u| u.id != user_id);
        Ok(())
    }

    async fn confirmed_subscribers_batch(
        &self,
        frequency: Frequency,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEmailInfo>, StoreError> {
        let guard = self.lock()?;
        let tables: &Tables = &guard;
        let mut confirmed: Vec<&User> = tables.users.iter().filter(|u| u.is_confirmed).collect();
        confirmed.sort_by_key(|u| (u.created_at, u.id));

        let rows = confirmed
            .into_iter()
            .flat_map(|user| {
                let subscriptions = tables
                    .subscriptions
                    .iter()
                    .filter(move |s| s.user_id == user.id && s.frequency == frequency.as_str());
                subscriptions.flat_map(move |s| {
                    tables
                        .tokens
                        .iter()
                        .filter(move |t| {
                            t.user_id == user.id && t.token_type == TokenKind::Unsubscribe.as_str()
                        })
                        .map(move |t| UserEmailInfo {
                            email: user.email.clone(),
                            city: s.city.clone(),
                            token_value: t.value.clone(),
                        })
                })
            })
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok(rows)
    }
}
