use crate::configuration::DatabaseSettings;
use crate::domain::{Frequency, NewSubscriber, TokenKind};
use crate::models::{NewSubscription, NewToken, NewUser, Subscription, Token, User};
use crate::store::{CreatedSubscriber, StoreError, SubscriberStore, SubscriberTokens, UserEmailInfo};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{Connection, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use secrecy::ExposeSecret;
use std::time::Duration;
use uuid::Uuid;

embed_migrations!("migrations");

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgSubscriberStore {
    pool: PgPool,
}

impl PgSubscriberStore {
    pub fn new(pool: PgPool) -> PgSubscriberStore {
        PgSubscriberStore { pool }
    }

    /// Builds the pool without opening a connection; failures surface on first use.
    pub fn connect_lazy(settings: &DatabaseSettings) -> PgSubscriberStore {
        let manager =
            ConnectionManager::<PgConnection>::new(settings.connection_string().expose_secret());
        let pool = Pool::builder()
            .max_size(settings.pool_max_size)
            .connection_timeout(Duration::from_secs(2))
            .build_unchecked(manager);
        PgSubscriberStore::new(pool)
    }

    async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&PgConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool
                .get()
                .context("Failed to retrieve a connection from the DB pool.")?;
            f(&conn)
        })
        .await
        .context("The database task panicked.")?
    }
}

#[tracing::instrument(name = "Running database migrations", skip(store))]
pub async fn run_migrations(store: &PgSubscriberStore) -> Result<(), StoreError> {
    store
        .run(|conn| {
            embedded_migrations::run(conn).context("Failed to run database migrations.")?;
            Ok(())
        })
        .await
}

impl From<DieselError> for StoreError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => StoreError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                match info.constraint_name() {
                    Some("users_email_key") => StoreError::DuplicateEmail,
                    Some("tokens_value_key") => StoreError::Duplicate("token value"),
                    Some("subscriptions_user_city_frequency_key") => {
                        StoreError::Duplicate("subscription")
                    }
                    _ => StoreError::Duplicate("record"),
                }
            }
            e => StoreError::Unexpected(anyhow::Error::new(e).context("Failed to execute query.")),
        }
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    #[tracing::instrument(name = "Get user by email", skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        use crate::schema::users;
        let email = email.to_string();
        self.run(move |conn| {
            let user = users::table
                .filter(users::email.eq(&email))
                .first::<User>(conn)?;
            Ok(user)
        })
        .await
    }

    #[tracing::instrument(
        name = "Saving new subscriber details in the database",
        skip(self, subscriber, new_tokens)
    )]
    async fn create_subscriber(
        &self,
        subscriber: &NewSubscriber,
        new_tokens: &SubscriberTokens,
    ) -> Result<CreatedSubscriber, StoreError> {
        use crate::schema::{subscriptions, tokens, users};
        let email = subscriber.email.as_ref().to_string();
        let city = subscriber.city.as_ref().to_string();
        let frequency = subscriber.frequency.as_str();
        let token_values = [
            (TokenKind::Confirm, new_tokens.confirm.as_ref().to_string()),
            (TokenKind::Unsubscribe, new_tokens.unsubscribe.as_ref().to_string()),
        ];
        self.run(move |conn| {
            conn.transaction::<_, StoreError, _>(|| {
                let created_at = Utc::now();
                let user = diesel::insert_into(users::table)
                    .values(&NewUser {
                        id: &Uuid::new_v4(),
                        email: &email,
                        is_confirmed: false,
                        created_at: &created_at,
                    })
                    .get_result::<User>(conn)?;
                let subscription = diesel::insert_into(subscriptions::table)
                    .values(&NewSubscription {
                        id: &Uuid::new_v4(),
                        user_id: &user.id,
                        city: &city,
                        frequency,
                        created_at: &created_at,
                    })
                    .get_result::<Subscription>(conn)?;
                let mut created_tokens = Vec::with_capacity(token_values.len());
                for (kind, value) in token_values.iter() {
                    let token = diesel::insert_into(tokens::table)
                        .values(&NewToken {
                            id: &Uuid::new_v4(),
                            value,
                            token_type: kind.as_str(),
                            user_id: &user.id,
                            created_at: &created_at,
                        })
                        .get_result::<Token>(conn)?;
                    created_tokens.push(token);
                }
                Ok(CreatedSubscriber {
                    user,
                    subscription,
                    tokens: created_tokens,
                })
            })
        })
        .await
    }

    #[tracing::instrument(name = "Get token by value", skip(self, value))]
    async fn find_token(&self, value: &str) -> Result<Token, StoreError> {
        use crate::schema::tokens;
        let value = value.to_string();
        self.run(move |conn| {
            let token = tokens::table
                .filter(tokens::value.eq(&value))
                .first::<Token>(conn)?;
            Ok(token)
        })
        .await
    }

    #[tracing::instrument(name = "Mark subscriber as confirmed", skip(self, token), fields(user_id = %token.user_id))]
    async fn confirm_user(&self, token: &Token) -> Result<(), StoreError> {
        use crate::schema::{tokens, users};
        let token_id = token.id;
        let user_id = token.user_id;
        self.run(move |conn| {
            conn.transaction::<_, StoreError, _>(|| {
                let consumed =
                    diesel::delete(tokens::table.filter(tokens::id.eq(token_id))).execute(conn)?;
                if consumed == 0 {
                    return Err(StoreError::NotFound);
                }
                diesel::update(users::table.filter(users::id.eq(user_id)))
                    .set(users::is_confirmed.eq(true))
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    #[tracing::instrument(name = "Delete subscriber", skip(self, token), fields(user_id = %token.user_id))]
    async fn delete_subscriber(&self, token: &Token) -> Result<(), StoreError> {
        use crate::schema::{subscriptions, tokens, users};
        let token_id = token.id;
        let user_id = token.user_id;
        self.run(move |conn| {
            conn.transaction::<_, StoreError, _>(|| {
                let consumed =
                    diesel::delete(tokens::table.filter(tokens::id.eq(token_id))).execute(conn)?;
                if consumed == 0 {
                    return Err(StoreError::NotFound);
                }
                diesel::delete(tokens::table.filter(tokens::user_id.eq(user_id))).execute(conn)?;
                diesel::delete(subscriptions::table.filter(subscriptions::user_id.eq(user_id)))
                    .execute(conn)?;
                diesel::delete(users::table.filter(users::id.eq(user_id))).execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    #[tracing::instrument(name = "Get confirmed subscribers batch", skip(self))]
    async fn confirmed_subscribers_batch(
        &self,
        frequency: Frequency,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEmailInfo>, StoreError> {
        use crate::schema::{subscriptions, tokens, users};
        self.run(move |conn| {
            let rows = users::table
                .inner_join(subscriptions::table)
                .inner_join(tokens::table)
                .filter(users::is_confirmed.eq(true))
                .filter(subscriptions::frequency.eq(frequency.as_str()))
                .filter(tokens::token_type.eq(TokenKind::Unsubscribe.as_str()))
                .order((users::created_at.asc(), users::id.asc()))
                .select((users::email, subscriptions::city, tokens::value))
                .limit(limit)
                .offset(offset)
                .load::<(String, String, String)>(conn)?;
            Ok(rows
                .into_iter()
                .map(|(email, city, token_value)| UserEmailInfo {
                    email,
                    city,
                    token_value,
                })
                .collect())
        })
        .await
    }
}
