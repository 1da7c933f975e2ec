use crate::schema::subscriptions;
use chrono::offset::Utc;
use chrono::DateTime;

#[derive(Debug, Clone, Queryable)]
pub struct Subscription {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub city: String,
    pub frequency: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "subscriptions"]
pub struct NewSubscription<'a> {
    pub id: &'a uuid::Uuid,
    pub user_id: &'a uuid::Uuid,
    pub city: &'a str,
    pub frequency: &'a str,
    pub created_at: &'a DateTime<Utc>,
}
