use crate::schema::tokens;
use chrono::offset::Utc;
use chrono::DateTime;

#[derive(Debug, Clone, Queryable)]
pub struct Token {
    pub id: uuid::Uuid,
    pub value: String,
    pub token_type: String,
    pub user_id: uuid::Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "tokens"]
pub struct NewToken<'a> {
    pub id: &'a uuid::Uuid,
    pub value: &'a str,
    pub token_type: &'a str,
    pub user_id: &'a uuid::Uuid,
    pub created_at: &'a DateTime<Utc>,
}
