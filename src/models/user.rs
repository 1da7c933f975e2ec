use crate::schema::users;
use chrono::offset::Utc;
use chrono::DateTime;

#[derive(Debug, Clone, Queryable)]
pub struct User {
    pub id: uuid::Uuid,
    pub email: String,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser<'a> {
    pub id: &'a uuid::Uuid,
    pub email: &'a str,
    pub is_confirmed: bool,
    pub created_at: &'a DateTime<Utc>,
}
