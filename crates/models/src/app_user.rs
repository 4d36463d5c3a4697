use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Longest username the schema accepts, in characters.
pub const USERNAME_MAX_LEN: usize = 64;

/// Longest normalized key. Case folding can expand a character
/// (`İ` lowercases to `i̇`), so the key column is wider than the username.
pub const USERNAME_KEY_MAX_LEN: usize = USERNAME_MAX_LEN * 3;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    #[sea_orm(unique)]
    pub username_key: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a credential row. Uniqueness of `username_key` is left to the
/// database index so concurrent inserts cannot both succeed; a violation
/// comes back as [`ModelError::Duplicate`].
pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    username_key: &str,
    password_hash: &str,
    password_salt: &str,
) -> Result<Model, ModelError> {
    if username_key.is_empty() { return Err(ModelError::Validation("username required".into())); }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(ModelError::Validation(format!("username longer than {USERNAME_MAX_LEN} characters")));
    }
    if username_key.chars().count() > USERNAME_KEY_MAX_LEN {
        return Err(ModelError::Validation(format!("username key longer than {USERNAME_KEY_MAX_LEN} characters")));
    }
    if password_hash.is_empty() || password_salt.is_empty() {
        return Err(ModelError::Validation("password hash and salt required".into()));
    }
    let am = ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        username_key: Set(username_key.to_string()),
        password_hash: Set(password_hash.to_string()),
        password_salt: Set(password_salt.to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_username_key(db: &DatabaseConnection, username_key: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UsernameKey.eq(username_key))
        .one(db)
        .await?)
}
