//! User accounts.

use crate::{
    error::{ApiError, ApiResult},
    middleware::authz::{Identity, IdentityStore, Role},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Stored user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user; an existing email is a conflict.
    pub async fn create(&self, user: NewUser) -> ApiResult<User> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match ApiError::from(err) {
            ApiError::Conflict(_) => ApiError::Conflict("user with this email".into()),
            other => other,
        })
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Remove an account. Tokens already issued for it stop authorizing.
    pub async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl IdentityStore for UserRepository {
    async fn find_identity(&self, id: Uuid) -> ApiResult<Option<Identity>> {
        let row: Option<(Uuid, Role)> = sqlx::query_as("SELECT id, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, role)| Identity { id, role }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            name: "Kofi".into(),
            email: email.into(),
            password_hash: "hash".into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_resolve_identity() {
        let users = UserRepository::new(test_pool().await);
        let user = users.create(new_user("kofi@example.com", Role::Vendor)).await.unwrap();

        let identity = users.find_identity(user.id).await.unwrap().unwrap();
        assert_eq!(identity, Identity { id: user.id, role: Role::Vendor });

        let by_email = users.find_by_email("kofi@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let users = UserRepository::new(test_pool().await);
        users.create(new_user("dup@example.com", Role::User)).await.unwrap();

        let err = users.create(new_user("dup@example.com", Role::User)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_deleted_user_no_longer_resolves() {
        let users = UserRepository::new(test_pool().await);
        let user = users.create(new_user("gone@example.com", Role::User)).await.unwrap();

        assert!(users.delete(user.id).await.unwrap());
        assert!(users.find_identity(user.id).await.unwrap().is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::nil(),
            name: "Kofi".into(),
            email: "kofi@example.com".into(),
            password_hash: "secret".into(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }
}
