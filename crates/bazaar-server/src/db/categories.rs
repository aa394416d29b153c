//! Categories.

use super::query;
use crate::{
    error::ApiResult,
    middleware::authz::{OwnedResource, OwnershipScope},
    request::{CategoryPatch, FilterValue, ListFields, ListQuery, NewCategory},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub const LISTING: ListFields = ListFields {
        columns: &[
            ("id", "id"),
            ("name", "name"),
            ("image", "image"),
            ("user", "user_id"),
            ("created_at", "created_at"),
            ("updated_at", "updated_at"),
        ],
        id_fields: &["id", "user"],
        default_limit: 100,
    };
}

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, category: &NewCategory, owner: Uuid) -> ApiResult<Category> {
        let now = Utc::now();
        Ok(sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, image, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&category.name)
        .bind(&category.image)
        .bind(owner)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn list(&self, query: &ListQuery) -> ApiResult<Vec<Category>> {
        Ok(query::select_list("categories", query)
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn count(&self, filters: &[(&'static str, FilterValue)]) -> ApiResult<i64> {
        Ok(query::count("categories", filters)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Category>> {
        Ok(sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl OwnedResource for CategoryRepository {
    type Record = Category;
    type Patch = CategoryPatch;
    const NAME: &'static str = "Category";

    async fn update_owned(
        &self,
        scope: OwnershipScope,
        patch: &CategoryPatch,
    ) -> ApiResult<Option<Category>> {
        Ok(sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ?, image = COALESCE(?, image), updated_at = ? \
             WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(&patch.name)
        .bind(&patch.image)
        .bind(Utc::now())
        .bind(scope.id)
        .bind(scope.owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_owned(&self, scope: OwnershipScope) -> ApiResult<Option<Category>> {
        Ok(sqlx::query_as::<_, Category>(
            "DELETE FROM categories WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(scope.id)
        .bind(scope.owner)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_update_keeps_image_without_new_upload() {
        let categories = CategoryRepository::new(test_pool().await);
        let owner = Uuid::new_v4();
        let created = categories
            .create(
                &NewCategory {
                    name: "Lighting".into(),
                    image: Some("a.png".into()),
                },
                owner,
            )
            .await
            .unwrap();

        let patch = CategoryPatch {
            name: "Lamps".into(),
            image: None,
        };
        let updated = categories
            .update_owned(OwnershipScope { id: created.id, owner }, &patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Lamps");
        assert_eq!(updated.image.as_deref(), Some("a.png"));
    }

    #[tokio::test]
    async fn test_foreign_delete_leaves_category() {
        let categories = CategoryRepository::new(test_pool().await);
        let created = categories
            .create(
                &NewCategory {
                    name: "Lighting".into(),
                    image: None,
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();

        let scope = OwnershipScope {
            id: created.id,
            owner: Uuid::new_v4(),
        };
        assert!(categories.delete_owned(scope).await.unwrap().is_none());
        assert_eq!(categories.count(&[]).await.unwrap(), 1);
    }
}
