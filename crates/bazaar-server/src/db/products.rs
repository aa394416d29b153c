//! Products.

use super::query;
use crate::{
    error::ApiResult,
    middleware::authz::{OwnedResource, OwnershipScope},
    request::{FilterValue, ListFields, ListQuery, NewProduct, ProductPatch},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub const LISTING: ListFields = ListFields {
        columns: &[
            ("id", "id"),
            ("title", "title"),
            ("description", "description"),
            ("image", "image"),
            ("category", "category"),
            ("price", "price"),
            ("user", "user_id"),
            ("created_at", "created_at"),
            ("updated_at", "updated_at"),
        ],
        id_fields: &["id", "user"],
        default_limit: 10,
    };
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a validated product owned by `owner`.
    pub async fn create(&self, product: &NewProduct, owner: Uuid) -> ApiResult<Product> {
        let now = Utc::now();
        Ok(sqlx::query_as::<_, Product>(
            "INSERT INTO products \
             (id, title, description, image, category, price, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.image)
        .bind(&product.category)
        .bind(&product.price)
        .bind(owner)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn list(&self, query: &ListQuery) -> ApiResult<Vec<Product>> {
        Ok(query::select_list("products", query)
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn count(&self, filters: &[(&'static str, FilterValue)]) -> ApiResult<i64> {
        Ok(query::count("products", filters)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Product>> {
        Ok(sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl OwnedResource for ProductRepository {
    type Record = Product;
    type Patch = ProductPatch;
    const NAME: &'static str = "Product";

    async fn update_owned(
        &self,
        scope: OwnershipScope,
        patch: &ProductPatch,
    ) -> ApiResult<Option<Product>> {
        Ok(sqlx::query_as::<_, Product>(
            "UPDATE products SET \
                title = COALESCE(?, title), \
                description = COALESCE(?, description), \
                image = COALESCE(?, image), \
                category = COALESCE(?, category), \
                price = COALESCE(?, price), \
                updated_at = ? \
             WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.image)
        .bind(&patch.category)
        .bind(&patch.price)
        .bind(Utc::now())
        .bind(scope.id)
        .bind(scope.owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_owned(&self, scope: OwnershipScope) -> ApiResult<Option<Product>> {
        Ok(sqlx::query_as::<_, Product>(
            "DELETE FROM products WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(scope.id)
        .bind(scope.owner)
        .fetch_optional(&self.pool)
        .await?)
    }
}
