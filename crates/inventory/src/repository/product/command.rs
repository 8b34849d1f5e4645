use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::product::{CreateProductRequest, UpdateProductRequest},
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products (name, description, price, stock_quantity)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, description, price, stock_quantity
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.stock_quantity)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product {}: {:?}", req.name, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created product ID {} ({})", result.id, result.name);
        Ok(result)
    }

    async fn update_product(
        &self,
        id: i64,
        req: &UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET name = ?,
                description = ?,
                price = ?,
                stock_quantity = ?
            WHERE id = ?
            RETURNING id, name, description, price, stock_quantity
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.stock_quantity)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update product ID {}: {:?}", id, err);
            RepositoryError::from(err)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated product ID {}", result.id);
        Ok(result)
    }

    async fn delete_product(&self, id: i64) -> Result<(), RepositoryError> {
        info!("❌ Hard deleting product: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to hard-delete product {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("✅ Product ID {} permanently deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::product::repository::ProductQueryRepositoryTrait,
        repository::product::ProductQueryRepository, test_support::migrated_pool,
    };

    fn widget(stock_quantity: i32) -> CreateProductRequest {
        CreateProductRequest {
            name: "Widget".into(),
            description: "A widget".into(),
            price: 10.99,
            stock_quantity,
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let pool = migrated_pool().await;
        let repo = ProductCommandRepository::new(pool);

        let first = repo.create_product(&widget(100)).await.unwrap();
        let second = repo.create_product(&widget(100)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.name, "Widget");
        assert_eq!(first.description, "A widget");
        assert_eq!(first.price, 10.99);
        assert_eq!(first.stock_quantity, 100);
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let pool = migrated_pool().await;
        let repo = ProductCommandRepository::new(pool.clone());
        let created = repo.create_product(&widget(3)).await.unwrap();

        let updated = repo
            .update_product(
                created.id,
                &UpdateProductRequest {
                    name: "Gadget".into(),
                    description: "Renamed".into(),
                    price: 2.5,
                    stock_quantity: 42,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.description, "Renamed");
        assert_eq!(updated.price, 2.5);
        assert_eq!(updated.stock_quantity, 42);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let pool = migrated_pool().await;
        let repo = ProductCommandRepository::new(pool);

        let update = repo
            .update_product(
                999,
                &UpdateProductRequest {
                    name: "x".into(),
                    description: "x".into(),
                    price: 1.0,
                    stock_quantity: 1,
                },
            )
            .await;

        assert!(matches!(update, Err(RepositoryError::NotFound)));
        assert!(matches!(
            repo.delete_product(999).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = migrated_pool().await;
        let repo = ProductCommandRepository::new(pool.clone());
        let query = ProductQueryRepository::new(pool);
        let created = repo.create_product(&widget(1)).await.unwrap();

        repo.delete_product(created.id).await.unwrap();

        assert!(query.find_by_id(created.id).await.unwrap().is_none());
    }
}
