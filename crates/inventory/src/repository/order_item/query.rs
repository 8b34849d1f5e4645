use crate::{
    abstract_trait::order_item::OrderItemQueryRepositoryTrait,
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderItemQueryRepository {
    db: ConnectionPool,
}

impl OrderItemQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for OrderItemQueryRepository {
    async fn find_all(&self) -> Result<Vec<OrderItemModel>, RepositoryError> {
        info!("📦 Fetching all order items");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let items = sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT id, order_id, product_id, quantity
            FROM order_items
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Error fetching order items: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(items)
    }

    async fn find_by_order(&self, order_id: i64) -> Result<Vec<OrderItemModel>, RepositoryError> {
        info!("📦 Fetching items of order ID: {}", order_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let items = sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT id, order_id, product_id, quantity
            FROM order_items
            WHERE order_id = ?
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Error fetching items of order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        Ok(items)
    }
}
