use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::CreateOrderRequest,
    model::{
        order::{Order as OrderModel, OrderStatus},
        order_item::OrderItem as OrderItemModel,
        product::Product as ProductModel,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn insufficient_stock(product: &ProductModel, requested: i32) -> RepositoryError {
    RepositoryError::InsufficientStock {
        product_id: product.id,
        product_name: product.name.clone(),
        requested,
        available: product.stock_quantity,
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    // Every early return drops `tx`, which rolls back the order row and all
    // deductions staged so far.
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (created_at, status)
            VALUES (?, ?)
            RETURNING id, created_at, status
            "#,
        )
        .bind(Utc::now())
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to create order: {:?}", err);
            RepositoryError::from(err)
        })?;

        let mut items = Vec::with_capacity(req.items.len());

        for line in &req.items {
            let product = sqlx::query_as::<_, ProductModel>(
                r#"
                SELECT id, name, description, price, stock_quantity
                FROM products
                WHERE id = ?
                "#,
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from)?
            .ok_or_else(|| {
                warn!("⚠️ Order rejected: product {} does not exist", line.product_id);
                RepositoryError::ProductUnavailable(line.product_id)
            })?;

            if product.stock_quantity < line.quantity {
                warn!(
                    "⚠️ Order rejected: product {} has {} in stock, {} requested",
                    product.id, product.stock_quantity, line.quantity
                );
                return Err(insufficient_stock(&product, line.quantity));
            }

            // Conditional decrement: a concurrent order that drained the stock
            // after the read above leaves this update with no rows.
            let deducted = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?
                WHERE id = ? AND stock_quantity >= ?
                "#,
            )
            .bind(line.quantity)
            .bind(product.id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to decrease stock product {}: {:?}", product.id, err);
                RepositoryError::from(err)
            })?;

            if deducted.rows_affected() == 0 {
                warn!(
                    "⚠️ Order rejected: stock of product {} changed concurrently",
                    product.id
                );
                return Err(insufficient_stock(&product, line.quantity));
            }

            let item = sqlx::query_as::<_, OrderItemModel>(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity)
                VALUES (?, ?, ?)
                RETURNING id, order_id, product_id, quantity
                "#,
            )
            .bind(order.id)
            .bind(product.id)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create order item for order {}: {:?}",
                    order.id, err
                );
                RepositoryError::from(err)
            })?;

            items.push(item);
        }

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit order {}: {:?}", order.id, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created order ID {} with {} item(s)", order.id, items.len());
        Ok((order, items))
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET status = ?
            WHERE id = ?
            RETURNING id, created_at, status
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update status of order ID {}: {:?}", id, err);
            RepositoryError::from(err)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Order ID {} is now {}", result.id, result.status);
        Ok(result)
    }
}
