use crate::model::order_item::OrderItem as OrderItemModel;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderItemQueryRepository = Arc<dyn OrderItemQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderItemQueryRepositoryTrait {
    /// Every order line, in insertion order.
    async fn find_all(&self) -> Result<Vec<OrderItemModel>, RepositoryError>;
    async fn find_by_order(&self, order_id: i64) -> Result<Vec<OrderItemModel>, RepositoryError>;
}
