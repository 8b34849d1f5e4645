use crate::{
    domain::requests::order::CreateOrderRequest,
    model::{
        order::{Order as OrderModel, OrderStatus},
        order_item::OrderItem as OrderItemModel,
    },
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Inserts the order, its items and every stock deduction in one
    /// transaction. The first failing line item aborts the whole order with
    /// [`RepositoryError::ProductUnavailable`] or
    /// [`RepositoryError::InsufficientStock`] and nothing is persisted.
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError>;
    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<OrderModel, RepositoryError>;
}
