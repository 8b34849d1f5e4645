use crate::model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub quantity: i32,
}

impl From<OrderItemModel> for OrderItemResponse {
    fn from(value: OrderItemModel) -> Self {
        OrderItemResponse {
            product_id: value.product_id,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OrderResponse {
    pub id: i64,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn from_parts(order: OrderModel, items: Vec<OrderItemModel>) -> Self {
        OrderResponse {
            id: order.id,
            created_at: order.created_at.to_rfc3339(),
            status: order.status,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}
