use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Value ranges are not constrained here; any price or stock the client sends
// is stored as-is.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i32,
}
