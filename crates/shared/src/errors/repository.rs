use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Not enough stock for product '{product_name}'. Requested: {requested}, Available: {available}")]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        requested: i32,
        available: i32,
    },

    #[error("Product with id {0} not found")]
    ProductUnavailable(i64),
}
