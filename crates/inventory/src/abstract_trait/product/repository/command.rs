use crate::{
    domain::requests::product::{CreateProductRequest, UpdateProductRequest},
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    /// Fails with [`RepositoryError::NotFound`] when no product has `id`.
    async fn update_product(
        &self,
        id: i64,
        req: &UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    /// Hard delete. Fails with [`RepositoryError::NotFound`] when nothing was removed.
    async fn delete_product(&self, id: i64) -> Result<(), RepositoryError>;
}
