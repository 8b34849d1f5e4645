use crate::{
    abstract_trait::product::{
        repository::DynProductCommandRepository, service::ProductCommandServiceTrait,
    },
    domain::{
        requests::product::{CreateProductRequest, UpdateProductRequest},
        response::product::ProductResponse,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, OperationTracker},
};
use tracing::{error, info};

const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct ProductCommandService {
    command: DynProductCommandRepository,
    tracker: OperationTracker,
}

impl ProductCommandService {
    pub fn new(command: DynProductCommandRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "product_command_service");

        Self {
            command,
            tracker: OperationTracker::new("product-command-service", metrics),
        }
    }
}

fn not_found_or_repo(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string()),
        other => ServiceError::Repo(other),
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        info!("🏗️ Creating product: {}", req.name);

        let method = Method::Post;
        let tracing_ctx = self.tracker.start(
            "product_create",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "create"),
                KeyValue::new("product.name", req.name.clone()),
            ],
        );

        match self.command.create_product(req).await {
            Ok(product) => {
                self.tracker
                    .complete_success(&tracing_ctx, method, "Product created");
                Ok(ProductResponse::from(product))
            }
            Err(e) => {
                let msg = format!("Failed to create product '{}': {e:?}", req.name);
                error!("❌ {msg}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn update_product(
        &self,
        id: i64,
        req: &UpdateProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        info!("🔄 Updating product ID: {}", id);

        let method = Method::Put;
        let tracing_ctx = self.tracker.start(
            "product_update",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "update"),
                KeyValue::new("product.id", id),
            ],
        );

        match self.command.update_product(id, req).await {
            Ok(product) => {
                self.tracker
                    .complete_success(&tracing_ctx, method, "Product updated");
                Ok(ProductResponse::from(product))
            }
            Err(e) => {
                let msg = format!("Failed to update product {id}: {e}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(not_found_or_repo(e))
            }
        }
    }

    async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        info!("🗑️ Deleting product ID: {}", id);

        let method = Method::Delete;
        let tracing_ctx = self.tracker.start(
            "product_delete",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "delete"),
                KeyValue::new("product.id", id),
            ],
        );

        match self.command.delete_product(id).await {
            Ok(()) => {
                self.tracker
                    .complete_success(&tracing_ctx, method, "Product deleted");
                Ok(())
            }
            Err(e) => {
                let msg = format!("Failed to delete product {id}: {e}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(not_found_or_repo(e))
            }
        }
    }
}
