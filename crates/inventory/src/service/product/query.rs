use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::response::product::ProductResponse,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracker},
};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    tracker: OperationTracker,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "product_query_service");

        Self {
            query,
            tracker: OperationTracker::new("product-query-service", metrics),
        }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        info!("🔍 Finding all products");

        let method = Method::Get;
        let tracing_ctx = self.tracker.start(
            "product_find_all",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_all"),
            ],
        );

        match self.query.find_all().await {
            Ok(products) => {
                info!("✅ Retrieved {} products from DB", products.len());
                self.tracker
                    .complete_success(&tracing_ctx, method, "Products retrieved");
                Ok(products.into_iter().map(ProductResponse::from).collect())
            }
            Err(e) => {
                let msg = format!("Failed to fetch all products: {e:?}");
                error!("❌ {msg}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<ProductResponse, ServiceError> {
        info!("🆔 Finding product by ID: {}", id);

        let method = Method::Get;
        let tracing_ctx = self.tracker.start(
            "product_find_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("product.id", id),
            ],
        );

        match self.query.find_by_id(id).await {
            Ok(Some(product)) => {
                self.tracker
                    .complete_success(&tracing_ctx, method, "Product retrieved");
                Ok(ProductResponse::from(product))
            }
            Ok(None) => {
                self.tracker
                    .complete_error(&tracing_ctx, method, "Product not found");
                Err(ServiceError::NotFound("Product not found".to_string()))
            }
            Err(e) => {
                let msg = format!("Failed to fetch product {id}: {e:?}");
                error!("❌ {msg}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(ServiceError::Repo(e))
            }
        }
    }
}
