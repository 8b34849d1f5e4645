use crate::{
    abstract_trait::{
        order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
        order_item::DynOrderItemQueryRepository,
    },
    domain::response::order::OrderResponse,
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracker},
};
use std::collections::HashMap;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    items: DynOrderItemQueryRepository,
    tracker: OperationTracker,
}

impl OrderQueryService {
    pub fn new(
        query: DynOrderQueryRepository,
        items: DynOrderItemQueryRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "order_query_service");

        Self {
            query,
            items,
            tracker: OperationTracker::new("order-query-service", metrics),
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(&self) -> Result<Vec<OrderResponse>, ServiceError> {
        info!("🔍 Finding all orders");

        let method = Method::Get;
        let tracing_ctx = self.tracker.start(
            "order_find_all",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_all"),
            ],
        );

        let loaded = match self.query.find_all().await {
            Ok(orders) => self.items.find_all().await.map(|items| (orders, items)),
            Err(e) => Err(e),
        };

        let (orders, items) = match loaded {
            Ok(res) => res,
            Err(e) => {
                let msg = format!("Failed to fetch all orders: {e:?}");
                error!("❌ {msg}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                return Err(ServiceError::Repo(e));
            }
        };

        let mut by_order: HashMap<i64, Vec<OrderItemModel>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        let response: Vec<OrderResponse> = orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderResponse::from_parts(order, items)
            })
            .collect();

        info!("✅ Retrieved {} orders", response.len());
        self.tracker
            .complete_success(&tracing_ctx, method, "Orders retrieved");

        Ok(response)
    }

    async fn find_by_id(&self, id: i64) -> Result<OrderResponse, ServiceError> {
        info!("🆔 Finding order by ID: {}", id);

        let method = Method::Get;
        let tracing_ctx = self.tracker.start(
            "order_find_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("order.id", id),
            ],
        );

        let order = match self.query.find_by_id(id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                self.tracker
                    .complete_error(&tracing_ctx, method, "Order not found");
                return Err(ServiceError::NotFound("Order not found".to_string()));
            }
            Err(e) => {
                let msg = format!("Failed to fetch order {id}: {e:?}");
                error!("❌ {msg}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                return Err(ServiceError::Repo(e));
            }
        };

        match self.items.find_by_order(order.id).await {
            Ok(items) => {
                self.tracker
                    .complete_success(&tracing_ctx, method, "Order retrieved");
                Ok(OrderResponse::from_parts(order, items))
            }
            Err(e) => {
                let msg = format!("Failed to fetch items of order {id}: {e:?}");
                error!("❌ {msg}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(ServiceError::Repo(e))
            }
        }
    }
}
