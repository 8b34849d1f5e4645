use crate::{
    abstract_trait::{
        order::{repository::DynOrderCommandRepository, service::OrderCommandServiceTrait},
        order_item::DynOrderItemQueryRepository,
    },
    domain::{
        requests::order::{CreateOrderRequest, UpdateOrderStatusRequest},
        response::order::OrderResponse,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, OperationTracker},
};
use tracing::{info, warn};

#[derive(Clone)]
pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    items: DynOrderItemQueryRepository,
    tracker: OperationTracker,
}

impl OrderCommandService {
    pub fn new(
        command: DynOrderCommandRepository,
        items: DynOrderItemQueryRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "order_command_service");

        Self {
            command,
            items,
            tracker: OperationTracker::new("order-command-service", metrics),
        }
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<OrderResponse, ServiceError> {
        info!("🛒 Placing order with {} line item(s)", req.items.len());

        let method = Method::Post;
        let tracing_ctx = self.tracker.start(
            "order_create",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.line_items", req.items.len() as i64),
            ],
        );

        match self.command.create_order(req).await {
            Ok((order, items)) => {
                self.tracker
                    .complete_success(&tracing_ctx, method, "Order placed");
                Ok(OrderResponse::from_parts(order, items))
            }
            Err(e) => {
                let msg = format!("Failed to place order: {e}");
                warn!("⚠️ {msg}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn update_status(
        &self,
        id: i64,
        req: &UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, ServiceError> {
        info!("🔄 Updating order ID {} to status {}", id, req.status);

        let method = Method::Patch;
        let tracing_ctx = self.tracker.start(
            "order_update_status",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update_status"),
                KeyValue::new("order.id", id),
                KeyValue::new("order.status", req.status.as_str()),
            ],
        );

        let order = match self.command.update_status(id, req.status).await {
            Ok(order) => order,
            Err(RepositoryError::NotFound) => {
                self.tracker
                    .complete_error(&tracing_ctx, method, "Order not found");
                return Err(ServiceError::NotFound("Order not found".to_string()));
            }
            Err(e) => {
                let msg = format!("Failed to update status of order {id}: {e}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                return Err(ServiceError::Repo(e));
            }
        };

        match self.items.find_by_order(order.id).await {
            Ok(items) => {
                self.tracker
                    .complete_success(&tracing_ctx, method, "Order status updated");
                Ok(OrderResponse::from_parts(order, items))
            }
            Err(e) => {
                let msg = format!("Failed to load items of order {id}: {e}");
                self.tracker.complete_error(&tracing_ctx, method, &msg);
                Err(ServiceError::Repo(e))
            }
        }
    }
}
