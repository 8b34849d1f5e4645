use crate::{
    abstract_trait::{
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        order_item::DynOrderItemQueryRepository,
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::{DynProductCommandService, DynProductQueryService},
        },
    },
    repository::{
        order::{OrderCommandRepository, OrderQueryRepository},
        order_item::OrderItemQueryRepository,
        product::{ProductCommandRepository, ProductQueryRepository},
    },
    service::{
        order::{OrderCommandService, OrderQueryService},
        product::{ProductCommandService, ProductQueryService},
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(pool: ConnectionPool, registry: &mut Registry) -> Self {
        let product_query_repo =
            Arc::new(ProductQueryRepository::new(pool.clone())) as DynProductQueryRepository;
        let product_command_repo =
            Arc::new(ProductCommandRepository::new(pool.clone())) as DynProductCommandRepository;
        let order_query_repo =
            Arc::new(OrderQueryRepository::new(pool.clone())) as DynOrderQueryRepository;
        let order_command_repo =
            Arc::new(OrderCommandRepository::new(pool.clone())) as DynOrderCommandRepository;
        let order_item_repo =
            Arc::new(OrderItemQueryRepository::new(pool)) as DynOrderItemQueryRepository;

        let product_query =
            Arc::new(ProductQueryService::new(product_query_repo, registry))
                as DynProductQueryService;
        let product_command =
            Arc::new(ProductCommandService::new(product_command_repo, registry))
                as DynProductCommandService;
        let order_query = Arc::new(OrderQueryService::new(
            order_query_repo,
            order_item_repo.clone(),
            registry,
        )) as DynOrderQueryService;
        let order_command = Arc::new(OrderCommandService::new(
            order_command_repo,
            order_item_repo,
            registry,
        )) as DynOrderCommandService;

        Self {
            product_query,
            product_command,
            order_query,
            order_command,
        }
    }
}
