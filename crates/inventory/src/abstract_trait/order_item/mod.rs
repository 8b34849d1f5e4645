mod repository;

pub use self::repository::{DynOrderItemQueryRepository, OrderItemQueryRepositoryTrait};
