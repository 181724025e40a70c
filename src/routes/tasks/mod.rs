pub mod dto;
pub mod filter;
pub mod memory;
pub mod model;
pub mod normalize;
pub mod queries;
pub mod routes;
pub mod store;

pub use filter::{FilterParams, PriorityFilter, TaskQuery};
pub use memory::MemoryTaskStore;
pub use model::{Priority, RawTimestamp, Task, TaskDocument};
pub use store::{PgTaskStore, StoreError, TaskStore};
