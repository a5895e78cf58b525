pub mod events;
pub mod initialize;
pub mod pool;
pub mod schema;
pub mod store;
