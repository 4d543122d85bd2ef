//! Resource CRUD surface (categories, items, users).
//!
//! Persistence sits behind `ResourceStore`; every successful create, update or
//! delete of an announced kind is pushed to WebSocket clients through the
//! connection registry.

pub mod model;
pub mod notify;
pub mod routes;
pub mod store;

pub use model::{Category, Item, Resource, User, Validate};
pub use routes::routes;
pub use store::{InMemoryStore, Page, ResourceStore, Stores};
