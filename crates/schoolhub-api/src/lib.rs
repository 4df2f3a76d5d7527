// schoolhub-api: Async Rust client for the SchoolHub REST backend

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod query;
pub mod transport;

pub use client::{ApiClient, Blob};
pub use endpoints::{ActionRoute, Endpoint};
pub use envelope::{Ack, ItemShape, ListShape, Mutation, Page, PageMeta};
pub use error::Error;
pub use query::ListQuery;
pub use transport::{TlsMode, TransportConfig};
