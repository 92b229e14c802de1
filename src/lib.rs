//! # appmeta
//!
//! An in-memory CRUD service for application metadata records: title,
//! version, maintainers, company, website, source, license, description.
//!
//! Records go in as JSON or YAML and come out as JSON. They live in one
//! lock-guarded list for the lifetime of the process; nothing is persisted.
//!
//! ## Layers
//!
//! - [`api`]: the `/applications` handlers and route table
//! - [`store`]: the record list, its lock, and id assignment
//! - [`codec`], [`validate`], [`filter`]: body decoding, completeness
//!   checks, and query-string matching
//! - [`Router`], [`Server`]: radix-tree routing via [`matchit`], hyper on
//!   tokio, graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use appmeta::{api, Server, Store};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = api::routes(Arc::new(Store::new()));
//!     Server::bind("0.0.0.0:8000".parse().unwrap()).serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod codec;
pub mod config;
pub mod filter;
pub mod model;
pub mod store;
pub mod validate;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use model::{Application, Maintainer};
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::{Server, serve_listener};
pub use status::Status;
pub use store::Store;
