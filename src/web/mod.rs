//! Web API module for Depot.
//!
//! This module provides the REST surface over the repository service:
//! upload, listing, namespace management, search and statistics.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
