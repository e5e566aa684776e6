//! Request and response DTOs for the Depot web API.

mod request;
mod response;

pub use request::*;
pub use response::*;
