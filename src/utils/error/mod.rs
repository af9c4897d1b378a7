//! Error handling for the performance layer
//!
//! Every fallible operation in the crate returns [`Result`]. Errors that reach
//! actix are rendered through [`actix_web::ResponseError`].

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{PerfError, Result};
