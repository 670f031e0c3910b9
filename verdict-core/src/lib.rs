//! Request and response primitives for verdict.
//!
//! These are the HTTP-shaped inputs and outputs the validation crate reads
//! parameters from and reports failures through. They carry no server; hosts
//! convert their own request types into [`HttpRequest`].

pub mod error;
pub mod form;
pub mod http;

pub use error::Error;
pub use form::{FORM_CONTENT_TYPE, parse_form, parse_form_map};
pub use http::{HttpRequest, HttpResponse, JSON_CONTENT_TYPE};

/// Result alias for request handling
pub type Result<T> = std::result::Result<T, Error>;
