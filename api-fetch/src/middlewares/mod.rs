//! The middlewares shipped with the crate.
//!
//! [`DefaultOptions`] and [`StringifyBody`] make up the prefix [`api_fetch`](crate::api_fetch)
//! puts in front of the caller's middlewares. [`AutoContentType`] is opt-in.

mod auto_content_type;
mod default_options;
mod stringify_body;

pub use auto_content_type::{detect_content_type, AutoContentType, ContentType};
pub use default_options::DefaultOptions;
pub use stringify_body::StringifyBody;
