//! Clients for the lookup value service.
//!
//! Every operation returns a typed [`FetchError`]; deciding what a failure
//! means for the UI is left to the caller.

mod error;
mod http;
mod memory;
mod source;

pub use error::FetchError;
pub use http::HttpLookupSource;
pub use memory::MemoryLookupSource;
pub use source::{LookupSource, MatchMode};
