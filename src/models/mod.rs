//! Data Models
//!
//! Wire-facing request/response payloads and the intermediate stage results
//! that flow between pipeline stages.

pub mod request;
pub mod response;
pub mod stages;

pub use request::*;
pub use response::*;
pub use stages::*;
