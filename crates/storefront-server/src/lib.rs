//! Plumbing shared by the storefront HTTP servers.

pub mod middleware;
pub mod shutdown;

pub use middleware::{request_id, RequestId, REQUEST_ID_HEADER};
pub use shutdown::shutdown_signal;
