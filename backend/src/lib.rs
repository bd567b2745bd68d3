//! bloggr: a server-rendered blog with accounts, admin-managed posts,
//! comments and a one-shot WordPress seed import.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
