// Common test utilities

pub mod harness;
pub mod http;
pub mod postgres;

pub use harness::*;
pub use http::*;
pub use postgres::*;
