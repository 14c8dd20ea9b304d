//! Routing module
//!
//! Maps (method, path) pairs to handlers through a table built at startup.

mod table;

pub use table::{Route, RouteTable};
