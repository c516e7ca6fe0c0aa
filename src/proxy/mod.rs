pub mod handlers;
pub mod query;

pub use handlers::*;
pub use query::*;
