pub mod identity;
pub mod middleware;
pub mod tokens;

pub use middleware::{auth_middleware, require_super_admin};
