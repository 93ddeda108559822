pub mod openapi;
pub mod routes;

pub use routes::router;
