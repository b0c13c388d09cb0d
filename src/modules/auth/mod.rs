pub mod controller;
pub mod crud;
pub mod error;
pub mod model;
pub mod routes;
pub mod schema;

pub use routes::auth_routes;
