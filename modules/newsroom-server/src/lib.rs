pub mod deps;
pub mod routes;
