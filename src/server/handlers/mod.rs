pub mod destinations;
pub mod map;
pub mod routes;
pub mod session;
