// HTTP API
// Thin JSON layer over the session: search, recipe detail and catalog status

pub mod handlers;
pub mod models;
pub mod routes;
