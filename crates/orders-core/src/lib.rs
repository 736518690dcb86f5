//! orders-core: application core and inbound command adapter for the orders
//! microservice

pub mod config;
pub mod errors;

pub mod application;

pub use orders_types::{domain, ports};

pub mod inbound; // command adapter (server + handlers)
