//! orders-types: domain model and ports for the orders microservice

pub mod domain;
pub mod ports;
