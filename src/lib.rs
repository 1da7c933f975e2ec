#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod catchers;
pub mod configuration;
pub mod domain;
pub mod email;
pub mod links;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod schema;
pub mod services;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod weather;
