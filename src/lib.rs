pub mod cache;
pub mod cli;
pub mod config;
pub mod model;
pub mod pom;
pub mod resolver;
pub mod verify;

mod api;
mod flock;

pub use api::{Bomvet, BomvetBuilder};
