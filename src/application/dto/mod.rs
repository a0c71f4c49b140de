//! Data Transfer Objects - Request and response shapes of the application services

pub mod florb;
pub mod world_map;

pub use florb::*;
pub use world_map::*;
