//! Application layer - Use cases and ports
//!
//! This layer contains:
//! - DTOs: request and response shapes
//! - Ports: repository and base image interfaces
//! - Services: florb catalogue and world map use cases

pub mod dto;
pub mod ports;
pub mod services;
