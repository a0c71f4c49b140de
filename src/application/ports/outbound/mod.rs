//! Outbound ports - Interfaces that the application requires from external systems

mod base_image_port;
mod repository_port;

pub use base_image_port::BaseImageSourcePort;
pub use repository_port::{
    FlorbRepositoryPort, GatheringRepositoryPort, PlacedFlorbRepositoryPort,
    PlayerResourcesRepositoryPort, ResourceNodeRepositoryPort,
};
