use anyhow::Result;
use async_trait::async_trait;

/// Source of base images that generated florbs are drawn over
#[async_trait]
pub trait BaseImageSourcePort: Send + Sync {
    /// Paths of all available base images, never empty
    async fn list_images(&self) -> Result<Vec<String>>;
}
