//! Filesystem base image source

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::ports::outbound::BaseImageSourcePort;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];
const FALLBACK_IMAGES: [&str; 2] = ["default_orb.png", "default_crystal.png"];

/// Lists the image files in one directory
///
/// A missing, unreadable or image-free directory yields the two default
/// images instead, so callers always get something to draw on.
pub struct DirectoryBaseImageSource {
    dir: PathBuf,
}

impl DirectoryBaseImageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, file_name: &str) -> String {
        self.dir.join(file_name).to_string_lossy().into_owned()
    }

    fn fallback(&self) -> Vec<String> {
        FALLBACK_IMAGES.iter().map(|f| self.path_for(f)).collect()
    }

    async fn scan(&self) -> std::io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if is_image(&file_name) {
                images.push(self.path_for(&file_name));
            }
        }
        images.sort();
        Ok(images)
    }
}

fn is_image(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

#[async_trait]
impl BaseImageSourcePort for DirectoryBaseImageSource {
    async fn list_images(&self) -> Result<Vec<String>> {
        match self.scan().await {
            Ok(images) if !images.is_empty() => {
                tracing::debug!("Found {} base images in {}", images.len(), self.dir.display());
                Ok(images)
            }
            Ok(_) => {
                tracing::warn!(
                    "No image files found in {}, using fallback images",
                    self.dir.display()
                );
                Ok(self.fallback())
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read base image directory {}: {}; using fallback images",
                    self.dir.display(),
                    e
                );
                Ok(self.fallback())
            }
        }
    }
}
