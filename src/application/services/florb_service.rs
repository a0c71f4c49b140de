//! Florb Service - Application service for generating and managing florbs
//!
//! Generation itself is delegated to the domain [`FlorbGenerator`]; this
//! service resolves request vocabulary against the catalog, chooses base
//! images, and persists the results.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, instrument};

use crate::application::dto::{
    BatchGenerateFlorbRequest, CreateFlorbRequest, FlorbPage, GenerateFlorbRequest,
    ListFlorbsQuery, RarityCount, UpdateFlorbRequest,
};
use crate::application::ports::outbound::{BaseImageSourcePort, FlorbRepositoryPort};
use crate::domain::entities::Florb;
use crate::domain::errors::ValidationError;
use crate::domain::services::{
    describe, tags_for, validate_custom_colors, FlorbGenerator, GenerationOverrides,
};
use crate::domain::value_objects::{
    FlorbCatalog, FlorbCode, FlorbId, GradientConfig, RarityLevel, RarityWeights, SpecialEffect,
};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_BATCH_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Florb service trait defining the application use cases
#[async_trait]
pub trait FlorbService: Send + Sync {
    /// Generate a florb from optional overrides and store it
    async fn generate_florb(&self, request: GenerateFlorbRequest) -> Result<Florb>;

    /// Generate up to 100 florbs and store them together
    async fn batch_generate(&self, request: BatchGenerateFlorbRequest) -> Result<Vec<Florb>>;

    /// Store a florb with caller-chosen attributes
    async fn create_florb(&self, request: CreateFlorbRequest) -> Result<Florb>;

    /// One page of florbs, newest first
    async fn list_florbs(&self, query: ListFlorbsQuery) -> Result<FlorbPage>;

    async fn get_florb(&self, id: FlorbId) -> Result<Option<Florb>>;

    async fn get_by_code(&self, code: &FlorbCode) -> Result<Option<Florb>>;

    /// Apply a partial update to an existing florb
    async fn update_florb(&self, id: FlorbId, request: UpdateFlorbRequest) -> Result<Florb>;

    /// Delete a florb, returning whether it existed
    async fn delete_florb(&self, id: FlorbId) -> Result<bool>;

    async fn list_by_rarity(&self, rarity: &str) -> Result<Vec<Florb>>;

    async fn list_with_effect(&self, effect: &str) -> Result<Vec<Florb>>;

    /// Florb count for every tier in catalog order, including empty tiers
    async fn rarity_stats(&self) -> Result<Vec<RarityCount>>;

    fn rarity_levels(&self) -> Vec<RarityLevel>;

    fn special_effects(&self) -> Vec<SpecialEffect>;

    async fn base_images(&self) -> Result<Vec<String>>;
}

/// Default implementation of FlorbService
pub struct FlorbServiceImpl {
    generator: FlorbGenerator,
    florbs: Arc<dyn FlorbRepositoryPort>,
    base_images: Arc<dyn BaseImageSourcePort>,
}

impl FlorbServiceImpl {
    pub fn new(
        catalog: Arc<FlorbCatalog>,
        florbs: Arc<dyn FlorbRepositoryPort>,
        base_images: Arc<dyn BaseImageSourcePort>,
    ) -> Self {
        Self {
            generator: FlorbGenerator::new(catalog),
            florbs,
            base_images,
        }
    }

    fn catalog(&self) -> &FlorbCatalog {
        self.generator.catalog()
    }

    fn resolve_weights(
        &self,
        weights: Option<&HashMap<String, f64>>,
    ) -> Result<Option<RarityWeights>, ValidationError> {
        weights
            .map(|map| self.catalog().weights_from_map(map))
            .transpose()
    }

    fn resolve_effects(&self, names: &[String]) -> Result<Vec<SpecialEffect>, ValidationError> {
        let mut effects: Vec<SpecialEffect> = Vec::with_capacity(names.len());
        for name in names {
            let effect = self.catalog().effect(name)?;
            if !effects.contains(&effect) {
                effects.push(effect);
            }
        }
        Ok(effects)
    }

    async fn available_base_images(&self, requested: Option<Vec<String>>) -> Result<Vec<String>> {
        match requested {
            Some(paths) if !paths.is_empty() => {
                for path in &paths {
                    validate_base_image(path)?;
                }
                Ok(paths)
            }
            _ => self
                .base_images
                .list_images()
                .await
                .context("Failed to list base images"),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::field("name", "cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::field(
            "name",
            format!("cannot exceed {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::field(
            "description",
            format!("cannot exceed {} characters", MAX_DESCRIPTION_LENGTH),
        ));
    }
    Ok(())
}

fn validate_base_image(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::field("base_image_path", "cannot be empty"));
    }
    Ok(())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn pick<'a>(paths: &'a [String], rng: &mut StdRng) -> Result<&'a String> {
    paths
        .choose(rng)
        .ok_or_else(|| anyhow::anyhow!("No base images available"))
}

#[async_trait]
impl FlorbService for FlorbServiceImpl {
    #[instrument(skip(self, request))]
    async fn generate_florb(&self, request: GenerateFlorbRequest) -> Result<Florb> {
        let overrides = GenerationOverrides {
            rarity: request.rarity,
            forced_effect: request.special_effect,
            gradient: request.gradient,
            custom_colors: request.custom_colors,
            weights: self.resolve_weights(request.rarity_weights.as_ref())?,
        };
        if let Some(path) = &request.base_image_path {
            validate_base_image(path)?;
        }

        let generated = self
            .generator
            .generate(&overrides, &mut StdRng::from_entropy())?;

        let base_image_path = match request.base_image_path {
            Some(path) => path,
            None => {
                let images = self.available_base_images(None).await?;
                pick(&images, &mut StdRng::from_entropy())?.clone()
            }
        };

        let florb = Florb::from_generated(generated, base_image_path);
        self.florbs
            .create(&florb)
            .await
            .context("Failed to create florb in repository")?;

        info!(florb_id = %florb.id, code = %florb.code, rarity = %florb.rarity, "Generated florb");
        Ok(florb)
    }

    #[instrument(skip(self, request), fields(count = request.count))]
    async fn batch_generate(&self, request: BatchGenerateFlorbRequest) -> Result<Vec<Florb>> {
        if request.count == 0 || request.count > MAX_BATCH_SIZE {
            return Err(ValidationError::field(
                "count",
                format!("must be between 1 and {}", MAX_BATCH_SIZE),
            )
            .into());
        }
        let overrides = GenerationOverrides {
            weights: self.resolve_weights(request.rarity_weights.as_ref())?,
            ..Default::default()
        };
        let images = self.available_base_images(request.base_image_paths).await?;

        let mut rng = StdRng::from_entropy();
        let mut florbs = Vec::with_capacity(request.count as usize);
        for _ in 0..request.count {
            let generated = self.generator.generate(&overrides, &mut rng)?;
            let base_image_path = pick(&images, &mut rng)?.clone();
            florbs.push(Florb::from_generated(generated, base_image_path));
        }

        self.florbs
            .create_many(&florbs)
            .await
            .context("Failed to store generated florb batch")?;

        info!(count = florbs.len(), "Generated florb batch");
        Ok(florbs)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_florb(&self, request: CreateFlorbRequest) -> Result<Florb> {
        validate_name(&request.name)?;
        validate_base_image(&request.base_image_path)?;
        if let Some(description) = &request.description {
            validate_description(description)?;
        }
        let rarity = self.catalog().rarity(&request.rarity)?;
        let special_effects = self.resolve_effects(&request.special_effects)?;
        let gradient = match request.gradient {
            Some(gradient) => {
                gradient.validate()?;
                gradient
            }
            None => self.generator.build_gradient(
                &rarity,
                request.custom_colors.as_deref(),
                &mut StdRng::from_entropy(),
            )?,
        };

        let tags = match clean_tags(request.tags) {
            tags if tags.is_empty() => tags_for(&rarity, &special_effects),
            tags => tags,
        };
        let description = request
            .description
            .unwrap_or_else(|| describe(&rarity, &special_effects));

        let now = chrono::Utc::now();
        let florb = Florb {
            id: FlorbId::new(),
            code: FlorbCode::generate(&mut StdRng::from_entropy()),
            name: request.name.trim().to_string(),
            base_image_path: request.base_image_path,
            rarity,
            special_effects,
            gradient,
            description: Some(description),
            tags,
            created_at: now,
            updated_at: now,
        };

        self.florbs
            .create(&florb)
            .await
            .context("Failed to create florb in repository")?;

        info!(florb_id = %florb.id, "Created florb: {}", florb.name);
        Ok(florb)
    }

    #[instrument(skip(self))]
    async fn list_florbs(&self, query: ListFlorbsQuery) -> Result<FlorbPage> {
        if query.page == 0 {
            return Err(ValidationError::field("page", "must be at least 1").into());
        }
        if query.limit == 0 || query.limit > MAX_PAGE_SIZE {
            return Err(ValidationError::field(
                "limit",
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            )
            .into());
        }
        let rarity = query
            .rarity
            .as_deref()
            .map(|name| self.catalog().rarity(name))
            .transpose()?;

        let limit = u64::from(query.limit);
        let offset = u64::from(query.page - 1) * limit;
        let florbs = self
            .florbs
            .list(offset, limit, rarity.as_ref())
            .await
            .context("Failed to list florbs from repository")?;
        let total = self
            .florbs
            .count(rarity.as_ref())
            .await
            .context("Failed to count florbs")?;

        debug!(total, returned = florbs.len(), "Listed florbs");
        Ok(FlorbPage {
            florbs,
            total,
            page: query.page,
            total_pages: total.div_ceil(limit) as u32,
        })
    }

    #[instrument(skip(self))]
    async fn get_florb(&self, id: FlorbId) -> Result<Option<Florb>> {
        debug!(florb_id = %id, "Fetching florb");
        self.florbs
            .get(id)
            .await
            .context("Failed to get florb from repository")
    }

    #[instrument(skip(self))]
    async fn get_by_code(&self, code: &FlorbCode) -> Result<Option<Florb>> {
        self.florbs
            .get_by_code(code)
            .await
            .context("Failed to get florb by code from repository")
    }

    #[instrument(skip(self, request), fields(florb_id = %id))]
    async fn update_florb(&self, id: FlorbId, request: UpdateFlorbRequest) -> Result<Florb> {
        if let Some(name) = &request.name {
            validate_name(name)?;
        }
        if let Some(path) = &request.base_image_path {
            validate_base_image(path)?;
        }
        if let Some(description) = &request.description {
            validate_description(description)?;
        }
        if let Some(colors) = &request.custom_colors {
            validate_custom_colors(colors)?;
            if colors.len() < GradientConfig::MIN_COLORS {
                return Err(ValidationError::InvalidGradient(format!(
                    "replacement colors need at least {}, got {}",
                    GradientConfig::MIN_COLORS,
                    colors.len()
                ))
                .into());
            }
        }
        if let Some(gradient) = &request.gradient {
            gradient.validate()?;
        }
        let rarity = request
            .rarity
            .as_deref()
            .map(|name| self.catalog().rarity(name))
            .transpose()?;
        let special_effects = request
            .special_effects
            .as_deref()
            .map(|names| self.resolve_effects(names))
            .transpose()?;

        let mut florb = self
            .florbs
            .get(id)
            .await
            .context("Failed to load florb for update")?
            .ok_or_else(|| anyhow::anyhow!("Florb not found: {}", id))?;

        if let Some(name) = request.name {
            florb.name = name.trim().to_string();
        }
        if let Some(path) = request.base_image_path {
            florb.base_image_path = path;
        }
        if let Some(rarity) = rarity {
            if request.gradient.is_none() && rarity != florb.rarity {
                florb.gradient.intensity = self.generator.intensity_for(&rarity)?;
            }
            florb.rarity = rarity;
        }
        if let Some(effects) = special_effects {
            florb.special_effects = effects;
        }
        if let Some(gradient) = request.gradient {
            florb.gradient = gradient;
        }
        if let Some(colors) = request.custom_colors {
            florb.gradient.colors = colors;
        }
        if let Some(description) = request.description {
            florb.description = Some(description);
        }
        if let Some(tags) = request.tags {
            florb.tags = clean_tags(tags);
        }
        florb.touch();

        self.florbs
            .update(&florb)
            .await
            .context("Failed to update florb in repository")?;

        info!(florb_id = %id, "Updated florb: {}", florb.name);
        Ok(florb)
    }

    #[instrument(skip(self))]
    async fn delete_florb(&self, id: FlorbId) -> Result<bool> {
        let deleted = self
            .florbs
            .delete(id)
            .await
            .context("Failed to delete florb from repository")?;
        if deleted {
            info!(florb_id = %id, "Deleted florb");
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_by_rarity(&self, rarity: &str) -> Result<Vec<Florb>> {
        let rarity = self.catalog().rarity(rarity)?;
        self.florbs
            .list_by_rarity(&rarity)
            .await
            .context("Failed to list florbs by rarity")
    }

    #[instrument(skip(self))]
    async fn list_with_effect(&self, effect: &str) -> Result<Vec<Florb>> {
        let effect = self.catalog().effect(effect)?;
        self.florbs
            .list_with_effect(&effect)
            .await
            .context("Failed to list florbs by effect")
    }

    #[instrument(skip(self))]
    async fn rarity_stats(&self) -> Result<Vec<RarityCount>> {
        let counts: HashMap<RarityLevel, u64> = self
            .florbs
            .count_by_rarity()
            .await
            .context("Failed to count florbs by rarity")?
            .into_iter()
            .collect();

        Ok(self
            .catalog()
            .rarity_levels()
            .into_iter()
            .map(|rarity| RarityCount {
                count: counts.get(&rarity).copied().unwrap_or(0),
                rarity,
            })
            .collect())
    }

    fn rarity_levels(&self) -> Vec<RarityLevel> {
        self.catalog().rarity_levels()
    }

    fn special_effects(&self) -> Vec<SpecialEffect> {
        self.catalog().special_effects()
    }

    #[instrument(skip(self))]
    async fn base_images(&self) -> Result<Vec<String>> {
        self.base_images
            .list_images()
            .await
            .context("Failed to list base images")
    }
}
