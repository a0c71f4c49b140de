//! World Map Service - Resource nodes, florb placements and player balances

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{BulkUpdateResult, PlaceFlorbRequest, ResourceExport};
use crate::application::ports::outbound::{
    FlorbRepositoryPort, GatheringRepositoryPort, PlacedFlorbRepositoryPort,
    PlayerResourcesRepositoryPort, ResourceNodeRepositoryPort,
};
use crate::domain::entities::{GatheringRecord, PlacedFlorb, PlayerResources, ResourceNode};
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{FlorbCatalog, ResourceBundle, UserId};

pub const MAX_RESOURCE_NODES: u32 = 10_000;

/// World map service trait defining the application use cases
#[async_trait]
pub trait WorldMapService: Send + Sync {
    /// Scatter new resource nodes over the map
    async fn generate_resource_nodes(&self, count: Option<u32>) -> Result<Vec<ResourceNode>>;

    async fn list_resource_nodes(&self) -> Result<Vec<ResourceNode>>;

    async fn count_resource_nodes(&self) -> Result<u64>;

    /// All nodes with an export timestamp
    async fn export_resource_data(&self) -> Result<ResourceExport>;

    /// Insert or replace nodes by ID
    async fn update_resource_nodes(&self, nodes: Vec<ResourceNode>) -> Result<BulkUpdateResult>;

    async fn list_placed_florbs(&self, user_id: UserId) -> Result<Vec<PlacedFlorb>>;

    async fn count_placed_florbs(&self, user_id: UserId) -> Result<u64>;

    /// Put one of the stored florbs on the map
    async fn place_florb(&self, user_id: UserId, request: PlaceFlorbRequest) -> Result<PlacedFlorb>;

    /// Update placements; ones not owned by `user_id` are skipped
    async fn update_placed_florbs(
        &self,
        user_id: UserId,
        placements: Vec<PlacedFlorb>,
    ) -> Result<BulkUpdateResult>;

    /// Current balance, created empty on first access
    async fn get_player_resources(&self, user_id: UserId) -> Result<PlayerResources>;

    async fn update_player_resources(
        &self,
        user_id: UserId,
        balance: ResourceBundle,
    ) -> Result<PlayerResources>;

    async fn record_gathering(
        &self,
        user_id: UserId,
        gathered: ResourceBundle,
        timestamp: DateTime<Utc>,
    ) -> Result<GatheringRecord>;

    async fn gathering_history(&self, user_id: UserId) -> Result<Vec<GatheringRecord>>;

    /// Remove placements whose gathering time ran out, returning how many went
    async fn expire_placements(&self, now: DateTime<Utc>) -> Result<usize>;
}

/// Repositories the world map service works against
#[derive(Clone)]
pub struct WorldMapRepositories {
    pub florbs: Arc<dyn FlorbRepositoryPort>,
    pub resource_nodes: Arc<dyn ResourceNodeRepositoryPort>,
    pub placed_florbs: Arc<dyn PlacedFlorbRepositoryPort>,
    pub player_resources: Arc<dyn PlayerResourcesRepositoryPort>,
    pub gathering: Arc<dyn GatheringRepositoryPort>,
}

/// Default implementation of WorldMapService
pub struct WorldMapServiceImpl {
    catalog: Arc<FlorbCatalog>,
    repositories: WorldMapRepositories,
    default_node_count: u32,
}

impl WorldMapServiceImpl {
    pub fn new(
        catalog: Arc<FlorbCatalog>,
        repositories: WorldMapRepositories,
        default_node_count: u32,
    ) -> Self {
        Self {
            catalog,
            repositories,
            default_node_count,
        }
    }

    fn validate_node_count(count: u32) -> Result<(), ValidationError> {
        if count == 0 || count > MAX_RESOURCE_NODES {
            return Err(ValidationError::field(
                "count",
                format!("must be between 1 and {}", MAX_RESOURCE_NODES),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl WorldMapService for WorldMapServiceImpl {
    #[instrument(skip(self))]
    async fn generate_resource_nodes(&self, count: Option<u32>) -> Result<Vec<ResourceNode>> {
        let count = count.unwrap_or(self.default_node_count);
        Self::validate_node_count(count)?;

        let nodes: Vec<ResourceNode> = {
            let mut rng = StdRng::from_entropy();
            (0..count).map(|_| ResourceNode::random(&mut rng)).collect()
        };

        self.repositories
            .resource_nodes
            .upsert_many(&nodes)
            .await
            .context("Failed to store generated resource nodes")?;

        info!(count = nodes.len(), "Generated resource nodes");
        Ok(nodes)
    }

    #[instrument(skip(self))]
    async fn list_resource_nodes(&self) -> Result<Vec<ResourceNode>> {
        self.repositories
            .resource_nodes
            .list()
            .await
            .context("Failed to list resource nodes")
    }

    #[instrument(skip(self))]
    async fn count_resource_nodes(&self) -> Result<u64> {
        self.repositories
            .resource_nodes
            .count()
            .await
            .context("Failed to count resource nodes")
    }

    #[instrument(skip(self))]
    async fn export_resource_data(&self) -> Result<ResourceExport> {
        let nodes = self.list_resource_nodes().await?;
        debug!(count = nodes.len(), "Exporting resource data");
        Ok(ResourceExport {
            exported_at: Utc::now(),
            nodes,
        })
    }

    #[instrument(skip(self, nodes), fields(count = nodes.len()))]
    async fn update_resource_nodes(&self, nodes: Vec<ResourceNode>) -> Result<BulkUpdateResult> {
        for node in &nodes {
            node.validate()?;
        }

        let updated = self
            .repositories
            .resource_nodes
            .upsert_many(&nodes)
            .await
            .context("Failed to update resource nodes")?;

        info!(updated, "Updated resource nodes");
        Ok(BulkUpdateResult { updated })
    }

    #[instrument(skip(self))]
    async fn list_placed_florbs(&self, user_id: UserId) -> Result<Vec<PlacedFlorb>> {
        self.repositories
            .placed_florbs
            .list_by_user(user_id)
            .await
            .context("Failed to list placed florbs")
    }

    #[instrument(skip(self))]
    async fn count_placed_florbs(&self, user_id: UserId) -> Result<u64> {
        self.repositories
            .placed_florbs
            .count_by_user(user_id)
            .await
            .context("Failed to count placed florbs")
    }

    #[instrument(skip(self), fields(florb_id = %request.florb_id))]
    async fn place_florb(&self, user_id: UserId, request: PlaceFlorbRequest) -> Result<PlacedFlorb> {
        request.position.validate()?;

        let florb = self
            .repositories
            .florbs
            .get(request.florb_id)
            .await
            .context("Failed to load florb for placement")?
            .ok_or_else(|| anyhow::anyhow!("Florb not found: {}", request.florb_id))?;
        let profile = self.catalog.tier(&florb.rarity)?.gathering;

        let placed = PlacedFlorb::new(user_id, &florb, request.position, profile);
        self.repositories
            .placed_florbs
            .create(&placed)
            .await
            .context("Failed to store placed florb")?;

        info!(
            placement_id = %placed.id,
            rarity = %florb.rarity,
            expires_at = %placed.expires_at(),
            "Placed florb"
        );
        Ok(placed)
    }

    #[instrument(skip(self, placements), fields(count = placements.len()))]
    async fn update_placed_florbs(
        &self,
        user_id: UserId,
        placements: Vec<PlacedFlorb>,
    ) -> Result<BulkUpdateResult> {
        for placed in &placements {
            placed.position.validate()?;
            if let Some(total) = &placed.total_gathered {
                total.validate()?;
            }
        }

        let (owned, foreign): (Vec<_>, Vec<_>) =
            placements.into_iter().partition(|p| p.user_id == user_id);
        if !foreign.is_empty() {
            warn!(skipped = foreign.len(), "Ignoring placements owned by other users");
        }

        let updated = self
            .repositories
            .placed_florbs
            .update_for_user(user_id, &owned)
            .await
            .context("Failed to update placed florbs")?;

        Ok(BulkUpdateResult { updated })
    }

    #[instrument(skip(self))]
    async fn get_player_resources(&self, user_id: UserId) -> Result<PlayerResources> {
        if let Some(resources) = self
            .repositories
            .player_resources
            .get(user_id)
            .await
            .context("Failed to get player resources")?
        {
            return Ok(resources);
        }

        let resources = PlayerResources::empty(user_id);
        self.repositories
            .player_resources
            .upsert(&resources)
            .await
            .context("Failed to create player resources")?;

        debug!(user_id = %user_id, "Created empty resource balance");
        Ok(resources)
    }

    #[instrument(skip(self))]
    async fn update_player_resources(
        &self,
        user_id: UserId,
        balance: ResourceBundle,
    ) -> Result<PlayerResources> {
        balance.validate()?;

        let resources = PlayerResources {
            user_id,
            balance,
            updated_at: Utc::now(),
        };
        self.repositories
            .player_resources
            .upsert(&resources)
            .await
            .context("Failed to update player resources")?;

        Ok(resources)
    }

    #[instrument(skip(self))]
    async fn record_gathering(
        &self,
        user_id: UserId,
        gathered: ResourceBundle,
        timestamp: DateTime<Utc>,
    ) -> Result<GatheringRecord> {
        gathered.validate()?;

        let record = GatheringRecord::new(user_id, gathered, timestamp);
        self.repositories
            .gathering
            .record(&record)
            .await
            .context("Failed to store gathering record")?;

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn gathering_history(&self, user_id: UserId) -> Result<Vec<GatheringRecord>> {
        self.repositories
            .gathering
            .list_by_user(user_id)
            .await
            .context("Failed to list gathering records")
    }

    #[instrument(skip(self))]
    async fn expire_placements(&self, now: DateTime<Utc>) -> Result<usize> {
        let expired = self
            .repositories
            .placed_florbs
            .delete_expired(now)
            .await
            .context("Failed to expire placed florbs")?;

        if expired > 0 {
            info!(expired, "Expired placed florbs");
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::CreateFlorbRequest;
    use crate::application::ports::outbound::BaseImageSourcePort;
    use crate::application::services::{FlorbService, FlorbServiceImpl};
    use crate::domain::entities::Florb;
    use crate::domain::value_objects::{FlorbId, GeoPosition};
    use crate::infrastructure::persistence::SqliteRepository;
    use chrono::Duration;

    struct NoBaseImages;

    #[async_trait]
    impl BaseImageSourcePort for NoBaseImages {
        async fn list_images(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
    }

    struct Fixture {
        world: WorldMapServiceImpl,
        florbs: FlorbServiceImpl,
    }

    async fn fixture() -> Fixture {
        let repository = SqliteRepository::in_memory()
            .await
            .expect("in-memory database should open");
        let catalog = Arc::new(FlorbCatalog::standard());
        let repositories = WorldMapRepositories {
            florbs: Arc::new(repository.florbs()),
            resource_nodes: Arc::new(repository.resource_nodes()),
            placed_florbs: Arc::new(repository.placed_florbs()),
            player_resources: Arc::new(repository.player_resources()),
            gathering: Arc::new(repository.gathering()),
        };
        Fixture {
            florbs: FlorbServiceImpl::new(
                catalog.clone(),
                repositories.florbs.clone(),
                Arc::new(NoBaseImages),
            ),
            world: WorldMapServiceImpl::new(catalog, repositories, 25),
        }
    }

    async fn stored_florb(fixture: &Fixture, rarity: &str) -> Florb {
        fixture
            .florbs
            .create_florb(CreateFlorbRequest {
                name: format!("{} placement", rarity),
                base_image_path: "orb.png".to_string(),
                rarity: rarity.to_string(),
                special_effects: vec![],
                gradient: None,
                custom_colors: None,
                description: None,
                tags: vec![],
            })
            .await
            .unwrap()
    }

    fn place(florb: &Florb, latitude: f64, longitude: f64) -> PlaceFlorbRequest {
        PlaceFlorbRequest {
            florb_id: florb.id,
            position: GeoPosition {
                latitude,
                longitude,
            },
        }
    }

    #[tokio::test]
    async fn test_generate_resource_nodes() {
        let fixture = fixture().await;

        let nodes = fixture.world.generate_resource_nodes(None).await.unwrap();
        assert_eq!(nodes.len(), 25);
        assert!(nodes.iter().all(|n| n.validate().is_ok()));
        assert!(nodes.iter().all(|n| (1..=1000).contains(&n.amount)));

        fixture.world.generate_resource_nodes(Some(5)).await.unwrap();
        assert_eq!(fixture.world.count_resource_nodes().await.unwrap(), 30);
        assert_eq!(fixture.world.export_resource_data().await.unwrap().nodes.len(), 30);

        assert!(fixture.world.generate_resource_nodes(Some(0)).await.is_err());
        assert!(fixture
            .world
            .generate_resource_nodes(Some(MAX_RESOURCE_NODES + 1))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_update_resource_nodes_upserts() {
        let fixture = fixture().await;
        let mut nodes = fixture.world.generate_resource_nodes(Some(3)).await.unwrap();
        nodes[0].amount = 7;

        let result = fixture
            .world
            .update_resource_nodes(vec![nodes[0].clone()])
            .await
            .unwrap();
        assert_eq!(result, BulkUpdateResult { updated: 1 });

        let stored = fixture.world.list_resource_nodes().await.unwrap();
        assert_eq!(stored.len(), 3);
        let changed = stored.iter().find(|n| n.id == nodes[0].id).unwrap();
        assert_eq!(changed.amount, 7);

        let mut invalid = nodes[1].clone();
        invalid.position.longitude = 200.0;
        assert!(fixture.world.update_resource_nodes(vec![invalid]).await.is_err());
    }

    #[tokio::test]
    async fn test_place_florb_uses_tier_profile() {
        let fixture = fixture().await;
        let florb = stored_florb(&fixture, "Legendary").await;
        let user = UserId::new();

        let placed = fixture
            .world
            .place_florb(user, place(&florb, 51.5, -0.12))
            .await
            .unwrap();

        assert_eq!(placed.gathering_radius, 500.0);
        assert_eq!(placed.duration_hours, 48.0);
        assert_eq!(placed.effectiveness, 5.0);
        assert_eq!(placed.florb.code, florb.code);
        assert_eq!(fixture.world.count_placed_florbs(user).await.unwrap(), 1);
        assert_eq!(fixture.world.count_placed_florbs(UserId::new()).await.unwrap(), 0);

        let listed = fixture.world.list_placed_florbs(user).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, placed.id);
        assert_eq!(listed[0].florb.florb_id, florb.id);
    }

    #[tokio::test]
    async fn test_place_florb_reports_storage_failure() {
        let repository = SqliteRepository::in_memory().await.unwrap();
        let world = WorldMapServiceImpl::new(
            Arc::new(FlorbCatalog::standard()),
            WorldMapRepositories {
                florbs: Arc::new(repository.florbs()),
                resource_nodes: Arc::new(repository.resource_nodes()),
                placed_florbs: Arc::new(repository.placed_florbs()),
                player_resources: Arc::new(repository.player_resources()),
                gathering: Arc::new(repository.gathering()),
            },
            25,
        );
        repository.pool().close().await;

        let err = world
            .place_florb(
                UserId::new(),
                PlaceFlorbRequest {
                    florb_id: FlorbId::new(),
                    position: GeoPosition::new(1.0, 2.0).unwrap(),
                },
            )
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to load florb for placement"));
    }

    #[tokio::test]
    async fn test_place_florb_validation() {
        let fixture = fixture().await;
        let florb = stored_florb(&fixture, "Common").await;

        let err = fixture
            .world
            .place_florb(UserId::new(), place(&florb, 91.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidPosition { .. })
        ));

        let missing = PlaceFlorbRequest {
            florb_id: FlorbId::new(),
            position: GeoPosition::new(0.0, 0.0).unwrap(),
        };
        assert!(fixture.world.place_florb(UserId::new(), missing).await.is_err());
    }

    #[tokio::test]
    async fn test_update_placed_florbs_only_touches_own() {
        let fixture = fixture().await;
        let florb = stored_florb(&fixture, "Rare").await;
        let owner = UserId::new();
        let intruder = UserId::new();

        let mut mine = fixture.world.place_florb(owner, place(&florb, 1.0, 1.0)).await.unwrap();
        let mut theirs = fixture
            .world
            .place_florb(intruder, place(&florb, 2.0, 2.0))
            .await
            .unwrap();

        let gathered_at = Utc::now();
        mine.last_gathered = Some(gathered_at);
        mine.total_gathered = Some(ResourceBundle::new(3.0, 2.0, 1.0));
        theirs.position = GeoPosition::new(-5.0, -5.0).unwrap();

        let result = fixture
            .world
            .update_placed_florbs(owner, vec![mine.clone(), theirs.clone()])
            .await
            .unwrap();
        assert_eq!(result.updated, 1);

        let owner_view = fixture.world.list_placed_florbs(owner).await.unwrap();
        assert_eq!(owner_view[0].total_gathered, Some(ResourceBundle::new(3.0, 2.0, 1.0)));
        assert!(owner_view[0].last_gathered.is_some());

        let intruder_view = fixture.world.list_placed_florbs(intruder).await.unwrap();
        assert_eq!(intruder_view[0].position, GeoPosition::new(2.0, 2.0).unwrap());

        // Forging the owner field does not let another user overwrite it.
        let mut forged = intruder_view[0].clone();
        forged.user_id = owner;
        forged.position = GeoPosition::new(9.0, 9.0).unwrap();
        let result = fixture
            .world
            .update_placed_florbs(owner, vec![forged])
            .await
            .unwrap();
        assert_eq!(result.updated, 0);
    }

    #[tokio::test]
    async fn test_player_resources_lifecycle() {
        let fixture = fixture().await;
        let user = UserId::new();

        let initial = fixture.world.get_player_resources(user).await.unwrap();
        assert_eq!(initial.balance, ResourceBundle::default());

        let updated = fixture
            .world
            .update_player_resources(user, ResourceBundle::new(10.0, 20.5, 0.0))
            .await
            .unwrap();
        assert_eq!(updated.balance.energy, 20.5);

        let fetched = fixture.world.get_player_resources(user).await.unwrap();
        assert_eq!(fetched.balance, ResourceBundle::new(10.0, 20.5, 0.0));

        let err = fixture
            .world
            .update_player_resources(user, ResourceBundle::new(-1.0, 0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidResources(_))
        ));
    }

    #[tokio::test]
    async fn test_record_gathering() {
        let fixture = fixture().await;
        let user = UserId::new();
        let at = Utc::now() - Duration::minutes(5);

        fixture
            .world
            .record_gathering(user, ResourceBundle::new(1.0, 2.0, 3.0), at)
            .await
            .unwrap();
        assert!(fixture
            .world
            .record_gathering(user, ResourceBundle::new(f64::NAN, 0.0, 0.0), at)
            .await
            .is_err());

        let history = fixture.world.gathering_history(user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].gathered, ResourceBundle::new(1.0, 2.0, 3.0));
        assert!(fixture.world.gathering_history(UserId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expire_placements() {
        let fixture = fixture().await;
        let common = stored_florb(&fixture, "Common").await;
        let epic = stored_florb(&fixture, "Epic").await;
        let user = UserId::new();

        let short = fixture.world.place_florb(user, place(&common, 0.0, 0.0)).await.unwrap();
        let long = fixture.world.place_florb(user, place(&epic, 0.0, 0.0)).await.unwrap();

        assert_eq!(fixture.world.expire_placements(Utc::now()).await.unwrap(), 0);

        let after_common = short.expires_at() + Duration::seconds(1);
        assert!(after_common < long.expires_at());
        assert_eq!(fixture.world.expire_placements(after_common).await.unwrap(), 1);

        let remaining = fixture.world.list_placed_florbs(user).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, long.id);
    }
}
