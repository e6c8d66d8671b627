//! The explicitly constructed agent session.
//!
//! A [`Session`] bundles the catalog, the live agent, and the configuration
//! for one resolution or mission call chain. The resolver, the primitive
//! tools, and the orchestrator all borrow it; nothing in the core holds
//! global agent state. Connection lifecycle stays with whoever built the
//! agent.

use smithy_types::{BlockId, ItemId, Position};
use smithy_world::{Agent, Catalog};

use crate::config::SmithyConfig;
use crate::error::SessionError;

/// Catalog identifiers of the world objects the core relies on, resolved once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmarks {
    /// The crafting workstation as an item.
    pub workstation_item: ItemId,
    /// The crafting workstation as a placed block.
    pub workstation_block: BlockId,
    /// The furnace as an item.
    pub furnace_item: ItemId,
    /// The furnace as a placed block.
    pub furnace_block: BlockId,
}

/// One agent, its catalog, and the configuration in force.
pub struct Session<'a> {
    catalog: &'a dyn Catalog,
    agent: &'a mut dyn Agent,
    config: &'a SmithyConfig,
    landmarks: Landmarks,
}

impl<'a> Session<'a> {
    /// Build a session, resolving the configured workstation and furnace.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if either landmark is missing from the
    /// catalog or has no block form.
    pub fn new(
        catalog: &'a dyn Catalog,
        agent: &'a mut dyn Agent,
        config: &'a SmithyConfig,
    ) -> Result<Self, SessionError> {
        let (workstation_item, workstation_block) =
            placeable(catalog, &config.resolver.workstation)?;
        let (furnace_item, furnace_block) = placeable(catalog, &config.smelting.furnace)?;
        Ok(Self {
            catalog,
            agent,
            config,
            landmarks: Landmarks {
                workstation_item,
                workstation_block,
                furnace_item,
                furnace_block,
            },
        })
    }

    /// The catalog. The returned reference outlives any borrow of the session.
    pub const fn catalog(&self) -> &'a dyn Catalog {
        self.catalog
    }

    /// Read access to the agent.
    pub fn agent(&self) -> &dyn Agent {
        &*self.agent
    }

    /// Mutable access to the agent, for actions.
    pub fn agent_mut(&mut self) -> &mut dyn Agent {
        &mut *self.agent
    }

    /// The configuration in force.
    pub const fn config(&self) -> &'a SmithyConfig {
        self.config
    }

    /// Resolved landmark identifiers.
    pub const fn landmarks(&self) -> Landmarks {
        self.landmarks
    }

    /// Quantity of `item` held.
    pub fn held(&self, item: ItemId) -> u32 {
        self.agent.count(item)
    }

    /// Display name of an item, or its identifier when unknown.
    pub fn item_name(&self, item: ItemId) -> String {
        self.catalog
            .item(item)
            .map_or_else(|| item.to_string(), |def| def.name.clone())
    }

    /// Display name of a block, or its identifier when unknown.
    pub fn block_name(&self, block: BlockId) -> String {
        self.catalog
            .block(block)
            .map_or_else(|| block.to_string(), |def| def.name.clone())
    }

    /// A placed workstation within interaction range, if any.
    pub fn workstation_nearby(&self) -> Option<Position> {
        self.agent.find_nearest(
            self.landmarks.workstation_block,
            self.config.agent.interaction_range,
        )
    }

    /// A placed furnace within interaction range, if any.
    pub fn furnace_nearby(&self) -> Option<Position> {
        self.agent.find_nearest(
            self.landmarks.furnace_block,
            self.config.agent.interaction_range,
        )
    }

    /// Whether `pos` is within interaction range of the agent.
    pub fn in_reach(&self, pos: Position) -> bool {
        self.agent
            .position()
            .is_within(pos, self.config.agent.interaction_range)
    }
}

impl core::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("position", &self.agent.position())
            .field("landmarks", &self.landmarks)
            .finish_non_exhaustive()
    }
}

fn placeable(catalog: &dyn Catalog, name: &str) -> Result<(ItemId, BlockId), SessionError> {
    let item = catalog
        .item_id(name)
        .ok_or_else(|| SessionError::UnknownItem(name.to_owned()))?;
    let block = catalog
        .item(item)
        .and_then(|def| def.places)
        .ok_or_else(|| SessionError::NotPlaceable(name.to_owned()))?;
    Ok((item, block))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use smithy_world::{RecipeBook, SimWorld, WorldRules};

    use super::*;

    fn book(with_furnace: bool) -> Arc<RecipeBook> {
        let mut builder = RecipeBook::builder()
            .item("crafting_table")
            .block("crafting_table", Some("crafting_table"), &[]);
        if with_furnace {
            builder = builder.item("furnace").block("furnace", Some("furnace"), &[]);
        }
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn landmarks_resolve_from_config() {
        let catalog = book(true);
        let mut sim = SimWorld::new(Arc::clone(&catalog), WorldRules::default());
        let config = SmithyConfig::default();
        let session = Session::new(&*catalog, &mut sim, &config).unwrap();
        let landmarks = session.landmarks();
        assert_eq!(session.item_name(landmarks.workstation_item), "crafting_table");
        assert_eq!(session.block_name(landmarks.furnace_block), "furnace");
        assert!(session.workstation_nearby().is_none());
    }

    #[test]
    fn missing_landmark_is_an_error() {
        let catalog = book(false);
        let mut sim = SimWorld::new(Arc::clone(&catalog), WorldRules::default());
        let config = SmithyConfig::default();
        let err = Session::new(&*catalog, &mut sim, &config).unwrap_err();
        assert_eq!(err, SessionError::UnknownItem(String::from("furnace")));
    }

    #[test]
    fn workstation_in_reach_is_found() {
        let catalog = book(true);
        let mut sim = SimWorld::new(Arc::clone(&catalog), WorldRules::default());
        sim.set_block_named(Position::new(2, 0, 0), "crafting_table").unwrap();
        sim.set_block_named(Position::new(9, 0, 0), "furnace").unwrap();
        let config = SmithyConfig::default();
        let session = Session::new(&*catalog, &mut sim, &config).unwrap();
        assert_eq!(session.workstation_nearby(), Some(Position::new(2, 0, 0)));
        assert!(session.furnace_nearby().is_none());
        assert!(!session.in_reach(Position::new(9, 0, 0)));
    }
}
