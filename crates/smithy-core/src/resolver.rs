//! Recursive recipe resolution.
//!
//! [`Resolver::resolve`] turns `(item, quantity)` into actions against the
//! live agent. Resolution and execution are interleaved: every level re-reads
//! the inventory and the surroundings before acting, so there is no plan
//! object that can go stale.
//!
//! For one node the order is:
//!
//! 1. Unknown identifiers fail with [`ResolveError::UnknownItem`].
//! 2. Enough held: succeed without acting.
//! 3. Item already on the active path: [`ResolveError::CycleDetected`].
//! 4. Pick a recipe, workstation-free ones first, catalog order otherwise.
//!    With no recipe, raw items are gathered when `gather_raw` is set.
//! 5. Secure the workstation, unless the item is the workstation itself.
//! 6. Resolve ingredients in declared order, repeating while a sibling
//!    consumed a shared ingredient.
//! 7. Craft the deficit in one transaction.

use smithy_types::{ItemId, Position, Recipe};
use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::quantity;
use crate::report::StepLog;
use crate::session::Session;
use crate::tools::collect;
use crate::workstation;

/// Items being resolved on the current call path, outermost first.
///
/// Extending returns a new set, so sibling ingredient subtrees never see each
/// other's markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    path: Vec<ItemId>,
}

impl ActiveSet {
    /// The empty set used at the root of a resolution.
    pub const fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Whether `item` is on the current path.
    pub fn contains(&self, item: ItemId) -> bool {
        self.path.contains(&item)
    }

    /// A copy of this set with `item` appended.
    #[must_use]
    pub fn extended(&self, item: ItemId) -> Self {
        let mut path = Vec::with_capacity(self.path.len().saturating_add(1));
        path.extend_from_slice(&self.path);
        path.push(item);
        Self { path }
    }

    /// Items on the path, outermost first.
    pub fn path(&self) -> &[ItemId] {
        &self.path
    }

    /// Number of items on the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path is empty.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Outcome of a top-level resolution.
#[derive(Debug)]
pub struct Resolution {
    /// Success, or the error that ended the resolution.
    pub result: Result<(), ResolveError>,
    /// Ordered diagnostic steps.
    pub steps: Vec<String>,
}

impl Resolution {
    /// Whether the resolution succeeded.
    pub const fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Resolves item requests against one session.
#[derive(Debug)]
pub struct Resolver<'s, 'a> {
    pub(crate) session: &'s mut Session<'a>,
    pub(crate) log: StepLog,
    pub(crate) placed_workstation: Option<Position>,
}

impl<'s, 'a> Resolver<'s, 'a> {
    /// Borrow a session for resolution.
    pub const fn new(session: &'s mut Session<'a>) -> Self {
        Self {
            session,
            log: StepLog::new(),
            placed_workstation: None,
        }
    }

    /// Obtain at least `quantity` of `item`, starting with an empty active set.
    ///
    /// A workstation placed along the way is dug back up afterwards when
    /// `reclaim_workstation` is set.
    pub fn resolve(&mut self, item: ItemId, quantity: u32) -> Resolution {
        let name = self.session.item_name(item);
        info!(item = %name, quantity, "Resolving");
        self.placed_workstation = None;

        let result = self.resolve_in(item, quantity, &ActiveSet::new());
        if result.is_ok() && self.session.config().resolver.reclaim_workstation {
            workstation::reclaim(self);
        }

        match &result {
            Ok(()) => info!(item = %name, quantity, "Resolved"),
            Err(err) => warn!(item = %name, quantity, %err, "Resolution failed"),
        }
        Resolution {
            result,
            steps: self.log.drain(),
        }
    }

    /// [`resolve`](Self::resolve) by item name.
    pub fn resolve_named(&mut self, name: &str, quantity: u32) -> Resolution {
        match self.session.catalog().item_id(name) {
            Some(item) => self.resolve(item, quantity),
            None => {
                let err = ResolveError::UnknownItem {
                    item: name.to_owned(),
                };
                self.log.push(format!("unknown item {name}"));
                warn!(item = %name, "Resolution failed: unknown item");
                Resolution {
                    result: Err(err),
                    steps: self.log.drain(),
                }
            }
        }
    }

    /// Resolve one node with an explicit active set.
    pub(crate) fn resolve_in(
        &mut self,
        item: ItemId,
        quantity: u32,
        active: &ActiveSet,
    ) -> Result<(), ResolveError> {
        let catalog = self.session.catalog();
        if catalog.item(item).is_none() {
            self.log.push(format!("unknown item {item}"));
            return Err(ResolveError::UnknownItem {
                item: item.to_string(),
            });
        }
        let name = self.session.item_name(item);

        let held = self.session.held(item);
        if held >= quantity {
            self.log.push(format!("have {held}/{quantity} {name}"));
            return Ok(());
        }

        if active.contains(item) {
            let path = self.describe_cycle(active, item);
            warn!(item = %name, %path, "Cycle detected");
            self.log.push(format!("cycle detected: {path}"));
            return Err(ResolveError::CycleDetected { path });
        }

        debug!(item = %name, quantity, held, depth = active.len(), "Resolving node");
        let mut candidates: Vec<&Recipe> = catalog.recipes_for(item).iter().collect();
        candidates.sort_by_key(|recipe| recipe.requires_workstation);
        let Some(selected) = candidates.first().copied() else {
            return self.gather(item, quantity, active);
        };

        let child = active.extended(item);
        let is_workstation = item == self.session.landmarks().workstation_item;
        if selected.requires_workstation && !is_workstation {
            workstation::ensure(self, &child)?;
        }

        self.close_ingredients(item, quantity, selected, &child)?;
        self.execute(item, quantity, selected, &candidates, &child)
    }

    /// Resolve every ingredient of `recipe` until all are held together.
    fn close_ingredients(
        &mut self,
        item: ItemId,
        quantity: u32,
        recipe: &Recipe,
        child: &ActiveSet,
    ) -> Result<(), ResolveError> {
        let per_batch = quantity::per_batch_ingredients(recipe)
            .ok_or_else(|| overflow(format!("ingredients of {}", self.session.item_name(item))))?;
        let passes = self.session.config().resolver.max_closure_passes.max(1);

        let mut shortfall = None;
        for pass in 1..=passes {
            let deficit = quantity::deficit(quantity, self.session.held(item));
            if deficit == 0 {
                return Ok(());
            }
            if pass > 1 {
                self.log.push(format!(
                    "re-checking ingredients of {} (pass {pass})",
                    self.session.item_name(item)
                ));
            }

            let needs = per_batch
                .iter()
                .map(|&(ingredient, count)| {
                    quantity::ingredient_total(count, deficit, recipe.output_count)
                        .map(|needed| (ingredient, needed))
                        .ok_or_else(|| {
                            overflow(format!("need of {}", self.session.item_name(ingredient)))
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            for &(ingredient, needed) in &needs {
                self.resolve_in(ingredient, needed, child)?;
            }

            shortfall = needs.iter().find_map(|&(ingredient, needed)| {
                let held = self.session.held(ingredient);
                (held < needed).then_some((ingredient, needed, held))
            });
            if shortfall.is_none() {
                return Ok(());
            }
        }

        match shortfall {
            Some((ingredient, needed, held)) => {
                let err = ResolveError::IngredientShortfall {
                    item: self.session.item_name(item),
                    ingredient: self.session.item_name(ingredient),
                    needed,
                    held,
                };
                self.log.push(err.to_string());
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Submit one craft covering the current deficit.
    fn execute(
        &mut self,
        item: ItemId,
        quantity: u32,
        selected: &Recipe,
        candidates: &[&Recipe],
        child: &ActiveSet,
    ) -> Result<(), ResolveError> {
        let name = self.session.item_name(item);
        let deficit = quantity::deficit(quantity, self.session.held(item));
        if deficit == 0 {
            self.log.push(format!("have {quantity} {name} after ingredients"));
            return Ok(());
        }

        let is_workstation = item == self.session.landmarks().workstation_item;
        let mut table = self.session.workstation_nearby();
        if selected.requires_workstation && !is_workstation && table.is_none() {
            table = Some(workstation::ensure(self, child)?);
        }

        let chosen = std::iter::once(selected)
            .chain(candidates.iter().copied())
            .find(|recipe| self.is_feasible(recipe, deficit, table.is_some() || is_workstation))
            .ok_or_else(|| {
                let reason = format!("no recipe for {name} is feasible with the current inventory");
                self.log.push(reason.clone());
                ResolveError::Execution {
                    action: format!("craft {name}"),
                    source: smithy_world::ActionError::Rejected { reason },
                }
            })?;

        let batches = quantity::batches_for(deficit, chosen.output_count)
            .ok_or_else(|| overflow(format!("batches of {name}")))?;
        let station = if chosen.requires_workstation { table } else { None };
        self.session
            .agent_mut()
            .craft(chosen, batches, station)
            .map_err(|source| {
                self.log.push(format!("craft {name} x{batches} failed: {source}"));
                ResolveError::Execution {
                    action: format!("craft {name}"),
                    source,
                }
            })?;

        let produced = chosen.output_count.saturating_mul(batches);
        self.log.push(format!("crafted {produced} {name} ({batches} batch(es))"));
        Ok(())
    }

    /// Whether `recipe` can run now for `deficit` items.
    fn is_feasible(&self, recipe: &Recipe, deficit: u32, workstation_ready: bool) -> bool {
        if recipe.requires_workstation && !workstation_ready {
            return false;
        }
        quantity::per_batch_ingredients(recipe).is_some_and(|per_batch| {
            per_batch.iter().all(|&(ingredient, count)| {
                quantity::ingredient_total(count, deficit, recipe.output_count)
                    .is_some_and(|needed| self.session.held(ingredient) >= needed)
            })
        })
    }

    /// Mine a raw item that no recipe produces.
    fn gather(
        &mut self,
        item: ItemId,
        quantity: u32,
        active: &ActiveSet,
    ) -> Result<(), ResolveError> {
        let name = self.session.item_name(item);
        let catalog = self.session.catalog();
        let sources = catalog.sources_of(item);
        if !self.session.config().resolver.gather_raw || sources.is_empty() {
            self.log.push(format!("no recipe produces {name}"));
            return Err(ResolveError::NoRecipe { item: name });
        }

        let radius = self.session.config().agent.search_radius;
        let block = sources
            .iter()
            .copied()
            .find(|block| self.session.agent().find_nearest(*block, radius).is_some())
            .or_else(|| sources.first().copied())
            .ok_or_else(|| ResolveError::NoRecipe { item: name.clone() })?;

        if let Some(def) = catalog.block(block) {
            let tool_held = def
                .harvest_tools
                .iter()
                .any(|tool| self.session.held(*tool) > 0);
            if let Some(&tool) = def.harvest_tools.first().filter(|_| !tool_held) {
                self.log.push(format!(
                    "{} needs a tool; resolving {}",
                    def.name,
                    self.session.item_name(tool)
                ));
                self.resolve_in(tool, 1, &active.extended(item))?;
            }
        }

        let deficit = quantity::deficit(quantity, self.session.held(item));
        self.log.push(format!(
            "gathering {deficit} {name} from {}",
            self.session.block_name(block)
        ));
        collect::collect(self.session, &mut self.log, block, deficit).map_err(|source| {
            ResolveError::Gather {
                item: name.clone(),
                source,
            }
        })?;

        let held = self.session.held(item);
        if held < quantity {
            return Err(ResolveError::IngredientShortfall {
                item: name.clone(),
                ingredient: name,
                needed: quantity,
                held,
            });
        }
        Ok(())
    }

    fn describe_cycle(&self, active: &ActiveSet, item: ItemId) -> String {
        let start = active.path().iter().position(|id| *id == item).unwrap_or(0);
        active
            .path()
            .iter()
            .skip(start)
            .chain(std::iter::once(&item))
            .map(|id| self.session.item_name(*id))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

fn overflow(context: String) -> ResolveError {
    ResolveError::Arithmetic { context }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_does_not_mutate_parent() {
        let root = ActiveSet::new();
        let a = root.extended(ItemId(1));
        let ab = a.extended(ItemId(2));
        let ac = a.extended(ItemId(3));

        assert!(root.is_empty());
        assert_eq!(a.path(), [ItemId(1)]);
        assert!(ab.contains(ItemId(2)));
        assert!(!ac.contains(ItemId(2)));
        assert_eq!(ac.len(), 2);
    }
}
