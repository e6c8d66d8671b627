//! In-memory recipe catalog.
//!
//! [`RecipeBook`] is an immutable [`Catalog`] built from name-based
//! [`CatalogData`], either deserialized from a scenario file or assembled with
//! [`RecipeBookBuilder`]. Names are resolved to dense [`ItemId`]/[`BlockId`]
//! indices once, at build time; every dangling reference is a build error.
//!
//! An item whose name matches a declared block places that block.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smithy_types::{BlockDef, BlockId, Ingredient, ItemDef, ItemId, Recipe};

use crate::contracts::Catalog;
use crate::error::WorldError;

/// Name-based catalog description, as written in scenario files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    /// Item declarations.
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    /// Block declarations.
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
    /// Crafting recipes, in enumeration order.
    #[serde(default)]
    pub recipes: Vec<RecipeSpec>,
    /// Furnace transformations.
    #[serde(default)]
    pub smelting: Vec<SmeltingSpec>,
}

/// An item declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Item name.
    pub name: String,
    /// Items smelted per unit when used as fuel.
    #[serde(default)]
    pub fuel_value: Option<u32>,
}

/// A block declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// Block name.
    pub name: String,
    /// Name of the item dropped when dug.
    #[serde(default)]
    pub drops: Option<String>,
    /// Names of tools able to harvest the block.
    #[serde(default)]
    pub tools: Vec<String>,
}

/// A crafting recipe declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSpec {
    /// Produced item name.
    pub output: String,
    /// Items produced per batch.
    #[serde(default = "default_output_count")]
    pub count: u32,
    /// Ingredient deltas in declared order.
    pub ingredients: Vec<IngredientSpec>,
    /// Whether a workstation is required.
    #[serde(default)]
    pub workstation: bool,
}

/// One ingredient of a [`RecipeSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSpec {
    /// Ingredient item name.
    pub item: String,
    /// Per-batch delta; non-positive values are by-products.
    pub count: i32,
}

/// A furnace transformation declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmeltingSpec {
    /// Input item name.
    pub input: String,
    /// Output item name.
    pub output: String,
}

const fn default_output_count() -> u32 {
    1
}

/// Immutable, validated recipe catalog.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    items: Vec<ItemDef>,
    item_by_name: BTreeMap<String, ItemId>,
    blocks: Vec<BlockDef>,
    block_by_name: BTreeMap<String, BlockId>,
    recipes: BTreeMap<ItemId, Vec<Recipe>>,
    smelting: BTreeMap<ItemId, ItemId>,
}

impl RecipeBook {
    /// Start assembling a catalog in code.
    pub fn builder() -> RecipeBookBuilder {
        RecipeBookBuilder::default()
    }

    /// Build a catalog from name-based data, validating every reference.
    pub fn from_data(data: &CatalogData) -> Result<Self, WorldError> {
        let mut book = Self::default();

        for spec in &data.items {
            if book.item_by_name.contains_key(&spec.name) {
                return Err(WorldError::DuplicateItem(spec.name.clone()));
            }
            let id = ItemId(next_index(book.items.len())?);
            book.items.push(ItemDef {
                id,
                name: spec.name.clone(),
                places: None,
                fuel_value: spec.fuel_value,
            });
            book.item_by_name.insert(spec.name.clone(), id);
        }

        for spec in &data.blocks {
            if book.block_by_name.contains_key(&spec.name) {
                return Err(WorldError::DuplicateBlock(spec.name.clone()));
            }
            let drops = spec
                .drops
                .as_deref()
                .map(|name| book.require_item(name))
                .transpose()?;
            let harvest_tools = spec
                .tools
                .iter()
                .map(|name| book.require_item(name))
                .collect::<Result<Vec<_>, _>>()?;
            let id = BlockId(next_index(book.blocks.len())?);
            book.blocks.push(BlockDef {
                id,
                name: spec.name.clone(),
                drops,
                harvest_tools,
            });
            book.block_by_name.insert(spec.name.clone(), id);
        }

        for item in &mut book.items {
            item.places = book.block_by_name.get(&item.name).copied();
        }

        for spec in &data.recipes {
            let recipe = book.resolve_recipe(spec)?;
            book.recipes.entry(recipe.produced).or_default().push(recipe);
        }

        for spec in &data.smelting {
            let input = book.require_item(&spec.input)?;
            let output = book.require_item(&spec.output)?;
            book.smelting.insert(input, output);
        }

        Ok(book)
    }

    /// Number of declared items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Display name of an item, falling back to its identifier.
    pub fn item_name(&self, id: ItemId) -> String {
        self.item(id).map_or_else(|| id.to_string(), |def| def.name.clone())
    }

    /// Display name of a block, falling back to its identifier.
    pub fn block_name(&self, id: BlockId) -> String {
        self.block(id).map_or_else(|| id.to_string(), |def| def.name.clone())
    }

    fn require_item(&self, name: &str) -> Result<ItemId, WorldError> {
        self.item_by_name
            .get(name)
            .copied()
            .ok_or_else(|| WorldError::UnknownItem(name.to_owned()))
    }

    fn resolve_recipe(&self, spec: &RecipeSpec) -> Result<Recipe, WorldError> {
        if spec.count == 0 {
            return Err(WorldError::InvalidRecipe {
                output: spec.output.clone(),
                reason: String::from("output count must be positive"),
            });
        }
        let produced = self.require_item(&spec.output)?;
        let ingredients = spec
            .ingredients
            .iter()
            .map(|ing| {
                Ok(Ingredient {
                    item: self.require_item(&ing.item)?,
                    count: ing.count,
                })
            })
            .collect::<Result<Vec<_>, WorldError>>()?;
        Ok(Recipe {
            produced,
            output_count: spec.count,
            ingredients,
            requires_workstation: spec.workstation,
        })
    }
}

fn next_index(len: usize) -> Result<u32, WorldError> {
    u32::try_from(len).ok().ok_or(WorldError::CatalogTooLarge)
}

impl Catalog for RecipeBook {
    fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.as_index()?)
    }

    fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_by_name.get(name).copied()
    }

    fn block(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id.as_index()?)
    }

    fn block_id(&self, name: &str) -> Option<BlockId> {
        self.block_by_name.get(name).copied()
    }

    fn recipes_for(&self, item: ItemId) -> &[Recipe] {
        self.recipes.get(&item).map(Vec::as_slice).unwrap_or(&[])
    }

    fn sources_of(&self, item: ItemId) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|block| block.drops == Some(item))
            .map(|block| block.id)
            .collect()
    }

    fn smelting_output(&self, input: ItemId) -> Option<ItemId> {
        self.smelting.get(&input).copied()
    }
}

/// Fluent assembly of [`CatalogData`] for tests and embedded catalogs.
#[derive(Debug, Clone, Default)]
pub struct RecipeBookBuilder {
    data: CatalogData,
}

impl RecipeBookBuilder {
    /// Declare an item.
    #[must_use]
    pub fn item(mut self, name: &str) -> Self {
        self.data.items.push(ItemSpec {
            name: name.to_owned(),
            fuel_value: None,
        });
        self
    }

    /// Declare several plain items at once.
    #[must_use]
    pub fn items(self, names: &[&str]) -> Self {
        names.iter().fold(self, |builder, name| builder.item(name))
    }

    /// Declare a fuel item smelting `value` items per unit.
    #[must_use]
    pub fn fuel(mut self, name: &str, value: u32) -> Self {
        self.data.items.push(ItemSpec {
            name: name.to_owned(),
            fuel_value: Some(value),
        });
        self
    }

    /// Declare a block with its drop and acceptable harvest tools.
    #[must_use]
    pub fn block(mut self, name: &str, drops: Option<&str>, tools: &[&str]) -> Self {
        self.data.blocks.push(BlockSpec {
            name: name.to_owned(),
            drops: drops.map(str::to_owned),
            tools: tools.iter().map(|t| (*t).to_owned()).collect(),
        });
        self
    }

    /// Declare a recipe producing `count` of `output`.
    #[must_use]
    pub fn recipe(
        mut self,
        output: &str,
        count: u32,
        ingredients: &[(&str, i32)],
        workstation: bool,
    ) -> Self {
        self.data.recipes.push(RecipeSpec {
            output: output.to_owned(),
            count,
            ingredients: ingredients
                .iter()
                .map(|(item, n)| IngredientSpec {
                    item: (*item).to_owned(),
                    count: *n,
                })
                .collect(),
            workstation,
        });
        self
    }

    /// Declare a furnace transformation.
    #[must_use]
    pub fn smelting(mut self, input: &str, output: &str) -> Self {
        self.data.smelting.push(SmeltingSpec {
            input: input.to_owned(),
            output: output.to_owned(),
        });
        self
    }

    /// Validate and freeze the catalog.
    pub fn build(self) -> Result<RecipeBook, WorldError> {
        RecipeBook::from_data(&self.data)
    }
}
