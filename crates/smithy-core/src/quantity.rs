//! Shared quantity arithmetic.
//!
//! Everything is checked: `None` means the computation overflowed or divided
//! by zero, and callers turn that into an error.

use smithy_types::{ItemId, Recipe};

/// Recipe batches needed to produce at least `deficit` items, `ceil(deficit / output_count)`.
pub fn batches_for(deficit: u32, output_count: u32) -> Option<u32> {
    let whole = deficit.checked_div(output_count)?;
    let rest = deficit.checked_rem(output_count)?;
    if rest == 0 {
        Some(whole)
    } else {
        whole.checked_add(1)
    }
}

/// Total of one ingredient needed to cover `deficit` with a recipe making
/// `output_count` per batch: `per_batch * ceil(deficit / output_count)`.
pub fn ingredient_total(per_batch: u32, deficit: u32, output_count: u32) -> Option<u32> {
    per_batch.checked_mul(batches_for(deficit, output_count)?)
}

/// How many more of an item are needed to hold `wanted`.
pub const fn deficit(wanted: u32, held: u32) -> u32 {
    wanted.saturating_sub(held)
}

/// Fuel units needed to smelt `count` items with a fuel worth `fuel_value` items per unit.
pub fn fuel_units(count: u32, fuel_value: u32) -> Option<u32> {
    batches_for(count, fuel_value)
}

/// Per-batch consumption of a recipe, merged per ingredient in first-seen order.
///
/// By-product entries (zero or negative counts) are dropped.
pub fn per_batch_ingredients(recipe: &Recipe) -> Option<Vec<(ItemId, u32)>> {
    let mut merged: Vec<(ItemId, u32)> = Vec::new();
    for (item, count) in recipe.consumed() {
        if let Some(entry) = merged.iter_mut().find(|(id, _)| *id == item) {
            entry.1 = entry.1.checked_add(count)?;
        } else {
            merged.push((item, count));
        }
    }
    Some(merged)
}

#[cfg(test)]
mod tests {
    use smithy_types::Ingredient;

    use super::*;

    #[test]
    fn batches_round_up() {
        assert_eq!(batches_for(5, 4), Some(2));
        assert_eq!(batches_for(4, 4), Some(1));
        assert_eq!(batches_for(1, 4), Some(1));
        assert_eq!(batches_for(0, 4), Some(0));
        assert_eq!(batches_for(3, 1), Some(3));
        assert_eq!(batches_for(3, 0), None);
    }

    #[test]
    fn five_sticks_need_four_planks() {
        // stick <- 2 planks, 4 per batch
        assert_eq!(ingredient_total(2, 5, 4), Some(4));
    }

    #[test]
    fn ingredient_total_overflow_is_none() {
        assert_eq!(ingredient_total(u32::MAX, 8, 4), None);
    }

    #[test]
    fn deficit_saturates() {
        assert_eq!(deficit(5, 2), 3);
        assert_eq!(deficit(2, 5), 0);
    }

    #[test]
    fn fuel_units_cover_count() {
        assert_eq!(fuel_units(3, 8), Some(1));
        assert_eq!(fuel_units(9, 8), Some(2));
        assert_eq!(fuel_units(1, 0), None);
    }

    #[test]
    fn duplicate_ingredients_merge_and_by_products_drop() {
        let recipe = Recipe {
            produced: ItemId(0),
            output_count: 1,
            ingredients: vec![
                Ingredient { item: ItemId(1), count: 2 },
                Ingredient { item: ItemId(2), count: -1 },
                Ingredient { item: ItemId(3), count: 1 },
                Ingredient { item: ItemId(1), count: 1 },
            ],
            requires_workstation: false,
        };
        assert_eq!(
            per_batch_ingredients(&recipe),
            Some(vec![(ItemId(1), 3), (ItemId(3), 1)])
        );
    }
}
