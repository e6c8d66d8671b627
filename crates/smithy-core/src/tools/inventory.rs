//! Human-readable inventory listing.

use crate::session::Session;

/// Held items as `name xN`, comma separated, or `empty`.
pub fn summary(session: &Session<'_>) -> String {
    let items = session.agent().items();
    if items.is_empty() {
        return String::from("empty");
    }
    items
        .into_iter()
        .map(|(item, count)| format!("{} x{count}", session.item_name(item)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use smithy_world::{RecipeBook, SimWorld, WorldRules};

    use super::*;
    use crate::config::SmithyConfig;

    #[test]
    fn lists_held_items_in_catalog_order() {
        let catalog = Arc::new(
            RecipeBook::builder()
                .items(&["crafting_table", "furnace", "oak_log", "stick"])
                .block("crafting_table", Some("crafting_table"), &[])
                .block("furnace", Some("furnace"), &[])
                .build()
                .unwrap(),
        );
        let mut sim = SimWorld::new(Arc::clone(&catalog), WorldRules::default());
        let config = SmithyConfig::default();
        {
            let session = Session::new(&*catalog, &mut sim, &config).unwrap();
            assert_eq!(summary(&session), "empty");
        }
        sim.give_named("stick", 4).unwrap();
        sim.give_named("oak_log", 2).unwrap();
        let session = Session::new(&*catalog, &mut sim, &config).unwrap();
        assert_eq!(summary(&session), "oak_log x2, stick x4");
    }
}
