//! Put a held block down next to the agent.

use smithy_types::{FaceVector, ItemId, Position};
use tracing::{debug, info};

use crate::error::ToolError;
use crate::report::StepLog;
use crate::session::Session;

/// Half-width of the square scanned around the agent.
const SCAN_RADIUS: i32 = 2;

/// Place one `item` on the first free spot in a 5x5 square around the agent.
///
/// A spot qualifies with solid ground below and air at the target; the
/// agent's own column is skipped. A placement the executor rejects moves on
/// to the next spot. Returns where the block went.
///
/// # Errors
///
/// [`ToolError::NotHeld`] when the item is not in the inventory,
/// [`ToolError::Action`] when it cannot be equipped, and
/// [`ToolError::NoPlacement`] when every spot fails.
pub fn place(
    session: &mut Session<'_>,
    log: &mut StepLog,
    item: ItemId,
) -> Result<Position, ToolError> {
    let name = session.item_name(item);
    let handle = session
        .agent()
        .find(item)
        .ok_or_else(|| ToolError::NotHeld { item: name.clone() })?;
    session
        .agent_mut()
        .equip(handle)
        .map_err(|source| ToolError::Action {
            action: format!("equip {name}"),
            source,
        })?;

    let origin = session.agent().position();
    for dx in -SCAN_RADIUS..=SCAN_RADIUS {
        for dz in -SCAN_RADIUS..=SCAN_RADIUS {
            if dx == 0 && dz == 0 {
                continue;
            }
            let ground = origin.offset(dx, -1, dz);
            let target = origin.offset(dx, 0, dz);
            let agent = session.agent();
            if agent.block_at(ground).is_none() || agent.block_at(target).is_some() {
                continue;
            }
            match session.agent_mut().place(ground, FaceVector::UP) {
                Ok(()) => {
                    info!(item = %name, at = %target, "Block placed");
                    log.push(format!("placed {name} at {target}"));
                    return Ok(target);
                }
                Err(err) => debug!(item = %name, at = %target, %err, "Placement rejected"),
            }
        }
    }

    log.push(format!("no free spot for {name} around {origin}"));
    Err(ToolError::NoPlacement { item: name })
}

/// [`place`] by item name.
///
/// # Errors
///
/// [`ToolError::UnknownItem`] for names missing from the catalog, otherwise
/// as [`place`].
pub fn place_named(
    session: &mut Session<'_>,
    log: &mut StepLog,
    name: &str,
) -> Result<Position, ToolError> {
    let item = session
        .catalog()
        .item_id(name)
        .ok_or_else(|| ToolError::UnknownItem(name.to_owned()))?;
    place(session, log, item)
}
