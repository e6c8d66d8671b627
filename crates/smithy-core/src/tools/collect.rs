//! Find and mine blocks.

use smithy_types::BlockId;
use tracing::{info, warn};

use crate::error::ToolError;
use crate::report::StepLog;
use crate::session::Session;

/// Mine up to `count` blocks of type `block`, nearest first.
///
/// Equips a held harvest tool first when the block needs one. The agent walks
/// to blocks outside interaction range. A block that cannot be dug is logged
/// and skipped. Returns the number of blocks mined.
///
/// # Errors
///
/// [`ToolError::NoneFound`] when no block is within the search radius,
/// [`ToolError::MissingTool`] when no acceptable tool is held, and
/// [`ToolError::Shortfall`] when fewer than `count` were mined.
pub fn collect(
    session: &mut Session<'_>,
    log: &mut StepLog,
    block: BlockId,
    count: u32,
) -> Result<u32, ToolError> {
    let name = session.block_name(block);
    if count == 0 {
        log.push(format!("nothing to collect for {name}"));
        return Ok(0);
    }

    let radius = session.config().agent.search_radius;
    let limit = usize::try_from(count).unwrap_or(usize::MAX);
    let targets = session.agent().find_all(block, radius, limit);
    if targets.is_empty() {
        log.push(format!("no {name} within {radius} blocks"));
        return Err(ToolError::NoneFound {
            block: name,
            radius,
        });
    }

    equip_harvest_tool(session, log, block, &name)?;

    log.push(format!("mining {} {name}", targets.len()));
    let mut collected: u32 = 0;
    for pos in targets {
        let reachable = session.in_reach(pos)
            || match session.agent_mut().move_to(pos) {
                Ok(()) => true,
                Err(err) => {
                    warn!(block = %name, at = %pos, %err, "Could not reach block");
                    log.push(format!("could not reach {name} at {pos}: {err}"));
                    false
                }
            };
        if !reachable {
            continue;
        }
        match session.agent_mut().dig(pos) {
            Ok(()) => collected = collected.saturating_add(1),
            Err(err) => {
                warn!(block = %name, at = %pos, %err, "Dig failed");
                log.push(format!("could not mine {name} at {pos}: {err}"));
            }
        }
    }

    info!(block = %name, collected, wanted = count, "Collect finished");
    log.push(format!("collected {collected} {name}"));
    if collected < count {
        return Err(ToolError::Shortfall {
            block: name,
            wanted: count,
            collected,
        });
    }
    Ok(collected)
}

fn equip_harvest_tool(
    session: &mut Session<'_>,
    log: &mut StepLog,
    block: BlockId,
    name: &str,
) -> Result<(), ToolError> {
    let Some(def) = session.catalog().block(block) else {
        return Ok(());
    };
    if !def.needs_tool() {
        return Ok(());
    }
    let handle = def
        .harvest_tools
        .iter()
        .find_map(|tool| session.agent().find(*tool))
        .ok_or_else(|| ToolError::MissingTool {
            block: name.to_owned(),
        })?;
    let tool_name = session.item_name(handle.item);
    session
        .agent_mut()
        .equip(handle)
        .map_err(|source| ToolError::Action {
            action: format!("equip {tool_name}"),
            source,
        })?;
    log.push(format!("equipped {tool_name}"));
    Ok(())
}
