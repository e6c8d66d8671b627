//! Run a furnace job to completion.

use std::time::Duration;

use smithy_types::ItemId;
use tracing::info;

use crate::error::ToolError;
use crate::quantity;
use crate::report::StepLog;
use crate::session::Session;

/// Smelt `count` of `input` in a furnace within reach, burning `fuel`.
///
/// Loads `ceil(count / fuel_value)` fuel units, starts the job, and waits
/// for the executor's completion signal. The wait is bounded by
/// `smelting.timeout_per_item_ms` per item.
///
/// # Errors
///
/// [`ToolError::NoFurnace`], [`ToolError::NotSmeltable`] and
/// [`ToolError::NotFuel`] are checked before anything is loaded;
/// [`ToolError::Action`] covers a rejected start or a timed-out wait.
pub fn smelt(
    session: &mut Session<'_>,
    log: &mut StepLog,
    input: ItemId,
    fuel: ItemId,
    count: u32,
) -> Result<(), ToolError> {
    let input_name = session.item_name(input);
    let fuel_name = session.item_name(fuel);
    let config = session.config();

    let furnace = session.furnace_nearby().ok_or(ToolError::NoFurnace {
        range: config.agent.interaction_range,
    })?;
    let catalog = session.catalog();
    let output = catalog
        .smelting_output(input)
        .ok_or_else(|| ToolError::NotSmeltable {
            item: input_name.clone(),
        })?;
    let fuel_value = catalog
        .item(fuel)
        .and_then(|def| def.fuel_value)
        .ok_or_else(|| ToolError::NotFuel {
            item: fuel_name.clone(),
        })?;
    let fuel_units = quantity::fuel_units(count, fuel_value).ok_or_else(|| {
        ToolError::Arithmetic {
            context: format!("fuel for {count} {input_name}"),
        }
    })?;

    log.push(format!(
        "smelting {count} {input_name} with {fuel_units} {fuel_name} at {furnace}"
    ));
    let op = session
        .agent_mut()
        .start_smelt(furnace, input, fuel, count, fuel_units)
        .map_err(|source| ToolError::Action {
            action: format!("start smelting {input_name}"),
            source,
        })?;

    let timeout = Duration::from_millis(
        config
            .smelting
            .timeout_per_item_ms
            .saturating_mul(u64::from(count)),
    );
    session
        .agent_mut()
        .wait_for_completion(op, timeout)
        .map_err(|source| ToolError::Action {
            action: format!("wait for {op}"),
            source,
        })?;

    let output_name = session.item_name(output);
    info!(input = %input_name, output = %output_name, count, "Smelt finished");
    log.push(format!("smelted {count} {input_name} into {output_name}"));
    Ok(())
}
