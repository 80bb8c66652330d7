mod connector;
mod error;
mod grid;
mod placement;
mod types;

use std::collections::BTreeSet;

pub use connector::{build_connector, connector_path, rule_connector};
pub use error::LayoutError;
pub use grid::{cell_for_offset, displayed_days, resolve_cell};
pub use placement::{default_side, place_chip, resolve_side};
pub use types::*;

use crate::config::GridConfig;
use crate::ir::CalendarSignal;
use crate::log;

/// Resolves one signal to its cell, chip placement and connector.
pub fn layout_signal(
    signal: &CalendarSignal,
    grid: &GridConfig,
) -> Result<SignalLayout, LayoutError> {
    let cell = resolve_cell(signal.day, grid)?;
    let placement = place_chip(&cell, signal, grid)?;
    let connector = build_connector(cell.anchor, &placement, &grid.connector);
    Ok(SignalLayout {
        signal: signal.clone(),
        cell,
        placement,
        connector,
    })
}

pub fn compute_layout(signals: &[CalendarSignal], grid: &GridConfig) -> CalendarLayout {
    let mut laid_out = Vec::with_capacity(signals.len());
    let mut skipped = Vec::new();

    for (index, signal) in signals.iter().enumerate() {
        match layout_signal(signal, grid) {
            Ok(layout) => {
                log::debug!(
                    day = signal.day,
                    side = layout.placement.side.as_str(),
                    clamped = layout.placement.was_clamped(),
                    "placed signal chip"
                );
                laid_out.push(layout);
            }
            Err(reason) => {
                log::warn!(index, day = signal.day, %reason, "skipping signal");
                skipped.push(SkippedSignal {
                    index,
                    signal: signal.clone(),
                    reason,
                });
            }
        }
    }

    let hot: BTreeSet<i32> = laid_out.iter().map(|layout| layout.signal.day).collect();
    let cells = displayed_days(grid)
        .map(|day| {
            let cell = cell_for_offset(day, day - grid.first_displayed_day, grid);
            let is_hot = hot.contains(&day);
            let marker = is_hot.then(|| {
                let radius = grid.marker.size / 2.0;
                (
                    Point::new(
                        cell.x + cell.size - grid.marker.inset_right - radius,
                        cell.y + grid.marker.inset_top + radius,
                    ),
                    grid.marker.size,
                )
            });
            CellLayout {
                day,
                row: cell.row,
                col: cell.col,
                x: cell.x,
                y: cell.y,
                size: cell.size,
                hot: is_hot,
                marker,
            }
        })
        .collect();

    CalendarLayout {
        cells,
        signals: laid_out,
        skipped,
        width: grid.panel_width(),
        height: grid.grid_height(),
    }
}
