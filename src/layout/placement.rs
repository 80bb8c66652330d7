use super::error::LayoutError;
use super::types::{ChipPlacement, GridCell, Point};
use crate::config::GridConfig;
use crate::ir::{CalendarSignal, Side};

/// Top-row signals float above the grid; the rest go to the nearer half of the week.
pub fn default_side(cell: &GridCell) -> Side {
    if cell.row == 0 {
        Side::Top
    } else if cell.col >= 4 {
        Side::Right
    } else {
        Side::Left
    }
}

pub fn resolve_side(cell: &GridCell, signal: &CalendarSignal) -> Side {
    signal.side.unwrap_or_else(|| default_side(cell))
}

/// Pushes the chip `out` pixels beyond the grid edge on its side, then clamps
/// it to `clamp_margin` around the grid so it stays inside the panel.
pub fn place_chip(
    cell: &GridCell,
    signal: &CalendarSignal,
    grid: &GridConfig,
) -> Result<ChipPlacement, LayoutError> {
    if !signal.bias_x.is_finite() {
        return Err(LayoutError::NonFiniteInput {
            day: signal.day,
            field: "biasX",
        });
    }
    if !signal.bias_y.is_finite() {
        return Err(LayoutError::NonFiniteInput {
            day: signal.day,
            field: "biasY",
        });
    }

    let side = resolve_side(cell, signal);
    let grid_width = grid.grid_width();
    let raw_center_x = match side {
        Side::Left => grid.padding_x - grid.out,
        Side::Right => grid.padding_x + grid_width + grid.out,
        Side::Top => grid.padding_x + cell.col as f32 * grid.pitch() + grid.cell_size * 0.5,
    } + signal.bias_x;

    let min_x = grid.padding_x - grid.clamp_margin;
    let max_x = grid.padding_x + grid_width + grid.clamp_margin;
    let center_x = raw_center_x.max(min_x).min(max_x);

    let base_y = match side {
        Side::Top => grid.top_offset,
        Side::Left | Side::Right => cell.anchor.y,
    };
    let center_y = base_y + signal.bias_y;

    let transform = match side {
        Side::Left => grid.left_transform,
        Side::Right => grid.right_transform,
        Side::Top => grid.top_transform,
    };

    Ok(ChipPlacement {
        center: Point::new(center_x, center_y),
        raw_center_x,
        side,
        transform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::grid::resolve_cell;

    fn place(day: i32, signal: CalendarSignal, grid: &GridConfig) -> ChipPlacement {
        let cell = resolve_cell(day, grid).expect("in range");
        place_chip(&cell, &signal, grid).expect("finite bias")
    }

    #[test]
    fn default_side_follows_row_and_column() {
        let grid = GridConfig::track();
        let top = resolve_cell(3, &grid).expect("in range");
        assert_eq!(default_side(&top), Side::Top);
        // day 14: offset 13 -> row 1, col 6
        let right = resolve_cell(14, &grid).expect("in range");
        assert_eq!((right.row, right.col), (1, 6));
        assert_eq!(default_side(&right), Side::Right);
        // day 10: offset 9 -> row 1, col 2
        let left = resolve_cell(10, &grid).expect("in range");
        assert_eq!((left.row, left.col), (1, 2));
        assert_eq!(default_side(&left), Side::Left);
        // col 4 is the first column of the right half
        let boundary = resolve_cell(12, &grid).expect("in range");
        assert_eq!(boundary.col, 4);
        assert_eq!(default_side(&boundary), Side::Right);
    }

    #[test]
    fn explicit_side_wins_over_default() {
        let grid = GridConfig::track();
        let placement = place(3, CalendarSignal::new(3, "Hulu", "$14.99").with_side(Side::Left), &grid);
        assert_eq!(placement.side, Side::Left);
    }

    #[test]
    fn right_chip_is_clamped_to_panel() {
        let grid = GridConfig::track();
        let placement = place(16, CalendarSignal::new(16, "Spotify", "$9.99").with_side(Side::Right), &grid);
        assert_eq!(placement.raw_center_x, 368.0);
        assert_eq!(placement.center, Point::new(346.0, 106.0));
        assert!(placement.was_clamped());
        assert_eq!(placement.anchor_css(), "translate(-30%,-50%)");
    }

    #[test]
    fn left_chip_sits_left_of_grid() {
        let grid = GridConfig::track();
        let placement = place(
            16,
            CalendarSignal::new(16, "Spotify", "$9.99")
                .with_side(Side::Left)
                .with_bias(0.0, -12.0),
            &grid,
        );
        assert_eq!(placement.raw_center_x, -12.0);
        assert_eq!(placement.center, Point::new(10.0, 94.0));
        assert_eq!(placement.anchor_css(), "translate(-70%,-50%)");
    }

    #[test]
    fn top_chip_floats_over_its_column() {
        let grid = GridConfig::track();
        let placement = place(5, CalendarSignal::new(5, "Netflix", "$19.99").with_bias(0.0, 2.0), &grid);
        assert_eq!(placement.side, Side::Top);
        // col 4 centre: 28 + 4 * 44 + 18
        assert_eq!(placement.center, Point::new(222.0, 10.0));
        assert!(!placement.was_clamped());
        assert_eq!(placement.anchor_css(), "translate(-50%,-100%)");
    }

    #[test]
    fn extreme_bias_stays_within_clamp_bounds() {
        let grid = GridConfig::track();
        let min_x = grid.padding_x - 18.0;
        let max_x = grid.padding_x + grid.grid_width() + 18.0;
        for day in 1..=28 {
            for bias in [-10000.0, -250.0, 0.0, 250.0, 10000.0] {
                for side in [Side::Left, Side::Right, Side::Top] {
                    let signal = CalendarSignal::new(day, "x", "$1")
                        .with_side(side)
                        .with_bias(bias, 0.0);
                    let placement = place(day, signal, &grid);
                    assert!(
                        placement.center.x >= min_x && placement.center.x <= max_x,
                        "day {day} bias {bias} side {side:?} gave {}",
                        placement.center.x
                    );
                }
            }
        }
    }

    #[test]
    fn non_finite_bias_is_rejected() {
        let grid = GridConfig::track();
        let cell = resolve_cell(9, &grid).expect("in range");
        let signal = CalendarSignal::new(9, "x", "$1").with_bias(f32::NAN, 0.0);
        assert_eq!(
            place_chip(&cell, &signal, &grid),
            Err(LayoutError::NonFiniteInput {
                day: 9,
                field: "biasX"
            })
        );
        let signal = CalendarSignal::new(9, "x", "$1").with_bias(0.0, f32::INFINITY);
        assert!(place_chip(&cell, &signal, &grid).is_err());
    }
}
