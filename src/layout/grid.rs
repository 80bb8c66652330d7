use super::error::LayoutError;
use super::types::{GridCell, Point};
use crate::config::{COLUMNS, GridConfig};

/// Maps an offset from the first displayed day onto the grid. Defined for
/// every offset; negative offsets wrap into columns 0..=6 on negative rows.
pub fn cell_for_offset(day: i32, offset: i32, grid: &GridConfig) -> GridCell {
    let col = ((offset % COLUMNS) + COLUMNS) % COLUMNS;
    let row = offset.div_euclid(COLUMNS);
    let pitch = grid.pitch();
    let x = grid.padding_x + col as f32 * pitch;
    let y = row as f32 * pitch;
    GridCell {
        day,
        row,
        col,
        x,
        y,
        size: grid.cell_size,
        anchor: Point::new(
            x + grid.cell_size * grid.anchor_x_fraction,
            y + grid.cell_size * grid.anchor_y_fraction,
        ),
    }
}

pub fn resolve_cell(day: i32, grid: &GridConfig) -> Result<GridCell, LayoutError> {
    let first = grid.first_displayed_day;
    let last = grid.last_displayed_day();
    if day < first || day > last {
        return Err(LayoutError::DayOutOfRange { day, first, last });
    }
    Ok(cell_for_offset(day, day - first, grid))
}

/// Every displayed day in order.
pub fn displayed_days(grid: &GridConfig) -> impl Iterator<Item = i32> {
    grid.first_displayed_day..=grid.last_displayed_day()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_twelve_from_seven_is_first_row_col_five() {
        let grid = GridConfig {
            first_displayed_day: 7,
            ..GridConfig::hero()
        };
        let cell = resolve_cell(12, &grid).expect("in range");
        assert_eq!((cell.col, cell.row), (5, 0));
    }

    #[test]
    fn day_one_from_one_is_origin() {
        let cell = resolve_cell(1, &GridConfig::track()).expect("in range");
        assert_eq!((cell.col, cell.row), (0, 0));
        assert_eq!(cell.x, 28.0);
        assert_eq!(cell.y, 0.0);
    }

    #[test]
    fn negative_offsets_never_produce_negative_columns() {
        let grid = GridConfig::track();
        for offset in -30..0 {
            let cell = cell_for_offset(0, offset, &grid);
            assert!((0..7).contains(&cell.col), "offset {offset} gave col {}", cell.col);
            assert!(cell.row < 0);
        }
        let cell = cell_for_offset(0, -1, &grid);
        assert_eq!((cell.col, cell.row), (6, -1));
        let cell = cell_for_offset(0, -7, &grid);
        assert_eq!((cell.col, cell.row), (0, -1));
        let cell = cell_for_offset(0, -8, &grid);
        assert_eq!((cell.col, cell.row), (6, -2));
    }

    #[test]
    fn anchor_sits_toward_upper_right_of_cell() {
        let cell = resolve_cell(16, &GridConfig::track()).expect("in range");
        assert_eq!((cell.col, cell.row), (1, 2));
        assert!((cell.anchor.x - 98.64).abs() < 1e-4);
        assert_eq!(cell.anchor.y, 106.0);
    }

    #[test]
    fn hero_anchor_uses_its_own_fractions() {
        let cell = resolve_cell(16, &GridConfig::hero()).expect("in range");
        // (16 - 7) = 9 -> col 2, row 1
        assert_eq!((cell.col, cell.row), (2, 1));
        assert!((cell.anchor.x - (28.0 + 2.0 * 28.0 + 24.0 * 0.78)).abs() < 1e-4);
        assert!((cell.anchor.y - (28.0 + 24.0 * 0.52)).abs() < 1e-4);
    }

    #[test]
    fn out_of_range_days_are_rejected() {
        let grid = GridConfig::track();
        assert_eq!(
            resolve_cell(0, &grid),
            Err(LayoutError::DayOutOfRange {
                day: 0,
                first: 1,
                last: 28
            })
        );
        assert!(resolve_cell(29, &grid).is_err());
        assert!(resolve_cell(6, &GridConfig::hero()).is_err());
        assert!(resolve_cell(28, &GridConfig::hero()).is_err());
    }

    #[test]
    fn displayed_days_cover_day_count() {
        let days: Vec<i32> = displayed_days(&GridConfig::hero()).collect();
        assert_eq!(days.len(), 21);
        assert_eq!(days.first(), Some(&7));
        assert_eq!(days.last(), Some(&27));
    }
}
