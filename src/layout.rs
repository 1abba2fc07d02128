use crate::config::LayoutConfig;
use crate::coords::CellCoord;
use crate::scene::{Bounds, GridGeometry, ItemKind, LabelItem, Vec2};
use crate::theme::LabelTheme;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid grid cell dimensions ({cell_width} x {cell_height})")]
    InvalidGeometry { cell_width: f64, cell_height: f64 },
    #[error("scene too large for automatic labeling ({cells} cells, limit {max})")]
    CapacityExceeded { cells: u128, max: usize },
}

/// Labels covering one scene rectangle, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlan {
    pub bounds: Bounds,
    pub grid: GridGeometry,
    pub rows: usize,
    pub cols: usize,
    pub items: Vec<LabelItem>,
}

impl LabelPlan {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        row_major(self.rows, self.cols)
    }
}

/// Rows and columns needed to cover `bounds`. A rectangle that is empty along
/// either axis covers no cells at all, so both come back as zero.
pub fn grid_extent(bounds: &Bounds, grid: &GridGeometry) -> Result<(usize, usize), LayoutError> {
    if !grid.is_valid() {
        return Err(LayoutError::InvalidGeometry {
            cell_width: grid.cell_width,
            cell_height: grid.cell_height,
        });
    }
    // Float-to-int casts saturate, so negative or NaN extents come out as zero.
    let cols = (bounds.width / grid.cell_width).ceil() as usize;
    let rows = (bounds.height / grid.cell_height).ceil() as usize;
    if rows == 0 || cols == 0 {
        return Ok((0, 0));
    }
    Ok((rows, cols))
}

pub fn cell_center(bounds: &Bounds, grid: &GridGeometry, cell: CellCoord) -> Vec2 {
    Vec2::new(
        bounds.x + cell.col as f64 * grid.cell_width + grid.cell_width / 2.0,
        bounds.y + cell.row as f64 * grid.cell_height + grid.cell_height / 2.0,
    )
}

/// Plans one label per grid cell over `bounds`. Fails without producing
/// anything when the geometry is unusable or the cell count is above
/// `config.max_labels`.
pub fn plan_labels(
    bounds: &Bounds,
    grid: &GridGeometry,
    theme: &LabelTheme,
    config: &LayoutConfig,
) -> Result<LabelPlan, LayoutError> {
    let (rows, cols) = grid_extent(bounds, grid)?;
    let cells = rows as u128 * cols as u128;
    if cells > config.max_labels as u128 {
        return Err(LayoutError::CapacityExceeded {
            cells,
            max: config.max_labels,
        });
    }

    let namespace = config.namespace();
    let items = row_major(rows, cols)
        .map(|cell| LabelItem {
            id: namespace.encode(cell),
            kind: ItemKind::Text,
            text: theme.text(cell.name()),
            position: cell_center(bounds, grid, cell),
            layer: theme.layer,
            locked: theme.locked,
        })
        .collect();
    Ok(LabelPlan {
        bounds: *bounds,
        grid: *grid,
        rows,
        cols,
        items,
    })
}

fn row_major(rows: usize, cols: usize) -> impl Iterator<Item = CellCoord> {
    (0..rows).flat_map(move |row| (0..cols).map(move |col| CellCoord::new(row, col)))
}
