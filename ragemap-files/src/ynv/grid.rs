//! The fixed world grid that addresses map navmeshes.
//!
//! The world is covered by 100x100 cells of 150 units starting at
//! (-6000, -6000); each cell is further split into 3x3 sectors. The
//! serialized cell index is `y * 100 + x`. Standalone navmeshes use the
//! sentinel index 10000 and are not part of the grid.

use glam::Vec3;

pub const GRID_ORIGIN: Vec3 = Vec3::new(-6000.0, -6000.0, 0.0);
pub const GRID_DIM: u32 = 100;
pub const CELL_SIZE: f32 = 150.0;
pub const SECTORS_PER_CELL: u32 = 3;

/// Area id of a navmesh that is not addressed by the grid.
pub const STANDALONE_CELL: u16 = 10000;

/// Cell coordinates of a sector coordinate pair.
pub fn grid_cell_of(sector_x: u32, sector_y: u32) -> (u32, u32) {
    (sector_x / SECTORS_PER_CELL, sector_y / SECTORS_PER_CELL)
}

/// World-space footprint of a cell (z is unbounded and left at 0).
pub fn grid_cell_bounds(cell_x: u32, cell_y: u32) -> (Vec3, Vec3) {
    let min = GRID_ORIGIN + Vec3::new(cell_x as f32, cell_y as f32, 0.0) * CELL_SIZE;
    (min, min + Vec3::new(CELL_SIZE, CELL_SIZE, 0.0))
}

pub fn grid_cell_index(cell_x: u32, cell_y: u32) -> u32 {
    debug_assert!(cell_x < GRID_DIM && cell_y < GRID_DIM);
    cell_y * GRID_DIM + cell_x
}

/// Cell containing a world position, `None` outside the grid.
pub fn grid_cell_of_position(position: Vec3) -> Option<(u32, u32)> {
    let rel = (position - GRID_ORIGIN) / CELL_SIZE;
    if rel.x < 0.0 || rel.y < 0.0 {
        return None;
    }
    let (cell_x, cell_y) = (rel.x as u32, rel.y as u32);
    if cell_x >= GRID_DIM || cell_y >= GRID_DIM {
        return None;
    }
    Some((cell_x, cell_y))
}

/// The 4-connected neighbors, clipped to the grid.
pub fn grid_cell_neighbors(cell_x: u32, cell_y: u32) -> Vec<(u32, u32)> {
    let mut neighbors = Vec::with_capacity(4);
    if cell_x > 0 {
        neighbors.push((cell_x - 1, cell_y));
    }
    if cell_x + 1 < GRID_DIM {
        neighbors.push((cell_x + 1, cell_y));
    }
    if cell_y > 0 {
        neighbors.push((cell_x, cell_y - 1));
    }
    if cell_y + 1 < GRID_DIM {
        neighbors.push((cell_x, cell_y + 1));
    }
    neighbors
}
