//! Neighbor Rule
//!
//! The Game of Life next-state function over a bounded grid.
//!
//! Neighbors outside the grid are not counted: edge cells see five neighbors,
//! corner cells three. Nothing wraps.

/// Split a linear index into `(x, y)` for a grid `cols` wide
///
/// # Panics
/// Panics if `cols` is zero.
pub fn coords(i: usize, cols: usize) -> (usize, usize) {
    (i % cols, i / cols)
}

/// The rule table: survive on 2 or 3 neighbors, birth on exactly 3
pub fn outcome(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Live cells among the up-to-8 in-range neighbors of cell `i`
///
/// `grid.len()` must be a multiple of `cols`, and `i < grid.len()`. A zero
/// width has no neighbors.
pub fn neighbor_count(grid: &[u8], i: usize, cols: usize) -> u8 {
    if cols == 0 {
        return 0;
    }
    debug_assert!(grid.len() % cols == 0);
    let rows = grid.len() / cols;
    let (x, y) = coords(i, cols);

    let west = x >= 1;
    let east = x + 1 < cols;
    let north = y >= 1;
    let south = y + 1 < rows;

    let alive = |j: usize| (grid[j] != 0) as u8;
    let mut count = 0;

    if north {
        let above = i - cols;
        if west {
            count += alive(above - 1);
        }
        count += alive(above);
        if east {
            count += alive(above + 1);
        }
    }

    if west {
        count += alive(i - 1);
    }
    if east {
        count += alive(i + 1);
    }

    if south {
        let below = i + cols;
        if west {
            count += alive(below - 1);
        }
        count += alive(below);
        if east {
            count += alive(below + 1);
        }
    }

    count
}

/// Next state of cell `i` in a grid `cols` wide
pub fn next_state(grid: &[u8], i: usize, cols: usize) -> bool {
    outcome(grid[i] != 0, neighbor_count(grid, i, cols))
}
