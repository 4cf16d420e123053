//! Logical maze structs and the perfect-maze generator.

use crate::util::shuffle;
use anyhow::{bail, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enum for direction values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Direction {
    /// Towards the previous row
    Up = 0,
    /// Towards the next row
    Down = 1,
    /// Towards the previous column
    Left = 2,
    /// Towards the next column
    Right = 3,
}

impl Direction {
    /// All four directions, in a fixed order (callers shuffle as needed)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction in screen coordinates (y axis down)
    pub fn vector(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// A perfect maze over a `rows` x `cols` grid of cells.
///
/// The maze is stored as two wall matrices: `vertical_open[r][c]` is true when
/// the wall between cells `(r, c)` and `(r, c + 1)` has been removed, and
/// `horizontal_open[r][c]` when the wall between `(r, c)` and `(r + 1, c)`
/// has. A generated maze is a spanning tree of the cell grid: exactly
/// `rows * cols - 1` edges are open and every cell is reachable from every
/// other by exactly one path. The matrices are never mutated after
/// generation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Maze {
    rows: usize,
    cols: usize,
    /// rows x (cols - 1)
    vertical_open: Vec<Vec<bool>>,
    /// (rows - 1) x cols
    horizontal_open: Vec<Vec<bool>>,
}

/// One in-progress cell of the depth-first traversal: the shuffled neighbor
/// order and how far through it we are.
struct Frame {
    row: usize,
    col: usize,
    dirs: [Direction; 4],
    next: usize,
}

impl Maze {
    /// Generate a perfect maze with randomized depth-first traversal.
    ///
    /// The traversal starts at a random cell and repeatedly carves a passage
    /// into a random unvisited neighbor, backtracking when none remain. The
    /// stack is explicit, so recursion depth never limits the grid size.
    /// Passing a seeded rng reproduces the same maze.
    ///
    /// Non-positive dimensions are refused.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use mazeball::maze::Maze;
    ///
    /// let maze = Maze::generate(4, 6, &mut StdRng::seed_from_u64(1)).unwrap();
    /// assert_eq!(maze.open_edge_count(), 4 * 6 - 1);
    /// ```
    pub fn generate<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Result<Self> {
        if rows == 0 || cols == 0 {
            bail!("invalid maze dimensions: {rows}x{cols}");
        }

        let mut visited = vec![vec![false; cols]; rows];
        let mut vertical_open = vec![vec![false; cols - 1]; rows];
        let mut horizontal_open = vec![vec![false; cols]; rows - 1];

        let start_row = rng.gen_range(0..rows);
        let start_col = rng.gen_range(0..cols);
        visited[start_row][start_col] = true;

        let mut stack = Vec::with_capacity(rows * cols);
        stack.push(Frame {
            row: start_row,
            col: start_col,
            dirs: shuffled_directions(rng),
            next: 0,
        });

        while !stack.is_empty() {
            let top = stack.len() - 1;
            let (row, col) = (stack[top].row, stack[top].col);
            let mut descended = false;

            while stack[top].next < stack[top].dirs.len() {
                let dir = stack[top].dirs[stack[top].next];
                stack[top].next += 1;

                let Some((nr, nc)) = neighbor(rows, cols, row, col, dir) else {
                    continue;
                };
                if visited[nr][nc] {
                    continue;
                }

                match dir {
                    Direction::Up => horizontal_open[row - 1][col] = true,
                    Direction::Down => horizontal_open[row][col] = true,
                    Direction::Left => vertical_open[row][col - 1] = true,
                    Direction::Right => vertical_open[row][col] = true,
                }

                visited[nr][nc] = true;
                stack.push(Frame {
                    row: nr,
                    col: nc,
                    dirs: shuffled_directions(rng),
                    next: 0,
                });
                descended = true;
                break;
            }

            if !descended {
                stack.pop();
            }
        }

        Ok(Self {
            rows,
            cols,
            vertical_open,
            horizontal_open,
        })
    }

    /// A maze of the given dimensions with every wall in place (not a valid
    /// perfect maze; degenerate input for mapper tests).
    #[cfg(test)]
    pub(crate) fn fully_closed(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1 && cols >= 1);
        Self {
            rows,
            cols,
            vertical_open: vec![vec![false; cols - 1]; rows],
            horizontal_open: vec![vec![false; cols]; rows - 1],
        }
    }

    /// Number of cell rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the wall between `(row, col)` and `(row, col + 1)` is open
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `col >= cols - 1`.
    pub fn passage_right(&self, row: usize, col: usize) -> bool {
        self.vertical_open[row][col]
    }

    /// Whether the wall between `(row, col)` and `(row + 1, col)` is open
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows - 1` or `col >= cols`.
    pub fn passage_down(&self, row: usize, col: usize) -> bool {
        self.horizontal_open[row][col]
    }

    /// Total number of open edges; `rows * cols - 1` for a generated maze
    pub fn open_edge_count(&self) -> usize {
        let vertical = self
            .vertical_open
            .iter()
            .flatten()
            .filter(|open| **open)
            .count();
        let horizontal = self
            .horizontal_open
            .iter()
            .flatten()
            .filter(|open| **open)
            .count();
        vertical + horizontal
    }

    /// The open-edge neighbors of a cell, for walking the maze graph
    pub fn open_neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut neighbors = vec![];
        if col + 1 < self.cols && self.passage_right(row, col) {
            neighbors.push((row, col + 1));
        }
        if col > 0 && self.passage_right(row, col - 1) {
            neighbors.push((row, col - 1));
        }
        if row + 1 < self.rows && self.passage_down(row, col) {
            neighbors.push((row + 1, col));
        }
        if row > 0 && self.passage_down(row - 1, col) {
            neighbors.push((row - 1, col));
        }
        neighbors
    }
}

fn shuffled_directions<R: Rng>(rng: &mut R) -> [Direction; 4] {
    let mut dirs = Direction::ALL;
    shuffle(&mut dirs, rng);
    dirs
}

fn neighbor(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    dir: Direction,
) -> Option<(usize, usize)> {
    match dir {
        Direction::Up => (row > 0).then(|| (row - 1, col)),
        Direction::Down => (row + 1 < rows).then(|| (row + 1, col)),
        Direction::Left => (col > 0).then(|| (row, col - 1)),
        Direction::Right => (col + 1 < cols).then(|| (row, col + 1)),
    }
}

impl fmt::Display for Maze {
    /// Draws the maze as an ASCII grid, one `+---+` box per cell with open
    /// walls left blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.cols {
            write!(f, "+---")?;
        }
        writeln!(f, "+")?;

        for row in 0..self.rows {
            write!(f, "|")?;
            for col in 0..self.cols {
                let east = if col + 1 < self.cols && self.passage_right(row, col) {
                    ' '
                } else {
                    '|'
                };
                write!(f, "   {east}")?;
            }
            writeln!(f)?;

            for col in 0..self.cols {
                let south = if row + 1 < self.rows && self.passage_down(row, col) {
                    "   "
                } else {
                    "---"
                };
                write!(f, "+{south}")?;
            }
            writeln!(f, "+")?;
        }
        Ok(())
    }
}
