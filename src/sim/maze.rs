//! Maze generation by randomized depth-first search
//!
//! A maze is stored as two passage matrices:
//! - `horizontals[i][j]`: the wall between row `i` and row `i + 1` at column `j` is open
//! - `verticals[i][j]`: the wall between column `j` and column `j + 1` at row `i` is open
//!
//! The open passages always form a spanning tree of the grid.

use std::collections::VecDeque;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Neighbor direction from a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Candidate order before shuffling
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The neighbor of `cell` in this direction, or `None` past the grid edge
    pub fn step(self, cell: Cell, rows: usize, cols: usize) -> Option<Cell> {
        let next = match self {
            Direction::Up => Cell::new(cell.row.checked_sub(1)?, cell.col),
            Direction::Right => Cell::new(cell.row, cell.col + 1),
            Direction::Down => Cell::new(cell.row + 1, cell.col),
            Direction::Left => Cell::new(cell.row, cell.col.checked_sub(1)?),
        };
        (next.row < rows && next.col < cols).then_some(next)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Direction from `from` to an orthogonally adjacent `to`
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        match (
            to.row as isize - from.row as isize,
            to.col as isize - from.col as isize,
        ) {
            (-1, 0) => Some(Direction::Up),
            (0, 1) => Some(Direction::Right),
            (1, 0) => Some(Direction::Down),
            (0, -1) => Some(Direction::Left),
            _ => None,
        }
    }
}

/// Shuffle in place with Fisher-Yates (unbiased for any uniform RNG)
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// A generated maze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    pub rows: usize,
    pub cols: usize,
    /// Cell the traversal started from
    pub start: Cell,
    /// (rows - 1) x cols, true = open
    pub horizontals: Vec<Vec<bool>>,
    /// rows x (cols - 1), true = open
    pub verticals: Vec<Vec<bool>>,
}

/// One suspended visit of the depth-first traversal
struct Frame {
    cell: Cell,
    order: [Direction; 4],
    next: usize,
}

/// Generate a maze starting from a uniformly random cell
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Maze, ConfigError> {
    check_grid(rows, cols)?;
    let start_row = rng.random_range(0..rows);
    let start_col = rng.random_range(0..cols);
    generate_from(rows, cols, Cell::new(start_row, start_col), rng)
}

/// Generate a maze whose traversal starts at `start`
///
/// Equivalent to the recursive backtracker (mark the cell, shuffle its four
/// neighbors, open the passage to and descend into each unvisited one), but
/// keeps its frames on the heap so depth `rows * cols` is fine.
pub fn generate_from<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    start: Cell,
    rng: &mut R,
) -> Result<Maze, ConfigError> {
    check_grid(rows, cols)?;
    if start.row >= rows || start.col >= cols {
        return Err(ConfigError::StartOutOfBounds {
            row: start.row,
            col: start.col,
            rows,
            cols,
        });
    }

    let mut maze = Maze::closed(rows, cols, start);
    let mut visited = vec![vec![false; cols]; rows];
    let mut stack: Vec<Frame> = Vec::with_capacity(maze.cell_count());

    if let Some(frame) = visit(start, &mut visited, rng) {
        stack.push(frame);
    }

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.order.len() {
            stack.pop();
            continue;
        }
        let direction = frame.order[frame.next];
        frame.next += 1;
        let cell = frame.cell;

        let Some(next) = direction.step(cell, rows, cols) else {
            continue;
        };
        if visited[next.row][next.col] {
            continue;
        }

        maze.open(cell, direction);
        if let Some(frame) = visit(next, &mut visited, rng) {
            stack.push(frame);
        }
    }

    log::debug!(
        "Generated {}x{} maze from ({}, {}) with {} passages",
        rows,
        cols,
        start.row,
        start.col,
        maze.open_passage_count()
    );

    Ok(maze)
}

fn check_grid(rows: usize, cols: usize) -> Result<(), ConfigError> {
    if rows == 0 || cols == 0 {
        Err(ConfigError::EmptyGrid { rows, cols })
    } else {
        Ok(())
    }
}

/// Enter a cell: `None` if it was already visited
fn visit<R: Rng + ?Sized>(cell: Cell, visited: &mut [Vec<bool>], rng: &mut R) -> Option<Frame> {
    if visited[cell.row][cell.col] {
        return None;
    }
    visited[cell.row][cell.col] = true;

    let mut order = Direction::ALL;
    shuffle(&mut order, rng);
    Some(Frame {
        cell,
        order,
        next: 0,
    })
}

impl Maze {
    /// A maze with every wall in place
    pub fn closed(rows: usize, cols: usize, start: Cell) -> Self {
        Self {
            rows,
            cols,
            start,
            horizontals: vec![vec![false; cols]; rows.saturating_sub(1)],
            verticals: vec![vec![false; cols.saturating_sub(1)]; rows],
        }
    }

    /// Open the wall on the `direction` side of `cell`
    ///
    /// The neighbor must be inside the grid.
    pub fn open(&mut self, cell: Cell, direction: Direction) {
        match direction {
            Direction::Left => self.verticals[cell.row][cell.col - 1] = true,
            Direction::Right => self.verticals[cell.row][cell.col] = true,
            Direction::Up => self.horizontals[cell.row - 1][cell.col] = true,
            Direction::Down => self.horizontals[cell.row][cell.col] = true,
        }
    }

    /// Whether the wall on the `direction` side of `cell` is open
    pub fn is_open(&self, cell: Cell, direction: Direction) -> bool {
        if direction.step(cell, self.rows, self.cols).is_none() {
            return false;
        }
        match direction {
            Direction::Left => self.verticals[cell.row][cell.col - 1],
            Direction::Right => self.verticals[cell.row][cell.col],
            Direction::Up => self.horizontals[cell.row - 1][cell.col],
            Direction::Down => self.horizontals[cell.row][cell.col],
        }
    }

    /// Neighbors reachable from `cell` through an open passage
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            if self.is_open(cell, direction) {
                direction.step(cell, self.rows, self.cols)
            } else {
                None
            }
        })
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Top-left cell, where the ball starts
    pub fn first_cell(&self) -> Cell {
        Cell::new(0, 0)
    }

    /// Bottom-right cell, where the goal sits
    pub fn last_cell(&self) -> Cell {
        Cell::new(self.rows - 1, self.cols - 1)
    }

    pub fn open_passage_count(&self) -> usize {
        count(&self.horizontals, true) + count(&self.verticals, true)
    }

    pub fn closed_horizontal_count(&self) -> usize {
        count(&self.horizontals, false)
    }

    pub fn closed_vertical_count(&self) -> usize {
        count(&self.verticals, false)
    }

    /// Breadth-first distance from `from` to every cell (`None` if unreachable)
    pub fn distances_from(&self, from: Cell) -> Vec<Vec<Option<usize>>> {
        let mut distances = vec![vec![None; self.cols]; self.rows];
        distances[from.row][from.col] = Some(0);
        let mut queue = VecDeque::from([from]);

        while let Some(cell) = queue.pop_front() {
            let distance = distances[cell.row][cell.col].unwrap_or(0);
            for next in self.open_neighbors(cell) {
                if distances[next.row][next.col].is_none() {
                    distances[next.row][next.col] = Some(distance + 1);
                    queue.push_back(next);
                }
            }
        }

        distances
    }

    /// Cell with the greatest walking distance from `from` (first in row order on ties)
    pub fn farthest_cell_from(&self, from: Cell) -> Cell {
        let distances = self.distances_from(from);
        let mut best = from;
        let mut best_distance = 0;
        for (row, line) in distances.iter().enumerate() {
            for (col, distance) in line.iter().enumerate() {
                if let Some(distance) = *distance {
                    if distance > best_distance {
                        best = Cell::new(row, col);
                        best_distance = distance;
                    }
                }
            }
        }
        best
    }

    /// Shortest walk from `from` to `to`, both ends included
    pub fn path(&self, from: Cell, to: Cell) -> Option<Vec<Cell>> {
        let mut parents: Vec<Vec<Option<Cell>>> = vec![vec![None; self.cols]; self.rows];
        let mut seen = vec![vec![false; self.cols]; self.rows];
        seen[from.row][from.col] = true;
        let mut queue = VecDeque::from([from]);

        while let Some(cell) = queue.pop_front() {
            if cell == to {
                let mut path = vec![to];
                let mut current = to;
                while let Some(parent) = parents[current.row][current.col] {
                    path.push(parent);
                    current = parent;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.open_neighbors(cell) {
                if !seen[next.row][next.col] {
                    seen[next.row][next.col] = true;
                    parents[next.row][next.col] = Some(cell);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

fn count(matrix: &[Vec<bool>], value: bool) -> usize {
    matrix
        .iter()
        .map(|row| row.iter().filter(|&&open| open == value).count())
        .sum()
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+")?;
        for _ in 0..self.cols {
            write!(f, "---+")?;
        }
        writeln!(f)?;

        for row in 0..self.rows {
            write!(f, "|")?;
            for col in 0..self.cols {
                let cell = Cell::new(row, col);
                let mark = if cell == self.first_cell() {
                    " o "
                } else if cell == self.last_cell() {
                    " G "
                } else {
                    "   "
                };
                let side = if self.is_open(cell, Direction::Right) { " " } else { "|" };
                write!(f, "{mark}{side}")?;
            }
            writeln!(f)?;

            write!(f, "+")?;
            for col in 0..self.cols {
                let floor = if self.is_open(Cell::new(row, col), Direction::Down) {
                    "   "
                } else {
                    "---"
                };
                write!(f, "{floor}+")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
