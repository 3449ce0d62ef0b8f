use std::collections::BTreeSet;
use thiserror::Error;

use crate::dictionary::Trie;
use crate::models::Grid;

/// Words shorter than this are never recorded, even when the dictionary
/// contains them. A gameplay rule, not an index limitation.
pub const MIN_WORD_LENGTH: usize = 3;

/// Contract violations detected before any search begins
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("grid has no rows")]
    EmptyGrid,
    #[error("grid is not square: row {row} has {found} tiles, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },
}

pub struct Solver;

impl Solver {
    /// Enumerate every dictionary word spellable on the grid by a path of
    /// 8-adjacent cells that visits no cell twice. One backtracking
    /// enumeration per root cell, each with its own visited matrix; results
    /// are merged into a single deduplicated set.
    pub fn solve(grid: &Grid, index: &Trie) -> Result<BTreeSet<String>, BoardError> {
        let size = Self::check_square(grid)?;

        let mut words = BTreeSet::new();
        for row in 0..size {
            for col in 0..size {
                let mut visited = vec![vec![false; size]; size];
                let mut path = String::from(grid[row][col].token());
                Self::extend(grid, index, row, col, &mut path, &mut visited, &mut words);
            }
        }

        Ok(words)
    }

    /// Fail fast on a malformed grid rather than search it
    fn check_square(grid: &Grid) -> Result<usize, BoardError> {
        if grid.is_empty() {
            return Err(BoardError::EmptyGrid);
        }

        let size = grid.len();
        for (row, tiles) in grid.iter().enumerate() {
            if tiles.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    found: tiles.len(),
                    expected: size,
                });
            }
        }

        Ok(size)
    }

    /// Grow the path rooted at `(row, col)`. `path` already ends with this
    /// cell's token; the cell is unmarked again before returning so sibling
    /// branches and other root cells can reuse it.
    fn extend(
        grid: &Grid,
        index: &Trie,
        row: usize,
        col: usize,
        path: &mut String,
        visited: &mut [Vec<bool>],
        words: &mut BTreeSet<String>,
    ) {
        visited[row][col] = true;

        if path.len() >= MIN_WORD_LENGTH && index.contains_word(path) {
            words.insert(path.clone());
        }

        for (nrow, ncol) in Self::neighbors(row, col, grid.len()) {
            if visited[nrow][ncol] {
                continue;
            }

            let len_before = path.len();
            path.push_str(grid[nrow][ncol].token());

            // only descend while the path is still a prefix of some word
            if index.contains_prefix(path) {
                Self::extend(grid, index, nrow, ncol, path, visited, words);
            }

            path.truncate(len_before);
        }

        visited[row][col] = false;
    }

    /// The up to 8 in-bounds neighbors of a cell (orthogonal + diagonal)
    fn neighbors(row: usize, col: usize, size: usize) -> impl Iterator<Item = (usize, usize)> {
        const OFFSETS: [(i32, i32); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];

        OFFSETS.iter().filter_map(move |&(drow, dcol)| {
            let nrow = row as i32 + drow;
            let ncol = col as i32 + dcol;
            (nrow >= 0 && ncol >= 0 && (nrow as usize) < size && (ncol as usize) < size)
                .then(|| (nrow as usize, ncol as usize))
        })
    }
}
