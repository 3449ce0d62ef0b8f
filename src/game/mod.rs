// Game engine modules

pub mod dice;
pub mod scorer;
pub mod solver;

pub use dice::BoardTemplate;
pub use scorer::Scorer;
pub use solver::{BoardError, Solver};

use rand::Rng;

use crate::dictionary::Trie;
use crate::models::SolvedBoard;

/// Roll a fresh board from `template` using `rng`, solve it against the
/// dictionary, and return the round's ground truth. Runs synchronously,
/// before any player interaction begins; the same rng sequence and template
/// always produce the same artifact.
pub fn generate_and_solve(
    rng: &mut impl Rng,
    template: &BoardTemplate,
    index: &Trie,
) -> Result<SolvedBoard, BoardError> {
    let grid = template.roll(rng);
    let words = Solver::solve(&grid, index)?;
    let total_score = Scorer::total_score(&words);

    Ok(SolvedBoard {
        grid,
        words,
        total_score,
    })
}
