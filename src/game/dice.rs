use rand::Rng;

use crate::models::{Grid, Tile, BOARD_SIZE};

/// Faces per die
pub const DIE_FACES: usize = 6;
/// One die per board cell, in row-major order
pub const DICE_PER_BOARD: usize = BOARD_SIZE * BOARD_SIZE;

/// The sixteen six-sided dice a board is rolled from, one per cell in
/// row-major order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTemplate {
    pub dice: [&'static str; DICE_PER_BOARD],
}

/// The 1992 revision of the classic dice set
pub const BOGGLE_1992: BoardTemplate = BoardTemplate {
    dice: [
        "LRYTTE", "VTHRWE", "EGHWNE", "SEOTIS",
        "ANAEEG", "IDSYTT", "OATTOW", "MTOICU",
        "AFPKFS", "XLDERI", "HCPOAS", "ENSIEU",
        "YLDEVR", "ZNRNHL", "NMIQHU", "OBBAOJ",
    ],
};

/// The 1983 revision of the classic dice set
pub const BOGGLE_1983: BoardTemplate = BoardTemplate {
    dice: [
        "AACIOT", "ABILTY", "ABJMOQ", "ACDEMP",
        "ACELRS", "ADENVZ", "AHMORS", "BIFORX",
        "DENOSW", "DKNOTU", "EEFHIY", "EGINTV",
        "EGKLUY", "EHINPS", "ELPSTU", "GILRUW",
    ],
};

impl BoardTemplate {
    /// Pick one of the two classic dice sets for a new round
    pub fn pick_classic(rng: &mut impl Rng) -> &'static BoardTemplate {
        if rng.random_range(0..2) == 0 {
            &BOGGLE_1983
        } else {
            &BOGGLE_1992
        }
    }

    /// Roll every die once, producing a fresh immutable grid
    pub fn roll(&self, rng: &mut impl Rng) -> Grid {
        let mut grid = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE {
            let mut tiles = Vec::with_capacity(BOARD_SIZE);
            for col in 0..BOARD_SIZE {
                let die = self.dice[row * BOARD_SIZE + col];
                let face = die.as_bytes()[rng.random_range(0..die.len())] as char;
                tiles.push(Tile::from_face(face));
            }
            grid.push(tiles);
        }

        grid
    }
}
