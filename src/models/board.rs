use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Side length of the playable board
pub const BOARD_SIZE: usize = 4;

/// A single board cell. The "QU" tile occupies one cell but contributes two
/// symbols when matched against the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile {
    token: String,
}

impl Tile {
    /// Build a tile from a rolled die face. A `Q` face becomes the two-symbol
    /// "QU" tile; everything else is a single uppercase symbol.
    pub fn from_face(face: char) -> Self {
        let face = face.to_ascii_uppercase();
        let token = if face == 'Q' {
            "QU".to_string()
        } else {
            face.to_string()
        };
        Self { token }
    }

    /// The symbols this tile contributes to a path, in order
    pub fn token(&self) -> &str {
        &self.token
    }
}

pub type Grid = Vec<Vec<Tile>>;

/// Ground truth for one round: the generated grid, every word discoverable
/// on it, and the total achievable score. Cached by the room for the round's
/// lifetime and used to validate player submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedBoard {
    pub grid: Grid,
    pub words: BTreeSet<String>,
    pub total_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_face_becomes_qu_tile() {
        assert_eq!(Tile::from_face('Q').token(), "QU");
        assert_eq!(Tile::from_face('q').token(), "QU");
    }

    #[test]
    fn test_faces_are_folded_to_uppercase() {
        assert_eq!(Tile::from_face('a').token(), "A");
        assert_eq!(Tile::from_face('Z').token(), "Z");
    }

    #[test]
    fn test_tile_serializes_as_bare_token() {
        let tile = Tile::from_face('Q');
        assert_eq!(serde_json::to_string(&tile).unwrap(), "\"QU\"");
    }
}
