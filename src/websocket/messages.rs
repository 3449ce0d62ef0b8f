use serde::{Deserialize, Serialize};

use crate::models::Grid;
use crate::rooms::Seat;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    NewGame,
    JoinGame { room_code: String },
    SubmitWord { word: String },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    RoomCreated {
        room_code: String,
    },
    Seated {
        player: Seat,
    },
    RoundStarted {
        grid: Grid,
        total_score: u32,
        seconds_remaining: u32,
    },
    Clock {
        seconds_remaining: u32,
    },
    WordAccepted {
        player: Seat,
        word: String,
        score: u32,
        scores: RoundScores,
        next_turn: Seat,
    },
    WordRejected {
        reason: String,
    },
    RoundOver {
        scores: RoundScores,
    },
    OpponentLeft,
    UnknownRoom,
    RoomFull,
    Error {
        message: String,
    },
}

/// Running scores for both seats of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScores {
    pub player_one: u32,
    pub player_two: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_use_snake_case_tags() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join_game","room_code":"ABC234"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinGame { room_code } if room_code == "ABC234"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"new_game"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::NewGame));
    }

    #[test]
    fn test_server_message_wire_shape() {
        let json = serde_json::to_string(&ServerMessage::Clock {
            seconds_remaining: 59,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"clock","seconds_remaining":59}"#);
    }
}
