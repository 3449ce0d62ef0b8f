use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::game::Scorer;
use crate::models::SolvedBoard;
use crate::websocket::messages::{RoundScores, ServerMessage};
use crate::AppState;

/// Allowed characters for room codes - excludes I, O, 0, 1 for readability
pub const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Length of generated room codes
pub const ROOM_CODE_LENGTH: usize = 6;
/// How long a room may wait for an opponent before the sweeper removes it
pub const ROOM_WAITING_GRACE_PERIOD: Duration = Duration::from_secs(600);

/// One of the two player positions in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    fn from_index(index: usize) -> Seat {
        if index == 0 {
            Seat::One
        } else {
            Seat::Two
        }
    }
}

/// A connected player occupying one seat of a room
#[derive(Debug, Clone)]
pub struct RoomPlayer {
    pub connection_id: Uuid,
    pub tx: mpsc::Sender<ServerMessage>,
    pub score: u32,
}

impl RoomPlayer {
    pub fn new(connection_id: Uuid, tx: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            connection_id,
            tx,
            score: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// Host is seated, waiting for an opponent
    Waiting,
    /// Both seats filled, clock running
    Playing,
}

#[derive(Debug)]
struct RoomState {
    phase: RoomPhase,
    turn: Seat,
    seats: [Option<RoomPlayer>; 2],
    claimed: HashSet<String>,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("room is already full")]
    RoomFull,
}

/// Why a submitted word was refused. The rendered text is sent back to the
/// submitter only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WordRejection {
    #[error("the round has not started yet")]
    NotStarted,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("{0:?} cannot be formed on this board")]
    NotOnBoard(String),
    #[error("{0:?} was already played")]
    AlreadyClaimed(String),
}

/// Outcome of a validated submission, ready to broadcast
#[derive(Debug, Clone)]
pub struct AcceptedWord {
    pub player: Seat,
    pub word: String,
    pub score: u32,
    pub scores: RoundScores,
    pub next_turn: Seat,
}

/// One live round: the solved-board ground truth plus per-player
/// bookkeeping. Created when a host opens a room, torn down explicitly when
/// the round ends or a player disconnects.
#[derive(Debug)]
pub struct Room {
    pub code: String,
    pub round: SolvedBoard,
    pub created_at: Instant,
    state: Mutex<RoomState>,
}

impl Room {
    fn new(code: String, round: SolvedBoard, host: RoomPlayer) -> Self {
        Self {
            code,
            round,
            created_at: Instant::now(),
            state: Mutex::new(RoomState {
                phase: RoomPhase::Waiting,
                turn: Seat::One,
                seats: [Some(host), None],
                claimed: HashSet::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().unwrap()
    }

    /// Seat a second player and start the round. The host always has the
    /// first turn.
    pub fn join(&self, player: RoomPlayer) -> Result<Seat, JoinError> {
        let mut state = self.state();

        if state.phase != RoomPhase::Waiting || state.seats[1].is_some() {
            return Err(JoinError::RoomFull);
        }

        state.seats[1] = Some(player);
        state.phase = RoomPhase::Playing;
        Ok(Seat::Two)
    }

    /// Validate a submission against the round's ground truth. An accepted
    /// word scores by the fixed length table, passes the turn, and records
    /// the word so neither player can claim it again.
    pub fn apply_word(&self, seat: Seat, raw: &str) -> Result<AcceptedWord, WordRejection> {
        let word = raw.trim().to_ascii_uppercase();
        let mut state = self.state();

        if state.phase != RoomPhase::Playing {
            return Err(WordRejection::NotStarted);
        }
        if state.turn != seat {
            return Err(WordRejection::NotYourTurn);
        }
        if !self.round.words.contains(&word) {
            return Err(WordRejection::NotOnBoard(word));
        }
        if !state.claimed.insert(word.clone()) {
            return Err(WordRejection::AlreadyClaimed(word));
        }

        let score = Scorer::word_score(&word);
        if let Some(player) = state.seats[seat.index()].as_mut() {
            player.score += score;
        }
        state.turn = seat.other();

        Ok(AcceptedWord {
            player: seat,
            word,
            score,
            scores: scores_of(&state),
            next_turn: state.turn,
        })
    }

    /// Vacate the seat held by `connection_id`, if any
    pub fn leave(&self, connection_id: Uuid) -> Option<Seat> {
        let mut state = self.state();

        for (index, slot) in state.seats.iter_mut().enumerate() {
            if slot
                .as_ref()
                .is_some_and(|player| player.connection_id == connection_id)
            {
                *slot = None;
                return Some(Seat::from_index(index));
            }
        }

        None
    }

    pub fn phase(&self) -> RoomPhase {
        self.state().phase
    }

    pub fn scores(&self) -> RoundScores {
        scores_of(&self.state())
    }

    /// Send a message to every seated player. Sender handles are cloned out
    /// first so the state lock is never held across an await.
    pub async fn broadcast(&self, message: ServerMessage) {
        let senders: Vec<mpsc::Sender<ServerMessage>> = {
            let state = self.state();
            state
                .seats
                .iter()
                .flatten()
                .map(|player| player.tx.clone())
                .collect()
        };

        for tx in senders {
            let _ = tx.send(message.clone()).await;
        }
    }
}

fn scores_of(state: &RoomState) -> RoundScores {
    RoundScores {
        player_one: state.seats[0].as_ref().map_or(0, |p| p.score),
        player_two: state.seats[1].as_ref().map_or(0, |p| p.score),
    }
}

/// Owner of every live room, keyed by room code. Rooms are created
/// explicitly on round start and removed explicitly on round end,
/// disconnect, or sweep.
#[derive(Debug, Default)]
pub struct Rooms {
    rooms: DashMap<String, Arc<Room>>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a room for `host` around a freshly solved round
    pub fn create(&self, round: SolvedBoard, host: RoomPlayer) -> Arc<Room> {
        let code = loop {
            let candidate = generate_room_code();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let room = Arc::new(Room::new(code.clone(), round, host));
        self.rooms.insert(code, room.clone());
        room
    }

    pub fn get(&self, code: &str) -> Option<Arc<Room>> {
        self.rooms.get(code).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn remove(&self, code: &str) -> Option<Arc<Room>> {
        self.rooms.remove(code).map(|(_, room)| room)
    }

    /// Remove rooms that never left the waiting phase within the grace
    /// period. Returns the removed codes for logging.
    pub fn sweep_stale(&self, now: Instant) -> Vec<String> {
        let stale: Vec<String> = self
            .rooms
            .iter()
            .filter(|entry| {
                entry.phase() == RoomPhase::Waiting
                    && now.duration_since(entry.created_at) > ROOM_WAITING_GRACE_PERIOD
            })
            .map(|entry| entry.key().clone())
            .collect();

        for code in &stale {
            self.rooms.remove(code);
        }

        stale
    }
}

/// Generate a short, readable room code (6 alphanumeric characters)
fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ROOM_CODE_CHARSET.len());
            ROOM_CODE_CHARSET[idx] as char
        })
        .collect()
}

/// 1 Hz countdown for one round. Broadcasts the remaining time every second
/// and the final scores when the round duration expires, then removes the
/// room. Exits quietly if the room was already torn down elsewhere.
pub async fn run_round_clock(state: Arc<AppState>, room: Arc<Room>) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut remaining = state.config.game.round_seconds;

    loop {
        interval.tick().await;

        if !state.rooms.contains(&room.code) {
            return;
        }

        if remaining == 0 {
            let scores = room.scores();
            tracing::info!(
                "Round over in room {}: {} - {}",
                room.code,
                scores.player_one,
                scores.player_two
            );
            room.broadcast(ServerMessage::RoundOver { scores }).await;
            state.rooms.remove(&room.code);
            return;
        }

        room.broadcast(ServerMessage::Clock {
            seconds_remaining: remaining,
        })
        .await;
        remaining -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tile;
    use std::collections::BTreeSet;

    fn sample_round() -> SolvedBoard {
        let words: BTreeSet<String> = ["CAT", "CATS", "HOUSE", "DOG"]
            .into_iter()
            .map(String::from)
            .collect();
        SolvedBoard {
            grid: vec![vec![Tile::from_face('C'), Tile::from_face('A')]],
            total_score: Scorer::total_score(&words),
            words,
        }
    }

    fn test_player() -> (RoomPlayer, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(8);
        (RoomPlayer::new(Uuid::new_v4(), tx), rx)
    }

    fn playing_room() -> Arc<Room> {
        let rooms = Rooms::new();
        let (host, _host_rx) = test_player();
        let room = rooms.create(sample_round(), host);
        let (guest, _guest_rx) = test_player();
        room.join(guest).unwrap();
        room
    }

    #[test]
    fn test_generate_room_code_shape() {
        for _ in 0..100 {
            let code = generate_room_code();
            assert_eq!(code.len(), ROOM_CODE_LENGTH);
            assert!(code.bytes().all(|b| ROOM_CODE_CHARSET.contains(&b)));
        }
    }

    #[test]
    fn test_room_starts_waiting_and_join_starts_round() {
        let rooms = Rooms::new();
        let (host, _rx) = test_player();
        let room = rooms.create(sample_round(), host);

        assert_eq!(room.phase(), RoomPhase::Waiting);
        assert!(rooms.contains(&room.code));

        let (guest, _rx) = test_player();
        assert_eq!(room.join(guest).unwrap(), Seat::Two);
        assert_eq!(room.phase(), RoomPhase::Playing);
    }

    #[test]
    fn test_third_player_is_refused() {
        let room = playing_room();
        let (late, _rx) = test_player();
        assert_eq!(room.join(late).unwrap_err(), JoinError::RoomFull);
    }

    #[test]
    fn test_words_are_rejected_before_the_round_starts() {
        let rooms = Rooms::new();
        let (host, _rx) = test_player();
        let room = rooms.create(sample_round(), host);

        assert_eq!(
            room.apply_word(Seat::One, "CAT").unwrap_err(),
            WordRejection::NotStarted
        );
    }

    #[test]
    fn test_accepted_word_scores_and_passes_the_turn() {
        let room = playing_room();

        let accepted = room.apply_word(Seat::One, "house").unwrap();
        assert_eq!(accepted.word, "HOUSE");
        assert_eq!(accepted.score, 2);
        assert_eq!(accepted.next_turn, Seat::Two);
        assert_eq!(
            accepted.scores,
            RoundScores {
                player_one: 2,
                player_two: 0,
            }
        );

        let accepted = room.apply_word(Seat::Two, "CAT").unwrap();
        assert_eq!(accepted.score, 1);
        assert_eq!(
            accepted.scores,
            RoundScores {
                player_one: 2,
                player_two: 1,
            }
        );
    }

    #[test]
    fn test_out_of_turn_submission_is_refused() {
        let room = playing_room();

        assert_eq!(
            room.apply_word(Seat::Two, "CAT").unwrap_err(),
            WordRejection::NotYourTurn
        );
        // a refusal leaves the turn where it was
        assert!(room.apply_word(Seat::One, "CAT").is_ok());
    }

    #[test]
    fn test_word_not_on_board_is_refused() {
        let room = playing_room();

        assert_eq!(
            room.apply_word(Seat::One, "PLANET").unwrap_err(),
            WordRejection::NotOnBoard("PLANET".to_string())
        );
    }

    #[test]
    fn test_claimed_word_cannot_be_replayed() {
        let room = playing_room();

        room.apply_word(Seat::One, "CAT").unwrap();
        assert_eq!(
            room.apply_word(Seat::Two, "CAT").unwrap_err(),
            WordRejection::AlreadyClaimed("CAT".to_string())
        );
    }

    #[test]
    fn test_leave_vacates_the_right_seat() {
        let rooms = Rooms::new();
        let (host, _rx) = test_player();
        let host_id = host.connection_id;
        let room = rooms.create(sample_round(), host);

        assert_eq!(room.leave(host_id), Some(Seat::One));
        assert_eq!(room.leave(host_id), None);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_both_seats() {
        let rooms = Rooms::new();
        let (host, mut host_rx) = test_player();
        let room = rooms.create(sample_round(), host);
        let (guest, mut guest_rx) = test_player();
        room.join(guest).unwrap();

        room.broadcast(ServerMessage::OpponentLeft).await;

        assert!(matches!(
            host_rx.recv().await,
            Some(ServerMessage::OpponentLeft)
        ));
        assert!(matches!(
            guest_rx.recv().await,
            Some(ServerMessage::OpponentLeft)
        ));
    }

    #[test]
    fn test_sweep_removes_only_stale_waiting_rooms() {
        let rooms = Rooms::new();
        let (host, _rx) = test_player();
        let waiting = rooms.create(sample_round(), host);
        let playing = playing_room_in(&rooms);

        let later = Instant::now() + ROOM_WAITING_GRACE_PERIOD + Duration::from_secs(1);
        let removed = rooms.sweep_stale(later);

        assert_eq!(removed, vec![waiting.code.clone()]);
        assert!(!rooms.contains(&waiting.code));
        assert!(rooms.contains(&playing.code));
    }

    fn playing_room_in(rooms: &Rooms) -> Arc<Room> {
        let (host, _rx) = test_player();
        let room = rooms.create(sample_round(), host);
        let (guest, _rx) = test_player();
        room.join(guest).unwrap();
        room
    }
}
