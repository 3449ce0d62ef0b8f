use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    game::{self, BoardTemplate},
    rooms::{run_round_clock, Room, RoomPlayer, Seat},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};

/// The seat a connection currently occupies, shared between the receive
/// loop and the post-disconnect cleanup
type SeatSlot = Arc<Mutex<Option<(Arc<Room>, Seat)>>>;

/// What the receive loop knows about one connection
struct Connection {
    connection_id: Uuid,
    tx: mpsc::Sender<ServerMessage>,
    seat: SeatSlot,
}

impl Connection {
    fn seat(&self) -> Option<(Arc<Room>, Seat)> {
        self.seat.lock().unwrap().clone()
    }

    fn take_seat(&self, room: Arc<Room>, seat: Seat) {
        *self.seat.lock().unwrap() = Some((room, seat));
    }
}

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);
    let connection_id = Uuid::new_v4();
    let seat_slot: SeatSlot = Arc::new(Mutex::new(None));

    tracing::info!("WebSocket connection established: {}", connection_id);

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let connection = Connection {
        connection_id,
        tx: tx.clone(),
        seat: seat_slot.clone(),
    };
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) =
                            handle_client_message(client_msg, &state_for_recv, &connection).await
                        {
                            tracing::error!("Error handling message: {}", e);
                            let error_msg = ServerMessage::Error {
                                message: e.to_string(),
                            };
                            let _ = connection.tx.send(error_msg).await;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = connection.tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client disconnected: {}", connection.connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    // If the connection was seated, the round cannot continue without it
    let vacated = seat_slot.lock().unwrap().take();
    if let Some((room, seat)) = vacated {
        depart_room(&state, &room, seat).await;
    }

    tracing::info!("WebSocket connection closed: {}", connection_id);
}

/// Tear a room down after one side leaves: notify the opponent, then remove
/// the room. A no-op when the clock or the other side already removed it.
async fn depart_room(state: &AppState, room: &Room, seat: Seat) {
    if state.rooms.remove(&room.code).is_none() {
        return;
    }

    tracing::info!("Player {:?} left room {}, closing it", seat, room.code);
    room.broadcast(ServerMessage::OpponentLeft).await;
}

/// Handle individual client messages
async fn handle_client_message(
    msg: ClientMessage,
    state: &Arc<AppState>,
    connection: &Connection,
) -> anyhow::Result<()> {
    match msg {
        ClientMessage::NewGame => {
            if connection.seat().is_some() {
                connection
                    .tx
                    .send(ServerMessage::Error {
                        message: "already seated in a room".to_string(),
                    })
                    .await?;
                return Ok(());
            }

            // solve the round up front; the result is the ground truth every
            // later submission is checked against
            let round = {
                let mut rng = rand::rng();
                let template = BoardTemplate::pick_classic(&mut rng);
                game::generate_and_solve(&mut rng, template, state.dictionary.index())?
            };
            tracing::info!(
                "New round solved: {} words, {} total points",
                round.words.len(),
                round.total_score
            );

            let host = RoomPlayer::new(connection.connection_id, connection.tx.clone());
            let room = state.rooms.create(round, host);
            tracing::info!(
                "Room {} created by connection {}",
                room.code,
                connection.connection_id
            );

            connection.take_seat(room.clone(), Seat::One);
            connection
                .tx
                .send(ServerMessage::RoomCreated {
                    room_code: room.code.clone(),
                })
                .await?;
            connection
                .tx
                .send(ServerMessage::Seated { player: Seat::One })
                .await?;
        }
        ClientMessage::JoinGame { room_code } => {
            if connection.seat().is_some() {
                connection
                    .tx
                    .send(ServerMessage::Error {
                        message: "already seated in a room".to_string(),
                    })
                    .await?;
                return Ok(());
            }

            let code = room_code.trim().to_ascii_uppercase();
            let Some(room) = state.rooms.get(&code) else {
                connection.tx.send(ServerMessage::UnknownRoom).await?;
                return Ok(());
            };

            let player = RoomPlayer::new(connection.connection_id, connection.tx.clone());
            let seat = match room.join(player) {
                Ok(seat) => seat,
                Err(e) => {
                    tracing::debug!("Join refused for room {}: {}", code, e);
                    connection.tx.send(ServerMessage::RoomFull).await?;
                    return Ok(());
                }
            };

            connection.take_seat(room.clone(), seat);
            connection
                .tx
                .send(ServerMessage::Seated { player: seat })
                .await?;

            room.broadcast(ServerMessage::RoundStarted {
                grid: room.round.grid.clone(),
                total_score: room.round.total_score,
                seconds_remaining: state.config.game.round_seconds,
            })
            .await;
            tracing::info!("Room {} started", room.code);

            tokio::spawn(run_round_clock(state.clone(), room));
        }
        ClientMessage::SubmitWord { word } => {
            let Some((room, seat)) = connection.seat() else {
                connection
                    .tx
                    .send(ServerMessage::Error {
                        message: "not seated in a room".to_string(),
                    })
                    .await?;
                return Ok(());
            };

            match room.apply_word(seat, &word) {
                Ok(accepted) => {
                    tracing::info!(
                        "Room {}: {:?} played {} for {} points",
                        room.code,
                        accepted.player,
                        accepted.word,
                        accepted.score
                    );
                    room.broadcast(ServerMessage::WordAccepted {
                        player: accepted.player,
                        word: accepted.word,
                        score: accepted.score,
                        scores: accepted.scores,
                        next_turn: accepted.next_turn,
                    })
                    .await;
                }
                Err(rejection) => {
                    connection
                        .tx
                        .send(ServerMessage::WordRejected {
                            reason: rejection.to_string(),
                        })
                        .await?;
                }
            }
        }
    }

    Ok(())
}
