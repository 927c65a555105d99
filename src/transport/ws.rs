// SPDX-License-Identifier: MIT

//! WebSocket upgrade for the session channel (§4.3, §6). Bridges a real
//! `axum` WebSocket onto the transport-agnostic `Session`/Action Loop pair.

use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::action_loop;
use crate::error::ActionError;
use crate::message::Message;
use crate::session::Session;
use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 32;

/// `GET <prefix>/a/{slug}/ws` — upgrade to the session channel.
///
/// `slug` only seeds the page the browser loaded from; the protocol itself
/// is slug-agnostic — a session may `start` any registered action.
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, slug))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, slug: String) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (inbound_tx, inbound_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
    let cancel = state.shutdown.child_token();

    tracing::debug!(slug, "session connected");

    let session = Session::new(inbound_rx, outbound_tx, cancel.clone());
    let registry = Arc::clone(&state.registry);
    let input_timeout = state.config.input_timeout();
    let loop_handle = tokio::spawn(action_loop::run(session, registry, input_timeout));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            outgoing = outbound_rx.recv() => {
                match outgoing {
                    Some(message) => {
                        let Ok(text) = serde_json::to_string(&message) else {
                            tracing::error!("failed to encode outbound frame");
                            continue;
                        };
                        if ws_tx.send(WsMessage::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            incoming = ws_rx.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => match serde_json::from_str::<Message>(&text) {
                        Ok(message) => {
                            if inbound_tx.send(message).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(err = %e, "malformed inbound frame, closing with INTERNAL");
                            let error = Message::error(ActionError::Internal.as_str());
                            if let Ok(text) = serde_json::to_string(&error) {
                                let _ = ws_tx.send(WsMessage::Text(text.into())).await;
                            }
                            break;
                        }
                    },
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    cancel.cancel();
    let _ = loop_handle.await;
    tracing::debug!(slug, "session closed");
}
