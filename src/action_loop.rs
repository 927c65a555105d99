// SPDX-License-Identifier: MIT

//! The Action Loop (§4.4): per-session supervisor. Accepts a `start`
//! message, looks up the action, runs it to completion or failure, then
//! emits `done` (or `error`) and returns to `Idle` for the next `start`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::action::ActionContext;
use crate::error::ActionError;
use crate::io_context::IoContext;
use crate::message::{ClientMessage, Message};
use crate::registry::Registry;
use crate::session::Session;

/// Bookkeeping for the one action that may be `Running` at a time.
struct RunningAction {
    slug: String,
    cancel: CancellationToken,
    reply_tx: mpsc::Sender<serde_json::Value>,
    pending: Arc<AtomicBool>,
}

/// Drive one session's Action Loop until the connection closes.
///
/// Consumes `session`: the loop owns the channel for the lifetime of the
/// connection, matching "a session owns at most one live action at a time"
/// (§3) and "at most one `Running` at a time per session" (§4.4).
pub async fn run(mut session: Session, registry: Arc<Registry>, input_timeout: Option<Duration>) {
    let mut running: Option<RunningAction> = None;
    let mut tasks: JoinSet<Result<(), ActionError>> = JoinSet::new();
    let cancel = session.cancel.clone();

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                tracing::debug!("session cancelled, closing action loop");
                break;
            }

            frame = session.recv() => {
                let Some(frame) = frame else {
                    tracing::debug!("inbound channel closed, ending session");
                    break;
                };
                match ClientMessage::parse(frame) {
                    Ok(ClientMessage::Start { slug }) => {
                        if running.is_some() {
                            tracing::debug!(slug, "rejected start: another action is running");
                            session.send(busy_error()).await;
                            continue;
                        }
                        dispatch(&mut session, &registry, &mut tasks, &mut running, slug, input_timeout).await;
                    }
                    Ok(ClientMessage::Cancel) => {
                        if let Some(r) = &running {
                            tracing::debug!(slug = %r.slug, "cooperative cancellation requested");
                            r.cancel.cancel();
                        }
                    }
                    Ok(ClientMessage::Input { data }) => {
                        let accepted = match &running {
                            Some(r) if r.pending.load(Ordering::Acquire) => {
                                r.reply_tx.try_send(data).is_ok()
                            }
                            _ => false,
                        };
                        if !accepted {
                            tracing::warn!("unsolicited input reply, closing with PROTOCOL");
                            session.send(Message::error(ActionError::Protocol.as_str())).await;
                            break;
                        }
                    }
                    Err(_) => {
                        tracing::warn!("unrecognized frame type, closing with PROTOCOL");
                        session.send(Message::error(ActionError::Protocol.as_str())).await;
                        break;
                    }
                }
            }

            Some(result) = tasks.join_next(), if running.is_some() => {
                let Some(finished) = running.take() else { continue };
                match result {
                    Ok(Ok(())) => {
                        tracing::debug!(slug = %finished.slug, "action completed");
                        session.send(Message::done(finished.slug)).await;
                    }
                    Ok(Err(err)) => {
                        tracing::debug!(slug = %finished.slug, err = %err, "action returned error");
                        session.send(Message::error(err.as_str())).await;
                        if err.closes_connection() {
                            break;
                        }
                    }
                    Err(join_err) => {
                        tracing::error!(slug = %finished.slug, err = %join_err, "action task panicked");
                        session.send(Message::error(ActionError::Internal.as_str())).await;
                        break;
                    }
                }
            }
        }
    }

    tasks.shutdown().await;
}

fn busy_error() -> Message {
    Message::error(format!("{}: another action is already running", ActionError::Busy.as_str()))
}

async fn dispatch(
    session: &mut Session,
    registry: &Registry,
    tasks: &mut JoinSet<Result<(), ActionError>>,
    running: &mut Option<RunningAction>,
    slug: String,
    input_timeout: Option<Duration>,
) {
    let action = match registry.get(&slug).await {
        Ok(action) => action,
        Err(_not_found) => {
            tracing::debug!(slug, "start for unknown action");
            let message =
                format!("{}: no action registered for slug {slug:?}", ActionError::NotFound.as_str());
            session.send(Message::error(message)).await;
            return;
        }
    };

    let action_cancel = session.cancel.child_token();
    let pending = Arc::new(AtomicBool::new(false));
    let (reply_tx, reply_rx) = mpsc::channel(1);
    let io = IoContext::new(
        session.outbound_handle(),
        reply_rx,
        pending.clone(),
        action_cancel.clone(),
        input_timeout,
    );
    let ctx = ActionContext { slug: slug.clone(), cancel: action_cancel.clone() };
    let handler = action.handler.clone();

    tracing::debug!(slug, "dispatching action");
    tasks.spawn(async move { handler(ctx, io).await });
    *running = Some(RunningAction { slug, cancel: action_cancel, reply_tx, pending });
}
