// SPDX-License-Identifier: MIT

//! The Session Channel (§4.3): a full-duplex, message-framed channel bound
//! to one client connection. Transport-agnostic — the same `Session` drives
//! a real WebSocket (`transport::ws`) or an in-memory pair of channels in
//! tests.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::message::Message;

/// One connection's full-duplex channel, decoupled from the underlying
/// transport. `inbound` carries client→server frames in arrival order;
/// `outbound` carries server→client frames, preserving emission order.
pub struct Session {
    inbound: mpsc::Receiver<Message>,
    outbound: mpsc::Sender<Message>,
    /// Fires when the underlying connection closes or is otherwise torn
    /// down. Every action's cancellation token is a child of this one.
    pub cancel: CancellationToken,
}

impl Session {
    pub fn new(
        inbound: mpsc::Receiver<Message>,
        outbound: mpsc::Sender<Message>,
        cancel: CancellationToken,
    ) -> Self {
        Self { inbound, outbound, cancel }
    }

    /// Receive the next inbound frame. Returns `None` once the channel is
    /// closed — the session MUST treat this as connection teardown.
    pub async fn recv(&mut self) -> Option<Message> {
        self.inbound.recv().await
    }

    /// Send an outbound frame. Best-effort: a closed channel is swallowed,
    /// matching §4.6 ("after close, outbound sends are best-effort dropped").
    pub async fn send(&self, message: Message) {
        let _ = self.outbound.send(message).await;
    }

    pub fn outbound_handle(&self) -> mpsc::Sender<Message> {
        self.outbound.clone()
    }
}
