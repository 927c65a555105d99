// SPDX-License-Identifier: MIT

//! Protocol-level tests driving the Action Loop directly over in-memory
//! channels — `Session` is transport-agnostic, so no WebSocket is needed.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use actioncell::action::{handler_fn, Action};
use actioncell::action_loop;
use actioncell::component::{
    DateInput, NumberInput, RichTextInput, SliderInput, TextAreaInput, TimeInput, UrlInput,
};
use actioncell::demos;
use actioncell::message::Message;
use actioncell::registry::Registry;
use actioncell::session::Session;

struct Harness {
    to_server: mpsc::Sender<Message>,
    from_server: mpsc::Receiver<Message>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Harness {
    fn spawn(registry: Arc<Registry>) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(8);
        let (outbound_tx, outbound_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let session = Session::new(inbound_rx, outbound_tx, cancel.clone());
        let handle = tokio::spawn(action_loop::run(session, registry, None));
        Self { to_server: inbound_tx, from_server: outbound_rx, cancel, handle }
    }

    async fn start(&self, slug: &str) {
        self.to_server.send(Message::new("start", json!(slug))).await.expect("send start");
    }

    async fn reply(&self, data: serde_json::Value) {
        self.to_server.send(Message::new("input", data)).await.expect("send input");
    }

    async fn cancel_action(&self) {
        self.to_server
            .send(Message::new("cancel", serde_json::Value::Null))
            .await
            .expect("send cancel");
    }

    async fn recv(&mut self) -> Message {
        tokio::time::timeout(Duration::from_secs(1), self.from_server.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("server channel closed")
    }

    async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

async fn demo_registry() -> Arc<Registry> {
    let registry = Registry::new();
    demos::register_demo_actions(&registry).await.expect("register demos");
    Arc::new(registry)
}

fn number_echo_action() -> Action {
    Action::new(
        "Number echo",
        handler_fn(|_ctx, io| async move {
            let n = io.input.number(NumberInput::new("Pick a number")).await?;
            io.display.heading(format!("Got {n}"), 1).await?;
            Ok(())
        }),
    )
    .with_slug("number_echo")
}

fn waiting_action() -> Action {
    Action::new(
        "Waits",
        handler_fn(|_ctx, io| async move {
            let _ = io.input.boolean("Confirm?").await?;
            Ok(())
        }),
    )
    .with_slug("waits")
}

fn slider_echo_action() -> Action {
    Action::new(
        "Slider echo",
        handler_fn(|_ctx, io| async move {
            let n = io.input.slider(SliderInput::new("Pick a value", 0.0, 10.0)).await?;
            io.display.heading(format!("Got {n}"), 1).await?;
            Ok(())
        }),
    )
    .with_slug("slider_echo")
}

fn date_echo_action() -> Action {
    Action::new(
        "Date echo",
        handler_fn(|_ctx, io| async move {
            let d = io.input.date(DateInput::new("Pick a date")).await?;
            io.display.heading(format!("Got {d}"), 1).await?;
            Ok(())
        }),
    )
    .with_slug("date_echo")
}

fn time_echo_action() -> Action {
    Action::new(
        "Time echo",
        handler_fn(|_ctx, io| async move {
            let t = io.input.time(TimeInput::new("Pick a time")).await?;
            io.display.heading(format!("Got {t}"), 1).await?;
            Ok(())
        }),
    )
    .with_slug("time_echo")
}

fn url_echo_action() -> Action {
    Action::new(
        "URL echo",
        handler_fn(|_ctx, io| async move {
            let u = io.input.url(UrlInput::new("Pick a URL")).await?;
            io.display.heading(format!("Got {u}"), 1).await?;
            Ok(())
        }),
    )
    .with_slug("url_echo")
}

fn rich_text_echo_action() -> Action {
    Action::new(
        "Rich text echo",
        handler_fn(|_ctx, io| async move {
            let v = io.input.rich_text(RichTextInput::new("Write something")).await?;
            io.display.heading(format!("Got {v}"), 1).await?;
            Ok(())
        }),
    )
    .with_slug("rich_text_echo")
}

fn text_area_echo_action() -> Action {
    Action::new(
        "Text area echo",
        handler_fn(|_ctx, io| async move {
            let v = io.input.text_area(TextAreaInput::new("Write something longer")).await?;
            io.display.heading(format!("Got {v}"), 1).await?;
            Ok(())
        }),
    )
    .with_slug("text_area_echo")
}

#[tokio::test]
async fn hello_round_trip() {
    let mut h = Harness::spawn(demo_registry().await);
    h.start("hello").await;

    let heading1 = h.recv().await;
    assert_eq!(heading1.kind, "heading");
    assert_eq!(heading1.data["text"], "Hello");
    assert_eq!(heading1.data["level"], 1);

    let prompt = h.recv().await;
    assert_eq!(prompt.kind, "textInput");
    assert_eq!(prompt.data["label"], "Name?");

    h.reply(json!("Ada")).await;

    let heading2 = h.recv().await;
    assert_eq!(heading2.kind, "heading");
    assert_eq!(heading2.data["text"], "Hello, Ada");

    let done = h.recv().await;
    assert_eq!(done.kind, "done");
    assert_eq!(done.data, "hello");

    h.shutdown().await;
}

#[tokio::test]
async fn nuke_declined_short_circuits() {
    let mut h = Harness::spawn(demo_registry().await);
    h.start("nuke").await;

    let confirm = h.recv().await;
    assert_eq!(confirm.kind, "booleanInput");

    h.reply(json!(false)).await;

    let stand_down = h.recv().await;
    assert_eq!(stand_down.kind, "markdown");
    assert_eq!(stand_down.data["content"], "Stand down.");

    let done = h.recv().await;
    assert_eq!(done.kind, "done");

    h.shutdown().await;
}

#[tokio::test]
async fn number_decode_success_and_failure() {
    let registry = Registry::new();
    registry.register(number_echo_action()).await.expect("register");
    let registry = Arc::new(registry);

    // Non-numeric reply ends the action with BAD_INPUT but the session
    // channel stays open (§5: only PROTOCOL/INTERNAL close the connection).
    {
        let mut h = Harness::spawn(Arc::clone(&registry));
        h.start("number_echo").await;
        let prompt = h.recv().await;
        assert_eq!(prompt.kind, "numberInput");
        h.reply(json!("not-a-number")).await;
        let err = h.recv().await;
        assert_eq!(err.kind, "error");
        assert_eq!(err.data, "BAD_INPUT");
        h.shutdown().await;
    }

    {
        let mut h = Harness::spawn(registry);
        h.start("number_echo").await;
        let _prompt = h.recv().await;
        h.reply(json!(42)).await;
        let heading = h.recv().await;
        assert_eq!(heading.data["text"], "Got 42");
        let done = h.recv().await;
        assert_eq!(done.kind, "done");
        h.shutdown().await;
    }
}

#[tokio::test]
async fn file_upload_success_and_failure() {
    let registry = demo_registry().await;

    // A required file input with an empty reply fails to decode.
    {
        let mut h = Harness::spawn(Arc::clone(&registry));
        h.start("upload_file").await;
        let prompt = h.recv().await;
        assert_eq!(prompt.kind, "fileInput");
        h.reply(json!([])).await;
        let err = h.recv().await;
        assert_eq!(err.kind, "error");
        assert_eq!(err.data, "BAD_INPUT");
        h.shutdown().await;
    }

    {
        let mut h = Harness::spawn(registry);
        h.start("upload_file").await;
        let _prompt = h.recv().await;
        h.reply(json!(["notes.txt"])).await;
        let metadata = h.recv().await;
        assert_eq!(metadata.kind, "metadata");
        assert_eq!(metadata.data["items"][0]["value"], "notes.txt");
        let done = h.recv().await;
        assert_eq!(done.kind, "done");
        h.shutdown().await;
    }
}

#[tokio::test]
async fn cancel_resolves_pending_input_as_cancelled_and_session_stays_usable() {
    let registry = Registry::new();
    registry.register(waiting_action()).await.expect("register");
    let registry = Arc::new(registry);

    let mut h = Harness::spawn(registry);
    h.start("waits").await;
    let _prompt = h.recv().await;

    h.cancel_action().await;

    let err = h.recv().await;
    assert_eq!(err.kind, "error");
    assert_eq!(err.data, "CANCELLED");

    h.start("waits").await;
    let prompt2 = h.recv().await;
    assert_eq!(prompt2.kind, "booleanInput");

    h.shutdown().await;
}

#[tokio::test]
async fn second_start_while_running_is_rejected_busy() {
    let registry = Registry::new();
    registry.register(waiting_action()).await.expect("register");
    let registry = Arc::new(registry);

    let mut h = Harness::spawn(registry);
    h.start("waits").await;
    let _prompt = h.recv().await;

    h.start("waits").await;
    let busy = h.recv().await;
    assert_eq!(busy.kind, "error");
    assert!(busy.data.as_str().expect("string payload").contains("BUSY"));

    h.shutdown().await;
}

#[tokio::test]
async fn unknown_action_reports_not_found_and_stays_usable() {
    let registry = Arc::new(Registry::new());
    let mut h = Harness::spawn(registry);

    h.start("does-not-exist").await;
    let err = h.recv().await;
    assert_eq!(err.kind, "error");
    assert!(err.data.as_str().expect("string payload").contains("NOT_FOUND"));

    h.shutdown().await;
}

#[tokio::test]
async fn unsolicited_input_closes_with_protocol() {
    let registry = Arc::new(Registry::new());
    let mut h = Harness::spawn(registry);

    h.reply(json!("surprise")).await;
    let err = h.recv().await;
    assert_eq!(err.kind, "error");
    assert_eq!(err.data, "PROTOCOL");

    h.shutdown().await;
}

#[tokio::test]
async fn slider_decode_accepts_float_in_range() {
    let registry = Registry::new();
    registry.register(slider_echo_action()).await.expect("register");
    let mut h = Harness::spawn(Arc::new(registry));

    h.start("slider_echo").await;
    let prompt = h.recv().await;
    assert_eq!(prompt.kind, "sliderInput");

    h.reply(json!(6.5)).await;
    let heading = h.recv().await;
    assert_eq!(heading.data["text"], "Got 6.5");
    let done = h.recv().await;
    assert_eq!(done.kind, "done");

    h.shutdown().await;
}

#[tokio::test]
async fn date_decode_success_and_failure() {
    let registry = Registry::new();
    registry.register(date_echo_action()).await.expect("register");
    let registry = Arc::new(registry);

    {
        let mut h = Harness::spawn(Arc::clone(&registry));
        h.start("date_echo").await;
        let prompt = h.recv().await;
        assert_eq!(prompt.kind, "dateInput");
        h.reply(json!("2024-03-07")).await;
        let heading = h.recv().await;
        assert_eq!(heading.data["text"], "Got 2024-03-07");
        let done = h.recv().await;
        assert_eq!(done.kind, "done");
        h.shutdown().await;
    }

    {
        let mut h = Harness::spawn(registry);
        h.start("date_echo").await;
        let _prompt = h.recv().await;
        h.reply(json!("not-a-date")).await;
        let err = h.recv().await;
        assert_eq!(err.kind, "error");
        assert_eq!(err.data, "BAD_INPUT");
        h.shutdown().await;
    }
}

#[tokio::test]
async fn time_decode_success_and_failure() {
    let registry = Registry::new();
    registry.register(time_echo_action()).await.expect("register");
    let registry = Arc::new(registry);

    {
        let mut h = Harness::spawn(Arc::clone(&registry));
        h.start("time_echo").await;
        let prompt = h.recv().await;
        assert_eq!(prompt.kind, "timeInput");
        h.reply(json!("13:45")).await;
        let heading = h.recv().await;
        assert_eq!(heading.data["text"], "Got 13:45:00");
        let done = h.recv().await;
        assert_eq!(done.kind, "done");
        h.shutdown().await;
    }

    {
        let mut h = Harness::spawn(registry);
        h.start("time_echo").await;
        let _prompt = h.recv().await;
        h.reply(json!("25:99")).await;
        let err = h.recv().await;
        assert_eq!(err.kind, "error");
        assert_eq!(err.data, "BAD_INPUT");
        h.shutdown().await;
    }
}

#[tokio::test]
async fn url_round_trip() {
    let registry = Registry::new();
    registry.register(url_echo_action()).await.expect("register");
    let mut h = Harness::spawn(Arc::new(registry));

    h.start("url_echo").await;
    let prompt = h.recv().await;
    assert_eq!(prompt.kind, "urlInput");

    h.reply(json!("https://example.com")).await;
    let heading = h.recv().await;
    assert_eq!(heading.data["text"], "Got https://example.com");
    let done = h.recv().await;
    assert_eq!(done.kind, "done");

    h.shutdown().await;
}

#[tokio::test]
async fn rich_text_round_trip() {
    let registry = Registry::new();
    registry.register(rich_text_echo_action()).await.expect("register");
    let mut h = Harness::spawn(Arc::new(registry));

    h.start("rich_text_echo").await;
    let prompt = h.recv().await;
    assert_eq!(prompt.kind, "richTextInput");

    h.reply(json!("<b>hi</b>")).await;
    let heading = h.recv().await;
    assert_eq!(heading.data["text"], "Got <b>hi</b>");
    let done = h.recv().await;
    assert_eq!(done.kind, "done");

    h.shutdown().await;
}

#[tokio::test]
async fn text_area_round_trip() {
    let registry = Registry::new();
    registry.register(text_area_echo_action()).await.expect("register");
    let mut h = Harness::spawn(Arc::new(registry));

    h.start("text_area_echo").await;
    let prompt = h.recv().await;
    assert_eq!(prompt.kind, "textAreaInput");

    h.reply(json!("a long note")).await;
    let heading = h.recv().await;
    assert_eq!(heading.data["text"], "Got a long note");
    let done = h.recv().await;
    assert_eq!(done.kind, "done");

    h.shutdown().await;
}

#[tokio::test]
async fn user_profile_batched_group_reply() {
    let mut h = Harness::spawn(demo_registry().await);
    h.start("user_profile").await;

    let heading = h.recv().await;
    assert_eq!(heading.kind, "heading");
    assert_eq!(heading.data["text"], "User profile");

    let group = h.recv().await;
    assert_eq!(group.kind, "group");
    let elements = group.data["elements"].as_array().expect("group elements array");
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[0]["type"], "textInput");
    assert_eq!(elements[1]["type"], "emailInput");
    assert_eq!(elements[2]["type"], "numberInput");

    h.reply(json!(["Ada", "ada@example.com", 30])).await;

    let metadata = h.recv().await;
    assert_eq!(metadata.kind, "metadata");
    assert_eq!(metadata.data["items"][0]["value"], "Ada");
    assert_eq!(metadata.data["items"][1]["value"], "ada@example.com");
    assert_eq!(metadata.data["items"][2]["value"], "30");

    let done = h.recv().await;
    assert_eq!(done.kind, "done");

    h.shutdown().await;
}
