// SPDX-License-Identifier: MIT

//! The I/O Context (§4.5): the handler-facing façade. Each `display.*` call
//! emits a component and returns immediately; each `input.*` call emits a
//! component and suspends until the matching reply arrives, is decoded, and
//! returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::component::{
    BooleanInput, CodeDisplay, Component, DateInput, EmailInput, FileInput, GroupComponent,
    HeadingDisplay, HtmlDisplay, ImageDisplay, ImageSize, InputBase, LinkDisplay, LinkStyle,
    MarkdownDisplay, MetadataDisplay, MetadataItem, MetadataLayout, NumberInput, RichTextInput,
    SliderInput, TextAreaInput, TextInput, TimeInput, UrlInput,
};
use crate::error::ActionError;
use crate::message::Message;

macro_rules! impl_label_only_from {
    ($ty:ident) => {
        impl From<&str> for $ty {
            fn from(label: &str) -> Self {
                Self::new(label)
            }
        }
        impl From<String> for $ty {
            fn from(label: String) -> Self {
                Self::new(label)
            }
        }
    };
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label), min_length: None, max_length: None }
    }
    pub fn min_length(mut self, n: u32) -> Self {
        self.min_length = Some(n);
        self
    }
    pub fn max_length(mut self, n: u32) -> Self {
        self.max_length = Some(n);
        self
    }
}
impl_label_only_from!(TextInput);

impl BooleanInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label) }
    }
}
impl_label_only_from!(BooleanInput);

impl NumberInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label), min: None, max: None }
    }
    pub fn min(mut self, n: i64) -> Self {
        self.min = Some(n);
        self
    }
    pub fn max(mut self, n: i64) -> Self {
        self.max = Some(n);
        self
    }
}
impl_label_only_from!(NumberInput);

impl EmailInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label) }
    }
}
impl_label_only_from!(EmailInput);

impl SliderInput {
    /// `min` and `max` are required options for a slider (§4.5).
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { base: InputBase::new(label), min, max, step: None }
    }
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }
}

impl DateInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label), min: None, max: None }
    }
    pub fn min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }
    pub fn max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }
}
impl_label_only_from!(DateInput);

impl TimeInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label), min: None, max: None }
    }
    pub fn min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }
    pub fn max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }
}
impl_label_only_from!(TimeInput);

impl UrlInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label) }
    }
}
impl_label_only_from!(UrlInput);

impl RichTextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label), initial_value: None }
    }
    pub fn initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }
}
impl_label_only_from!(RichTextInput);

impl TextAreaInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label), initial_value: None }
    }
    pub fn initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }
}
impl_label_only_from!(TextAreaInput);

impl FileInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { base: InputBase::new(label), accept: Vec::new(), multiple: false }
    }
    pub fn accept(mut self, mime_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.accept = mime_types.into_iter().map(Into::into).collect();
        self
    }
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }
}
impl_label_only_from!(FileInput);

/// Shared state behind one action invocation's `display`/`input` calls.
struct IoInner {
    outbound: mpsc::Sender<Message>,
    /// Replies routed here by the Action Loop while `pending` is set.
    reply_rx: Mutex<mpsc::Receiver<serde_json::Value>>,
    /// Set while a suspension point is open; read by the Action Loop to
    /// decide whether an incoming `input` frame is expected or an
    /// out-of-order protocol violation (§5 Ordering).
    pending: Arc<AtomicBool>,
    stack: Mutex<Vec<Component>>,
    cancel: CancellationToken,
    input_timeout: Option<Duration>,
}

/// The handler-facing façade: `io.display.*` and `io.input.*`.
#[derive(Clone)]
pub struct IoContext {
    inner: Arc<IoInner>,
    pub display: Display,
    pub input: Input,
}

impl IoContext {
    pub fn new(
        outbound: mpsc::Sender<Message>,
        reply_rx: mpsc::Receiver<serde_json::Value>,
        pending: Arc<AtomicBool>,
        cancel: CancellationToken,
        input_timeout: Option<Duration>,
    ) -> Self {
        let inner = Arc::new(IoInner {
            outbound,
            reply_rx: Mutex::new(reply_rx),
            pending,
            stack: Mutex::new(Vec::new()),
            cancel,
            input_timeout,
        });
        Self { display: Display { inner: inner.clone() }, input: Input { inner: inner.clone() }, inner }
    }

    /// The ordered sequence of components emitted so far this action, used
    /// for tests and retrospection.
    pub async fn stack(&self) -> Vec<Component> {
        self.inner.stack.lock().await.clone()
    }
}

impl IoInner {
    /// Append to the stack and send the outbound frame (non-blocking emit).
    async fn emit(&self, component: Component) -> Result<(), ActionError> {
        let message = Message::from_component(&component)?;
        self.stack.lock().await.push(component);
        self.outbound.send(message).await.map_err(|_| ActionError::Cancelled)
    }

    /// Emit a component that awaits exactly one reply, then return the raw
    /// decoded JSON payload.
    async fn emit_and_await(&self, component: Component) -> Result<serde_json::Value, ActionError> {
        debug_assert!(component.awaits_reply());
        self.emit(component).await?;

        self.pending.store(true, Ordering::Release);
        let mut reply_rx = self.reply_rx.lock().await;
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ActionError::Cancelled),
            reply = wait_with_timeout(reply_rx.recv(), self.input_timeout) => {
                reply.ok_or(ActionError::Cancelled)
            }
        };
        self.pending.store(false, Ordering::Release);
        result
    }
}

async fn wait_with_timeout<T>(
    fut: impl std::future::Future<Output = Option<T>>,
    timeout: Option<Duration>,
) -> Option<T> {
    match timeout {
        None => fut.await,
        Some(duration) => tokio::time::timeout(duration, fut).await.ok().flatten(),
    }
}

/// Display operations: request-only, no reply expected.
#[derive(Clone)]
pub struct Display {
    inner: Arc<IoInner>,
}

impl Display {
    pub async fn heading(&self, text: impl Into<String>, level: u8) -> Result<(), ActionError> {
        self.inner.emit(Component::Heading(HeadingDisplay { text: text.into(), level })).await
    }

    pub async fn markdown(&self, content: impl Into<String>) -> Result<(), ActionError> {
        self.inner.emit(Component::Markdown(MarkdownDisplay { content: content.into() })).await
    }

    pub async fn html(&self, content: impl Into<String>) -> Result<(), ActionError> {
        self.inner.emit(Component::Html(HtmlDisplay { content: content.into() })).await
    }

    pub async fn code(&self, code: impl Into<String>, language: Option<&str>) -> Result<(), ActionError> {
        self.inner
            .emit(Component::Code(CodeDisplay { code: code.into(), language: language.map(String::from) }))
            .await
    }

    pub async fn image(
        &self,
        url: impl Into<String>,
        alt: Option<&str>,
        size: ImageSize,
    ) -> Result<(), ActionError> {
        self.inner
            .emit(Component::Image(ImageDisplay { url: url.into(), alt: alt.map(String::from), size }))
            .await
    }

    pub async fn link(
        &self,
        text: impl Into<String>,
        url: impl Into<String>,
        style: LinkStyle,
    ) -> Result<(), ActionError> {
        self.inner
            .emit(Component::Link(LinkDisplay { text: text.into(), url: url.into(), style }))
            .await
    }

    pub async fn metadata(
        &self,
        items: Vec<MetadataItem>,
        layout: MetadataLayout,
    ) -> Result<(), ActionError> {
        self.inner.emit(Component::Metadata(MetadataDisplay { items, layout })).await
    }
}

/// Input operations: request/response, suspend until a reply decodes.
#[derive(Clone)]
pub struct Input {
    inner: Arc<IoInner>,
}

impl Input {
    pub async fn text(&self, input: impl Into<TextInput>) -> Result<String, ActionError> {
        let data = self.inner.emit_and_await(Component::TextInput(input.into())).await?;
        decode_string(&data)
    }

    pub async fn boolean(&self, input: impl Into<BooleanInput>) -> Result<bool, ActionError> {
        let data = self.inner.emit_and_await(Component::BooleanInput(input.into())).await?;
        data.as_bool().ok_or(ActionError::BadInput)
    }

    pub async fn number(&self, input: impl Into<NumberInput>) -> Result<i64, ActionError> {
        let data = self.inner.emit_and_await(Component::NumberInput(input.into())).await?;
        decode_integer(&data)
    }

    pub async fn email(&self, input: impl Into<EmailInput>) -> Result<String, ActionError> {
        let data = self.inner.emit_and_await(Component::EmailInput(input.into())).await?;
        decode_string(&data)
    }

    pub async fn slider(&self, input: SliderInput) -> Result<f64, ActionError> {
        let data = self.inner.emit_and_await(Component::SliderInput(input)).await?;
        data.as_f64().ok_or(ActionError::BadInput)
    }

    pub async fn date(&self, input: impl Into<DateInput>) -> Result<NaiveDate, ActionError> {
        let data = self.inner.emit_and_await(Component::DateInput(input.into())).await?;
        let raw = decode_string(&data)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| ActionError::BadInput)
    }

    pub async fn time(&self, input: impl Into<TimeInput>) -> Result<NaiveTime, ActionError> {
        let data = self.inner.emit_and_await(Component::TimeInput(input.into())).await?;
        let raw = decode_string(&data)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(|_| ActionError::BadInput)
    }

    pub async fn url(&self, input: impl Into<UrlInput>) -> Result<String, ActionError> {
        let data = self.inner.emit_and_await(Component::UrlInput(input.into())).await?;
        decode_string(&data)
    }

    pub async fn rich_text(&self, input: impl Into<RichTextInput>) -> Result<String, ActionError> {
        let data = self.inner.emit_and_await(Component::RichTextInput(input.into())).await?;
        decode_string(&data)
    }

    pub async fn text_area(&self, input: impl Into<TextAreaInput>) -> Result<String, ActionError> {
        let data = self.inner.emit_and_await(Component::TextAreaInput(input.into())).await?;
        decode_string(&data)
    }

    pub async fn file(&self, input: FileInput) -> Result<Vec<String>, ActionError> {
        let multiple = input.multiple;
        let required = input.base.required;
        let data = self.inner.emit_and_await(Component::FileInput(input)).await?;
        decode_file_list(&data, multiple, required)
    }

    /// Combine multiple I/O calls into a single form with one batched reply,
    /// positionally aligned with `elements` (§4.5).
    pub async fn group(&self, elements: Vec<Component>) -> Result<Vec<serde_json::Value>, ActionError> {
        let data = self.inner.emit_and_await(Component::Group(GroupComponent { elements })).await?;
        data.as_array().cloned().ok_or(ActionError::BadInput)
    }
}

fn decode_string(data: &serde_json::Value) -> Result<String, ActionError> {
    data.as_str().map(str::to_owned).ok_or(ActionError::BadInput)
}

/// Decode a `number` reply: a JSON string is parsed as a decimal integer; a
/// JSON number must be integral (§4.5 — `number` disallows truncation).
/// A number literal written with a decimal point (e.g. `7.0`) still decodes
/// as its JSON `Number` variant rather than `i64`, so fall back to the
/// float representation and accept it only when it carries no fraction.
fn decode_integer(data: &serde_json::Value) -> Result<i64, ActionError> {
    match data {
        serde_json::Value::String(s) => s.parse::<i64>().map_err(|_| ActionError::BadInput),
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0).then_some(f as i64)
        }).ok_or(ActionError::BadInput),
        _ => Err(ActionError::BadInput),
    }
}

/// Decode a `file` reply: a sequence of strings; an empty sequence is only
/// valid for a non-required, `multiple` input.
fn decode_file_list(
    data: &serde_json::Value,
    multiple: bool,
    required: bool,
) -> Result<Vec<String>, ActionError> {
    let items = data.as_array().ok_or(ActionError::BadInput)?;
    let files: Vec<String> = items
        .iter()
        .map(|v| v.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .ok_or(ActionError::BadInput)?;
    if files.is_empty() && (!multiple || required) {
        return Err(ActionError::BadInput);
    }
    Ok(files)
}
