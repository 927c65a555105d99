// SPDX-License-Identifier: MIT

//! Demo actions (§4.7): a small built-in library exercising each corner of
//! the Component Model, registered by `register_demo_actions`. Useful as a
//! smoke test and as a worked example for anyone writing their own action.

use std::time::Duration;

use crate::action::{handler_fn, Action};
use crate::component::{
    BooleanInput, Component, EmailInput, FileInput, MetadataItem, MetadataLayout, NumberInput,
    TextInput, WithBase,
};
use crate::error::ActionError;
use crate::registry::Registry;

/// Register the built-in demo actions. Call once at startup; a collision
/// with an already-registered slug propagates `ALREADY_EXISTS`.
pub async fn register_demo_actions(registry: &Registry) -> Result<(), ActionError> {
    registry
        .register(
            Action::new("Hello", handler_fn(hello))
                .with_slug("hello")
                .with_description("Greets you by name."),
        )
        .await?;
    registry
        .register(
            Action::new("Nuke", handler_fn(nuke))
                .with_slug("nuke")
                .with_description("Confirms, then counts down."),
        )
        .await?;
    registry
        .register(
            Action::new("Upload file", handler_fn(upload_file))
                .with_slug("upload_file")
                .with_description("Accepts a file upload and reports back its name."),
        )
        .await?;
    registry
        .register(
            Action::new("User profile", handler_fn(user_profile))
                .with_slug("user_profile")
                .with_description("Collects a small profile form in one batched reply."),
        )
        .await?;
    Ok(())
}

async fn hello(
    _ctx: crate::action::ActionContext,
    io: crate::io_context::IoContext,
) -> Result<(), ActionError> {
    io.display.heading("Hello", 1).await?;
    let name = io.input.text("Name?").await?;
    io.display.heading(format!("Hello, {name}"), 1).await?;
    Ok(())
}

async fn nuke(
    ctx: crate::action::ActionContext,
    io: crate::io_context::IoContext,
) -> Result<(), ActionError> {
    let confirmed = io.input.boolean(BooleanInput::new("Launch the nuke?").required(true)).await?;
    if !confirmed {
        io.display.markdown("Stand down.").await?;
        return Ok(());
    }

    for count in (1..=5).rev() {
        if ctx.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        io.display.heading(format!("T-minus {count}"), 2).await?;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    io.display.heading("Launched.", 1).await?;
    Ok(())
}

async fn upload_file(
    _ctx: crate::action::ActionContext,
    io: crate::io_context::IoContext,
) -> Result<(), ActionError> {
    let files = io
        .input
        .file(FileInput::new("Upload a file").accept(["text/plain"]).required(true))
        .await?;
    io.display
        .metadata(
            vec![MetadataItem { label: "Uploaded".to_owned(), value: files.join(", ") }],
            MetadataLayout::Default,
        )
        .await?;
    Ok(())
}

async fn user_profile(
    _ctx: crate::action::ActionContext,
    io: crate::io_context::IoContext,
) -> Result<(), ActionError> {
    io.display.heading("User profile", 1).await?;
    let replies = io
        .input
        .group(vec![
            Component::TextInput(TextInput::new("Name").required(true)),
            Component::EmailInput(EmailInput::new("Email").required(true)),
            Component::NumberInput(NumberInput::new("Age").min(0).max(130)),
        ])
        .await?;

    let name = replies.first().and_then(|v| v.as_str()).unwrap_or_default().to_owned();
    let email = replies.get(1).and_then(|v| v.as_str()).unwrap_or_default().to_owned();
    let age = replies.get(2).and_then(|v| v.as_i64()).unwrap_or_default();

    io.display
        .metadata(
            vec![
                MetadataItem { label: "Name".to_owned(), value: name },
                MetadataItem { label: "Email".to_owned(), value: email },
                MetadataItem { label: "Age".to_owned(), value: age.to_string() },
            ],
            MetadataLayout::Card,
        )
        .await?;
    Ok(())
}
