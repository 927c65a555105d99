// SPDX-License-Identifier: MIT

//! The component model: one tagged variant per renderable/inputtable UI
//! element. Each variant knows its own wire tag (`Message.type`) and whether
//! emitting it suspends the handler waiting for a reply.

use serde::{Deserialize, Serialize};

/// Fields shared by every input component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBase {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl InputBase {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }
}

/// Shared option setters, mirroring the recognized-option table in §4.5.
pub trait WithBase {
    fn base_mut(&mut self) -> &mut InputBase;

    fn help_text(mut self, text: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().help_text = Some(text.into());
        self
    }

    fn placeholder(mut self, text: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().placeholder = Some(text.into());
        self
    }

    fn required(mut self, required: bool) -> Self
    where
        Self: Sized,
    {
        self.base_mut().required = required;
        self
    }
}

macro_rules! impl_with_base {
    ($ty:ident) => {
        impl WithBase for $ty {
            fn base_mut(&mut self) -> &mut InputBase {
                &mut self.base
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    Default,
    Primary,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetadataLayout {
    #[default]
    Default,
    Card,
    Table,
}

// -- Display variants (request-only) -----------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingDisplay {
    pub text: String,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownDisplay {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlDisplay {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeDisplay {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDisplay {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub size: ImageSize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDisplay {
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub style: LinkStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDisplay {
    pub items: Vec<MetadataItem>,
    #[serde(default)]
    pub layout: MetadataLayout,
}

// -- Input variants (request/response) ---------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    #[serde(flatten)]
    pub base: InputBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}
impl_with_base!(TextInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooleanInput {
    #[serde(flatten)]
    pub base: InputBase,
}
impl_with_base!(BooleanInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberInput {
    #[serde(flatten)]
    pub base: InputBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}
impl_with_base!(NumberInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailInput {
    #[serde(flatten)]
    pub base: InputBase,
}
impl_with_base!(EmailInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderInput {
    #[serde(flatten)]
    pub base: InputBase,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}
impl_with_base!(SliderInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateInput {
    #[serde(flatten)]
    pub base: InputBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}
impl_with_base!(DateInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeInput {
    #[serde(flatten)]
    pub base: InputBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}
impl_with_base!(TimeInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlInput {
    #[serde(flatten)]
    pub base: InputBase,
}
impl_with_base!(UrlInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RichTextInput {
    #[serde(flatten)]
    pub base: InputBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
}
impl_with_base!(RichTextInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAreaInput {
    #[serde(flatten)]
    pub base: InputBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
}
impl_with_base!(TextAreaInput);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInput {
    #[serde(flatten)]
    pub base: InputBase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    #[serde(default)]
    pub multiple: bool,
}
impl_with_base!(FileInput);

// -- Container ----------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupComponent {
    pub elements: Vec<Component>,
}

/// A single UI element: one tagged variant per wire tag. Display variants are
/// request-only; input variants (and `Group`) await exactly one reply.
///
/// Tagged the same way as the outer `Message` envelope (`type`/`data`) so a
/// `Component` nested inside a `group`'s `elements` serializes identically
/// to a top-level frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Component {
    Heading(HeadingDisplay),
    Markdown(MarkdownDisplay),
    Html(HtmlDisplay),
    Code(CodeDisplay),
    Image(ImageDisplay),
    Link(LinkDisplay),
    Metadata(MetadataDisplay),
    TextInput(TextInput),
    BooleanInput(BooleanInput),
    NumberInput(NumberInput),
    EmailInput(EmailInput),
    SliderInput(SliderInput),
    DateInput(DateInput),
    TimeInput(TimeInput),
    UrlInput(UrlInput),
    RichTextInput(RichTextInput),
    TextAreaInput(TextAreaInput),
    FileInput(FileInput),
    Group(GroupComponent),
}

impl Component {
    /// The `Message.type` tag this component is emitted under.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::Heading(_) => "heading",
            Self::Markdown(_) => "markdown",
            Self::Html(_) => "html",
            Self::Code(_) => "code",
            Self::Image(_) => "image",
            Self::Link(_) => "link",
            Self::Metadata(_) => "metadata",
            Self::TextInput(_) => "textInput",
            Self::BooleanInput(_) => "booleanInput",
            Self::NumberInput(_) => "numberInput",
            Self::EmailInput(_) => "emailInput",
            Self::SliderInput(_) => "sliderInput",
            Self::DateInput(_) => "dateInput",
            Self::TimeInput(_) => "timeInput",
            Self::UrlInput(_) => "urlInput",
            Self::RichTextInput(_) => "richTextInput",
            Self::TextAreaInput(_) => "textAreaInput",
            Self::FileInput(_) => "fileInput",
            Self::Group(_) => "group",
        }
    }

    /// Whether emitting this component suspends the handler on a reply.
    pub fn awaits_reply(&self) -> bool {
        matches!(
            self,
            Self::TextInput(_)
                | Self::BooleanInput(_)
                | Self::NumberInput(_)
                | Self::EmailInput(_)
                | Self::SliderInput(_)
                | Self::DateInput(_)
                | Self::TimeInput(_)
                | Self::UrlInput(_)
                | Self::RichTextInput(_)
                | Self::TextAreaInput(_)
                | Self::FileInput(_)
                | Self::Group(_)
        )
    }

    /// Serialize the component's own fields to the `Message.data` payload.
    /// Returns `INTERNAL` if the component somehow fails to encode.
    pub fn to_data(&self) -> Result<serde_json::Value, crate::error::ActionError> {
        let value = match self {
            Self::Heading(v) => serde_json::to_value(v),
            Self::Markdown(v) => serde_json::to_value(v),
            Self::Html(v) => serde_json::to_value(v),
            Self::Code(v) => serde_json::to_value(v),
            Self::Image(v) => serde_json::to_value(v),
            Self::Link(v) => serde_json::to_value(v),
            Self::Metadata(v) => serde_json::to_value(v),
            Self::TextInput(v) => serde_json::to_value(v),
            Self::BooleanInput(v) => serde_json::to_value(v),
            Self::NumberInput(v) => serde_json::to_value(v),
            Self::EmailInput(v) => serde_json::to_value(v),
            Self::SliderInput(v) => serde_json::to_value(v),
            Self::DateInput(v) => serde_json::to_value(v),
            Self::TimeInput(v) => serde_json::to_value(v),
            Self::UrlInput(v) => serde_json::to_value(v),
            Self::RichTextInput(v) => serde_json::to_value(v),
            Self::TextAreaInput(v) => serde_json::to_value(v),
            Self::FileInput(v) => serde_json::to_value(v),
            Self::Group(v) => serde_json::to_value(v),
        };
        value.map_err(|_| crate::error::ActionError::Internal)
    }
}
