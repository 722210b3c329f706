//! Platform-neutral description of a rendered message.
//!
//! The workflow builds these; a [`NotificationSink`](super::NotificationSink)
//! turns them into whatever its platform expects.

/// Limit shared by select option labels, descriptions and values.
pub const MAX_OPTION_TEXT: usize = 100;
/// Embed field names.
pub const MAX_FIELD_NAME: usize = 256;
/// Embed titles.
pub const MAX_TITLE: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageView {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub components: Vec<ActionRow>,
}

impl MessageView {
    /// Plain text with no embeds and no controls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_row(mut self, row: ActionRow) -> Self {
        self.components.push(row);
        self
    }

    pub fn has_controls(&self) -> bool {
        !self.components.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(truncate(&title.into(), MAX_TITLE));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: truncate(&name.into(), MAX_FIELD_NAME),
            value: value.into(),
            inline: false,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRow {
    Select(SelectMenu),
    Buttons(Vec<Button>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    pub custom_id: String,
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub description: Option<String>,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: &str, description: Option<&str>, value: &str) -> Self {
        Self {
            label: truncate(label, MAX_OPTION_TEXT),
            description: description.map(|text| truncate(text, MAX_OPTION_TEXT)),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}
