use super::{ActionError, ElementDrawParams, ElementIcon, RingElement, draw_base, is_valid_command};
use crate::draw::{DrawSurface, DrawText};
use crate::sys::wm::{self, ShellCommand};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runs a shell command, optionally showing a text label on the ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandElement {
    pub command: ShellCommand,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<ElementIcon>,
    #[serde(default)]
    pub draw_text: bool,
    #[serde(default)]
    pub draw_text_only_when_selected: bool,
}

impl CommandElement {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: ShellCommand::new(command),
            label: None,
            icon: None,
            draw_text: false,
            draw_text_only_when_selected: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn shows_label(&self, selected: bool) -> bool {
        self.draw_text && (!self.draw_text_only_when_selected || selected)
    }
}

impl RingElement for CommandElement {
    fn is_valid(&self) -> bool {
        is_valid_command(&self.command)
    }

    fn invalid_reason(&self) -> String {
        "Command format invalid".to_string()
    }

    fn description(&self) -> String {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => format!("{} ({})", label, self.command),
            _ => self.command.to_string(),
        }
    }

    fn execute_action(&self) -> Result<(), ActionError> {
        if !self.is_valid() {
            return Err(ActionError::Invalid(self.invalid_reason()));
        }
        wm::spawn_shell(&self.command)?;
        Ok(())
    }

    fn icon(&self) -> Option<&Path> {
        self.icon.as_ref().and_then(ElementIcon::path)
    }

    fn draw(&self, surface: &mut dyn DrawSurface, params: &ElementDrawParams) {
        draw_base(surface, self.icon(), &self.description(), params);

        if let Some(label) = &self.label
            && self.shows_label(params.selected)
        {
            surface.text(DrawText::centered(label.as_str(), params.position, params.scale));
        }
    }
}
