use super::{ActionError, ElementIcon, RingElement, is_valid_command};
use crate::sys::wm::{self, ShellCommand};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Several commands run one after another in a single shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroElement {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<ShellCommand>,
    #[serde(default)]
    pub icon: Option<ElementIcon>,
}

impl MacroElement {
    fn script(&self) -> ShellCommand {
        let lines: Vec<&str> = self.steps.iter().map(|s| s.as_str()).collect();
        ShellCommand::new(lines.join("\n"))
    }
}

impl RingElement for MacroElement {
    fn is_valid(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| is_valid_command(s))
    }

    fn invalid_reason(&self) -> String {
        if self.steps.is_empty() {
            "Macro has no steps".to_string()
        } else {
            "Macro contains an invalid command".to_string()
        }
    }

    fn description(&self) -> String {
        format!("{} ({} steps)", self.name, self.steps.len())
    }

    fn execute_action(&self) -> Result<(), ActionError> {
        if !self.is_valid() {
            return Err(ActionError::Invalid(self.invalid_reason()));
        }
        wm::spawn_shell(&self.script())?;
        Ok(())
    }

    fn icon(&self) -> Option<&Path> {
        self.icon.as_ref().and_then(ElementIcon::path)
    }
}
