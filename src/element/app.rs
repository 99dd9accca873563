use super::{ActionError, ElementIcon, RingElement};
use crate::sys::wm::{self, ShellCommand, WindowClass};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Focuses a running application by window class, launching it when it is not running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppElement {
    pub name: String,
    pub class: WindowClass,
    #[serde(default = "default_exec")]
    pub exec: ShellCommand,
    #[serde(default)]
    pub icon: Option<ElementIcon>,
}

fn default_exec() -> ShellCommand {
    ShellCommand::new("")
}

impl RingElement for AppElement {
    fn is_valid(&self) -> bool {
        !self.exec.trim().is_empty()
    }

    fn invalid_reason(&self) -> String {
        format!("No command to launch '{}'", self.name)
    }

    fn description(&self) -> String {
        self.name.clone()
    }

    fn execute_action(&self) -> Result<(), ActionError> {
        if !self.is_valid() {
            return Err(ActionError::Invalid(self.invalid_reason()));
        }
        wm::run_or_raise(&self.class, &self.exec)?;
        Ok(())
    }

    fn icon(&self) -> Option<&Path> {
        self.icon.as_ref().and_then(ElementIcon::path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_without_exec_is_invalid() {
        let app: AppElement = serde_json::from_str(r#"{"name": "Vesktop", "class": "vesktop"}"#).unwrap();
        assert!(!app.is_valid());
        assert_eq!(app.invalid_reason(), "No command to launch 'Vesktop'");
    }
}
