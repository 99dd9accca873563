use super::{ActionError, ElementIcon, RingElement};
use crate::ring::RingName;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_activation_time() -> f64 {
    1.0
}

/// Opens another ring as a submenu, either on click or after hovering for `activation_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedRingElement {
    pub ring: RingName,
    #[serde(default)]
    pub click_to_activate: bool,
    /// Seconds of continuous hover before the child opens.
    #[serde(default = "default_activation_time")]
    pub activation_time: f64,
    #[serde(default)]
    pub keep_center: bool,
    #[serde(default)]
    pub icon: Option<ElementIcon>,

    #[serde(skip)]
    target: Option<usize>,
}

impl NestedRingElement {
    pub fn new(ring: impl Into<String>) -> Self {
        Self {
            ring: RingName::new(ring),
            click_to_activate: false,
            activation_time: default_activation_time(),
            keep_center: false,
            icon: None,
            target: None,
        }
    }

    /// Index of the child ring in the manager, once linked.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn link(&mut self, target: Option<usize>) {
        self.target = target;
    }
}

impl RingElement for NestedRingElement {
    fn is_valid(&self) -> bool {
        self.target.is_some()
    }

    fn invalid_reason(&self) -> String {
        format!("Ring '{}' not found", self.ring)
    }

    fn description(&self) -> String {
        format!("Ring: {}", self.ring)
    }

    fn execute_action(&self) -> Result<(), ActionError> {
        Ok(())
    }

    fn icon(&self) -> Option<&Path> {
        self.icon.as_ref().and_then(ElementIcon::path)
    }

    fn as_nested(&self) -> Option<&NestedRingElement> {
        Some(self)
    }

    fn as_nested_mut(&mut self) -> Option<&mut NestedRingElement> {
        Some(self)
    }
}
