//! Items that can be placed on a ring.
//!
//! Every variant owns its own data and implements the same thin [`RingElement`] contract. The ring
//! only ever asks an element whether it is valid, how to describe it, how to draw it and to run its
//! action. Nested rings additionally expose themselves through [`RingElement::as_nested`] so the
//! ring can hand over to the child.

pub mod app;
pub mod command;
pub mod icon;
pub mod macros;
pub mod nested;

pub use app::AppElement;
pub use command::CommandElement;
pub use icon::{ElementIcon, IconName};
pub use macros::MacroElement;
pub use nested::NestedRingElement;

use crate::draw::{DrawImage, DrawSurface, DrawText, ImageId};
use crate::geometry::{Point, Size};
use crate::sys::wm::RunOrRaiseError;
use palette::Srgba;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Invalid(String),
    #[error("Failed to spawn command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error(transparent)]
    RunOrRaise(#[from] RunOrRaiseError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementDrawParams {
    pub position: Point,
    pub size: Size,
    pub scale: f64,
    pub selected: bool,
    pub color: Srgba<f64>,
    pub alpha: f64,
    pub show_tooltip: bool,
}

pub trait RingElement {
    fn is_valid(&self) -> bool;

    fn invalid_reason(&self) -> String;

    fn description(&self) -> String;

    fn execute_action(&self) -> Result<(), ActionError>;

    fn icon(&self) -> Option<&Path> {
        None
    }

    fn draw(&self, surface: &mut dyn DrawSurface, params: &ElementDrawParams) {
        draw_base(surface, self.icon(), &self.description(), params);
    }

    fn as_nested(&self) -> Option<&NestedRingElement> {
        None
    }

    fn as_nested_mut(&mut self) -> Option<&mut NestedRingElement> {
        None
    }
}

/// Icon (or the description when there is none) scaled around the element position, plus the
/// tooltip when the element is selected. Text of a selected element is outlined in `params.color`.
pub fn draw_base(
    surface: &mut dyn DrawSurface,
    icon: Option<&Path>,
    description: &str,
    params: &ElementDrawParams,
) {
    let size = params.size.scaled(params.scale);

    match icon {
        Some(path) => surface.image(
            DrawImage::new(ImageId::Icon(path.to_path_buf()), params.position, size)
                .with_alpha(params.alpha),
        ),
        None => {
            let mut label = DrawText::centered(description, params.position, params.scale);
            label.color.alpha = params.alpha;
            if params.selected {
                label.outline = params.color;
            }
            surface.text(label);
        }
    }

    if params.selected && params.show_tooltip {
        let anchor = params.position + Point::new(size.width / 2.0, -size.height / 2.0);
        let mut tooltip = DrawText::left(description, anchor, 1.0);
        tooltip.outline = params.color;
        surface.text(tooltip);
    }
}

/// Element as written in the configuration, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementConfig {
    Command(CommandElement),
    App(AppElement),
    Macro(MacroElement),
    Nested(NestedRingElement),
}

impl ElementConfig {
    pub fn build(self) -> Box<dyn RingElement> {
        match self {
            Self::Command(e) => Box::new(e),
            Self::App(e) => Box::new(e),
            Self::Macro(e) => Box::new(e),
            Self::Nested(e) => Box::new(e),
        }
    }
}

/// A command line is usable when it splits into at least one word.
pub(crate) fn is_valid_command(command: &str) -> bool {
    shell_words::split(command).is_ok_and(|words| !words.is_empty())
}
