use crate::geometry::Point;
use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{Clients, CursorPosition, Monitor, Monitors};
use hyprland::dispatch::{Dispatch, DispatchType, WindowIdentifier};
use hyprland::error::HyprError;
use hyprland::prelude::*;
use hyprland::shared::Address;
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct WindowClass(String);

crate::impl_string_newtype!(WindowClass);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ShellCommand(String);

crate::impl_string_newtype!(ShellCommand);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

crate::impl_string_newtype!(MonitorName);

#[derive(Debug, Error)]
pub enum RunOrRaiseError {
    #[error(transparent)]
    Hypr(#[from] HyprError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn spawn_shell(exec: &ShellCommand) -> std::io::Result<()> {
    Command::new("sh")
        .arg("-c")
        .arg(exec.as_str())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

pub fn focus_window(address: &Address) -> Result<(), HyprError> {
    Dispatch::call(DispatchType::FocusWindow(WindowIdentifier::Address(
        address.clone(),
    )))
}

/// Focuses the best-matching window for `class`, launching `exec` when nothing matches.
pub fn run_or_raise(class: &WindowClass, exec: &ShellCommand) -> Result<(), RunOrRaiseError> {
    let target = class.to_ascii_lowercase();

    #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
    enum MatchScore {
        NoMatch,
        Fuzzy,
        Component,
        Exact,
    }

    Clients::get()?
        .into_iter()
        .map(|c| {
            let w_class = c.class.to_ascii_lowercase();
            let score = match w_class {
                ref s if s == &target => MatchScore::Exact,
                ref s if s.split('.').any(|p| p == target) => MatchScore::Component,
                ref s if s.contains(&target) || target.contains(s.as_str()) => MatchScore::Fuzzy,
                _ => MatchScore::NoMatch,
            };
            (score, c)
        })
        .filter(|(score, _)| *score > MatchScore::NoMatch)
        .max_by_key(|(score, _)| *score)
        .map_or_else(
            || spawn_shell(exec).map_err(RunOrRaiseError::from),
            |(_, client)| focus_window(&client.address).map_err(RunOrRaiseError::from),
        )
}

fn focused_monitor() -> Option<Monitor> {
    Monitors::get().ok()?.into_iter().find(|m| m.focused)
}

pub fn get_active_monitor() -> Option<MonitorName> {
    focused_monitor().map(|m| MonitorName(m.name))
}

/// Cursor position relative to the focused monitor, which is where the overlay lives.
pub fn get_cursor_pos_on_active_monitor() -> Option<Point> {
    let cursor = CursorPosition::get().ok()?;
    let focused = focused_monitor()?;

    let x = cursor.x as f64 - focused.x as f64;
    let y = cursor.y as f64 - focused.y as f64;

    Some(Point::new(x, y))
}

/// Moves the cursor to `position`, given relative to the focused monitor.
pub fn warp_cursor(position: Point) -> Result<(), HyprError> {
    let (ox, oy) = focused_monitor()
        .map(|m| (m.x as i64, m.y as i64))
        .unwrap_or_default();

    Dispatch::call(DispatchType::MoveCursor(
        ox + position.x.round() as i64,
        oy + position.y.round() as i64,
    ))
}
