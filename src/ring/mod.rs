use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

pub mod animation;
pub mod layout;
pub mod model;
pub mod view;

pub use animation::{Animation, AnimationSettings, AnimationState, AnimationStyle};
pub use model::{Ring, RingConfig};

pub const DEAD_ZONE: f64 = 0.2; // half-width around a sector midpoint, in angular steps
pub const HOVER_REACH: f64 = 1.25; // hover cut-off, in radii
pub const ICON_REACH: f64 = 0.25; // hover scale and parting start, in radii
pub const PARTING_BAND: f64 = 0.125; // neighbours parted on each side, as a share of the count
pub const BACKGROUND_EXTENT: f64 = 1.3; // in radii
pub const CENTER_EXTENT: f64 = 0.27; // in radii
pub const LINE_ALPHA: f64 = 0.5;
pub const SELECTION_BACKGROUND_SCALE: f64 = 1.3;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct RingName(String);

crate::impl_string_newtype!(RingName);
