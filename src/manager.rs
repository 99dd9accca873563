//! Owns every configured ring and makes sure at most one of them is interactive at a time.

use crate::config::{Config, Settings};
use crate::draw::DrawSurface;
use crate::geometry::Point;
use crate::input::{FrameEffects, FrameInput};
use crate::keybind::{KeyBind, KeyRecorder, RecordOutcome};
use crate::ring::Ring;
use std::collections::HashMap;

/// A nested ring took over from its parent during a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedActivation {
    pub parent: usize,
    pub child: usize,
}

#[derive(Default)]
pub struct RingsManager {
    rings: Vec<Ring>,
    active: Option<usize>,
    skip_next_closed_check: bool,
    role_count: usize,
}

impl RingsManager {
    /// Earlier rings win keybind collisions.
    pub fn new(rings: Vec<Ring>, role_count: usize) -> Self {
        let mut manager = Self {
            role_count,
            ..Default::default()
        };
        manager.replace_rings(rings);
        manager
    }

    pub fn from_config(config: &Config) -> Self {
        let rings = config.rings.iter().cloned().map(Ring::from_config).collect();
        Self::new(rings, config.general.role_count)
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn ring(&self, name: &str) -> Option<&Ring> {
        self.rings.iter().find(|r| r.name.as_str() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.rings.iter().position(|r| r.name.as_str() == name)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_ring(&self) -> Option<&Ring> {
        self.rings.get(self.active?)
    }

    /// Whether anything would be drawn this frame.
    pub fn is_visible(&self) -> bool {
        self.rings
            .iter()
            .any(|r| r.is_previewing() || !r.is_closed())
    }

    /// Swaps the ring list, dropping any session in progress.
    pub fn replace_rings(&mut self, rings: Vec<Ring>) {
        self.rings.clear();
        self.active = None;
        self.skip_next_closed_check = false;

        for ring in rings {
            self.push_ring(ring);
        }
        self.link_nested();
    }

    pub fn add_ring(&mut self, ring: Ring) {
        self.push_ring(ring);
        self.link_nested();
    }

    fn push_ring(&mut self, mut ring: Ring) {
        if let Some(existing) = self
            .rings
            .iter()
            .find(|r| ring.keybind.conflicts_with(&r.keybind, self.role_count))
        {
            log::warn!(
                "Keybind {} of ring '{}' is already used by '{}', clearing it",
                ring.keybind,
                ring.name,
                existing.name
            );
            ring.keybind.reset();
        }
        self.rings.push(ring);
    }

    /// Clears the keybind of every other ring that collides with the one at `prioritized`.
    pub fn validate_keybind(&mut self, prioritized: usize) {
        let Some(winner) = self.rings.get(prioritized) else {
            return;
        };
        let keybind = winner.keybind.clone();
        let winner_name = winner.name.clone();

        for (i, ring) in self.rings.iter_mut().enumerate() {
            if i == prioritized || !keybind.conflicts_with(&ring.keybind, self.role_count) {
                continue;
            }
            log::warn!(
                "Keybind {} of ring '{}' collides with '{}', clearing it",
                ring.keybind,
                ring.name,
                winner_name
            );
            ring.keybind.reset();
        }
    }

    fn link_nested(&mut self) {
        let mut names = HashMap::new();
        for (i, ring) in self.rings.iter().enumerate() {
            names.entry(ring.name.to_string()).or_insert(i);
        }

        for ring in &mut self.rings {
            let parent = ring.name.clone();
            for nested in ring.items.iter_mut().filter_map(|e| e.as_nested_mut()) {
                let target = names.get(nested.ring.as_str()).copied();
                if target.is_none() {
                    log::warn!("Ring '{}' nests unknown ring '{}'", parent, nested.ring);
                }
                nested.link(target);
            }
        }
    }

    /// Makes `index` the active ring, surviving this frame's closed check.
    pub fn force_ring(&mut self, index: usize) {
        if index < self.rings.len() {
            log::debug!("Forcing ring '{}'", self.rings[index].name);
            self.active = Some(index);
            self.skip_next_closed_check = true;
        }
    }

    pub fn preview(&mut self, name: &str, position: Point) -> bool {
        match self.rings.iter_mut().find(|r| r.name.as_str() == name) {
            Some(ring) => {
                ring.preview(position);
                true
            }
            None => false,
        }
    }

    pub fn end_preview(&mut self, name: &str) -> bool {
        match self.rings.iter_mut().find(|r| r.name.as_str() == name) {
            Some(ring) => {
                ring.end_preview();
                true
            }
            None => false,
        }
    }

    /// Feeds one frame into the recorder for the ring at `index`. A committed combination is
    /// validated against the other rings.
    pub fn record_keybind(
        &mut self,
        index: usize,
        recorder: &mut KeyRecorder,
        input: &FrameInput,
    ) -> RecordOutcome {
        let Some(ring) = self.rings.get_mut(index) else {
            return RecordOutcome::Idle;
        };

        let outcome = recorder.capture(&mut ring.keybind, input);
        match outcome {
            RecordOutcome::Committed => {
                log::info!("Ring '{}' is now bound to {}", ring.name, ring.keybind);
                self.validate_keybind(index);
            }
            RecordOutcome::Cleared => log::info!("Cleared keybind of ring '{}'", ring.name),
            RecordOutcome::Idle | RecordOutcome::Pending => {}
        }
        outcome
    }

    pub fn update(&mut self, input: &FrameInput, effects: &mut FrameEffects, settings: &Settings) {
        let mut clear_temporal = false;

        if !self.skip_next_closed_check
            && let Some(i) = self.active
            && self.rings[i].is_closed()
        {
            log::debug!("Ring '{}' is no longer active", self.rings[i].name);
            self.active = None;
            clear_temporal = true;
        }
        self.skip_next_closed_check = false;

        if let Some(i) = self.active {
            let escape = settings.enable_escape_keybind && input.escape_pressed();
            let escaped = self.with_effective_keybind(i, |ring, borrowed| {
                let keybind = borrowed.unwrap_or(&mut ring.keybind);
                if escape && keybind.toggle {
                    keybind.deactivate();
                    true
                } else {
                    false
                }
            });

            if !escaped {
                self.with_effective_keybind(i, |ring, borrowed| {
                    ring.update(input, effects, settings, borrowed)
                });
            }
        }

        if clear_temporal {
            self.rings.iter_mut().for_each(|r| r.set_temporal_keybind(None));
        }

        for i in 0..self.rings.len() {
            if self.active.is_none()
                && self.with_effective_keybind(i, |ring, borrowed| {
                    ring.update(input, effects, settings, borrowed)
                })
            {
                log::debug!("Ring '{}' is now active", self.rings[i].name);
                self.active = Some(i);
                break;
            } else if self.active != Some(i) {
                self.rings[i].force_close();
            }
        }
    }

    /// Draws the active ring, then every other ring being previewed.
    pub fn draw(
        &mut self,
        input: &FrameInput,
        settings: &Settings,
        surface: &mut dyn DrawSurface,
        effects: &mut FrameEffects,
    ) -> Option<NestedActivation> {
        let drawn = self.active;
        let mut activation = None;

        if let Some(i) = drawn
            && let Some(child) = self.rings[i].draw(&ring_id(i), input, settings, surface, effects)
            && child < self.rings.len()
            && child != i
        {
            // the child follows whichever keybind opened the chain
            let owner = self.rings[i].temporal_keybind().unwrap_or(i);
            self.rings[child].set_temporal_keybind(Some(owner));
            self.force_ring(child);

            log::debug!(
                "Nested ring '{}' opened from '{}'",
                self.rings[child].name,
                self.rings[i].name
            );
            activation = Some(NestedActivation { parent: i, child });
        }

        for (i, ring) in self.rings.iter_mut().enumerate() {
            if drawn == Some(i) || !ring.is_previewing() {
                continue;
            }
            ring.draw(&ring_id(i), input, settings, surface, effects);
        }

        activation
    }

    /// Runs `f` on the ring at `index` together with the keybind it borrows from its owner, if any.
    fn with_effective_keybind<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Ring, Option<&mut KeyBind>) -> R,
    ) -> R {
        match self.rings[index].temporal_keybind() {
            Some(owner) if owner != index && owner < self.rings.len() => {
                let (ring, owner) = pair_mut(&mut self.rings, index, owner);
                f(ring, Some(&mut owner.keybind))
            }
            _ => f(&mut self.rings[index], None),
        }
    }
}

fn ring_id(index: usize) -> String {
    format!("ring_{}", index)
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
