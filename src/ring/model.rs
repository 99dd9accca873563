use super::animation::{Animation, AnimationSettings, AnimationState};
use super::{LINE_ALPHA, RingName, layout, view};
use crate::config::Settings;
use crate::draw::DrawSurface;
use crate::element::{ElementConfig, ElementDrawParams, RingElement};
use crate::geometry::{Point, Size};
use crate::input::{FrameEffects, FrameInput};
use crate::keybind::KeyBind;
use palette::Srgba;
use serde::{Deserialize, Serialize};

fn default_color() -> [f64; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_radius() -> f64 {
    150.0
}

fn default_item_size() -> f64 {
    50.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingConfig {
    pub name: RingName,
    /// sRGBA, each channel in `[0, 1]`.
    #[serde(default = "default_color")]
    pub color: [f64; 4],
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_item_size")]
    pub item_size: f64,
    #[serde(default)]
    pub keybind: KeyBind,
    #[serde(default = "default_true")]
    pub draw_line: bool,
    #[serde(default = "default_true")]
    pub draw_selection_background: bool,
    #[serde(default)]
    pub show_tooltips: bool,
    #[serde(default)]
    pub prevent_action_on_close: bool,
    /// Index into `items` of the element shown at the centre.
    #[serde(default)]
    pub quick_action: Option<usize>,
    #[serde(default)]
    pub items: Vec<ElementConfig>,
}

pub struct Ring {
    pub name: RingName,
    pub radius: f64,
    pub item_size: f64,
    pub keybind: KeyBind,
    pub draw_line: bool,
    pub draw_selection_background: bool,
    pub show_tooltips: bool,
    pub prevent_action_on_close: bool,
    pub items: Vec<Box<dyn RingElement>>,
    pub quick_action_index: Option<usize>,

    color: Srgba<f64>,
    line_color: Srgba<f64>,
    /// Ring whose keybind drives this one while it is open as a nested ring.
    temporal_keybind: Option<usize>,

    previewing: bool,
    is_active: bool,
    /// Indices into `items`, recomputed every update.
    valid_items: Vec<usize>,
    previous_count: usize,

    center: Option<Point>,
    /// Index into `valid_items`.
    hovered: Option<usize>,
    hover_started: Option<f64>,
    quick_action_selected: bool,
    can_execute_action: bool,
    animation: Animation,
}

impl Ring {
    pub fn new(
        name: impl Into<String>,
        color: Srgba<f64>,
        keybind: KeyBind,
        radius: f64,
        item_size: f64,
    ) -> Self {
        let mut ring = Self {
            name: RingName::new(name),
            radius,
            item_size,
            keybind,
            draw_line: true,
            draw_selection_background: true,
            show_tooltips: false,
            prevent_action_on_close: false,
            items: Vec::new(),
            quick_action_index: None,
            color,
            line_color: color,
            temporal_keybind: None,
            previewing: false,
            is_active: false,
            valid_items: Vec::new(),
            previous_count: 0,
            center: None,
            hovered: None,
            hover_started: None,
            quick_action_selected: false,
            can_execute_action: true,
            animation: Animation::default(),
        };
        ring.set_color(color);
        ring
    }

    pub fn from_config(config: RingConfig) -> Self {
        let [r, g, b, a] = config.color;
        let mut ring = Self::new(
            config.name,
            Srgba::new(r, g, b, a),
            config.keybind,
            config.radius,
            config.item_size,
        );
        ring.draw_line = config.draw_line;
        ring.draw_selection_background = config.draw_selection_background;
        ring.show_tooltips = config.show_tooltips;
        ring.prevent_action_on_close = config.prevent_action_on_close;
        ring.quick_action_index = config.quick_action;
        ring.items = config.items.into_iter().map(ElementConfig::build).collect();
        ring
    }

    pub fn with_item(mut self, item: impl RingElement + 'static) -> Self {
        self.items.push(Box::new(item));
        self
    }

    pub fn color(&self) -> Srgba<f64> {
        self.color
    }

    pub fn line_color(&self) -> Srgba<f64> {
        self.line_color
    }

    pub fn set_color(&mut self, color: Srgba<f64>) {
        self.color = color;
        self.line_color = Srgba::new(color.red, color.green, color.blue, LINE_ALPHA);
    }

    pub fn temporal_keybind(&self) -> Option<usize> {
        self.temporal_keybind
    }

    pub fn set_temporal_keybind(&mut self, owner: Option<usize>) {
        self.temporal_keybind = owner;
    }

    pub fn is_previewing(&self) -> bool {
        self.previewing
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_closed(&self) -> bool {
        self.animation.state() == AnimationState::Closed
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn center(&self) -> Option<Point> {
        self.center
    }

    /// Hovered position among the valid items.
    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    pub fn quick_action_selected(&self) -> bool {
        self.quick_action_selected
    }

    pub fn valid_count(&self) -> usize {
        self.valid_items.len()
    }

    /// The quick-action element, while it exists and is valid.
    pub fn quick_action(&self) -> Option<usize> {
        self.quick_action_index
            .filter(|&i| self.items.get(i).is_some_and(|e| e.is_valid()))
    }

    pub fn hovered_element(&self) -> Option<&dyn RingElement> {
        let index = *self.valid_items.get(self.hovered?)?;
        self.items.get(index).map(|e| e.as_ref())
    }

    pub fn preview(&mut self, position: Point) {
        self.center = Some(position);
        self.settle(AnimationState::Opened);
        self.previewing = true;
    }

    pub fn end_preview(&mut self) {
        self.settle(AnimationState::Closed);
        self.previewing = false;
    }

    /// Snaps a ring that is not the active one shut. Previews are left alone.
    pub fn force_close(&mut self) {
        if !self.previewing && !self.is_closed() {
            self.settle(AnimationState::Closed);
        }
        self.is_active = false;
    }

    /// Refreshes the valid items and samples the keybind. `borrowed` is the keybind of the ring
    /// this one is nested under, if any. Returns whether the ring wants to be open.
    pub fn update(
        &mut self,
        input: &FrameInput,
        effects: &mut FrameEffects,
        settings: &Settings,
        borrowed: Option<&mut KeyBind>,
    ) -> bool {
        self.refresh_valid_items(input.now, &settings.animation());

        if self.previewing {
            return true;
        }

        let confirming = input.clicked && self.has_confirmable_selection();
        let keybind = borrowed.unwrap_or(&mut self.keybind);

        // a click on a selection confirms and closes a toggled ring
        if keybind.toggle && confirming {
            self.can_execute_action = true;
            keybind.deactivate();
        }

        if !keybind.is_active(input, settings.keybind_passthrough, effects) {
            self.is_active = false;
            return false;
        }

        self.can_execute_action = !keybind.toggle || !self.prevent_action_on_close;
        self.is_active = !self.valid_items.is_empty();
        self.is_active
    }

    /// Runs one frame of the ring: dispatches on close, opens, animates, hit-tests and draws.
    /// Returns the ring index of a nested ring that should take over.
    pub fn draw(
        &mut self,
        id: &str,
        input: &FrameInput,
        settings: &Settings,
        surface: &mut dyn DrawSurface,
        effects: &mut FrameEffects,
    ) -> Option<usize> {
        let animation = settings.animation();
        let now = input.now;

        if !self.previewing
            && let Some(target) = self.nested_activation(input, effects)
        {
            return Some(target);
        }

        if !self.previewing && !self.is_active {
            if self.can_execute_action {
                self.dispatch();
            }
            if !self.animation.state().is_closing_or_closed() {
                self.enter(AnimationState::Closing, now, &animation);
            }
        }

        if !self.previewing && self.is_active && self.animation.state().is_closing_or_closed() {
            if self.is_closed() {
                let center = if settings.appear_at_cursor {
                    input.pointer
                } else {
                    input.viewport.center() + settings.center_offset
                };
                self.center = Some(center);

                if !settings.appear_at_cursor && settings.auto_center_cursor {
                    effects.request_warp(center);
                }
            }
            self.enter(AnimationState::Opening, now, &animation);
        }

        let count = self.valid_items.len();
        if let Some(AnimationState::Closed) = self.animation.tick(count, now, &animation) {
            self.clear_session();
            log::debug!("Ring '{}' closed", self.name);
        }

        let center = self.center?;
        surface.begin_layer(id);
        self.render(center, input, settings, surface);
        surface.end_layer();
        None
    }

    fn render(
        &mut self,
        center: Point,
        input: &FrameInput,
        settings: &Settings,
        surface: &mut dyn DrawSurface,
    ) {
        let count = self.valid_items.len();
        let opened = self.animation.state() == AnimationState::Opened;
        let orbit = self.radius - self.item_size;
        let pointer = input.pointer;
        let item_size = Size::square(self.item_size);

        let mut hovered = if self.previewing {
            None
        } else {
            layout::resolve_pointer(center, pointer, count, self.radius)
        };

        let quick_action = if opened { self.quick_action() } else { None };
        let quick_scale = layout::quick_action_scale(pointer.distance(center), self.radius, self.item_size);
        if opened {
            let half = self.item_size * quick_scale * 0.5;
            self.quick_action_selected = quick_action.is_some()
                && !self.previewing
                && (pointer.x - center.x).abs() <= half
                && (pointer.y - center.y).abs() <= half;
        }
        if self.quick_action_selected {
            hovered = None;
        }
        self.set_hovered(hovered, input.now);

        if settings.draw_ring_background {
            view::draw_background(surface, center, self.radius, self.animation.progress());
        }

        let tint = if hovered.is_some() {
            self.color
        } else {
            self.line_color
        };
        view::draw_center(surface, center, self.radius, tint);

        if self.draw_line && opened {
            view::draw_arrow(surface, center, pointer, self.radius, tint);
        }

        if let Some(index) = quick_action {
            let alpha = if self.quick_action_selected {
                1.0
            } else {
                self.animation.alpha(0)
            };
            let color = if alpha >= 1.0 {
                self.color
            } else {
                Srgba::new(0.0, 0.0, 0.0, 0.0)
            };
            self.items[index].draw(
                surface,
                &ElementDrawParams {
                    position: center,
                    size: item_size,
                    scale: quick_scale,
                    selected: self.quick_action_selected,
                    color,
                    alpha,
                    show_tooltip: self.show_tooltips,
                },
            );
        }

        let mut positions = layout::animated_layout(center, count, orbit, &self.animation);
        let mut scales = vec![1.0; count];

        if opened && let Some(h) = hovered {
            let distance_to_icon = positions[h].distance(pointer);
            let amount = layout::parting_amount(distance_to_icon, self.radius, count);
            layout::part_around(&mut positions, center, orbit, h, amount);
            scales[h] = layout::hover_scale(distance_to_icon, self.radius, self.item_size);
        }

        for i in layout::draw_order(count, hovered) {
            let selected = hovered == Some(i);
            let scale = if settings.animate_icon_sizes && !self.previewing {
                scales[i]
            } else {
                1.0
            };
            let alpha = self.animation.alpha(i);

            if selected && self.draw_selection_background {
                view::draw_selection_background(
                    surface,
                    positions[i],
                    item_size,
                    scale,
                    self.color,
                    alpha,
                );
            }

            self.items[self.valid_items[i]].draw(
                surface,
                &ElementDrawParams {
                    position: positions[i],
                    size: item_size,
                    scale,
                    selected,
                    color: self.color,
                    alpha,
                    show_tooltip: self.show_tooltips,
                },
            );
        }
    }

    fn refresh_valid_items(&mut self, now: f64, animation: &AnimationSettings) {
        let quick_action = self.quick_action();
        self.valid_items = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, e)| e.is_valid() && Some(*i) != quick_action)
            .map(|(i, _)| i)
            .collect();

        let count = self.valid_items.len();
        if count != self.previous_count {
            self.previous_count = count;
            if self.hovered.is_some_and(|h| h >= count) {
                self.set_hovered(None, now);
            }
            // restart the current state's timers for the new item count
            self.enter(self.animation.state(), now, animation);
        }
    }

    /// Something a click can confirm. A linked nested ring is not one: clicking it opens the child.
    fn has_confirmable_selection(&self) -> bool {
        let hovered_action = self
            .hovered_element()
            .is_some_and(|e| e.as_nested().and_then(|n| n.target()).is_none());
        hovered_action || self.quick_action_selected
    }

    fn nested_activation(&mut self, input: &FrameInput, effects: &mut FrameEffects) -> Option<usize> {
        let started = self.hover_started?;
        let nested = self.hovered_element()?.as_nested()?;
        let target = nested.target()?;

        let ready = if nested.click_to_activate {
            input.clicked
        } else {
            input.now - started >= nested.activation_time
        };
        if !ready {
            return None;
        }

        let keep_center = nested.keep_center;
        self.hover_started = None;

        if keep_center && let Some(center) = self.center {
            effects.request_warp(center);
        }

        log::debug!("Ring '{}' hands over to ring #{}", self.name, target);
        Some(target)
    }

    /// Runs the selection made on the previous frame, if the ring was far enough open for it.
    fn dispatch(&self) {
        if self.center.is_none() {
            return;
        }

        let state = self.animation.state();
        let element = match self.hovered_element() {
            Some(e) if state == AnimationState::Opened => Some(e),
            _ if self.quick_action_selected
                && matches!(state, AnimationState::Opened | AnimationState::Opening) =>
            {
                self.quick_action().map(|i| self.items[i].as_ref())
            }
            _ => None,
        };

        if let Some(element) = element {
            log::debug!("Ring '{}' runs {}", self.name, element.description());
            if let Err(e) = element.execute_action() {
                log::error!("Failed to run {}: {}", element.description(), e);
            }
        }
    }

    fn set_hovered(&mut self, hovered: Option<usize>, now: f64) {
        if hovered != self.hovered {
            self.hovered = hovered;
            self.hover_started = hovered.map(|_| now);
        }
    }

    fn enter(&mut self, state: AnimationState, now: f64, animation: &AnimationSettings) {
        let previous = self.animation.state();
        self.animation.enter(state, self.valid_items.len(), now, animation);

        let reached = self.animation.state();
        if reached != previous {
            log::debug!("Ring '{}': {:?} -> {:?}", self.name, previous, reached);
        }
        if reached == AnimationState::Closed {
            self.clear_session();
        }
    }

    /// Enters a stable state without timers.
    fn settle(&mut self, state: AnimationState) {
        self.enter(state, 0.0, &AnimationSettings::instant());
    }

    fn clear_session(&mut self) {
        self.center = None;
        self.hovered = None;
        self.hover_started = None;
        self.quick_action_selected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ImageId;
    use crate::element::NestedRingElement;
    use crate::input::KeyCode;
    use crate::ring::AnimationStyle;
    use crate::testing::{ProbeElement, RecordingSurface};
    use std::cell::Cell;
    use std::rc::Rc;

    const CENTER: Point = Point { x: 500.0, y: 500.0 };
    // radius 300, item size 50: items orbit at 250
    const TOP: Point = Point { x: 500.0, y: 250.0 };

    fn instant() -> Settings {
        Settings {
            animation: AnimationStyle::None,
            ..Default::default()
        }
    }

    fn fading() -> Settings {
        Settings {
            animation: AnimationStyle::Fade,
            animation_duration: 1.0,
            ..Default::default()
        }
    }

    fn ring_with(keybind: KeyBind, count: usize) -> (Ring, Vec<Rc<Cell<usize>>>) {
        let mut ring = Ring::new("Test", Srgba::new(1.0, 0.0, 0.0, 1.0), keybind, 300.0, 50.0);
        let mut counters = Vec::new();
        for i in 0..count {
            let probe = ProbeElement::new(format!("item{}", i));
            counters.push(probe.executions());
            ring.items.push(Box::new(probe));
        }
        (ring, counters)
    }

    fn held(now: f64, pointer: Point) -> FrameInput {
        FrameInput::at(now).with_pointer(pointer).with_keys([KeyCode::A])
    }

    fn released(now: f64, pointer: Point) -> FrameInput {
        FrameInput::at(now).with_pointer(pointer)
    }

    /// One manager-less frame: update, then draw.
    fn frame(ring: &mut Ring, input: &FrameInput, settings: &Settings) -> (RecordingSurface, Option<usize>) {
        let mut surface = RecordingSurface::default();
        let mut effects = FrameEffects::default();
        ring.update(input, &mut effects, settings, None);
        let nested = ring.draw("ring_0", input, settings, &mut surface, &mut effects);
        (surface, nested)
    }

    fn totals(counters: &[Rc<Cell<usize>>]) -> Vec<usize> {
        counters.iter().map(|c| c.get()).collect()
    }

    #[test]
    fn test_release_runs_hovered_item_once() {
        let settings = instant();
        let (mut ring, counters) = ring_with(KeyBind::new(vec![KeyCode::A]), 4);

        frame(&mut ring, &held(0.0, CENTER), &settings);
        assert_eq!(ring.animation_state(), AnimationState::Opened);
        assert_eq!(ring.center(), Some(CENTER));

        frame(&mut ring, &held(0.1, TOP), &settings);
        assert_eq!(ring.hovered_index(), Some(2));

        frame(&mut ring, &released(0.2, TOP), &settings);
        assert_eq!(totals(&counters), vec![0, 0, 1, 0]);
        assert!(ring.is_closed());
        assert_eq!(ring.center(), None);

        for step in 3..6 {
            frame(&mut ring, &released(step as f64 * 0.1, TOP), &settings);
        }
        assert_eq!(totals(&counters), vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_repeated_update_in_one_frame_is_stable() {
        let settings = instant();
        let (mut ring, _) = ring_with(KeyBind::new(vec![KeyCode::A]).toggled(), 4);

        let twice = |ring: &mut Ring, input: &FrameInput| {
            let observe = |ring: &mut Ring| {
                let active = ring.update(input, &mut FrameEffects::default(), &settings, None);
                (active, ring.valid_count(), ring.hovered_index())
            };
            let first = observe(ring);
            let second = observe(ring);
            assert_eq!(first, second);
            first
        };

        assert_eq!(twice(&mut ring, &held(0.0, CENTER)), (true, 4, None));
        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &held(0.1, TOP), &settings);

        // latched open after release
        assert_eq!(twice(&mut ring, &released(0.2, TOP)), (true, 4, Some(2)));
        // confirming click closes the toggle
        let click = released(0.3, TOP).with_click();
        assert_eq!(twice(&mut ring, &click), (false, 4, Some(2)));
    }

    #[test]
    fn test_release_in_dead_zone_runs_nothing() {
        let settings = instant();
        let (mut ring, counters) = ring_with(KeyBind::new(vec![KeyCode::A]), 4);
        // halfway between items 1 (left) and 2 (top)
        let between = CENTER + Point::new(-150.0, -150.0);

        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &held(0.1, between), &settings);
        assert_eq!(ring.hovered_index(), None);

        frame(&mut ring, &released(0.2, between), &settings);
        assert_eq!(totals(&counters), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_hovered_item_is_drawn_last_and_scaled() {
        let settings = instant();
        let (mut ring, _) = ring_with(KeyBind::new(vec![KeyCode::A]), 4);

        frame(&mut ring, &held(0.0, CENTER), &settings);
        let (surface, _) = frame(&mut ring, &held(0.1, TOP), &settings);

        let last = surface.texts.last().unwrap();
        assert_eq!(last.text, "item2");
        assert_eq!(last.scale, 2.0);
        assert_eq!(surface.layers, vec!["ring_0".to_string()]);
        assert!(surface.images.iter().any(|i| i.image == ImageId::SelectionBackground));
        assert!(surface.images.iter().any(|i| i.image == ImageId::Arrow));

        let center = surface
            .images
            .iter()
            .find(|i| i.image == ImageId::RingCenter)
            .unwrap();
        assert_eq!(center.tint, ring.color());
    }

    #[test]
    fn test_empty_ring_never_opens() {
        let settings = instant();
        let (mut ring, _) = ring_with(KeyBind::new(vec![KeyCode::A]), 0);
        let mut effects = FrameEffects::default();

        assert!(!ring.update(&held(0.0, CENTER), &mut effects, &settings, None));
        let (surface, _) = frame(&mut ring, &held(0.0, CENTER), &settings);
        assert!(ring.is_closed());
        assert!(surface.layers.is_empty());
    }

    #[test]
    fn test_release_while_opening_does_not_run_item() {
        let settings = fading();
        let (mut ring, counters) = ring_with(KeyBind::new(vec![KeyCode::A]), 4);

        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &held(0.3, TOP), &settings);
        assert_eq!(ring.animation_state(), AnimationState::Opening);

        frame(&mut ring, &released(0.4, TOP), &settings);
        assert_eq!(ring.animation_state(), AnimationState::Closing);
        assert_eq!(totals(&counters), vec![0, 0, 0, 0]);

        // closing resumes from the reached progress
        frame(&mut ring, &released(0.8, TOP), &settings);
        assert!(ring.is_closed());
    }

    #[test]
    fn test_item_count_change_keeps_state() {
        let settings = fading();
        let mut ring = Ring::new("Test", Srgba::new(1.0, 1.0, 1.0, 1.0), KeyBind::new(vec![KeyCode::A]), 300.0, 50.0);
        let flaky = ProbeElement::new("flaky");
        let validity = flaky.validity();
        ring.items.push(Box::new(ProbeElement::new("steady")));
        ring.items.push(Box::new(flaky));

        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &held(0.5, CENTER), &settings);
        assert_eq!(ring.valid_count(), 2);
        assert_eq!(ring.animation_state(), AnimationState::Opening);

        validity.set(false);
        frame(&mut ring, &held(0.5, CENTER), &settings);
        assert_eq!(ring.valid_count(), 1);
        assert_eq!(ring.animation_state(), AnimationState::Opening);

        frame(&mut ring, &held(0.75, CENTER), &settings);
        assert_eq!(ring.animation_state(), AnimationState::Opening);
        frame(&mut ring, &held(1.0, CENTER), &settings);
        assert_eq!(ring.animation_state(), AnimationState::Opened);
    }

    #[test]
    fn test_quick_action_at_center() {
        let settings = instant();
        let (mut ring, counters) = ring_with(KeyBind::new(vec![KeyCode::A]), 5);
        ring.quick_action_index = Some(0);

        frame(&mut ring, &held(0.0, CENTER), &settings);
        assert_eq!(ring.valid_count(), 4);

        let near = CENTER + Point::new(10.0, 10.0);
        frame(&mut ring, &held(0.1, near), &settings);
        assert!(ring.quick_action_selected());
        assert_eq!(ring.hovered_index(), None);

        frame(&mut ring, &released(0.2, near), &settings);
        assert_eq!(totals(&counters), vec![1, 0, 0, 0, 0]);
        assert!(!ring.quick_action_selected());
    }

    #[test]
    fn test_invalid_quick_action_is_ignored() {
        let settings = instant();
        let (mut ring, _) = ring_with(KeyBind::new(vec![KeyCode::A]), 3);
        ring.quick_action_index = Some(7);

        frame(&mut ring, &held(0.0, CENTER), &settings);
        assert_eq!(ring.quick_action(), None);
        assert_eq!(ring.valid_count(), 3);
    }

    #[test]
    fn test_toggle_click_confirms_selection() {
        let settings = instant();
        let (mut ring, counters) = ring_with(KeyBind::new(vec![KeyCode::A]).toggled(), 4);

        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &released(0.1, TOP), &settings);
        assert!(ring.is_active());
        assert_eq!(ring.hovered_index(), Some(2));

        frame(&mut ring, &released(0.2, TOP).with_click(), &settings);
        assert!(!ring.is_active());
        assert_eq!(totals(&counters), vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_prevent_action_on_toggle_close() {
        let settings = instant();
        let (mut ring, counters) = ring_with(KeyBind::new(vec![KeyCode::A]).toggled(), 4);
        ring.prevent_action_on_close = true;

        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &released(0.1, TOP), &settings);
        // second press toggles it shut while hovering
        frame(&mut ring, &held(0.2, TOP), &settings);
        assert!(ring.is_closed());
        assert_eq!(totals(&counters), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_preview_is_always_open_and_never_hovers() {
        let settings = instant();
        let (mut ring, counters) = ring_with(KeyBind::new(vec![KeyCode::A]), 4);

        ring.preview(CENTER);
        let (surface, _) = frame(&mut ring, &released(0.0, TOP), &settings);
        assert_eq!(ring.animation_state(), AnimationState::Opened);
        assert_eq!(ring.hovered_index(), None);
        assert_eq!(surface.texts.len(), 4);
        assert!(surface.texts.iter().all(|t| t.scale == 1.0));

        ring.force_close();
        assert!(ring.is_previewing());
        assert!(!ring.is_closed());

        ring.end_preview();
        assert!(ring.is_closed());
        assert!(!ring.is_previewing());
        assert_eq!(totals(&counters), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_opens_at_viewport_center_with_auto_center() {
        let settings = Settings {
            appear_at_cursor: false,
            auto_center_cursor: true,
            center_offset: Point::new(0.0, 100.0),
            ..instant()
        };
        let (mut ring, _) = ring_with(KeyBind::new(vec![KeyCode::A]), 4);
        let input = held(0.0, TOP).with_viewport(Size::new(1000.0, 800.0));

        let mut effects = FrameEffects::default();
        let mut surface = RecordingSurface::default();
        ring.update(&input, &mut effects, &settings, None);
        ring.draw("ring_0", &input, &settings, &mut surface, &mut effects);

        assert_eq!(ring.center(), Some(Point::new(500.0, 500.0)));
        assert_eq!(effects.warp_pointer, Some(Point::new(500.0, 500.0)));
    }

    #[test]
    fn test_nested_ring_opens_after_dwell() {
        let settings = instant();
        let (mut ring, _) = ring_with(KeyBind::new(vec![KeyCode::A]), 1);
        let mut nested = NestedRingElement::new("Child");
        nested.keep_center = true;
        nested.link(Some(3));
        ring.items.push(Box::new(nested));

        // two items: the nested one sits at the top
        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &held(0.1, TOP), &settings);
        assert_eq!(ring.hovered_index(), Some(1));

        let (_, nested) = frame(&mut ring, &held(0.6, TOP), &settings);
        assert_eq!(nested, None);

        let mut effects = FrameEffects::default();
        let mut surface = RecordingSurface::default();
        let input = held(1.2, TOP);
        ring.update(&input, &mut effects, &settings, None);
        let nested = ring.draw("ring_0", &input, &settings, &mut surface, &mut effects);
        assert_eq!(nested, Some(3));
        assert_eq!(effects.warp_pointer, Some(CENTER));
        assert!(surface.layers.is_empty());

        // the dwell does not fire again while hovering on
        let (_, nested) = frame(&mut ring, &held(2.5, TOP), &settings);
        assert_eq!(nested, None);
    }

    #[test]
    fn test_nested_ring_click_activation() {
        let settings = instant();
        let (mut ring, _) = ring_with(KeyBind::new(vec![KeyCode::A]).toggled(), 1);
        let mut nested = NestedRingElement::new("Child");
        nested.click_to_activate = true;
        nested.link(Some(1));
        ring.items.push(Box::new(nested));

        frame(&mut ring, &held(0.0, CENTER), &settings);
        frame(&mut ring, &released(0.1, TOP), &settings);
        let (_, nested) = frame(&mut ring, &released(5.0, TOP), &settings);
        assert_eq!(nested, None);

        // the click opens the child instead of confirming and closing the parent
        let (_, nested) = frame(&mut ring, &released(5.1, TOP).with_click(), &settings);
        assert_eq!(nested, Some(1));
        assert!(ring.is_active());
    }

    #[test]
    fn test_ring_from_config() {
        let config: RingConfig = serde_json::from_str(
            r#"{
                "name": "Main",
                "color": [0.2, 0.4, 0.6, 1.0],
                "quick_action": 1,
                "keybind": {"keys": ["LCtrl", "1"]},
                "items": [
                    {"type": "command", "command": "notify-send a"},
                    {"type": "command", "command": "notify-send b"}
                ]
            }"#,
        )
        .unwrap();

        let ring = Ring::from_config(config);
        assert_eq!(ring.name.as_str(), "Main");
        assert_eq!(ring.radius, 150.0);
        assert_eq!(ring.items.len(), 2);
        assert_eq!(ring.quick_action(), Some(1));
        assert_eq!(ring.line_color().alpha, LINE_ALPHA);
        assert_eq!(ring.line_color().red, 0.2);
        assert!(ring.draw_line);
    }
}
