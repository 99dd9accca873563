//! Per-frame driver between the GTK host and the [`RingsManager`].
//!
//! Input arrives piecemeal (GTK controllers, socket events) and is folded into a [`FrameInput`]
//! once per tick. The tick records its draw calls into a [`DisplayList`] that the drawing area
//! replays on the next redraw.

use crate::config::{Config, Settings};
use crate::events::AppEvent;
use crate::geometry::{Point, Size};
use crate::gui::surface::DisplayList;
use crate::input::{FrameEffects, FrameInput, KeyCode, KeySnapshot};
use crate::keybind::{KeyRecorder, RecordOutcome};
use crate::manager::RingsManager;
use std::collections::BTreeSet;

struct Rebind {
    ring: usize,
    recorder: KeyRecorder,
}

pub struct Overlay {
    manager: RingsManager,
    settings: Settings,
    keys: KeySnapshot,
    pointer: Point,
    clicked: bool,
    viewport: Size,
    rebind: Option<Rebind>,
    consumed: BTreeSet<KeyCode>,
    display: DisplayList,
}

impl Overlay {
    pub fn new(config: Config) -> Self {
        Self {
            manager: RingsManager::from_config(&config),
            settings: config.general,
            keys: KeySnapshot::default(),
            pointer: Point::default(),
            clicked: false,
            viewport: Size::default(),
            rebind: None,
            consumed: BTreeSet::new(),
            display: DisplayList::default(),
        }
    }

    /// Replaces settings and rings. Open rings and a pending rebind are dropped.
    pub fn reload(&mut self, config: Config) {
        self.manager = RingsManager::from_config(&config);
        self.settings = config.general;
        self.rebind = None;
        self.display.clear();
        log::info!("Loaded {} rings", self.manager.rings().len());
    }

    pub fn manager(&self) -> &RingsManager {
        &self.manager
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    pub fn is_visible(&self) -> bool {
        self.manager.is_visible()
    }

    pub fn is_rebinding(&self) -> bool {
        self.rebind.is_some()
    }

    /// Whether the last frame asked for `key` to be withheld from other applications.
    pub fn is_consumed(&self, key: KeyCode) -> bool {
        self.consumed.contains(&key)
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.keys.press(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys.release(key);
    }

    pub fn click(&mut self) {
        self.clicked = true;
    }

    pub fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Applies a socket event. Reloads need the config file and are left to the caller.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::KeyDown(key) => self.key_down(key),
            AppEvent::KeyUp(key) => self.key_up(key),
            AppEvent::Preview(name) => {
                if !self.manager.preview(name.as_str(), self.viewport.center()) {
                    log::warn!("Cannot preview unknown ring '{}'", name);
                }
            }
            AppEvent::EndPreview(name) => {
                if !self.manager.end_preview(name.as_str()) {
                    log::warn!("Cannot end preview of unknown ring '{}'", name);
                }
            }
            AppEvent::Rebind(name) => match self.manager.position(name.as_str()) {
                Some(ring) => {
                    log::info!("Hold the new keys for ring '{}', Backspace clears it", name);
                    self.rebind = Some(Rebind {
                        ring,
                        recorder: KeyRecorder::default(),
                    });
                }
                None => log::warn!("Cannot rebind unknown ring '{}'", name),
            },
            AppEvent::Reload | AppEvent::ConfigReload => {
                log::debug!("Ignoring {:?}, reloads are handled by the host", event);
            }
        }
    }

    /// Runs one frame at `now` seconds.
    pub fn tick(&mut self, now: f64) -> FrameEffects {
        let input = FrameInput {
            pointer: self.pointer,
            clicked: std::mem::take(&mut self.clicked),
            now,
            viewport: self.viewport,
            keys: self.keys.clone(),
            text_input_focused: false,
            role: self.settings.role,
        };
        let mut effects = FrameEffects::default();
        self.display.clear();

        if let Some(rebind) = &mut self.rebind {
            let outcome = self
                .manager
                .record_keybind(rebind.ring, &mut rebind.recorder, &input);
            if matches!(outcome, RecordOutcome::Committed | RecordOutcome::Cleared) {
                self.rebind = None;
            } else if input.escape_pressed() {
                log::info!("Rebind cancelled");
                self.rebind = None;
            }
            self.consumed.clear();
            return effects;
        }

        self.manager.update(&input, &mut effects, &self.settings);
        if let Some(activation) =
            self.manager
                .draw(&input, &self.settings, &mut self.display, &mut effects)
        {
            log::debug!(
                "Ring {} handed over to ring {}",
                activation.parent,
                activation.child
            );
        }

        self.consumed = effects.consumed_keys.clone();
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::gui::surface::DrawOp;
    use crate::ring::RingName;

    const CONFIG: &str = r#"
animation = "none"

[[rings]]
name = "Main"
keybind = { keys = ["LCtrl", "1"] }

[[rings.items]]
type = "command"
command = "true"

[[rings.items]]
type = "command"
command = "false"

[[rings]]
name = "Other"
keybind = { keys = ["LCtrl", "2"] }

[[rings.items]]
type = "command"
command = "true"
"#;

    fn overlay() -> Overlay {
        let config = parse_config(CONFIG).expect("test config parses");
        let mut overlay = Overlay::new(config);
        overlay.set_viewport(Size::new(800.0, 600.0));
        overlay.set_pointer(Point::new(400.0, 300.0));
        overlay
    }

    #[test]
    fn test_keys_open_ring() {
        let mut overlay = overlay();
        overlay.tick(0.0);
        assert!(!overlay.is_visible());
        assert!(overlay.display().is_empty());

        overlay.handle(AppEvent::KeyDown(KeyCode::LeftControl));
        overlay.handle(AppEvent::KeyDown(KeyCode::Digit1));
        overlay.tick(0.016);

        assert_eq!(overlay.manager().active_index(), Some(0));
        assert!(overlay.is_visible());
        assert!(matches!(overlay.display().ops()[0], DrawOp::BeginLayer(ref id) if id == "ring_0"));
    }

    #[test]
    fn test_preview_opens_at_viewport_center() {
        let mut overlay = overlay();
        overlay.handle(AppEvent::Preview(RingName::new("Other")));
        overlay.tick(0.0);

        let ring = overlay.manager().ring("Other").expect("ring exists");
        assert!(ring.is_previewing());
        assert_eq!(ring.center(), Some(Point::new(400.0, 300.0)));
        assert!(!overlay.display().is_empty());

        overlay.handle(AppEvent::EndPreview(RingName::new("Other")));
        overlay.tick(0.016);
        let ring = overlay.manager().ring("Other").expect("ring exists");
        assert!(!ring.is_previewing());
    }

    #[test]
    fn test_rebind_records_instead_of_opening() {
        let mut overlay = overlay();
        overlay.handle(AppEvent::Rebind(RingName::new("Other")));
        assert!(overlay.is_rebinding());

        overlay.key_down(KeyCode::LeftControl);
        overlay.key_down(KeyCode::Digit1);
        overlay.tick(0.0);
        assert!(overlay.is_rebinding());
        assert_eq!(overlay.manager().active_index(), None);

        // collides with "Main", which loses to the freshly rebound ring
        overlay.tick(0.5);
        assert!(!overlay.is_rebinding());
        let other = overlay.manager().ring("Other").expect("ring exists");
        assert_eq!(other.keybind.keys, vec![KeyCode::Digit1, KeyCode::LeftControl]);
        let main = overlay.manager().ring("Main").expect("ring exists");
        assert!(main.keybind.is_empty());
    }

    #[test]
    fn test_escape_cancels_rebind() {
        let mut overlay = overlay();
        overlay.handle(AppEvent::Rebind(RingName::new("Main")));
        overlay.key_down(KeyCode::Escape);
        overlay.tick(0.0);

        assert!(!overlay.is_rebinding());
        let main = overlay.manager().ring("Main").expect("ring exists");
        assert_eq!(main.keybind.keys, vec![KeyCode::LeftControl, KeyCode::Digit1]);
    }

    #[test]
    fn test_unknown_rings_are_ignored() {
        let mut overlay = overlay();
        overlay.handle(AppEvent::Preview(RingName::new("Missing")));
        overlay.handle(AppEvent::Rebind(RingName::new("Missing")));
        overlay.tick(0.0);

        assert!(!overlay.is_rebinding());
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_reload_drops_open_rings() {
        let mut overlay = overlay();
        overlay.key_down(KeyCode::LeftControl);
        overlay.key_down(KeyCode::Digit2);
        overlay.tick(0.0);
        assert_eq!(overlay.manager().active_index(), Some(1));

        overlay.reload(parse_config(CONFIG).expect("test config parses"));
        assert_eq!(overlay.manager().active_index(), None);
        assert!(overlay.display().is_empty());
    }
}
