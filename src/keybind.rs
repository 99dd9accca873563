use crate::input::{FrameEffects, FrameInput, KeyCode, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How long a combination must stay held before the recorder commits it.
pub const REBIND_HOLD_SECS: f64 = 0.15;

/// A set of keys held together, optionally latched (toggle) and restricted to roles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyBind {
    #[serde(default)]
    pub keys: Vec<KeyCode>,
    #[serde(default)]
    pub toggle: bool,
    #[serde(default)]
    pub roles: BTreeSet<RoleId>,

    #[serde(skip)]
    waiting_for_release: bool,
    #[serde(skip)]
    active: bool,
}

impl KeyBind {
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    pub fn toggled(mut self) -> Self {
        self.toggle = true;
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// No role restriction, either because none is set or because every known role is listed.
    pub fn is_global(&self, role_count: usize) -> bool {
        self.roles.is_empty() || (role_count > 0 && self.roles.len() >= role_count)
    }

    /// Order and repeats do not matter: both bindings fire on the same chord.
    pub fn binds_same_keys(&self, other: &KeyBind) -> bool {
        let ours: BTreeSet<KeyCode> = self.keys.iter().copied().collect();
        let theirs: BTreeSet<KeyCode> = other.keys.iter().copied().collect();
        ours == theirs
    }

    /// Two bindings collide when they use the same keys and their role restrictions overlap.
    pub fn conflicts_with(&self, other: &KeyBind, role_count: usize) -> bool {
        if self.is_empty() || !self.binds_same_keys(other) {
            return false;
        }
        if self.is_global(role_count) || other.is_global(role_count) {
            return true;
        }
        !self.roles.is_disjoint(&other.roles)
    }

    /// Samples the binding for this frame. Held keys are reported as consumed unless
    /// `passthrough` is set. In toggle mode the result is the latched value.
    pub fn is_active(
        &mut self,
        input: &FrameInput,
        passthrough: bool,
        effects: &mut FrameEffects,
    ) -> bool {
        if input.text_input_focused {
            return self.toggle && self.active;
        }

        let mut active = input.keys.all_held(&self.keys);

        if let Some(role) = input.role
            && !self.roles.is_empty()
        {
            active &= self.roles.contains(&role);
        }

        if active && !passthrough {
            self.keys.iter().for_each(|k| effects.consume(*k));
        }

        if !self.toggle {
            return active;
        }

        if active && !self.waiting_for_release {
            self.active = !self.active;
            self.waiting_for_release = true;
        } else if !active {
            self.waiting_for_release = false;
        }

        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.waiting_for_release = false;
    }

    pub fn reset(&mut self) {
        self.keys.clear();
        self.deactivate();
    }

    pub fn replace_keys(&mut self, keys: Vec<KeyCode>) {
        self.keys = keys;
        self.deactivate();
    }

    pub fn description(&self, role_name: impl Fn(RoleId) -> String) -> String {
        let keys = if self.toggle {
            format!("[{}]", self)
        } else {
            self.to_string()
        };

        if self.roles.is_empty() {
            return keys;
        }

        let mut names: Vec<String> = self.roles.iter().map(|r| role_name(*r)).collect();
        names.sort();
        format!("{} ({})", keys, names.join(", "))
    }
}

impl fmt::Display for KeyBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.keys.iter().map(|k| k.to_string()).collect();
        write!(f, "{}", keys.join(" + "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Nothing held.
    Idle,
    /// A combination is held but has not been held long enough.
    Pending,
    Committed,
    Cleared,
}

/// Captures a new combination for a [`KeyBind`]. Backspace clears the binding; any other
/// combination is committed once it has been held unchanged for [`REBIND_HOLD_SECS`].
#[derive(Debug, Default)]
pub struct KeyRecorder {
    pending: Option<(f64, Vec<KeyCode>)>,
}

impl KeyRecorder {
    pub fn capture(&mut self, keybind: &mut KeyBind, input: &FrameInput) -> RecordOutcome {
        if input.keys.is_held(KeyCode::Backspace) {
            self.pending = None;
            keybind.reset();
            return RecordOutcome::Cleared;
        }

        let held = input.keys.held_bindable();
        if held.is_empty() {
            self.pending = None;
            return RecordOutcome::Idle;
        }

        match &self.pending {
            Some((since, keys)) if *keys == held => {
                if input.now - since >= REBIND_HOLD_SECS {
                    self.pending = None;
                    keybind.replace_keys(held);
                    RecordOutcome::Committed
                } else {
                    RecordOutcome::Pending
                }
            }
            _ => {
                self.pending = Some((input.now, held));
                RecordOutcome::Pending
            }
        }
    }
}
