use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Angular offset (radians) spiral items start from while opening.
pub const SPIRAL_START_OFFSET: f64 = -1.6;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum AnimationStyle {
    None,
    #[default]
    Spiral,
    Sequential,
    Fade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Opening,
    Opened,
    Closing,
    Closed,
}

impl AnimationState {
    pub fn is_closing_or_closed(&self) -> bool {
        matches!(self, Self::Closing | Self::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    pub style: AnimationStyle,
    /// Seconds for a full open or close.
    pub duration: f64,
}

impl AnimationSettings {
    pub fn new(style: AnimationStyle, duration: f64) -> Self {
        Self { style, duration }
    }

    pub fn instant() -> Self {
        Self::new(AnimationStyle::None, 0.0)
    }

    fn is_instant(&self) -> bool {
        self.style == AnimationStyle::None || self.duration <= 0.0
    }
}

/// Open/close state machine plus the per-item values derived from its progress.
#[derive(Debug, Clone)]
pub struct Animation {
    state: AnimationState,
    animating: bool,
    end_time: f64,
    progress: f64,
    angle_offset: f64,
    distance_scales: Vec<f64>,
    alphas: Vec<f64>,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            state: AnimationState::Closed,
            animating: false,
            end_time: 0.0,
            progress: 0.0,
            angle_offset: 0.0,
            distance_scales: Vec::new(),
            alphas: Vec::new(),
        }
    }
}

impl Animation {
    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn angle_offset(&self) -> f64 {
        self.angle_offset
    }

    pub fn distance_scale(&self, index: usize) -> f64 {
        self.distance_scales.get(index).copied().unwrap_or(1.0)
    }

    pub fn alpha(&self, index: usize) -> f64 {
        self.alphas.get(index).copied().unwrap_or(1.0)
    }

    /// Enters `state` for `count` items. Transitional states collapse to their stable state when
    /// animations are disabled; entering the current state again restarts its timer.
    pub fn enter(
        &mut self,
        state: AnimationState,
        count: usize,
        now: f64,
        settings: &AnimationSettings,
    ) {
        let state = match state {
            AnimationState::Opening if settings.is_instant() => AnimationState::Opened,
            AnimationState::Closing if settings.is_instant() => AnimationState::Closed,
            s => s,
        };

        self.state = state;
        self.distance_scales = vec![0.0; count];
        self.alphas = vec![0.0; count];

        match state {
            AnimationState::Opened | AnimationState::Closed => {
                let value = if state == AnimationState::Opened { 1.0 } else { 0.0 };
                self.animating = false;
                self.progress = value;
                self.angle_offset = 0.0;
                self.distance_scales.fill(value);
                self.alphas.fill(value);
            }
            AnimationState::Opening | AnimationState::Closing => {
                // resume from wherever the previous transition left off
                let remaining = if state == AnimationState::Opening {
                    1.0 - self.progress
                } else {
                    self.progress
                };
                self.end_time = now + settings.duration * remaining;
                self.animating = true;
            }
        }
    }

    /// Advances the running transition. Returns the stable state reached, if the transition ended.
    pub fn tick(
        &mut self,
        count: usize,
        now: f64,
        settings: &AnimationSettings,
    ) -> Option<AnimationState> {
        if !self.animating {
            return None;
        }

        let opening = self.state == AnimationState::Opening;
        let finished = now >= self.end_time || settings.is_instant();

        self.progress = if finished {
            if opening { 1.0 } else { 0.0 }
        } else {
            let remaining = ((self.end_time - now) / settings.duration).min(1.0);
            if opening { 1.0 - remaining } else { remaining }
        };

        self.apply_style(count, settings.style);

        if finished {
            let target = if opening {
                AnimationState::Opened
            } else {
                AnimationState::Closed
            };
            self.enter(target, count, now, settings);
            return Some(target);
        }
        None
    }

    fn apply_style(&mut self, count: usize, style: AnimationStyle) {
        let progress = self.progress;
        self.distance_scales.resize(count, 0.0);
        self.alphas.resize(count, 0.0);

        match style {
            AnimationStyle::Spiral => {
                self.angle_offset = SPIRAL_START_OFFSET * (1.0 - progress);
                self.distance_scales.fill(progress);
                self.alphas.fill(progress);
            }
            AnimationStyle::Sequential => {
                self.angle_offset = 0.0;
                for i in 0..count {
                    let p = sequential_value(progress, i, count);
                    self.distance_scales[i] = p;
                    self.alphas[i] = p;
                }
            }
            AnimationStyle::Fade | AnimationStyle::None => {
                self.angle_offset = 0.0;
                self.distance_scales.fill(1.0);
                self.alphas.fill(progress);
            }
        }
    }
}

/// Item `index` ramps 0→1 inside its own `1/count` window of the overall progress.
fn sequential_value(progress: f64, index: usize, count: usize) -> f64 {
    let width = 1.0 / count as f64;
    let start = index as f64 * width;
    let end = start + width;

    if progress <= start {
        0.0
    } else if progress >= end {
        1.0
    } else {
        (progress - start) / width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const COUNT: usize = 4;

    fn opening(style: AnimationStyle) -> (Animation, AnimationSettings) {
        let settings = AnimationSettings::new(style, 1.0);
        let mut anim = Animation::default();
        anim.enter(AnimationState::Opening, COUNT, 0.0, &settings);
        (anim, settings)
    }

    #[test]
    fn test_style_parsing() {
        let style: AnimationStyle = serde_json::from_str("\"Sequential\"").unwrap();
        assert_eq!(style, AnimationStyle::Sequential);
        assert_eq!(AnimationStyle::Fade.to_string(), "fade");
    }

    #[test]
    fn test_instant_settings_collapse_transitions() {
        for settings in [
            AnimationSettings::instant(),
            AnimationSettings::new(AnimationStyle::Spiral, 0.0),
        ] {
            let mut anim = Animation::default();
            anim.enter(AnimationState::Opening, COUNT, 0.0, &settings);
            assert_eq!(anim.state(), AnimationState::Opened);
            assert_eq!(anim.alpha(0), 1.0);

            anim.enter(AnimationState::Closing, COUNT, 0.0, &settings);
            assert_eq!(anim.state(), AnimationState::Closed);
            assert_eq!(anim.distance_scale(0), 0.0);
        }
    }

    #[test]
    fn test_values_are_monotonic_and_hit_bounds() {
        for style in AnimationStyle::iter().filter(|s| *s != AnimationStyle::None) {
            let (mut anim, settings) = opening(style);
            anim.tick(COUNT, 0.0, &settings);
            for i in 0..COUNT {
                assert_eq!(anim.alpha(i), 0.0, "{} start alpha", style);
            }

            let mut previous: Vec<(f64, f64)> =
                (0..COUNT).map(|i| (anim.alpha(i), anim.distance_scale(i))).collect();
            for step in 1..=10 {
                let now = step as f64 * 0.1;
                anim.tick(COUNT, now, &settings);
                for (i, prev) in previous.iter_mut().enumerate() {
                    let current = (anim.alpha(i), anim.distance_scale(i));
                    assert!(current.0 >= prev.0, "{} item {} alpha went backwards", style, i);
                    assert!(current.1 >= prev.1, "{} item {} distance went backwards", style, i);
                    *prev = current;
                }
            }

            assert_eq!(anim.state(), AnimationState::Opened);
            for i in 0..COUNT {
                assert_eq!(anim.alpha(i), 1.0);
                assert_eq!(anim.distance_scale(i), 1.0);
            }

            anim.enter(AnimationState::Closing, COUNT, 2.0, &settings);
            anim.tick(COUNT, 2.0, &settings);
            assert_eq!(anim.progress(), 1.0);
            let mut previous = vec![(1.0, 1.0); COUNT];
            for step in 1..=10 {
                anim.tick(COUNT, 2.0 + step as f64 * 0.1, &settings);
                for (i, prev) in previous.iter_mut().enumerate() {
                    let current = (anim.alpha(i), anim.distance_scale(i));
                    assert!(current.0 <= prev.0, "{} item {} alpha went forwards", style, i);
                    assert!(current.1 <= prev.1, "{} item {} distance went forwards", style, i);
                    *prev = current;
                }
            }
            assert_eq!(anim.state(), AnimationState::Closed);
            assert_eq!(anim.alpha(0), 0.0);
            assert_eq!(anim.distance_scale(0), 0.0);
        }
    }

    #[test]
    fn test_fade_keeps_full_distance() {
        let (mut anim, settings) = opening(AnimationStyle::Fade);
        for step in 0..=10 {
            anim.tick(COUNT, step as f64 * 0.1, &settings);
            for i in 0..COUNT {
                assert_eq!(anim.distance_scale(i), 1.0);
            }
        }
    }

    #[test]
    fn test_spiral_offset_unwinds() {
        let (mut anim, settings) = opening(AnimationStyle::Spiral);
        anim.tick(COUNT, 0.0, &settings);
        assert_eq!(anim.angle_offset(), SPIRAL_START_OFFSET);
        anim.tick(COUNT, 0.5, &settings);
        assert!((anim.angle_offset() - SPIRAL_START_OFFSET * 0.5).abs() < 1e-9);
        anim.tick(COUNT, 1.0, &settings);
        assert_eq!(anim.angle_offset(), 0.0);
    }

    #[test]
    fn test_sequential_windows() {
        assert_eq!(sequential_value(0.0, 0, 4), 0.0);
        assert_eq!(sequential_value(0.125, 0, 4), 0.5);
        assert_eq!(sequential_value(0.125, 1, 4), 0.0);
        assert_eq!(sequential_value(0.5, 1, 4), 1.0);
        assert_eq!(sequential_value(0.625, 2, 4), 0.5);
        assert_eq!(sequential_value(1.0, 3, 4), 1.0);
    }

    #[test]
    fn test_reversing_midway_resumes_from_current_progress() {
        let (mut anim, settings) = opening(AnimationStyle::Fade);
        anim.tick(COUNT, 0.25, &settings);
        assert!((anim.progress() - 0.25).abs() < 1e-9);

        anim.enter(AnimationState::Closing, COUNT, 0.25, &settings);
        anim.tick(COUNT, 0.25, &settings);
        assert!((anim.progress() - 0.25).abs() < 1e-9);
        assert_eq!(anim.tick(COUNT, 0.5, &settings), Some(AnimationState::Closed));
    }

    #[test]
    fn test_reentering_restarts_timer_without_changing_state() {
        let (mut anim, settings) = opening(AnimationStyle::Fade);
        anim.tick(COUNT, 0.5, &settings);
        anim.enter(AnimationState::Opening, COUNT + 1, 0.5, &settings);
        assert_eq!(anim.state(), AnimationState::Opening);
        anim.tick(COUNT + 1, 0.75, &settings);
        assert_eq!(anim.state(), AnimationState::Opening);
        assert!((anim.alpha(COUNT) - 0.75).abs() < 1e-9);
    }
}
