use super::animation::Animation;
use super::{DEAD_ZONE, HOVER_REACH, ICON_REACH, PARTING_BAND};
use crate::geometry::{Point, rotate};
use std::f64::consts::PI;

pub fn angle_step(count: usize) -> f64 {
    2.0 * PI / count as f64
}

fn place(center: Point, orbit: f64, angle: f64) -> Point {
    center + rotate(Point::new(0.0, orbit), angle)
}

/// Resting positions: equal steps around `center`, `orbit` away from it, starting at the bottom.
pub fn layout(center: Point, count: usize, orbit: f64) -> Vec<Point> {
    let step = angle_step(count);
    (0..count)
        .map(|i| place(center, orbit, step * i as f64))
        .collect()
}

/// Resting layout with the animation's angular offset and per-item distance applied.
pub fn animated_layout(center: Point, count: usize, orbit: f64, animation: &Animation) -> Vec<Point> {
    let step = angle_step(count);
    (0..count)
        .map(|i| {
            let angle = step * i as f64 + animation.angle_offset();
            place(center, orbit * animation.distance_scale(i), angle)
        })
        .collect()
}

/// Maps the pointer to an item by angle. Pointers beyond the hover reach, or inside the dead zone
/// around the midpoint between two items, select nothing.
pub fn resolve_pointer(center: Point, pointer: Point, count: usize, radius: f64) -> Option<usize> {
    if count == 0 || pointer.distance(center) > radius * HOVER_REACH {
        return None;
    }

    let t = pointer.angle_from_bottom(center) / angle_step(count);
    let base = t.floor();
    let fraction = t - base;

    if (fraction - 0.5).abs() < DEAD_ZONE {
        return None;
    }

    let index = if fraction > 0.5 { base + 1.0 } else { base };
    Some(index as usize % count)
}

/// How far neighbours part around the hovered item, as a fraction of the angular step. Grows as
/// the pointer closes in on the icon.
pub fn parting_amount(distance_to_icon: f64, radius: f64, count: usize) -> f64 {
    let reach = radius * ICON_REACH;
    if distance_to_icon > reach {
        return 0.0;
    }
    ((reach - distance_to_icon).abs() * 0.003).clamp(0.0, (count as f64 / radius) * 9.0)
}

/// Nudges up to `PARTING_BAND` of the items on each side of `hovered` away from it, nearest
/// neighbours the most.
pub fn part_around(positions: &mut [Point], center: Point, orbit: f64, hovered: usize, amount: f64) {
    let count = positions.len();
    let band = (count as f64 * PARTING_BAND) as usize;
    if band == 0 || amount <= 0.0 {
        return;
    }

    let step = angle_step(count);
    let offset = step * amount;

    for k in 1..=band {
        let nudge = (offset / band as f64) * (band - k + 1) as f64;

        let up = hovered as f64 + k as f64;
        positions[(hovered + k) % count] = place(center, orbit, step * up + nudge);

        let down = hovered as f64 - k as f64;
        positions[(hovered + count - k) % count] = place(center, orbit, step * down - nudge);
    }
}

/// Hovered icons grow as the pointer approaches them, between 1x and 2x.
pub fn hover_scale(distance_to_icon: f64, radius: f64, item_size: f64) -> f64 {
    let reach = radius * ICON_REACH;
    if distance_to_icon > reach {
        return 1.0;
    }
    ((reach - distance_to_icon + item_size * 0.5).abs() * 0.025).clamp(1.0, 2.0)
}

/// The quick action grows once the pointer is inside half the item orbit.
pub fn quick_action_scale(distance_to_center: f64, radius: f64, item_size: f64) -> f64 {
    let orbit = radius - item_size;
    if distance_to_center > orbit * 0.5 {
        return 1.0;
    }
    ((radius - distance_to_center - item_size * 0.25) * 0.007).clamp(1.0, 2.0)
}

/// Painter's order with the hovered item last.
pub fn draw_order(count: usize, hovered: Option<usize>) -> impl Iterator<Item = usize> {
    let shift = hovered.map_or(0, |h| h + 1);
    (0..count).map(move |k| (k + shift) % count)
}
