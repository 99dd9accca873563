use super::{BACKGROUND_EXTENT, CENTER_EXTENT, SELECTION_BACKGROUND_SCALE};
use crate::draw::{DrawImage, DrawSurface, ImageId};
use crate::geometry::{Point, Size, rotate};
use palette::Srgba;

pub fn draw_background(surface: &mut dyn DrawSurface, center: Point, radius: f64, alpha: f64) {
    let extent = radius * BACKGROUND_EXTENT;
    surface.image(
        DrawImage::new(ImageId::RingBackground, center, Size::square(extent * 2.0)).with_alpha(alpha),
    );
}

pub fn draw_center(surface: &mut dyn DrawSurface, center: Point, radius: f64, tint: Srgba<f64>) {
    let extent = radius * CENTER_EXTENT;
    surface.image(
        DrawImage::new(ImageId::RingCenter, center, Size::square(extent * 2.0)).tinted(tint),
    );
}

/// Arrow hugging the centre ring, pointing at `pointer`.
pub fn draw_arrow(
    surface: &mut dyn DrawSurface,
    center: Point,
    pointer: Point,
    radius: f64,
    tint: Srgba<f64>,
) {
    let extent = radius * CENTER_EXTENT;
    let angle = pointer.screen_angle(center);
    let position = center + rotate(Point::new(extent, 0.0), angle);

    surface.image(
        DrawImage::new(ImageId::Arrow, position, Size::new(extent * 0.6, extent))
            .rotated(angle)
            .tinted(tint),
    );
}

pub fn draw_selection_background(
    surface: &mut dyn DrawSurface,
    position: Point,
    item_size: Size,
    scale: f64,
    tint: Srgba<f64>,
    alpha: f64,
) {
    let size = item_size.scaled(scale * SELECTION_BACKGROUND_SCALE);
    surface.image(
        DrawImage::new(ImageId::SelectionBackground, position, size)
            .tinted(tint)
            .with_alpha(alpha),
    );
}
