use crate::draw::{DrawImage, DrawSurface, DrawText, ImageId, TextAlign};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

pub const ICON_SIZE: i32 = 128;
pub const FONT_SIZE: f64 = 14.0;
const OUTLINE_WIDTH: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginLayer(String),
    EndLayer,
    Image(DrawImage),
    Text(DrawText),
}

/// Draw calls of one frame, replayed by the drawing area whenever GTK asks for a redraw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList(Vec<DrawOp>);

impl DisplayList {
    pub fn ops(&self) -> &[DrawOp] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl DrawSurface for DisplayList {
    fn begin_layer(&mut self, id: &str) {
        self.0.push(DrawOp::BeginLayer(id.to_string()));
    }

    fn end_layer(&mut self) {
        self.0.push(DrawOp::EndLayer);
    }

    fn image(&mut self, image: DrawImage) {
        self.0.push(DrawOp::Image(image));
    }

    fn text(&mut self, text: DrawText) {
        self.0.push(DrawOp::Text(text));
    }
}

/// Icons loaded once per path. Failures are remembered so they are not retried every frame.
#[derive(Default)]
pub struct IconCache(HashMap<PathBuf, Option<Pixbuf>>);

impl IconCache {
    pub fn get(&mut self, path: &Path) -> Option<&Pixbuf> {
        self.0
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                Pixbuf::from_file_at_size(path, ICON_SIZE, ICON_SIZE)
                    .map_err(|e| log::error!("Failed to load icon {}: {}", path.display(), e))
                    .ok()
            })
            .as_ref()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

fn set_source(cr: &Context, color: Srgba<f64>, alpha: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * alpha);
}

pub struct CairoPainter<'a> {
    cr: &'a Context,
    icons: &'a mut IconCache,
    colors: &'a ThemeColors,
}

impl<'a> CairoPainter<'a> {
    pub fn new(cr: &'a Context, icons: &'a mut IconCache, colors: &'a ThemeColors) -> Self {
        Self { cr, icons, colors }
    }

    pub fn paint(&mut self, display: &DisplayList) -> Result<(), cairo::Error> {
        for op in display.ops() {
            match op {
                DrawOp::BeginLayer(_) => self.cr.save()?,
                DrawOp::EndLayer => self.cr.restore()?,
                DrawOp::Image(image) => self.image(image)?,
                DrawOp::Text(text) => self.text(text)?,
            }
        }
        Ok(())
    }

    fn image(&mut self, image: &DrawImage) -> Result<(), cairo::Error> {
        if image.alpha <= 0.0 {
            return Ok(());
        }

        let cr = self.cr;
        let (w, h) = (image.size.width, image.size.height);

        cr.save()?;
        cr.translate(image.center.x, image.center.y);
        cr.rotate(image.rotation);

        match &image.image {
            ImageId::RingBackground => {
                set_source(cr, self.colors.background, image.alpha);
                cr.arc(0.0, 0.0, w / 2.0, 0.0, 2.0 * PI);
                cr.fill()?;
            }
            ImageId::RingCenter => {
                let line_width = (w * 0.08).max(2.0);
                set_source(cr, image.tint, image.alpha);
                cr.set_line_width(line_width);
                cr.arc(0.0, 0.0, (w - line_width) / 2.0, 0.0, 2.0 * PI);
                cr.stroke()?;
            }
            ImageId::Arrow => {
                // points along +x before rotation
                set_source(cr, image.tint, image.alpha);
                cr.move_to(-w / 2.0, -h / 2.0);
                cr.line_to(w / 2.0, 0.0);
                cr.line_to(-w / 2.0, h / 2.0);
                cr.close_path();
                cr.fill()?;
            }
            ImageId::SelectionBackground => {
                set_source(cr, image.tint, image.alpha * 0.35);
                cr.arc(0.0, 0.0, w.min(h) / 2.0, 0.0, 2.0 * PI);
                cr.fill()?;
            }
            ImageId::Icon(path) => {
                if let Some(pixbuf) = self.icons.get(path) {
                    let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
                    let scale = (w / pw).min(h / ph);
                    cr.scale(scale, scale);
                    cr.set_source_pixbuf(pixbuf, -pw / 2.0, -ph / 2.0);
                    cr.paint_with_alpha(image.alpha)?;
                }
            }
        }

        cr.restore()
    }

    fn text(&mut self, text: &DrawText) -> Result<(), cairo::Error> {
        let cr = self.cr;
        cr.save()?;
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(FONT_SIZE * text.scale);

        let ext = cr.text_extents(&text.text)?;
        let x = match text.align {
            TextAlign::Centered => text.position.x - ext.width() / 2.0 - ext.x_bearing(),
            TextAlign::Left => text.position.x,
        };
        let y = text.position.y - ext.y_bearing() - ext.height() / 2.0;

        cr.move_to(x, y);
        cr.text_path(&text.text);
        set_source(cr, text.outline, text.color.alpha);
        cr.set_line_width(OUTLINE_WIDTH);
        cr.stroke_preserve()?;
        set_source(cr, text.color, 1.0);
        cr.fill()?;

        cr.restore()
    }
}
