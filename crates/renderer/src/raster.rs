// SPDX-License-Identifier: MIT

//!
//! Exporting the calendar as an image
//!

use crate::{FilledBox, Scene, TextOut};
use ab_glyph::{Font, FontRef, InvalidFont, PxScale, ScaleFont, point};
use eframe::egui::{FontDefinitions, FontFamily};
use image::{ImageOutputFormat, Rgb, RgbImage};
use life_calendar_core::Colour;
use log::info;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Exported images are drawn at this multiple of the on-screen size
pub const EXPORT_SCALE: f64 = 2.0;

/// Errors that can arise while exporting an image
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Error: image export is not available.")]
    NoRasteriser,

    #[error("Error: the calendar has not been drawn yet.")]
    EmptyScene,

    #[error("Error: no font is available to draw the calendar's text.")]
    NoFont,

    #[error("Font error: {0}")]
    Font(#[from] InvalidFont),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Implementing types turn a [`Scene`] into encoded image bytes
pub trait Rasteriser {
    /// Paint the scene and encode it
    fn rasterise(&self, scene: &Scene) -> Result<Vec<u8>, ExportError>;
}

/// Paints scenes into PNGs using the `image` crate.  Text is drawn in egui's
/// default proportional font.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRasteriser;

impl Rasteriser for ImageRasteriser {
    fn rasterise(&self, scene: &Scene) -> Result<Vec<u8>, ExportError> {
        let width = scene.width.ceil() as u32;
        let height = scene.height.ceil() as u32;
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyScene);
        }
        let mut image = RgbImage::from_pixel(width, height, rgb(scene.background));
        for filled_box in &scene.boxes {
            paint_box(&mut image, filled_box);
        }
        paint_texts(&mut image, &scene.texts)?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
        Ok(bytes)
    }
}

/// Rasterise the scene and write it to `path`.  Nothing is written unless
/// rasterising succeeds.
pub fn export_png(
    scene: &Scene,
    rasteriser: Option<&dyn Rasteriser>,
    path: &Path,
) -> Result<(), ExportError> {
    let rasteriser = rasteriser.ok_or(ExportError::NoRasteriser)?;
    let bytes = rasteriser.rasterise(scene)?;
    fs::write(path, bytes)?;
    info!("Exported image to {}", path.display());
    Ok(())
}

fn rgb(colour: Colour) -> Rgb<u8> {
    Rgb(colour.into())
}

/// The pixel range covering `start..start + length`, clipped to `0..limit`
fn pixel_range(start: f64, length: f64, limit: u32) -> std::ops::Range<u32> {
    let from = start.round().clamp(0.0, f64::from(limit)) as u32;
    let to = (start + length).round().clamp(0.0, f64::from(limit)) as u32;
    from..to
}

fn paint_box(image: &mut RgbImage, filled_box: &FilledBox) {
    let rect = filled_box.position_and_size;
    let xs = pixel_range(rect.position.x, rect.width, image.width());
    let ys = pixel_range(rect.position.y, rect.height, image.height());
    let fill = rgb(filled_box.fill_colour);

    // Borders are drawn inside the box, at least a pixel thick
    let border = filled_box
        .border_style
        .map(|style| (rgb(style.colour), style.thickness.round().max(1.0) as u32));

    for y in ys.clone() {
        for x in xs.clone() {
            let colour = match border {
                Some((colour, thickness))
                    if x < xs.start + thickness
                        || x + thickness >= xs.end
                        || y < ys.start + thickness
                        || y + thickness >= ys.end =>
                {
                    colour
                }
                _ => fill,
            };
            image.put_pixel(x, y, colour);
        }
    }
}

/// Paint the texts on top of everything else
fn paint_texts(image: &mut RgbImage, texts: &[TextOut]) -> Result<(), ExportError> {
    if texts.is_empty() {
        return Ok(());
    }
    let fonts = FontDefinitions::default();
    let font_data = fonts
        .families
        .get(&FontFamily::Proportional)
        .and_then(|names| names.first())
        .and_then(|name| fonts.font_data.get(name))
        .ok_or(ExportError::NoFont)?;
    let font = FontRef::try_from_slice_and_index(&font_data.font, font_data.index)?;
    for text in texts {
        paint_text(image, &font, text);
    }
    Ok(())
}

/// Lay the glyphs out along a single line from the text's top left, blending
/// each into the image by how much of the pixel it covers
fn paint_text(image: &mut RgbImage, font: &FontRef<'_>, text: &TextOut) {
    let scaled = font.as_scaled(PxScale::from(text.font_size as f32));
    let colour = rgb(text.colour);
    let mut caret = point(text.top_left.x as f32, text.top_left.y as f32 + scaled.ascent());
    let mut previous = None;
    for c in text.text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(previous) = previous {
            caret.x += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scaled.scale(), caret);
        caret.x += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|x, y, coverage| {
            let x = bounds.min.x as i64 + i64::from(x);
            let y = bounds.min.y as i64 + i64::from(y);
            let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                return;
            };
            if x >= image.width() || y >= image.height() {
                return;
            }
            let pixel = image.get_pixel_mut(x, y);
            *pixel = blend(*pixel, colour, coverage);
        });
    }
}

fn blend(under: Rgb<u8>, over: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let coverage = coverage.clamp(0.0, 1.0);
    let mix = |under: u8, over: u8| {
        (f32::from(under) * (1.0 - coverage) + f32::from(over) * coverage).round() as u8
    };
    Rgb([
        mix(under.0[0], over.0[0]),
        mix(under.0[1], over.0[1]),
        mix(under.0[2], over.0[2]),
    ])
}
