// SPDX-License-Identifier: MIT

//!
//! The egui frontend
//!

use crate::{
    Engine, FilledBox, GridColours, GridInteractionEvent, Point, PositionAndSize, Scene, TextOut,
};
use eframe::egui::{
    Align2, Color32, Context, CursorIcon, FontId, Painter, Pos2, Rect, Sense, Stroke, StrokeKind,
    Ui, Vec2,
};
use life_calendar_core::{Colour, EraStore, Granularity, TimeCursor};
use log::*;

/// The life calendar renderer for native `egui` applications
pub struct LifeCalendarRendererEgui {
    /// The underlying calendar [`Engine`].
    engine: Engine,
}

impl LifeCalendarRendererEgui {
    /// Create a new egui renderer
    pub fn new(ctx: &Context) -> Self {
        info!("Constructing a new EguiRenderer");
        let ctx_clone = ctx.clone();
        let text_measurer =
            move |font_size, text| measure_text_fn(ctx_clone.clone(), font_size, text);
        Self {
            engine: Engine::new(text_measurer),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.engine.granularity()
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.engine.set_granularity(granularity);
    }

    pub fn colours(&self) -> GridColours {
        self.engine.colours()
    }

    pub fn set_colours(&mut self, colours: GridColours) {
        if colours != self.engine.colours() {
            debug!("egui renderer set colours");
            self.engine.set_colours(colours)
        }
    }

    /// Re-resolve & lay out the whole calendar
    pub fn render(&mut self, store: &EraStore, birth_year: i32, cursor: &TimeCursor) {
        self.engine.render(store, birth_year, cursor);
    }

    pub fn drain_interaction_events(&mut self) -> std::vec::Drain<'_, GridInteractionEvent> {
        self.engine.drain_interaction_events()
    }

    /// Everything drawn, scaled, for exporting as an image
    pub fn scene(&self, scale: f64) -> Scene {
        self.engine.scene(scale)
    }

    pub fn draw(&mut self, ui: &mut Ui) {
        draw_calendar(ui, &mut self.engine);
    }
}

/// Function supplied to the [`Engine`] so that it can measure text (used in its
/// calculations)
fn measure_text_fn(ctx: Context, font_size: f64, text: String) -> (f64, f64) {
    let text_galley = ctx.fonts_mut(|f| {
        f.layout_no_wrap(text, FontId::proportional(font_size as f32), Color32::BLACK)
    });
    let text_width: f64 = text_galley.rect.width().into();
    let text_height: f64 = text_galley.rect.height().into();
    (text_width, text_height)
}

/// Draw the calendar in an `egui` application, and feed pointer input back to
/// the engine
fn draw_calendar(ui: &mut Ui, engine: &mut Engine) {
    let size = engine.size();
    let (painter_response, painter) = ui.allocate_painter(
        Vec2::new(size.x as f32, size.y as f32),
        Sense::click_and_drag(),
    );
    let canvas_rect = painter_response.rect;
    let canvas_min = canvas_rect.min.to_vec2();
    let to_engine_point = |pos: Pos2| {
        let pos = pos - canvas_min;
        Point::new(pos.x.into(), pos.y.into())
    };

    // The pointer, if it's over the calendar
    let pointer = ui
        .input(|i| i.pointer.latest_pos())
        .filter(|pos| canvas_rect.contains(*pos))
        .map(to_engine_point);

    // Drag an era from one block to another
    if painter_response.drag_started() {
        let origin = painter_response
            .interact_pointer_pos()
            .map(to_engine_point)
            .or(pointer);
        if let Some(origin) = origin {
            engine.drag_start_at(origin);
        }
    }
    if painter_response.dragged() && engine.drag_source().is_some() {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        engine.drag_over(pointer);
    }
    if painter_response.drag_stopped() {
        engine.drop_at(pointer);
    }

    // Activate a block
    if painter_response.clicked() {
        if let Some(point) = painter_response.interact_pointer_pos().map(to_engine_point) {
            engine.click_at(point);
        }
    }

    // Hover over a block
    engine.hover_at(painter_response.hover_pos().map(to_engine_point));

    // Background
    painter.rect(
        canvas_rect,
        0.0,
        renderer_colour_to_egui_colour(engine.colours().background),
        Stroke::NONE,
        StrokeKind::Inside,
    );

    // Heading
    if let Some(heading) = engine.heading() {
        draw_text(&painter, &heading.title, canvas_min);
        draw_text(&painter, &heading.description, canvas_min);
    }

    // Row labels
    for row_label in engine.row_labels_for_drawing() {
        draw_text(&painter, &row_label, canvas_min);
    }

    // Blocks
    for cell in engine.cells_for_drawing() {
        draw_filled_box(&painter, &cell.cell_box, canvas_min);
    }

    // Era labels (on top of the blocks they overhang)
    for label in engine.labels_for_drawing() {
        draw_filled_box(&painter, &label.text_box, canvas_min);
        draw_text(&painter, &label.text, canvas_min);
    }

    // Tooltip
    if engine.drag_source().is_none() {
        if let Some(tooltip) = pointer.and_then(|point| engine.tooltip_at(point)) {
            painter_response.on_hover_text_at_pointer(tooltip.to_string());
        }
    }
}

fn draw_filled_box(painter: &Painter, filled_box: &FilledBox, canvas_min: Vec2) {
    let (min, max) = renderer_position_and_size_to_min_and_max_egui_pos2(
        &filled_box.position_and_size,
    );
    let rect = Rect::from_two_pos(min + canvas_min, max + canvas_min);
    let stroke = match filled_box.border_style {
        Some(border_style) => Stroke::new(
            border_style.thickness as f32,
            renderer_colour_to_egui_colour(border_style.colour),
        ),
        None => Stroke::NONE,
    };
    painter.rect(
        rect,
        0.0,
        renderer_colour_to_egui_colour(filled_box.fill_colour),
        stroke,
        StrokeKind::Inside,
    );
}

fn draw_text(painter: &Painter, text: &TextOut, canvas_min: Vec2) {
    let pos = Pos2::new(text.top_left.x as f32, text.top_left.y as f32);
    painter.text(
        pos + canvas_min,
        Align2::LEFT_TOP,
        &text.text,
        FontId::proportional(text.font_size as f32),
        renderer_colour_to_egui_colour(text.colour),
    );
}

/// Convert a [`Colour`] to a [`Color32`]
fn renderer_colour_to_egui_colour(colour: Colour) -> Color32 {
    let (r, g, b) = colour.as_rgb();
    Color32::from_rgb(r, g, b)
}

/// Convert a [`PositionAndSize`] into min and max [`Pos2`]s
fn renderer_position_and_size_to_min_and_max_egui_pos2(
    position_and_size: &PositionAndSize,
) -> (Pos2, Pos2) {
    let min = Pos2::new(
        position_and_size.position.x as f32,
        position_and_size.position.y as f32,
    );
    let max = Pos2::new(
        position_and_size.max_x() as f32,
        position_and_size.max_y() as f32,
    );
    (min, max)
}
