// SPDX-License-Identifier: MIT

//!
//! The `life-calendar-renderer` engine
//!

mod colours;
mod events;
mod heading;
mod layout_params;
mod point;
mod primitives;
mod tooltip;

pub(crate) use layout_params::MeasuredLayoutParams;

pub use colours::*;
pub use events::*;
pub use heading::*;
pub use layout_params::{GridLayoutParams, PositionAndSize, RowShape};
pub use point::*;
pub use primitives::*;
pub use tooltip::*;

use life_calendar_core::{Anchor, Colour, EraStore, Granularity, TimeCursor, resolve};
use log::{debug, trace};

/// The gap between a block and the label of the era it starts
const LABEL_OFFSET: f64 = 1.0;

/// The space between the heading's title and description
const HEADING_LINE_SPACING: f64 = 4.0;

/// The title is drawn this many times larger than the rest of the text
const TITLE_FONT_SCALE: f64 = 2.0;

/// The description is drawn this many times larger than the rest of the text
const DESCRIPTION_FONT_SCALE: f64 = 1.2;

/// An era being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    /// The anchor of the era being dragged
    source: Anchor,

    /// The index of the block the drag started on
    origin: usize,
}

/// The core `life-calendar-renderer` engine.  This manages the layout of
/// blocks, labels and headings, and turns pointer input into interaction
/// events, for every frontend (e.g. the `egui` frontend and image export)
pub struct Engine {
    /// The function supplied to the engine that it can use to measure text.
    ///
    /// The engine passes the function the pixel font size and the string, and
    /// the function returns the width and height of the text.
    ///
    /// i.e. `function(font_size, text) -> (width, height)`
    measure_text_fn: Box<dyn Fn(f64, String) -> (f64, f64)>,

    /// The granularity of the blocks
    granularity: Granularity,

    /// These fixed params can be set directly
    layout_params: GridLayoutParams,

    /// These layout parameters are measured using the `measure_text_fn`
    measured_layout_params: MeasuredLayoutParams,

    /// The calendar's colours
    colours: GridColours,

    /// The "Life in ..." heading
    heading: Option<Heading>,

    /// Every block, in canonical order, as laid out by the last render pass
    cells: Vec<CellOut>,

    /// The labels at the start of the rows
    row_labels: Vec<TextOut>,

    /// The size of the whole calendar (heading, grid, labels and padding)
    size: Size,

    /// All interaction events that an external programme might be interested in
    interaction_events: Vec<GridInteractionEvent>,

    /// The era currently being dragged (if any)
    drag: Option<Drag>,

    /// The index of the block the pointer is over (if any)
    hovered: Option<usize>,

    /// The index of the block a dragged era is over (if any)
    drop_target: Option<usize>,
}

impl Engine {
    /// Create a new engine.  Pass in a function that the engine can call to
    /// measure text
    pub fn new<T>(measure_text_fn: T) -> Self
    where
        T: 'static + Fn(f64, String) -> (f64, f64),
    {
        Self {
            measure_text_fn: Box::new(measure_text_fn),
            granularity: Granularity::Weeks,
            layout_params: GridLayoutParams::for_granularity(Granularity::Weeks),
            measured_layout_params: MeasuredLayoutParams::default(),
            colours: GridColours::default(),
            heading: None,
            cells: Vec::new(),
            row_labels: Vec::new(),
            size: Size::default(),
            interaction_events: Vec::new(),
            drag: None,
            hovered: None,
            drop_target: None,
        }
    }

    /// Get the granularity of the blocks
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Switch granularity (this also switches to that granularity's default
    /// layout).  Takes effect on the next [`render`].
    ///
    /// [`render`]: Engine::render
    pub fn set_granularity(&mut self, granularity: Granularity) {
        if granularity != self.granularity {
            debug!("engine set granularity {granularity:?}");
            self.granularity = granularity;
            self.layout_params = GridLayoutParams::for_granularity(granularity);
        }
    }

    pub fn layout_params(&self) -> GridLayoutParams {
        self.layout_params
    }

    /// Takes effect on the next [`render`].
    ///
    /// [`render`]: Engine::render
    pub fn set_layout_params(&mut self, layout_params: GridLayoutParams) {
        self.layout_params = layout_params;
    }

    /// Get the calendar colours
    pub fn colours(&self) -> GridColours {
        self.colours
    }

    /// Takes effect on the next [`render`].
    ///
    /// [`render`]: Engine::render
    pub fn set_colours(&mut self, colours: GridColours) {
        debug!("engine set colours");
        self.colours = colours;
    }

    /// The size of the whole calendar
    pub fn size(&self) -> Size {
        self.size
    }

    /// The "Life in ..." heading (available after the first render)
    pub fn heading(&self) -> Option<&Heading> {
        self.heading.as_ref()
    }

    /// The number of blocks laid out by the last render
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Calculate the width of the string
    fn str_width(&self, font_size: f64, str: &str) -> f64 {
        (self.measure_text_fn)(font_size, str.to_string()).0
    }

    /// Calculate the height of the string
    fn str_height(&self, font_size: f64, str: &str) -> f64 {
        (self.measure_text_fn)(font_size, str.to_string()).1
    }

    fn update_measured_layout_params(&mut self, shape: RowShape) {
        let font_size = self.layout_params.font_size_px;
        self.measured_layout_params.label_height = self.str_height(font_size, "lpfHT");
        self.measured_layout_params.row_label_width = (0..shape.row_count())
            .filter_map(|row| shape.row_label(self.granularity, row))
            .map(|label| self.str_width(font_size, &label))
            .fold(0.0, f64::max);
    }

    /// The height of an era label's box
    fn label_box_height(&self) -> f64 {
        self.measured_layout_params.label_height + (2.0 * self.layout_params.label_padding)
    }

    /// Re-run every calculation: resolve the eras at the current granularity
    /// and lay out every block, label, and heading.
    ///
    /// This is a full pass: labels alternate above and below their blocks
    /// starting afresh (with "above") every time.  Any drag in progress is
    /// dropped.
    pub fn render(&mut self, store: &EraStore, birth_year: i32, cursor: &TimeCursor) {
        let shape = RowShape::of(self.granularity);
        self.update_measured_layout_params(shape);
        self.drag = None;
        self.hovered = None;
        self.drop_target = None;

        let params = self.layout_params;
        let heading = self.build_heading();
        let heading_bottom = heading.description.top_left.y
            + self.str_height(heading.description.font_size, &heading.description.text);
        self.heading = Some(heading);

        // Leave room for labels above the first row
        let grid_top = heading_bottom + params.padding + self.label_box_height() + LABEL_OFFSET;
        let grid_left =
            params.padding + self.measured_layout_params.row_label_width + params.row_label_margin;
        let column_pitch = params.cell_size + params.cell_gap;
        let row_pitch = params.cell_size + params.row_gap;

        // Row labels
        let label_height = self.measured_layout_params.label_height;
        self.row_labels = (0..shape.row_count())
            .filter_map(|row| {
                let text = shape.row_label(self.granularity, row)?;
                let width = self.str_width(params.font_size_px, &text);
                let y = grid_top + f64::from(row) * row_pitch;
                Some(TextOut {
                    top_left: Point {
                        x: params.padding + self.measured_layout_params.row_label_width - width,
                        y: y + (params.cell_size - label_height) / 2.0,
                    },
                    text,
                    colour: self.colours.row_label_text_colour,
                    font_size: params.font_size_px,
                })
            })
            .collect();

        // Blocks
        let blocks = resolve(store, self.granularity, cursor);
        let blocks_per_year = self.granularity.blocks_per_year();
        let mut era_start_count = 0;
        let mut cells = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let (row, column) =
                shape.row_and_column(block.year, block.index_in_year, blocks_per_year);
            let position_and_size = PositionAndSize {
                position: Point {
                    x: grid_left + f64::from(column) * column_pitch,
                    y: grid_top + f64::from(row) * row_pitch,
                },
                width: params.cell_size,
                height: params.cell_size,
            };
            let era_colour = block.era.map(|era| era.colour());
            let cell_box = FilledBox {
                position_and_size,
                fill_colour: self.cell_fill_colour(era_colour, block.is_past),
                border_style: if block.is_era_start() {
                    self.colours.cell.era_start_border
                } else if block.is_past {
                    self.colours.cell.past_border
                } else {
                    None
                },
            };
            let label = block.start_label().map(|text| {
                let placement = if era_start_count % 2 == 0 {
                    LabelPlacement::Above
                } else {
                    LabelPlacement::Below
                };
                era_start_count += 1;
                self.place_label(text, placement, &position_and_size)
            });
            cells.push(CellOut {
                anchor: block.anchor,
                year: block.year,
                index_in_year: block.index_in_year,
                cell_box,
                is_past: block.is_past,
                is_era_start: block.is_era_start(),
                is_hovered_over: false,
                drag_source: block.drag_source(),
                current_label: store
                    .get(&block.anchor)
                    .map(|era| era.label().to_string())
                    .unwrap_or_default(),
                label,
                tooltip: tooltip_text(block, birth_year),
            });
        }
        self.cells = cells;

        // Overall size
        let grid_width = f64::from(shape.cells_per_row) * column_pitch - params.cell_gap;
        let grid_height = f64::from(shape.row_count()) * row_pitch - params.row_gap;
        let heading_width = self.heading.as_ref().map_or(0.0, |heading| {
            let title = self.str_width(heading.title.font_size, &heading.title.text);
            let description =
                self.str_width(heading.description.font_size, &heading.description.text);
            params.padding + title.max(description)
        });
        self.size = Size {
            x: (grid_left + grid_width).max(heading_width) + params.padding,
            y: grid_top + grid_height + LABEL_OFFSET + self.label_box_height() + params.padding,
        };
        debug!(
            "rendered {} block(s) with {era_start_count} era label(s) ({:?})",
            self.cells.len(),
            self.granularity
        );
    }

    fn build_heading(&self) -> Heading {
        let params = self.layout_params;
        let title_font_size = params.font_size_px * TITLE_FONT_SCALE;
        let title = self.granularity.title();
        let title_height = self.str_height(title_font_size, &title);
        Heading {
            title: TextOut {
                top_left: Point {
                    x: params.padding,
                    y: params.padding,
                },
                text: title,
                colour: self.colours.heading_text_colour,
                font_size: title_font_size,
            },
            description: TextOut {
                top_left: Point {
                    x: params.padding,
                    y: params.padding + title_height + HEADING_LINE_SPACING,
                },
                text: self.granularity.description(),
                colour: self.colours.heading_text_colour,
                font_size: params.font_size_px * DESCRIPTION_FONT_SCALE,
            },
        }
    }

    fn cell_fill_colour(&self, era_colour: Option<Colour>, is_past: bool) -> Colour {
        match (era_colour, is_past) {
            (Some(colour), _) => colour,
            (None, true) => self.colours.cell.past_empty_fill_colour,
            (None, false) => self.colours.cell.empty_fill_colour,
        }
    }

    /// Centre a label horizontally over (or under) a block
    fn place_label(
        &self,
        text: String,
        placement: LabelPlacement,
        cell: &PositionAndSize,
    ) -> CellLabel {
        let params = self.layout_params;
        let text_width = self.str_width(params.font_size_px, &text);
        let box_width = text_width + (2.0 * params.label_padding);
        let box_height = self.label_box_height();
        let x = cell.position.x + (cell.width - box_width) / 2.0;
        let y = match placement {
            LabelPlacement::Above => cell.position.y - LABEL_OFFSET - box_height,
            LabelPlacement::Below => cell.max_y() + LABEL_OFFSET,
        };
        CellLabel {
            placement,
            text: TextOut {
                top_left: Point {
                    x: x + params.label_padding,
                    y: y + params.label_padding,
                },
                text,
                colour: self.colours.label.text_colour,
                font_size: params.font_size_px,
            },
            text_box: FilledBox {
                position_and_size: PositionAndSize {
                    position: Point { x, y },
                    width: box_width,
                    height: box_height,
                },
                fill_colour: self.colours.label.text_box.fill_colour,
                border_style: self.colours.label.text_box.border,
            },
        }
    }

    /// Get all information needed to draw (and interact with) the blocks,
    /// with hover & drag styling applied
    pub fn cells_for_drawing(&self) -> Vec<CellOut> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let mut cell = cell.clone();
                if self.hovered == Some(index) {
                    cell.is_hovered_over = true;
                    match self.colours.cell.hover_colour {
                        CellColourModifier::Lighten => {
                            cell.cell_box.fill_colour =
                                Colour::lightened_colour(cell.cell_box.fill_colour);
                        }
                    }
                }
                if self.drop_target == Some(index) {
                    cell.cell_box.border_style = Some(self.colours.cell.drop_target_border);
                }
                cell
            })
            .collect()
    }

    /// Get all information needed to draw the era labels.  These are to be
    /// drawn after (on top of) the blocks.
    pub fn labels_for_drawing(&self) -> Vec<CellLabel> {
        self.cells
            .iter()
            .filter_map(|cell| cell.label.clone())
            .collect()
    }

    /// Get all information needed to draw the row labels
    pub fn row_labels_for_drawing(&self) -> Vec<TextOut> {
        self.row_labels.clone()
    }

    /// The index of the block at the point (if any).  Era labels are drawn on
    /// top of the blocks and stand for the block they belong to, the last
    /// drawn taking precedence.  The gaps between blocks belong to no block.
    fn cell_index_at(&self, point: Point) -> Option<usize> {
        self.label_owner_at(point).or_else(|| {
            self.cells
                .iter()
                .position(|cell| cell.cell_box.position_and_size.contains(point))
        })
    }

    /// The index of the block whose era label is at the point (if any)
    fn label_owner_at(&self, point: Point) -> Option<usize> {
        self.cells.iter().rposition(|cell| {
            cell.label
                .as_ref()
                .is_some_and(|label| label.text_box.position_and_size.contains(point))
        })
    }

    /// The block at the point (if any)
    pub fn cell_at(&self, point: Point) -> Option<&CellOut> {
        self.cell_index_at(point).map(|index| &self.cells[index])
    }

    /// The tooltip of the block at the point (if any)
    pub fn tooltip_at(&self, point: Point) -> Option<&str> {
        self.cell_at(point).map(|cell| cell.tooltip.as_str())
    }

    /// The pointer moved (`None` if it left the calendar)
    pub fn hover_at(&mut self, point: Option<Point>) {
        let hovered = point.and_then(|point| self.cell_index_at(point));
        if hovered != self.hovered {
            if let Some(index) = hovered {
                self.interaction_events
                    .push(GridInteractionEvent::Hover(self.cells[index].anchor));
            }
            self.hovered = hovered;
        }
    }

    /// Activate the block at the point (if any)
    pub fn click_at(&mut self, point: Point) {
        if let Some(cell) = self.cell_at(point) {
            trace!("click on {}", cell.anchor);
            let event = GridInteractionEvent::Activate {
                anchor: cell.anchor,
                current_label: cell.current_label.clone(),
            };
            self.interaction_events.push(event);
        }
    }

    /// Start dragging the era shown as starting in the block at the point.
    /// Returns whether there was such an era.
    pub fn drag_start_at(&mut self, point: Point) -> bool {
        self.drag = self.cell_index_at(point).and_then(|index| {
            self.cells[index]
                .drag_source
                .map(|source| Drag { source, origin: index })
        });
        if let Some(drag) = self.drag {
            trace!("drag start from {}", drag.source);
        }
        self.drag.is_some()
    }

    /// The anchor of the era being dragged (if any)
    pub fn drag_source(&self) -> Option<Anchor> {
        self.drag.map(|drag| drag.source)
    }

    /// A dragged era moved (`None` if it left the calendar)
    pub fn drag_over(&mut self, point: Option<Point>) {
        self.drop_target = match self.drag {
            Some(drag) => point
                .and_then(|point| self.cell_index_at(point))
                .filter(|index| *index != drag.origin),
            None => None,
        };
    }

    /// Drop the dragged era onto the block at the point.  Dropping outside
    /// every block, back onto the block the drag started on, or onto the
    /// era's own anchor does nothing.
    pub fn drop_at(&mut self, point: Option<Point>) {
        self.drop_target = None;
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Some(index) = point.and_then(|point| self.cell_index_at(point)) else {
            trace!("drop outside the grid ignored");
            return;
        };
        let target = self.cells[index].anchor;
        if index == drag.origin || target == drag.source {
            trace!("drop onto the source ignored");
            return;
        }
        self.interaction_events.push(GridInteractionEvent::Move {
            source: drag.source,
            target,
        });
    }

    /// Abandon any drag in progress
    pub fn cancel_drag(&mut self) {
        self.drag = None;
        self.drop_target = None;
    }

    /// Get all events for dispatching & handling
    pub fn drain_interaction_events(&mut self) -> std::vec::Drain<'_, GridInteractionEvent> {
        self.interaction_events.drain(..)
    }

    /// Everything drawn, scaled by the factor, for painting onto an image.
    /// Hover & drag styling is left out.
    pub fn scene(&self, scale: f64) -> Scene {
        let scale_box = |filled_box: &FilledBox| FilledBox {
            position_and_size: filled_box.position_and_size.scaled(scale),
            fill_colour: filled_box.fill_colour,
            border_style: filled_box.border_style.map(|style| LineStyle {
                colour: style.colour,
                thickness: style.thickness * scale,
            }),
        };
        let scale_text = |text: &TextOut| TextOut {
            top_left: text.top_left.scaled(scale),
            text: text.text.clone(),
            colour: text.colour,
            font_size: text.font_size * scale,
        };

        let mut boxes: Vec<FilledBox> = self
            .cells
            .iter()
            .map(|cell| scale_box(&cell.cell_box))
            .collect();
        let mut texts: Vec<TextOut> = self.row_labels.iter().map(scale_text).collect();
        if let Some(heading) = &self.heading {
            texts.push(scale_text(&heading.title));
            texts.push(scale_text(&heading.description));
        }
        for label in self.cells.iter().filter_map(|cell| cell.label.as_ref()) {
            boxes.push(scale_box(&label.text_box));
            texts.push(scale_text(&label.text));
        }
        Scene {
            width: self.size.x * scale,
            height: self.size.y * scale,
            background: self.colours.background,
            boxes,
            texts,
        }
    }
}
