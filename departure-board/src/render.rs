//! Board rendering.
//!
//! The display device itself is a collaborator: anything that can
//! measure and draw text behind the [`Surface`] trait. Devices are
//! constructed explicitly by the caller and passed in; the renderer
//! holds no process-wide display state. A character-cell
//! [`ConsoleSurface`] is provided for headless runs and tests.

use crate::board::DepartureRow;
use crate::config::Config;

/// Ellipsis appended when a line is truncated.
const ELLIPSIS: char = '…';

/// A drawable text surface in abstract pixel units.
pub trait Surface {
    /// Drawable width.
    fn width(&self) -> u32;

    /// Drawable height.
    fn height(&self) -> u32;

    /// Rendered width of `text` on this surface.
    fn measure(&self, text: &str) -> u32;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: u32, y: u32, text: &str);
}

/// Display options read from the `ui` config section.
#[derive(Debug, Clone)]
pub struct UiOptions {
    /// Path to the regular font, if configured.
    pub font_path: Option<String>,
    /// Path to the bold font, if configured.
    pub font_bold_path: Option<String>,
    /// Font size in points.
    pub font_size: u32,
    /// Vertical advance per row.
    pub line_height: u32,
    /// Left margin for every row.
    pub left_margin: u32,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            font_path: None,
            font_bold_path: None,
            font_size: 22,
            line_height: 24,
            left_margin: 4,
        }
    }
}

impl UiOptions {
    /// Read options from the `ui` section, defaulting field by field.
    pub fn from_config(cfg: &Config) -> Self {
        let defaults = Self::default();
        Self {
            font_path: cfg.str_at("ui.font_path").map(String::from),
            font_bold_path: cfg.str_at("ui.font_bold_path").map(String::from),
            font_size: dimension(cfg.i64_or("ui.font_size", defaults.font_size as i64)),
            line_height: dimension(cfg.i64_or("ui.line_height", defaults.line_height as i64)),
            left_margin: dimension(cfg.i64_or("ui.left_margin", defaults.left_margin as i64)),
        }
    }
}

fn dimension(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Draws departure rows onto a surface, one line per row.
#[derive(Debug, Clone)]
pub struct BoardRenderer {
    ui: UiOptions,
}

impl BoardRenderer {
    /// Create a renderer with the given UI options.
    pub fn new(ui: UiOptions) -> Self {
        Self { ui }
    }

    /// Draw rows top to bottom, truncating each line to the surface
    /// width and stopping before a line would overflow the height.
    pub fn draw(&self, surface: &mut dyn Surface, rows: &[DepartureRow]) {
        let line_height = self.ui.line_height.max(1);
        let mut y = 0;

        for row in rows {
            let line = format_row(row);
            let line = trim_to_width(surface, &line, surface.width());
            surface.draw_text(self.ui.left_margin, y, &line);

            y += line_height;
            if y + line_height > surface.height() {
                break;
            }
        }
    }
}

/// One board line: expected time, identity label, destination.
fn format_row(row: &DepartureRow) -> String {
    format!(
        "{:>5}  {:<7}  {}",
        row.expt_arrival, row.display_text, row.destination
    )
}

/// Truncate `text` so it fits in `max_width`, replacing the tail with an
/// ellipsis. Binary search over the character count keeps this cheap for
/// surfaces with expensive measurement.
fn trim_to_width(surface: &dyn Surface, text: &str, max_width: u32) -> String {
    if surface.measure(text) <= max_width {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let (mut lo, mut hi) = (0usize, chars.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        let mut candidate: String = chars[..mid].iter().collect();
        candidate.push(ELLIPSIS);
        if surface.measure(&candidate) <= max_width {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    let keep = hi.saturating_sub(1);
    let mut out: String = chars[..keep].iter().collect();
    out.push(ELLIPSIS);
    out
}

/// A character-cell surface: each character is one unit wide, each row
/// `cell_height` units tall.
#[derive(Debug, Clone)]
pub struct ConsoleSurface {
    columns: u32,
    cell_height: u32,
    lines: Vec<String>,
}

impl ConsoleSurface {
    /// A surface of `columns` x `rows` character cells. `cell_height`
    /// maps the renderer's pixel-style line height onto rows.
    pub fn new(columns: u32, rows: u32, cell_height: u32) -> Self {
        Self {
            columns,
            cell_height: cell_height.max(1),
            lines: vec![String::new(); rows as usize],
        }
    }

    /// The rendered lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Surface for ConsoleSurface {
    fn width(&self) -> u32 {
        self.columns
    }

    fn height(&self) -> u32 {
        self.lines.len() as u32 * self.cell_height
    }

    fn measure(&self, text: &str) -> u32 {
        text.chars().count() as u32
    }

    fn draw_text(&mut self, x: u32, y: u32, text: &str) {
        let row = (y / self.cell_height) as usize;
        if let Some(line) = self.lines.get_mut(row) {
            *line = format!("{}{}", " ".repeat(x as usize), text);
        }
    }
}
