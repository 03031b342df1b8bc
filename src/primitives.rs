//! Drawing helpers shared by the layout routines.
//!
//! Every helper that places content vertically takes the cursor `y` and hands
//! back the cursor for whatever comes next, so routines thread one value
//! through the page instead of recomputing heights.

use tracing::trace;

use crate::canvas::{Canvas, Paint};
use crate::font::{self, FontFace};
use crate::types::{Color, Mm};

pub const MARGIN_LEFT: i32 = 14;
pub const TOP_MARGIN: i32 = 15;
/// Distance from the bottom edge below which body content is not placed.
pub const BOTTOM_RESERVE: i32 = 20;

pub const CELL_PADDING: i32 = 5;
pub const TABLE_LINE_HEIGHT: i32 = 10;
pub const LABEL_COLUMN_WIDTH: i32 = 50;
pub const VALUE_COLUMN_WIDTH: i32 = 130;
/// Values longer than this many characters are wrapped, and no wrapped line
/// holds more than this many.
pub const WRAP_THRESHOLD: usize = 40;
pub const WRAPPED_LINE_ADVANCE: i32 = 5;
const TABLE_FONT_SIZE: f32 = 10.0;

pub const HEADING_ADVANCE: i32 = 8;
const HEADING_FONT_SIZE: f32 = 16.0;

pub const BULLET_ADVANCE: i32 = 7;
const BULLET_FONT_SIZE: f32 = 11.0;
const BULLET_TEXT_INDENT: i32 = 10;
const BULLET_GLYPH: &str = "\u{2022}";

const RULE_GRAY: u8 = 200;
const STRIPE_GRAY: u8 = 240;

fn mm(value: i32) -> Mm {
    Mm::from_i32(value)
}

/// Lowest baseline body content may use on the current page.
pub fn content_bottom(canvas: &Canvas) -> Mm {
    canvas.page_size().height - mm(BOTTOM_RESERVE)
}

/// Starts a new page when `needed` more millimetres would run past the
/// content bottom. Returns the cursor to continue from.
pub fn ensure_room(canvas: &mut Canvas, y: Mm, needed: Mm) -> Mm {
    if y + needed <= content_bottom(canvas) {
        return y;
    }
    canvas.add_page();
    trace!(page = canvas.current_page() + 1, "page break");
    mm(TOP_MARGIN)
}

/// Horizontal rule from margin to margin.
pub fn draw_divider(canvas: &mut Canvas, y: Mm) {
    let right = canvas.page_size().width - mm(MARGIN_LEFT);
    canvas.set_stroke_color(Color::gray(RULE_GRAY));
    canvas.line(mm(MARGIN_LEFT), y, right, y);
}

pub fn draw_section_heading(canvas: &mut Canvas, title: &str, y: Mm) -> Mm {
    canvas.set_font(FontFace::HelveticaBold, HEADING_FONT_SIZE);
    canvas.set_text_color(Color::BLACK);
    canvas.text(title, mm(MARGIN_LEFT), y);
    y + mm(HEADING_ADVANCE)
}

/// Bullet glyph at the margin with the text indented after it. A text too
/// wide for the page wraps, each extra line adding a wrapped-line advance.
pub fn draw_bullet(canvas: &mut Canvas, text: &str, y: Mm) -> Mm {
    canvas.set_font(FontFace::Helvetica, BULLET_FONT_SIZE);
    canvas.set_text_color(Color::BLACK);
    canvas.text(BULLET_GLYPH, mm(MARGIN_LEFT), y);

    let x = mm(MARGIN_LEFT + BULLET_TEXT_INDENT);
    let max_width = canvas.page_size().width - x - mm(MARGIN_LEFT);
    let lines = font::split_text_to_size(FontFace::Helvetica, BULLET_FONT_SIZE, text, max_width);
    let mut line_y = y;
    for line in &lines {
        canvas.text(line.as_str(), x, line_y);
        line_y += mm(WRAPPED_LINE_ADVANCE);
    }
    y + mm(BULLET_ADVANCE) + mm(WRAPPED_LINE_ADVANCE) * (lines.len() as i32 - 1)
}

/// Left-aligned lines at the margin, `advance` apart, in the current font.
/// Breaks to a new page when a line would fall below the content bottom.
pub fn draw_text_lines(canvas: &mut Canvas, lines: &[String], y: Mm, advance: Mm) -> Mm {
    let mut y = y;
    for line in lines {
        y = ensure_room(canvas, y, Mm::ZERO);
        canvas.text(line.as_str(), mm(MARGIN_LEFT), y);
        y += advance;
    }
    y
}

/// Value-column lines for one table cell.
pub fn wrap_cell_value(value: &str) -> Vec<String> {
    if value.chars().count() <= WRAP_THRESHOLD {
        return vec![value.to_string()];
    }
    let width = mm(VALUE_COLUMN_WIDTH - 2 * CELL_PADDING);
    font::split_text_with_limit(
        FontFace::Helvetica,
        TABLE_FONT_SIZE,
        value,
        width,
        Some(WRAP_THRESHOLD),
    )
}

pub fn row_height(line_count: usize) -> Mm {
    let extra = line_count.saturating_sub(1) as i32;
    mm(TABLE_LINE_HEIGHT) + mm(WRAPPED_LINE_ADVANCE) * extra
}

/// Two-column striped table with an accent header row. Returns the bottom
/// edge of the last row.
pub fn draw_table(canvas: &mut Canvas, rows: &[(&str, String)], start_y: Mm, accent: Color) -> Mm {
    let x = mm(MARGIN_LEFT);
    let value_x = x + mm(LABEL_COLUMN_WIDTH);
    let table_width = mm(LABEL_COLUMN_WIDTH + VALUE_COLUMN_WIDTH);
    let line_height = mm(TABLE_LINE_HEIGHT);
    let text_drop = line_height - mm(CELL_PADDING);

    canvas.set_font(FontFace::Helvetica, TABLE_FONT_SIZE);
    canvas.set_fill_color(accent);
    canvas.rect(x, start_y, table_width, line_height, Paint::Fill);
    canvas.set_text_color(Color::WHITE);
    canvas.text("Field", x + mm(CELL_PADDING), start_y + text_drop);
    canvas.text("Value", value_x + mm(CELL_PADDING), start_y + text_drop);
    canvas.set_text_color(Color::BLACK);

    let mut y = start_y + line_height;
    for (index, (label, value)) in rows.iter().enumerate() {
        let lines = wrap_cell_value(value);
        let height = row_height(lines.len());
        y = ensure_room(canvas, y, height);

        if index % 2 == 0 {
            canvas.set_fill_color(Color::gray(STRIPE_GRAY));
            canvas.rect(x, y, table_width, height, Paint::Fill);
        }
        canvas.set_stroke_color(Color::gray(RULE_GRAY));
        canvas.rect(x, y, mm(LABEL_COLUMN_WIDTH), height, Paint::Stroke);
        canvas.rect(value_x, y, mm(VALUE_COLUMN_WIDTH), height, Paint::Stroke);

        canvas.text(*label, x + mm(CELL_PADDING), y + text_drop);
        let mut line_y = y + text_drop;
        for line in lines {
            canvas.text(line, value_x + mm(CELL_PADDING), line_y);
            line_y += mm(WRAPPED_LINE_ADVANCE);
        }
        y += height;
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::types::Size;

    // Top and height of every stroked label cell, in drawing order.
    fn label_cells(canvas: Canvas) -> Vec<(usize, Mm, Mm)> {
        let doc = canvas.finish();
        let mut cells = Vec::new();
        for (page_index, page) in doc.pages.iter().enumerate() {
            for cmd in &page.commands {
                if let Command::DrawRect {
                    x,
                    y,
                    width,
                    height,
                    paint: Paint::Stroke,
                } = cmd
                {
                    if *x == mm(MARGIN_LEFT) && *width == mm(LABEL_COLUMN_WIDTH) {
                        cells.push((page_index, *y, *height));
                    }
                }
            }
        }
        cells
    }

    #[test]
    fn short_values_use_single_line_rows() {
        let mut canvas = Canvas::new(Size::a4());
        let rows = [("Name", "Leanne Graham".to_string()), ("Email", "a@b.c".to_string())];
        let end = draw_table(&mut canvas, &rows, mm(35), Color::rgb8(59, 130, 246));
        assert_eq!(end, mm(35 + 10 + 2 * 10));
    }

    #[test]
    fn long_values_wrap_and_rows_stay_contiguous() {
        let catch_phrase = "Synergized scalable moderators for all next generation sites";
        assert_eq!(catch_phrase.chars().count(), 60);
        let rows = [
            ("Company", "Romaguera-Crona".to_string()),
            ("Company Catch Phrase", catch_phrase.to_string()),
            ("Business", "harness real-time e-markets".to_string()),
        ];
        let mut canvas = Canvas::new(Size::a4());
        let end = draw_table(&mut canvas, &rows, mm(35), Color::BLACK);
        let cells = label_cells(canvas);
        assert_eq!(cells.len(), 3);

        let (_, _, single) = cells[0];
        let (_, _, wrapped) = cells[1];
        assert_eq!(single, row_height(1));
        assert!(wrapped > single);

        for pair in cells.windows(2) {
            let (_, top, height) = pair[0];
            let (_, next_top, _) = pair[1];
            assert_eq!(top + height, next_top);
        }
        let (_, last_top, last_height) = cells[2];
        assert_eq!(end, last_top + last_height);
    }

    #[test]
    fn wrapped_value_lines_respect_the_character_limit() {
        let value = "a".repeat(25) + " " + &"b".repeat(25) + " " + &"c".repeat(25);
        let lines = wrap_cell_value(&value);
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|line| line.chars().count() <= WRAP_THRESHOLD));
    }

    #[test]
    fn exactly_forty_characters_do_not_wrap() {
        let value = "x".repeat(WRAP_THRESHOLD);
        assert_eq!(wrap_cell_value(&value), vec![value]);
    }

    #[test]
    fn blank_values_render_as_empty_cells() {
        let mut canvas = Canvas::new(Size::a4());
        let end = draw_table(&mut canvas, &[("Website", String::new())], mm(35), Color::BLACK);
        assert_eq!(end, mm(55));
        let doc = canvas.finish();
        assert!(doc.pages[0].text_runs().any(|t| t.is_empty()));
    }

    #[test]
    fn tables_continue_on_a_new_page() {
        let rows: Vec<(&str, String)> = (0..30).map(|i| ("Row", format!("value {i}"))).collect();
        let mut canvas = Canvas::new(Size::a4());
        draw_table(&mut canvas, &rows, mm(35), Color::BLACK);
        assert_eq!(canvas.page_count(), 2);
        let cells = label_cells(canvas);
        let first_on_second_page = cells.iter().find(|(page, _, _)| *page == 1).unwrap();
        assert_eq!(first_on_second_page.1, mm(TOP_MARGIN));
        for (_, top, height) in &cells {
            assert!(*top + *height <= Size::a4().height - mm(BOTTOM_RESERVE));
        }
    }

    #[test]
    fn heading_and_bullet_advance_by_fixed_steps() {
        let mut canvas = Canvas::new(Size::a4());
        assert_eq!(draw_section_heading(&mut canvas, "Skills", mm(100)), mm(108));
        assert_eq!(draw_bullet(&mut canvas, "SEO/SEM", mm(110)), mm(117));
        let doc = canvas.finish();
        assert_eq!(doc.pages[0].baseline_of(BULLET_GLYPH), Some(mm(110)));
        assert_eq!(doc.pages[0].baseline_of("SEO/SEM"), Some(mm(110)));
    }

    #[test]
    fn divider_spans_the_margins() {
        let mut canvas = Canvas::new(Size::a4());
        draw_divider(&mut canvas, mm(120));
        let doc = canvas.finish();
        let commands = &doc.pages[0].commands;
        assert!(commands.contains(&Command::MoveTo { x: mm(14), y: mm(120) }));
        assert!(commands.contains(&Command::LineTo { x: mm(196), y: mm(120) }));
        assert!(commands.contains(&Command::SetStrokeColor(Color::gray(200))));
    }
}
