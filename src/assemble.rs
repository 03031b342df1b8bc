//! Decoration around a layout body: the company header, the diagonal
//! watermark, and the `Page i of N` footers that can only be written once the
//! body has settled its page count.

use chrono::NaiveDate;
use tracing::trace;

use crate::branding::Branding;
use crate::canvas::{Canvas, Document};
use crate::font::FontFace;
use crate::layout;
use crate::record::short_date;
use crate::template::LayoutRoutine;
use crate::types::{Color, Mm, Size};

pub const WATERMARK_SUBTYPE: &str = "Watermark";

const TITLE_SIZE: f32 = 20.0;
const TITLE_Y: i32 = 15;
const SUBTITLE: &str = "User Profile";
const SUBTITLE_SIZE: f32 = 16.0;
const SUBTITLE_Y: i32 = 25;

const FOOTER_SIZE: f32 = 8.0;
const FOOTER_FROM_BOTTOM: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkPlacement {
    /// Stamped once, under the body of the first page.
    FirstPage,
    /// Stamped over the body of every page.
    EveryPage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    pub text: String,
    pub placement: WatermarkPlacement,
    pub font_size: f32,
    pub color: Color,
    pub opacity: f32,
    pub rotation_deg: f32,
    /// Baseline midpoint, from the top of the page.
    pub center_y: Mm,
}

impl WatermarkSpec {
    pub fn first_page(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placement: WatermarkPlacement::FirstPage,
            font_size: 40.0,
            color: Color::gray(230),
            opacity: 1.0,
            rotation_deg: 45.0,
            center_y: Mm::from_i32(150),
        }
    }

    pub fn every_page(text: impl Into<String>) -> Self {
        Self {
            placement: WatermarkPlacement::EveryPage,
            color: Color::gray(150),
            opacity: 0.35,
            ..Self::first_page(text)
        }
    }

    /// The variant a template uses, or `None` when branding turns it off.
    pub fn for_template(routine: &LayoutRoutine<'_>, branding: &Branding) -> Option<Self> {
        if !branding.include_watermark {
            return None;
        }
        let spec = if routine.template().is_modern() {
            Self::every_page(&branding.company_name)
        } else {
            Self::first_page(&branding.company_name)
        };
        Some(spec)
    }
}

pub fn footer_text(generated_on: NaiveDate, page_number: usize, total_pages: usize) -> String {
    format!(
        "Generated on {} | Page {} of {}",
        short_date(generated_on),
        page_number,
        total_pages
    )
}

/// Runs one complete render onto a fresh canvas.
pub fn assemble(
    routine: LayoutRoutine<'_>,
    branding: &Branding,
    page_size: Size,
    generated_on: NaiveDate,
) -> Document {
    let mut canvas = Canvas::new(page_size);
    let template = routine.template();
    canvas.meta("profile.template", template.as_str());
    let watermark = WatermarkSpec::for_template(&routine, branding);

    if !template.is_modern() {
        draw_header(&mut canvas, branding);
        if let Some(spec) = &watermark {
            draw_watermark(&mut canvas, spec);
        }
    }

    layout::draw_body(routine, &mut canvas, branding);

    if let Some(spec) = watermark.as_ref().filter(|s| s.placement == WatermarkPlacement::EveryPage) {
        for index in 0..canvas.page_count() {
            canvas.set_page(index);
            draw_watermark(&mut canvas, spec);
        }
    }

    apply_page_footers(&mut canvas, generated_on);
    canvas.finish()
}

/// Company name in the primary color over a black subtitle, first page only.
pub fn draw_header(canvas: &mut Canvas, branding: &Branding) {
    let cx = canvas.page_size().width / 2;
    canvas.set_font(FontFace::Helvetica, TITLE_SIZE);
    canvas.set_text_color(branding.primary);
    canvas.text_centered(branding.company_name.as_str(), cx, Mm::from_i32(TITLE_Y));
    canvas.set_font_size(SUBTITLE_SIZE);
    canvas.set_text_color(Color::BLACK);
    canvas.text_centered(SUBTITLE, cx, Mm::from_i32(SUBTITLE_Y));
}

/// Draws `spec` on the current page as a tagged artifact. Pen state is
/// restored afterwards.
pub fn draw_watermark(canvas: &mut Canvas, spec: &WatermarkSpec) {
    let cx = canvas.page_size().width / 2;
    canvas.begin_artifact(Some(WATERMARK_SUBTYPE.to_string()));
    canvas.save_state();
    if spec.opacity < 1.0 {
        canvas.set_opacity(spec.opacity);
    }
    canvas.set_font(FontFace::Helvetica, spec.font_size);
    canvas.set_text_color(spec.color);
    canvas.text_rotated_centered(spec.text.as_str(), cx, spec.center_y, spec.rotation_deg);
    canvas.restore_state();
    canvas.end_marked_content();
}

/// Writes the footer on every page. Must run after the body so the total is final.
pub fn apply_page_footers(canvas: &mut Canvas, generated_on: NaiveDate) {
    let total_pages = canvas.page_count();
    let size = canvas.page_size();
    let cx = size.width / 2;
    let y = size.height - Mm::from_i32(FOOTER_FROM_BOTTOM);
    for index in 0..total_pages {
        canvas.set_page(index);
        canvas.set_font(FontFace::Helvetica, FOOTER_SIZE);
        canvas.set_text_color(Color::BLACK);
        canvas.text_centered(footer_text(generated_on, index + 1, total_pages), cx, y);
    }
    trace!(total_pages, "footers applied");
}
