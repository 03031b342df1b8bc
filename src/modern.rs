//! The modern profile: a gradient header band with decorative circles, then
//! a résumé-style body of About, Experience, Skills and Education.

use tracing::trace;

use crate::branding::Branding;
use crate::canvas::{Canvas, Paint};
use crate::font::{self, FontFace};
use crate::primitives::{self, MARGIN_LEFT, TOP_MARGIN};
use crate::record::RichProfile;
use crate::types::{Color, Mm, Shading};

const BAND_HEIGHT: i32 = 60;
// Share of white blended into the primary color at the band's right edge.
const BAND_TINT: f32 = 0.6;

const ROLE_LINE: &str = "Marketing Specialist | Strategic Campaigns & Digital Marketing Expert";
const ABOUT_TEXT: &str = "Marketing professional with 7+ years of experience in digital strategies, \
content creation, and social media management. Proven ability to increase brand visibility, \
drive customer engagement, and deliver ROI-focused campaigns.";
const ABOUT_WIDTH: i32 = 180;
const ABOUT_SIZE: f32 = 11.0;
const ABOUT_LEADING: i32 = 7;

const EXPERIENCE_ROLE: &str = "Marketing Specialist";
const ACHIEVEMENTS: [&str; 3] = [
    "Developed and led digital marketing strategies for 20+ clients.",
    "Boosted client engagement by 30% with content and SEO strategies.",
    "Increased social media followers by 25%.",
];
const SKILLS: [&str; 6] = [
    "Digital Marketing",
    "SEO/SEM",
    "Social Media Management",
    "Content Creation",
    "Google Analytics",
    "Copy Writer",
];
const DEGREE: &str = "B.Sc. in Marketing";
const SCHOOL: &str = "University of California, Los Angeles (UCLA) | 2010 - 2014";

/// First body baseline below the header band.
pub const BODY_START_Y: i32 = 80;

fn mm(value: i32) -> Mm {
    Mm::from_i32(value)
}

pub fn contact_line(p: &RichProfile) -> String {
    format!(
        "{}, {} | {} | {}",
        p.location.city, p.location.state, p.email, p.phone
    )
}

pub fn about_lines() -> Vec<String> {
    font::split_text_to_size(FontFace::Helvetica, ABOUT_SIZE, ABOUT_TEXT, mm(ABOUT_WIDTH))
}

/// Band across the top of the first page: an axial gradient from the primary
/// color to a lighter tint, three white circles and a grid of dots.
pub fn draw_gradient_header(canvas: &mut Canvas, primary: Color) {
    let width = canvas.page_size().width;
    canvas.save_state();
    canvas.clip_rect(Mm::ZERO, Mm::ZERO, width, mm(BAND_HEIGHT));
    canvas.shading_fill(Shading::Axial {
        x0: Mm::ZERO,
        y0: Mm::ZERO,
        x1: width,
        y1: Mm::ZERO,
        from: primary,
        to: primary.mix(Color::WHITE, BAND_TINT),
    });
    canvas.restore_state();

    canvas.set_fill_color(Color::WHITE);
    canvas.set_stroke_color(Color::WHITE);
    canvas.circle(mm(20), mm(20), mm(15), Paint::Fill);
    canvas.circle(width - mm(20), mm(20), mm(8), Paint::Fill);
    canvas.circle(width - mm(40), mm(40), mm(5), Paint::Fill);

    for row in 0..5 {
        for col in 0..10 {
            let cx = width - mm(50) + mm(col * 5);
            let cy = mm(20 + row * 5);
            canvas.circle(cx, cy, mm(1), Paint::Fill);
        }
    }
}

pub fn draw_modern(canvas: &mut Canvas, p: &RichProfile, branding: &Branding) {
    draw_gradient_header(canvas, branding.primary);

    // Photo placeholder.
    canvas.set_fill_color(Color::WHITE);
    canvas.circle(mm(45), mm(35), mm(25), Paint::Fill);

    canvas.set_text_color(Color::BLACK);
    canvas.set_font(FontFace::HelveticaBold, 24.0);
    canvas.text(p.full_name(), mm(MARGIN_LEFT), mm(35));
    canvas.set_font(FontFace::Helvetica, 12.0);
    canvas.text(ROLE_LINE, mm(MARGIN_LEFT), mm(45));
    canvas.text(contact_line(p), mm(MARGIN_LEFT), mm(55));

    let mut y = primitives::draw_section_heading(canvas, "About", mm(BODY_START_Y));
    canvas.set_font(FontFace::Helvetica, ABOUT_SIZE);
    let lines = about_lines();
    let mut line_y = y;
    for line in &lines {
        canvas.text(line.as_str(), mm(MARGIN_LEFT), line_y);
        line_y += mm(ABOUT_LEADING);
    }
    y += mm(ABOUT_LEADING) * lines.len() as i32 + mm(10);

    primitives::draw_divider(canvas, y);
    y += mm(15);

    y = primitives::draw_section_heading(canvas, "Experience", y);
    canvas.set_font(FontFace::HelveticaBold, 14.0);
    y += mm(10);
    canvas.text(EXPERIENCE_ROLE, mm(MARGIN_LEFT), y);
    y += mm(10);
    for (index, achievement) in ACHIEVEMENTS.iter().enumerate() {
        if index > 0 {
            y += mm(2);
        }
        y = primitives::draw_bullet(canvas, achievement, y);
    }

    y += mm(10);
    primitives::draw_divider(canvas, y);
    y += mm(10);
    y = primitives::draw_section_heading(canvas, "Skills", y);
    for skill in SKILLS {
        y += mm(2);
        y = primitives::draw_bullet(canvas, skill, y);
    }

    y += mm(10);
    primitives::draw_divider(canvas, y);
    y += mm(30);

    if y >= canvas.page_size().height {
        canvas.add_page();
        trace!(cursor_mm = y.to_f32(), "education moved to a new page");
        y = mm(TOP_MARGIN);
    }

    y = primitives::draw_section_heading(canvas, "Education", y);
    canvas.set_font(FontFace::HelveticaBold, 12.0);
    y += mm(10);
    canvas.text(DEGREE, mm(MARGIN_LEFT), y);
    canvas.set_font(FontFace::Helvetica, 12.0);
    y += mm(7);
    canvas.text(SCHOOL, mm(MARGIN_LEFT), y);
}
