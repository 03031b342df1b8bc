use crate::branding::Branding;
use crate::canvas::Canvas;
use crate::font::FontFace;
use crate::modern;
use crate::primitives::{self, ensure_room};
use crate::record::{FlatProfile, RichProfile};
use crate::template::LayoutRoutine;
use crate::types::{Color, Mm};

/// First body baseline below the company header.
pub const BODY_START_Y: i32 = 35;

const SECTION_TITLE_SIZE: f32 = 14.0;
const SECTION_TITLE_ADVANCE: i32 = 10;
const SECTION_LINE_SIZE: f32 = 10.0;
const SECTION_LINE_ADVANCE: i32 = 7;
const SECTION_GAP: i32 = 8;

const PLAIN_LINE_SIZE: f32 = 12.0;
const PLAIN_LINE_ADVANCE: i32 = 10;

/// A titled group of `Label: value` lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl Section {
    fn new(title: &'static str, lines: Vec<String>) -> Self {
        Self { title, lines }
    }
}

/// Draws the body of `routine` from the current page onward. Decoration
/// (header, watermark, footers) belongs to the assembler.
pub fn draw_body(routine: LayoutRoutine<'_>, canvas: &mut Canvas, branding: &Branding) {
    let start = Mm::from_i32(BODY_START_Y);
    match routine {
        LayoutRoutine::FlatTable(p) => {
            primitives::draw_table(canvas, &flat_table_rows(p), start, branding.primary);
        }
        LayoutRoutine::RichTable(p) => {
            primitives::draw_table(canvas, &rich_table_rows(p), start, branding.primary);
        }
        LayoutRoutine::FlatSectioned(p) => {
            draw_sections(canvas, &flat_sections(p), start, branding.primary);
        }
        LayoutRoutine::RichSectioned(p) => {
            draw_sections(canvas, &rich_sections(p), start, branding.primary);
        }
        LayoutRoutine::FlatPlain(p) => {
            draw_plain(canvas, &flat_plain_lines(p), start);
        }
        LayoutRoutine::RichPlain(p) => {
            draw_plain(canvas, &rich_plain_lines(p), start);
        }
        LayoutRoutine::Modern(p) => modern::draw_modern(canvas, p, branding),
    }
}

pub fn flat_table_rows(p: &FlatProfile) -> Vec<(&'static str, String)> {
    vec![
        ("Name", p.name.clone()),
        ("Username", p.username.clone()),
        ("Email", p.email.clone()),
        ("Phone", p.phone.clone()),
        ("Website", p.website.clone()),
        ("Address", p.full_address()),
        ("Company", p.company.name.clone()),
        ("Company Catch Phrase", p.company.catch_phrase.clone()),
        ("Business", p.company.bs.clone()),
    ]
}

pub fn rich_table_rows(p: &RichProfile) -> Vec<(&'static str, String)> {
    vec![
        ("Name", p.full_name()),
        ("Gender", p.gender.clone()),
        ("Email", p.email.clone()),
        ("Phone", p.phone.clone()),
        ("Cell", p.cell.clone()),
        ("Address", p.full_address()),
        ("Date of Birth", p.birth_date()),
        ("Age", p.dob.age.to_string()),
        ("Nationality", p.nat.clone()),
    ]
}

pub fn flat_sections(p: &FlatProfile) -> Vec<Section> {
    vec![
        Section::new(
            "Personal Information",
            vec![
                format!("Name: {}", p.name),
                format!("Username: {}", p.username),
                format!("Email: {}", p.email),
                format!("Phone: {}", p.phone),
                format!("Website: {}", p.website),
            ],
        ),
        Section::new(
            "Address",
            vec![
                format!("Street: {}", p.address.street),
                format!("Suite: {}", p.address.suite),
                format!("City: {}", p.address.city),
                format!("Zipcode: {}", p.address.zipcode),
            ],
        ),
        Section::new(
            "Company",
            vec![
                format!("Name: {}", p.company.name),
                format!("Catch Phrase: {}", p.company.catch_phrase),
                format!("Business: {}", p.company.bs),
            ],
        ),
    ]
}

pub fn rich_sections(p: &RichProfile) -> Vec<Section> {
    vec![
        Section::new(
            "Personal Information",
            vec![
                format!("Name: {}", p.full_name()),
                format!("Gender: {}", p.gender),
                format!("Email: {}", p.email),
                format!("Phone: {}", p.phone),
                format!("Cell: {}", p.cell),
                format!("Date of Birth: {} (Age: {})", p.birth_date(), p.dob.age),
                format!("Nationality: {}", p.nat),
            ],
        ),
        Section::new(
            "Address",
            vec![
                format!("Street: {}", p.street_line()),
                format!("City: {}", p.location.city),
                format!("State: {}", p.location.state),
                format!("Country: {}", p.location.country),
                format!("Postcode: {}", p.location.postcode),
            ],
        ),
        Section::new(
            "Account",
            vec![
                format!("Username: {}", p.login.username),
                format!(
                    "Registered: {} ({} years)",
                    p.registered_date(),
                    p.registered.age
                ),
            ],
        ),
    ]
}

pub fn flat_plain_lines(p: &FlatProfile) -> Vec<String> {
    vec![
        format!("Name: {}", p.name),
        format!("Username: {}", p.username),
        format!("Email: {}", p.email),
        format!("Phone: {}", p.phone),
        format!("Website: {}", p.website),
        format!("Address: {}", p.full_address()),
        format!("Company: {}", p.company.name),
        format!("Company Catch Phrase: {}", p.company.catch_phrase),
        format!("Business: {}", p.company.bs),
    ]
}

pub fn rich_plain_lines(p: &RichProfile) -> Vec<String> {
    vec![
        format!("Name: {}", p.full_name()),
        format!("Gender: {}", p.gender),
        format!("Email: {}", p.email),
        format!("Phone: {}", p.phone),
        format!("Cell: {}", p.cell),
        format!("Address: {}", p.full_address()),
        format!("Date of Birth: {} (Age: {})", p.birth_date(), p.dob.age),
        format!("Nationality: {}", p.nat),
    ]
}

/// Stacked sections: accent title, then lines 7 apart, then a gap before the
/// next title. Returns the cursor after the last section.
pub fn draw_sections(canvas: &mut Canvas, sections: &[Section], start_y: Mm, accent: Color) -> Mm {
    let mut y = start_y;
    for section in sections {
        y = ensure_room(canvas, y, Mm::from_i32(SECTION_TITLE_ADVANCE));
        canvas.set_font(FontFace::Helvetica, SECTION_TITLE_SIZE);
        canvas.set_text_color(accent);
        canvas.text(section.title, Mm::from_i32(primitives::MARGIN_LEFT), y);
        y += Mm::from_i32(SECTION_TITLE_ADVANCE);

        canvas.set_font(FontFace::Helvetica, SECTION_LINE_SIZE);
        canvas.set_text_color(Color::BLACK);
        y = primitives::draw_text_lines(
            canvas,
            &section.lines,
            y,
            Mm::from_i32(SECTION_LINE_ADVANCE),
        );
        y += Mm::from_i32(SECTION_GAP);
    }
    y
}

pub fn draw_plain(canvas: &mut Canvas, lines: &[String], start_y: Mm) -> Mm {
    canvas.set_font(FontFace::Helvetica, PLAIN_LINE_SIZE);
    canvas.set_text_color(Color::BLACK);
    primitives::draw_text_lines(canvas, lines, start_y, Mm::from_i32(PLAIN_LINE_ADVANCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Size;

    fn flat() -> FlatProfile {
        let mut p = FlatProfile {
            name: "Leanne Graham".to_string(),
            username: "Bret".to_string(),
            email: "Sincere@april.biz".to_string(),
            ..FlatProfile::default()
        };
        p.address.street = "Kulas Light".to_string();
        p.address.suite = "Apt. 556".to_string();
        p.address.city = "Gwenborough".to_string();
        p.address.zipcode = "92998-3874".to_string();
        p.company.name = "Romaguera-Crona".to_string();
        p
    }

    fn mm(v: i32) -> Mm {
        Mm::from_i32(v)
    }

    #[test]
    fn flat_table_lists_fields_in_form_order() {
        let labels: Vec<&str> = flat_table_rows(&flat()).iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            [
                "Name",
                "Username",
                "Email",
                "Phone",
                "Website",
                "Address",
                "Company",
                "Company Catch Phrase",
                "Business"
            ]
        );
    }

    #[test]
    fn rich_table_lists_demographics() {
        let labels: Vec<&str> = rich_table_rows(&RichProfile::default())
            .iter()
            .map(|(l, _)| *l)
            .collect();
        assert_eq!(
            labels,
            [
                "Name",
                "Gender",
                "Email",
                "Phone",
                "Cell",
                "Address",
                "Date of Birth",
                "Age",
                "Nationality"
            ]
        );
    }

    #[test]
    fn sections_are_spaced_by_line_and_gap_advances() {
        let mut canvas = Canvas::new(Size::a4());
        let end = draw_sections(&mut canvas, &flat_sections(&flat()), mm(35), Color::BLACK);
        let doc = canvas.finish();
        let page = &doc.pages[0];
        assert_eq!(page.baseline_of("Personal Information"), Some(mm(35)));
        assert_eq!(page.baseline_of("Name: Leanne Graham"), Some(mm(45)));
        assert_eq!(page.baseline_of("Website: "), Some(mm(45 + 4 * 7)));
        // Last line of a section to the next title is 15.
        assert_eq!(page.baseline_of("Address"), Some(mm(45 + 4 * 7 + 15)));
        assert_eq!(end, mm(35 + 3 * (10 + 8) + (5 + 4 + 3) * 7));
    }

    #[test]
    fn rich_sections_include_the_account_group() {
        let titles: Vec<&str> = rich_sections(&RichProfile::default())
            .iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["Personal Information", "Address", "Account"]);
    }

    #[test]
    fn plain_lines_are_ten_apart_from_the_body_start() {
        let mut canvas = Canvas::new(Size::a4());
        let lines = flat_plain_lines(&flat());
        let end = draw_plain(&mut canvas, &lines, mm(BODY_START_Y));
        assert_eq!(end, mm(35 + 9 * 10));
        let doc = canvas.finish();
        assert_eq!(doc.pages[0].baseline_of("Username: Bret"), Some(mm(45)));
        assert_eq!(
            doc.pages[0].baseline_of("Address: Kulas Light, Apt. 556, Gwenborough, 92998-3874"),
            Some(mm(85))
        );
    }

    #[test]
    fn section_titles_use_the_accent_color() {
        let accent = Color::rgb8(0x3b, 0x82, 0xf6);
        let mut canvas = Canvas::new(Size::a4());
        draw_sections(&mut canvas, &flat_sections(&flat()), mm(35), accent);
        let doc = canvas.finish();
        let commands = &doc.pages[0].commands;
        assert!(commands.contains(&crate::canvas::Command::SetFillColor(accent)));
    }
}
