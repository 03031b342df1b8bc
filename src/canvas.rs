use crate::font::{self, FontFace};
use crate::types::{Color, Mm, Shading, Size};

/// Paint operator for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    // Non-rendered metadata used by layout tests and page reports. Ignored by the PDF writer.
    Meta {
        key: String,
        value: String,
    },
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(Mm),
    // Applies both fill and stroke alpha (ca/CA). Values outside 0..1 are clamped.
    SetOpacity(f32),
    SetFontFace(FontFace),
    // Points, not millimetres.
    SetFontSize(f32),
    ClipRect {
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
    },
    // Paint a shading over the current clip (/<name> sh).
    ShadingFill(Shading),
    MoveTo {
        x: Mm,
        y: Mm,
    },
    LineTo {
        x: Mm,
        y: Mm,
    },
    Stroke,
    DrawRect {
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
        paint: Paint,
    },
    DrawCircle {
        cx: Mm,
        cy: Mm,
        radius: Mm,
        paint: Paint,
    },
    // `y` is the text baseline. `rotation` is counter-clockwise, in degrees.
    DrawString {
        x: Mm,
        y: Mm,
        text: String,
        rotation: f32,
    },
    BeginArtifact {
        subtype: Option<String>,
    },
    EndMarkedContent,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Every string drawn on the page, in drawing order.
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::DrawString { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Baseline of the first string equal to `text`.
    pub fn baseline_of(&self, text: &str) -> Option<Mm> {
        self.commands.iter().find_map(|cmd| match cmd {
            Command::DrawString { text: t, y, .. } if t == text => Some(*y),
            _ => None,
        })
    }

    pub fn artifact_count(&self, subtype: &str) -> usize {
        self.commands
            .iter()
            .filter(|cmd| {
                matches!(cmd, Command::BeginArtifact { subtype: Some(s) } if s == subtype)
            })
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// What the current page's command stream has already set. Reset per page so a
// page never depends on state emitted on another page.
#[derive(Debug, Clone, Default)]
struct EmittedState {
    fill: Option<Color>,
    stroke: Option<Color>,
    line_width: Option<Mm>,
    font_face: Option<FontFace>,
    font_size: Option<f32>,
}

// The drawing pen: persists across pages the way a stateful PDF context does.
#[derive(Debug, Clone)]
struct PenState {
    fill_color: Color,
    stroke_color: Color,
    text_color: Color,
    line_width: Mm,
    font_face: FontFace,
    font_size: f32,
}

impl PenState {
    fn initial() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            text_color: Color::BLACK,
            line_width: Mm::from_f32(0.2),
            font_face: FontFace::Helvetica,
            font_size: 16.0,
        }
    }
}

/// Recording page surface. Layout code draws here; the PDF writer consumes the
/// resulting [`Document`]. One canvas serves exactly one render.
pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    emitted: Vec<EmittedState>,
    current: usize,
    pen: PenState,
    state_stack: Vec<(PenState, EmittedState)>,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: vec![Page::new()],
            emitted: vec![EmittedState::default()],
            current: 0,
            pen: PenState::initial(),
            state_stack: Vec::new(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the page being drawn.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Appends a blank page and makes it current.
    pub fn add_page(&mut self) {
        self.pages.push(Page::new());
        self.emitted.push(EmittedState::default());
        self.current = self.pages.len() - 1;
        self.state_stack.clear();
    }

    /// Makes an existing page current. Out-of-range indices are ignored.
    pub fn set_page(&mut self, index: usize) {
        if index < self.pages.len() {
            self.current = index;
            self.state_stack.clear();
        }
    }

    fn push(&mut self, command: Command) {
        self.pages[self.current].commands.push(command);
    }

    fn emitted_mut(&mut self) -> &mut EmittedState {
        &mut self.emitted[self.current]
    }

    pub fn meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.push(Command::Meta {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn save_state(&mut self) {
        let snapshot = (self.pen.clone(), self.emitted[self.current].clone());
        self.state_stack.push(snapshot);
        self.push(Command::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some((pen, emitted)) = self.state_stack.pop() {
            self.pen = pen;
            self.emitted[self.current] = emitted;
            self.push(Command::RestoreState);
        }
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.pen.fill_color = color;
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.pen.stroke_color = color;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.pen.text_color = color;
    }

    pub fn set_line_width(&mut self, width: Mm) {
        self.pen.line_width = width.max(Mm::ZERO);
    }

    pub fn set_font(&mut self, face: FontFace, size_pt: f32) {
        self.pen.font_face = face;
        self.pen.font_size = size_pt;
    }

    pub fn set_font_size(&mut self, size_pt: f32) {
        self.pen.font_size = size_pt;
    }

    pub fn set_font_face(&mut self, face: FontFace) {
        self.pen.font_face = face;
    }

    pub fn font(&self) -> (FontFace, f32) {
        (self.pen.font_face, self.pen.font_size)
    }

    pub fn set_opacity(&mut self, alpha: f32) {
        self.push(Command::SetOpacity(alpha.clamp(0.0, 1.0)));
    }

    /// Width of `text` in the current font.
    pub fn text_width(&self, text: &str) -> Mm {
        font::text_width(self.pen.font_face, self.pen.font_size, text)
    }

    fn apply_fill(&mut self, color: Color) {
        if self.emitted[self.current].fill == Some(color) {
            return;
        }
        self.emitted_mut().fill = Some(color);
        self.push(Command::SetFillColor(color));
    }

    fn apply_stroke(&mut self) {
        let color = self.pen.stroke_color;
        if self.emitted[self.current].stroke != Some(color) {
            self.emitted_mut().stroke = Some(color);
            self.push(Command::SetStrokeColor(color));
        }
        let width = self.pen.line_width;
        if self.emitted[self.current].line_width != Some(width) {
            self.emitted_mut().line_width = Some(width);
            self.push(Command::SetLineWidth(width));
        }
    }

    fn apply_paint(&mut self, paint: Paint) {
        match paint {
            Paint::Fill => self.apply_fill(self.pen.fill_color),
            Paint::Stroke => self.apply_stroke(),
            Paint::FillStroke => {
                self.apply_fill(self.pen.fill_color);
                self.apply_stroke();
            }
        }
    }

    fn apply_font(&mut self) {
        let face = self.pen.font_face;
        if self.emitted[self.current].font_face != Some(face) {
            self.emitted_mut().font_face = Some(face);
            self.push(Command::SetFontFace(face));
        }
        let size = self.pen.font_size;
        if self.emitted[self.current].font_size != Some(size) {
            self.emitted_mut().font_size = Some(size);
            self.push(Command::SetFontSize(size));
        }
        self.apply_fill(self.pen.text_color);
    }

    pub fn line(&mut self, x1: Mm, y1: Mm, x2: Mm, y2: Mm) {
        self.apply_stroke();
        self.push(Command::MoveTo { x: x1, y: y1 });
        self.push(Command::LineTo { x: x2, y: y2 });
        self.push(Command::Stroke);
    }

    pub fn rect(&mut self, x: Mm, y: Mm, width: Mm, height: Mm, paint: Paint) {
        self.apply_paint(paint);
        self.push(Command::DrawRect {
            x,
            y,
            width,
            height,
            paint,
        });
    }

    pub fn circle(&mut self, cx: Mm, cy: Mm, radius: Mm, paint: Paint) {
        self.apply_paint(paint);
        self.push(Command::DrawCircle {
            cx,
            cy,
            radius,
            paint,
        });
    }

    pub fn clip_rect(&mut self, x: Mm, y: Mm, width: Mm, height: Mm) {
        self.push(Command::ClipRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn shading_fill(&mut self, shading: Shading) {
        self.push(Command::ShadingFill(shading));
    }

    /// Left-aligned text with its baseline at `y`.
    pub fn text(&mut self, text: impl Into<String>, x: Mm, y: Mm) {
        self.apply_font();
        self.push(Command::DrawString {
            x,
            y,
            text: text.into(),
            rotation: 0.0,
        });
    }

    /// Text horizontally centered on `cx`.
    pub fn text_centered(&mut self, text: impl Into<String>, cx: Mm, y: Mm) {
        let text = text.into();
        let half = self.text_width(&text) / 2;
        self.text(text, cx - half, y);
    }

    /// Text rotated counter-clockwise by `degrees` whose baseline midpoint sits on (cx, cy).
    pub fn text_rotated_centered(&mut self, text: impl Into<String>, cx: Mm, cy: Mm, degrees: f32) {
        let text = text.into();
        let half = self.text_width(&text).to_f32() / 2.0;
        let radians = degrees.to_radians();
        // Page y grows downward, so the run direction is (cos, -sin).
        let x = cx - Mm::from_f32(half * libm::cosf(radians));
        let y = cy + Mm::from_f32(half * libm::sinf(radians));
        self.apply_font();
        self.push(Command::DrawString {
            x,
            y,
            text,
            rotation: degrees,
        });
    }

    pub fn begin_artifact(&mut self, subtype: Option<String>) {
        self.push(Command::BeginArtifact { subtype });
    }

    pub fn end_marked_content(&mut self) {
        self.push(Command::EndMarkedContent);
    }

    pub fn current_command_count(&self) -> usize {
        self.pages[self.current].commands.len()
    }

    pub fn finish(self) -> Document {
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_has_one_blank_page() {
        let canvas = Canvas::new(Size::a4());
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(canvas.current_page(), 0);
        assert_eq!(canvas.current_command_count(), 0);
    }

    #[test]
    fn redundant_state_is_not_recorded_twice() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_font(FontFace::Helvetica, 10.0);
        canvas.text("a", Mm::from_i32(10), Mm::from_i32(10));
        canvas.text("b", Mm::from_i32(10), Mm::from_i32(20));
        let doc = canvas.finish();
        let fonts = doc.pages[0]
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetFontSize(_)))
            .count();
        let fills = doc.pages[0]
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetFillColor(_)))
            .count();
        assert_eq!(fonts, 1);
        assert_eq!(fills, 1);
    }

    #[test]
    fn text_color_and_fill_color_are_independent() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_fill_color(Color::gray(240));
        canvas.set_text_color(Color::BLACK);
        canvas.rect(Mm::ZERO, Mm::ZERO, Mm::from_i32(5), Mm::from_i32(5), Paint::Fill);
        canvas.text("x", Mm::ZERO, Mm::from_i32(10));
        let doc = canvas.finish();
        let colors: Vec<Color> = doc.pages[0]
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::SetFillColor(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::gray(240), Color::BLACK]);
    }

    #[test]
    fn switching_pages_re_emits_state() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_font(FontFace::HelveticaBold, 12.0);
        canvas.text("one", Mm::ZERO, Mm::from_i32(10));
        canvas.add_page();
        canvas.text("two", Mm::ZERO, Mm::from_i32(10));
        let doc = canvas.finish();
        for page in &doc.pages {
            assert!(page.commands.contains(&Command::SetFontFace(FontFace::HelveticaBold)));
            assert!(page.commands.contains(&Command::SetFontSize(12.0)));
        }
    }

    #[test]
    fn restore_state_rolls_back_emitted_color() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.text("before", Mm::ZERO, Mm::from_i32(10));
        canvas.save_state();
        canvas.set_text_color(Color::gray(150));
        canvas.text("inside", Mm::ZERO, Mm::from_i32(20));
        canvas.restore_state();
        canvas.text("after", Mm::ZERO, Mm::from_i32(30));
        let doc = canvas.finish();
        let commands = &doc.pages[0].commands;
        let restore = commands
            .iter()
            .position(|cmd| *cmd == Command::RestoreState)
            .expect("restore recorded");
        // Black is still the emitted fill after Q, so nothing is re-set.
        assert!(
            !commands[restore..]
                .iter()
                .any(|cmd| matches!(cmd, Command::SetFillColor(_)))
        );
    }

    #[test]
    fn set_page_targets_earlier_pages() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.add_page();
        canvas.set_page(0);
        canvas.text("first", Mm::ZERO, Mm::from_i32(10));
        canvas.set_page(7);
        assert_eq!(canvas.current_page(), 0);
        let doc = canvas.finish();
        assert_eq!(doc.pages[0].text_runs().collect::<Vec<_>>(), vec!["first"]);
        assert_eq!(doc.pages[1].text_runs().count(), 0);
    }

    #[test]
    fn rotated_text_is_centered_on_its_anchor() {
        let mut canvas = Canvas::new(Size::a4());
        canvas.set_font(FontFace::Helvetica, 40.0);
        let width = canvas.text_width("ACME");
        canvas.text_rotated_centered("ACME", Mm::from_i32(105), Mm::from_i32(150), 0.0);
        let doc = canvas.finish();
        let Some(Command::DrawString { x, y, .. }) = doc.pages[0].commands.last() else {
            panic!("expected a string");
        };
        let expected_x = Mm::from_i32(105) - Mm::from_f32(width.to_f32() / 2.0);
        assert_eq!(*x, expected_x);
        assert_eq!(*y, Mm::from_i32(150));
    }
}
