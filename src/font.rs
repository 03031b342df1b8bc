use crate::types::Mm;

/// Base-14 faces used by the profile templates. Both are referenced by name in
/// the PDF, so no font program is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub(crate) fn resource_name(self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
        }
    }

    pub(crate) fn all() -> [FontFace; 2] {
        [FontFace::Helvetica, FontFace::HelveticaBold]
    }

    fn metrics(self) -> &'static FontMetrics {
        match self {
            FontFace::Helvetica => &HELVETICA,
            FontFace::HelveticaBold => &HELVETICA_BOLD,
        }
    }
}

struct FontMetrics {
    first_char: u32,
    widths: &'static [u16],
    missing_width: u16,
}

impl FontMetrics {
    fn advance_for_char(&self, ch: char) -> u16 {
        let code = ch as u32;
        if code < self.first_char {
            return self.missing_width;
        }
        let idx = (code - self.first_char) as usize;
        if let Some(width) = self.widths.get(idx) {
            return *width;
        }
        match ch {
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' => 1000,
            '\u{2018}' | '\u{2019}' => 222,
            '\u{201C}' | '\u{201D}' => 333,
            _ => self.missing_width,
        }
    }

    fn measure_units(&self, text: &str) -> i64 {
        text.chars()
            .map(|ch| self.advance_for_char(ch) as i64)
            .sum()
    }
}

// AFM advances for U+0020..=U+007E, 1/1000 em.
static HELVETICA: FontMetrics = FontMetrics {
    first_char: 32,
    widths: &[
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112-126
    ],
    missing_width: 556,
};

static HELVETICA_BOLD: FontMetrics = FontMetrics {
    first_char: 32,
    widths: &[
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48-63
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64-79
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80-95
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96-111
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112-126
    ],
    missing_width: 556,
};

/// Width of `text` set in `face` at `size_pt` points, in page millimetres.
pub fn text_width(face: FontFace, size_pt: f32, text: &str) -> Mm {
    let units = face.metrics().measure_units(text);
    if units <= 0 || !size_pt.is_finite() || size_pt <= 0.0 {
        return Mm::ZERO;
    }
    // units/1000 em * size pt * 25.4/72 mm per pt, kept in integer milli-mm.
    let size_milli = (size_pt as f64 * 1000.0).round() as i128;
    let milli_mm = (units as i128 * size_milli * 127) / (1000 * 360);
    Mm::from_milli_i64(milli_mm.clamp(0, i64::MAX as i128) as i64)
}

/// Greedy word wrap of `text` to `max_width`. Words wider than a whole line are
/// broken between characters. Always yields at least one line.
pub fn split_text_to_size(face: FontFace, size_pt: f32, text: &str, max_width: Mm) -> Vec<String> {
    split_text_with_limit(face, size_pt, text, max_width, None)
}

/// Like [`split_text_to_size`] with an additional cap on characters per line.
pub fn split_text_with_limit(
    face: FontFace,
    size_pt: f32,
    text: &str,
    max_width: Mm,
    max_chars: Option<usize>,
) -> Vec<String> {
    let fits = |candidate: &str| {
        let within_chars = max_chars.is_none_or(|limit| candidate.chars().count() <= limit);
        within_chars && text_width(face, size_pt, candidate) <= max_width
    };

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
                continue;
            }
            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && !fits(&next) {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = next;
                }
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_tables_cover_printable_ascii() {
        assert_eq!(HELVETICA.widths.len(), 95);
        assert_eq!(HELVETICA_BOLD.widths.len(), 95);
    }

    #[test]
    fn text_width_scales_with_font_size() {
        // "M" is 833 units: 833/1000 * 10pt = 8.33pt = 2.938mm.
        let m10 = text_width(FontFace::Helvetica, 10.0, "M");
        assert_eq!(m10.to_milli_i64(), 2_938);
        let m20 = text_width(FontFace::Helvetica, 20.0, "M");
        assert!(m20 > m10);
        assert_eq!(text_width(FontFace::Helvetica, 10.0, ""), Mm::ZERO);
    }

    #[test]
    fn bold_face_is_wider() {
        let regular = text_width(FontFace::Helvetica, 12.0, "Marketing");
        let bold = text_width(FontFace::HelveticaBold, 12.0, "Marketing");
        assert!(bold > regular);
    }

    #[test]
    fn split_keeps_short_text_on_one_line() {
        let lines = split_text_to_size(FontFace::Helvetica, 10.0, "short text", Mm::from_i32(120));
        assert_eq!(lines, vec!["short text".to_string()]);
    }

    #[test]
    fn split_wraps_on_word_boundaries() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda";
        let max = Mm::from_i32(30);
        let lines = split_text_to_size(FontFace::Helvetica, 10.0, text, max);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(FontFace::Helvetica, 10.0, line) <= max, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn split_breaks_words_longer_than_a_line() {
        let lines = split_text_to_size(
            FontFace::Helvetica,
            10.0,
            "Supercalifragilisticexpialidocious",
            Mm::from_i32(20),
        );
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "Supercalifragilisticexpialidocious");
    }

    #[test]
    fn character_limit_forces_a_wrap() {
        let text = "Multi-layered client-server neural-net for the enterprise";
        let lines =
            split_text_with_limit(FontFace::Helvetica, 10.0, text, Mm::from_i32(120), Some(40));
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.chars().count() <= 40));
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        let lines = split_text_to_size(FontFace::Helvetica, 10.0, "", Mm::from_i32(50));
        assert_eq!(lines, vec![String::new()]);
    }
}
