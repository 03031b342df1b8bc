use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use fixed::types::I32F32;
use tracing::warn;

use crate::canvas::{Command, Document, Page, Paint};
use crate::font::FontFace;
use crate::metrics::{DocumentMetrics, PageMetrics};
use crate::types::{Color, Mm, Shading};

const PDF_HEADER: &[u8] = b"%PDF-1.7\n";
const PDF_CATALOG_ID: usize = 1;
const PDF_PAGES_ID: usize = 2;
const PDF_RESOURCES_ID: usize = 3;
const PDF_INFO_ID: usize = 4;
const PDF_FIRST_FONT_ID: usize = 5;

// Control-point distance for a quarter circle drawn as one cubic Bézier.
const KAPPA_NUM: i32 = 5523;
const KAPPA_DEN: i32 = 10000;

const PRODUCER: &str = "profile-pdf";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfOptions {
    pub title: Option<String>,
}

pub fn document_to_pdf(document: &Document, options: &PdfOptions) -> Vec<u8> {
    document_to_pdf_with_metrics(document, options, None)
}

pub fn document_to_pdf_with_metrics(
    document: &Document,
    options: &PdfOptions,
    metrics: Option<&mut DocumentMetrics>,
) -> Vec<u8> {
    let (objects, report) = build_objects(document, options);
    let bytes = build_pdf(&objects, PDF_CATALOG_ID, Some(PDF_INFO_ID));

    if report.substituted_chars > 0 {
        warn!(
            substituted = report.substituted_chars,
            "text outside WinAnsi was replaced with '?'"
        );
    }
    if let Some(metrics) = metrics {
        metrics.total_bytes = bytes.len();
        metrics.substituted_chars = report.substituted_chars;
        metrics.pages = document
            .pages
            .iter()
            .zip(report.content_bytes.iter())
            .enumerate()
            .map(|(idx, (page, content_bytes))| PageMetrics {
                page_number: idx + 1,
                command_count: page.commands.len(),
                text_run_count: page.text_runs().count(),
                content_bytes: *content_bytes,
            })
            .collect();
    }
    bytes
}

pub fn document_to_writer<W: Write>(
    document: &Document,
    options: &PdfOptions,
    writer: &mut W,
) -> io::Result<usize> {
    let bytes = document_to_pdf(document, options);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

#[derive(Debug, Default)]
struct WriteReport {
    content_bytes: Vec<usize>,
    substituted_chars: usize,
}

// Object order: catalog, page tree, shared resources, info, fonts, graphics
// states, shadings, then a content stream and page object per page.
fn build_objects(document: &Document, options: &PdfOptions) -> (Vec<String>, WriteReport) {
    let page_height = document.page_size.height;
    let fonts: Vec<(FontFace, usize)> = FontFace::all()
        .into_iter()
        .enumerate()
        .map(|(idx, face)| (face, PDF_FIRST_FONT_ID + idx))
        .collect();
    let next_id = PDF_FIRST_FONT_ID + fonts.len();
    let (gs_objects, gs_resources, gs_map, next_id) = build_extgstate_objects(document, next_id);
    let (sh_objects, sh_resources, sh_map, next_id) =
        build_shading_objects(document, next_id, page_height);

    let first_page_object = next_id;
    let page_ids: Vec<usize> = (0..document.pages.len())
        .map(|idx| first_page_object + idx * 2 + 1)
        .collect();

    let mut objects = Vec::new();
    objects.push(format!(
        "<< /Type /Catalog /Pages {} 0 R >>",
        PDF_PAGES_ID
    ));
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} /MediaBox [0 0 {} {}] >>",
        kids,
        page_ids.len(),
        fmt_pt(document.page_size.width),
        fmt_pt(page_height)
    ));
    let font_refs: Vec<(String, usize)> = fonts
        .iter()
        .map(|(face, id)| (face.resource_name().to_string(), *id))
        .collect();
    let mut resources = format!("<< /Font {}", resource_dict(&font_refs));
    if !gs_resources.is_empty() {
        resources.push_str(&format!(" /ExtGState {}", resource_dict(&gs_resources)));
    }
    if !sh_resources.is_empty() {
        resources.push_str(&format!(" /Shading {}", resource_dict(&sh_resources)));
    }
    resources.push_str(" >>");
    objects.push(resources);
    objects.push(info_object(options.title.as_deref()));
    for (face, _) in &fonts {
        objects.push(font_object(*face));
    }
    objects.extend(gs_objects);
    objects.extend(sh_objects);

    let mut report = WriteReport::default();
    for (page, page_id) in document.pages.iter().zip(page_ids.iter()) {
        let rendered = render_page(page, page_height, &gs_map, &sh_map);
        report.content_bytes.push(rendered.content.len());
        report.substituted_chars += rendered.substituted_chars;
        objects.push(stream_object(&rendered.content));
        objects.push(format!(
            "<< /Type /Page /Parent {} 0 R /Resources {} 0 R /Contents {} 0 R >>",
            PDF_PAGES_ID,
            PDF_RESOURCES_ID,
            page_id - 1
        ));
    }
    (objects, report)
}

fn build_pdf(objects: &[String], catalog_id: usize, info_id: Option<usize>) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(PDF_HEADER);
    out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, obj) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(obj.as_bytes());
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }

    let mut trailer = format!(
        "trailer\n<< /Size {} /Root {} 0 R",
        objects.len() + 1,
        catalog_id
    );
    if let Some(info_id) = info_id {
        trailer.push_str(&format!(" /Info {} 0 R", info_id));
    }
    trailer.push_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_start));
    out.extend_from_slice(trailer.as_bytes());
    out
}

fn opacity_key(alpha: f32) -> u16 {
    ((alpha * 1000.0).round() as i32).clamp(0, 1000) as u16
}

fn build_extgstate_objects(
    document: &Document,
    start_id: usize,
) -> (Vec<String>, Vec<(String, usize)>, BTreeMap<u16, String>, usize) {
    let alphas: BTreeSet<u16> = document
        .pages
        .iter()
        .flat_map(|page| page.commands.iter())
        .filter_map(|cmd| match cmd {
            Command::SetOpacity(alpha) => Some(opacity_key(*alpha)),
            _ => None,
        })
        .collect();

    let mut objects = Vec::new();
    let mut resources = Vec::new();
    let mut name_map = BTreeMap::new();
    let mut next_id = start_id;
    for (index, alpha) in alphas.into_iter().enumerate() {
        let name = format!("GS{}", index + 1);
        let value = format_milli(alpha as i64);
        objects.push(format!(
            "<< /Type /ExtGState /ca {} /CA {} >>",
            value, value
        ));
        resources.push((name.clone(), next_id));
        name_map.insert(alpha, name);
        next_id += 1;
    }
    (objects, resources, name_map, next_id)
}

// Shadings are keyed by their rendered dictionary so identical gradients
// share one resource.
fn shading_key(shading: &Shading, page_height: Mm) -> String {
    match shading {
        Shading::Axial {
            x0,
            y0,
            x1,
            y1,
            from,
            to,
        } => format!(
            "/Coords [{} {} {} {}] /C0 [{}] /C1 [{}]",
            fmt_pt(*x0),
            fmt_pt(page_height - *y0),
            fmt_pt(*x1),
            fmt_pt(page_height - *y1),
            color_components(*from),
            color_components(*to)
        ),
    }
}

fn build_shading_objects(
    document: &Document,
    start_id: usize,
    page_height: Mm,
) -> (Vec<String>, Vec<(String, usize)>, BTreeMap<String, String>, usize) {
    let mut unique: BTreeMap<String, Shading> = BTreeMap::new();
    for page in &document.pages {
        for cmd in &page.commands {
            if let Command::ShadingFill(shading) = cmd {
                unique
                    .entry(shading_key(shading, page_height))
                    .or_insert_with(|| shading.clone());
            }
        }
    }

    let mut objects = Vec::new();
    let mut resources = Vec::new();
    let mut name_map = BTreeMap::new();
    let mut next_id = start_id;
    for (index, (key, shading)) in unique.into_iter().enumerate() {
        let name = format!("Sh{}", index + 1);
        let Shading::Axial {
            x0,
            y0,
            x1,
            y1,
            from,
            to,
        } = shading;
        let function_id = next_id;
        objects.push(format!(
            "<< /FunctionType 2 /Domain [0 1] /C0 [{}] /C1 [{}] /N 1 >>",
            color_components(from),
            color_components(to)
        ));
        let shading_id = next_id + 1;
        objects.push(format!(
            "<< /ShadingType 2 /ColorSpace /DeviceRGB /Coords [{} {} {} {}] /Function {} 0 R /Extend [true true] >>",
            fmt_pt(x0),
            fmt_pt(page_height - y0),
            fmt_pt(x1),
            fmt_pt(page_height - y1),
            function_id
        ));
        next_id += 2;
        resources.push((name.clone(), shading_id));
        name_map.insert(key, name);
    }
    (objects, resources, name_map, next_id)
}

fn resource_dict(entries: &[(String, usize)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(resource, id)| format!("/{} {} 0 R", resource, id))
        .collect();
    format!("<< {} >>", items.join(" "))
}

fn font_object(face: FontFace) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        face.base_font()
    )
}

fn info_object(title: Option<&str>) -> String {
    let mut entries = Vec::new();
    if let Some(title) = title {
        entries.push(format!("/Title ({})", encode_winansi_pdf_string(title).text));
    }
    entries.push(format!("/Producer ({})", PRODUCER));
    format!("<< {} >>", entries.join(" "))
}

fn stream_object(content: &str) -> String {
    format!(
        "<< /Length {} >>\nstream\n{}\nendstream",
        content.len(),
        content
    )
}

struct RenderedPage {
    content: String,
    substituted_chars: usize,
}

fn paint_operator(paint: Paint) -> &'static str {
    match paint {
        Paint::Fill => "f",
        Paint::Stroke => "S",
        Paint::FillStroke => "B",
    }
}

fn render_page(
    page: &Page,
    page_height: Mm,
    gs_map: &BTreeMap<u16, String>,
    shading_map: &BTreeMap<String, String>,
) -> RenderedPage {
    let mut out = String::new();
    let mut substituted_chars = 0usize;
    let mut current_face = FontFace::Helvetica;
    let mut current_size = 16.0f32;
    // Tf is part of the graphics state, so q/Q save and restore it too.
    let mut font_stack: Vec<(FontFace, f32)> = Vec::new();
    let flip = |y: Mm| fmt_pt(page_height - y);

    for cmd in &page.commands {
        match cmd {
            Command::SaveState => {
                font_stack.push((current_face, current_size));
                out.push_str("q\n");
            }
            Command::RestoreState => {
                if let Some((face, size)) = font_stack.pop() {
                    current_face = face;
                    current_size = size;
                }
                out.push_str("Q\n");
            }
            Command::Meta { .. } => {}
            Command::SetFillColor(color) => {
                out.push_str(&format!("{} rg\n", color_components(*color)));
            }
            Command::SetStrokeColor(color) => {
                out.push_str(&format!("{} RG\n", color_components(*color)));
            }
            Command::SetLineWidth(width) => {
                out.push_str(&format!("{} w\n", fmt_pt(*width)));
            }
            Command::SetOpacity(alpha) => {
                if let Some(name) = gs_map.get(&opacity_key(*alpha)) {
                    out.push_str(&format!("/{} gs\n", name));
                }
            }
            Command::SetFontFace(face) => current_face = *face,
            Command::SetFontSize(size) => current_size = *size,
            Command::ClipRect {
                x,
                y,
                width,
                height,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re\nW\nn\n",
                    fmt_pt(*x),
                    flip(*y + *height),
                    fmt_pt(*width),
                    fmt_pt(*height)
                ));
            }
            Command::ShadingFill(shading) => {
                if let Some(name) = shading_map.get(&shading_key(shading, page_height)) {
                    out.push_str(&format!("/{} sh\n", name));
                }
            }
            Command::MoveTo { x, y } => {
                out.push_str(&format!("{} {} m\n", fmt_pt(*x), flip(*y)));
            }
            Command::LineTo { x, y } => {
                out.push_str(&format!("{} {} l\n", fmt_pt(*x), flip(*y)));
            }
            Command::Stroke => out.push_str("S\n"),
            Command::DrawRect {
                x,
                y,
                width,
                height,
                paint,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re\n{}\n",
                    fmt_pt(*x),
                    flip(*y + *height),
                    fmt_pt(*width),
                    fmt_pt(*height),
                    paint_operator(*paint)
                ));
            }
            Command::DrawCircle {
                cx,
                cy,
                radius,
                paint,
            } => {
                push_circle_path(&mut out, *cx, *cy, *radius, page_height);
                out.push_str(paint_operator(*paint));
                out.push('\n');
            }
            Command::DrawString {
                x,
                y,
                text,
                rotation,
            } => {
                let encoded = encode_winansi_pdf_string(text);
                substituted_chars += encoded.replaced;
                out.push_str("BT\n");
                out.push_str(&format!(
                    "/{} {} Tf\n",
                    current_face.resource_name(),
                    fmt(current_size)
                ));
                if rotation.abs() > f32::EPSILON {
                    let radians = rotation.to_radians();
                    let cos = libm::cosf(radians);
                    let sin = libm::sinf(radians);
                    out.push_str(&format!(
                        "{} {} {} {} {} {} Tm\n",
                        fmt(cos),
                        fmt(sin),
                        fmt(-sin),
                        fmt(cos),
                        fmt_pt(*x),
                        flip(*y)
                    ));
                } else {
                    out.push_str(&format!("{} {} Td\n", fmt_pt(*x), flip(*y)));
                }
                out.push_str(&format!("({}) Tj\nET\n", encoded.text));
            }
            Command::BeginArtifact { subtype } => match subtype.as_deref() {
                Some(subtype) => out.push_str(&format!(
                    "/Artifact <</Subtype /{}>> BDC\n",
                    escape_pdf_name(subtype)
                )),
                None => out.push_str("/Artifact BMC\n"),
            },
            Command::EndMarkedContent => out.push_str("EMC\n"),
        }
    }

    RenderedPage {
        content: out,
        substituted_chars,
    }
}

fn push_circle_path(out: &mut String, cx: Mm, cy: Mm, r: Mm, page_height: Mm) {
    let k = r.mul_ratio(KAPPA_NUM, KAPPA_DEN);
    let point = |x: Mm, y: Mm| format!("{} {}", fmt_pt(x), fmt_pt(page_height - y));
    out.push_str(&format!("{} m\n", point(cx + r, cy)));
    let quarters = [
        [(cx + r, cy - k), (cx + k, cy - r), (cx, cy - r)],
        [(cx - k, cy - r), (cx - r, cy - k), (cx - r, cy)],
        [(cx - r, cy + k), (cx - k, cy + r), (cx, cy + r)],
        [(cx + k, cy + r), (cx + r, cy + k), (cx + r, cy)],
    ];
    for [c1, c2, end] in quarters {
        out.push_str(&format!(
            "{} {} {} c\n",
            point(c1.0, c1.1),
            point(c2.0, c2.1),
            point(end.0, end.1)
        ));
    }
    out.push_str("h\n");
}

fn escape_pdf_name(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
        } else {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("#{:02X}", byte));
            }
        }
    }
    out
}

struct WinAnsiEncoded {
    text: String,
    replaced: usize,
}

// cp1252 code for `ch`, if it has one.
fn winansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{0000}'..='\u{007F}' | '\u{00A0}'..='\u{00FF}' => ch as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Literal-string body for a WinAnsi font. Unmappable characters become `?`.
fn encode_winansi_pdf_string(input: &str) -> WinAnsiEncoded {
    let mut out = String::new();
    let mut replaced = 0usize;
    for ch in input.chars() {
        let byte = winansi_byte(ch).unwrap_or_else(|| {
            replaced += 1;
            b'?'
        });
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if !(0x20..0x7f).contains(&b) => out.push_str(&format!("\\{:03o}", b)),
            b => out.push(b as char),
        }
    }
    WinAnsiEncoded { text: out, replaced }
}

fn color_components(color: Color) -> String {
    format!(
        "{} {} {}",
        fmt(clamp_unit(color.r)),
        fmt(clamp_unit(color.g)),
        fmt(clamp_unit(color.b))
    )
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn fmt(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = I32F32::from_num(value);
    let scaled = (fixed * I32F32::from_num(1000)).round();
    let milli: i64 = scaled.to_num();
    format_milli(milli)
}

fn format_milli(milli: i64) -> String {
    if milli == 0 {
        return "0".to_string();
    }
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int_part = abs / 1000;
    let frac_part = abs % 1000;
    if frac_part == 0 {
        return format!("{}{}", sign, int_part);
    }
    let frac = format!("{:03}", frac_part);
    format!("{}{}.{}", sign, int_part, frac.trim_end_matches('0'))
}

// Millimetres in, PDF points out.
fn fmt_pt(value: Mm) -> String {
    format_milli(value.to_points().to_milli_i64())
}
