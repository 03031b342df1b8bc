mod assemble;
mod branding;
mod canvas;
mod error;
mod font;
mod layout;
mod metrics;
mod modern;
mod output;
mod pdf;
mod pdfinspect;
mod primitives;
mod record;
mod template;
mod types;

pub use assemble::{
    WATERMARK_SUBTYPE, WatermarkPlacement, WatermarkSpec, apply_page_footers, draw_header,
    draw_watermark, footer_text,
};
pub use branding::{Branding, BrandingConfig};
pub use canvas::{Canvas, Command, Document, Page, Paint};
pub use error::ProfilePdfError;
pub use font::{FontFace, split_text_to_size, text_width};
pub use layout::{Section, draw_plain, draw_sections};
pub use metrics::{DocumentMetrics, PageMetrics};
pub use output::{RenderedDocument, display_name, download_file_name};
pub use pdf::{PdfOptions, document_to_pdf, document_to_pdf_with_metrics, document_to_writer};
pub use pdfinspect::{
    PdfInspectError, PdfInspectErrorCode, PdfInspectReport, inspect_pdf_bytes, inspect_pdf_path,
    require_page_count,
};
pub use primitives::{draw_bullet, draw_divider, draw_section_heading, draw_table};
pub use record::{
    Company, DataSource, FlatAddress, FlatProfile, FlatProfileUpdate, Postcode, RecordUpdate,
    RichProfile, RichProfileUpdate, UserRecord, short_date,
};
pub use template::{LayoutRoutine, TemplateId, select_layout};
pub use types::{Color, Mm, Shading, Size};

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One generation call as the form submits it. `template` is free text; an
/// unknown value renders the default template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub record: Option<UserRecord>,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub branding: BrandingConfig,
}

impl RenderRequest {
    pub fn new(record: UserRecord, template: impl Into<String>, branding: BrandingConfig) -> Self {
        Self {
            record: Some(record),
            template: template.into(),
            branding,
        }
    }

    pub fn template_id(&self) -> TemplateId {
        TemplateId::parse(&self.template)
    }
}

/// Renderer configuration. Everything left unset is taken from the clock at
/// render time.
pub struct ProfilePdf {
    page_size: Size,
    generated_on: Option<NaiveDate>,
    timestamp_millis: Option<i64>,
    document_title: Option<String>,
}

pub struct ProfilePdfBuilder {
    page_size: Size,
    generated_on: Option<NaiveDate>,
    timestamp_millis: Option<i64>,
    document_title: Option<String>,
}

impl Default for ProfilePdf {
    fn default() -> Self {
        ProfilePdfBuilder::new().build()
    }
}

impl ProfilePdf {
    pub fn builder() -> ProfilePdfBuilder {
        ProfilePdfBuilder::new()
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    fn generated_on(&self) -> NaiveDate {
        self.generated_on
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
            .unwrap_or_else(|| Utc::now().timestamp_millis())
    }

    /// Lays out `record` without serializing it. Validation happens first, so
    /// an error never leaves a partial document behind.
    pub fn render_to_document(
        &self,
        record: &UserRecord,
        template: TemplateId,
        branding: &BrandingConfig,
    ) -> Result<Document, ProfilePdfError> {
        let branding = branding.resolve()?;
        let routine = select_layout(record, template)?;
        Ok(assemble::assemble(
            routine,
            &branding,
            self.page_size,
            self.generated_on(),
        ))
    }

    pub fn render(
        &self,
        record: &UserRecord,
        template: TemplateId,
        branding: &BrandingConfig,
    ) -> Result<RenderedDocument, ProfilePdfError> {
        self.render_with_metrics(record, template, branding)
            .map(|(document, _metrics)| document)
    }

    pub fn render_with_metrics(
        &self,
        record: &UserRecord,
        template: TemplateId,
        branding: &BrandingConfig,
    ) -> Result<(RenderedDocument, DocumentMetrics), ProfilePdfError> {
        let document = self.render_to_document(record, template, branding)?;
        let title = self
            .document_title
            .clone()
            .unwrap_or_else(|| display_name(record));
        let options = PdfOptions {
            title: Some(title.clone()),
        };
        let mut metrics = DocumentMetrics::default();
        let bytes = pdf::document_to_pdf_with_metrics(&document, &options, Some(&mut metrics));
        let file_name = download_file_name(record, self.timestamp_millis());
        debug!(
            template = %template,
            source = %record.source(),
            pages = document.page_count(),
            bytes = bytes.len(),
            "rendered profile pdf"
        );
        Ok((
            RenderedDocument::new(bytes, document.page_count(), title, file_name),
            metrics,
        ))
    }

    pub fn render_request(&self, request: &RenderRequest) -> Result<RenderedDocument, ProfilePdfError> {
        let record = request.record.as_ref().ok_or(ProfilePdfError::MissingRecord)?;
        self.render(record, request.template_id(), &request.branding)
    }
}

impl ProfilePdfBuilder {
    pub fn new() -> Self {
        Self {
            page_size: Size::a4(),
            generated_on: None,
            timestamp_millis: None,
            document_title: None,
        }
    }

    pub fn page_size(mut self, size: Size) -> Self {
        self.page_size = size;
        self
    }

    // Date printed in every footer. Fixing it makes output reproducible.
    pub fn generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    // Timestamp embedded in the download file name.
    pub fn timestamp_millis(mut self, millis: i64) -> Self {
        self.timestamp_millis = Some(millis);
        self
    }

    // Document title for the Info dictionary; defaults to the person's name.
    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.document_title = Some(title.into());
        self
    }

    pub fn build(self) -> ProfilePdf {
        ProfilePdf {
            page_size: self.page_size,
            generated_on: self.generated_on,
            timestamp_millis: self.timestamp_millis,
            document_title: self.document_title,
        }
    }
}

impl Default for ProfilePdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders with today's date on an A4 page. `template` accepts any string;
/// unknown names fall back to the default template.
pub fn generate_document(
    record: &UserRecord,
    template: &str,
    branding: &BrandingConfig,
) -> Result<RenderedDocument, ProfilePdfError> {
    ProfilePdf::default().render(record, TemplateId::parse(template), branding)
}
