use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::info;

use crate::error::ProfilePdfError;
use crate::record::UserRecord;

/// A finished render. Immutable once produced; the caller decides whether to
/// preview it or write it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    page_count: usize,
    title: String,
    file_name: String,
}

impl RenderedDocument {
    pub(crate) fn new(bytes: Vec<u8>, page_count: usize, title: String, file_name: String) -> Self {
        Self {
            bytes,
            page_count,
            title,
            file_name,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Suggested download name: `{title} {first} {last}-{epoch millis}.pdf` for
    /// RandomUser records, `{name}-{epoch millis}.pdf` for JSONPlaceholder ones.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Self-contained data URL for an inline preview frame. The file name is
    /// percent-encoded so `,` and `;` cannot end the media-type header.
    pub fn to_data_payload(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!(
            "data:application/pdf;filename={};base64,{}",
            urlencoding::encode(&self.file_name),
            encoded
        )
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, ProfilePdfError> {
        writer.write_all(&self.bytes)?;
        Ok(self.bytes.len())
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<PathBuf, ProfilePdfError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "saved pdf");
        Ok(path.to_path_buf())
    }

    /// Saves under [`Self::file_name`] inside `dir`.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ProfilePdfError> {
        self.save_as(dir.as_ref().join(&self.file_name))
    }
}

/// Person-facing name used for the document title and file name.
pub fn display_name(record: &UserRecord) -> String {
    match record {
        UserRecord::Flat(p) => p.name.clone(),
        UserRecord::Rich(p) => p.full_name(),
    }
}

pub fn download_file_name(record: &UserRecord, epoch_millis: i64) -> String {
    let stem = sanitize_file_stem(&display_name(record));
    format!("{}-{}.pdf", stem, epoch_millis)
}

fn sanitize_file_stem(raw: &str) -> String {
    raw.chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect()
}
