use thiserror::Error;

use crate::record::DataSource;
use crate::template::TemplateId;

#[derive(Debug, Error)]
pub enum ProfilePdfError {
    #[error("no user record has been loaded")]
    MissingRecord,

    #[error("template `{template}` cannot render {data_source} records")]
    UnsupportedTemplateForSource {
        template: TemplateId,
        data_source: DataSource,
    },

    #[error("branding color is not a #rgb or #rrggbb hex value: {0:?}")]
    MalformedBrandingColor(String),

    #[error("update targets a {update} record but the loaded record is {record}")]
    MismatchedUpdate {
        update: DataSource,
        record: DataSource,
    },

    #[error("record payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProfilePdfError {
    /// Short message suitable for an end-user notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProfilePdfError::MissingRecord => "Please fetch user data first",
            ProfilePdfError::UnsupportedTemplateForSource { .. } => {
                "The selected template is not available for this data source"
            }
            ProfilePdfError::MalformedBrandingColor(_) => {
                "The primary color must be a hex value such as #3b82f6"
            }
            ProfilePdfError::MismatchedUpdate { .. } => {
                "The edited fields do not match the loaded user"
            }
            ProfilePdfError::Json(_) => "Failed to load user data from the API",
            ProfilePdfError::Io(_) => "Failed to download PDF",
        }
    }
}
