use std::fmt;

use crate::error::ProfilePdfError;
use crate::record::{FlatProfile, RichProfile, UserRecord};

/// The fixed template set. Any unrecognised identifier resolves to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateId {
    #[default]
    Default,
    Table,
    Sectioned,
    Modern,
}

impl TemplateId {
    /// Total mapping from a form value to a template. Accepts the canonical
    /// names and the form's `template1..3` identifiers.
    pub fn parse(raw: &str) -> TemplateId {
        match raw.trim().to_ascii_lowercase().as_str() {
            "table" | "template1" => TemplateId::Table,
            "sectioned" | "template2" => TemplateId::Sectioned,
            "modern" => TemplateId::Modern,
            _ => TemplateId::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Default => "default",
            TemplateId::Table => "table",
            TemplateId::Sectioned => "sectioned",
            TemplateId::Modern => "modern",
        }
    }

    /// Modern documents carry their own header band and a watermark on every page.
    pub fn is_modern(self) -> bool {
        matches!(self, TemplateId::Modern)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A layout bound to the exact profile variant it draws.
#[derive(Debug, Clone, Copy)]
pub enum LayoutRoutine<'a> {
    FlatTable(&'a FlatProfile),
    FlatSectioned(&'a FlatProfile),
    FlatPlain(&'a FlatProfile),
    RichTable(&'a RichProfile),
    RichSectioned(&'a RichProfile),
    RichPlain(&'a RichProfile),
    Modern(&'a RichProfile),
}

impl LayoutRoutine<'_> {
    pub fn template(&self) -> TemplateId {
        match self {
            LayoutRoutine::FlatTable(_) | LayoutRoutine::RichTable(_) => TemplateId::Table,
            LayoutRoutine::FlatSectioned(_) | LayoutRoutine::RichSectioned(_) => {
                TemplateId::Sectioned
            }
            LayoutRoutine::FlatPlain(_) | LayoutRoutine::RichPlain(_) => TemplateId::Default,
            LayoutRoutine::Modern(_) => TemplateId::Modern,
        }
    }
}

/// Pairs a record with the routine for `template`. Modern needs the nested
/// RandomUser fields and is refused for flat records.
pub fn select_layout(
    record: &UserRecord,
    template: TemplateId,
) -> Result<LayoutRoutine<'_>, ProfilePdfError> {
    let routine = match (record, template) {
        (UserRecord::Flat(_), TemplateId::Modern) => {
            return Err(ProfilePdfError::UnsupportedTemplateForSource {
                template,
                data_source: record.source(),
            });
        }
        (UserRecord::Flat(p), TemplateId::Table) => LayoutRoutine::FlatTable(p),
        (UserRecord::Flat(p), TemplateId::Sectioned) => LayoutRoutine::FlatSectioned(p),
        (UserRecord::Flat(p), TemplateId::Default) => LayoutRoutine::FlatPlain(p),
        (UserRecord::Rich(p), TemplateId::Table) => LayoutRoutine::RichTable(p),
        (UserRecord::Rich(p), TemplateId::Sectioned) => LayoutRoutine::RichSectioned(p),
        (UserRecord::Rich(p), TemplateId::Default) => LayoutRoutine::RichPlain(p),
        (UserRecord::Rich(p), TemplateId::Modern) => LayoutRoutine::Modern(p),
    };
    Ok(routine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DataSource;

    #[test]
    fn parse_accepts_names_and_form_ids() {
        assert_eq!(TemplateId::parse("template1"), TemplateId::Table);
        assert_eq!(TemplateId::parse("Table"), TemplateId::Table);
        assert_eq!(TemplateId::parse("template2"), TemplateId::Sectioned);
        assert_eq!(TemplateId::parse("template3"), TemplateId::Default);
        assert_eq!(TemplateId::parse(" modern "), TemplateId::Modern);
    }

    #[test]
    fn unknown_identifiers_fall_back_to_default() {
        for raw in ["", "nonexistent", "template9", "modernist"] {
            assert_eq!(TemplateId::parse(raw), TemplateId::Default, "{raw}");
        }
    }

    #[test]
    fn every_supported_pair_selects_its_routine() {
        let flat = UserRecord::Flat(FlatProfile::default());
        let rich = UserRecord::Rich(RichProfile::default());
        for template in [TemplateId::Default, TemplateId::Table, TemplateId::Sectioned] {
            assert_eq!(select_layout(&flat, template).unwrap().template(), template);
            assert_eq!(select_layout(&rich, template).unwrap().template(), template);
        }
        assert!(matches!(
            select_layout(&rich, TemplateId::Modern),
            Ok(LayoutRoutine::Modern(_))
        ));
    }

    #[test]
    fn modern_is_refused_for_flat_records() {
        let flat = UserRecord::Flat(FlatProfile::default());
        let err = select_layout(&flat, TemplateId::Modern).unwrap_err();
        assert!(matches!(
            err,
            ProfilePdfError::UnsupportedTemplateForSource {
                template: TemplateId::Modern,
                data_source: DataSource::JsonPlaceholder,
            }
        ));
    }
}
