mod address;
mod education;
mod text;

pub use address::AddressRules;
pub use education::EducationRules;
pub use text::capitalize_words;

use crate::domain::FieldKind;
use crate::error::CoreError;
use crate::tables::{strip_country_suffix, LookupTables};

/// Deterministic, idempotent post-processing applied to every value the
/// generation step returns.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    tables: LookupTables,
    address: AddressRules,
    education: EducationRules,
}

impl Canonicalizer {
    pub fn new(tables: LookupTables) -> Result<Self, CoreError> {
        Ok(Self {
            tables,
            address: AddressRules::new()?,
            education: EducationRules::new()?,
        })
    }

    pub fn builtin() -> Result<Self, CoreError> {
        Self::new(LookupTables::builtin()?)
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn canonicalize(&self, field: &str, raw: &str) -> String {
        self.canonicalize_kind(FieldKind::classify(field), raw)
    }

    pub fn canonicalize_kind(&self, kind: FieldKind, raw: &str) -> String {
        let value = raw.trim();
        match kind {
            FieldKind::PersonName | FieldKind::Text => capitalize_words(value),
            FieldKind::City => self.city(value),
            FieldKind::Institution => self
                .tables
                .institution(value)
                .map(str::to_string)
                .unwrap_or_else(|| capitalize_words(value)),
            FieldKind::Address => self.address.apply(value),
            FieldKind::EducationLevel => self
                .education
                .classify(value)
                .map(str::to_string)
                .unwrap_or_else(|| capitalize_words(value)),
        }
    }

    fn city(&self, value: &str) -> String {
        if let Some(canonical) = self.tables.city(value) {
            return canonical.to_string();
        }
        capitalize_words(&strip_country_suffix(value).join(" "))
    }
}
