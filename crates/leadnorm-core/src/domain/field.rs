use crate::error::CoreError;

pub const DEFAULT_FIELDS: [&str; 7] = [
    "nombres",
    "apellidos",
    "direccion",
    "ciudad",
    "nivelEducativo",
    "ocupacionActual",
    "empresa",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    PersonName,
    City,
    Institution,
    Address,
    EducationLevel,
    Text,
}

impl FieldKind {
    pub fn classify(field: &str) -> Self {
        match field {
            "nombres" | "apellidos" => Self::PersonName,
            "ciudad" => Self::City,
            "empresa" | "institucionEducativa" => Self::Institution,
            "direccion" => Self::Address,
            "nivelEducativo" => Self::EducationLevel,
            _ => Self::Text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonName => "person_name",
            Self::City => "city",
            Self::Institution => "institution",
            Self::Address => "address",
            Self::EducationLevel => "education_level",
            Self::Text => "text",
        }
    }
}

pub fn validate_field_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if !valid {
        return Err(CoreError::InvalidFieldName(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
