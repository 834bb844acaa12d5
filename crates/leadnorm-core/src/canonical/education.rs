use crate::error::CoreError;
use crate::tables::compile_pattern;
use regex::Regex;

const LEVELS: &[(&str, &str)] = &[
    (r"primaria", "Primaria"),
    (r"bachiller|secundaria|media|11", "Bachiller"),
    (r"t[eé]cnic", "Tecnico"),
    (r"t[eé]cnolog", "Tecnologo"),
    (r"profesional|pregrado|universitari", "Profesional"),
    (r"especiali", "Especialista"),
    (r"maestr[ií]a|mag[ií]ster|master", "Magister"),
    (r"doctor|phd", "Doctorado"),
];

#[derive(Debug, Clone)]
pub struct EducationRules {
    levels: Vec<(Regex, &'static str)>,
}

impl EducationRules {
    pub fn new() -> Result<Self, CoreError> {
        let levels = LEVELS
            .iter()
            .map(|(pattern, level)| Ok((compile_pattern(pattern)?, *level)))
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(Self { levels })
    }

    pub fn classify(&self, raw: &str) -> Option<&'static str> {
        let lowered = raw.to_lowercase();
        self.levels
            .iter()
            .find(|(pattern, _)| pattern.is_match(&lowered))
            .map(|(_, level)| *level)
    }
}
