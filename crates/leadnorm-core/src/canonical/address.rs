use crate::error::CoreError;
use crate::tables::compile_pattern;
use regex::Regex;

// Longer spellings first inside each alternation.
const STREET_TYPES: &[(&str, &str)] = &[
    ("carrera|kra|cra|cr", "Cra."),
    ("calle|cll|cl", "Cl."),
    ("avenida|avda|av", "Av."),
    ("transversal|transv|trans|tv|tr", "Tr."),
    ("diagonal|diag|dg", "Dg."),
];

const NUMBER_INDICATORS: &[&str] = &[
    r"(?i)\bn[uú]mero\b(?:\s*\.)*\s*",
    r"(?i)\bno\b(?:\s*\.)*\s*",
    r"(?i)\bn[°º](?:\s*\.)*\s*",
    r"#\s*",
];

#[derive(Debug, Clone)]
struct StreetRule {
    glued: Regex,
    word: Regex,
    glued_replacement: String,
    word_replacement: String,
}

#[derive(Debug, Clone)]
pub struct AddressRules {
    streets: Vec<StreetRule>,
    numbers: Vec<Regex>,
    periods: Regex,
    house_number: Regex,
}

impl AddressRules {
    pub fn new() -> Result<Self, CoreError> {
        let streets = STREET_TYPES
            .iter()
            .map(|(alternatives, canonical)| {
                Ok(StreetRule {
                    glued: compile_pattern(&format!(r"(?i)\b(?:{alternatives})(\d)"))?,
                    word: compile_pattern(&format!(
                        r"(?i)\b(?:{alternatives})\b(?:\s*\.)*\s*"
                    ))?,
                    glued_replacement: format!("{canonical} ${{1}}"),
                    word_replacement: format!("{canonical} "),
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        let numbers = NUMBER_INDICATORS
            .iter()
            .map(|pattern| compile_pattern(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            streets,
            numbers,
            periods: compile_pattern(r"\.(?:\s*\.)+")?,
            house_number: compile_pattern(r"#\s*(\d+[A-Za-z]?)(?:\s*-\s*|\s+)(\d+)")?,
        })
    }

    /// Street types become `Cra.`/`Cl.`/`Av.`/`Tr.`/`Dg.`, number words become
    /// `#`, and a `# <n> <m>` pair is written `# <n> - <m>`.
    pub fn apply(&self, raw: &str) -> String {
        let mut value = raw.trim().to_string();

        for rule in &self.streets {
            value = rule
                .glued
                .replace_all(&value, rule.glued_replacement.as_str())
                .into_owned();
            value = rule
                .word
                .replace_all(&value, rule.word_replacement.as_str())
                .into_owned();
        }

        for pattern in &self.numbers {
            value = pattern.replace_all(&value, "# ").into_owned();
        }

        value = self.periods.replace_all(&value, ".").into_owned();
        value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        value = self
            .house_number
            .replace_all(&value, "# ${1} - ${2}")
            .into_owned();

        value.trim().to_string()
    }
}
