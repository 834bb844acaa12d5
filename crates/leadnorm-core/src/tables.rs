use crate::error::CoreError;
use regex::Regex;
use std::collections::HashMap;

const COUNTRY_SUFFIX: &str = "colombia";

const CITY_VARIANTS: &[(&str, &str)] = &[
    ("bogota", "Bogota D.C."),
    ("bogotá", "Bogota D.C."),
    ("bogota dc", "Bogota D.C."),
    ("bogota d.c.", "Bogota D.C."),
    ("bogota d.c", "Bogota D.C."),
    ("bogota, d.c.", "Bogota D.C."),
    ("bogota distrito capital", "Bogota D.C."),
    ("santafe de bogota", "Bogota D.C."),
    ("santa fe de bogota", "Bogota D.C."),
    ("medellin", "Medellin"),
    ("medellín", "Medellin"),
    ("cali", "Cali"),
    ("santiago de cali", "Cali"),
    ("barranquilla", "Barranquilla"),
    ("b/quilla", "Barranquilla"),
    ("cartagena", "Cartagena"),
    ("cartagena de indias", "Cartagena"),
    ("bucaramanga", "Bucaramanga"),
    ("pereira", "Pereira"),
    ("manizales", "Manizales"),
    ("santa marta", "Santa Marta"),
    ("cucuta", "Cucuta"),
    ("cúcuta", "Cucuta"),
    ("ibague", "Ibague"),
    ("ibagué", "Ibague"),
    ("soacha", "Soacha"),
    ("villavicencio", "Villavicencio"),
    ("neiva", "Neiva"),
    ("pasto", "Pasto"),
    ("monteria", "Monteria"),
    ("montería", "Monteria"),
    ("valledupar", "Valledupar"),
    ("armenia", "Armenia"),
    ("popayan", "Popayan"),
    ("popayán", "Popayan"),
    ("sincelejo", "Sincelejo"),
    ("tunja", "Tunja"),
    ("florencia", "Florencia"),
    ("quibdo", "Quibdo"),
    ("quibdó", "Quibdo"),
    ("riohacha", "Riohacha"),
    ("yopal", "Yopal"),
    ("leticia", "Leticia"),
    ("mocoa", "Mocoa"),
    ("mitu", "Mitu"),
    ("mitú", "Mitu"),
    ("inirida", "Inirida"),
    ("inírida", "Inirida"),
    ("san andres", "San Andres"),
    ("san andrés", "San Andres"),
    ("puerto carreno", "Puerto Carreno"),
    ("puerto carreño", "Puerto Carreno"),
    ("arauca", "Arauca"),
];

// First match wins; keep the order.
const INSTITUTION_PATTERNS: &[(&str, &str)] = &[
    (r"\bsena\b|servicio nacional de aprendizaje", "SENA"),
    (r"universidad nacional", "Universidad Nacional de Colombia"),
    (r"\bu\.?\s*nal\b|\bunal\b", "Universidad Nacional de Colombia"),
    (r"universidad de los andes|uniandes", "Universidad de los Andes"),
    (
        r"universidad javeriana|javeriana|\bpuj\b",
        "Pontificia Universidad Javeriana",
    ),
    (r"universidad del rosario|rosario", "Universidad del Rosario"),
    (r"universidad externado", "Universidad Externado de Colombia"),
    (r"universidad de antioquia|\budea\b", "Universidad de Antioquia"),
    (r"eafit", "Universidad EAFIT"),
    (r"universidad del valle|univalle", "Universidad del Valle"),
    (
        r"universidad industrial de santander|\buis\b",
        "Universidad Industrial de Santander",
    ),
    (r"universidad del norte|uninorte", "Universidad del Norte"),
    (r"universidad santo tom[aá]s|\busta\b", "Universidad Santo Tomas"),
    (r"universidad libre", "Universidad Libre"),
    (r"universidad de medell[ií]n", "Universidad de Medellin"),
    (r"polit[eé]cnico|poli gran ?colombiano", "Politecnico Grancolombiano"),
    (
        r"minuto de dios|uniminuto",
        "Corporacion Universitaria Minuto de Dios",
    ),
    (
        r"colsubsidio",
        "Caja Colombiana de Subsidio Familiar Colsubsidio",
    ),
];

#[derive(Debug, Clone)]
pub struct InstitutionRule {
    source: String,
    pattern: Regex,
    canonical: String,
}

impl InstitutionRule {
    pub fn new(pattern: &str, canonical: &str) -> Result<Self, CoreError> {
        Ok(Self {
            source: pattern.to_string(),
            pattern: compile_pattern(&format!("(?i){pattern}"))?,
            canonical: canonical.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.pattern.is_match(raw)
    }
}

#[derive(Debug, Clone)]
pub struct LookupTables {
    cities: HashMap<String, String>,
    institutions: Vec<InstitutionRule>,
}

impl LookupTables {
    pub fn builtin() -> Result<Self, CoreError> {
        Self::new(CITY_VARIANTS, INSTITUTION_PATTERNS)
    }

    pub fn new(cities: &[(&str, &str)], institutions: &[(&str, &str)]) -> Result<Self, CoreError> {
        let cities = cities
            .iter()
            .map(|(variant, canonical)| (city_key(variant), canonical.to_string()))
            .collect();
        let institutions = institutions
            .iter()
            .map(|(pattern, canonical)| InstitutionRule::new(pattern, canonical))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            cities,
            institutions,
        })
    }

    pub fn city(&self, raw: &str) -> Option<&str> {
        self.cities.get(&city_key(raw)).map(String::as_str)
    }

    pub fn institution(&self, raw: &str) -> Option<&str> {
        self.institutions
            .iter()
            .find(|rule| rule.matches(raw))
            .map(InstitutionRule::canonical)
    }

    pub fn institution_rules(&self) -> &[InstitutionRule] {
        &self.institutions
    }

    pub fn canonical_cities(&self) -> impl Iterator<Item = &str> {
        self.cities.values().map(String::as_str)
    }
}

/// Lookup key for the city table: lower-cased, accent-folded, single-spaced,
/// with a trailing country name removed.
pub fn city_key(raw: &str) -> String {
    let lowered: String = raw.trim().to_lowercase().chars().map(fold_accent).collect();
    strip_country_suffix(&lowered).join(" ")
}

/// Whitespace tokens of `raw` without trailing `colombia` tokens, however
/// many are repeated. The value is returned untouched when the country name
/// is all there is.
pub fn strip_country_suffix(raw: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();

    while let Some(last) = tokens.last().copied() {
        if tokens.len() > 1 && is_country(last.trim_matches(',')) {
            tokens.pop();
            continue;
        }
        match last.rsplit_once(',') {
            Some((head, tail)) if is_country(tail) && !head.is_empty() => {
                tokens.pop();
                tokens.push(head);
            }
            _ => break,
        }
    }

    if let Some(last) = tokens.pop() {
        let trimmed = last.trim_end_matches(',');
        tokens.push(if trimmed.is_empty() { last } else { trimmed });
    }
    tokens
}

fn is_country(token: &str) -> bool {
    token.to_lowercase() == COUNTRY_SUFFIX
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' => 'a',
        'é' | 'è' | 'ë' => 'e',
        'í' | 'ì' | 'ï' => 'i',
        'ó' | 'ò' | 'ö' => 'o',
        'ú' | 'ù' | 'ü' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|err| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}
