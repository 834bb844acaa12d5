use crate::error::CoreError;
use serde_json::Value;

/// Bump whenever the rules or the response contract below change.
pub const PROMPT_VERSION: &str = "leads-es-v1";

const RULES: &str = r#"Normaliza los siguientes campos de un formulario de inscripcion en Colombia. Aplica estas reglas:

## Reglas de Normalizacion

### Nombres y Apellidos
- Capitalizar correctamente (primera letra mayuscula)
- Eliminar espacios extras
- Mantener tildes y caracteres especiales
- Ejemplo: "JUAN CARLOS PEREZ" -> "Juan Carlos Perez"

### Direccion
- Formato estandar colombiano: "Calle/Carrera/Avenida # - #"
- Abreviaturas: Cra., Cl., Av., Tr., Dg.
- Ejemplo: "CRA 15 NO 100 25" -> "Cra. 15 # 100 - 25"

### Ciudad
- Usar nombre oficial de la ciudad
- Bogota siempre como "Bogota D.C."
- Remover "Colombia" si esta incluido
- Ejemplo: "bogota colombia" -> "Bogota D.C."

### Nivel Educativo
- Estandarizar a: Primaria, Bachiller, Tecnico, Tecnologo, Profesional, Especialista, Magister, Doctorado
- Ejemplo: "BACHILLERATO COMPLETO" -> "Bachiller"

### Ocupacion/Empresa
- Capitalizar correctamente
- Eliminar espacios extras
- Estandarizar nombres conocidos (SENA, universidades)"#;

const RESPONSE_CONTRACT: &str = r#"## Formato de Respuesta

Responde UNICAMENTE con un JSON valido:

{
  "campo1": "valor normalizado",
  "campo2": "valor normalizado"
}

Solo incluye campos que fueron modificados. Si un campo ya esta correctamente formateado, omitelo del JSON. No agregues explicaciones ni texto adicional."#;

pub fn build_prompt(fields: &[(String, String)]) -> Result<String, CoreError> {
    if fields.is_empty() {
        return Err(CoreError::NoFieldsToNormalize);
    }

    let listing = fields
        .iter()
        .map(|(name, value)| format!("- {}: {}", name, Value::String(value.clone())))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "{RULES}\n\n## Campos a Normalizar\n\n{listing}\n\n{RESPONSE_CONTRACT}"
    ))
}
