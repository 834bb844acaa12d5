pub mod field;
pub mod ids;
pub mod lead;

pub use field::{validate_field_name, FieldKind, DEFAULT_FIELDS};
pub use ids::LeadId;
pub use lead::{FieldMap, Lead};
