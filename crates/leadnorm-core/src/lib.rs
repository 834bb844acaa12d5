pub mod canonical;
pub mod domain;
pub mod error;
pub mod prompt;
pub mod report;
pub mod response;
pub mod rules;
pub mod tables;
pub mod time;
pub mod trigger;

pub use canonical::Canonicalizer;
pub use domain::*;
pub use error::{CoreError, ParseError};
pub use prompt::{build_prompt, PROMPT_VERSION};
pub use report::{EffectiveConfig, RecordDetail, RecordOutcome, RunReport, RunSummary};
pub use response::parse_response;
pub use rules::*;
pub use tables::LookupTables;
pub use trigger::{Invocation, TriggerEvent};
