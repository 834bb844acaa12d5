use crate::error::CoreError;
use serde::Deserialize;
use serde_json::{Map, Value};

const SCHEDULE_SOURCE: &str = "aws.events";
const SCHEDULE_DETAIL_TYPE: &str = "Scheduled Event";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Scheduled,
    Manual { force_all: bool },
}

impl Invocation {
    pub fn force_all(&self) -> bool {
        matches!(self, Self::Manual { force_all: true })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Manual { .. } => "manual",
        }
    }
}

/// Event document handed over by whatever triggered the run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerEvent {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "detail-type")]
    pub detail_type: Option<String>,
    #[serde(default, rename = "forceAll")]
    pub force_all: Option<Value>,
    #[serde(default, rename = "queryStringParameters")]
    pub query: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl TriggerEvent {
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|err| CoreError::InvalidTrigger(err.to_string()))
    }

    pub fn is_scheduled(&self) -> bool {
        self.source.as_deref() == Some(SCHEDULE_SOURCE)
            || self.detail_type.as_deref() == Some(SCHEDULE_DETAIL_TYPE)
    }

    pub fn invocation(&self) -> Result<Invocation, CoreError> {
        if self.is_scheduled() {
            return Ok(Invocation::Scheduled);
        }
        Ok(Invocation::Manual {
            force_all: self.force_all_flag()?,
        })
    }

    // Direct parameter, then query string, then body; the first one present
    // decides.
    fn force_all_flag(&self) -> Result<bool, CoreError> {
        if let Some(direct) = non_null(self.force_all.as_ref()) {
            return Ok(direct == &Value::Bool(true));
        }

        let query = self.query.as_ref().and_then(|query| query.get("forceAll"));
        if let Some(query) = non_null(query) {
            return Ok(query.as_str() == Some("true") || query == &Value::Bool(true));
        }

        let body = match non_null(self.body.as_ref()) {
            Some(Value::String(raw)) if raw.trim().is_empty() => return Ok(false),
            Some(Value::String(raw)) => serde_json::from_str::<Value>(raw)
                .map_err(|err| CoreError::InvalidTrigger(format!("request body: {err}")))?,
            Some(other) => other.clone(),
            None => return Ok(false),
        };
        Ok(body.get("forceAll") == Some(&Value::Bool(true)))
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}
