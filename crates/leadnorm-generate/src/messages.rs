use crate::generator::TextGenerator;
use crate::{GenerateError, Result};
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "2023-06-01";
const MESSAGES_PATH: &str = "v1/messages";

#[derive(Debug, Clone)]
pub struct MessagesSettings {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

fn request_body<'a>(settings: &'a MessagesSettings, instruction: &'a str) -> MessagesRequest<'a> {
    MessagesRequest {
        model: &settings.model,
        max_tokens: settings.max_tokens,
        temperature: 0.0,
        messages: [RequestMessage {
            role: "user",
            content: instruction,
        }],
    }
}

// Text blocks joined in order; whitespace-only output counts as empty.
fn response_text(response: &MessagesResponse) -> Result<String> {
    let text: String = response
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(text)
}

fn messages_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), MESSAGES_PATH)
}

#[cfg(feature = "http-generation")]
mod imp {
    use super::{
        messages_url, request_body, response_text, MessagesResponse, MessagesSettings,
        TextGenerator, API_VERSION,
    };
    use crate::{GenerateError, Result};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use tracing::debug;
    use url::Url;

    #[derive(Debug)]
    pub struct MessagesClient {
        settings: MessagesSettings,
        endpoint: Url,
        client: Client,
    }

    impl MessagesClient {
        pub fn new(settings: MessagesSettings) -> Result<Self> {
            let endpoint = Url::parse(&messages_url(&settings.base_url))?;
            let client = Client::builder()
                .user_agent(concat!("leadnorm/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(settings.timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                settings,
                endpoint,
                client,
            })
        }
    }

    impl TextGenerator for MessagesClient {
        fn name(&self) -> &'static str {
            "messages-api"
        }

        fn generate(&self, instruction: &str) -> Result<String> {
            let api_key = self
                .settings
                .api_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| GenerateError::MissingApiKey(self.settings.api_key_env.clone()))?;

            let response = self
                .client
                .post(self.endpoint.clone())
                .header("x-api-key", api_key)
                .header("anthropic-version", API_VERSION)
                .json(&request_body(&self.settings, instruction))
                .send()?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(GenerateError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let body = response.text()?;
            let parsed: MessagesResponse = serde_json::from_str(&body)
                .map_err(|err| GenerateError::Decode(err.to_string()))?;
            let usage = parsed.usage.as_ref();
            debug!(
                model = %self.settings.model,
                input_tokens = usage.map(|u| u.input_tokens).unwrap_or_default(),
                output_tokens = usage.map(|u| u.output_tokens).unwrap_or_default(),
                stop_reason = parsed.stop_reason.as_deref().unwrap_or("unknown"),
                "generation complete"
            );
            response_text(&parsed)
        }
    }
}

#[cfg(not(feature = "http-generation"))]
mod imp {
    use super::{MessagesSettings, TextGenerator};
    use crate::{GenerateError, Result};

    #[derive(Debug)]
    pub struct MessagesClient {
        _settings: MessagesSettings,
    }

    impl MessagesClient {
        pub fn new(settings: MessagesSettings) -> Result<Self> {
            Ok(Self {
                _settings: settings,
            })
        }
    }

    impl TextGenerator for MessagesClient {
        fn name(&self) -> &'static str {
            "messages-api"
        }

        fn generate(&self, _instruction: &str) -> Result<String> {
            Err(GenerateError::Unavailable(
                "built without the http-generation feature".to_string(),
            ))
        }
    }
}

pub use imp::MessagesClient;
