use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Sends one chat completion request in JSON-object mode and returns the raw message content.
///
/// The content is not parsed. Callers own validation of the generated text.
pub async fn generate(cfg: &strand_config::LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	tracing::debug!(provider_id = %cfg.provider_id, model = %cfg.model, "Sending generation request.");

	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
		"response_format": { "type": "json_object" },
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_content(json)
}

fn parse_completion_content(json: Value) -> Result<String> {
	let message = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Generation response is missing choices[0].message.".to_string(),
		})?;

	match message.get("content") {
		Some(Value::String(content)) => Ok(content.clone()),
		None | Some(Value::Null) => Ok("{}".to_string()),
		Some(_) => Err(Error::InvalidResponse {
			message: "Generation message content must be a string.".to_string(),
		}),
	}
}
