use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

pub const MAX_SNIPPET_RESULTS: usize = 3;

/// What the search collaborator returned that is usable as context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
	/// Synthesized overview answer, when the engine provides one.
	pub answer: Option<String>,
	/// Snippets from the leading organic results, in rank order.
	pub snippets: Vec<String>,
}

pub async fn search(cfg: &strand_config::SearchProviderConfig, query: &str) -> Result<SearchResults> {
	let Some(api_key) = cfg.configured_key() else {
		return Err(Error::InvalidConfig {
			message: "Search provider api_key is not configured.".to_string(),
		});
	};
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

	tracing::debug!(provider_id = %cfg.provider_id, engine = %cfg.engine, "Sending search request.");

	let res = client
		.get(&cfg.api_base)
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.query(&[("engine", cfg.engine.as_str()), ("q", query)])
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_response(json)
}

fn parse_search_response(json: Value) -> Result<SearchResults> {
	if !json.is_object() {
		return Err(Error::InvalidResponse {
			message: "Search response must be a JSON object.".to_string(),
		});
	}

	let answer = json
		.get("ai_overview")
		.and_then(|overview| overview.get("answer"))
		.and_then(|answer| answer.as_str())
		.filter(|answer| !answer.is_empty())
		.map(str::to_string);
	let snippets = json
		.get("organic_results")
		.and_then(|v| v.as_array())
		.map(|results| {
			results
				.iter()
				.take(MAX_SNIPPET_RESULTS)
				.filter_map(|item| item.get("snippet").and_then(|s| s.as_str()))
				.filter(|snippet| !snippet.is_empty())
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default();

	Ok(SearchResults { answer, snippets })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_overview_and_leading_snippets() {
		let json = serde_json::json!({
			"ai_overview": { "answer": "Generally well tolerated." },
			"organic_results": [
				{ "snippet": "one" },
				{ "title": "no snippet" },
				{ "snippet": "three" },
				{ "snippet": "four" }
			]
		});
		let results = parse_search_response(json).expect("parse failed");

		assert_eq!(results.answer.as_deref(), Some("Generally well tolerated."));
		assert_eq!(results.snippets, vec!["one".to_string(), "three".to_string()]);
	}

	#[test]
	fn missing_sections_are_empty() {
		let results = parse_search_response(serde_json::json!({ "search_metadata": {} }))
			.expect("parse failed");

		assert_eq!(results, SearchResults::default());
	}

	#[test]
	fn non_object_is_invalid() {
		assert!(matches!(
			parse_search_response(serde_json::json!(["a"])),
			Err(Error::InvalidResponse { .. })
		));
	}
}
