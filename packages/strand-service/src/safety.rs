use std::time::Duration;

use crate::StrandService;
use strand_providers::search::SearchResults;

/// What the safety search produced for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyOutcome {
	Found(String),
	/// The search succeeded but returned nothing usable.
	Empty,
	/// No search key is configured. No request was made.
	Disabled,
	Failed { message: String },
}
impl SafetyOutcome {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Found(_) => "found",
			Self::Empty => "empty",
			Self::Disabled => "disabled",
			Self::Failed { .. } => "failed",
		}
	}

	pub fn into_context(self) -> Option<String> {
		match self {
			Self::Found(text) => Some(text),
			_ => None,
		}
	}
}

pub fn safety_query(query: &str, titles: &[&str]) -> String {
	format!("{query} {} side effects", titles.join(", "))
}

/// Prefers the engine's overview answer, then the collected snippets joined by newlines.
pub fn context_from_results(results: SearchResults) -> SafetyOutcome {
	if let Some(answer) = results.answer.filter(|answer| !answer.is_empty()) {
		return SafetyOutcome::Found(answer);
	}
	if results.snippets.is_empty() {
		return SafetyOutcome::Empty;
	}

	SafetyOutcome::Found(results.snippets.join("\n"))
}

impl StrandService {
	/// Looks up side-effect information for the query and the candidate titles. Never fails.
	pub async fn fetch_safety_context(&self, query: &str, titles: &[&str]) -> SafetyOutcome {
		let cfg = &self.cfg.providers.search;

		if cfg.configured_key().is_none() {
			tracing::debug!("Safety search is disabled because no search key is configured.");

			return SafetyOutcome::Disabled;
		}

		let search_query = safety_query(query, titles);
		let call = self.providers.search.search(cfg, &search_query);
		let outcome = match tokio::time::timeout(Duration::from_millis(cfg.timeout_ms), call).await
		{
			Ok(Ok(results)) => context_from_results(results),
			Ok(Err(err)) => SafetyOutcome::Failed { message: err.to_string() },
			Err(_) => SafetyOutcome::Failed {
				message: format!("Search timed out after {} ms.", cfg.timeout_ms),
			},
		};

		match &outcome {
			SafetyOutcome::Failed { message } => {
				tracing::warn!(error = %message, "Safety search failed. Continuing without it.");
			},
			other => {
				tracing::debug!(outcome = other.as_str(), "Safety search finished.");
			},
		}

		outcome
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_appends_titles_and_suffix() {
		assert_eq!(
			safety_query("Is it safe?", &["Scalp Serum", "Hair Oil"]),
			"Is it safe? Scalp Serum, Hair Oil side effects"
		);
	}

	#[test]
	fn overview_answer_wins_over_snippets() {
		let results = SearchResults {
			answer: Some("Generally well tolerated.".to_string()),
			snippets: vec!["Snippet".to_string()],
		};

		assert_eq!(
			context_from_results(results),
			SafetyOutcome::Found("Generally well tolerated.".to_string())
		);
	}

	#[test]
	fn snippets_are_joined_by_newlines() {
		let results =
			SearchResults { answer: None, snippets: vec!["One.".to_string(), "Two.".to_string()] };

		assert_eq!(context_from_results(results).into_context(), Some("One.\nTwo.".to_string()));
	}

	#[test]
	fn nothing_usable_is_empty_not_failed() {
		assert_eq!(context_from_results(SearchResults::default()), SafetyOutcome::Empty);
		assert_eq!(SafetyOutcome::Empty.into_context(), None);
		assert_eq!(SafetyOutcome::Failed { message: "boom".to_string() }.into_context(), None);
	}
}
