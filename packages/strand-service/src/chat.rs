use std::collections::HashSet;

use crate::{ReplyParse, Result, StrandService, prompt, reply};
use strand_domain::{
	chat::{self, ChatRequest, ChatResponse},
	intent::{self, Intent},
};

impl StrandService {
	/// Runs one conversation turn over the supplied history.
	pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
		let Some(query) = chat::latest_user_text(&req.messages) else {
			tracing::info!(stage = "prompt_for_input", "No user message in the conversation.");

			return Ok(ChatResponse::prompt_for_input());
		};
		let classification = intent::classify(query);

		tracing::info!(
			stage = "classify",
			intent = classification.intent.as_str(),
			rule = classification.rule.unwrap_or("default"),
			"Classified the latest user message."
		);

		if classification.intent == Intent::Closing {
			return Ok(ChatResponse::goodbye());
		}

		let retrieval = self.retrieve(query, self.cfg.retrieval.top_k).await?;

		tracing::info!(
			stage = "retrieve",
			source = retrieval.source.as_str(),
			candidates = retrieval.candidates.len(),
			"Retrieved candidate products."
		);

		let safety_intent = classification.intent.is_safety();
		let safety_context = if safety_intent {
			let titles = retrieval
				.candidates
				.iter()
				.map(|candidate| candidate.title.as_str())
				.collect::<Vec<_>>();
			let outcome = self.fetch_safety_context(query, &titles).await;

			tracing::info!(
				stage = "augment",
				outcome = outcome.as_str(),
				"Safety augmentation finished."
			);

			outcome.into_context()
		} else {
			None
		};
		let prompt = prompt::build_prompt(
			&retrieval.candidates,
			query,
			safety_intent,
			safety_context.as_deref(),
		);
		let raw = self.generate_reply(&prompt).await?;
		let parsed = match reply::parse_reply(&raw) {
			ReplyParse::Parsed(parsed) => parsed,
			ReplyParse::Malformed => {
				tracing::warn!(
					stage = "parse",
					chars = raw.len(),
					"Generated reply is not a JSON object."
				);

				return Ok(ChatResponse::malformed());
			},
		};
		let mut response = parsed.response;
		let candidate_ids =
			retrieval.candidates.iter().map(|candidate| candidate.id).collect::<HashSet<_>>();
		let unknown = response
			.recommended_products
			.iter()
			.filter(|rec| !candidate_ids.contains(&rec.product_id))
			.count();

		if unknown > 0 {
			tracing::warn!(
				stage = "parse",
				unknown,
				removed = self.cfg.chat.restrict_to_candidates,
				"Recommendations reference products outside the candidate set."
			);

			if self.cfg.chat.restrict_to_candidates {
				response.recommended_products.retain(|rec| candidate_ids.contains(&rec.product_id));
			}
		}

		tracing::info!(
			stage = "done",
			recommended = response.recommended_products.len(),
			dropped = parsed.dropped,
			"Conversation turn finished."
		);

		Ok(response)
	}
}
