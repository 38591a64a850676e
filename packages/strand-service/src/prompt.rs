//! Generation request assembly.

use serde_json::Value;

use strand_domain::product::{self, CandidateProduct};

const BASE_INSTRUCTIONS: &str = "\
You are a careful, friendly hair & scalp care advisor for our product catalog.
You ONLY recommend from the candidate products I give you.

Conversation guidelines:
- First, briefly acknowledge and summarise the user's concerns in your own words.
- Then clearly say something like: 'Based on your concerns, here are some products that can help:'
  before you describe any product recommendations, so the cards shown in the UI feel on-topic.
- Always recommend 2-4 products by their Product ID with clear, specific reasons that connect to the
  concerns mentioned (e.g. oily scalp, hair thinning, dandruff).
- You must end by asking ONE short follow-up such as
  'Do you have any other hair or scalp concerns you'd like to discuss?'
  and this follow-up should come AFTER you describe the recommended products.
- Do NOT repeat information the user has already clearly given (for example, if they already said they
  have hair fall, don't ask again whether they have hair fall).
";
const SAFETY_INSTRUCTIONS: &str = "\
- In this conversation the user is asking about safety, side effects, or whether products are okay to use with a medical condition.
- First, directly answer the safety question in clear, cautious language BEFORE you talk about products.
- Use any provided safety context carefully: do not invent side effects, and be conservative.
- Always remind the user that you cannot give medical advice and they should consult their doctor,
  especially for conditions like PCOS, pregnancy, blood pressure issues, diabetes or thyroid problems.
";
const CAUTION_INSTRUCTIONS: &str = "\
- If the user ever hints at side effects or safety, be cautious and suggest consulting a doctor.
";
const OUTPUT_CONTRACT: &str = r#"
Return your answer as pure JSON with this shape:
{
  "reply": "string explanation to the user, including recommendations and an optional single
            follow-up question at the end if needed",
  "recommendations": [
    {"product_id": 123, "reason": "short reason"}
  ]
}
Do not include any extra text outside the JSON."#;
const SAFETY_CONTEXT_HEADER: &str = "Additional web safety / side-effect information. Only use side effects or warnings that appear here; do not invent new ones:";

/// The system instructions and the user-role context payload for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
	pub system: String,
	pub context: String,
}
impl Prompt {
	pub fn messages(&self) -> Vec<Value> {
		vec![
			serde_json::json!({ "role": "system", "content": self.system }),
			serde_json::json!({ "role": "user", "content": self.context }),
		]
	}
}

pub fn build_prompt(
	candidates: &[CandidateProduct],
	query: &str,
	safety_intent: bool,
	safety_context: Option<&str>,
) -> Prompt {
	Prompt {
		system: system_instructions(safety_intent),
		context: context_payload(candidates, query, safety_context),
	}
}

pub fn system_instructions(safety_intent: bool) -> String {
	let extra = if safety_intent { SAFETY_INSTRUCTIONS } else { CAUTION_INSTRUCTIONS };

	format!("{BASE_INSTRUCTIONS}{extra}{OUTPUT_CONTRACT}")
}

pub fn context_payload(
	candidates: &[CandidateProduct],
	query: &str,
	safety_context: Option<&str>,
) -> String {
	let blocks = candidates.iter().map(candidate_block).collect::<Vec<_>>().join("\n\n");
	let mut out = format!("Here are the candidate products you can choose from:\n\n{blocks}\n\n");

	out.push_str(&format!("User's latest query:\n{query}\n"));

	if let Some(safety_context) = safety_context.filter(|text| !text.is_empty()) {
		out.push_str(&format!("\n{SAFETY_CONTEXT_HEADER}\n{safety_context}\n"));
	}

	out
}

fn candidate_block(candidate: &CandidateProduct) -> String {
	let mut lines =
		vec![format!("Product ID: {}", candidate.id), format!("Title: {}", candidate.title)];

	if let Some(category) = product::present(&candidate.category) {
		lines.push(format!("Category: {category}"));
	}
	if let Some(price) = candidate.price {
		lines.push(format!("Price: {}", product::format_price(price)));
	}
	if let Some(features) = product::present(&candidate.features) {
		lines.push(format!("Benefits and features: {features}"));
	}
	if let Some(summary) = product::present(&candidate.short_description) {
		lines.push(format!("Summary: {summary}"));
	}

	lines.join("\n")
}
