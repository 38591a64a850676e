//! Salvaging parser for generated replies.
//!
//! The generator is asked for `{"reply": ..., "recommendations": [{"product_id", "reason"}]}`
//! but nothing about its output is trusted. A reply that is not a JSON object is malformed as a
//! whole. Inside an object every field is coerced independently and bad recommendation entries
//! are dropped one by one.

use serde_json::{Map, Value};

use strand_domain::chat::{ChatResponse, RecommendedProduct};

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyParse {
	Parsed(ParsedReply),
	Malformed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
	pub response: ChatResponse,
	/// Recommendation entries that could not be coerced.
	pub dropped: usize,
}

pub fn parse_reply(raw: &str) -> ReplyParse {
	let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw) else {
		return ReplyParse::Malformed;
	};
	let reply = object.get("reply").map(coerce_text).unwrap_or_default();
	let entries = object.get("recommendations").and_then(Value::as_array);
	let mut recommended_products = Vec::new();
	let mut dropped = 0;

	for entry in entries.into_iter().flatten() {
		match entry.as_object().and_then(coerce_recommendation) {
			Some(recommendation) => recommended_products.push(recommendation),
			None => dropped += 1,
		}
	}

	let response = ChatResponse { reply, recommended_products };

	ReplyParse::Parsed(ParsedReply { response, dropped })
}

fn coerce_recommendation(entry: &Map<String, Value>) -> Option<RecommendedProduct> {
	let product_id = coerce_product_id(entry.get("product_id")?)?;
	let reason = entry.get("reason").map(coerce_text).unwrap_or_default();

	Some(RecommendedProduct { product_id, reason })
}

/// Integers pass through, finite floats truncate toward zero, numeric strings parse after trim.
pub fn coerce_product_id(value: &Value) -> Option<i64> {
	match value {
		Value::Number(number) => {
			if let Some(id) = number.as_i64() {
				return Some(id);
			}

			let float = number.as_f64()?;
			let truncated = float.trunc();

			(float.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64)
				.then_some(truncated as i64)
		},
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

/// Strings as-is, null as empty, anything else as its JSON text.
pub fn coerce_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}
