use serde::{Deserialize, Serialize};

pub const PROMPT_FOR_INPUT_REPLY: &str = "Please ask a question about your hair or scalp concerns.";
pub const GOODBYE_REPLY: &str = "You're welcome! I'm glad I could help. If you have any other hair or scalp concerns later, just come back and ask.";
pub const MALFORMED_REPLY: &str =
	"I'm sorry, I had trouble formatting my answer. Please try asking your question again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
	#[serde(other)]
	Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub role: Role,
	pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
	#[serde(default)]
	pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedProduct {
	pub product_id: i64,
	pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
	pub reply: String,
	#[serde(default)]
	pub recommended_products: Vec<RecommendedProduct>,
}

impl Message {
	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into() }
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into() }
	}
}

impl ChatResponse {
	pub fn reply_only(reply: impl Into<String>) -> Self {
		Self { reply: reply.into(), recommended_products: Vec::new() }
	}

	pub fn prompt_for_input() -> Self {
		Self::reply_only(PROMPT_FOR_INPUT_REPLY)
	}

	pub fn goodbye() -> Self {
		Self::reply_only(GOODBYE_REPLY)
	}

	pub fn malformed() -> Self {
		Self::reply_only(MALFORMED_REPLY)
	}
}

/// The content of the most recent user-authored message, if any.
pub fn latest_user_text(messages: &[Message]) -> Option<&str> {
	messages.iter().rev().find(|message| message.role == Role::User).map(|m| m.content.as_str())
}
