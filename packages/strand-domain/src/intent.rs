//! Heuristic intent classification over the latest user message.
//!
//! Rules are evaluated in table order and the first match wins. Every phrase is matched
//! against the trimmed, lowercased text.

use serde::Serialize;

pub const CLOSER_PHRASES: &[&str] = &[
	"no",
	"no thank you",
	"no thanks",
	"that's all",
	"that is all",
	"im fine",
	"i'm fine",
	"all good",
	"ok thanks",
	"okay thanks",
	"thank you",
	"thanks",
	"thankyou",
];
pub const SAFETY_PHRASES: &[&str] = &[
	"side effect",
	"side-effect",
	"side effects",
	"is it safe",
	"safe to use",
	"is it okay",
	"is it ok",
	"is it fine",
	"okay to use",
	"ok to use",
	"fine to use",
	"harmful",
	"allergy",
	"allergic",
	"contraindication",
	"interaction",
];
pub const CONDITION_KEYWORDS: &[&str] =
	&["pcos", "pregnant", "pregnancy", "bp", "blood pressure", "diabetes", "thyroid"];
// Space-delimited so "user" or "haven't" do not count.
pub const ACTION_WORDS: &[&str] = &[" use ", " take ", " have ", " apply "];

pub const INTENT_RULES: &[IntentRule] = &[
	IntentRule {
		name: "closing_phrase",
		intent: Intent::Closing,
		matcher: Matcher::EqualsOrEndsWith(CLOSER_PHRASES),
	},
	IntentRule {
		name: "safety_phrase",
		intent: Intent::Safety,
		matcher: Matcher::ContainsAny(SAFETY_PHRASES),
	},
	IntentRule {
		name: "condition_question",
		intent: Intent::Safety,
		matcher: Matcher::AllOf(&[
			Matcher::HasQuestion,
			Matcher::ContainsAny(CONDITION_KEYWORDS),
			Matcher::ContainsAny(ACTION_WORDS),
		]),
	},
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
	Closing,
	Safety,
	Normal,
}

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
	EqualsOrEndsWith(&'static [&'static str]),
	ContainsAny(&'static [&'static str]),
	HasQuestion,
	AllOf(&'static [Matcher]),
}

#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
	pub name: &'static str,
	pub intent: Intent,
	pub matcher: Matcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
	pub intent: Intent,
	/// Name of the rule that fired, `None` for the default.
	pub rule: Option<&'static str>,
}

impl Intent {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Closing => "closing",
			Self::Safety => "safety",
			Self::Normal => "normal",
		}
	}

	pub fn is_safety(self) -> bool {
		matches!(self, Self::Safety)
	}
}

impl Matcher {
	pub fn matches(&self, normalized: &str) -> bool {
		match self {
			Self::EqualsOrEndsWith(phrases) => phrases
				.iter()
				.any(|phrase| normalized == *phrase || normalized.ends_with(phrase)),
			Self::ContainsAny(phrases) => phrases.iter().any(|phrase| normalized.contains(phrase)),
			Self::HasQuestion => normalized.contains('?'),
			Self::AllOf(matchers) => matchers.iter().all(|matcher| matcher.matches(normalized)),
		}
	}
}

impl IntentRule {
	pub fn matches(&self, text: &str) -> bool {
		self.matcher.matches(&normalize(text))
	}
}

pub fn normalize(text: &str) -> String {
	text.trim().to_lowercase()
}

pub fn classify(text: &str) -> Classification {
	classify_with(INTENT_RULES, text)
}

pub fn classify_with(rules: &[IntentRule], text: &str) -> Classification {
	let normalized = normalize(text);

	rules
		.iter()
		.find(|rule| rule.matcher.matches(&normalized))
		.map(|rule| Classification { intent: rule.intent, rule: Some(rule.name) })
		.unwrap_or(Classification { intent: Intent::Normal, rule: None })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rule(name: &str) -> &'static IntentRule {
		INTENT_RULES.iter().find(|rule| rule.name == name).expect("Rule must exist.")
	}

	#[test]
	fn closing_rule_matches_suffixes() {
		let closing = rule("closing_phrase");

		assert!(closing.matches("Thanks"));
		assert!(closing.matches("  ok, all good  "));
		assert!(closing.matches("Great, thank you"));
		assert!(!closing.matches("thanks, and what about dandruff?"));
	}

	#[test]
	fn condition_rule_needs_all_parts() {
		let condition = rule("condition_question");

		assert!(condition.matches("I have PCOS, can I use it?"));
		assert!(!condition.matches("I have PCOS, can I use it"));
		assert!(!condition.matches("Is this good for thyroid?"));
		assert!(!condition.matches("Can I use it daily?"));
	}

	#[test]
	fn closing_wins_over_safety() {
		let result = classify("Is it safe? ok thanks");

		assert_eq!(result.intent, Intent::Closing);
		assert_eq!(result.rule, Some("closing_phrase"));
	}

	#[test]
	fn custom_table_can_extend_rules() {
		const RULES: &[IntentRule] = &[IntentRule {
			name: "bye",
			intent: Intent::Closing,
			matcher: Matcher::EqualsOrEndsWith(&["bye"]),
		}];

		assert_eq!(classify_with(RULES, "Bye").intent, Intent::Closing);
		assert_eq!(classify_with(RULES, "thanks").intent, Intent::Normal);
	}
}
