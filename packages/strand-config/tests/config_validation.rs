use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use strand_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("strand_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> strand_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = strand_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must be valid.");

	assert_eq!(cfg.retrieval.top_k, 8);
	assert_eq!(cfg.retrieval.fallback_count, 5);
	assert_eq!(cfg.providers.search.configured_key(), Some("search-key"));
	assert_eq!(cfg.providers.generation.api_base, "https://api.groq.com/openai/v1");
}

#[test]
fn blank_search_key_normalizes_to_unconfigured() {
	let cfg = load_payload(sample_toml_with(
		"providers.search",
		"api_key",
		Value::String("   ".to_string()),
	))
	.expect("Blank search key must be accepted.");

	assert!(cfg.providers.search.api_key.is_none());
	assert!(cfg.providers.search.configured_key().is_none());
}

#[test]
fn retrieval_and_chat_sections_are_optional() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root.as_table_mut().expect("Template config must be a table.");

	table.remove("retrieval");
	table.remove("chat");

	let cfg = load_payload(toml::to_string(&root).expect("Failed to render template config."))
		.expect("Config without optional sections must load.");

	assert_eq!(cfg.retrieval.top_k, 8);
	assert_eq!(cfg.retrieval.fallback_count, 5);
	assert!(!cfg.chat.restrict_to_candidates);
}

#[test]
fn partial_retrieval_section_keeps_defaults() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root.as_table_mut().expect("Template config must be a table.");
	let mut retrieval = toml::Table::new();

	retrieval.insert("top_k".to_string(), Value::Integer(4));
	table.insert("retrieval".to_string(), Value::Table(retrieval));

	let cfg = load_payload(toml::to_string(&root).expect("Failed to render template config."))
		.expect("Partial retrieval section must load.");

	assert_eq!(cfg.retrieval.top_k, 4);
	assert_eq!(cfg.retrieval.fallback_count, 5);
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let err = load_payload(sample_toml_with("storage.qdrant", "vector_dim", Value::Integer(768)))
		.expect_err("Expected dimension mismatch error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn generation_retries_are_bounded() {
	let err =
		load_payload(sample_toml_with("providers.generation", "max_retries", Value::Integer(3)))
			.expect_err("Expected max_retries validation error.");

	assert!(
		err.to_string().contains("providers.generation.max_retries must be 0 or 1."),
		"Unexpected error: {err}"
	);
}

#[test]
fn top_k_must_be_positive() {
	let mut cfg = base_config();

	cfg.retrieval.top_k = 0;

	let err = strand_config::validate(&cfg).expect_err("Expected top_k validation error.");

	assert!(
		err.to_string().contains("retrieval.top_k must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn generation_key_is_required() {
	let mut cfg = base_config();

	cfg.providers.generation.api_key = " ".to_string();

	let err = strand_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider generation api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("strand_config_test_missing.toml");
	let err = strand_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn invalid_toml_reports_parse_error() {
	let err = load_payload("[service\nhttp_bind = ".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}
