use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub chat: Chat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
	/// Allow any origin on the public router. The browser frontend is served from another origin.
	#[serde(default)]
	pub cors_permissive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub generation: LlmProviderConfig,
	pub search: SearchProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	/// Extra attempts after a transient failure. Only 0 or 1 is accepted.
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	#[serde(default = "default_retry_backoff_ms")]
	pub retry_backoff_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchProviderConfig {
	pub provider_id: String,
	/// Full search endpoint URL, e.g. "https://www.searchapi.io/api/v1/search".
	pub api_base: String,
	/// Optional. Safety augmentation is skipped when unset.
	pub api_key: Option<String>,
	#[serde(default = "default_search_engine")]
	pub engine: String,
	#[serde(default = "default_search_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	pub top_k: u32,
	pub fallback_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chat {
	/// Drop recommendations whose product id was not among the presented candidates.
	#[serde(default)]
	pub restrict_to_candidates: bool,
}

impl Default for Retrieval {
	fn default() -> Self {
		Self { top_k: 8, fallback_count: 5 }
	}
}

impl SearchProviderConfig {
	pub fn configured_key(&self) -> Option<&str> {
		self.api_key.as_deref().filter(|key| !key.trim().is_empty())
	}
}

fn default_max_retries() -> u32 {
	1
}

fn default_retry_backoff_ms() -> u64 {
	250
}

fn default_search_engine() -> String {
	"duckduckgo".to_string()
}

fn default_search_timeout_ms() -> u64 {
	10_000
}
