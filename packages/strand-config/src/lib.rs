mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Chat, Config, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers, Qdrant,
	Retrieval, SearchProviderConfig, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("storage.qdrant.url", &cfg.storage.qdrant.url),
		("storage.qdrant.collection", &cfg.storage.qdrant.collection),
		("providers.search.api_base", &cfg.providers.search.api_base),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
		("providers.generation.timeout_ms", cfg.providers.generation.timeout_ms),
		("providers.search.timeout_ms", cfg.providers.search.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.providers.generation.max_retries > 1 {
		return Err(Error::Validation {
			message: "providers.generation.max_retries must be 0 or 1.".to_string(),
		});
	}
	if !cfg.providers.generation.temperature.is_finite()
		|| !(0.0..=2.0).contains(&cfg.providers.generation.temperature)
	{
		return Err(Error::Validation {
			message: "providers.generation.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.providers.search.engine.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.search.engine must be non-empty.".to_string(),
		});
	}
	if cfg.retrieval.top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.fallback_count == 0 {
		return Err(Error::Validation {
			message: "retrieval.fallback_count must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("generation", &cfg.providers.generation.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.search.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.search.api_key = None;
	}

	cfg.providers.embedding.api_base =
		cfg.providers.embedding.api_base.trim_end_matches('/').to_string();
	cfg.providers.generation.api_base =
		cfg.providers.generation.api_base.trim_end_matches('/').to_string();
}
