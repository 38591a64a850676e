use std::time::Duration;

use crate::{Error, Prompt, Result, StrandService};

impl StrandService {
	/// Calls the generation provider with a per-attempt timeout.
	///
	/// Transient failures are retried at most once, after `retry_backoff_ms`.
	pub async fn generate_reply(&self, prompt: &Prompt) -> Result<String> {
		let cfg = &self.cfg.providers.generation;
		let messages = prompt.messages();
		let max_attempts = cfg.max_retries.min(1) + 1;
		let mut attempts = 0;

		loop {
			attempts += 1;

			let call = self.providers.generation.generate(cfg, &messages);
			let result = match tokio::time::timeout(Duration::from_millis(cfg.timeout_ms), call).await
			{
				Ok(result) => result,
				Err(_) => Err(strand_providers::Error::Timeout { timeout_ms: cfg.timeout_ms }),
			};

			match result {
				Ok(text) => {
					tracing::debug!(attempts, chars = text.len(), "Generation finished.");

					return Ok(text);
				},
				Err(err) if err.is_transient() && attempts < max_attempts => {
					tracing::warn!(
						error = %err,
						attempt = attempts,
						backoff_ms = cfg.retry_backoff_ms,
						"Transient generation failure. Retrying."
					);
					tokio::time::sleep(Duration::from_millis(cfg.retry_backoff_ms)).await;
				},
				Err(err) => {
					tracing::error!(error = %err, attempts, "Generation failed.");

					return Err(Error::Generation { message: err.to_string(), attempts });
				},
			}
		}
	}
}
