pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Provider call timed out after {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
}
impl Error {
	/// Whether a second attempt could plausibly succeed.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Reqwest(err) =>
				err.is_timeout()
					|| err.is_connect()
					|| err
						.status()
						.map(|status| status.as_u16() == 429 || status.is_server_error())
						.unwrap_or(false),
			Self::Timeout { .. } => true,
			_ => false,
		}
	}
}
