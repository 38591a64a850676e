pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// `field` names the offending input, e.g. `[2].title`.
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, field: Option<String> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Generation failed after {attempts} attempt(s): {message}")]
	Generation { message: String, attempts: u32 },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
	#[error("Similarity index is not open.")]
	IndexClosed,
}
impl From<strand_storage::Error> for Error {
	fn from(err: strand_storage::Error) -> Self {
		match err {
			strand_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			strand_storage::Error::InvalidArgument(message) =>
				Self::InvalidRequest { message, field: None },
			strand_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
		}
	}
}

impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant { message: err.to_string() }
	}
}

impl From<strand_providers::Error> for Error {
	fn from(err: strand_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
