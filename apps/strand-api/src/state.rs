use std::sync::Arc;

use strand_service::StrandService;
use strand_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<StrandService>,
}
impl AppState {
	/// Connects the catalog, applies the schema, and opens the similarity index.
	pub async fn new(config: strand_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = StrandService::new(config, db, qdrant);

		service.open().await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: StrandService) -> Self {
		Self { service: Arc::new(service) }
	}
}
