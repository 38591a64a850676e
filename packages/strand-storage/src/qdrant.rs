pub const DENSE_VECTOR_NAME: &str = "dense";

use qdrant_client::qdrant::{
	CreateCollectionBuilder, Distance, VectorParamsBuilder, VectorsConfigBuilder,
};

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &strand_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection with a single named dense vector when it does not exist yet.
	///
	/// Returns `true` when the collection was created.
	pub async fn ensure_collection(&self) -> Result<bool> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(false);
		}

		let mut vectors_config = VectorsConfigBuilder::default();

		vectors_config.add_named_vector_params(
			DENSE_VECTOR_NAME,
			VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
		);

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(vectors_config),
			)
			.await?;

		tracing::info!(collection = %self.collection, vector_dim = self.vector_dim, "Created Qdrant collection.");

		Ok(true)
	}
}
