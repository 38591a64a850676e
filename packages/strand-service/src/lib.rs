pub mod admin;
pub mod catalog;
pub mod chat;
pub mod generate;
pub mod index;
pub mod products;
pub mod prompt;
pub mod reply;
pub mod retrieve;
pub mod safety;

mod error;

pub use admin::IndexReport;
pub use catalog::PgCatalog;
pub use error::{Error, Result};
pub use index::{IndexDocument, IndexMetadata, QdrantIndex};
pub use prompt::Prompt;
pub use reply::{ParsedReply, ReplyParse};
pub use retrieve::{Retrieval, RetrievalSource};
pub use safety::SafetyOutcome;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use strand_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, SearchProviderConfig};
use strand_domain::product::CandidateProduct;
use strand_providers::{embedding, generation, search, search::SearchResults};
use strand_storage::{
	db::Db,
	models::{NewProduct, Product},
	qdrant::QdrantStore,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, strand_providers::Result<Vec<Vec<f32>>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, strand_providers::Result<String>>;
}

pub trait SearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, strand_providers::Result<SearchResults>>;
}

/// Nearest-neighbor lookup over product documents.
///
/// Shared by concurrent chat turns (queries) and the admin reindex (upserts). Implementations do
/// not coordinate the two, so a query issued during a rebuild may see a partially updated index.
pub trait SimilarityIndex
where
	Self: Send + Sync,
{
	fn open(&self) -> BoxFuture<'_, Result<()>>;

	fn close(&self) -> BoxFuture<'_, Result<()>>;

	fn upsert<'a>(&'a self, documents: &'a [IndexDocument]) -> BoxFuture<'a, Result<()>>;

	/// Up to `top_k` document ids, most similar first.
	fn query<'a>(&'a self, text: &'a str, top_k: u32) -> BoxFuture<'a, Result<Vec<String>>>;
}

/// Read and write access to the product catalog.
pub trait Catalog
where
	Self: Send + Sync,
{
	/// Every product, ascending by id.
	fn list_products(&self) -> BoxFuture<'_, Result<Vec<Product>>>;

	/// The first `limit` products, ascending by id.
	fn first_products(&self, limit: u32) -> BoxFuture<'_, Result<Vec<Product>>>;

	/// Products whose id is in `ids`. Order is unspecified.
	fn products_by_ids<'a>(&'a self, ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Product>>>;

	fn product(&self, id: i64) -> BoxFuture<'_, Result<Option<Product>>>;

	fn insert_products<'a>(
		&'a self,
		products: &'a [NewProduct],
	) -> BoxFuture<'a, Result<Vec<Product>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
	pub search: Arc<dyn SearchProvider>,
}

pub struct StrandService {
	pub cfg: Config,
	pub catalog: Arc<dyn Catalog>,
	pub index: Arc<dyn SimilarityIndex>,
	pub providers: Providers,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, strand_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, strand_providers::Result<String>> {
		Box::pin(generation::generate(cfg, messages))
	}
}

impl SearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, strand_providers::Result<SearchResults>> {
		Box::pin(search::search(cfg, query))
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
		search: Arc<dyn SearchProvider>,
	) -> Self {
		Self { embedding, generation, search }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), generation: provider.clone(), search: provider }
	}
}

impl StrandService {
	/// Wires the Postgres catalog and the Qdrant index with the HTTP providers.
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		let providers = Providers::default();
		let index = QdrantIndex::new(
			qdrant,
			cfg.providers.embedding.clone(),
			providers.embedding.clone(),
		);

		Self { cfg, catalog: Arc::new(PgCatalog::new(db)), index: Arc::new(index), providers }
	}

	pub fn with_parts(
		cfg: Config,
		catalog: Arc<dyn Catalog>,
		index: Arc<dyn SimilarityIndex>,
		providers: Providers,
	) -> Self {
		Self { cfg, catalog, index, providers }
	}

	pub async fn open(&self) -> Result<()> {
		self.index.open().await
	}

	pub async fn close(&self) -> Result<()> {
		self.index.close().await
	}
}

/// Snapshot of the fields a conversation turn needs from a catalog row.
pub fn candidate_from_product(product: &Product) -> CandidateProduct {
	CandidateProduct {
		id: product.id,
		title: product.title.clone(),
		category: product.category.clone(),
		price: product.price,
		short_description: product.short_description.clone(),
		features: product.features.clone(),
		long_description: product.long_description.clone(),
	}
}
