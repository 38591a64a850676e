//! In-memory stand-ins for every collaborator the service talks to.
//!
//! Each double counts its calls and records what it was given, so tests can assert both the
//! outcome and which collaborators were touched.

use std::{
	collections::VecDeque,
	sync::{
		Arc, Mutex, MutexGuard,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration,
};

use serde_json::Value;

use strand_config::{EmbeddingProviderConfig, LlmProviderConfig, SearchProviderConfig};
use strand_providers::search::SearchResults;
use strand_service::{
	BoxFuture, Catalog, EmbeddingProvider, Error, GenerationProvider, IndexDocument, Result,
	SearchProvider, SimilarityIndex,
};
use strand_storage::models::{NewProduct, Product};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}

pub fn product(id: i64, title: &str) -> Product {
	Product {
		id,
		title: title.to_string(),
		price: None,
		short_description: None,
		long_description: None,
		features: None,
		image_url: None,
		category: None,
		source_url: None,
	}
}

#[derive(Default)]
pub struct MemoryCatalog {
	products: Mutex<Vec<Product>>,
	failing: bool,
	pub calls: Arc<AtomicUsize>,
}
impl MemoryCatalog {
	pub fn new(mut products: Vec<Product>) -> Self {
		products.sort_by_key(|product| product.id);

		Self { products: Mutex::new(products), ..Default::default() }
	}

	/// Every call fails with a storage error.
	pub fn failing() -> Self {
		Self { failing: true, ..Default::default() }
	}

	pub fn products(&self) -> Vec<Product> {
		lock(&self.products).clone()
	}

	fn enter(&self) -> Result<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		if self.failing {
			return Err(Error::Storage { message: "Catalog is unavailable.".to_string() });
		}

		Ok(())
	}
}

impl Catalog for MemoryCatalog {
	fn list_products(&self) -> BoxFuture<'_, Result<Vec<Product>>> {
		let result = self.enter().map(|()| self.products());

		Box::pin(async move { result })
	}

	fn first_products(&self, limit: u32) -> BoxFuture<'_, Result<Vec<Product>>> {
		let result = self
			.enter()
			.map(|()| self.products().into_iter().take(limit as usize).collect::<Vec<_>>());

		Box::pin(async move { result })
	}

	fn products_by_ids<'a>(&'a self, ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Product>>> {
		// Storage order, not request order.
		let result = self.enter().map(|()| {
			self.products()
				.into_iter()
				.filter(|product| ids.contains(&product.id))
				.collect::<Vec<_>>()
		});

		Box::pin(async move { result })
	}

	fn product(&self, id: i64) -> BoxFuture<'_, Result<Option<Product>>> {
		let result = self
			.enter()
			.map(|()| self.products().into_iter().find(|product| product.id == id));

		Box::pin(async move { result })
	}

	fn insert_products<'a>(
		&'a self,
		products: &'a [NewProduct],
	) -> BoxFuture<'a, Result<Vec<Product>>> {
		let result = self.enter().map(|()| {
			let mut stored = lock(&self.products);
			let mut next_id = stored.last().map(|product| product.id + 1).unwrap_or(1);
			let mut inserted = Vec::with_capacity(products.len());

			for new in products {
				let row = Product {
					id: next_id,
					title: new.title.trim().to_string(),
					price: new.price,
					short_description: new.short_description.clone(),
					long_description: new.long_description.clone(),
					features: new.features.clone(),
					image_url: new.image_url.clone(),
					category: new.category.clone(),
					source_url: new.source_url.clone(),
				};

				next_id += 1;
				stored.push(row.clone());
				inserted.push(row);
			}

			inserted
		});

		Box::pin(async move { result })
	}
}

/// Returns a fixed ranking for every query.
pub struct StaticIndex {
	ids: Vec<String>,
	failing: bool,
	opened: AtomicBool,
	pub calls: Arc<AtomicUsize>,
	pub queries: Mutex<Vec<(String, u32)>>,
	pub upserts: Mutex<Vec<IndexDocument>>,
}
impl StaticIndex {
	/// An open index that ranks `ids` first to last.
	pub fn ranking<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			ids: ids.into_iter().map(Into::into).collect(),
			failing: false,
			opened: AtomicBool::new(true),
			calls: Arc::new(AtomicUsize::new(0)),
			queries: Mutex::new(Vec::new()),
			upserts: Mutex::new(Vec::new()),
		}
	}

	pub fn empty() -> Self {
		Self::ranking(Vec::<String>::new())
	}

	/// Every query fails.
	pub fn failing() -> Self {
		Self { failing: true, ..Self::empty() }
	}

	pub fn is_open(&self) -> bool {
		self.opened.load(Ordering::SeqCst)
	}

	pub fn upserted(&self) -> Vec<IndexDocument> {
		lock(&self.upserts).clone()
	}
}

impl SimilarityIndex for StaticIndex {
	fn open(&self) -> BoxFuture<'_, Result<()>> {
		self.opened.store(true, Ordering::SeqCst);

		Box::pin(async { Ok(()) })
	}

	fn close(&self) -> BoxFuture<'_, Result<()>> {
		self.opened.store(false, Ordering::SeqCst);

		Box::pin(async { Ok(()) })
	}

	fn upsert<'a>(&'a self, documents: &'a [IndexDocument]) -> BoxFuture<'a, Result<()>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let result = if self.is_open() {
			lock(&self.upserts).extend_from_slice(documents);

			Ok(())
		} else {
			Err(Error::IndexClosed)
		};

		Box::pin(async move { result })
	}

	fn query<'a>(&'a self, text: &'a str, top_k: u32) -> BoxFuture<'a, Result<Vec<String>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		lock(&self.queries).push((text.to_string(), top_k));

		let result = if !self.is_open() {
			Err(Error::IndexClosed)
		} else if self.failing {
			Err(Error::Qdrant { message: "Index is unavailable.".to_string() })
		} else {
			Ok(self.ids.iter().take(top_k as usize).cloned().collect())
		};

		Box::pin(async move { result })
	}
}

/// Plays back scripted generation results in order.
///
/// Once the script runs out, the fallback reply is returned, or an error when there is none.
pub struct ScriptedGeneration {
	script: Mutex<VecDeque<strand_providers::Result<String>>>,
	fallback: Option<String>,
	delay: Option<Duration>,
	pub calls: Arc<AtomicUsize>,
	pub messages: Mutex<Vec<Vec<Value>>>,
}
impl ScriptedGeneration {
	pub fn new(script: Vec<strand_providers::Result<String>>) -> Self {
		Self {
			script: Mutex::new(script.into()),
			fallback: None,
			delay: None,
			calls: Arc::new(AtomicUsize::new(0)),
			messages: Mutex::new(Vec::new()),
		}
	}

	pub fn always(reply: impl Into<String>) -> Self {
		Self { fallback: Some(reply.into()), ..Self::new(Vec::new()) }
	}

	/// Sleeps before answering, to exercise timeouts.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// The message list of the most recent call.
	pub fn last_messages(&self) -> Option<Vec<Value>> {
		lock(&self.messages).last().cloned()
	}

	fn next(&self) -> strand_providers::Result<String> {
		match lock(&self.script).pop_front() {
			Some(result) => result,
			None => self.fallback.clone().ok_or_else(|| strand_providers::Error::InvalidResponse {
				message: "Generation script is exhausted.".to_string(),
			}),
		}
	}
}

impl GenerationProvider for ScriptedGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, strand_providers::Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		lock(&self.messages).push(messages.to_vec());

		let result = self.next();
		let delay = self.delay;

		Box::pin(async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			result
		})
	}
}

/// Returns the same search results for every query, or fails when none are set.
pub struct ScriptedSearch {
	results: Option<SearchResults>,
	delay: Option<Duration>,
	pub calls: Arc<AtomicUsize>,
	pub queries: Mutex<Vec<String>>,
}
impl ScriptedSearch {
	pub fn returning(results: SearchResults) -> Self {
		Self { results: Some(results), delay: None, calls: Arc::default(), queries: Mutex::default() }
	}

	pub fn answer(text: impl Into<String>) -> Self {
		Self::returning(SearchResults { answer: Some(text.into()), snippets: Vec::new() })
	}

	pub fn failing() -> Self {
		Self { results: None, delay: None, calls: Arc::default(), queries: Mutex::default() }
	}

	/// Sleeps before answering, to exercise the search timeout.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn last_query(&self) -> Option<String> {
		lock(&self.queries).last().cloned()
	}
}

impl SearchProvider for ScriptedSearch {
	fn search<'a>(
		&'a self,
		_cfg: &'a SearchProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, strand_providers::Result<SearchResults>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		lock(&self.queries).push(query.to_string());

		let result = self.results.clone().ok_or_else(|| strand_providers::Error::InvalidResponse {
			message: "Search is unavailable.".to_string(),
		});
		let delay = self.delay;

		Box::pin(async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			result
		})
	}
}

/// Constant unit-valued vectors of the configured width.
pub struct StubEmbedding {
	pub vector_dim: u32,
}
impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, strand_providers::Result<Vec<Vec<f32>>>> {
		let dim = self.vector_dim as usize;
		let vectors = texts.iter().map(|_| vec![1.0; dim]).collect();

		Box::pin(async move { Ok(vectors) })
	}
}
