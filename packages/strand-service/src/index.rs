use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use qdrant_client::{
	client::Payload,
	qdrant::{
		PointId, PointStruct, Query, QueryPointsBuilder, UpsertPointsBuilder, Vector,
		point_id::PointIdOptions,
	},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BoxFuture, EmbeddingProvider, Error, Result, SimilarityIndex};
use strand_config::EmbeddingProviderConfig;
use strand_storage::qdrant::{DENSE_VECTOR_NAME, QdrantStore};

const EMBED_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
	pub id: String,
	pub document: String,
	pub metadata: IndexMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
	pub product_id: i64,
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

/// Qdrant collection of product documents, embedded through the embedding provider.
///
/// Points are keyed by the numeric product id, so a reindex overwrites in place. Upserts are
/// neither batched atomically nor serialized against queries.
pub struct QdrantIndex {
	store: QdrantStore,
	cfg: EmbeddingProviderConfig,
	embedding: Arc<dyn EmbeddingProvider>,
	opened: AtomicBool,
}
impl QdrantIndex {
	pub fn new(
		store: QdrantStore,
		cfg: EmbeddingProviderConfig,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { store, cfg, embedding, opened: AtomicBool::new(false) }
	}

	fn ensure_open(&self) -> Result<()> {
		if !self.opened.load(Ordering::Acquire) {
			return Err(Error::IndexClosed);
		}

		Ok(())
	}

	async fn embed_all(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let vectors = self.embedding.embed(&self.cfg, texts).await?;

		if vectors.len() != texts.len() {
			return Err(Error::Provider {
				message: "Embedding provider returned a mismatched vector count.".to_string(),
			});
		}
		if vectors.iter().any(|vector| vector.len() != self.store.vector_dim as usize) {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vectors)
	}

	async fn upsert_documents(&self, documents: &[IndexDocument]) -> Result<()> {
		self.ensure_open()?;

		for batch in documents.chunks(EMBED_BATCH_SIZE) {
			let texts = batch.iter().map(|doc| doc.document.clone()).collect::<Vec<_>>();
			let vectors = self.embed_all(&texts).await?;
			let mut points = Vec::with_capacity(batch.len());

			for (doc, vec) in batch.iter().zip(vectors) {
				let point_id: u64 = doc.id.parse().map_err(|_| Error::InvalidRequest {
					message: format!("Index document id {:?} is not a product id.", doc.id),
					field: Some("id".to_string()),
				})?;
				let mut payload = Payload::new();

				payload.insert("product_id", Value::from(doc.metadata.product_id));
				payload.insert("title", doc.metadata.title.clone());

				if let Some(category) = &doc.metadata.category {
					payload.insert("category", category.clone());
				}

				payload.insert("document", doc.document.clone());

				let mut vectors = HashMap::new();

				vectors.insert(DENSE_VECTOR_NAME.to_string(), Vector::from(vec));
				points.push(PointStruct::new(point_id, vectors, payload));
			}

			self.store
				.client
				.upsert_points(
					UpsertPointsBuilder::new(self.store.collection.clone(), points).wait(true),
				)
				.await?;
		}

		tracing::info!(
			collection = %self.store.collection,
			count = documents.len(),
			"Upserted product documents."
		);

		Ok(())
	}

	async fn query_ids(&self, text: &str, top_k: u32) -> Result<Vec<String>> {
		self.ensure_open()?;

		let vectors = self.embed_all(&[text.to_string()]).await?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};
		let search = QueryPointsBuilder::new(self.store.collection.clone())
			.query(Query::new_nearest(vector))
			.using(DENSE_VECTOR_NAME)
			.limit(u64::from(top_k))
			.with_payload(false);
		let response = self.store.client.query(search).await?;

		Ok(response
			.result
			.iter()
			.filter_map(|point| point.id.as_ref())
			.filter_map(point_id_text)
			.collect())
	}
}

impl SimilarityIndex for QdrantIndex {
	fn open(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.store.ensure_collection().await?;
			self.opened.store(true, Ordering::Release);

			Ok(())
		})
	}

	fn close(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.opened.store(false, Ordering::Release);

			Ok(())
		})
	}

	fn upsert<'a>(&'a self, documents: &'a [IndexDocument]) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.upsert_documents(documents))
	}

	fn query<'a>(&'a self, text: &'a str, top_k: u32) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(self.query_ids(text, top_k))
	}
}

fn point_id_text(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(id)) => Some(id.to_string()),
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		None => None,
	}
}
