use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{Result, StrandService, candidate_from_product};
use strand_domain::product::CandidateProduct;
use strand_storage::models::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalSource {
	/// Ranked by the similarity index.
	Index,
	/// The index had nothing usable, so the catalog prefix was used.
	Fallback,
	/// The index call failed and the catalog prefix was used.
	FallbackAfterError,
}
impl RetrievalSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Index => "index",
			Self::Fallback => "fallback",
			Self::FallbackAfterError => "fallback_after_error",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
	pub candidates: Vec<CandidateProduct>,
	pub source: RetrievalSource,
}

impl StrandService {
	/// Candidate products for `query`, in similarity rank order.
	///
	/// Falls back to the first `retrieval.fallback_count` catalog products by ascending id when
	/// the index returns nothing, returns only unknown ids, or fails.
	pub async fn retrieve(&self, query: &str, top_k: u32) -> Result<Retrieval> {
		let source = match self.index.query(query, top_k).await {
			Ok(ids) => {
				let ranked_ids = parse_ranked_ids(&ids);
				let products = if ranked_ids.is_empty() {
					Vec::new()
				} else {
					self.catalog.products_by_ids(&ranked_ids).await?
				};
				let candidates = order_by_rank(&ranked_ids, products);

				if !candidates.is_empty() {
					tracing::debug!(
						returned = ids.len(),
						candidates = candidates.len(),
						"Retrieved candidates from the similarity index."
					);

					return Ok(Retrieval { candidates, source: RetrievalSource::Index });
				}

				RetrievalSource::Fallback
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					"Similarity index query failed. Using catalog fallback."
				);

				RetrievalSource::FallbackAfterError
			},
		};
		let products = self.catalog.first_products(self.cfg.retrieval.fallback_count).await?;

		tracing::debug!(
			source = source.as_str(),
			candidates = products.len(),
			"Retrieved fallback candidates from the catalog."
		);

		Ok(Retrieval { candidates: products.iter().map(candidate_from_product).collect(), source })
	}
}

/// Integer ids in rank order. Unparseable and repeated ids are skipped.
fn parse_ranked_ids(ids: &[String]) -> Vec<i64> {
	let mut seen = HashSet::new();
	let mut out = Vec::with_capacity(ids.len());

	for raw in ids {
		match raw.trim().parse::<i64>() {
			Ok(id) =>
				if seen.insert(id) {
					out.push(id);
				},
			Err(_) => {
				tracing::warn!(id = %raw, "Skipping non-integer id from the similarity index.");
			},
		}
	}

	out
}

/// Reorders catalog rows to follow `ranked_ids`. Ids missing from the catalog are dropped.
fn order_by_rank(ranked_ids: &[i64], products: Vec<Product>) -> Vec<CandidateProduct> {
	let by_id =
		products.into_iter().map(|product| (product.id, product)).collect::<HashMap<_, _>>();

	ranked_ids.iter().filter_map(|id| by_id.get(id)).map(candidate_from_product).collect()
}
