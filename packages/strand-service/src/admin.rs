use serde::{Deserialize, Serialize};

use crate::{Error, IndexDocument, IndexMetadata, Result, StrandService, candidate_from_product};
use strand_domain::product;
use strand_storage::models::{NewProduct, Product};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
	pub indexed_count: u64,
}

impl StrandService {
	/// Re-embeds the whole catalog into the similarity index.
	pub async fn build_index(&self) -> Result<IndexReport> {
		let products = self.catalog.list_products().await?;

		if products.is_empty() {
			tracing::info!("Catalog is empty. Nothing to index.");

			return Ok(IndexReport { indexed_count: 0 });
		}

		let documents = products.iter().map(index_document).collect::<Vec<_>>();

		self.index.upsert(&documents).await?;

		tracing::info!(indexed_count = documents.len(), "Rebuilt the similarity index.");

		Ok(IndexReport { indexed_count: documents.len() as u64 })
	}

	pub async fn import_products(&self, products: Vec<NewProduct>) -> Result<Vec<Product>> {
		if products.is_empty() {
			return Err(Error::InvalidRequest {
				message: "At least one product is required.".to_string(),
				field: None,
			});
		}
		if let Some(position) = products.iter().position(|product| product.title.trim().is_empty())
		{
			return Err(Error::InvalidRequest {
				message: format!("Product at index {position} has an empty title."),
				field: Some(format!("[{position}].title")),
			});
		}

		let inserted = self.catalog.insert_products(&products).await?;

		tracing::info!(count = inserted.len(), "Imported products.");

		Ok(inserted)
	}
}

pub fn index_document(product: &Product) -> IndexDocument {
	IndexDocument {
		id: product.id.to_string(),
		document: product::product_text(&candidate_from_product(product)),
		metadata: IndexMetadata {
			product_id: product.id,
			title: product.title.clone(),
			category: product.category.clone(),
		},
	}
}
