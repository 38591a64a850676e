use crate::{Error, Result, StrandService};
use strand_storage::models::Product;

impl StrandService {
	pub async fn list_products(&self) -> Result<Vec<Product>> {
		self.catalog.list_products().await
	}

	pub async fn get_product(&self, product_id: i64) -> Result<Product> {
		self.catalog
			.product(product_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("Product {product_id} not found.") })
	}
}
