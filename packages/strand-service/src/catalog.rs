use crate::{BoxFuture, Catalog, Result};
use strand_storage::{
	db::Db,
	models::{NewProduct, Product},
	queries,
};

/// Postgres-backed catalog.
pub struct PgCatalog {
	pub db: Db,
}
impl PgCatalog {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}

impl Catalog for PgCatalog {
	fn list_products(&self) -> BoxFuture<'_, Result<Vec<Product>>> {
		Box::pin(async move { Ok(queries::list_products(&self.db).await?) })
	}

	fn first_products(&self, limit: u32) -> BoxFuture<'_, Result<Vec<Product>>> {
		Box::pin(async move { Ok(queries::first_products(&self.db, limit).await?) })
	}

	fn products_by_ids<'a>(&'a self, ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Product>>> {
		Box::pin(async move { Ok(queries::products_by_ids(&self.db, ids).await?) })
	}

	fn product(&self, id: i64) -> BoxFuture<'_, Result<Option<Product>>> {
		Box::pin(async move { Ok(queries::get_product(&self.db, id).await?) })
	}

	fn insert_products<'a>(
		&'a self,
		products: &'a [NewProduct],
	) -> BoxFuture<'a, Result<Vec<Product>>> {
		Box::pin(async move { Ok(queries::insert_products(&self.db, products).await?) })
	}
}
