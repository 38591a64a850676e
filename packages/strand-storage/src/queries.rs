use crate::{
	Error, Result,
	db::Db,
	models::{NewProduct, Product},
};

const PRODUCT_COLUMNS: &str = "\
id,
	title,
	price,
	short_description,
	long_description,
	features,
	image_url,
	category,
	source_url";

pub async fn list_products(db: &Db) -> Result<Vec<Product>> {
	let sql = format!("SELECT {PRODUCT_COLUMNS}\nFROM products\nORDER BY id ASC");
	let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn first_products(db: &Db, limit: u32) -> Result<Vec<Product>> {
	let sql = format!("SELECT {PRODUCT_COLUMNS}\nFROM products\nORDER BY id ASC\nLIMIT $1");
	let rows = sqlx::query_as::<_, Product>(&sql)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

/// Rows for `ids` in storage order. Callers that need rank order must reorder.
pub async fn products_by_ids(db: &Db, ids: &[i64]) -> Result<Vec<Product>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!("SELECT {PRODUCT_COLUMNS}\nFROM products\nWHERE id = ANY($1)");
	let rows = sqlx::query_as::<_, Product>(&sql).bind(ids).fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn get_product(db: &Db, id: i64) -> Result<Option<Product>> {
	let sql = format!("SELECT {PRODUCT_COLUMNS}\nFROM products\nWHERE id = $1");
	let row = sqlx::query_as::<_, Product>(&sql).bind(id).fetch_optional(&db.pool).await?;

	Ok(row)
}

pub async fn insert_products(db: &Db, products: &[NewProduct]) -> Result<Vec<Product>> {
	if products.iter().any(|product| product.title.trim().is_empty()) {
		return Err(Error::InvalidArgument("Product title must be non-empty.".to_string()));
	}

	let sql = format!(
		"\
INSERT INTO products (
	title,
	price,
	short_description,
	long_description,
	features,
	image_url,
	category,
	source_url
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
RETURNING {PRODUCT_COLUMNS}"
	);
	let mut tx = db.pool.begin().await?;
	let mut inserted = Vec::with_capacity(products.len());

	for product in products {
		let row = sqlx::query_as::<_, Product>(&sql)
			.bind(product.title.trim())
			.bind(product.price)
			.bind(product.short_description.as_deref())
			.bind(product.long_description.as_deref())
			.bind(product.features.as_deref())
			.bind(product.image_url.as_deref())
			.bind(product.category.as_deref())
			.bind(product.source_url.as_deref())
			.fetch_one(&mut *tx)
			.await?;

		inserted.push(row);
	}

	tx.commit().await?;

	Ok(inserted)
}
