use std::env;

use strand_config::Postgres;
use strand_storage::{db::Db, models::NewProduct, queries};

fn env_dsn() -> Option<String> {
	env::var("STRAND_PG_DSN").ok()
}

fn new_product(title: &str, category: Option<&str>) -> NewProduct {
	NewProduct {
		title: title.to_string(),
		price: Some(499.0),
		category: category.map(str::to_string),
		..Default::default()
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STRAND_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(dsn) = env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set STRAND_PG_DSN to run this test.");

		return;
	};
	let db = Db::connect(&Postgres { dsn, pool_max_conns: 1 })
		.await
		.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	db.ensure_schema().await.expect("Schema bootstrap must be idempotent.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'products'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STRAND_PG_DSN to run."]
async fn inserted_products_are_listed_by_ascending_id() {
	let Some(dsn) = env_dsn() else {
		eprintln!(
			"Skipping inserted_products_are_listed_by_ascending_id; set STRAND_PG_DSN to run this test."
		);

		return;
	};
	let db = Db::connect(&Postgres { dsn, pool_max_conns: 1 })
		.await
		.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let inserted = queries::insert_products(
		&db,
		&[new_product("Hair Oil", Some("Oils")), new_product("Scalp Serum", None)],
	)
	.await
	.expect("Failed to insert products.");

	assert_eq!(inserted.len(), 2);
	assert!(inserted[0].id < inserted[1].id);

	let ids = inserted.iter().map(|product| product.id).collect::<Vec<_>>();
	let fetched = queries::products_by_ids(&db, &ids).await.expect("Failed to fetch products.");

	assert_eq!(fetched.len(), 2);

	let all = queries::list_products(&db).await.expect("Failed to list products.");

	assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));

	let first = queries::first_products(&db, 1).await.expect("Failed to fetch prefix.");

	assert_eq!(first.len(), 1);
	assert_eq!(first[0].id, all[0].id);

	let found = queries::get_product(&db, ids[1]).await.expect("Failed to get product.");

	assert_eq!(found.map(|product| product.title), Some("Scalp Serum".to_string()));
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STRAND_PG_DSN to run."]
async fn blank_titles_are_rejected() {
	let Some(dsn) = env_dsn() else {
		eprintln!("Skipping blank_titles_are_rejected; set STRAND_PG_DSN to run this test.");

		return;
	};
	let db = Db::connect(&Postgres { dsn, pool_max_conns: 1 })
		.await
		.expect("Failed to connect to Postgres.");
	let result = queries::insert_products(&db, &[new_product("  ", None)]).await;

	assert!(matches!(result, Err(strand_storage::Error::InvalidArgument(_))));
}
