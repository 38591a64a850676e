use strand_service::{Error, IndexReport};
use strand_storage::models::NewProduct;
use strand_testkit::{
	MemoryCatalog, ScriptedGeneration, ScriptedSearch, StaticIndex, TestHarness, doubles,
	test_config,
};

fn harness(catalog: MemoryCatalog) -> TestHarness {
	TestHarness::new(
		catalog,
		StaticIndex::empty(),
		ScriptedGeneration::always("{}"),
		ScriptedSearch::answer("unused"),
	)
}

#[tokio::test]
async fn build_index_upserts_one_document_per_product() {
	let mut serum = doubles::product(7, "Scalp Serum");

	serum.category = Some("Serums".to_string());
	serum.price = Some(499.0);

	let harness = harness(MemoryCatalog::new(vec![serum, doubles::product(2, "Hair Oil")]));
	let service = harness.service(test_config());
	let report = service.build_index().await.expect("Reindex failed.");

	assert_eq!(report, IndexReport { indexed_count: 2 });

	let documents = harness.index.upserted();

	assert_eq!(documents.iter().map(|doc| doc.id.as_str()).collect::<Vec<_>>(), vec!["2", "7"]);
	assert_eq!(documents[1].document, "Title: Scalp Serum\nCategory: Serums\nPrice: 499.0");
	assert_eq!(documents[1].metadata.product_id, 7);
	assert_eq!(documents[1].metadata.category.as_deref(), Some("Serums"));
	assert_eq!(documents[0].metadata.category, None);
}

#[tokio::test]
async fn empty_catalog_indexes_nothing() {
	let harness = harness(MemoryCatalog::new(Vec::new()));
	let service = harness.service(test_config());
	let report = service.build_index().await.expect("Reindex failed.");

	assert_eq!(report.indexed_count, 0);
	assert!(harness.index.upserted().is_empty());
}

#[tokio::test]
async fn reindex_into_closed_index_fails() {
	let harness = harness(MemoryCatalog::new(vec![doubles::product(1, "Shampoo")]));
	let service = harness.service(test_config());

	service.close().await.expect("Close failed.");

	let err = service.build_index().await.expect_err("Reindex must fail.");

	assert!(matches!(err, Error::IndexClosed), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn import_assigns_ids_and_lists_by_id() {
	let harness = harness(MemoryCatalog::new(vec![doubles::product(4, "Existing")]));
	let service = harness.service(test_config());
	let inserted = service
		.import_products(vec![
			NewProduct { title: "  Anti-Dandruff Shampoo ".to_string(), ..Default::default() },
			NewProduct {
				title: "Hair Vitamins".to_string(),
				price: Some(899.0),
				..Default::default()
			},
		])
		.await
		.expect("Import failed.");

	assert_eq!(inserted.iter().map(|p| p.id).collect::<Vec<_>>(), vec![5, 6]);
	assert_eq!(inserted[0].title, "Anti-Dandruff Shampoo");

	let listed = service.list_products().await.expect("List failed.");

	assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![4, 5, 6]);
}

#[tokio::test]
async fn import_rejects_empty_batches_and_blank_titles() {
	let harness = harness(MemoryCatalog::new(Vec::new()));
	let service = harness.service(test_config());
	let err = service.import_products(Vec::new()).await.expect_err("Import must fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");

	let batch = vec![
		NewProduct { title: "Serum".to_string(), ..Default::default() },
		NewProduct { title: "   ".to_string(), ..Default::default() },
	];
	let err = service.import_products(batch).await.expect_err("Import must fail.");

	assert!(
		matches!(
			&err,
			Error::InvalidRequest { message, field }
				if message.contains("index 1") && field.as_deref() == Some("[1].title")
		),
		"Unexpected error: {err:?}"
	);
	assert!(harness.catalog.products().is_empty());
}

#[tokio::test]
async fn get_product_reports_missing_ids() {
	let harness = harness(MemoryCatalog::new(vec![doubles::product(3, "Hair Oil")]));
	let service = harness.service(test_config());

	assert_eq!(service.get_product(3).await.expect("Lookup failed.").title, "Hair Oil");

	let err = service.get_product(9).await.expect_err("Lookup must fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");
}
