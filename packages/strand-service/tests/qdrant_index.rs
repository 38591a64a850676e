use std::sync::Arc;

use strand_service::{IndexDocument, IndexMetadata, QdrantIndex, SimilarityIndex};
use strand_storage::qdrant::QdrantStore;
use strand_testkit::{StubEmbedding, TEST_VECTOR_DIM, test_config, test_qdrant_url};

#[tokio::test]
#[ignore = "Requires external Qdrant. Set STRAND_QDRANT_URL to run this test."]
async fn qdrant_index_round_trips_product_ids() {
	let Some(url) = test_qdrant_url() else {
		eprintln!("Skipping qdrant_index_round_trips_product_ids; set STRAND_QDRANT_URL to run.");

		return;
	};
	let mut cfg = test_config();

	cfg.storage.qdrant.url = url;
	cfg.storage.qdrant.collection = format!("strand_index_test_{}", std::process::id());

	let store = QdrantStore::new(&cfg.storage.qdrant).expect("Failed to build Qdrant client.");
	let index = QdrantIndex::new(
		store,
		cfg.providers.embedding.clone(),
		Arc::new(StubEmbedding { vector_dim: TEST_VECTOR_DIM }),
	);

	assert!(index.query("hair fall", 5).await.is_err(), "Closed index must reject queries.");

	index.open().await.expect("Failed to open index.");

	let documents = [11_i64, 12]
		.into_iter()
		.map(|id| IndexDocument {
			id: id.to_string(),
			document: format!("Title: Product {id}"),
			metadata: IndexMetadata {
				product_id: id,
				title: format!("Product {id}"),
				category: None,
			},
		})
		.collect::<Vec<_>>();

	index.upsert(&documents).await.expect("Failed to upsert documents.");

	let mut ids = index.query("hair fall", 5).await.expect("Failed to query index.");

	ids.sort();

	assert_eq!(ids, vec!["11".to_string(), "12".to_string()]);

	let cleanup = QdrantStore::new(&cfg.storage.qdrant).expect("Failed to build Qdrant client.");

	cleanup
		.client
		.delete_collection(cfg.storage.qdrant.collection.clone())
		.await
		.expect("Failed to delete test collection.");
}
