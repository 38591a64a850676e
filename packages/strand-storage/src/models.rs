use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
	pub id: i64,
	pub title: String,
	pub price: Option<f64>,
	pub short_description: Option<String>,
	pub long_description: Option<String>,
	pub features: Option<String>,
	pub image_url: Option<String>,
	pub category: Option<String>,
	pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
	pub title: String,
	#[serde(default)]
	pub price: Option<f64>,
	#[serde(default)]
	pub short_description: Option<String>,
	#[serde(default)]
	pub long_description: Option<String>,
	#[serde(default)]
	pub features: Option<String>,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub source_url: Option<String>,
}
