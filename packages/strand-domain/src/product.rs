use serde::{Deserialize, Serialize};

/// Snapshot of a catalog product taken when it is retrieved for a conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProduct {
	pub id: i64,
	pub title: String,
	pub category: Option<String>,
	pub price: Option<f64>,
	pub short_description: Option<String>,
	pub features: Option<String>,
	pub long_description: Option<String>,
}

/// Text that is embedded for the similarity index.
///
/// The layout is part of the index contract. Changing it requires a reindex.
pub fn product_text(product: &CandidateProduct) -> String {
	let mut parts = vec![format!("Title: {}", product.title)];

	if let Some(category) = present(&product.category) {
		parts.push(format!("Category: {category}"));
	}
	if let Some(price) = product.price {
		parts.push(format!("Price: {}", format_price(price)));
	}
	if let Some(short_description) = present(&product.short_description) {
		parts.push(format!("Short description: {short_description}"));
	}
	if let Some(features) = present(&product.features) {
		parts.push(format!("Key benefits and features: {features}"));
	}
	if let Some(long_description) = present(&product.long_description) {
		parts.push(format!("Details: {long_description}"));
	}

	parts.join("\n")
}

/// Formats a price the way the catalog stores it: whole amounts keep one decimal place.
///
/// Magnitudes of at least 1e16 or below 1e-4 switch to exponent form with a signed, two-digit
/// exponent (`1e+16`, `1.5e-05`).
pub fn format_price(price: f64) -> String {
	if price.is_nan() {
		return "nan".to_string();
	}
	if price.is_infinite() {
		return price.to_string();
	}
	if price != 0.0 && !(1e-4..1e16).contains(&price.abs()) {
		return exponent_form(price);
	}
	if price.fract() == 0.0 { format!("{price:.1}") } else { price.to_string() }
}

fn exponent_form(value: f64) -> String {
	let rendered = format!("{value:e}");
	let Some((mantissa, exponent)) = rendered.split_once('e') else {
		return rendered;
	};
	let (sign, digits) = match exponent.strip_prefix('-') {
		Some(digits) => ('-', digits),
		None => ('+', exponent),
	};

	format!("{mantissa}e{sign}{digits:0>2}")
}

/// Treats empty strings the same as missing fields.
pub fn present(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formats_whole_and_fractional_prices() {
		assert_eq!(format_price(499.0), "499.0");
		assert_eq!(format_price(12.5), "12.5");
		assert_eq!(format_price(0.0), "0.0");
	}

	#[test]
	fn extreme_prices_use_exponent_form() {
		assert_eq!(format_price(1e16), "1e+16");
		assert_eq!(format_price(2.5e20), "2.5e+20");
		assert_eq!(format_price(1e-5), "1e-05");
		assert_eq!(format_price(0.0001), "0.0001");
		assert_eq!(format_price(9_999_999_999_999_998.0), "9999999999999998.0");
		assert_eq!(format_price(f64::NAN), "nan");
		assert_eq!(format_price(f64::INFINITY), "inf");
	}

	#[test]
	fn empty_strings_are_not_present() {
		assert_eq!(present(&Some(String::new())), None);
		assert_eq!(present(&Some("Serum".to_string())), Some("Serum"));
		assert_eq!(present(&None), None);
	}
}
