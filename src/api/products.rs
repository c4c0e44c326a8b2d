//! Product catalogue.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	endpoints,
	http::HttpTransport,
};

/// Optional filters for the retailer catalogue.
#[derive(Clone, Debug, Default)]
pub struct ProductQuery {
	/// Free-text search.
	pub search: Option<String>,
	/// Category slug.
	pub category: Option<String>,
	/// Page number, starting at 1.
	pub page: Option<u32>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists products visible to retailers.
	pub async fn retailer_products(&self, query: &ProductQuery) -> Result<Value> {
		let request = ApiRequest::get(endpoints::RETAILER_PRODUCTS)
			.query_opt("search", query.search.as_deref())
			.query_opt("category", query.category.as_deref())
			.query_opt("page", query.page);

		self.send_json(request).await
	}

	/// Fetches a single product by slug.
	pub async fn retailer_product(&self, slug: &str) -> Result<Value> {
		self.get(&endpoints::retailer_product(slug)?).await
	}

	/// Lists product categories.
	pub async fn product_categories(&self) -> Result<Value> {
		self.get(endpoints::PRODUCT_CATEGORIES).await
	}

	/// Lists products owned by the signed-in supplier.
	pub async fn supplier_products(&self) -> Result<Value> {
		self.get(endpoints::SUPPLIER_PRODUCTS).await
	}

	/// Fetches a single supplier-owned product.
	pub async fn supplier_product(&self, id: u64) -> Result<Value> {
		self.get(&endpoints::supplier_product(id)).await
	}
}
