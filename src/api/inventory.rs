//! Stock levels, adjustments, and restock suggestions.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	endpoints,
	http::HttpTransport,
};

/// Filters and paging for [`ApiClient::inventory`].
#[derive(Clone, Debug, Default)]
pub struct InventoryQuery {
	/// Free-text search over name and SKU.
	pub search: Option<String>,
	/// Category slug.
	pub category: Option<String>,
	/// `low`, `good`, or `out`.
	pub stock_status: Option<String>,
	/// Page number, starting at 1.
	pub page: Option<u32>,
	/// Page size.
	pub page_size: Option<u32>,
}

/// Kind of stock adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAction {
	/// Increase stock.
	Add,
	/// Decrease stock.
	Remove,
	/// Set stock to an absolute value.
	Adjust,
}

/// Input for [`ApiClient::update_stock`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StockUpdate {
	/// Product identifier.
	pub product_id: u64,
	/// Quantity applied according to `action`.
	pub quantity: u32,
	/// Adjustment kind.
	pub action: StockAction,
	/// Optional audit note.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

/// One product of a bulk restock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RestockItem {
	/// Product identifier.
	pub product_id: u64,
	/// Units to add.
	pub quantity: u32,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists inventory with optional filters and paging.
	pub async fn inventory(&self, query: &InventoryQuery) -> Result<Value> {
		let request = ApiRequest::get(endpoints::INVENTORY)
			.query_opt("search", query.search.as_deref())
			.query_opt("category", query.category.as_deref())
			.query_opt("stock_status", query.stock_status.as_deref())
			.query_opt("page", query.page)
			.query_opt("page_size", query.page_size);

		self.send_json(request).await
	}

	/// Applies a stock adjustment to one product.
	pub async fn update_stock(&self, update: &StockUpdate) -> Result<Value> {
		self.post(endpoints::INVENTORY_UPDATE, update).await
	}

	/// Products below their minimum stock.
	pub async fn low_stock(&self) -> Result<Value> {
		self.get(endpoints::INVENTORY_LOW_STOCK).await
	}

	/// Backend-computed restock suggestions.
	pub async fn restock_suggestions(&self) -> Result<Value> {
		self.get(endpoints::INVENTORY_AI_SUGGESTIONS).await
	}

	/// Restocks several products in one call.
	pub async fn bulk_restock(&self, items: &[RestockItem]) -> Result<Value> {
		self.post(endpoints::INVENTORY_BULK_RESTOCK, &json!({ "items": items })).await
	}

	/// Stock change history, optionally for one product.
	pub async fn inventory_logs(&self, product_id: Option<u64>) -> Result<Value> {
		self.send_json(ApiRequest::get(endpoints::INVENTORY_LOGS).query_opt("product_id", product_id))
			.await
	}
}
