//! Purchase orders between retailers and suppliers.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	endpoints,
	http::HttpTransport,
};

/// Order lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Placed, awaiting the supplier.
	Pending,
	/// Accepted by the supplier.
	Accepted,
	/// Being prepared.
	Processing,
	/// Dispatched.
	OnTheWay,
	/// Received by the retailer.
	Delivered,
	/// Cancelled by either side.
	Cancelled,
	/// A state this client does not know yet.
	#[serde(other)]
	Unknown,
}
impl OrderStatus {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Accepted => "accepted",
			OrderStatus::Processing => "processing",
			OrderStatus::OnTheWay => "on_the_way",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
			OrderStatus::Unknown => "unknown",
		}
	}
}
impl Display for OrderStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Line of an order, priced at order time.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OrderItem {
	/// Order item identifier.
	pub id: u64,
	/// Product identifier.
	pub product: u64,
	/// Product name at order time.
	#[serde(default)]
	pub product_name: String,
	/// Unit price as a decimal string.
	#[serde(default)]
	pub product_price: Option<String>,
	/// Ordered quantity.
	pub quantity: u32,
	/// Line total as a decimal string.
	#[serde(default)]
	pub subtotal: Option<String>,
}

/// Order as listed or fetched.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Order {
	/// Order identifier.
	pub id: u64,
	/// Human-facing order number (`ORD-XXXXXXXX`).
	pub order_number: String,
	/// Retailer shop name.
	#[serde(default)]
	pub retailer_name: Option<String>,
	/// Supplier business name.
	#[serde(default)]
	pub supplier_name: Option<String>,
	/// Lifecycle state.
	pub status: OrderStatus,
	/// Order total as a decimal string.
	#[serde(default)]
	pub total_amount: Option<String>,
	/// Order lines.
	#[serde(default)]
	pub items: Vec<OrderItem>,
	/// Number of lines.
	#[serde(default)]
	pub total_items: u32,
	/// Sum of line quantities.
	#[serde(default)]
	pub total_quantity: u32,
	/// Creation timestamp as sent by the backend.
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Input for [`ApiClient::create_order`]; cart lines of `supplier_id` become the order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewOrder {
	/// Delivery address.
	pub delivery_address: String,
	/// Delivery phone number.
	pub delivery_contact: String,
	/// Optional delivery notes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_notes: Option<String>,
	/// Supplier whose cart lines are ordered.
	pub supplier_id: u64,
}

/// Acknowledgement carrying the affected order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OrderResponse {
	/// Backend message.
	#[serde(default)]
	pub message: String,
	/// Resulting order.
	pub order: Order,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists orders visible to the signed-in account, optionally filtered by status.
	pub async fn orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
		self.send_json(ApiRequest::get(endpoints::ORDERS).query_opt("status", status)).await
	}

	/// Fetches a single order.
	pub async fn order(&self, id: u64) -> Result<Order> {
		self.get(&endpoints::order(id)).await
	}

	/// Places an order from the cart lines of one supplier.
	pub async fn create_order(&self, order: &NewOrder) -> Result<OrderResponse> {
		self.post(endpoints::ORDERS, order).await
	}

	/// Moves an order to `status`; the backend enforces which transitions each role may make.
	pub async fn update_order_status(&self, id: u64, status: OrderStatus) -> Result<OrderResponse> {
		self.put(&endpoints::order_status(id), &json!({ "status": status })).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unknown_statuses_do_not_break_decoding() {
		let order: Order = serde_json::from_str(
			r#"{"id":3,"order_number":"ORD-1A2B3C4D","status":"returned","total_amount":"120.00"}"#,
		)
		.expect("Order with an unfamiliar status should decode.");

		assert_eq!(order.status, OrderStatus::Unknown);
		assert_eq!(order.total_amount.as_deref(), Some("120.00"));
	}

	#[test]
	fn new_order_skips_missing_notes() {
		let body = serde_json::to_value(NewOrder {
			delivery_address: "12 Market Rd".into(),
			delivery_contact: "0300-1234567".into(),
			delivery_notes: None,
			supplier_id: 4,
		})
		.expect("New order should serialize.");

		assert_eq!(body.get("delivery_notes"), None);
		assert_eq!(body["supplier_id"], 4);
		assert_eq!(OrderStatus::OnTheWay.to_string(), "on_the_way");
	}
}
