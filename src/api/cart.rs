//! Retailer shopping cart.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	endpoints,
	http::HttpTransport,
};

/// Line in the cart.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CartItem {
	/// Cart item identifier.
	pub id: u64,
	/// Product identifier.
	pub product: u64,
	/// Quantity in the cart.
	pub quantity: u32,
	/// Line total as a decimal string.
	#[serde(default)]
	pub subtotal: Option<String>,
	/// Product snapshot (name, slug, price, images, supplier).
	#[serde(default)]
	pub product_details: Value,
}

/// Cart of the signed-in retailer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Cart {
	/// Cart identifier.
	pub id: u64,
	/// Lines in insertion order.
	#[serde(default)]
	pub items: Vec<CartItem>,
	/// Number of lines.
	#[serde(default)]
	pub total_items: u32,
	/// Cart total as a decimal string.
	#[serde(default)]
	pub total_amount: Option<String>,
}

/// Acknowledgement returned when a line is added or changed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CartItemResponse {
	/// Backend message.
	#[serde(default)]
	pub message: String,
	/// Resulting cart line.
	pub cart_item: CartItem,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches the cart.
	pub async fn cart(&self) -> Result<Cart> {
		self.get(endpoints::CART).await
	}

	/// Adds `quantity` of `product_id`; an existing line is incremented.
	pub async fn add_to_cart(&self, product_id: u64, quantity: u32) -> Result<CartItemResponse> {
		let request = ApiRequest::post(endpoints::CART_ITEMS)
			.json(json!({ "product": product_id, "quantity": quantity }));

		self.send_json(request).await
	}

	/// Sets the quantity of a cart line.
	pub async fn update_cart_item(&self, item_id: u64, quantity: u32) -> Result<CartItemResponse> {
		let request =
			ApiRequest::put(endpoints::cart_item(item_id)).json(json!({ "quantity": quantity }));

		self.send_json(request).await
	}

	/// Removes a cart line.
	pub async fn remove_from_cart(&self, item_id: u64) -> Result<Value> {
		self.delete(&endpoints::cart_item(item_id)).await
	}

	/// Empties the cart.
	pub async fn clear_cart(&self) -> Result<Value> {
		self.delete(endpoints::CART).await
	}

	/// Number of lines in the cart, or `0` when the cart cannot be fetched for any reason.
	pub async fn cart_item_count(&self) -> u32 {
		self.cart().await.map(|cart| cart.total_items).unwrap_or(0)
	}
}
