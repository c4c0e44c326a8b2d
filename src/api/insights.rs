//! Forecasts, insights, and suggested orders computed by the backend.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	endpoints,
	http::{HttpResponse, HttpTransport},
};

/// Delivery note attached to orders approved by [`ApiClient::auto_execute_ai_orders`].
pub const AUTO_EXECUTE_DELIVERY_NOTES: &str = "Auto-generated order via AI system";

/// Optional delivery overrides for [`ApiClient::approve_ai_order`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryDetails {
	/// Delivery address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_address: Option<String>,
	/// Delivery phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_contact: Option<String>,
	/// Delivery notes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_notes: Option<String>,
}

/// Outcome of [`ApiClient::auto_execute_ai_orders`], in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AutoExecuteReport {
	/// Ids of the suggested orders that were approved.
	pub success: Vec<String>,
	/// Suggested orders the backend did not approve.
	pub failed: Vec<AutoExecuteFailure>,
}

/// A suggested order that could not be approved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoExecuteFailure {
	/// Id of the suggested order.
	pub order_id: String,
	/// Backend `error` field when present, otherwise the classified message.
	pub error: String,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Demand forecast for one product over `forecast_days`.
	pub async fn product_forecast(&self, product_id: u64, forecast_days: u32) -> Result<Value> {
		let body = json!({ "product_id": product_id, "forecast_days": forecast_days });

		self.post(endpoints::AI_FORECAST, &body).await
	}

	/// Retailer-wide insights; `priority_filter` is `all`, `high`, `medium`, or `low`.
	pub async fn retailer_insights(
		&self,
		forecast_days: u32,
		priority_filter: &str,
		max_products: u32,
	) -> Result<Value> {
		let body = json!({
			"forecast_days": forecast_days,
			"priority_filter": priority_filter,
			"max_products": max_products,
		});

		self.post(endpoints::AI_INSIGHTS, &body).await
	}

	/// Smart analysis of the top products.
	pub async fn smart_analysis(&self, forecast_days: u32, top_products: u32) -> Result<Value> {
		let body = json!({ "forecast_days": forecast_days, "top_products": top_products });

		self.post(endpoints::AI_SMART_ANALYSIS, &body).await
	}

	/// Suggested purchase orders, at most `max_orders`; an empty body reads as `[]`.
	pub async fn ai_orders(&self, max_orders: u32) -> Result<Value> {
		let orders: Value =
			self.post(endpoints::AI_ORDERS, &json!({ "max_orders": max_orders })).await?;

		Ok(if orders.is_null() { Value::Array(Vec::new()) } else { orders })
	}

	/// Turns a suggested order into a real one.
	pub async fn approve_ai_order(
		&self,
		ai_order_id: &str,
		delivery: &DeliveryDetails,
	) -> Result<Value> {
		let mut body = serde_json::to_value(delivery)
			.map_err(crate::error::ConfigError::RequestEncode)?;

		if let Value::Object(map) = &mut body {
			map.insert("ai_order_id".into(), Value::String(ai_order_id.to_owned()));
		}

		self.post(endpoints::AI_ORDERS_APPROVE, &body).await
	}

	/// Approves every suggested order in `orders`, sending each one in full.
	///
	/// Failures are collected per order and do not stop the batch; only a credential
	/// storage failure aborts it.
	pub async fn auto_execute_ai_orders(&self, orders: &[Value]) -> Result<AutoExecuteReport> {
		let mut report = AutoExecuteReport::default();

		for order in orders {
			let order_id = match order.get("id") {
				Some(Value::String(id)) => id.clone(),
				Some(id @ Value::Number(_)) => id.to_string(),
				_ => String::new(),
			};
			let request = ApiRequest::post(endpoints::AI_ORDERS_APPROVE).json(json!({
				"ai_order_data": order,
				"delivery_notes": AUTO_EXECUTE_DELIVERY_NOTES,
			}));
			let error = match self.send_unchecked(request).await {
				Ok(response) if response.is_success() => {
					report.success.push(order_id);

					continue;
				},
				Ok(response) => backend_error(&response)
					.unwrap_or_else(|| Error::from_response(&response).user_message()),
				Err(e @ Error::Storage(_)) => return Err(e),
				Err(e) => e.user_message(),
			};

			report.failed.push(AutoExecuteFailure { order_id, error });
		}

		Ok(report)
	}
}

fn backend_error(response: &HttpResponse) -> Option<String> {
	let body = serde_json::from_slice::<Value>(&response.body).ok()?;

	body.get("error").and_then(Value::as_str).filter(|text| !text.is_empty()).map(str::to_owned)
}
