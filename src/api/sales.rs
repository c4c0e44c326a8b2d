//! Sales recording and analytics.

// self
use crate::{
	_prelude::*,
	api::OrderStatus,
	client::{ApiClient, ApiRequest},
	endpoints,
	http::HttpTransport,
};

/// Dashboard figures for today.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QuickStats {
	/// Orders still awaiting the supplier.
	pub pending_orders: usize,
	/// Revenue over the last day.
	pub today_revenue: f64,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Records a sale; `sale` is passed through as-is.
	pub async fn record_sale(&self, sale: &Value) -> Result<Value> {
		self.post(endpoints::SALES_RECORD, sale).await
	}

	/// Today's sales.
	pub async fn daily_sales(&self) -> Result<Value> {
		self.get(endpoints::SALES_DAILY).await
	}

	/// Sales summary.
	pub async fn sales_summary(&self) -> Result<Value> {
		self.get(endpoints::SALES_SUMMARY).await
	}

	/// Sales analytics (totals and top products) over the last `days` days.
	pub async fn sales_analytics(&self, days: u32) -> Result<Value> {
		self.send_json(ApiRequest::get(endpoints::SALES_ANALYTICS).query("days", days)).await
	}

	/// Pending order count plus the last day's revenue.
	pub async fn quick_stats(&self) -> Result<QuickStats> {
		let analytics = self.sales_analytics(1).await?;
		let orders = self.orders(None).await?;
		let pending_orders =
			orders.iter().filter(|order| order.status == OrderStatus::Pending).count();

		Ok(QuickStats { pending_orders, today_revenue: total_revenue(&analytics) })
	}
}

/// Reads `overall.total_revenue`, accepting numbers and decimal strings.
fn total_revenue(analytics: &Value) -> f64 {
	match analytics.pointer("/overall/total_revenue") {
		Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
		Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
		_ => 0.0,
	}
}
