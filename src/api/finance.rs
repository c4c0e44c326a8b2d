//! Working-capital loans.

// self
use crate::{_prelude::*, client::ApiClient, endpoints, http::HttpTransport};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Loan offer the backend computed for the signed-in retailer.
	pub async fn loan_suggestion(&self) -> Result<Value> {
		self.get(endpoints::FINANCE_LOAN_SUGGESTION).await
	}

	/// Past loans of the signed-in retailer.
	pub async fn loan_history(&self) -> Result<Value> {
		self.get(endpoints::FINANCE_LOAN_HISTORY).await
	}
}
