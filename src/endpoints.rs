//! Backend endpoint paths, relative to [`ClientConfig::base_url`](crate::config::ClientConfig).

// self
use crate::error::ConfigError;

/// Account registration.
pub const AUTH_REGISTER: &str = "/api/auth/register/";
/// Email verification with the emailed token.
pub const AUTH_VERIFY_EMAIL: &str = "/api/auth/verify-email/";
/// Re-send the verification email.
pub const AUTH_RESEND_VERIFICATION: &str = "/api/auth/resend-verification/";
/// Credential exchange for a token pair.
pub const AUTH_LOGIN: &str = "/api/auth/login/";
/// Refresh-token exchange.
pub const AUTH_TOKEN_REFRESH: &str = "/api/auth/token/refresh/";
/// Server-side sign-out.
pub const AUTH_LOGOUT: &str = "/api/auth/logout/";
/// Profile completion status of the signed-in account.
pub const AUTH_PROFILE_STATUS: &str = "/api/auth/profile-status/";

/// Retailer shop profile.
pub const RETAILER_PROFILE: &str = "/api/retailers/profile/";
/// Supplier business profile.
pub const SUPPLIER_PROFILE: &str = "/api/suppliers/profile/";

/// Catalogue visible to retailers.
pub const RETAILER_PRODUCTS: &str = "/api/products/retailer/products/";
/// Supplier-owned products.
pub const SUPPLIER_PRODUCTS: &str = "/api/products/supplier/products/";
/// Product categories.
pub const PRODUCT_CATEGORIES: &str = "/api/products/categories/";

/// Cart of the signed-in retailer; `DELETE` empties it.
pub const CART: &str = "/api/orders/cart/";
/// Cart item collection.
pub const CART_ITEMS: &str = "/api/orders/cart/items/";

/// Order collection.
pub const ORDERS: &str = "/api/orders/";

/// Inventory listing.
pub const INVENTORY: &str = "/api/inventory/";
/// Stock adjustment for one product.
pub const INVENTORY_UPDATE: &str = "/api/inventory/update/";
/// Products below their minimum stock.
pub const INVENTORY_LOW_STOCK: &str = "/api/inventory/low-stock/";
/// Backend-computed restock suggestions.
pub const INVENTORY_AI_SUGGESTIONS: &str = "/api/inventory/ai-suggestions/";
/// Restock several products at once.
pub const INVENTORY_BULK_RESTOCK: &str = "/api/inventory/bulk-restock/";
/// Stock change history.
pub const INVENTORY_LOGS: &str = "/api/inventory/logs/";

/// Record a sale.
pub const SALES_RECORD: &str = "/api/sales/record/";
/// Today's sales.
pub const SALES_DAILY: &str = "/api/sales/daily/";
/// Sales summary.
pub const SALES_SUMMARY: &str = "/api/sales/summary/";
/// Sales analytics over a day window.
pub const SALES_ANALYTICS: &str = "/api/sales/analytics/";

/// Demand forecast for one product.
pub const AI_FORECAST: &str = "/api/ai/forecast/";
/// Retailer-wide insights.
pub const AI_INSIGHTS: &str = "/api/ai/insights/";
/// Smart product analysis.
pub const AI_SMART_ANALYSIS: &str = "/api/ai/analysis/smart/";
/// Suggested purchase orders.
pub const AI_ORDERS: &str = "/api/ai/orders/";
/// Turn a suggested order into a real one.
pub const AI_ORDERS_APPROVE: &str = "/api/ai/orders/approve/";

/// Loan offer computed for the retailer.
pub const FINANCE_LOAN_SUGGESTION: &str = "/api/finance/loan/suggestion/";
/// Past loans.
pub const FINANCE_LOAN_HISTORY: &str = "/api/finance/loan/history/";

/// Single retailer-visible product.
///
/// The slug is percent-encoded as one path segment; empty and dot-only slugs are rejected.
pub fn retailer_product(slug: &str) -> Result<String, ConfigError> {
	Ok(format!("{RETAILER_PRODUCTS}{}/", path_segment(slug)?))
}

/// Single supplier-owned product.
pub fn supplier_product(id: u64) -> String {
	format!("{SUPPLIER_PRODUCTS}{id}/")
}

/// Single cart item.
pub fn cart_item(id: u64) -> String {
	format!("{CART_ITEMS}{id}/")
}

/// Single order.
pub fn order(id: u64) -> String {
	format!("{ORDERS}{id}/")
}

/// Status transition for an order.
pub fn order_status(id: u64) -> String {
	format!("{ORDERS}{id}/status/")
}

fn path_segment(raw: &str) -> Result<String, ConfigError> {
	// URL parsing folds `.`, `..`, and their encoded forms into the parent path.
	if matches!(raw, "" | "." | "..") {
		return Err(ConfigError::InvalidPathSegment { segment: raw.to_owned() });
	}

	// `byte_serialize` targets form bodies; spaces must not become `+` in a path.
	Ok(url::form_urlencoded::byte_serialize(raw.as_bytes()).collect::<String>().replace('+', "%20"))
}

/// Paths whose 401 responses mean bad input rather than an expired access token.
pub(crate) fn is_auth_endpoint(path: &str) -> bool {
	[AUTH_REGISTER, AUTH_VERIFY_EMAIL, AUTH_RESEND_VERIFICATION, AUTH_LOGIN, AUTH_TOKEN_REFRESH]
		.contains(&path)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parameterized_paths_keep_trailing_slash() {
		assert_eq!(
			retailer_product("basmati-rice-5kg").expect("Plain slug should be accepted."),
			"/api/products/retailer/products/basmati-rice-5kg/"
		);
		assert_eq!(cart_item(7), "/api/orders/cart/items/7/");
		assert_eq!(order_status(42), "/api/orders/42/status/");
	}

	#[test]
	fn slugs_cannot_escape_their_segment() {
		let encode = |slug| retailer_product(slug).expect("Slug should be encodable.");

		assert_eq!(encode("a?b#c"), "/api/products/retailer/products/a%3Fb%23c/");
		assert_eq!(encode("../orders"), "/api/products/retailer/products/..%2Forders/");
		assert_eq!(encode("rice 5kg+"), "/api/products/retailer/products/rice%205kg%2B/");

		for slug in ["", ".", ".."] {
			assert!(matches!(
				retailer_product(slug),
				Err(ConfigError::InvalidPathSegment { segment }) if segment == slug
			));
		}
	}

	#[test]
	fn only_credential_endpoints_skip_refresh() {
		assert!(is_auth_endpoint(AUTH_LOGIN));
		assert!(is_auth_endpoint(AUTH_TOKEN_REFRESH));
		assert!(!is_auth_endpoint(AUTH_LOGOUT));
		assert!(!is_auth_endpoint(ORDERS));
	}
}
