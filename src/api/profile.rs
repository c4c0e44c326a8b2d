//! Role-specific profiles.

// self
use crate::{
	_prelude::*,
	auth::UserType,
	client::ApiClient,
	endpoints,
	http::HttpTransport,
};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches the profile of the given role.
	pub async fn profile(&self, user_type: UserType) -> Result<Value> {
		self.get(profile_path(user_type)).await
	}

	/// Replaces profile fields of the given role; `fields` may be partial.
	pub async fn update_profile(&self, user_type: UserType, fields: &Value) -> Result<Value> {
		self.put(profile_path(user_type), fields).await
	}

	/// Fetches the profile of the signed-in account, using the cached role.
	///
	/// Returns `Ok(None)` when no identity is stored.
	pub async fn my_profile(&self) -> Result<Option<Value>> {
		match self.session().store().identity().await? {
			Some(identity) => Ok(Some(self.profile(identity.user_type).await?)),
			None => Ok(None),
		}
	}
}

fn profile_path(user_type: UserType) -> &'static str {
	match user_type {
		UserType::Retailer => endpoints::RETAILER_PROFILE,
		UserType::Supplier => endpoints::SUPPLIER_PROFILE,
	}
}
