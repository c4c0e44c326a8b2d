//! Credential pair and session identity persisted next to it.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access and refresh tokens that are always written, rotated, and cleared together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived bearer credential.
	pub access_token: TokenSecret,
	/// Longer-lived credential exchanged for a new pair.
	pub refresh_token: TokenSecret,
}
impl CredentialPair {
	/// Builds a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}
}

/// Account role used for routing decisions; never used for authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
	/// Shop owner buying from suppliers.
	Retailer,
	/// Wholesaler fulfilling retailer orders.
	Supplier,
}
impl UserType {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			UserType::Retailer => "retailer",
			UserType::Supplier => "supplier",
		}
	}
}
impl Display for UserType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for UserType {
	type Err = UnknownUserType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"retailer" => Ok(Self::Retailer),
			"supplier" => Ok(Self::Supplier),
			other => Err(UnknownUserType(other.to_owned())),
		}
	}
}

/// Raised when a stored or returned user type is neither `retailer` nor `supplier`.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown user type `{0}`.")]
pub struct UnknownUserType(pub String);

/// Cached identity of the signed-in account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
	/// Account role.
	pub user_type: UserType,
	/// Account email address.
	pub email: String,
}
impl SessionIdentity {
	/// Creates an identity for the provided role and email.
	pub fn new(user_type: UserType, email: impl Into<String>) -> Self {
		Self { user_type, email: email.into() }
	}
}
