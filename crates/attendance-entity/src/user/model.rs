//! User profile model.
//!
//! Accounts live in the store's `_users` database; the application only
//! reads and writes the profile fields it displays.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Id prefix the store mandates for user documents.
pub const USER_ID_PREFIX: &str = "org.couchdb.user:";

/// The id of the `_users` document for `name`.
pub fn user_document_id(name: &str) -> String {
    format!("{USER_ID_PREFIX}{name}")
}

/// A user account as listed to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Login name.
    pub name: String,
    /// Roles granted in the store.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Full display name.
    #[serde(default)]
    pub full_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Department.
    #[serde(default)]
    pub department: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
}

impl UserProfile {
    /// Read a profile from a `_users` document; `None` without a name.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let profile: Self = serde_json::from_value(doc.clone()).ok()?;
        if profile.name.is_empty() {
            return None;
        }
        Some(profile)
    }

    /// The document for a new account.
    pub fn new_document(&self, password: &str) -> Value {
        serde_json::json!({
            "_id": user_document_id(&self.name),
            "name": self.name,
            "type": "user",
            "roles": self.roles,
            "password": password,
            "fullName": self.full_name,
            "email": self.email,
            "department": self.department,
            "phone": self.phone,
        })
    }
}
