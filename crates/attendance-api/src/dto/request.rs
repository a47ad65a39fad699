//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use attendance_entity::UserProfile;
use attendance_service::{
    BadgeHolder, EventFilter, EventTypePatch, NewEventType, NewUser, UserPatch,
};

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Missing credentials"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Missing credentials"))]
    pub password: String,
}

/// Event listing filters. Paging parameters travel separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    /// Event type code.
    #[serde(rename = "type")]
    pub type_code: Option<String>,
    /// Recording user.
    pub created_by: Option<String>,
}

impl From<EventsQuery> for EventFilter {
    fn from(q: EventsQuery) -> Self {
        Self {
            type_code: q.type_code,
            created_by: q.created_by,
        }
    }
}

/// Record-an-event request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Event type code.
    #[serde(rename = "type")]
    pub type_code: String,
    /// Scanned QR payload.
    pub qr_data: String,
}

/// Badge QR request (admin). Missing fields read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct QrRequest {
    pub username: String,
    pub full_name: String,
    pub employee_id: String,
    pub department: String,
    pub phone: String,
}

impl From<QrRequest> for BadgeHolder {
    fn from(r: QrRequest) -> Self {
        Self {
            username: r.username,
            employee_id: r.employee_id,
            full_name: r.full_name,
            department: r.department,
            phone: r.phone,
        }
    }
}

/// Create event type request (admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateEventTypeRequest {
    /// Immutable code.
    pub code: String,
    /// Display name.
    pub name: Option<String>,
    /// Offered to users; defaults to `true`.
    pub active: Option<bool>,
}

impl From<CreateEventTypeRequest> for NewEventType {
    fn from(req: CreateEventTypeRequest) -> Self {
        Self {
            code: req.code,
            name: req.name,
            active: req.active,
        }
    }
}

/// Update event type request (admin). Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateEventTypeRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateEventTypeRequest> for EventTypePatch {
    fn from(req: UpdateEventTypeRequest) -> Self {
        Self {
            name: req.name,
            active: req.active,
        }
    }
}

/// Create user request (admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Account name.
    pub name: String,
    /// Initial password.
    pub password: String,
    /// Roles, as a JSON array or a comma-separated string.
    #[serde(deserialize_with = "roles_input")]
    pub roles: Vec<String>,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub phone: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            profile: UserProfile {
                name: req.name,
                roles: req.roles,
                full_name: req.full_name,
                email: req.email,
                department: req.department,
                phone: req.phone,
            },
            password: req.password,
        }
    }
}

/// Update user request (admin). Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(deserialize_with = "optional_roles_input")]
    pub roles: Option<Vec<String>>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            roles: req.roles,
            password: req.password,
            full_name: req.full_name,
            email: req.email,
            department: req.department,
            phone: req.phone,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RolesInput {
    List(Vec<String>),
    Csv(String),
    Missing(()),
}

impl From<RolesInput> for Vec<String> {
    fn from(input: RolesInput) -> Self {
        match input {
            RolesInput::List(list) => list,
            RolesInput::Csv(csv) => csv
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            RolesInput::Missing(()) => Vec::new(),
        }
    }
}

fn roles_input<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    RolesInput::deserialize(deserializer).map(Vec::from)
}

fn optional_roles_input<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    RolesInput::deserialize(deserializer).map(|input| Some(Vec::from(input)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roles_as_array_or_csv() {
        let a: CreateUserRequest =
            serde_json::from_value(json!({ "name": "bob", "roles": ["staff", "app:admin"] })).unwrap();
        let b: CreateUserRequest =
            serde_json::from_value(json!({ "name": "bob", "roles": " staff, app:admin ,," })).unwrap();
        assert_eq!(a.roles, b.roles);
        assert_eq!(b.roles, vec!["staff".to_string(), "app:admin".to_string()]);
    }

    #[test]
    fn test_update_roles_absent_vs_null() {
        let absent: UpdateUserRequest = serde_json::from_value(json!({ "email": "x" })).unwrap();
        assert_eq!(absent.roles, None);
        let cleared: UpdateUserRequest = serde_json::from_value(json!({ "roles": null })).unwrap();
        assert_eq!(cleared.roles, Some(vec![]));
    }

    #[test]
    fn test_login_validation_message() {
        let req = LoginRequest {
            username: "bob".into(),
            password: String::new(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        let message = fields["password"][0].message.as_deref();
        assert_eq!(message, Some("Missing credentials"));
        assert!(!fields.contains_key("username"));
    }
}
