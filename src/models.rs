use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Every backend response wraps its payload in `{ "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Unwraps the `data` field; anything else is an unexpected shape.
    pub fn decode(body: &str) -> ApiResult<T> {
        let mut value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ApiError::UnexpectedShape(format!("invalid JSON: {}", e)))?;
        let data = value
            .get_mut("data")
            .map(serde_json::Value::take)
            .ok_or_else(|| ApiError::UnexpectedShape("missing data envelope".to_string()))?;
        serde_json::from_value(data).map_err(|e| ApiError::UnexpectedShape(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Profile,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

impl CategoryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryStatus::Active => "ACTIVE",
            CategoryStatus::Pending => "PENDING",
            CategoryStatus::Inactive => "INACTIVE",
        }
    }

    pub fn all() -> &'static [CategoryStatus] {
        &[
            CategoryStatus::Active,
            CategoryStatus::Pending,
            CategoryStatus::Inactive,
        ]
    }

    pub fn parse(value: &str) -> Option<CategoryStatus> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(CategoryStatus::Active),
            "pending" => Some(CategoryStatus::Pending),
            "inactive" => Some(CategoryStatus::Inactive),
            _ => None,
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<CategoryStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(CategoryStatus::parse)
        .unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: CategoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateCategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CategoryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateCategoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CategoryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `None` leaves the parent alone; `Some(None)` sends `null` and makes
    /// the category a root.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub parent: Option<Option<String>>,
}

// A present key, even one set to null, deserializes to `Some`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// What happens to records that depend on a category being deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Disposition {
    Move {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    #[serde(rename = "delete")]
    DeleteAll,
}

impl Default for Disposition {
    fn default() -> Self {
        Disposition::Move { target: None }
    }
}

impl Disposition {
    pub fn is_move(&self) -> bool {
        matches!(self, Disposition::Move { .. })
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Disposition::Move { target } => target.as_deref(),
            Disposition::DeleteAll => None,
        }
    }
}

/// Body of `DELETE /categories/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteCategoryPayload {
    pub products: Disposition,
    pub subcategories: Disposition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of both `POST /currencies` and `PUT /currencies/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrencyPayload {
    pub name: String,
    pub symbol: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_status_is_lenient() {
        let cat: Category =
            serde_json::from_str(r#"{"id":"1","name":"Shoes","status":"Pending"}"#).unwrap();
        assert_eq!(cat.status, CategoryStatus::Pending);
        assert_eq!(cat.parent, None);

        let cat: Category =
            serde_json::from_str(r#"{"id":"1","name":"Shoes","status":"archived"}"#).unwrap();
        assert_eq!(cat.status, CategoryStatus::Active);

        let cat: Category =
            serde_json::from_str(r#"{"id":"1","name":"Shoes","parent":null,"status":null}"#)
                .unwrap();
        assert_eq!(cat.status, CategoryStatus::Active);
    }

    #[test]
    fn disposition_wire_format() {
        let payload = DeleteCategoryPayload {
            products: Disposition::Move {
                target: Some("c2".to_string()),
            },
            subcategories: Disposition::DeleteAll,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "products": { "action": "move", "target": "c2" },
                "subcategories": { "action": "delete" }
            })
        );
    }

    #[test]
    fn envelope_is_required() {
        let cats = Envelope::<Vec<Category>>::decode(
            r#"{"data":[{"id":"1","name":"Shoes","parent":null}]}"#,
        )
        .unwrap();
        assert_eq!(cats.len(), 1);

        let err = Envelope::<Vec<Category>>::decode(r#"[{"id":"1","name":"Shoes"}]"#).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));

        let err = Envelope::<Vec<Category>>::decode("not json").unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));

        let err = Envelope::<Vec<Category>>::decode(r#"{"data":{"id":"1"}}"#).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));
    }

    #[test]
    fn null_data_decodes_as_json_null() {
        let value = Envelope::<serde_json::Value>::decode(r#"{"data":null}"#).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn update_payload_parent_has_three_states() {
        let keep = UpdateCategoryPayload {
            name: Some("B".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&keep).unwrap(), r#"{"name":"B"}"#);

        let to_root = UpdateCategoryPayload {
            parent: Some(None),
            ..keep.clone()
        };
        let json = serde_json::to_string(&to_root).unwrap();
        assert_eq!(json, r#"{"name":"B","parent":null}"#);
        let back: UpdateCategoryPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.parent, Some(None));

        let back: UpdateCategoryPayload = serde_json::from_str(r#"{"name":"B"}"#).unwrap();
        assert_eq!(back.parent, None);

        let back: UpdateCategoryPayload =
            serde_json::from_str(r#"{"parent":"A"}"#).unwrap();
        assert_eq!(back.parent, Some(Some("A".to_string())));
    }

    #[test]
    fn create_payload_skips_empty_fields() {
        let payload = CreateCategoryPayload {
            name: "Shoes".to_string(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"name":"Shoes"}"#);
    }
}
