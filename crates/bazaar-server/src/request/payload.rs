//! Request payloads.

use crate::middleware::authz::Role;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("price pattern"));

/// Account registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Product candidate for creation. `image` is never taken from the client;
/// it is the stored name of the uploaded file, if any.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub image: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(regex(path = *PRICE_RE, message = "price must be a decimal with at most two places"))]
    pub price: Option<String>,
}

/// Partial product update. At least one field must be present.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "product_patch_not_empty", skip_on_field_errors = false))]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[validate(regex(path = *PRICE_RE, message = "price must be a decimal with at most two places"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

fn product_patch_not_empty(patch: &ProductPatch) -> Result<(), ValidationError> {
    let empty = patch.title.is_none()
        && patch.description.is_none()
        && patch.image.is_none()
        && patch.category.is_none()
        && patch.price.is_none();

    if empty {
        let mut err = ValidationError::new("empty_patch");
        err.message = Some("update must change at least one field".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub image: Option<String>,
}

/// Category update. The name is always required; the image is replaced only
/// when a new file is uploaded.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_role_defaults_to_user() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "name": "Ama",
            "email": "ama@example.com",
            "password": "correct horse"
        }))
        .unwrap();

        assert_eq!(req.role, Role::User);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let result = serde_json::from_value::<RegisterRequest>(json!({
            "name": "Ama",
            "email": "ama@example.com",
            "password": "correct horse",
            "role": "admin"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_register_field_errors() {
        let req = RegisterRequest {
            name: String::new(),
            email: "nope".into(),
            password: "short".into(),
            role: Role::Vendor,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_price_format() {
        let product = |price: &str| NewProduct {
            title: "Lamp".into(),
            description: None,
            image: None,
            category: None,
            price: Some(price.into()),
        };

        assert!(product("12").validate().is_ok());
        assert!(product("12.50").validate().is_ok());
        assert!(product("12.505").validate().is_err());
        assert!(product("-1").validate().is_err());
        assert!(product("twelve").validate().is_err());
    }

    #[test]
    fn test_empty_product_patch_rejected() {
        let patch: ProductPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.validate().is_err());

        let patch: ProductPatch = serde_json::from_value(json!({"price": "3.10"})).unwrap();
        assert!(patch.validate().is_ok());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"price": "3.10"}));
    }

    #[test]
    fn test_category_patch_requires_name() {
        assert!(serde_json::from_value::<CategoryPatch>(json!({"image": "x.png"})).is_err());
    }
}
