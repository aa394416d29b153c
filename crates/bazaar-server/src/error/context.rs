//! Error context utilities.

use super::types::ApiError;

/// Extension trait turning lookups that found nothing into a 404.
pub trait ErrorContext<T> {
    /// Map a failed or empty lookup of `resource` to `ApiError::NotFound`.
    fn not_found(self, resource: impl Into<String>) -> Result<T, ApiError>;
}

impl<T, E> ErrorContext<T> for Result<T, E> {
    fn not_found(self, resource: impl Into<String>) -> Result<T, ApiError> {
        self.map_err(|_| ApiError::NotFound(resource.into()))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn not_found(self, resource: impl Into<String>) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::NotFound(resource.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_not_found() {
        let missing: Option<u8> = None;
        let err = missing.not_found("Product").unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn test_failed_parse_is_not_found() {
        let err = "42".parse::<uuid::Uuid>().not_found("Category").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref name) if name == "Category"));
    }
}
