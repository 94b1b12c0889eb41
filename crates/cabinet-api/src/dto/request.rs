//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use cabinet_core::error::AppError;
use cabinet_core::types::FolderPath;

/// Run the `validator` rules of a request body.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

/// Parse a `""`, `"folder"` or `"folder/sub"` request path.
pub fn parse_path(raw: Option<&str>) -> Result<FolderPath, AppError> {
    FolderPath::parse(raw.unwrap_or_default())
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 1, max = 50, message = "Username must be 1 to 50 characters"))]
    pub username: String,
    /// Email.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create folder request. Without `parent` the folder is top-level.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Top-level folder to create a subfolder in.
    pub parent: Option<String>,
}

/// Delete folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteFolderRequest {
    /// `"folder"` or `"folder/sub"`.
    #[validate(length(min = 1, message = "Path is required"))]
    pub path: String,
}

/// Delete file request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteFileRequest {
    /// File name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Folder holding the file, empty for root.
    pub parent: Option<String>,
}

/// Rename file request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameFileRequest {
    /// Current name.
    #[validate(length(min = 1, max = 255))]
    pub old_name: String,
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub new_name: String,
    /// Folder holding the file, empty for root.
    pub parent: Option<String>,
}

/// Move file request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MoveFileRequest {
    /// File name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Source folder, empty for root.
    pub from: Option<String>,
    /// Target folder, empty for root.
    pub to: Option<String>,
}

/// Reconcile query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconcileQuery {
    /// Limit the audit to one owner.
    pub owner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rules() {
        let ok = RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "password123".into(),
        };
        assert!(validate_body(&ok).is_ok());

        let bad = RegisterRequest {
            email: "alice".into(),
            ..ok
        };
        assert!(validate_body(&bad).is_err());
    }

    #[test]
    fn test_parse_path() {
        assert!(parse_path(None).unwrap().is_root());
        assert!(parse_path(Some("")).unwrap().is_root());
        assert_eq!(parse_path(Some("docs/2024")).unwrap().depth(), 2);
        assert!(parse_path(Some("a/b/c")).is_err());
    }
}
