//! Field validation and sanitization for registry writes.
//!
//! Validators collect every complaint instead of stopping at the first one,
//! so API clients can show all problems with a submitted form at once.

use serde::Deserialize;

pub const CATEGORY_NAME_MAX: usize = 100;
pub const CATEGORY_DESCRIPTION_MAX: usize = 500;
pub const NOMINEE_NAME_MAX: usize = 100;
pub const NOMINEE_DESCRIPTION_MAX: usize = 1000;

/// Prefix of image URLs that point at files in the local upload directory.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// One or more field-level complaints about a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", .0.join("; "))]
pub struct ValidationError(pub Vec<String>);

impl ValidationError {
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn details(&self) -> &[String] {
        &self.0
    }
}

/// Category fields as submitted by an admin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub voting_locked: bool,
}

/// Nominee fields as submitted by an admin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NomineeFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
}

/// Trim and strip characters that could break out of HTML attributes.
pub fn sanitize(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect();
    kept.trim().to_string()
}

impl CategoryFields {
    /// Sanitize, then check the cleaned values against the field limits.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        let clean = Self {
            name: sanitize(&self.name),
            description: sanitize(&self.description),
            voting_locked: self.voting_locked,
        };
        let mut errors = Vec::new();

        let name_len = clean.name.chars().count();
        if name_len == 0 {
            errors.push("Category name is required".to_string());
        } else if name_len > CATEGORY_NAME_MAX {
            errors.push(format!(
                "Category name must be at most {CATEGORY_NAME_MAX} characters (got {name_len})"
            ));
        }

        let description_len = clean.description.chars().count();
        if description_len > CATEGORY_DESCRIPTION_MAX {
            errors.push(format!(
                "Description must be at most {CATEGORY_DESCRIPTION_MAX} characters (got {description_len})"
            ));
        }

        if errors.is_empty() {
            Ok(clean)
        } else {
            Err(ValidationError(errors))
        }
    }
}

impl NomineeFields {
    /// Sanitize, then check the cleaned values against the field limits.
    ///
    /// Empty optional URLs are normalized to `None`. Whether `category_id`
    /// names an existing category is checked by the caller against storage.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        let name = sanitize(&self.name);
        let description = sanitize(&self.description);
        let mut errors = Vec::new();

        let name_len = name.chars().count();
        if name_len == 0 {
            errors.push("Nominee name is required".to_string());
        } else if name_len > NOMINEE_NAME_MAX {
            errors.push(format!(
                "Nominee name must be at most {NOMINEE_NAME_MAX} characters (got {name_len})"
            ));
        }

        if self.category_id.trim().is_empty() {
            errors.push("Valid category ID is required".to_string());
        }

        let description_len = description.chars().count();
        if description_len > NOMINEE_DESCRIPTION_MAX {
            errors.push(format!(
                "Description must be at most {NOMINEE_DESCRIPTION_MAX} characters (got {description_len})"
            ));
        }

        let image_url = non_empty(self.image_url.as_deref());
        if let Some(url) = &image_url {
            if !is_http_url(url) && !url.starts_with(UPLOADS_PREFIX) {
                errors.push("Image URL must be a valid URL".to_string());
            }
        }

        let youtube_url = non_empty(self.youtube_url.as_deref());
        if let Some(url) = &youtube_url {
            if !is_http_url(url) {
                errors.push("Youtube URL must be a valid URL".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError(errors));
        }

        Ok(Self {
            name,
            description,
            category_id: self.category_id.trim().to_string(),
            image_url,
            youtube_url,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
