/**
 * Collection Input Rules
 *
 * Checks and normalises create/update bodies before they reach the store.
 * All failures are field-level `SharedError::ValidationError`s.
 */

use url::Url;

use crate::backend::slug::{derive_subdomain, validate_subdomain};
use crate::shared::blog::{CreateCollectionRequest, UpdateCollectionRequest};
use crate::shared::SharedError;

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 500;

/// Validated create body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInput {
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub cover_image: Option<String>,
    pub subdomain: String,
}

/// Validated update body; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    /// `Some(None)` clears the cover image
    pub cover_image: Option<Option<String>>,
    /// Normalised subdomain the caller sent, if any
    pub subdomain: Option<String>,
}

pub fn validate_name(raw: &str) -> Result<String, SharedError> {
    let name = raw.trim();
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(SharedError::validation(
            "name",
            format!("Blog name must be between {NAME_MIN} and {NAME_MAX} characters"),
        ));
    }
    Ok(name.to_string())
}

pub fn validate_description(raw: &str) -> Result<String, SharedError> {
    let description = raw.trim();
    let len = description.chars().count();
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
        return Err(SharedError::validation(
            "description",
            format!("Description must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"),
        ));
    }
    Ok(description.to_string())
}

/// Absolute http(s) URL; blank means no cover image
pub fn validate_cover_image(raw: &str) -> Result<Option<String>, SharedError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = || SharedError::validation("coverImage", "Cover image must be a valid http(s) URL");
    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(Some(trimmed.to_string()))
}

pub fn validate_create(request: &CreateCollectionRequest) -> Result<CollectionInput, SharedError> {
    let name = validate_name(&request.name)?;
    let description = validate_description(&request.description)?;
    let cover_image = match &request.cover_image {
        Some(raw) => validate_cover_image(raw)?,
        None => None,
    };

    let subdomain = match request.subdomain.as_deref().map(str::trim) {
        Some(explicit) if !explicit.is_empty() => validate_subdomain(explicit)?,
        _ => validate_subdomain(&derive_subdomain(&name)).map_err(|_| {
            SharedError::validation(
                "subdomain",
                "Could not derive a subdomain from the blog name, please choose one",
            )
        })?,
    };

    Ok(CollectionInput {
        name,
        description,
        is_public: request.is_public.unwrap_or(true),
        cover_image,
        subdomain,
    })
}

pub fn validate_update(request: &UpdateCollectionRequest) -> Result<CollectionPatch, SharedError> {
    Ok(CollectionPatch {
        name: request.name.as_deref().map(validate_name).transpose()?,
        description: request.description.as_deref().map(validate_description).transpose()?,
        is_public: request.is_public,
        cover_image: request.cover_image.as_deref().map(validate_cover_image).transpose()?,
        subdomain: request
            .subdomain
            .as_deref()
            .map(|raw| raw.trim().to_lowercase())
            .filter(|s| !s.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str) -> CreateCollectionRequest {
        CreateCollectionRequest {
            name: name.to_string(),
            description: "short notes on tech topics".to_string(),
            is_public: None,
            cover_image: None,
            subdomain: None,
        }
    }

    #[test]
    fn test_name_length_boundaries() {
        assert!(validate_name("ab").is_err());
        assert!(validate_name("abc").is_ok());
        assert!(validate_name(&"a".repeat(50)).is_ok());
        assert!(validate_name(&"a".repeat(51)).is_err());
        assert_eq!(validate_name("   ab   ").unwrap_err().field(), Some("name"));
    }

    #[test]
    fn test_description_length() {
        assert!(validate_description("too short").is_err());
        assert!(validate_description("long enough").is_ok());
        assert!(validate_description(&"d".repeat(501)).is_err());
    }

    #[test]
    fn test_cover_image() {
        assert_eq!(validate_cover_image("").unwrap(), None);
        assert_eq!(
            validate_cover_image("https://img.example/cover.png").unwrap().as_deref(),
            Some("https://img.example/cover.png")
        );
        assert!(validate_cover_image("ftp://img.example/cover.png").is_err());
        assert!(validate_cover_image("not a url").is_err());
    }

    #[test]
    fn test_create_derives_subdomain() {
        let input = validate_create(&create("Tech Notes")).unwrap();
        assert_eq!(input.subdomain, "tech-notes");
        assert!(input.is_public);

        let input = validate_create(&create("Tech Notes!!")).unwrap();
        assert_eq!(input.subdomain, "tech-notes");
    }

    #[test]
    fn test_create_with_explicit_subdomain() {
        let mut request = create("Tech Notes");
        request.subdomain = Some(" My-Tech ".to_string());
        assert_eq!(validate_create(&request).unwrap().subdomain, "my-tech");

        request.subdomain = Some("no".to_string());
        assert_eq!(validate_create(&request).unwrap_err().field(), Some("subdomain"));
    }

    #[test]
    fn test_create_underivable_subdomain() {
        let err = validate_create(&create("!!!???")).unwrap_err();
        assert_eq!(err.field(), Some("subdomain"));

        // Name length is fine, but "a" is too short to be a subdomain.
        let err = validate_create(&create("A!!")).unwrap_err();
        assert_eq!(err.field(), Some("subdomain"));

        let mut request = create("A!!");
        request.subdomain = Some("a-notes".to_string());
        assert_eq!(validate_create(&request).unwrap().subdomain, "a-notes");
    }

    #[test]
    fn test_update_clears_cover_image() {
        let patch = validate_update(&UpdateCollectionRequest {
            cover_image: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.cover_image, Some(None));
        assert_eq!(patch.name, None);
    }
}
