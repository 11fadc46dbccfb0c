//! Slug and subdomain assignment.
//!
//! Collection and article slugs are `slugify(name)` plus a random four-digit
//! suffix. The unique constraints in the store are the only guarantee; a
//! collision redraws the suffix up to [`SLUG_ATTEMPTS`] times.
//!
//! Subdomains carry no suffix. They are assigned once at creation and are
//! never regenerated.

use std::future::Future;

use rand::Rng;

use crate::backend::store::{StoreError, UniqueField};
use crate::shared::SharedError;

/// Suffix draws before a slug collision is surfaced as a conflict
pub const SLUG_ATTEMPTS: usize = 5;

pub const SUBDOMAIN_MIN_LEN: usize = 3;
pub const SUBDOMAIN_MAX_LEN: usize = 30;

const EMPTY_BASE: &str = "untitled";

/// Lowercase URL-safe form of `input`.
///
/// ASCII letters and digits are kept, whitespace, `-` and `_` separate
/// words, anything else is dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        }
    }

    slug
}

/// `slugify(base)` with a fresh random suffix, e.g. `tech-notes-0427`
pub fn suffixed_slug(base: &str) -> String {
    let mut stem = slugify(base);
    if stem.is_empty() {
        stem.push_str(EMPTY_BASE);
    }
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("{stem}-{suffix:04}")
}

/// Subdomain derived from a collection name
pub fn derive_subdomain(name: &str) -> String {
    let slug = slugify(name);
    let truncated: String = slug.chars().take(SUBDOMAIN_MAX_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

/// Normalise and check a caller-supplied subdomain
pub fn validate_subdomain(raw: &str) -> Result<String, SharedError> {
    let subdomain = raw.trim().to_lowercase();

    if subdomain.len() < SUBDOMAIN_MIN_LEN || subdomain.len() > SUBDOMAIN_MAX_LEN {
        return Err(SharedError::validation(
            "subdomain",
            format!("Subdomain must be between {SUBDOMAIN_MIN_LEN} and {SUBDOMAIN_MAX_LEN} characters"),
        ));
    }
    if !is_subdomain_chars(&subdomain) {
        return Err(SharedError::validation(
            "subdomain",
            "Subdomain can only contain lowercase letters, numbers, and hyphens",
        ));
    }
    Ok(subdomain)
}

fn is_subdomain_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Run `attempt` with freshly drawn slugs until it stops colliding on `field`.
///
/// Any other outcome, success or a different error, is returned as is. After
/// [`SLUG_ATTEMPTS`] collisions the duplicate error is returned.
pub async fn with_unique_slug<T, F, Fut>(
    base: &str,
    field: UniqueField,
    mut attempt: F,
) -> Result<T, StoreError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    for round in 1..=SLUG_ATTEMPTS {
        let slug = suffixed_slug(base);
        match attempt(slug.clone()).await {
            Err(StoreError::Duplicate(hit)) if hit == field => {
                tracing::debug!("Slug {} already taken (attempt {}/{})", slug, round, SLUG_ATTEMPTS);
            }
            other => return other,
        }
    }

    tracing::warn!("Gave up assigning a unique slug for {:?} after {} attempts", base, SLUG_ATTEMPTS);
    Err(StoreError::Duplicate(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tech Notes"), "tech-notes");
        assert_eq!(slugify("Tech Notes!!"), "tech-notes");
        assert_eq!(slugify("  Hello,   World  "), "hello-world");
        assert_eq!(slugify("snake_case--and-dashes"), "snake-case-and-dashes");
        assert_eq!(slugify("Café Olé"), "caf-ol");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_suffixed_slug_shape() {
        let slug = suffixed_slug("Tech Notes");
        let (stem, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(stem, "tech-notes");
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));

        assert!(suffixed_slug("???").starts_with("untitled-"));
    }

    #[test]
    fn test_derive_subdomain() {
        assert_eq!(derive_subdomain("Tech Notes"), "tech-notes");
        assert_eq!(derive_subdomain("Tech Notes!!"), "tech-notes");

        let long = derive_subdomain("an extremely long collection name that keeps going");
        assert!(long.len() <= SUBDOMAIN_MAX_LEN);
        assert!(!long.ends_with('-'));
    }

    #[test]
    fn test_validate_subdomain() {
        assert_eq!(validate_subdomain("  My-Blog ").unwrap(), "my-blog");
        assert!(validate_subdomain("ab").is_err());
        assert!(validate_subdomain(&"a".repeat(31)).is_err());
        assert!(validate_subdomain("my_blog").is_err());
        assert!(validate_subdomain("my blog").is_err());

        let err = validate_subdomain("x").unwrap_err();
        assert_eq!(err.field(), Some("subdomain"));
    }

    #[tokio::test]
    async fn test_with_unique_slug_retries_collisions() {
        let calls = AtomicUsize::new(0);
        let result = with_unique_slug("post", UniqueField::ArticleSlug, |slug| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StoreError::Duplicate(UniqueField::ArticleSlug))
                } else {
                    Ok(slug)
                }
            }
        })
        .await
        .unwrap();

        assert!(result.starts_with("post-"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_unique_slug_gives_up() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_unique_slug("post", UniqueField::CollectionSlug, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StoreError::Duplicate(UniqueField::CollectionSlug)) }
        })
        .await;

        assert!(matches!(result, Err(StoreError::Duplicate(UniqueField::CollectionSlug))));
        assert_eq!(calls.load(Ordering::SeqCst), SLUG_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_with_unique_slug_passes_other_errors_through() {
        let result: Result<(), _> = with_unique_slug("post", UniqueField::CollectionSlug, |_| async {
            Err(StoreError::Duplicate(UniqueField::Subdomain))
        })
        .await;

        assert!(matches!(result, Err(StoreError::Duplicate(UniqueField::Subdomain))));
    }

    proptest! {
        #[test]
        fn slugify_output_alphabet(input in ".{0,80}") {
            let slug = slugify(&input);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn derived_subdomain_fits_length(input in "[a-zA-Z0-9 _-]{0,120}") {
            let subdomain = derive_subdomain(&input);
            prop_assert!(subdomain.len() <= SUBDOMAIN_MAX_LEN);
            prop_assert!(!subdomain.ends_with('-'));
        }
    }
}
