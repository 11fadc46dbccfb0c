//! Article input rules.

use regex::{Regex, RegexBuilder};

use crate::shared::blog::{CreateArticleRequest, UpdateArticleRequest};
use crate::shared::SharedError;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const CONTENT_MIN: usize = 10;

const SEARCH_SIZE_LIMIT: usize = 1 << 20;

/// Validated create body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
}

/// Validated patch body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub fn validate_title(raw: &str) -> Result<String, SharedError> {
    let title = raw.trim();
    let len = title.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        return Err(SharedError::validation(
            "title",
            format!("Title must be between {TITLE_MIN} and {TITLE_MAX} characters"),
        ));
    }
    Ok(title.to_string())
}

pub fn validate_content(raw: &str) -> Result<String, SharedError> {
    if raw.trim().chars().count() < CONTENT_MIN {
        return Err(SharedError::validation(
            "content",
            format!("Content must be at least {CONTENT_MIN} characters long"),
        ));
    }
    Ok(raw.to_string())
}

pub fn validate_create(request: &CreateArticleRequest) -> Result<ArticleInput, SharedError> {
    if request.title.trim().is_empty() || request.content.trim().is_empty() {
        let field = if request.title.trim().is_empty() { "title" } else { "content" };
        return Err(SharedError::validation(field, "Title and content are required"));
    }
    Ok(ArticleInput {
        title: validate_title(&request.title)?,
        content: validate_content(&request.content)?,
    })
}

pub fn validate_patch(request: &UpdateArticleRequest) -> Result<ArticlePatch, SharedError> {
    Ok(ArticlePatch {
        title: request.title.as_deref().map(validate_title).transpose()?,
        content: request.content.as_deref().map(validate_content).transpose()?,
    })
}

/// Compile a feed search term as a case-insensitive regular expression
pub fn search_pattern(raw: &str) -> Result<Regex, SharedError> {
    RegexBuilder::new(raw)
        .case_insensitive(true)
        .size_limit(SEARCH_SIZE_LIMIT)
        .build()
        .map_err(|e| SharedError::validation("search", format!("Invalid search pattern: {e}")))
}
