//! Blog posts and the rules for creating and listing them.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::user::{DisplayName, EmailAddress, UserId};

/// Longest accepted title, in characters.
pub const TITLE_MAX: usize = 250;
/// Longest accepted subtitle, in characters.
pub const SUBTITLE_MAX: usize = 500;
/// Longest accepted image URL, in characters.
pub const IMAGE_URL_MAX: usize = 250;

/// `chrono` format of the publish date shown under each post,
/// e.g. `October 19, 2026`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Format a calendar date the way posts display it.
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Why a post field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    SubtitleTooLong { max: usize },
    EmptyBody,
    ImageUrlTooLong { max: usize },
}

impl PostValidationError {
    /// Form field the failure belongs to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::SubtitleTooLong { .. } => "subtitle",
            Self::EmptyBody => "body",
            Self::ImageUrlTooLong { .. } => "img_url",
        }
    }
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title is required."),
            Self::TitleTooLong { max } => write!(f, "Title must be at most {max} characters."),
            Self::SubtitleTooLong { max } => {
                write!(f, "Subtitle must be at most {max} characters.")
            }
            Self::EmptyBody => write!(f, "Content is required."),
            Self::ImageUrlTooLong { max } => {
                write!(f, "Image URL must be at most {max} characters.")
            }
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Database identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post title; unique across posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

impl PostTitle {
    /// Trim and validate a title.
    pub fn new(raw: &str) -> Result<Self, PostValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The editable part of a post. Date and author are assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: PostTitle,
    subtitle: String,
    body: String,
    img_url: String,
}

impl PostDraft {
    /// Validate lengths and require a non-blank body.
    ///
    /// An empty image URL is allowed here; interactive forms apply the
    /// stricter URL check before building a draft.
    pub fn new(
        title: PostTitle,
        subtitle: &str,
        body: &str,
        img_url: &str,
    ) -> Result<Self, PostValidationError> {
        if let Some(error) = Self::check_fields(subtitle, body, img_url).into_iter().next() {
            return Err(error);
        }
        Ok(Self {
            title,
            subtitle: subtitle.trim().to_owned(),
            body: body.to_owned(),
            img_url: img_url.trim().to_owned(),
        })
    }

    /// Every failure among the non-title fields, in form order.
    pub fn check_fields(subtitle: &str, body: &str, img_url: &str) -> Vec<PostValidationError> {
        let mut errors = Vec::new();
        if subtitle.trim().chars().count() > SUBTITLE_MAX {
            errors.push(PostValidationError::SubtitleTooLong { max: SUBTITLE_MAX });
        }
        if body.trim().is_empty() {
            errors.push(PostValidationError::EmptyBody);
        }
        if img_url.trim().chars().count() > IMAGE_URL_MAX {
            errors.push(PostValidationError::ImageUrlTooLong { max: IMAGE_URL_MAX });
        }
        errors
    }

    pub const fn title(&self) -> &PostTitle {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn img_url(&self) -> &str {
        &self.img_url
    }
}

/// The author fields shown next to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
}

/// A stored post with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub author: AuthorSummary,
}

/// Which posts the index page lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostFilter {
    #[default]
    All,
    /// Posts whose author's display name matches exactly.
    ByAuthorName(String),
}

impl PostFilter {
    /// Build a filter from the optional `author` query parameter. Blank
    /// values list everything.
    pub fn from_author_param(author: Option<&str>) -> Self {
        match author.map(str::trim) {
            Some(name) if !name.is_empty() => Self::ByAuthorName(name.to_owned()),
            _ => Self::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn title(raw: &str) -> PostTitle {
        PostTitle::new(raw).expect("valid title")
    }

    #[rstest]
    #[case(2026, 10, 19, "October 19, 2026")]
    #[case(2023, 1, 5, "January 05, 2023")]
    fn formats_display_dates(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] expected: &str,
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid date");
        assert_eq!(display_date(date), expected);
    }

    #[rstest]
    #[case("", PostValidationError::EmptyTitle)]
    #[case("   ", PostValidationError::EmptyTitle)]
    fn blank_titles_are_rejected(#[case] raw: &str, #[case] expected: PostValidationError) {
        assert_eq!(PostTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn overlong_titles_are_rejected() {
        let raw = "t".repeat(TITLE_MAX + 1);
        assert_eq!(
            PostTitle::new(&raw),
            Err(PostValidationError::TitleTooLong { max: TITLE_MAX })
        );
    }

    #[rstest]
    fn draft_requires_body() {
        let error = PostDraft::new(title("Hello"), "", "  ", "").expect_err("blank body");
        assert_eq!(error, PostValidationError::EmptyBody);
        assert_eq!(error.field(), "body");
    }

    #[rstest]
    fn draft_allows_empty_subtitle_and_image() {
        let draft = PostDraft::new(title("Hello"), "", "<p>Hi</p>", "").expect("valid draft");
        assert_eq!(draft.subtitle(), "");
        assert_eq!(draft.img_url(), "");
        assert_eq!(draft.body(), "<p>Hi</p>");
    }

    #[rstest]
    fn draft_limits_subtitle_and_image() {
        let long_subtitle = "s".repeat(SUBTITLE_MAX + 1);
        let long_url = format!("https://example.org/{}", "i".repeat(IMAGE_URL_MAX));
        assert_eq!(
            PostDraft::new(title("a"), &long_subtitle, "b", ""),
            Err(PostValidationError::SubtitleTooLong { max: SUBTITLE_MAX })
        );
        assert_eq!(
            PostDraft::new(title("a"), "", "b", &long_url),
            Err(PostValidationError::ImageUrlTooLong { max: IMAGE_URL_MAX })
        );
    }

    #[rstest]
    fn field_checks_report_every_failure() {
        let long_subtitle = "s".repeat(SUBTITLE_MAX + 1);
        assert_eq!(
            PostDraft::check_fields(&long_subtitle, " ", ""),
            [
                PostValidationError::SubtitleTooLong { max: SUBTITLE_MAX },
                PostValidationError::EmptyBody,
            ]
        );
        assert!(PostDraft::check_fields("", "<p>ok</p>", "").is_empty());
    }

    #[rstest]
    #[case(None, PostFilter::All)]
    #[case(Some(""), PostFilter::All)]
    #[case(Some("  "), PostFilter::All)]
    #[case(Some(" Noah Clements "), PostFilter::ByAuthorName("Noah Clements".to_owned()))]
    fn author_param_builds_filter(#[case] raw: Option<&str>, #[case] expected: PostFilter) {
        assert_eq!(PostFilter::from_author_param(raw), expected);
    }
}
