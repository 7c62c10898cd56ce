//! Self-introduction document models.
//!
//! A document has a title and five question/answer sections
//! (`title1`/`content1` .. `title5`/`content5`), all optional except the title.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validate};

pub const TITLE_MAX_CHARS: usize = 255;
pub const CONTENT_MAX_CHARS: usize = 5000;

/// Stored document as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Introduction {
    pub id: i64,
    pub owner: String,
    pub introduction_title: String,
    pub title1: Option<String>,
    pub content1: Option<String>,
    pub title2: Option<String>,
    pub content2: Option<String>,
    pub title3: Option<String>,
    pub content3: Option<String>,
    pub title4: Option<String>,
    pub content4: Option<String>,
    pub title5: Option<String>,
    pub content5: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create/update request body. Missing fields deserialize as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntroductionDto {
    pub introduction_title: Option<String>,
    pub title1: Option<String>,
    pub content1: Option<String>,
    pub title2: Option<String>,
    pub content2: Option<String>,
    pub title3: Option<String>,
    pub content3: Option<String>,
    pub title4: Option<String>,
    pub content4: Option<String>,
    pub title5: Option<String>,
    pub content5: Option<String>,
}

/// Validated document contents, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroductionDraft {
    pub introduction_title: String,
    pub title1: Option<String>,
    pub content1: Option<String>,
    pub title2: Option<String>,
    pub content2: Option<String>,
    pub title3: Option<String>,
    pub content3: Option<String>,
    pub title4: Option<String>,
    pub content4: Option<String>,
    pub title5: Option<String>,
    pub content5: Option<String>,
}

impl IntroductionDto {
    fn section_titles(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("title1", self.title1.as_deref()),
            ("title2", self.title2.as_deref()),
            ("title3", self.title3.as_deref()),
            ("title4", self.title4.as_deref()),
            ("title5", self.title5.as_deref()),
        ]
    }

    fn section_contents(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("content1", self.content1.as_deref()),
            ("content2", self.content2.as_deref()),
            ("content3", self.content3.as_deref()),
            ("content4", self.content4.as_deref()),
            ("content5", self.content5.as_deref()),
        ]
    }

    /// Validate and convert; the document title is trimmed.
    pub fn into_draft(self) -> Result<IntroductionDraft, FieldErrors> {
        self.validate()?;

        Ok(IntroductionDraft {
            introduction_title: self
                .introduction_title
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            title1: self.title1,
            content1: self.content1,
            title2: self.title2,
            content2: self.content2,
            title3: self.title3,
            content3: self.content3,
            title4: self.title4,
            content4: self.content4,
            title5: self.title5,
            content5: self.content5,
        })
    }
}

impl Validate for IntroductionDto {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.introduction_title.as_deref().unwrap_or("");
        if errors.require("introductionTitle", title) {
            errors.max_chars("introductionTitle", Some(title.trim()), TITLE_MAX_CHARS);
        }

        for (field, value) in self.section_titles() {
            errors.max_chars(field, value, TITLE_MAX_CHARS);
        }
        for (field, value) in self.section_contents() {
            errors.max_chars(field, value, CONTENT_MAX_CHARS);
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_dto(title: &str) -> IntroductionDto {
        IntroductionDto {
            introduction_title: Some(title.to_string()),
            title1: Some("자기소개서 항목1 제목".to_string()),
            content1: Some("자기소개서 항목1 내용".to_string()),
            title2: Some("Growth".to_string()),
            content2: Some("Grew up reading manuals".to_string()),
            ..IntroductionDto::default()
        }
    }

    #[test]
    fn test_builds_document_with_sections() {
        let draft = full_dto("  자기소개서 제목1 ").into_draft().unwrap();
        assert_eq!(draft.introduction_title, "자기소개서 제목1");
        assert_eq!(draft.title1.as_deref(), Some("자기소개서 항목1 제목"));
        assert_eq!(draft.content1.as_deref(), Some("자기소개서 항목1 내용"));
        assert!(draft.title5.is_none());
    }

    #[test]
    fn test_missing_title_rejected() {
        let dto = IntroductionDto {
            title1: Some("항목1".to_string()),
            ..IntroductionDto::default()
        };
        let errors = dto.into_draft().unwrap_err();
        assert_eq!(errors.first_message(), Some("introductionTitle is required"));
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(full_dto("").into_draft().is_err());
        assert!(full_dto("   ").into_draft().is_err());
    }

    #[test]
    fn test_oversized_sections_reported_per_field() {
        let mut dto = full_dto("Resume");
        dto.title3 = Some("t".repeat(TITLE_MAX_CHARS + 1));
        dto.content4 = Some("c".repeat(CONTENT_MAX_CHARS + 1));

        let errors = dto.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title3", "content4"]);
    }

    #[test]
    fn test_dto_reads_frontend_payload() {
        let dto: IntroductionDto = serde_json::from_str(
            r#"{"idx": 3, "introductionTitle": "Company", "title1": "Title", "content1": "Body", "open": false}"#,
        )
        .unwrap();
        assert_eq!(dto.introduction_title.as_deref(), Some("Company"));
        assert_eq!(dto.content1.as_deref(), Some("Body"));
        assert!(dto.title2.is_none());
    }
}
