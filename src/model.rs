use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Severity/priority classification of a recommendation. Grades outside the
/// published A/B/C/E scale deserialize as `Unknown` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    E,
    #[serde(other)]
    Unknown,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::E => "E",
            Self::Unknown => "?",
        }
    }

    /// Bootstrap list-group class for this grade. Unknown grades get the
    /// neutral style instead of an error.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::A => "list-group-item-success",
            Self::B => "list-group-item-info",
            Self::C => "list-group-item-warning",
            Self::E => "list-group-item-danger",
            Self::Unknown => "list-group-item-secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub grade: Grade,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
    pub title: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_number: u32,
    pub chapter_title: String,
    pub recommendation_groups: Vec<RecommendationGroup>,
}

/// The whole guideline tree. On disk this is the bare JSON array of chapter
/// objects produced by the extraction script, hence the transparent wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuidelineDocument {
    pub chapters: Vec<Chapter>,
}

impl GuidelineDocument {
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn group_count(&self) -> usize {
        self.chapters
            .iter()
            .map(|chapter| chapter.recommendation_groups.len())
            .sum()
    }

    pub fn recommendation_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|chapter| &chapter.recommendation_groups)
            .map(|group| group.recommendations.len())
            .sum()
    }
}

/// Loads and validates the guideline document. Missing or mistyped fields
/// fail at parse time; duplicate chapter numbers are rejected because the
/// rendered accordion derives element ids from them.
pub fn load_document(path: &Path) -> Result<GuidelineDocument> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document: GuidelineDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse guideline document {}", path.display()))?;

    let mut seen_numbers = HashSet::new();
    for chapter in &document.chapters {
        if !seen_numbers.insert(chapter.chapter_number) {
            bail!(
                "duplicate chapter_number {} in {}",
                chapter.chapter_number,
                path.display()
            );
        }
    }

    let unknown_grades = document
        .chapters
        .iter()
        .flat_map(|chapter| &chapter.recommendation_groups)
        .flat_map(|group| &group.recommendations)
        .filter(|recommendation| recommendation.grade == Grade::Unknown)
        .count();
    if unknown_grades > 0 {
        warn!(
            count = unknown_grades,
            "document contains recommendations with unrecognized grades"
        );
    }

    info!(
        path = %path.display(),
        chapters = document.chapter_count(),
        groups = document.group_count(),
        recommendations = document.recommendation_count(),
        "loaded guideline document"
    );

    Ok(document)
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderCounts {
    pub chapters: usize,
    pub groups: usize,
    pub recommendations: usize,
}

impl RenderCounts {
    pub fn of(document: &GuidelineDocument) -> Self {
        Self {
            chapters: document.chapter_count(),
            groups: document.group_count(),
            recommendations: document.recommendation_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub search_term: Option<String>,
    pub source_counts: RenderCounts,
    pub rendered_counts: RenderCounts,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub term: String,
    pub source_counts: RenderCounts,
    pub retained_counts: RenderCounts,
    pub document: GuidelineDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_grade(raw: &str) -> Grade {
        serde_json::from_str(raw).expect("grade should deserialize")
    }

    #[test]
    fn grade_deserializes_known_values() {
        assert_eq!(parse_grade("\"A\""), Grade::A);
        assert_eq!(parse_grade("\"B\""), Grade::B);
        assert_eq!(parse_grade("\"C\""), Grade::C);
        assert_eq!(parse_grade("\"E\""), Grade::E);
    }

    #[test]
    fn grade_falls_back_to_unknown() {
        assert_eq!(parse_grade("\"D\""), Grade::Unknown);
        assert_eq!(parse_grade("\"expert opinion\""), Grade::Unknown);
    }

    #[test]
    fn grade_css_classes_follow_fixed_table() {
        assert_eq!(Grade::A.css_class(), "list-group-item-success");
        assert_eq!(Grade::B.css_class(), "list-group-item-info");
        assert_eq!(Grade::C.css_class(), "list-group-item-warning");
        assert_eq!(Grade::E.css_class(), "list-group-item-danger");
        assert_eq!(Grade::Unknown.css_class(), "list-group-item-secondary");
    }

    #[test]
    fn document_parses_bare_chapter_array() {
        let raw = r#"[
            {
                "chapter_number": 1,
                "chapter_title": "Improving Care",
                "recommendation_groups": [
                    {
                        "title": "Diabetes and Population Health",
                        "recommendations": [
                            { "grade": "B", "content": "Ensure treatment decisions are timely." }
                        ]
                    }
                ]
            }
        ]"#;

        let document: GuidelineDocument =
            serde_json::from_str(raw).expect("document should deserialize");
        assert_eq!(document.chapter_count(), 1);
        assert_eq!(document.group_count(), 1);
        assert_eq!(document.recommendation_count(), 1);
        assert_eq!(document.chapters[0].chapter_title, "Improving Care");
        assert_eq!(
            document.chapters[0].recommendation_groups[0].recommendations[0].grade,
            Grade::B
        );
    }

    #[test]
    fn document_rejects_missing_fields() {
        let raw = r#"[{ "chapter_number": 1, "recommendation_groups": [] }]"#;
        let parsed: Result<GuidelineDocument, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn load_rejects_duplicate_chapter_numbers() {
        let raw = r#"[
            { "chapter_number": 2, "chapter_title": "First", "recommendation_groups": [] },
            { "chapter_number": 2, "chapter_title": "Second", "recommendation_groups": [] }
        ]"#;
        let dir = std::env::temp_dir().join("adaguide-model-tests");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("duplicate_chapters.json");
        std::fs::write(&path, raw).expect("write fixture");

        let loaded = load_document(&path);
        assert!(loaded.is_err());
        let message = format!("{:#}", loaded.unwrap_err());
        assert!(message.contains("duplicate chapter_number 2"));
    }
}
