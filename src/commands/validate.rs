use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ValidateArgs;
use crate::model::{Grade, GuidelineDocument, RenderCounts};
use crate::render::construct_id;
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

const REPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationCheck {
    pub name: String,
    pub status: String,
    pub failure_count: usize,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub report_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub counts: RenderCounts,
    pub checks: Vec<ValidationCheck>,
    pub failed_check_count: usize,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    // Parses directly instead of via load_document so structural problems
    // surface as report checks rather than a load error.
    let raw = fs::read(&args.guidelines)
        .with_context(|| format!("failed to read {}", args.guidelines.display()))?;
    let document: GuidelineDocument = serde_json::from_slice(&raw).with_context(|| {
        format!(
            "failed to parse guideline document {}",
            args.guidelines.display()
        )
    })?;

    let checks = run_checks(&document);
    let failed_check_count = checks
        .iter()
        .filter(|check| check.status == "fail")
        .count();

    for check in &checks {
        if check.status == "fail" {
            warn!(
                check = %check.name,
                failures = check.failure_count,
                "validation check failed"
            );
            for detail in &check.details {
                warn!(check = %check.name, detail = %detail, "failure detail");
            }
        } else {
            info!(check = %check.name, "validation check passed");
        }
    }

    if let Some(report_path) = &args.report_path {
        let report = ValidationReport {
            report_version: REPORT_VERSION,
            generated_at: now_utc_string(),
            source_path: args.guidelines.display().to_string(),
            source_sha256: sha256_file(&args.guidelines)?,
            counts: RenderCounts::of(&document),
            checks: checks.clone(),
            failed_check_count,
        };

        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote validation report");
    }

    if failed_check_count > 0 {
        bail!(
            "{failed_check_count} validation check(s) failed for {}",
            args.guidelines.display()
        );
    }

    info!(checks = checks.len(), "all validation checks passed");
    Ok(())
}

fn run_checks(document: &GuidelineDocument) -> Vec<ValidationCheck> {
    vec![
        check_unique_chapter_numbers(document),
        check_unique_constructed_ids(document),
        check_nonempty_chapter_titles(document),
        check_nonempty_group_titles(document),
        check_nonempty_recommendation_content(document),
        check_groups_have_recommendations(document),
        check_known_grades(document),
    ]
}

fn make_check(name: &str, details: Vec<String>) -> ValidationCheck {
    ValidationCheck {
        name: name.to_string(),
        status: if details.is_empty() { "pass" } else { "fail" }.to_string(),
        failure_count: details.len(),
        details,
    }
}

fn check_unique_chapter_numbers(document: &GuidelineDocument) -> ValidationCheck {
    let mut occurrences: HashMap<u32, usize> = HashMap::new();
    for chapter in &document.chapters {
        *occurrences.entry(chapter.chapter_number).or_default() += 1;
    }

    let mut details: Vec<String> = occurrences
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(number, count)| format!("chapter_number {number} appears {count} times"))
        .collect();
    details.sort();

    make_check("unique_chapter_numbers", details)
}

fn check_unique_constructed_ids(document: &GuidelineDocument) -> ValidationCheck {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    for chapter in &document.chapters {
        let id = construct_id(chapter.chapter_number, &chapter.chapter_title);
        *occurrences.entry(id).or_default() += 1;
    }

    let mut details: Vec<String> = occurrences
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, count)| format!("constructed id {id} appears {count} times"))
        .collect();
    details.sort();

    make_check("unique_constructed_ids", details)
}

fn check_nonempty_chapter_titles(document: &GuidelineDocument) -> ValidationCheck {
    let details = document
        .chapters
        .iter()
        .filter(|chapter| chapter.chapter_title.trim().is_empty())
        .map(|chapter| format!("chapter {} has an empty title", chapter.chapter_number))
        .collect();

    make_check("nonempty_chapter_titles", details)
}

fn check_nonempty_group_titles(document: &GuidelineDocument) -> ValidationCheck {
    let mut details = Vec::new();
    for chapter in &document.chapters {
        for (group_index, group) in chapter.recommendation_groups.iter().enumerate() {
            if group.title.trim().is_empty() {
                details.push(format!(
                    "chapter {} group {} has an empty title",
                    chapter.chapter_number, group_index
                ));
            }
        }
    }

    make_check("nonempty_group_titles", details)
}

fn check_nonempty_recommendation_content(document: &GuidelineDocument) -> ValidationCheck {
    let mut details = Vec::new();
    for chapter in &document.chapters {
        for group in &chapter.recommendation_groups {
            for (rec_index, recommendation) in group.recommendations.iter().enumerate() {
                if recommendation.content.trim().is_empty() {
                    details.push(format!(
                        "chapter {} group '{}' recommendation {} has empty content",
                        chapter.chapter_number, group.title, rec_index
                    ));
                }
            }
        }
    }

    make_check("nonempty_recommendation_content", details)
}

fn check_groups_have_recommendations(document: &GuidelineDocument) -> ValidationCheck {
    let mut details = Vec::new();
    for chapter in &document.chapters {
        for group in &chapter.recommendation_groups {
            if group.recommendations.is_empty() {
                details.push(format!(
                    "chapter {} group '{}' has no recommendations",
                    chapter.chapter_number, group.title
                ));
            }
        }
    }

    make_check("groups_have_recommendations", details)
}

fn check_known_grades(document: &GuidelineDocument) -> ValidationCheck {
    let mut details = Vec::new();
    for chapter in &document.chapters {
        for group in &chapter.recommendation_groups {
            for (rec_index, recommendation) in group.recommendations.iter().enumerate() {
                if recommendation.grade == Grade::Unknown {
                    details.push(format!(
                        "chapter {} group '{}' recommendation {} has an unrecognized grade",
                        chapter.chapter_number, group.title, rec_index
                    ));
                }
            }
        }
    }

    make_check("known_grades", details)
}
