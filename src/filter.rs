use crate::model::{Chapter, GuidelineDocument, RecommendationGroup};

/// Derives the filtered view of a guideline document for a search term.
///
/// Matching is exact, case-sensitive substring containment against chapter
/// titles, group titles, and recommendation content. A title match keeps the
/// whole subtree; otherwise only matching recommendations survive, and
/// groups/chapters left empty are dropped. Relative order is preserved and
/// the input document is never touched.
pub fn filter_document(document: &GuidelineDocument, term: &str) -> GuidelineDocument {
    let chapters = document
        .chapters
        .iter()
        .filter_map(|chapter| filter_chapter(chapter, term))
        .collect();

    GuidelineDocument { chapters }
}

fn filter_chapter(chapter: &Chapter, term: &str) -> Option<Chapter> {
    // A matching chapter title retains the chapter in full.
    if chapter.chapter_title.contains(term) {
        return Some(chapter.clone());
    }

    let recommendation_groups: Vec<RecommendationGroup> = chapter
        .recommendation_groups
        .iter()
        .filter_map(|group| filter_group(group, term))
        .collect();

    if recommendation_groups.is_empty() {
        return None;
    }

    Some(Chapter {
        chapter_number: chapter.chapter_number,
        chapter_title: chapter.chapter_title.clone(),
        recommendation_groups,
    })
}

fn filter_group(group: &RecommendationGroup, term: &str) -> Option<RecommendationGroup> {
    if group.title.contains(term) {
        return Some(group.clone());
    }

    let recommendations: Vec<_> = group
        .recommendations
        .iter()
        .filter(|recommendation| recommendation.content.contains(term))
        .cloned()
        .collect();

    if recommendations.is_empty() {
        return None;
    }

    Some(RecommendationGroup {
        title: group.title.clone(),
        recommendations,
    })
}
