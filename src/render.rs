use crate::model::{Chapter, GuidelineDocument, RecommendationGroup};

/// Escapes text interpolated into markup. Ampersands are replaced first so
/// entities introduced by the later replacements are not double-escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

/// Builds the collapse-target id for a chapter: fixed prefix, chapter
/// number, fixed infix, then the title with all whitespace runs removed.
/// Chapter numbers are unique (enforced at load), so ids cannot collide.
pub fn construct_id(chapter_number: u32, chapter_title: &str) -> String {
    let condensed_title: String = chapter_title.split_whitespace().collect();
    format!("no{chapter_number}title{condensed_title}")
}

/// Renders the accordion fragment: one collapsible card per chapter.
pub fn render_accordion(document: &GuidelineDocument) -> String {
    let mut output = String::new();

    for chapter in &document.chapters {
        let current_id = construct_id(chapter.chapter_number, &chapter.chapter_title);

        output.push_str("<div class=\"card\">");
        push_card_header(&mut output, &current_id, chapter);
        push_card_body(&mut output, &current_id, &chapter.recommendation_groups);
        output.push_str("</div>");
    }

    output
}

fn push_card_header(output: &mut String, current_id: &str, chapter: &Chapter) {
    output.push_str(&format!(
        "<div class=\"card-header\" id=\"{current_id}title\">"
    ));
    output.push_str(&format!(
        "<button class=\"btn btn-outline-info container-fluid\" data-toggle=\"collapse\" \
         data-target=\"#{current_id}\" aria-expanded=\"true\" aria-controls=\"{current_id}\">"
    ));
    output.push_str(&escape_html(&format!(
        "{}. {}",
        chapter.chapter_number, chapter.chapter_title
    )));
    output.push_str("</button>");
    output.push_str("</div>");
}

fn push_card_body(output: &mut String, current_id: &str, groups: &[RecommendationGroup]) {
    output.push_str(&format!(
        "<div class=\"collapse\" id=\"{current_id}\" aria-labelledby=\"{current_id}title\" \
         data-parent=\"#accordion\">"
    ));
    output.push_str("<div class=\"card-body\">");

    for group in groups {
        output.push_str(&format!("<h6>{}</h6>", escape_html(&group.title)));
        output.push_str("<ul class=\"list-group\">");

        for recommendation in &group.recommendations {
            output.push_str(&format!(
                "<li class=\"list-group-item {}\">",
                recommendation.grade.css_class()
            ));
            output.push_str(&format!(
                "<span class=\"badge badge-primary badge-pill\">{}</span> {}",
                recommendation.grade.as_str(),
                escape_html(&recommendation.content)
            ));
            output.push_str("</li>");
        }

        output.push_str("</ul>");
        output.push_str("<br>");
    }

    output.push_str("</div>");
    output.push_str("</div>");
}

/// Renders a complete standalone page: heading, the static search chrome the
/// original viewer exposed, and the accordion container.
pub fn render_page(document: &GuidelineDocument, page_title: &str) -> String {
    let accordion = render_accordion(document);
    let title = escape_html(page_title);

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" \
         href=\"https://stackpath.bootstrapcdn.com/bootstrap/4.1.3/css/bootstrap.min.css\">\n\
         </head>\n\
         <body>\n\
         <div class=\"container\">\n\
         <h1>{title}</h1>\n\
         <div class=\"input-group mb-3\">\n\
         <input type=\"text\" class=\"form-control\" id=\"search-input\" \
         placeholder=\"Search guidelines\">\n\
         <div class=\"input-group-append\">\n\
         <button class=\"btn btn-outline-info\" type=\"button\" id=\"search-button\">\
         Search</button>\n\
         <button class=\"btn btn-outline-secondary\" type=\"button\" id=\"clear-button\">\
         Clear</button>\n\
         </div>\n\
         </div>\n\
         <div id=\"accordion\">{accordion}</div>\n\
         </div>\n\
         </body>\n\
         </html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grade, Recommendation};

    fn single_chapter_document() -> GuidelineDocument {
        GuidelineDocument {
            chapters: vec![Chapter {
                chapter_number: 3,
                chapter_title: "Comprehensive Medical Evaluation".to_string(),
                recommendation_groups: vec![RecommendationGroup {
                    title: "Immunization".to_string(),
                    recommendations: vec![
                        Recommendation {
                            grade: Grade::C,
                            content: "Provide routine vaccinations".to_string(),
                        },
                        Recommendation {
                            grade: Grade::Unknown,
                            content: "Review <immunization> status & history".to_string(),
                        },
                    ],
                }],
            }],
        }
    }

    #[test]
    fn escape_html_replaces_ampersand_first() {
        assert_eq!(
            escape_html("<b>A & B</b>"),
            "&lt;b&gt;A &amp; B&lt;/b&gt;"
        );
    }

    #[test]
    fn escape_html_handles_quotes() {
        assert_eq!(escape_html("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn escape_html_leaves_plain_text_alone() {
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn construct_id_strips_whitespace_runs() {
        assert_eq!(construct_id(3, "Color Contrast"), "no3titleColorContrast");
        assert_eq!(
            construct_id(7, "  Obesity \t Management\nfor Treatment "),
            "no7titleObesityManagementforTreatment"
        );
    }

    #[test]
    fn construct_id_is_stable_across_calls() {
        let first = construct_id(12, "Children and Adolescents");
        let second = construct_id(12, "Children and Adolescents");
        assert_eq!(first, second);
    }

    #[test]
    fn accordion_wires_header_to_collapse_body() {
        let markup = render_accordion(&single_chapter_document());
        let id = "no3titleComprehensiveMedicalEvaluation";

        assert!(markup.contains(&format!("id=\"{id}title\"")));
        assert!(markup.contains(&format!("data-target=\"#{id}\"")));
        assert!(markup.contains(&format!("aria-controls=\"{id}\"")));
        assert!(markup.contains(&format!("aria-labelledby=\"{id}title\"")));
        assert!(markup.contains("data-parent=\"#accordion\""));
    }

    #[test]
    fn accordion_escapes_recommendation_content() {
        let markup = render_accordion(&single_chapter_document());
        assert!(markup.contains("Review &lt;immunization&gt; status &amp; history"));
        assert!(!markup.contains("<immunization>"));
    }

    #[test]
    fn accordion_maps_grades_to_list_classes() {
        let markup = render_accordion(&single_chapter_document());
        assert!(markup.contains("list-group-item list-group-item-warning"));
        // Unknown grades render with the neutral fallback class.
        assert!(markup.contains("list-group-item list-group-item-secondary"));
    }

    #[test]
    fn accordion_of_empty_document_is_empty() {
        let document = GuidelineDocument { chapters: vec![] };
        assert_eq!(render_accordion(&document), "");
    }

    #[test]
    fn page_embeds_accordion_and_search_chrome() {
        let page = render_page(&single_chapter_document(), "ADA Guidelines");
        assert!(page.contains("<title>ADA Guidelines</title>"));
        assert!(page.contains("id=\"search-input\""));
        assert!(page.contains("id=\"clear-button\""));
        assert!(page.contains("<div id=\"accordion\">"));
        assert!(page.contains("no3titleComprehensiveMedicalEvaluation"));
    }
}
