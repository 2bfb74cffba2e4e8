use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::SearchArgs;
use crate::filter::filter_document;
use crate::model::{GuidelineDocument, RenderCounts, SearchResponse, load_document};

pub fn run(args: SearchArgs) -> Result<()> {
    let document = load_document(&args.guidelines)?;
    let filtered = filter_document(&document, &args.term);

    info!(
        term = %args.term,
        retained_chapters = filtered.chapter_count(),
        total_chapters = document.chapter_count(),
        "search complete"
    );

    if args.json {
        write_json_response(&args.term, &document, filtered)
    } else {
        write_text_response(&args.term, &document, &filtered)
    }
}

fn write_json_response(
    term: &str,
    source: &GuidelineDocument,
    filtered: GuidelineDocument,
) -> Result<()> {
    let response = SearchResponse {
        term: term.to_string(),
        source_counts: RenderCounts::of(source),
        retained_counts: RenderCounts::of(&filtered),
        document: filtered,
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, &response)
        .context("failed to serialize search json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_response(
    term: &str,
    source: &GuidelineDocument,
    filtered: &GuidelineDocument,
) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Term: {term}")?;
    writeln!(
        output,
        "Chapters: {}/{}  Groups: {}/{}  Recommendations: {}/{}",
        filtered.chapter_count(),
        source.chapter_count(),
        filtered.group_count(),
        source.group_count(),
        filtered.recommendation_count(),
        source.recommendation_count(),
    )?;

    for chapter in &filtered.chapters {
        writeln!(
            output,
            "{}. {}",
            chapter.chapter_number, chapter.chapter_title
        )?;

        for group in &chapter.recommendation_groups {
            writeln!(output, "\t{}", group.title)?;

            for recommendation in &group.recommendations {
                writeln!(
                    output,
                    "\t[{}] {}",
                    recommendation.grade.as_str(),
                    recommendation.content
                )?;
            }
        }
    }

    output.flush()?;
    Ok(())
}
