use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::RenderArgs;
use crate::filter::filter_document;
use crate::model::{RenderCounts, RenderManifest, load_document};
use crate::render::{render_accordion, render_page};
use crate::util::{now_utc_string, sha256_file, write_json_pretty, write_text_file};

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: RenderArgs) -> Result<()> {
    let document = load_document(&args.guidelines)?;
    let source_counts = RenderCounts::of(&document);

    let rendered_document = match args.term.as_deref() {
        Some(term) => {
            let filtered = filter_document(&document, term);
            info!(
                term,
                retained_chapters = filtered.chapter_count(),
                total_chapters = document.chapter_count(),
                "applied search filter"
            );
            filtered
        }
        None => document,
    };
    let rendered_counts = RenderCounts::of(&rendered_document);

    let markup = if args.fragment {
        render_accordion(&rendered_document)
    } else {
        render_page(&rendered_document, &args.page_title)
    };

    match &args.output {
        Some(path) => {
            write_text_file(path, &markup)?;
            info!(path = %path.display(), bytes = markup.len(), "wrote rendered guidelines");
        }
        None => {
            let mut output = io::BufWriter::new(io::stdout().lock());
            output
                .write_all(markup.as_bytes())
                .context("failed to write markup to stdout")?;
            output.flush()?;
        }
    }

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = RenderManifest {
            manifest_version: MANIFEST_VERSION,
            generated_at: now_utc_string(),
            source_path: args.guidelines.display().to_string(),
            source_sha256: sha256_file(&args.guidelines)?,
            search_term: args.term.clone(),
            source_counts,
            rendered_counts,
            output_path: args.output.as_ref().map(|path| path.display().to_string()),
        };

        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote render manifest");
    }

    Ok(())
}
