use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "adaguide",
    version,
    about = "Local guideline accordion rendering and search tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Render(RenderArgs),
    Search(SearchArgs),
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[arg(long, default_value = "ADA2018Guidelines.json")]
    pub guidelines: PathBuf,

    /// HTML destination; stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Filter the document with this search term before rendering.
    #[arg(long)]
    pub term: Option<String>,

    #[arg(long, default_value = "Standards of Medical Care")]
    pub page_title: String,

    /// Emit only the accordion markup, without the surrounding page.
    #[arg(long, default_value_t = false)]
    pub fragment: bool,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(long, default_value = "ADA2018Guidelines.json")]
    pub guidelines: PathBuf,

    #[arg(long)]
    pub term: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "ADA2018Guidelines.json")]
    pub guidelines: PathBuf,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}
