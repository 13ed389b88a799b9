use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notekeep")]
#[command(about = "Local notes, listed by how recently you touched them")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    /// Defaults to `list` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Notes database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a note
    New(NewArgs),
    /// List notes in date sections, optionally filtered by a search
    List(ListArgs),
    /// Show one note
    Show(IdArgs),
    /// Change a note's title or content
    Edit(EditArgs),
    /// Delete a note
    Delete(IdArgs),
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub content: Option<String>,
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Case-insensitive text to look for in titles and contents
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// Print sections as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct IdArgs {
    /// Full note id or a unique prefix of it
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Full note id or a unique prefix of it
    pub id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub content: Option<String>,
}
