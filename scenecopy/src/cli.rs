use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// scenecopy: Copy assets between two avatar scene files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (use multiple times for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log only errors and hide progress messages.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the assets of a scene with their type and group.
    List(ListArgs),
    /// Copy named assets from one scene into another and save the target.
    Copy(CopyArgs),
    /// Open two scenes side by side and copy assets between them interactively.
    Session(SessionArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the scene file.
    #[arg(required = true)]
    pub scene: PathBuf,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Scene to copy assets from. It is never modified.
    pub source: PathBuf,

    /// Scene to copy assets into. Saved only if every asset was copied.
    pub target: PathBuf,

    /// Names of the assets to copy, in order.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Report what would be copied without writing the target.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Scene shown on the left. Can also be loaded from the session menu.
    pub left: Option<PathBuf>,

    /// Scene shown on the right. Can also be loaded from the session menu.
    pub right: Option<PathBuf>,
}
