use std::io::Write;

use anyhow::{Context, Result};
use scenecopy_core::scene::SceneDocument;
use tracing::{info, warn};

use crate::{app, cli::{CopyArgs, ListArgs, SessionArgs}, display::{self, Progress}};

// --- Handler Functions ---

pub async fn handle_list(args: ListArgs) -> Result<()> {
    let doc = SceneDocument::open(&args.scene).await
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    println!("{}", display::heading("Scene", doc.path()));
    print!("{}", display::asset_table(&doc.list_assets()));
    Ok(())
}

pub async fn handle_copy<W: Write>(args: CopyArgs, progress: &mut Progress<W>) -> Result<()> {
    let source = SceneDocument::open(&args.source).await
        .with_context(|| format!("Failed to load source scene {}", args.source.display()))?;
    let mut target = SceneDocument::open(&args.target).await
        .with_context(|| format!("Failed to load target scene {}", args.target.display()))?;

    let mut failed = Vec::new();
    for name in &args.names {
        match source.try_copy_asset(name, &mut target) {
            Ok(copied) => {
                info!(source = %copied.source_name, copy = %copied.name, "Copied asset");
                match &copied.hierarchy {
                    Some(path) => progress.line(format_args!("  Copied: {} -> {} (in {})", copied.source_name, copied.name, path))?,
                    None => progress.line(format_args!("  Copied: {} -> {}", copied.source_name, copied.name))?,
                }
            }
            Err(e) => {
                warn!("{}", e);
                failed.push(name.as_str());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Some assets could not be copied ({}); target not saved.", failed.join(", "));
    }

    if args.dry_run {
        progress.line(format_args!("  Dry run: {} not written.", args.target.display()))?;
        return Ok(());
    }

    target.save().await
        .with_context(|| format!("Failed to save target scene {}", args.target.display()))?;
    progress.line(format_args!("  Saved {}.", args.target.display()))?;
    Ok(())
}

pub async fn handle_session(args: SessionArgs) -> Result<()> {
    app::run_session(args.left, args.right).await
}
