use std::path::PathBuf;

use anyhow::Result;
use console::style;
use scenecopy_core::session::{CopyReport, Session, SessionError, Side};
use tracing::{error, info};

use crate::display;

mod prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Load(Side),
    Copy(Side),
    Show,
    Quit,
}

const ACTIONS: [(Action, &str); 6] = [
    (Action::Load(Side::Left), "Load left scene"),
    (Action::Load(Side::Right), "Load right scene"),
    (Action::Copy(Side::Left), "Copy →"),
    (Action::Copy(Side::Right), "← Copy"),
    (Action::Show, "Show scenes"),
    (Action::Quit, "Quit"),
];

/// Runs the interactive two-pane session until the user quits.
pub async fn run_session(left: Option<PathBuf>, right: Option<PathBuf>) -> Result<()> {
    let mut session = Session::new();
    for (side, path) in [(Side::Left, left), (Side::Right, right)] {
        if let Some(path) = path {
            load(&mut session, side, path).await;
        }
    }
    show(&session);

    loop {
        let labels = ACTIONS.iter().map(|(_, label)| label.to_string()).collect();
        let index = prompt::select("Action".to_string(), labels).await?;
        match ACTIONS[index].0 {
            Action::Load(side) => {
                let path = prompt::path(format!("Path to the {} scene", side)).await?;
                load(&mut session, side, path).await;
                show(&session);
            }
            Action::Copy(from) => {
                copy(&mut session, from).await?;
            }
            Action::Show => show(&session),
            Action::Quit => break,
        }
    }
    Ok(())
}

async fn load(session: &mut Session, side: Side, path: PathBuf) {
    match session.load(side, &path).await {
        Ok(()) => info!(%side, path = %path.display(), "Scene loaded"),
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            println!("{} {}", style("Error:").red().bold(), e);
        }
    }
}

async fn copy(session: &mut Session, from: Side) -> Result<()> {
    let to = from.opposite();
    let (Some(source), Some(_)) = (session.document(from), session.document(to)) else {
        println!("{} Please load both scenes first.", style("Warning:").yellow().bold());
        return Ok(());
    };

    let entries = source.list_assets();
    if entries.is_empty() {
        println!("The {} scene has no assets.", from);
        return Ok(());
    }
    let labels = entries.iter().map(display::asset_label).collect();
    let checked = entries.iter().map(|e| session.selection(from).contains(&e.id)).collect();

    let chosen = prompt::multi_select(format!("Assets to copy to the {} scene", to), labels, checked).await?;
    session.clear_selection(from);
    for index in chosen {
        session.toggle(from, &entries[index].id);
    }

    match session.copy_selected(from).await {
        Ok(report) => print_report(&report),
        Err(SessionError::NothingSelected(_)) => println!("No assets selected."),
        Err(e) => {
            error!("Copy failed: {}", e);
            println!("{} {}", style("Error:").red().bold(), e);
        }
    }
    show(session);
    Ok(())
}

fn print_report(report: &CopyReport) {
    for copied in &report.copied {
        println!("  Copied: {} -> {}", copied.source_name, copied.name);
    }
    if report.is_success() {
        println!("{}", style("Assets copied successfully.").green());
    } else {
        println!("{} Some assets could not be copied; the target was not saved.", style("Error:").red().bold());
    }
}

fn show(session: &Session) {
    for (side, title) in [(Side::Left, "Source scene (left)"), (Side::Right, "Target scene (right)")] {
        let document = session.document(side);
        println!();
        println!("{}", display::heading(title, document.and_then(|doc| doc.path())));
        if let Some(document) = document {
            print!("{}", display::asset_table(&document.list_assets()));
        }
    }
    println!();
}
