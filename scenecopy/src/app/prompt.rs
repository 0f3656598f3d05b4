use std::path::PathBuf;

use anyhow::Context;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};

// dialoguer blocks on the terminal, so every prompt runs on the blocking pool.

pub async fn select(prompt: String, items: Vec<String>) -> anyhow::Result<usize> {
    let result = tokio::task::spawn_blocking(move || {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()
            .context("Failed to read selection")
    }).await;

    let index = result.context("Blocking task failed (panic)")??;
    Ok(index)
}

/// Returns the indices of the checked items.
pub async fn multi_select(prompt: String, items: Vec<String>, checked: Vec<bool>) -> anyhow::Result<Vec<usize>> {
    let result = tokio::task::spawn_blocking(move || {
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&items)
            .defaults(&checked)
            .interact()
            .context("Failed to read selection")
    }).await;

    let indices = result.context("Blocking task failed (panic)")??;
    Ok(indices)
}

pub async fn path(prompt: String) -> anyhow::Result<PathBuf> {
    let result = tokio::task::spawn_blocking(move || {
        let input: Result<String, _> = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()
            .context("Failed to read path");
        input
    }).await;

    let input = result.context("Blocking task failed (panic)")??;
    Ok(PathBuf::from(input.trim()))
}
