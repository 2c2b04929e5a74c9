//! Load command

use anyhow::{Context, Result};
use camino::Utf8Path;
use codeshare_core::{Editor, SnippetId, TextBuffer};
use std::sync::Arc;

use crate::cli::LoadArgs;
use crate::output;

pub async fn run(args: LoadArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let id = SnippetId::from_link_or_id(&args.snippet)?;

    let session = super::open_session(&config)?;
    let buffer = Arc::new(TextBuffer::from_config(&config.editor));
    session.editor().install(buffer.clone());

    let spinner = output::spinner("Loading...");
    let result = session.load_shared_code(&id).await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }

    let code = buffer.value();
    match args.output {
        Some(path) => {
            std::fs::write(&path, &code).with_context(|| format!("Failed to write {}", path))?;
            output::success(&format!("Loaded {} into {}", id, path));
        }
        None => print!("{}", code),
    }

    Ok(())
}
