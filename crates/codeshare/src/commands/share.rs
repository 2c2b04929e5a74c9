//! Share command

use anyhow::{Context, Result};
use camino::Utf8Path;
use codeshare_core::TextBuffer;
use std::io::Read;
use std::sync::Arc;

use crate::cli::ShareArgs;
use crate::output;

pub async fn run(args: ShareArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let code = read_source(args.file.as_deref())?;
    let language = args
        .language
        .unwrap_or_else(|| config.editor.language.clone());

    let session = super::open_session(&config)?;
    session
        .editor()
        .install(Arc::new(TextBuffer::new(code, language)));

    let spinner = output::spinner("Saving...");
    let result = session.share_code().await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }

    let link = session
        .share_link()?
        .context("Shared snippet has no identifier")?;
    output::success("Code shared");
    println!("{}", link);

    Ok(())
}

fn read_source(file: Option<&Utf8Path>) -> Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read stdin")?;
            Ok(code)
        }
    }
}
