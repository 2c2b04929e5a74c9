//! Link command

use anyhow::Result;
use camino::Utf8Path;
use codeshare_core::{ShareLink, SnippetId};

use crate::cli::LinkArgs;

pub fn run(args: LinkArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let link = ShareLink::new(&config.share.origin, SnippetId::new(args.id)?)?;
    println!("{}", link);
    Ok(())
}
