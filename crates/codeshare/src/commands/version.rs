//! Version command

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::cli::VersionArgs;

/// Build metadata baked in by build.rs
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: Option<&'static str>,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_SHA"),
            build_date: option_env!("BUILD_DATE"),
            target: option_env!("TARGET"),
        }
    }
}

/// One line: `codeshare 0.3.0 (abc1234) x86_64-unknown-linux-gnu`
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        if let Some(commit) = self.commit {
            write!(f, " ({})", commit)?;
        }
        if let Some(target) = self.target {
            write!(f, " {}", target)?;
        }
        Ok(())
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = BuildInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info);
    if let Some(date) = info.build_date {
        println!("Built {}", date);
    }
    Ok(())
}
