//! Config command

use anyhow::Result;
use camino::Utf8Path;
use codeshare_core::RuntimeConfig;

use crate::cli::{ConfigCommands, ConfigShowArgs};
use crate::output;

const REDACTED: &str = "********";

pub fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = redact(super::load_config(config_path)?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        output::header("Runtime configuration");
        print!("{}", serde_yaml_ng::to_string(&config)?);
    }

    Ok(())
}

/// Hide the API key from printed output
fn redact(mut config: RuntimeConfig) -> RuntimeConfig {
    if config.backend.api_key.is_some() {
        config.backend.api_key = Some(REDACTED.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_api_key() {
        let mut config = RuntimeConfig::default();
        config.backend.api_key = Some("secret-anon-key".to_string());

        let shown = serde_yaml_ng::to_string(&redact(config)).unwrap();
        assert!(!shown.contains("secret-anon-key"));
        assert!(shown.contains(REDACTED));
    }

    #[test]
    fn test_redact_keeps_missing_key() {
        let config = redact(RuntimeConfig::default());
        assert_eq!(config.backend.api_key, None);
    }
}
