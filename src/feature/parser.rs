//! Feature parser adapters
//!
//! Gherkin grammar is not handled in this crate. [`CommandParser`] runs the
//! cucumber `gherkin` executable and decodes the message stream it prints.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

use super::gherkin::{GherkinFeature, decode_messages};
use crate::config::ParserConfig;
use crate::timeout::with_timeout;
use crate::types::{GherkifyError, Result};

/// Parses one feature file
#[async_trait]
pub trait FeatureParser: Send + Sync {
    /// Parse the file at `path` whose raw text is `source`
    async fn parse(&self, path: &Path, source: &str) -> Result<GherkinFeature>;

    /// Parser name for logging
    fn name(&self) -> &str;
}

pub type SharedParser = Arc<dyn FeatureParser>;

/// Runs an external parser process per file
pub struct CommandParser {
    config: ParserConfig,
}

impl CommandParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    async fn execute(&self, path: &Path) -> Result<String> {
        let file = path.display().to_string();

        debug!(
            "Running parser: {} {} {}",
            self.config.command,
            self.config.args.join(" "),
            file
        );

        let child = Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GherkifyError::parse(
                    &file,
                    format!(
                        "failed to spawn parser '{}': {}. Is it installed?",
                        self.config.command, e
                    ),
                )
            })?;

        let output = with_timeout(
            self.config.timeout(),
            async {
                child
                    .wait_with_output()
                    .await
                    .map_err(|e| GherkifyError::parse(&file, format!("parser failed: {}", e)))
            },
            &format!("parsing {}", file),
        )
        .await
        .map_err(|e| match e {
            GherkifyError::Timeout { duration, .. } => {
                GherkifyError::parse(&file, format!("parser timed out after {:?}", duration))
            }
            other => other,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            // The message stream may still carry a precise parseError
            if let Err(e @ GherkifyError::Parse { .. }) = decode_messages(path, &stdout)
                && !stdout.trim().is_empty()
            {
                return Err(e);
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("parser exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(GherkifyError::parse(&file, message));
        }

        Ok(stdout)
    }
}

#[async_trait]
impl FeatureParser for CommandParser {
    async fn parse(&self, path: &Path, _source: &str) -> Result<GherkinFeature> {
        let stdout = self.execute(path).await?;
        decode_messages(path, &stdout)
    }

    fn name(&self) -> &str {
        &self.config.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_executable_is_parse_error() {
        let parser = CommandParser::new(ParserConfig {
            command: "gherkify-no-such-parser".to_string(),
            ..Default::default()
        });
        let err = parser
            .parse(Path::new("login.feature"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, GherkifyError::Parse { ref path, .. } if path == "login.feature"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_decodes_process_output() {
        let parser = CommandParser::new(ParserConfig {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                r#"echo '{"gherkinDocument":{"feature":{"name":"Echoed","children":[]}}}'"#
                    .to_string(),
                "sh".to_string(),
            ],
            ..Default::default()
        });
        let feature = parser
            .parse(Path::new("echo.feature"), "")
            .await
            .unwrap();
        assert_eq!(feature.name, "Echoed");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_uses_stderr() {
        let parser = CommandParser::new(ParserConfig {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo 'cannot read file' >&2; exit 2".to_string(),
                "sh".to_string(),
            ],
            ..Default::default()
        });
        let err = parser.parse(Path::new("x.feature"), "").await.unwrap_err();
        assert!(
            matches!(err, GherkifyError::Parse { ref message, .. } if message == "cannot read file")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_parse_error() {
        let parser = CommandParser::new(ParserConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "sleep 5".to_string(), "sh".to_string()],
            timeout_secs: 1,
        });
        let err = parser.parse(Path::new("x.feature"), "").await.unwrap_err();
        assert!(
            matches!(err, GherkifyError::Parse { ref message, .. } if message.contains("timed out"))
        );
    }

    #[tokio::test]
    #[ignore = "requires the cucumber gherkin executable"]
    async fn test_parse_real_feature() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("login.feature");
        let source = "Feature: Login\n  Scenario: Ok\n    Given I am on the \"Login\" screen\n";
        std::fs::write(&path, source).unwrap();

        let parser = CommandParser::new(ParserConfig::default());
        let feature = parser.parse(&path, source).await.unwrap();
        assert_eq!(feature.scenarios.len(), 1);
    }
}
