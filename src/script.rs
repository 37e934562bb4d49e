//! Scripted page interactions
//!
//! Steps like `open:settings` or `wait:2000`, run in order against a
//! `UiHelper`. Used by the command-line driver.

use crate::copy::CopyOutcome;
use crate::helper::UiHelper;
use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// One scripted interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open(String),
    Close(String),
    Click(String),
    Copy(String),
    Wait(Duration),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepParseError {
    #[error("Expected <action>:<argument>, got {0:?}")]
    MissingArgument(String),

    #[error("Unknown action {0:?} (expected open, close, click, copy or wait)")]
    UnknownAction(String),

    #[error("Invalid wait duration {0:?}, expected milliseconds")]
    InvalidDuration(String),
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((action, arg)) = s.split_once(':') else {
            return Err(StepParseError::MissingArgument(s.to_string()));
        };
        if arg.is_empty() {
            return Err(StepParseError::MissingArgument(s.to_string()));
        }

        let arg = arg.to_string();
        match action {
            "open" => Ok(Step::Open(arg)),
            "close" => Ok(Step::Close(arg)),
            "click" => Ok(Step::Click(arg)),
            "copy" => Ok(Step::Copy(arg)),
            "wait" => arg
                .parse()
                .map(|ms| Step::Wait(Duration::from_millis(ms)))
                .map_err(|_| StepParseError::InvalidDuration(arg)),
            other => Err(StepParseError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Open(id) => write!(f, "open:{}", id),
            Step::Close(id) => write!(f, "close:{}", id),
            Step::Click(id) => write!(f, "click:{}", id),
            Step::Copy(id) => write!(f, "copy:{}", id),
            Step::Wait(d) => write!(f, "wait:{}", d.as_millis()),
        }
    }
}

/// Run steps in order
///
/// `copy` waits for the clipboard write to settle (not for the feedback
/// restore) before moving on. A missing copy source stops the script.
pub async fn run_steps(helper: &UiHelper, steps: &[Step]) -> Result<Vec<CopyOutcome>> {
    let mut outcomes = Vec::new();

    for step in steps {
        tracing::debug!(%step, "Running step");
        match step {
            Step::Open(id) => {
                helper.open_modal(id);
            }
            Step::Close(id) => {
                helper.close_modal(id);
            }
            Step::Click(id) => {
                helper.click_id(id);
            }
            Step::Copy(id) => {
                let outcome = helper.copy_to_clipboard(id)?.outcome().await?;
                outcomes.push(outcome);
            }
            Step::Wait(duration) => tokio::time::sleep(*duration).await,
        }
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::Config;
    use crate::document::{lock, Document};
    use std::sync::Arc;

    fn steps(raw: &[&str]) -> Vec<Step> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_parse_steps() {
        assert_eq!(
            steps(&["open:settings", "wait:250", "copy:api-key"]),
            vec![
                Step::Open("settings".into()),
                Step::Wait(Duration::from_millis(250)),
                Step::Copy("api-key".into()),
            ]
        );
        // Ids may contain colons
        assert_eq!(
            "click:ns:backdrop".parse::<Step>().unwrap(),
            Step::Click("ns:backdrop".into())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "open".parse::<Step>(),
            Err(StepParseError::MissingArgument("open".into()))
        );
        assert_eq!(
            "close:".parse::<Step>(),
            Err(StepParseError::MissingArgument("close:".into()))
        );
        assert_eq!(
            "toggle:x".parse::<Step>(),
            Err(StepParseError::UnknownAction("toggle".into()))
        );
        assert_eq!(
            "wait:soon".parse::<Step>(),
            Err(StepParseError::InvalidDuration("soon".into()))
        );
    }

    #[test]
    fn test_display_matches_parse_input() {
        for raw in ["open:a", "close:b", "click:c", "copy:d", "wait:2000"] {
            assert_eq!(raw.parse::<Step>().unwrap().to_string(), raw);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_steps_against_page() {
        let mut doc = Document::new();
        let settings = doc.add_element(None, Some("settings"), &["modal-container", "hidden"], "");
        doc.add_element(Some(settings), Some("backdrop"), &["modal-overlay"], "");
        doc.add_element(None, Some("api-key"), &[], "ABC123");
        doc.add_element(None, Some("copy-btn-api-key"), &[], "Copy");
        let clipboard = MemoryClipboard::new();
        let helper = UiHelper::attach(
            doc.into_shared(),
            &Config::default(),
            Arc::new(clipboard.clone()),
        );

        let outcomes = run_steps(
            &helper,
            &steps(&["open:settings", "copy:api-key", "click:backdrop", "wait:2500"]),
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(clipboard.contents().as_deref(), Some("ABC123"));
        let doc = lock(helper.document());
        assert!(doc.has_class(settings, "hidden"));
        assert_eq!(doc.body_overflow(), None);
        let button = doc.get_element_by_id("copy-btn-api-key").unwrap();
        assert_eq!(doc.inner_text(button), "Copy");
    }

    #[tokio::test]
    async fn test_missing_copy_source_stops_script() {
        let helper = UiHelper::attach(
            Document::new().into_shared(),
            &Config::default(),
            Arc::new(MemoryClipboard::new()),
        );
        let err = run_steps(&helper, &steps(&["copy:nothing"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nothing"));
    }
}
