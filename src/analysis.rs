//! Whole-transcript analysis: summarization and translation.
//!
//! Single round trips over the reconciled transcript. No chunking or
//! stitching happens here; the transcript already fits one request.

use crate::error::Result;
use crate::model::ModelClient;
use std::fmt;

/// Summary style applied to a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SummaryMode {
    /// Let the model pick the closest of the other modes.
    #[default]
    Auto,
    Finance,
    Meeting,
    Lecture,
    General,
}

impl SummaryMode {
    fn prompt(self) -> &'static str {
        match self {
            SummaryMode::Auto => {
                "Determine what kind of recording this is (finance, meeting, \
                 lecture, or general) and produce the summary format that fits it best."
            }
            SummaryMode::Finance => {
                "Mode: finance. Produce: a table of mentioned securities \
                 (symbol, stated view), market trends, key figures, and \
                 investment takeaways."
            }
            SummaryMode::Meeting => {
                "Mode: meeting. Produce: purpose, decisions made, action \
                 items (owner, deadline), and the key discussion points."
            }
            SummaryMode::Lecture => {
                "Mode: lecture. Produce: core concepts, a logical outline, \
                 definitions of introduced terms, and likely exam points."
            }
            SummaryMode::General => {
                "Mode: general. Produce: a digest of roughly 300 words, \
                 timeline highlights, and notable quotes."
            }
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryMode::Auto => "auto",
            SummaryMode::Finance => "finance",
            SummaryMode::Meeting => "meeting",
            SummaryMode::Lecture => "lecture",
            SummaryMode::General => "general",
        };
        f.write_str(name)
    }
}

/// Summarize a reconciled transcript in the requested mode.
pub async fn summarize(
    model: &dyn ModelClient,
    transcript: &str,
    mode: SummaryMode,
) -> Result<String> {
    let prompt = format!(
        "Transcript of the recording:\n\"\"\"\n{}\n\"\"\"\n\n{}",
        transcript,
        mode.prompt()
    );
    model.generate(None, &prompt).await
}

/// Translate a transcript or summary into `target_lang`, keeping the
/// existing formatting (timestamps, tables) intact.
pub async fn translate(model: &dyn ModelClient, text: &str, target_lang: &str) -> Result<String> {
    let prompt = format!(
        "Translate the following into {}. Preserve the existing formatting \
         (timestamp markers, Markdown tables, line breaks):\n\n{}",
        target_lang, text
    );
    model.generate(None, &prompt).await
}
