//! Text statistics over raw file bytes.
//!
//! [`analyze`] is a pure function with no failure mode. Bytes that are not valid UTF-8 are
//! decoded lossily (each invalid sequence becomes U+FFFD) so binary uploads still produce
//! numbers instead of errors.
//!
//! Definitions:
//! - **paragraph**: a `\n`-separated line whose trimmed form is non-empty
//! - **word**: a maximal run of non-whitespace characters
//! - **character**: a Unicode code point of the decoded text, whitespace included

use api_shared::pb;
use serde::{Deserialize, Serialize};

/// Paragraph, word and character counts for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub paragraphs: u64,
    pub words: u64,
    pub characters: u64,
}

/// Computes [`AnalysisResult`] for `content`.
pub fn analyze(content: &[u8]) -> AnalysisResult {
    let text = String::from_utf8_lossy(content);

    let paragraphs = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .count();
    let words = text.split_whitespace().count();
    let characters = text.chars().count();

    AnalysisResult {
        paragraphs: paragraphs as u64,
        words: words as u64,
        characters: characters as u64,
    }
}

impl From<AnalysisResult> for pb::AnalyzeFileRes {
    fn from(result: AnalysisResult) -> Self {
        pb::AnalyzeFileRes {
            paragraphs: result.paragraphs,
            words: result.words,
            characters: result.characters,
        }
    }
}

impl From<pb::AnalyzeFileRes> for AnalysisResult {
    fn from(res: pb::AnalyzeFileRes) -> Self {
        AnalysisResult {
            paragraphs: res.paragraphs,
            words: res.words,
            characters: res.characters,
        }
    }
}
