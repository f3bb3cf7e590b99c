//! Inline-vs-collapsed rendering of log text

use crate::html::escape;

/// Preview length for the live dashboard
pub const LIVE_PREVIEW_CHARS: usize = 600;

/// Preview length for static bundles, which favor smaller payloads
pub const STATIC_PREVIEW_CHARS: usize = 40;

/// Placeholder for missing values
pub const PLACEHOLDER: &str = "-";

/// How one piece of log text is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogBlock {
    /// No text: a dash placeholder
    Empty,
    /// Short enough to show in full
    Inline(String),
    /// Collapsed behind an expand control
    Truncated {
        /// Character count of the full text
        total: usize,
        /// First `preview_len` characters
        preview: String,
        full: String,
    },
}

impl LogBlock {
    /// Decide how to show `text` given a preview length of `preview_len` characters.
    pub fn decide(text: Option<&str>, preview_len: usize) -> Self {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return LogBlock::Empty,
        };
        let total = text.chars().count();
        if total <= preview_len {
            return LogBlock::Inline(text.to_string());
        }
        LogBlock::Truncated {
            total,
            preview: text.chars().take(preview_len).collect(),
            full: text.to_string(),
        }
    }

    /// Markup for this block; all text goes through [`escape`].
    pub fn to_html(&self) -> String {
        match self {
            LogBlock::Empty => format!(r#"<pre class="log empty">{PLACEHOLDER}</pre>"#),
            LogBlock::Inline(text) => format!(r#"<pre class="log">{}</pre>"#, escape(text)),
            LogBlock::Truncated {
                total,
                preview,
                full,
            } => format!(
                concat!(
                    r#"<details class="log"><summary>"#,
                    r#"<span class="log-size">{} chars</span>"#,
                    r#"<span class="log-preview">{}…</span>"#,
                    "</summary><pre>{}</pre></details>"
                ),
                total,
                escape(preview),
                escape(full)
            ),
        }
    }

    /// Plain-text rendering for terminal output
    pub fn to_text(&self) -> String {
        match self {
            LogBlock::Empty => PLACEHOLDER.to_string(),
            LogBlock::Inline(text) => text.clone(),
            LogBlock::Truncated { total, preview, .. } => {
                format!("{preview}… ({total} chars)")
            }
        }
    }
}
