//! The batch translation interface consumed by the engine.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stylistic register requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formality {
    Default,
    More,
    Less,
    PreferMore,
    PreferLess,
}

impl Formality {
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::More,
        Self::Less,
        Self::PreferMore,
        Self::PreferLess,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::More => "more",
            Self::Less => "less",
            Self::PreferMore => "prefer_more",
            Self::PreferLess => "prefer_less",
        }
    }

    /// Human-readable label used in prompts.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::More => "more (formal)",
            Self::Less => "less (informal)",
            Self::PreferMore => "prefer_more (formal if possible)",
            Self::PreferLess => "prefer_less (informal if possible)",
        }
    }
}

impl fmt::Display for Formality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid formality '{s}'. Use: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                )
            })
    }
}

/// Per-call options. The context applies to every text of the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    pub formality: Option<Formality>,
    pub context: Option<String>,
}

/// Why a provider call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    #[error("authorization failed")]
    Unauthorized,

    #[error("quota exceeded")]
    QuotaExceeded,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("{0}")]
    Other(String),
}

/// A batch text-in/text-out translation service.
///
/// On success the result has exactly one text per input text, in input order.
#[allow(async_fn_in_trait)]
pub trait TranslationProvider {
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        options: &ProviderOptions,
    ) -> Result<Vec<String>, ProviderFailure>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_formality_parse() {
        assert_eq!("more".parse::<Formality>(), Ok(Formality::More));
        assert_eq!("prefer_less".parse::<Formality>(), Ok(Formality::PreferLess));
    }

    #[test]
    fn test_formality_parse_invalid() {
        let err = "formal".parse::<Formality>().unwrap_err();
        assert!(err.contains("default, more, less, prefer_more, prefer_less"));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(ProviderFailure::RateLimited.to_string(), "rate limit exceeded");
        assert_eq!(
            ProviderFailure::Other("timeout".to_string()).to_string(),
            "timeout"
        );
    }
}
