#![forbid(unsafe_code)]

//! Ambiguous-width policy from the environment.
//!
//! East Asian Ambiguous characters (`±`, `α`, box drawing in some fonts) are
//! one cell in most terminals and two in CJK locales. Operations take the
//! choice as a plain `bool`; this module decides what it should be for the
//! current process:
//!
//! 1. `TERMTEXT_CJK_WIDTH` if set to `wide`/`narrow` or a boolean (`1/0`,
//!    `true/false`, `yes/no`, `on/off`).
//! 2. Otherwise the first non-empty `LC_ALL`, `LC_CTYPE` or `LANG`; a
//!    Japanese, Chinese or Korean locale means wide.
//! 3. Otherwise narrow.

use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::ParseWidthPolicyError;

/// Environment variable that forces the ambiguous-width policy.
pub const ENV_CJK_WIDTH: &str = "TERMTEXT_CJK_WIDTH";

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

/// How to count East Asian Ambiguous characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidthPolicy {
    /// Count ambiguous characters as 2 cells.
    pub ambiguous_is_wide: bool,
}

impl WidthPolicy {
    pub const NARROW: Self = Self {
        ambiguous_is_wide: false,
    };
    pub const WIDE: Self = Self {
        ambiguous_is_wide: true,
    };

    /// Detect the policy from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Detect the policy using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = get_env(ENV_CJK_WIDTH) {
            if let Ok(policy) = value.parse::<Self>() {
                tracing::debug!(
                    source = ENV_CJK_WIDTH,
                    ambiguous_is_wide = policy.ambiguous_is_wide,
                    "resolved width policy"
                );
                return policy;
            }
            tracing::debug!(value = %value, "ignoring unrecognized {ENV_CJK_WIDTH}");
        }

        for key in LOCALE_VARS {
            if let Some(locale) = get_env(key)
                && !locale.trim().is_empty()
            {
                let wide = is_cjk_locale(&locale);
                tracing::debug!(
                    source = key,
                    locale = %locale,
                    ambiguous_is_wide = wide,
                    "resolved width policy"
                );
                return Self {
                    ambiguous_is_wide: wide,
                };
            }
        }

        Self::NARROW
    }

    /// Process-wide policy, detected once on first use.
    #[must_use]
    pub fn global() -> Self {
        static POLICY: OnceLock<WidthPolicy> = OnceLock::new();
        *POLICY.get_or_init(Self::detect)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        if self.ambiguous_is_wide {
            "wide"
        } else {
            "narrow"
        }
    }
}

impl FromStr for WidthPolicy {
    type Err = ParseWidthPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "" => Err(ParseWidthPolicyError::Empty),
            "narrow" => Ok(Self::NARROW),
            "wide" | "cjk" => Ok(Self::WIDE),
            other => parse_bool(other)
                .map(|wide| Self {
                    ambiguous_is_wide: wide,
                })
                .ok_or_else(|| ParseWidthPolicyError::Unknown {
                    value: s.to_owned(),
                }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn is_cjk_locale(locale: &str) -> bool {
    let lower = locale.trim().to_ascii_lowercase();
    lower.starts_with("ja") || lower.starts_with("zh") || lower.starts_with("ko")
}
