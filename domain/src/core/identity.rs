//! Provider identity value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Stable identity of a debate participant (Value Object)
///
/// An identity names a provider seat on the council, not a concrete model
/// version. Which model answers for a seat is adapter configuration.
///
/// The derived ordering is the roster order, so `BTreeMap<ProviderId, _>`
/// iterates deterministically regardless of response arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderId {
    Gemini,
    OpenAi,
    Claude,
    Grok,
    DeepSeek,
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown provider '{0}', expected one of: gemini, openai, claude, grok, deepseek")]
pub struct UnknownProvider(pub String);

impl ProviderId {
    /// Every identity, in roster order.
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Gemini,
        ProviderId::OpenAi,
        ProviderId::Claude,
        ProviderId::Grok,
        ProviderId::DeepSeek,
    ];

    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::OpenAi => "openai",
            ProviderId::Claude => "claude",
            ProviderId::Grok => "grok",
            ProviderId::DeepSeek => "deepseek",
        }
    }

    /// Human-readable name for headers and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "Gemini",
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Claude => "Claude",
            ProviderId::Grok => "Grok",
            ProviderId::DeepSeek => "DeepSeek",
        }
    }

    /// Built-in debate stance for this identity, used when no persona is
    /// configured. Stances are deliberately adversarial so the council does
    /// not converge on the first plausible answer.
    pub fn default_persona(&self) -> &'static str {
        match self {
            ProviderId::Gemini => {
                "the integrator: argue from ecosystem breadth and operational \
                 experience, and challenge any answer that ignores deployment reality"
            }
            ProviderId::OpenAi => {
                "the product realist: argue from user impact and delivery speed, \
                 and push back on complexity that does not serve the result"
            }
            ProviderId::Claude => {
                "the systems conservative: argue for explicit contracts, \
                 failure-mode analysis, and long-term maintenance cost"
            }
            ProviderId::Grok => {
                "the contrarian: attack the framing of the question itself and \
                 surface the assumptions nobody else is questioning"
            }
            ProviderId::DeepSeek => {
                "the efficiency hawk: argue from resource cost and simplicity, \
                 and treat every added moving part as a liability"
            }
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderId::Gemini),
            "openai" => Ok(ProviderId::OpenAi),
            "claude" => Ok(ProviderId::Claude),
            "grok" => Ok(ProviderId::Grok),
            "deepseek" => Ok(ProviderId::DeepSeek),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

impl Serialize for ProviderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for id in ProviderId::ALL {
            let s = id.to_string();
            let parsed: ProviderId = s.parse().unwrap();
            assert_eq!(id, parsed);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Claude".parse::<ProviderId>().unwrap(), ProviderId::Claude);
        assert_eq!(" GROK ".parse::<ProviderId>().unwrap(), ProviderId::Grok);
    }

    #[test]
    fn test_unknown_provider_fails() {
        let err = "mistral".parse::<ProviderId>().unwrap_err();
        assert!(err.to_string().contains("mistral"));
    }

    #[test]
    fn test_ordering_follows_roster() {
        let mut ids = vec![ProviderId::DeepSeek, ProviderId::Claude, ProviderId::Gemini];
        ids.sort();
        assert_eq!(
            ids,
            vec![ProviderId::Gemini, ProviderId::Claude, ProviderId::DeepSeek]
        );
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ProviderId::DeepSeek).unwrap();
        assert_eq!(json, "\"deepseek\"");
        let back: ProviderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProviderId::DeepSeek);
    }
}
