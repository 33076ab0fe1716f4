//! Bot persona and XP types for Sohbet.
//!
//! A persona is a static configuration record: an upstream prompt
//! reference plus the localized UI text the web client renders. Personas
//! are loaded once at startup and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Persona used when a request does not name one.
pub const DEFAULT_BOT_ID: &str = "meliksah";

/// UI language of a bot persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "tr")]
    Turkish,
    #[serde(rename = "en")]
    English,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Turkish => write!(f, "tr"),
            Locale::English => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tr" => Ok(Locale::Turkish),
            "en" => Ok(Locale::English),
            other => Err(format!("invalid locale: '{other}'")),
        }
    }
}

/// Reference to a prompt stored on the completion service.
///
/// The prompt body lives upstream; conversations only carry this pin
/// (id + version) so persona behavior can be revised without a deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRef {
    pub id: String,
    pub version: String,
}

/// Localized strings the web client renders for one persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotUiStrings {
    pub welcome_title: String,
    pub welcome_text: String,
    pub input_placeholder: String,
    pub input_hint: String,
    pub new_chat_label: String,
    pub today_label: String,
    pub yesterday_label: String,
    pub previous_label: String,
    pub empty_state: String,
}

/// A bot persona: one named configuration of the shared chat engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotPersona {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub icon: String,
    /// CSS accent color, e.g. `#10a37f`.
    pub accent_color: String,
    pub locale: Locale,
    /// Upstream prompt pin. `None` means the persona exists in the UI but
    /// cannot chat yet; the orchestrator rejects it with a config error.
    pub prompt: Option<PromptRef>,
    pub ui: BotUiStrings,
    /// Conversation starters shown on the empty state.
    pub suggestions: Vec<String>,
}

/// Experience points accumulated for a bot persona.
///
/// Peripheral to chat itself: the client reports point grants and renders
/// the level. Level is fully derived from points, never stored
/// independently of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpRecord {
    pub bot_id: String,
    pub xp: i64,
    pub level: i64,
    /// `None` until the first grant is recorded.
    pub updated_at: Option<DateTime<Utc>>,
}

impl XpRecord {
    /// Level reached at a given point total: 100 points per level,
    /// starting at level 1.
    pub fn level_for(xp: i64) -> i64 {
        1 + xp / 100
    }

    /// The record returned for a bot that has never been granted points.
    pub fn fresh(bot_id: impl Into<String>) -> Self {
        Self {
            bot_id: bot_id.into(),
            xp: 0,
            level: 1,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_roundtrip() {
        for locale in [Locale::Turkish, Locale::English] {
            let s = locale.to_string();
            let parsed: Locale = s.parse().unwrap();
            assert_eq!(locale, parsed);
        }
    }

    #[test]
    fn test_locale_serde() {
        let json = serde_json::to_string(&Locale::Turkish).unwrap();
        assert_eq!(json, "\"tr\"");
        let parsed: Locale = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Locale::Turkish);
    }

    #[test]
    fn test_level_for_boundaries() {
        assert_eq!(XpRecord::level_for(0), 1);
        assert_eq!(XpRecord::level_for(99), 1);
        assert_eq!(XpRecord::level_for(100), 2);
        assert_eq!(XpRecord::level_for(250), 3);
    }

    #[test]
    fn test_fresh_record() {
        let record = XpRecord::fresh("meliksah");
        assert_eq!(record.bot_id, "meliksah");
        assert_eq!(record.xp, 0);
        assert_eq!(record.level, 1);
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_persona_serialize() {
        let persona = BotPersona {
            id: "meliksah".to_string(),
            name: "Asistan".to_string(),
            short_name: "Asistan".to_string(),
            icon: "🧠".to_string(),
            accent_color: "#10a37f".to_string(),
            locale: Locale::Turkish,
            prompt: Some(PromptRef {
                id: "pmpt_123".to_string(),
                version: "1".to_string(),
            }),
            ui: BotUiStrings {
                welcome_title: "Merhaba!".to_string(),
                welcome_text: "Hoş geldin.".to_string(),
                input_placeholder: "Mesajını yaz...".to_string(),
                input_hint: "Enter ile gönder".to_string(),
                new_chat_label: "Yeni Sohbet".to_string(),
                today_label: "Bugün".to_string(),
                yesterday_label: "Dün".to_string(),
                previous_label: "Önceki".to_string(),
                empty_state: "Henüz sohbet yok".to_string(),
            },
            suggestions: vec!["Bana bir şey öner".to_string()],
        };
        let json = serde_json::to_string(&persona).unwrap();
        assert!(json.contains("\"locale\":\"tr\""));
        assert!(json.contains("#10a37f"));
    }
}
