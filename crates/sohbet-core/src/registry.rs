//! Static bot persona registry.
//!
//! Personas are configuration, not data: they are assembled once at
//! startup and never mutated. Each persona pins an upstream prompt
//! (id + version) and carries the localized strings its chat page
//! renders.

use std::collections::HashMap;

use sohbet_types::bot::{BotPersona, BotUiStrings, Locale, PromptRef};

/// Read-only mapping from bot id to persona configuration.
#[derive(Debug, Clone)]
pub struct BotRegistry {
    bots: HashMap<String, BotPersona>,
}

impl BotRegistry {
    /// The built-in persona set.
    pub fn builtin() -> Self {
        Self::from_personas([meliksah(), cihan()])
    }

    /// Build a registry from an explicit persona list.
    pub fn from_personas(personas: impl IntoIterator<Item = BotPersona>) -> Self {
        let bots = personas
            .into_iter()
            .map(|bot| (bot.id.clone(), bot))
            .collect();
        Self { bots }
    }

    /// Look up a persona by id.
    pub fn get(&self, bot_id: &str) -> Option<&BotPersona> {
        self.bots.get(bot_id)
    }

    /// Whether a persona with this id exists.
    pub fn contains(&self, bot_id: &str) -> bool {
        self.bots.contains_key(bot_id)
    }

    /// Ids of all registered personas.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.bots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

fn meliksah() -> BotPersona {
    BotPersona {
        id: "meliksah".to_string(),
        name: "Meliksah için Asistan".to_string(),
        short_name: "Asistan".to_string(),
        icon: "🧠".to_string(),
        accent_color: "#10a37f".to_string(),
        locale: Locale::Turkish,
        prompt: Some(PromptRef {
            id: "pmpt_6957e6ae66088195af2b5053af22c7ae0f5f0db59da0747b".to_string(),
            version: "18".to_string(),
        }),
        ui: BotUiStrings {
            welcome_title: "Merhaba Meliksah! 👋".to_string(),
            welcome_text: "Bugün sana nasıl yardımcı olabilirim? Aklındaki her şeyi benimle paylaşabilirsin.".to_string(),
            input_placeholder: "Mesajını yaz...".to_string(),
            input_hint: "Göndermek için Enter, yeni satır için Shift+Enter".to_string(),
            new_chat_label: "Yeni Sohbet".to_string(),
            today_label: "Bugün".to_string(),
            yesterday_label: "Dün".to_string(),
            previous_label: "Önceki".to_string(),
            empty_state: "Henüz sohbet yok".to_string(),
        },
        suggestions: vec![
            "Son zamanlarda kendimi stresli hissediyorum".to_string(),
            "Biraz sohbet etmek istiyorum".to_string(),
            "Kendimi geliştirmek istiyorum".to_string(),
        ],
    }
}

fn cihan() -> BotPersona {
    BotPersona {
        id: "cihan".to_string(),
        name: "Cihan için Asistan".to_string(),
        short_name: "Asistan".to_string(),
        icon: "🤖".to_string(),
        accent_color: "#6366f1".to_string(),
        locale: Locale::Turkish,
        prompt: Some(PromptRef {
            id: "pmpt_6957fe7589408195b68e4afa711750cb0976d4371a952f32".to_string(),
            version: "6".to_string(),
        }),
        ui: BotUiStrings {
            welcome_title: "Merhaba Cihan! 👋".to_string(),
            welcome_text: "Bugün sana nasıl yardımcı olabilirim? İstediğin her konuda yanındayım.".to_string(),
            input_placeholder: "Mesajını yaz...".to_string(),
            input_hint: "Göndermek için Enter, yeni satır için Shift+Enter".to_string(),
            new_chat_label: "Yeni Sohbet".to_string(),
            today_label: "Bugün".to_string(),
            yesterday_label: "Dün".to_string(),
            previous_label: "Önceki".to_string(),
            empty_state: "Henüz sohbet yok".to_string(),
        },
        suggestions: vec![
            "Bugün nasıl hissediyorum anlatayım".to_string(),
            "Bir konuda tavsiye almak istiyorum".to_string(),
            "Sadece sohbet edelim".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sohbet_types::bot::DEFAULT_BOT_ID;

    #[test]
    fn test_builtin_personas_registered() {
        let registry = BotRegistry::builtin();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("meliksah"));
        assert!(registry.contains("cihan"));
    }

    #[test]
    fn test_default_bot_is_registered() {
        let registry = BotRegistry::builtin();
        assert!(registry.contains(DEFAULT_BOT_ID));
    }

    #[test]
    fn test_unknown_bot_is_none() {
        let registry = BotRegistry::builtin();
        assert!(registry.get("ghost").is_none());
    }

    #[test]
    fn test_builtin_prompts_are_pinned() {
        let registry = BotRegistry::builtin();
        for id in ["meliksah", "cihan"] {
            let prompt = registry.get(id).and_then(|bot| bot.prompt.as_ref());
            let prompt = prompt.unwrap_or_else(|| panic!("{id} should pin a prompt"));
            assert!(prompt.id.starts_with("pmpt_"));
            assert!(!prompt.version.is_empty());
        }
    }

    #[test]
    fn test_personas_are_turkish() {
        let registry = BotRegistry::builtin();
        let bot = registry.get("meliksah").unwrap();
        assert_eq!(bot.locale, Locale::Turkish);
        assert_eq!(bot.ui.new_chat_label, "Yeni Sohbet");
    }
}
