//! Conversation summary templates and title extraction.
//!
//! A summary is requested with a fixed, locale-selected system
//! instruction that demands exactly three single-sentence sections in a
//! markdown-bold-labeled format. The summary section doubles as a
//! conversation title when it can be extracted.

use sohbet_types::bot::Locale;

/// System instruction for Turkish-locale summaries.
const TURKISH_SUMMARY_INSTRUCTIONS: &str = r#"Sen bir sohbet arşivcisisin. Sana verilen konuşmayı incele ve TAM OLARAK üç bölümden oluşan bir değerlendirme yaz. Her bölüm tek bir cümle olmalı ve kalın etiketle başlamalı:

**Özet:** konuşmanın ana konusunu tek cümleyle özetle.
**Aksiyon:** kullanıcının atabileceği tek bir somut adımı öner.
**Not:** gelecekteki sohbetlerde hatırlanması gereken tek bir gözlemi yaz.

Bu üç bölümün dışında hiçbir şey yazma."#;

/// System instruction for English-locale summaries.
const ENGLISH_SUMMARY_INSTRUCTIONS: &str = r#"You are a conversation archivist. Review the conversation you are given and write an assessment of EXACTLY three sections. Each section must be a single sentence and start with a bold label:

**Summary:** one sentence capturing the main topic of the conversation.
**Action:** one concrete next step the user could take.
**Note:** one observation worth remembering in future conversations.

Write nothing outside these three sections."#;

/// Maximum characters kept when a summary sentence becomes a title.
const TITLE_FROM_SUMMARY_MAX_CHARS: usize = 60;

/// A locale's summary call profile: the system instruction plus the
/// markers used to cut a title out of the response.
#[derive(Debug)]
pub struct SummaryTemplate {
    pub instructions: &'static str,
    /// Bold label that opens the summary section, e.g. `**Özet:**`.
    pub summary_marker: &'static str,
    /// Bold delimiter that opens every section.
    pub section_marker: &'static str,
}

const TURKISH_TEMPLATE: SummaryTemplate = SummaryTemplate {
    instructions: TURKISH_SUMMARY_INSTRUCTIONS,
    summary_marker: "**Özet:**",
    section_marker: "**",
};

const ENGLISH_TEMPLATE: SummaryTemplate = SummaryTemplate {
    instructions: ENGLISH_SUMMARY_INSTRUCTIONS,
    summary_marker: "**Summary:**",
    section_marker: "**",
};

/// Select the summary template for a locale.
pub fn template_for(locale: Locale) -> &'static SummaryTemplate {
    match locale {
        Locale::Turkish => &TURKISH_TEMPLATE,
        Locale::English => &ENGLISH_TEMPLATE,
    }
}

/// Extract a conversation title from a summary response.
///
/// Locates the localized summary marker, takes the text up to the next
/// section marker, collapses whitespace, and truncates to 60 characters.
/// Returns `None` when the marker is absent (the caller leaves the title
/// untouched) or when nothing readable follows it.
pub fn extract_title(summary: &str, template: &SummaryTemplate) -> Option<String> {
    let start = summary.find(template.summary_marker)? + template.summary_marker.len();
    let rest = &summary[start..];
    let section = match rest.find(template.section_marker) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let collapsed = section.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    Some(collapsed.chars().take(TITLE_FROM_SUMMARY_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_template_selected() {
        let template = template_for(Locale::Turkish);
        assert_eq!(template.summary_marker, "**Özet:**");
        assert!(template.instructions.contains("**Aksiyon:**"));
    }

    #[test]
    fn test_extract_title_from_well_formed_summary() {
        let summary = "**Özet:** Kullanıcı iş stresini yönetmenin yollarını sordu.\n**Aksiyon:** Günlük kısa yürüyüşler önerildi.\n**Not:** Kullanıcı akşamları daha gergin.";
        let title = extract_title(summary, template_for(Locale::Turkish)).unwrap();
        assert_eq!(title, "Kullanıcı iş stresini yönetmenin yollarını sordu.");
    }

    #[test]
    fn test_extract_title_marker_absent() {
        let summary = "The model ignored the format and wrote prose.";
        assert!(extract_title(summary, template_for(Locale::Turkish)).is_none());
    }

    #[test]
    fn test_extract_title_collapses_newlines() {
        let summary = "**Summary:** a topic\nspread over\nthree lines **Action:** none";
        let title = extract_title(summary, template_for(Locale::English)).unwrap();
        assert_eq!(title, "a topic spread over three lines");
    }

    #[test]
    fn test_extract_title_truncates_to_sixty_chars() {
        let long_sentence = "k".repeat(90);
        let summary = format!("**Özet:** {long_sentence} **Aksiyon:** yok");
        let title = extract_title(&summary, template_for(Locale::Turkish)).unwrap();
        assert_eq!(title.chars().count(), 60);
        assert!(!title.ends_with("..."));
    }

    #[test]
    fn test_extract_title_empty_section_is_none() {
        let summary = "**Özet:**   \n**Aksiyon:** bir adım";
        assert!(extract_title(summary, template_for(Locale::Turkish)).is_none());
    }

    #[test]
    fn test_extract_title_without_following_section() {
        let summary = "**Summary:** only the one section";
        let title = extract_title(summary, template_for(Locale::English)).unwrap();
        assert_eq!(title, "only the one section");
    }
}
