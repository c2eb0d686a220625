//! Translation catalogs keyed by language.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::text::{escape_attribute, escape_html};

/// Language every lookup falls back to.
pub const FALLBACK_LANG: &str = "en";

/// Separator between a context and the source text in catalog keys.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Per-language translation maps with a current language.
///
/// Keys are the source text, or `context` + `\u{4}` + text for
/// disambiguated entries.
///
/// # Examples
///
/// ```
/// use jsu_util::i18n::Catalog;
///
/// let mut catalog = Catalog::new();
/// catalog.add_translations([("Save", "Enregistrer")], Some("fr"));
/// catalog.use_lang("fr");
/// assert_eq!(catalog.translate("Save", None), "Enregistrer");
/// assert_eq!(catalog.translate("Cancel", None), "Cancel");
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    translations: HashMap<String, HashMap<String, String>>,
    current: String,
}

impl Default for Catalog {
    fn default() -> Self { Self::new() }
}

impl Catalog {
    pub fn new() -> Self {
        let mut translations = HashMap::new();
        translations.insert(FALLBACK_LANG.to_string(), HashMap::new());
        Self {
            translations,
            current: FALLBACK_LANG.to_string(),
        }
    }

    pub fn use_lang(&mut self, lang: &str) {
        self.translations.entry(lang.to_string()).or_default();
        self.current = lang.to_string();
    }

    pub fn current_lang(&self) -> &str { &self.current }

    pub fn current_catalog(&self) -> &HashMap<String, String> {
        static EMPTY: OnceLock<HashMap<String, String>> = OnceLock::new();
        self.translations
            .get(&self.current)
            .unwrap_or_else(|| EMPTY.get_or_init(HashMap::new))
    }

    /// Merge entries into `lang` (the current language when `None`).
    ///
    /// Empty translations are ignored so the source text stays in use.
    pub fn add_translations<I, K, V>(&mut self, entries: I, lang: Option<&str>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let lang = lang.filter(|l| !l.is_empty()).unwrap_or(&self.current).to_string();
        let catalog = self.translations.entry(lang).or_default();
        for (text, translated) in entries {
            let translated = translated.into();
            if !translated.is_empty() {
                catalog.insert(text.into(), translated);
            }
        }
    }

    /// Translation of `text` in the current language, then in English, else `text`.
    pub fn translate<'a>(&'a self, text: &'a str, context: Option<&str>) -> &'a str {
        let key = match context.filter(|c| !c.is_empty()) {
            Some(context) => format!("{context}{CONTEXT_SEPARATOR}{text}"),
            None => text.to_string(),
        };
        if let Some(found) = self.lookup(&self.current, &key) {
            return found;
        }
        if self.current != FALLBACK_LANG
            && let Some(found) = self.lookup(FALLBACK_LANG, &key)
        {
            return found;
        }
        text
    }

    /// [`translate`](Self::translate), escaped for HTML content.
    pub fn translate_html(&self, text: &str, context: Option<&str>) -> String {
        escape_html(self.translate(text, context))
    }

    /// [`translate`](Self::translate), escaped for an HTML attribute.
    pub fn translate_attribute(&self, text: &str, context: Option<&str>) -> String {
        escape_attribute(self.translate(text, context))
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.translations.get(lang)?.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_translations(
            [("lang", "en"), ("<p>lang</p>", "<p>en</p>"), ("\"lang", "\"en")],
            Some("en"),
        );
        catalog.add_translations([("lang", "fr"), ("January", "Janvier"), ("at", "à")], Some("fr"));
        catalog
    }

    #[test]
    fn test_english_is_current_by_default() {
        let catalog = catalog();
        assert_eq!(catalog.current_lang(), "en");
        assert_eq!(catalog.current_catalog().len(), 3);
        assert_eq!(catalog.translate("lang", None), "en");
    }

    #[test]
    fn test_translate_html_and_attribute_escape() {
        let catalog = catalog();
        assert_eq!(catalog.translate_html("<p>lang</p>", None), "&lt;p&gt;en&lt;/p&gt;");
        assert_eq!(catalog.translate_attribute("\"lang", None), "&quot;en");
    }

    #[test]
    fn test_switch_language_with_fallback() {
        let mut catalog = catalog();
        catalog.use_lang("fr");
        assert_eq!(catalog.translate("lang", None), "fr");
        assert_eq!(catalog.translate("<p>lang</p>", None), "<p>en</p>");
        assert_eq!(catalog.translate("unknown", None), "unknown");
    }

    #[test]
    fn test_context_keys() {
        let mut catalog = Catalog::new();
        catalog.add_translations([("menu\u{4}Open", "Ouvrir le menu"), ("Open", "Ouvrir")], None);
        assert_eq!(catalog.translate("Open", Some("menu")), "Ouvrir le menu");
        assert_eq!(catalog.translate("Open", None), "Ouvrir");
        assert_eq!(catalog.translate("Open", Some("door")), "Open");
    }

    #[test]
    fn test_empty_translation_is_ignored() {
        let mut catalog = Catalog::new();
        catalog.add_translations([("Save", "")], None);
        assert!(catalog.current_catalog().is_empty());
    }

    #[test]
    fn test_use_lang_creates_empty_catalog() {
        let mut catalog = Catalog::new();
        catalog.use_lang("de");
        assert!(catalog.current_catalog().is_empty());
        assert_eq!(catalog.current_lang(), "de");
    }
}
