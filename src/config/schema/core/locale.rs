use super::Config;

const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh"];

/// Normalise `"zh_CN.UTF-8"` -> `"zh"`, `"en_US"` -> `"en"`, passthrough `"zh"`.
fn normalise_locale(raw: &str) -> String {
    let base = raw.split('.').next().unwrap_or(raw);
    let lang = base.split(['_', '-']).next().unwrap_or(base);
    lang.trim().to_lowercase()
}

/// Pick the reply language: `ASTERONIRIS_LANG` env -> config value -> `"en"`.
///
/// Replies go to chat users rather than the operator, so the system `LANG`
/// of the bot host is not consulted.
fn detect_locale(config_locale: &str) -> String {
    let candidate = std::env::var("ASTERONIRIS_LANG")
        .ok()
        .map(|lang| normalise_locale(&lang))
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| normalise_locale(config_locale));

    if SUPPORTED_LOCALES.contains(&candidate.as_str()) {
        candidate
    } else {
        "en".into()
    }
}

impl Config {
    /// Resolve the reply locale, then set `rust_i18n::set_locale`.
    pub fn apply_locale(&self) {
        let locale = detect_locale(&self.locale);
        rust_i18n::set_locale(&locale);
    }
}
