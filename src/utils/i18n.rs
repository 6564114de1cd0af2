/// Locales shipped in `locales/`
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "ko"];

/// Whether a locale has a translation file
pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Set the process-wide locale for user-facing messages
pub fn set_locale(locale: &str) {
    if is_supported(locale) {
        rust_i18n::set_locale(locale);
    } else {
        rust_i18n::set_locale("en");
    }
}

/// Localised short weekday name, index 0 = Sunday
pub fn weekday_short(index: u32) -> String {
    match index {
        0 => t!("day_short_sunday").to_string(),
        1 => t!("day_short_monday").to_string(),
        2 => t!("day_short_tuesday").to_string(),
        3 => t!("day_short_wednesday").to_string(),
        4 => t!("day_short_thursday").to_string(),
        5 => t!("day_short_friday").to_string(),
        _ => t!("day_short_saturday").to_string(),
    }
}
