//! Language code lookups used when building prompts.
//!
//! Codes follow the host application's convention (`zh_cn`, `pt_br`, `auto`, ...).
//! Both lookups normalize the code first, so `zh-CN`, `ZH_cn` and `zh cn` are the same.

/// Notation used for any language without a dedicated phonetic system
pub const DEFAULT_NOTATION: &str = "IPA";

/// Human-readable language name.
///
/// Returns `None` for an empty code or `auto`. Unregistered codes come back verbatim,
/// exactly as the caller passed them.
pub fn name_of(code: &str) -> Option<String> {
    let normalized = normalize(code)?;
    let name = match normalized.as_str() {
        "zh_cn" => "Simplified Chinese",
        "zh_tw" => "Traditional Chinese",
        "yue" => "Cantonese",
        "en" => "English",
        "ja" => "Japanese",
        "ko" => "Korean",
        "fr" => "French",
        "es" => "Spanish",
        "ru" => "Russian",
        "de" => "German",
        "it" => "Italian",
        "tr" => "Turkish",
        "pt_pt" => "Portuguese",
        "pt_br" => "Brazilian Portuguese",
        "vi" => "Vietnamese",
        "id" => "Indonesian",
        "th" => "Thai",
        "ms" => "Malay",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "mn_cy" => "Mongolian (Cyrillic)",
        "mn_mo" => "Traditional Mongolian",
        "km" => "Khmer",
        "nb_no" => "Norwegian Bokmål",
        "nn_no" => "Norwegian Nynorsk",
        "fa" => "Persian",
        "sv" => "Swedish",
        "pl" => "Polish",
        "nl" => "Dutch",
        "uk" => "Ukrainian",
        "he" => "Hebrew",
        _ => return Some(code.to_string()),
    };
    Some(name.to_string())
}

/// Phonetic notation system for a language.
///
/// Returns `None` for an empty code or `auto`; every unregistered language falls back
/// to [`DEFAULT_NOTATION`].
pub fn notation_of(code: &str) -> Option<String> {
    let normalized = normalize(code)?;
    let notation = match normalized.as_str() {
        "zh_cn" => "Hanyu Pinyin with tone marks",
        "zh_tw" => "Zhuyin (Bopomofo)",
        "yue" => "Jyutping",
        "ja" => "Hepburn Romaji",
        "ko" => "Revised Romanization of Korean",
        "th" => "Royal Thai General System of Transcription",
        "hi" => "IAST",
        _ => DEFAULT_NOTATION,
    };
    Some(notation.to_string())
}

fn normalize(code: &str) -> Option<String> {
    let normalized = code
        .trim()
        .to_lowercase()
        .replace(['-', ' '], "_");
    if normalized.is_empty() || normalized == "auto" {
        None
    } else {
        Some(normalized)
    }
}
