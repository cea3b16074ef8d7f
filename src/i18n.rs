//! Localized strings for user-visible output.
//!
//! A [`Localizer`] is built once from the configured locale and handed to whoever needs
//! it; nothing here is global or mutable.

use serde::{Deserialize, Serialize};

/// The two locales the plugin ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Locale {
    En,
    #[default]
    Zh,
}

impl Locale {
    /// `en` (with any region suffix) selects English, anything else the default locale
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        let lang = code.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Self::En,
            _ => Self::Zh,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.as_str().to_string()
    }
}

/// Key lookup with `{{$1}}`-style positional substitution
#[derive(Debug, Clone, Copy)]
pub struct Localizer {
    locale: Locale,
}

impl Localizer {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Render the template registered under `key`.
    ///
    /// Unknown keys render as the key itself so a missing entry is visible, not fatal.
    pub fn get(&self, key: &str, args: &[&str]) -> String {
        let template = match self.locale {
            Locale::En => english(key),
            Locale::Zh => chinese(key),
        };
        let Some(template) = template else {
            return key.to_string();
        };

        let mut rendered = template.to_string();
        for (index, arg) in args.iter().enumerate() {
            rendered = rendered.replace(&format!("{{{{${}}}}}", index + 1), arg);
        }
        rendered
    }
}

fn english(key: &str) -> Option<&'static str> {
    let text = match key {
        "error_header" => "Translation failed",
        "empty_text" => "Text to translate must not be empty",
        "empty_target" => "Target language must not be empty",
        "unsupported_provider" => "Unsupported provider: {{$1}}",
        "api_key_missing" => "{{$1}} API key is not configured",
        "malformed_response" => "Unexpected API response format",
        "request_failed" => "{{$1}} API request failed: {{$2}}",
        "section" => "{{$1}}:\n{{$2}}",
        "label_standard" => "Standard Translation",
        "label_polished" => "Polished Version",
        "label_colloquial" => "Colloquial Version",
        "label_source" => "Source",
        "label_pronunciation" => "Pronunciation",
        "label_translation" => "Translation",
        "label_translation_pronunciation" => "Translation Pronunciation",
        "label_source_pronunciation" => "Source Pronunciation",
        "polished_not_found" => "Polished version not found",
        "help" => "Available commands (type a command, a space, then your text):\n\
                   (no command), $t   Fluent translation\n\
                   $p                 Standard translation + polished version\n\
                   $f                 Standard translation + colloquial version (feminine voice)\n\
                   $m                 Standard translation + colloquial version (masculine voice)\n\
                   $r                 Pronunciation of the source text\n\
                   $r>                Translation + pronunciation of the translation\n\
                   $r<                Translation + pronunciation of the source\n\
                   $r<>               Translation + both pronunciations\n\
                   $q                 Ask the model directly, no translation prompt\n\
                   ?                  Show this help",
        _ => return None,
    };
    Some(text)
}

fn chinese(key: &str) -> Option<&'static str> {
    let text = match key {
        "error_header" => "翻译失败",
        "empty_text" => "翻译文本不能为空",
        "empty_target" => "目标语言不能为空",
        "unsupported_provider" => "不支持的提供商: {{$1}}",
        "api_key_missing" => "{{$1}} API密钥未配置",
        "malformed_response" => "API响应格式异常",
        "request_failed" => "{{$1}} API请求失败: {{$2}}",
        "section" => "{{$1}}：\n{{$2}}",
        "label_standard" => "标准翻译",
        "label_polished" => "润色版本",
        "label_colloquial" => "口语版本",
        "label_source" => "原文",
        "label_pronunciation" => "发音",
        "label_translation" => "译文",
        "label_translation_pronunciation" => "译文发音",
        "label_source_pronunciation" => "原文发音",
        "polished_not_found" => "未找到润色版本",
        "help" => "可用命令（输入命令、空格，再输入文本）：\n\
                   （无命令）, $t     流畅翻译\n\
                   $p                 标准翻译 + 润色版本\n\
                   $f                 标准翻译 + 口语版本（女性口吻）\n\
                   $m                 标准翻译 + 口语版本（男性口吻）\n\
                   $r                 原文发音\n\
                   $r>                译文 + 译文发音\n\
                   $r<                译文 + 原文发音\n\
                   $r<>               译文 + 两种发音\n\
                   $q                 直接提问，不附加翻译提示\n\
                   ?                  显示本帮助",
        _ => return None,
    };
    Some(text)
}
