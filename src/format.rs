//! Turning a chat-completion reply into the text shown to the user.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{KotobaError, Result};
use crate::i18n::Localizer;
use crate::strategy::{Layout, ResponseShape, StrategyTable};

/// Render `payload` for the strategy registered under `strategy_key`
pub fn format(
    payload: &Value,
    strategy_key: &str,
    table: &StrategyTable,
    localizer: &Localizer,
) -> Result<String> {
    let content = extract_content(payload)
        .ok_or_else(|| KotobaError::MalformedResponse(localizer.get("malformed_response", &[])))?;
    let content = content.trim();

    let strategy = table.resolve(strategy_key);
    if strategy.shape() == ResponseShape::Text {
        return Ok(content.to_string());
    }

    let fields = match decode_object(content) {
        Ok(fields) => fields,
        Err(e) => {
            warn!("JSON parsing failed, falling back to raw content: {}", e);
            return Ok(strip_outer_quotes(content).to_string());
        }
    };
    debug!("Decoded {} reply with {} fields", strategy.key, fields.len());

    let reply = Reply { fields: &fields };
    let sections = match strategy.layout {
        Layout::Plain => {
            return Ok(reply.text("translation").unwrap_or_else(|| content.to_string()));
        }
        Layout::Polished => {
            let Some(free) = reply.text("free").filter(|free| !free.trim().is_empty()) else {
                return Ok(localizer.get("polished_not_found", &[]));
            };
            vec![
                Some(("label_standard", reply.text_or_empty("literal"))),
                Some(("label_polished", free)),
            ]
        }
        Layout::Colloquial => vec![
            Some(("label_standard", reply.text_or_empty("literal"))),
            Some(("label_colloquial", reply.text_or_empty("free"))),
        ],
        Layout::SourcePhoneticOnly => vec![
            reply
                .text("text")
                .filter(|text| !text.trim().is_empty())
                .map(|text| ("label_source", text)),
            Some(("label_pronunciation", reply.text_or_empty("phonetic"))),
        ],
        Layout::TranslationPhonetic => vec![
            Some(("label_translation", reply.text_or_empty("translation"))),
            Some(("label_translation_pronunciation", reply.text_or_empty("phonetic"))),
        ],
        Layout::SourcePhonetic => vec![
            Some(("label_translation", reply.text_or_empty("translation"))),
            Some(("label_source_pronunciation", reply.text_or_empty("phonetic"))),
        ],
        Layout::DualPhonetic => vec![
            Some(("label_translation", reply.text_or_empty("translation"))),
            Some(("label_translation_pronunciation", reply.text_or_empty("targetPhonetic"))),
            Some(("label_source_pronunciation", reply.text_or_empty("sourcePhonetic"))),
        ],
    };

    Ok(render_sections(sections, localizer))
}

/// `choices[0].message.content`, if it is a non-empty string
fn extract_content(payload: &Value) -> Option<&str> {
    payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .filter(|content| !content.trim().is_empty())
}

/// Decode a reply as a JSON object, tolerating a surrounding markdown code fence
fn decode_object(content: &str) -> std::result::Result<Map<String, Value>, String> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            let unfenced = remove_code_fence(content);
            if unfenced == content {
                return Err(e.to_string());
            }
            debug!("Removed markdown code fence, retrying parse");
            serde_json::from_str(unfenced).map_err(|e| e.to_string())?
        }
    };

    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(format!("expected a JSON object, got {}", kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn remove_code_fence(content: &str) -> &str {
    let Some(inner) = content.strip_prefix("```") else {
        return content;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return content;
    };
    // drop the language tag on the opening line, e.g. ```json
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}

/// Remove one leading and one trailing `"`, nothing more
fn strip_outer_quotes(content: &str) -> &str {
    let content = content.strip_prefix('"').unwrap_or(content);
    content.strip_suffix('"').unwrap_or(content)
}

struct Reply<'a> {
    fields: &'a Map<String, Value>,
}

impl Reply<'_> {
    /// Field as display text; `null` and missing fields are `None`
    fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }
}

fn render_sections(sections: Vec<Option<(&str, String)>>, localizer: &Localizer) -> String {
    sections
        .into_iter()
        .flatten()
        .map(|(label, body)| {
            let label = localizer.get(label, &[]);
            localizer.get("section", &[label.as_str(), body.trim()])
        })
        .filter(|section| !section.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use serde_json::json;

    fn reply(content: &str) -> Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    fn en(payload: &Value, key: &str) -> String {
        format(payload, key, &StrategyTable, &Localizer::new(Locale::En)).unwrap()
    }

    #[test]
    fn test_missing_message_is_malformed() {
        let localizer = Localizer::new(Locale::En);
        for payload in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{}]}),
            json!({"choices": [{"message": {"content": "   "}}]}),
        ] {
            let err = format(&payload, "default", &StrategyTable, &localizer).unwrap_err();
            assert!(matches!(err, KotobaError::MalformedResponse(_)));
            assert_eq!(err.to_string(), "Unexpected API response format");
        }
    }

    #[test]
    fn test_text_strategy_returns_trimmed_content() {
        assert_eq!(en(&reply("  Bonjour \n"), "default"), "Bonjour");
        assert_eq!(en(&reply("{\"a\": 1}"), "$q"), "{\"a\": 1}");
    }

    #[test]
    fn test_polished_pair_in_order() {
        let out = en(&reply(r#"{"literal":"A","free":"B"}"#), "$p");
        assert_eq!(out, "Standard Translation:\nA\n\nPolished Version:\nB");
    }

    #[test]
    fn test_polished_missing_free_is_not_found_message() {
        assert_eq!(en(&reply(r#"{"literal":"A"}"#), "$p"), "Polished version not found");
        let zh = format(
            &reply(r#"{"literal":"A"}"#),
            "$p",
            &StrategyTable,
            &Localizer::new(Locale::Zh),
        )
        .unwrap();
        assert_eq!(zh, "未找到润色版本");
    }

    #[test]
    fn test_colloquial_pair_for_aliases() {
        let payload = reply(r#"{"literal":"I am hungry.","free":"I'm starving!"}"#);
        let expected = "Standard Translation:\nI am hungry.\n\nColloquial Version:\nI'm starving!";
        for key in ["$f", "$m", "$cf", "$cm"] {
            assert_eq!(en(&payload, key), expected, "{}", key);
        }
    }

    #[test]
    fn test_reading_source_section_only_when_echoed() {
        let with_echo = en(&reply(r#"{"text":"你好","phonetic":"nǐ hǎo"}"#), "$r");
        assert_eq!(with_echo, "Source:\n你好\n\nPronunciation:\nnǐ hǎo");

        let without_echo = en(&reply(r#"{"phonetic":"nǐ hǎo"}"#), "$r");
        assert_eq!(without_echo, "Pronunciation:\nnǐ hǎo");
    }

    #[test]
    fn test_translation_phonetic_layouts() {
        let payload = reply(r#"{"translation":"こんにちは","phonetic":"konnichiwa"}"#);
        assert_eq!(
            en(&payload, "$r>"),
            "Translation:\nこんにちは\n\nTranslation Pronunciation:\nkonnichiwa"
        );
        assert_eq!(
            en(&payload, "$r<"),
            "Translation:\nこんにちは\n\nSource Pronunciation:\nkonnichiwa"
        );
    }

    #[test]
    fn test_dual_phonetic_order() {
        let payload = reply(r#"{"translation":"T","sourcePhonetic":"S","targetPhonetic":"G"}"#);
        assert_eq!(
            en(&payload, "$r<>"),
            "Translation:\nT\n\nTranslation Pronunciation:\nG\n\nSource Pronunciation:\nS"
        );
    }

    #[test]
    fn test_missing_fields_render_empty_sections() {
        let out = en(&reply(r#"{"translation":"T"}"#), "$r<>");
        assert_eq!(
            out,
            "Translation:\nT\n\nTranslation Pronunciation:\n\n\nSource Pronunciation:\n"
        );
    }

    #[test]
    fn test_malformed_json_falls_back_to_raw_text() {
        assert_eq!(en(&reply("not json"), "$p"), "not json");
        assert_eq!(en(&reply("\"quoted reply\""), "$r>"), "quoted reply");
        assert_eq!(en(&reply("\"\"double\"\""), "$p"), "\"double\"");
    }

    #[test]
    fn test_code_fenced_json_is_decoded() {
        let payload = reply("```json\n{\"literal\":\"A\",\"free\":\"B\"}\n```");
        assert_eq!(
            en(&payload, "$p"),
            "Standard Translation:\nA\n\nPolished Version:\nB"
        );
    }

    #[test]
    fn test_zh_section_labels() {
        let out = format(
            &reply(r#"{"literal":"A","free":"B"}"#),
            "$p",
            &StrategyTable,
            &Localizer::new(Locale::Zh),
        )
        .unwrap();
        assert_eq!(out, "标准翻译：\nA\n\n润色版本：\nB");
    }
}
