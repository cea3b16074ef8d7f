use crate::strategy::{StrategyTable, DEFAULT_KEY};

/// Input split into the command the user typed and the text to work on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub strategy_key: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The input was exactly `?`
    Help,
    Translate(ParsedInput),
}

/// Parse input, recognizing the `?` help request first
pub fn parse_command(text: &str, table: &StrategyTable) -> Command {
    if text.trim() == "?" {
        return Command::Help;
    }
    Command::Translate(parse(text, table))
}

/// Split a leading command prefix off `text`.
///
/// A prefix is `>` or `$` plus at least one non-whitespace character, followed by one
/// whitespace separator. Prefixes that aren't registered are ordinary content.
pub fn parse(text: &str, table: &StrategyTable) -> ParsedInput {
    if let Some((token, rest)) = split_prefix(text) {
        if table.contains(token) {
            return ParsedInput {
                strategy_key: token.to_string(),
                content: rest.to_string(),
            };
        }
    }

    ParsedInput {
        strategy_key: DEFAULT_KEY.to_string(),
        content: text.to_string(),
    }
}

fn split_prefix(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with(['>', '$']) {
        return None;
    }
    // the separator is mandatory: a bare `$p` with nothing after it is content
    let end = text.find(char::is_whitespace)?;
    if end < 2 {
        return None;
    }
    let (token, rest) = text.split_at(end);
    // only the separator itself is consumed; further indentation belongs to the content
    let mut chars = rest.chars();
    chars.next();
    Some((token, chars.as_str()))
}
