//! Command strategies: which system prompt to send and how to read the reply.
//!
//! Every command prefix the user may type maps to one `'static` [`Strategy`]. Legacy
//! prefixes point at the same instance as their modern spelling.

use crate::language::{name_of, notation_of};

/// Key used when the input carries no registered command prefix
pub const DEFAULT_KEY: &str = "default";

/// Shape the model is asked to reply in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Text,
    Json,
}

/// Builds a system prompt from `(source language, target language)`
pub type PromptFn = fn(&str, &str) -> String;

/// Builds the user message from `(content, target language)`
pub type UserPromptFn = fn(&str, &str) -> String;

/// How the system prompt for a strategy is produced
#[derive(Debug)]
pub enum StrategySpec {
    FixedPrompt {
        prompt: &'static str,
        shape: ResponseShape,
    },
    ComputedPrompt {
        prompt: PromptFn,
        shape: ResponseShape,
        user_prompt: Option<UserPromptFn>,
    },
    /// No system prompt; the user's text goes out verbatim and comes back as text
    Passthrough,
}

/// How a decoded JSON reply is laid out for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The reply as-is. Registered `Plain` strategies are all text-shaped; a JSON reply
    /// under this layout shows its `translation` field, or the raw reply
    Plain,
    /// `literal` + `free` as standard and polished versions
    Polished,
    /// `literal` + `free` as standard and colloquial versions
    Colloquial,
    /// Optional `text` echo + `phonetic`
    SourcePhoneticOnly,
    /// `translation` + `phonetic` of the translation
    TranslationPhonetic,
    /// `translation` + `phonetic` of the source
    SourcePhonetic,
    /// `translation`, `targetPhonetic`, `sourcePhonetic`
    DualPhonetic,
}

#[derive(Debug)]
pub struct Strategy {
    /// Canonical key; aliases report the key they alias
    pub key: &'static str,
    pub spec: StrategySpec,
    pub layout: Layout,
}

impl Strategy {
    pub fn shape(&self) -> ResponseShape {
        match &self.spec {
            StrategySpec::FixedPrompt { shape, .. } => *shape,
            StrategySpec::ComputedPrompt { shape, .. } => *shape,
            StrategySpec::Passthrough => ResponseShape::Text,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self.spec, StrategySpec::Passthrough)
    }

    /// System prompt for this strategy, `None` for passthrough
    pub fn system_prompt(&self, from: &str, to: &str) -> Option<String> {
        match &self.spec {
            StrategySpec::FixedPrompt { prompt, .. } => Some((*prompt).to_string()),
            StrategySpec::ComputedPrompt { prompt, .. } => Some(prompt(from, to)),
            StrategySpec::Passthrough => None,
        }
    }

    /// User message for this strategy; passthrough sends the content unchanged
    pub fn user_prompt(&self, content: &str, to: &str) -> String {
        match &self.spec {
            StrategySpec::ComputedPrompt {
                user_prompt: Some(build),
                ..
            } => build(content, to),
            StrategySpec::Passthrough => content.to_string(),
            _ => generic_user_prompt(content, to),
        }
    }
}

fn generic_user_prompt(content: &str, to: &str) -> String {
    let language = name_of(to).unwrap_or_else(|| to.to_string());
    format!("Translate the following text into {}:\n{}", language, content)
}

const TRANSLATE_PROMPT: &str = "You are a professional translation engine, please translate the text into a colloquial, professional, elegant and fluent content, without the style of machine translation. You must only translate the text content, never interpret it.";

const POLISH_PROMPT: &str = "You are a professional translation engine designed to output JSON. \
For the given text, produce two translations: a faithful literal translation, and a polished version \
that reads like it was written by a skilled native writer, improving fluency and word choice while \
keeping the meaning. You must only translate the text content, never interpret it. \
Respond in the format {\"literal\": \"literal translation\", \"free\": \"polished version\"}";

const FEMININE_PROMPT: &str = "You are a professional translation engine designed to output JSON. \
For the given text, produce two translations: a faithful literal translation, and a colloquial version \
as a young woman would naturally say it in everyday conversation, using the feminine speech patterns \
of the target language where they exist. You must only translate the text content, never interpret it. \
Respond in the format {\"literal\": \"literal translation\", \"free\": \"colloquial version\"}";

const MASCULINE_PROMPT: &str = "You are a professional translation engine designed to output JSON. \
For the given text, produce two translations: a faithful literal translation, and a colloquial version \
as a young man would naturally say it in everyday conversation, using the masculine speech patterns \
of the target language where they exist. You must only translate the text content, never interpret it. \
Respond in the format {\"literal\": \"literal translation\", \"free\": \"colloquial version\"}";

/// Describes the notation for `code`, or asks the model to pick one when the language is unknown
fn notation_instruction(code: &str, subject: &str) -> String {
    match (name_of(code), notation_of(code)) {
        (Some(name), Some(notation)) => format!(
            "The {} is written in {}; transcribe it using {}.",
            subject, name, notation
        ),
        _ => format!(
            "Identify the language of the {} and transcribe it using the standard phonetic \
             notation for that language (Pinyin for Chinese, Romaji for Japanese, Revised \
             Romanization for Korean, IPA for any other language).",
            subject
        ),
    }
}

fn source_phonetic_prompt(from: &str, _to: &str) -> String {
    let instruction = notation_instruction(from, "text");
    if name_of(from).is_some() {
        format!(
            "You are a phonetic transcription engine designed to output JSON. Do not translate the text. {} \
             Respond in the format {{\"phonetic\": \"transcription\"}}",
            instruction
        )
    } else {
        format!(
            "You are a phonetic transcription engine designed to output JSON. Do not translate the text. {} \
             Respond in the format {{\"text\": \"the original text\", \"phonetic\": \"transcription\"}}",
            instruction
        )
    }
}

fn source_phonetic_user_prompt(content: &str, _to: &str) -> String {
    format!("Transcribe the following text:\n{}", content)
}

fn translation_phonetic_prompt(_from: &str, to: &str) -> String {
    format!(
        "You are a professional translation engine designed to output JSON. Translate the text \
         fluently, then provide the pronunciation of your translation. {} You must only translate the \
         text content, never interpret it. Respond in the format \
         {{\"translation\": \"translation\", \"phonetic\": \"transcription of the translation\"}}",
        notation_instruction(to, "translation")
    )
}

fn source_translation_phonetic_prompt(from: &str, _to: &str) -> String {
    format!(
        "You are a professional translation engine designed to output JSON. Translate the text \
         fluently, then provide the pronunciation of the original text. {} You must only translate the \
         text content, never interpret it. Respond in the format \
         {{\"translation\": \"translation\", \"phonetic\": \"transcription of the original text\"}}",
        notation_instruction(from, "original text")
    )
}

fn dual_phonetic_prompt(from: &str, to: &str) -> String {
    format!(
        "You are a professional translation engine designed to output JSON. Translate the text \
         fluently, then provide the pronunciation of both the original text and your translation. \
         {} {} You must only translate the text content, never interpret it. Respond in the format \
         {{\"translation\": \"translation\", \"sourcePhonetic\": \"transcription of the original text\", \
         \"targetPhonetic\": \"transcription of the translation\"}}",
        notation_instruction(from, "original text"),
        notation_instruction(to, "translation")
    )
}

static DEFAULT: Strategy = Strategy {
    key: DEFAULT_KEY,
    spec: StrategySpec::FixedPrompt {
        prompt: TRANSLATE_PROMPT,
        shape: ResponseShape::Text,
    },
    layout: Layout::Plain,
};

static TRANSLATE: Strategy = Strategy {
    key: "$t",
    spec: StrategySpec::FixedPrompt {
        prompt: TRANSLATE_PROMPT,
        shape: ResponseShape::Text,
    },
    layout: Layout::Plain,
};

static POLISH: Strategy = Strategy {
    key: "$p",
    spec: StrategySpec::FixedPrompt {
        prompt: POLISH_PROMPT,
        shape: ResponseShape::Json,
    },
    layout: Layout::Polished,
};

static FEMININE: Strategy = Strategy {
    key: "$f",
    spec: StrategySpec::FixedPrompt {
        prompt: FEMININE_PROMPT,
        shape: ResponseShape::Json,
    },
    layout: Layout::Colloquial,
};

static MASCULINE: Strategy = Strategy {
    key: "$m",
    spec: StrategySpec::FixedPrompt {
        prompt: MASCULINE_PROMPT,
        shape: ResponseShape::Json,
    },
    layout: Layout::Colloquial,
};

static SOURCE_PHONETIC_ONLY: Strategy = Strategy {
    key: "$r",
    spec: StrategySpec::ComputedPrompt {
        prompt: source_phonetic_prompt,
        shape: ResponseShape::Json,
        user_prompt: Some(source_phonetic_user_prompt),
    },
    layout: Layout::SourcePhoneticOnly,
};

static TRANSLATION_PHONETIC: Strategy = Strategy {
    key: "$r>",
    spec: StrategySpec::ComputedPrompt {
        prompt: translation_phonetic_prompt,
        shape: ResponseShape::Json,
        user_prompt: None,
    },
    layout: Layout::TranslationPhonetic,
};

static SOURCE_PHONETIC: Strategy = Strategy {
    key: "$r<",
    spec: StrategySpec::ComputedPrompt {
        prompt: source_translation_phonetic_prompt,
        shape: ResponseShape::Json,
        user_prompt: None,
    },
    layout: Layout::SourcePhonetic,
};

static DUAL_PHONETIC: Strategy = Strategy {
    key: "$r<>",
    spec: StrategySpec::ComputedPrompt {
        prompt: dual_phonetic_prompt,
        shape: ResponseShape::Json,
        user_prompt: None,
    },
    layout: Layout::DualPhonetic,
};

static QUESTION: Strategy = Strategy {
    key: "$q",
    spec: StrategySpec::Passthrough,
    layout: Layout::Plain,
};

static ENTRIES: [(&str, &Strategy); 13] = [
    (DEFAULT_KEY, &DEFAULT),
    ("$t", &TRANSLATE),
    (">t", &TRANSLATE),
    ("$p", &POLISH),
    ("$f", &FEMININE),
    ("$cf", &FEMININE),
    ("$m", &MASCULINE),
    ("$cm", &MASCULINE),
    ("$r", &SOURCE_PHONETIC_ONLY),
    ("$r>", &TRANSLATION_PHONETIC),
    ("$r<", &SOURCE_PHONETIC),
    ("$r<>", &DUAL_PHONETIC),
    ("$q", &QUESTION),
];

/// Read-only registry of every strategy key
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyTable;

impl StrategyTable {
    pub fn get(&self, key: &str) -> Option<&'static Strategy> {
        ENTRIES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, strategy)| *strategy)
    }

    /// Like [`get`](Self::get) but unknown keys resolve to the default strategy
    pub fn resolve(&self, key: &str) -> &'static Strategy {
        self.get(key).unwrap_or(&DEFAULT)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All registered keys, aliases included, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        ENTRIES.iter().map(|(name, _)| *name)
    }
}
