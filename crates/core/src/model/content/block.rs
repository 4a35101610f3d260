use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

//
// ─── CONTENT BLOCK ─────────────────────────────────────────────────────────────
//

/// One renderable unit of lesson content, tagged by kind.
///
/// Authored JSON selects the variant through its `type` field. Unrecognised kinds,
/// and known kinds whose fields do not fit, decode to [`ContentBlock::Unknown`] so a
/// single bad block never rejects the surrounding lesson.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Paragraph { text: String },
    UnorderedList { items: Vec<String> },
    OrderedList { items: Vec<String> },
    Code { code: String },
    Heading { text: String },
    Link(LinkBlock),
    Image(ImageBlock),
    VectorGraphic(VectorGraphic),
    Audio(AudioBlock),
    NumberLine(NumberLine),
    TenFrame { value: i64 },
    PhonemePair(PhonemePair),
    Unknown { kind: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBlock {
    #[serde(default)]
    pub href: Option<String>,
    /// Visible label; the `text` key is what authors use.
    #[serde(default, alias = "label")]
    pub text: Option<String>,
    #[serde(default)]
    pub download: bool,
    #[serde(default)]
    pub new_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Either an external SVG file or a trusted inline payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VectorGraphic {
    Inline {
        svg: String,
    },
    External {
        src: String,
        #[serde(default)]
        alt: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioBlock {
    pub src: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberLine {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub show_target_label: bool,
}

fn default_step() -> f64 {
    1.0
}

/// A word paired with the audio clip that pronounces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordAudio {
    pub word: String,
    pub audio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonemePair {
    pub grapheme: String,
    #[serde(default)]
    pub ipa: Option<String>,
    #[serde(default)]
    pub examples: Vec<WordAudio>,
    #[serde(default)]
    pub minimal_pairs: Vec<WordAudio>,
}

impl ContentBlock {
    /// The authored `type` tag for this block.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Paragraph { .. } => "p",
            ContentBlock::UnorderedList { .. } => "ul",
            ContentBlock::OrderedList { .. } => "ol",
            ContentBlock::Code { .. } => "code",
            ContentBlock::Heading { .. } => "h3",
            ContentBlock::Link(_) => "a",
            ContentBlock::Image(_) => "img",
            ContentBlock::VectorGraphic(_) => "svg",
            ContentBlock::Audio(_) => "audio",
            ContentBlock::NumberLine(_) => "number_line",
            ContentBlock::TenFrame { .. } => "ten_frame",
            ContentBlock::PhonemePair(_) => "phoneme_pair",
            ContentBlock::Unknown { kind } => kind,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, ContentBlock::Unknown { .. })
    }
}

//
// ─── LENIENT DECODING ──────────────────────────────────────────────────────────
//

/// Strict mirror of the known kinds; decoding failures fall back to `Unknown`.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownBlock {
    #[serde(rename = "p", alias = "paragraph")]
    Paragraph { text: String },
    #[serde(rename = "ul")]
    UnorderedList { items: Vec<String> },
    #[serde(rename = "ol")]
    OrderedList { items: Vec<String> },
    #[serde(rename = "code")]
    Code { code: String },
    #[serde(rename = "h3", alias = "heading")]
    Heading { text: String },
    #[serde(rename = "a", alias = "link")]
    Link(LinkBlock),
    #[serde(rename = "img", alias = "image")]
    Image(ImageBlock),
    #[serde(rename = "svg")]
    VectorGraphic(VectorGraphic),
    #[serde(rename = "audio")]
    Audio(AudioBlock),
    #[serde(rename = "number_line", alias = "numberLine")]
    NumberLine(NumberLine),
    #[serde(rename = "ten_frame", alias = "tenFrame")]
    TenFrame { value: i64 },
    #[serde(rename = "phoneme_pair", alias = "phonemePair", alias = "phoneme")]
    PhonemePair(PhonemePair),
}

impl From<KnownBlock> for ContentBlock {
    fn from(block: KnownBlock) -> Self {
        match block {
            KnownBlock::Paragraph { text } => ContentBlock::Paragraph { text },
            KnownBlock::UnorderedList { items } => ContentBlock::UnorderedList { items },
            KnownBlock::OrderedList { items } => ContentBlock::OrderedList { items },
            KnownBlock::Code { code } => ContentBlock::Code { code },
            KnownBlock::Heading { text } => ContentBlock::Heading { text },
            KnownBlock::Link(link) => ContentBlock::Link(link),
            KnownBlock::Image(image) => ContentBlock::Image(image),
            KnownBlock::VectorGraphic(svg) => ContentBlock::VectorGraphic(svg),
            KnownBlock::Audio(audio) => ContentBlock::Audio(audio),
            KnownBlock::NumberLine(line) => ContentBlock::NumberLine(line),
            KnownBlock::TenFrame { value } => ContentBlock::TenFrame { value },
            KnownBlock::PhonemePair(pair) => ContentBlock::PhonemePair(pair),
        }
    }
}

impl ContentBlock {
    /// Decode one block from a JSON value, never failing.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        match serde_json::from_value::<KnownBlock>(value) {
            Ok(block) => block.into(),
            Err(_) => ContentBlock::Unknown { kind },
        }
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}
