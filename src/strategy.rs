use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{FieldDef, TypeDef};

/// Label shown when the model leaves `contentFormat` out.
pub const DEFAULT_CONTENT_FORMAT: &str = "مقاله جامع (Blog Post)";

pub const LEVEL_LITERALS: &[&str] = &["High", "Medium", "Low"];
pub const INTENT_LITERALS: &[&str] = &["Informational", "Transactional", "Commercial", "Navigational"];

/// Ordinal rating used for search volume, commercial value and competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::High, Level::Medium, Level::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "High",
            Level::Medium => "Medium",
            Level::Low => "Low",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLiteral(s.to_string()))
    }
}

/// Inferred purpose behind a search phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchIntent {
    Informational,
    Transactional,
    Commercial,
    Navigational,
}

impl SearchIntent {
    pub const ALL: [SearchIntent; 4] = [
        SearchIntent::Informational,
        SearchIntent::Transactional,
        SearchIntent::Commercial,
        SearchIntent::Navigational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchIntent::Informational => "Informational",
            SearchIntent::Transactional => "Transactional",
            SearchIntent::Commercial => "Commercial",
            SearchIntent::Navigational => "Navigational",
        }
    }
}

impl fmt::Display for SearchIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchIntent {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| UnknownLiteral(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown literal {0:?}")]
pub struct UnknownLiteral(pub String);

/// One evaluated candidate phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub keyword: String,
    pub search_volume: Level,
    pub commercial_value: Level,
    pub intent: SearchIntent,
    pub competition: Level,
    #[serde(deserialize_with = "deserialize_difficulty")]
    pub difficulty_index: u8,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_title: Option<String>,
}

impl KeywordAnalysis {
    /// Headline to display; the keyword itself when the model gave none.
    pub fn display_title(&self) -> &str {
        match self.suggested_title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.keyword,
        }
    }

    pub fn display_format(&self) -> &str {
        match self.content_format.as_deref() {
            Some(format) if !format.trim().is_empty() => format,
            _ => DEFAULT_CONTENT_FORMAT,
        }
    }
}

/// Complete structured output for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub topic: String,
    pub summary: String,
    pub keywords: Vec<KeywordAnalysis>,
}

// Providers sometimes emit whole numbers as `55.0`.
fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if n.fract() != 0.0 || !(0.0..=100.0).contains(&n) {
        return Err(serde::de::Error::custom(format!(
            "difficultyIndex {n} is not a whole number in [0, 100]"
        )));
    }
    Ok(n as u8)
}

// TypeDef for StrategyResult (for validation of LLM JSON)
pub fn strategy_output_typedef() -> TypeDef {
    TypeDef::Object(vec![
        FieldDef::required("topic", TypeDef::Text).describe("The core topic in the target language"),
        FieldDef::required("summary", TypeDef::Text)
            .describe("A brief one-sentence summary of the strategy in the target language"),
        FieldDef::required(
            "keywords",
            TypeDef::List(Box::new(TypeDef::Object(vec![
                FieldDef::required("keyword", TypeDef::NonEmptyText)
                    .describe("Keyword in the target language"),
                FieldDef::required("searchVolume", TypeDef::Enum(LEVEL_LITERALS)),
                FieldDef::required("commercialValue", TypeDef::Enum(LEVEL_LITERALS)),
                FieldDef::required("intent", TypeDef::Enum(INTENT_LITERALS)),
                FieldDef::required("competition", TypeDef::Enum(LEVEL_LITERALS)),
                FieldDef::required("difficultyIndex", TypeDef::Integer { min: 0, max: 100 })
                    .describe("SEO difficulty score 0-100"),
                FieldDef::required("rationale", TypeDef::NonEmptyText)
                    .describe("Brief reason for these metrics in the target language"),
                FieldDef::lenient("contentFormat", TypeDef::Text)
                    .describe("Recommended content type (e.g. guide, list) in the target language"),
                FieldDef::lenient("suggestedTitle", TypeDef::Text)
                    .describe("SEO optimized title tag in the target language"),
            ]))),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keyword() -> KeywordAnalysis {
        KeywordAnalysis {
            keyword: "خرید قهوه ارگانیک".to_string(),
            search_volume: Level::High,
            commercial_value: Level::High,
            intent: SearchIntent::Transactional,
            competition: Level::Medium,
            difficulty_index: 55,
            rationale: "...".to_string(),
            content_format: None,
            suggested_title: None,
        }
    }

    #[test]
    fn test_literals_match_enum_variants() {
        let levels: Vec<&str> = Level::ALL.iter().map(Level::as_str).collect();
        assert_eq!(levels, LEVEL_LITERALS);
        let intents: Vec<&str> = SearchIntent::ALL.iter().map(SearchIntent::as_str).collect();
        assert_eq!(intents, INTENT_LITERALS);

        for level in Level::ALL {
            assert_eq!(serde_json::to_value(level).unwrap(), json!(level.as_str()));
        }
        for intent in SearchIntent::ALL {
            assert_eq!(serde_json::to_value(intent).unwrap(), json!(intent.as_str()));
        }
    }

    #[test]
    fn test_from_str_is_case_sensitive() {
        assert_eq!("Medium".parse::<Level>(), Ok(Level::Medium));
        assert!("medium".parse::<Level>().is_err());
        assert_eq!("Navigational".parse::<SearchIntent>(), Ok(SearchIntent::Navigational));
        assert!("NAVIGATIONAL".parse::<SearchIntent>().is_err());
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent_optionals() {
        let value = serde_json::to_value(keyword()).unwrap();
        assert_eq!(value["searchVolume"], "High");
        assert_eq!(value["difficultyIndex"], 55);
        assert!(value.get("suggestedTitle").is_none());
        assert!(value.get("contentFormat").is_none());
    }

    #[test]
    fn test_difficulty_accepts_whole_floats_only() {
        let mut value = serde_json::to_value(keyword()).unwrap();
        value["difficultyIndex"] = json!(70.0);
        let parsed: KeywordAnalysis = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(parsed.difficulty_index, 70);

        value["difficultyIndex"] = json!(101);
        assert!(serde_json::from_value::<KeywordAnalysis>(value.clone()).is_err());

        value["difficultyIndex"] = json!(-1);
        assert!(serde_json::from_value::<KeywordAnalysis>(value).is_err());
    }

    #[test]
    fn test_display_fallbacks() {
        let mut kw = keyword();
        assert_eq!(kw.display_title(), "خرید قهوه ارگانیک");
        assert_eq!(kw.display_format(), DEFAULT_CONTENT_FORMAT);

        kw.suggested_title = Some("".to_string());
        assert_eq!(kw.display_title(), "خرید قهوه ارگانیک");

        kw.suggested_title = Some("راهنمای خرید".to_string());
        kw.content_format = Some("صفحه محصول".to_string());
        assert_eq!(kw.display_title(), "راهنمای خرید");
        assert_eq!(kw.display_format(), "صفحه محصول");
    }
}
