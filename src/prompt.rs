use crate::types::{describe_schema, TypeDef};

pub const BROAD_CONSTRAINT: &str = "CONSTRAINT: Focus on \"High Volume\" and \"Broad\" keywords. \
Prioritize brand awareness and general traffic.";

pub const NICHE_CONSTRAINT: &str = "CONSTRAINT: Focus on \"Long-tail\" and \"Niche\" keywords. \
Prioritize specific intent and lower competition over high volume.";

const EXCLUSION_PREFIX: &str =
    "CONSTRAINT: You must STRICTLY EXCLUDE any keywords that contain or are related to:";

/// Which end of the keyword spectrum the model should favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyType {
    #[default]
    Broad,
    Niche,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Free text, comma-separated by convention. Passed to the model as-is.
    pub negative_keywords: Option<String>,
    pub strategy_type: StrategyType,
}

impl GenerationOptions {
    pub fn niche() -> Self {
        Self {
            strategy_type: StrategyType::Niche,
            ..Self::default()
        }
    }

    pub fn excluding(mut self, terms: impl Into<String>) -> Self {
        self.negative_keywords = Some(terms.into());
        self
    }

    fn exclusions(&self) -> Option<&str> {
        self.negative_keywords
            .as_deref()
            .filter(|terms| !terms.is_empty())
    }
}

/// Build the instruction sent to the model.
///
/// Never fails: an empty topic still yields a well-formed prompt.
pub fn build_prompt(
    topic: &str,
    options: &GenerationOptions,
    language: &str,
    output_schema: &TypeDef,
) -> String {
    let mut s = String::new();

    s.push_str(&format!(
        "Act as a Senior SEO Strategist fluent in {language}.\n"
    ));
    s.push_str(&format!(
        "Perform a keyword research analysis based on the topic: \"{topic}\".\n\n"
    ));

    if let Some(terms) = options.exclusions() {
        s.push_str(&format!("{EXCLUSION_PREFIX} \"{terms}\".\n"));
    }

    match options.strategy_type {
        StrategyType::Niche => s.push_str(NICHE_CONSTRAINT),
        StrategyType::Broad => s.push_str(BROAD_CONSTRAINT),
    }
    s.push_str("\n\n");

    s.push_str("For every keyword, follow this filtering process:\n");
    s.push_str("1. Assess Search Volume (High/Medium/Low), i.e. traffic potential.\n");
    s.push_str("2. Assess Commercial Value (High/Medium/Low), i.e. relevance to business.\n");
    s.push_str(
        "3. Identify Search Intent (Informational, Transactional, Commercial, Navigational).\n",
    );
    s.push_str("4. Analyze Competition (High/Medium/Low).\n");
    s.push_str("5. Estimate a Difficulty Score from 0 to 100, where 100 is extremely hard to rank.\n");
    s.push_str(
        "6. Suggest the best Content Format (e.g. Comprehensive Guide, Top 10 List, Product Landing Page, Comparison Review).\n",
    );
    s.push_str(&format!(
        "7. Write a compelling, high-CTR SEO Title in {language}.\n\n"
    ));

    s.push_str(&format!(
        "Generate 10-12 highly relevant keywords or phrases related to the topic in {language}.\n\n"
    ));

    s.push_str("IMPORTANT:\n");
    s.push_str(&format!(
        "- The 'keyword', 'rationale', 'summary', 'topic', 'suggestedTitle' and 'contentFormat' fields MUST be in {language}.\n"
    ));
    s.push_str(
        "- Enum values (High, Medium, Low, Informational, Transactional, Commercial, Navigational) MUST stay in ENGLISH, spelled exactly as listed.\n",
    );
    s.push_str("- 'difficultyIndex' MUST be a whole number between 0 and 100.\n\n");

    s.push_str("Output strictly one JSON object matching this schema:\n\n");
    s.push_str(&describe_schema(output_schema, 0));

    s
}
