//! Derived views over a [`StrategyResult`]: filtering, sorting, badge tones,
//! difficulty bands and the intent-grouped tree.
//!
//! Nothing here mutates the result; every view borrows from it.

use std::cmp::Ordering;

use crate::error::StrategyError;
use crate::strategy::{KeywordAnalysis, Level, SearchIntent, StrategyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Header toggle: unsorted → asc → desc → asc …
    pub fn next(current: Option<SortDirection>) -> SortDirection {
        match current {
            None | Some(SortDirection::Desc) => SortDirection::Asc,
            Some(SortDirection::Asc) => SortDirection::Desc,
        }
    }
}

/// `None` on either axis means "all levels".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    pub volume: Option<Level>,
    pub competition: Option<Level>,
}

impl KeywordFilter {
    pub fn matches(&self, keyword: &KeywordAnalysis) -> bool {
        self.volume.map_or(true, |v| keyword.search_volume == v)
            && self.competition.map_or(true, |c| keyword.competition == c)
    }
}

/// Filter, then optionally sort by keyword text. Without a sort direction
/// the provider's order is kept.
pub fn apply<'a>(
    keywords: &'a [KeywordAnalysis],
    filter: &KeywordFilter,
    sort: Option<SortDirection>,
) -> Vec<&'a KeywordAnalysis> {
    let mut rows: Vec<&KeywordAnalysis> = keywords.iter().filter(|k| filter.matches(k)).collect();
    if let Some(direction) = sort {
        rows.sort_by(|a, b| compare_keywords(a, b, direction));
    }
    rows
}

fn compare_keywords(a: &KeywordAnalysis, b: &KeywordAnalysis, direction: SortDirection) -> Ordering {
    let ordering = collation_key(&a.keyword)
        .cmp(&collation_key(&b.keyword))
        .then_with(|| a.keyword.cmp(&b.keyword));
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Persian letters in dictionary order. Code point order puts پ چ ژ ک گ
/// after every Arabic letter, so keywords are ranked against this instead.
const PERSIAN_ALPHABET: &str = "آابپتثجچحخدذرزژسشصضطظعغفقکگلمنوهی";

/// Sort key for one keyword: separators first, then digits, then Persian
/// letters by alphabet rank, then everything else by code point.
fn collation_key(text: &str) -> Vec<(u8, u32)> {
    text.chars()
        .filter(|c| !is_ignorable(*c))
        .map(|c| {
            if c.is_whitespace() || c.is_ascii_punctuation() || matches!(c, '،' | '؛' | '؟') {
                (0, 0)
            } else if let Some(digit) = digit_value(c) {
                (1, digit)
            } else if c == 'ء' {
                (2, 0)
            } else if let Some(rank) = letter_rank(c) {
                (2, rank + 1)
            } else {
                (3, c as u32)
            }
        })
        .collect()
}

// Zero-width non-joiner, tatweel and short-vowel marks do not affect order.
fn is_ignorable(c: char) -> bool {
    matches!(c, '\u{200C}' | '\u{0640}' | '\u{064B}'..='\u{0652}')
}

fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        '\u{06F0}'..='\u{06F9}' => Some(c as u32 - 0x06F0),
        '\u{0660}'..='\u{0669}' => Some(c as u32 - 0x0660),
        _ => None,
    }
}

fn letter_rank(c: char) -> Option<u32> {
    let folded = match c {
        'أ' | 'إ' => 'ا',
        'ؤ' => 'و',
        'ئ' | 'ي' | 'ى' => 'ی',
        'ك' => 'ک',
        'ة' => 'ه',
        other => other,
    };
    PERSIAN_ALPHABET
        .chars()
        .position(|letter| letter == folded)
        .map(|rank| rank as u32)
}

/// Which metric a level badge describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Volume,
    CommercialValue,
    Competition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

/// Low competition is good news; for every other metric high is.
pub fn level_tone(metric: Metric, level: Level) -> Tone {
    match (metric, level) {
        (_, Level::Medium) => Tone::Neutral,
        (Metric::Competition, Level::Low) => Tone::Positive,
        (Metric::Competition, Level::High) => Tone::Negative,
        (Metric::Volume | Metric::CommercialValue, Level::High) => Tone::Positive,
        (Metric::Volume | Metric::CommercialValue, Level::Low) => Tone::Negative,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyBand {
    Easy,
    Moderate,
    Hard,
}

impl DifficultyBand {
    pub fn of(score: u8) -> Self {
        match score {
            0..=40 => DifficultyBand::Easy,
            41..=70 => DifficultyBand::Moderate,
            _ => DifficultyBand::Hard,
        }
    }
}

pub fn level_label(level: Level) -> &'static str {
    match level {
        Level::High => "زیاد",
        Level::Medium => "متوسط",
        Level::Low => "کم",
    }
}

pub fn intent_label(intent: SearchIntent) -> &'static str {
    match intent {
        SearchIntent::Informational => "اطلاعاتی",
        SearchIntent::Transactional => "تراکنشی",
        SearchIntent::Commercial => "تجاری",
        SearchIntent::Navigational => "ناوبری",
    }
}

/// Localized message for the end user.
pub fn error_message(err: &StrategyError) -> &'static str {
    match err {
        StrategyError::MissingCredential => "کلید API تنظیم نشده است.",
        StrategyError::Provider(_) => "مشکلی پیش آمد. لطفا کلید API خود را بررسی کنید.",
        StrategyError::EmptyResponse => "پاسخی از هوش مصنوعی دریافت نشد.",
        StrategyError::ResponseFormat { .. } => "پاسخ هوش مصنوعی قابل خواندن نبود. دوباره تلاش کنید.",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Category,
    Item,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub value: Option<String>,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
}

/// Topic at the root, one branch per intent in first-seen order, keywords as
/// leaves annotated with their traffic level.
pub fn strategy_tree(result: &StrategyResult) -> TreeNode {
    let mut branches: Vec<(SearchIntent, Vec<TreeNode>)> = Vec::new();

    for kw in &result.keywords {
        let leaf = TreeNode {
            label: kw.keyword.clone(),
            value: Some(format!("ترافیک: {}", level_label(kw.search_volume))),
            kind: NodeKind::Item,
            children: Vec::new(),
        };
        match branches.iter_mut().find(|(intent, _)| *intent == kw.intent) {
            Some((_, leaves)) => leaves.push(leaf),
            None => branches.push((kw.intent, vec![leaf])),
        }
    }

    TreeNode {
        label: result.topic.clone(),
        value: Some("موضوع اصلی".to_string()),
        kind: NodeKind::Root,
        children: branches
            .into_iter()
            .map(|(intent, leaves)| TreeNode {
                label: intent_label(intent).to_string(),
                value: None,
                kind: NodeKind::Category,
                children: leaves,
            })
            .collect(),
    }
}

pub fn render_tree(node: &TreeNode) -> String {
    let mut out = String::new();
    push_node(node, "", true, true, &mut out);
    out
}

fn push_node(node: &TreeNode, prefix: &str, last: bool, root: bool, out: &mut String) {
    let connector = match (root, last) {
        (true, _) => "",
        (false, true) => "└── ",
        (false, false) => "├── ",
    };
    out.push_str(prefix);
    out.push_str(connector);
    out.push_str(&node.label);
    if let Some(value) = &node.value {
        out.push_str(&format!(" ({value})"));
    }
    out.push('\n');

    let child_prefix = match (root, last) {
        (true, _) => prefix.to_string(),
        (false, true) => format!("{prefix}    "),
        (false, false) => format!("{prefix}│   "),
    };
    for (idx, child) in node.children.iter().enumerate() {
        push_node(child, &child_prefix, idx + 1 == node.children.len(), false, out);
    }
}

pub fn render_table(rows: &[&KeywordAnalysis]) -> String {
    if rows.is_empty() {
        return "هیچ کلمه کلیدی با فیلترهای انتخاب شده یافت نشد.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("keyword | volume | commercial | intent | competition | difficulty | format | title\n");
    for kw in rows {
        out.push_str(&format!(
            "{} | {} | {} | {} | {} | {} {} | {} | {}\n",
            kw.keyword,
            level_label(kw.search_volume),
            level_label(kw.commercial_value),
            intent_label(kw.intent),
            level_label(kw.competition),
            kw.difficulty_index,
            difficulty_marker(DifficultyBand::of(kw.difficulty_index)),
            kw.display_format(),
            kw.display_title(),
        ));
    }
    out
}

fn difficulty_marker(band: DifficultyBand) -> &'static str {
    match band {
        DifficultyBand::Easy => "[easy]",
        DifficultyBand::Moderate => "[moderate]",
        DifficultyBand::Hard => "[hard]",
    }
}
