//! Keyword-based message classification.
//!
//! Matching is plain substring containment on the lowercased text, so
//! `"cherror"` counts as an error. Keyword sets are checked in a fixed
//! priority order and the first hit wins: a message that "failed with a
//! warning" is an error.

use crate::card::Category;

const ERROR_KEYWORDS: &[&str] = &["error", "failed", "failure", "invalid", "错误", "失败"];
const WARNING_KEYWORDS: &[&str] = &["warning", "caution", "warn", "警告", "注意"];
const SUCCESS_KEYWORDS: &[&str] = &["success", "succeeded", "done", "成功", "完成"];
const INFO_KEYWORDS: &[&str] = &["help", "info", "information", "帮助", "信息"];

/// Keyword sets in priority order.
const RULES: [(Category, &[&str]); 4] = [
    (Category::Error, ERROR_KEYWORDS),
    (Category::Warning, WARNING_KEYWORDS),
    (Category::Success, SUCCESS_KEYWORDS),
    (Category::Info, INFO_KEYWORDS),
];

/// Category of a message plus its theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub glyph: &'static str,
    pub color: u32,
}

impl From<Category> for Classification {
    fn from(category: Category) -> Self {
        let theme = category.theme();
        Self {
            category,
            glyph: theme.glyph,
            color: theme.color,
        }
    }
}

/// Classify `text` by keyword.
pub fn classify(text: &str) -> Classification {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(category, _)| Classification::from(*category))
        .unwrap_or_else(|| Classification::from(Category::Default))
}
