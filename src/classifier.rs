// =============================================================================
// Content Classifier
// =============================================================================
//
// Assigns pillar, category, tags, title and summary to raw content.
// Two paths:
// - remote: LLM categorization over the chat-completion API (needs a key)
// - offline: keyword scoring against the pillar lexicons (always available)
//
// Every result, remote or offline, passes through validate() before leaving
// this module, so `category` is always taxonomically valid for `pillar`.

use serde::{Deserialize, Serialize};

use crate::llm::{self, ChatMessage, ChatOptions};
use crate::store::SourceKind;
use crate::taxonomy::{pillar_reference, Pillar};
use crate::utils::safe_truncate;

/// Content sent to the remote service is capped at this prefix
const REMOTE_CONTENT_PREFIX: usize = 2000;
/// Offline summaries take the first 200 chars of content
const SUMMARY_PREFIX: usize = 200;
/// At most this many tags survive validation
const MAX_TAGS: usize = 5;

/// Result of classifying one piece of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub pillar: Pillar,
    pub category: String,
    pub tags: Vec<String>,
    pub title: String,
    pub summary: String,
}

/// Raw values as returned by the remote service, before validation
#[derive(Debug, Deserialize)]
struct RawClassification {
    pillar: Option<String>,
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    title: Option<String>,
    summary: Option<String>,
}

/// Keyword-based categorization, used when no API key is configured or the
/// remote path fails. Never fails.
///
/// Scores each pillar by how many of its lexicon terms appear in
/// `filename + content` (each term counted once). Tie-break: health wins only
/// on a strict lead over both others, wealth only on a strict lead over
/// wisdom, otherwise wisdom — so wisdom is the default for ties and content
/// with no matches.
pub fn categorize_offline(content: &str, filename: &str) -> Classification {
    let text = format!("{} {}", filename, content).to_lowercase();

    let score = |pillar: Pillar| {
        pillar.keywords().iter().filter(|k| text.contains(*k)).count()
    };
    let h_score = score(Pillar::Health);
    let w_score = score(Pillar::Wealth);
    let s_score = score(Pillar::Wisdom);

    let pillar = if h_score > w_score && h_score > s_score {
        Pillar::Health
    } else if w_score > s_score {
        Pillar::Wealth
    } else {
        Pillar::Wisdom
    };

    let title = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);
    let title = if title.is_empty() { "Untitled" } else { title };

    Classification {
        pillar,
        category: pillar.categories()[0].to_string(),
        tags: vec![],
        title: title.to_string(),
        summary: safe_truncate(content, SUMMARY_PREFIX).to_string(),
    }
}

/// LLM categorization over the remote service.
///
/// Any HTTP failure, malformed JSON, or missing field is a hard failure of
/// this path; the caller substitutes the offline result.
pub async fn categorize_remote(
    api_key: &str,
    model: &str,
    content: &str,
    filename: &str,
    kind: SourceKind,
) -> Result<Classification, String> {
    let system_prompt = format!(
        r#"You are a content categorizer for ThoughtSpace, a personal knowledge management app.
Given a piece of content (note, screenshot text, or PDF), you must:
1. Determine which PILLAR it belongs to (health, wealth, or wisdom)
2. Determine the specific CATEGORY within that pillar
3. Generate 2-5 relevant tags
4. Create a concise title if needed
5. Write a brief 1-2 sentence summary

PILLARS AND CATEGORIES:
{}

Respond in JSON format:
{{
  "pillar": "health" | "wealth" | "wisdom",
  "category": "exact category name from the list above",
  "tags": ["tag1", "tag2", ...],
  "title": "suggested title",
  "summary": "brief summary"
}}"#,
        pillar_reference()
    );

    let user_prompt = format!(
        "File: {} ({})\nContent:\n{}",
        filename,
        kind.as_str(),
        safe_truncate(content, REMOTE_CONTENT_PREFIX)
    );

    let response = llm::call_chat(
        api_key,
        model,
        vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
        ChatOptions { json: true, temperature: Some(0.2) },
    )
    .await?;

    let raw: RawClassification = serde_json::from_str(&response)
        .map_err(|e| format!("Failed to parse classification JSON: {}", e))?;

    Ok(validate(raw, content, filename))
}

/// Force a raw result into the taxonomy: unknown pillar becomes wisdom, a
/// category outside the resolved pillar's list becomes that pillar's first
/// category, and tags are capped at 5.
fn validate(raw: RawClassification, content: &str, filename: &str) -> Classification {
    let pillar = raw
        .pillar
        .as_deref()
        .and_then(Pillar::from_str)
        .unwrap_or(Pillar::Wisdom);

    let category = raw
        .category
        .filter(|c| pillar.categories().contains(&c.as_str()))
        .unwrap_or_else(|| pillar.categories()[0].to_string());

    let mut tags = raw.tags;
    tags.truncate(MAX_TAGS);

    Classification {
        pillar,
        category,
        tags,
        title: raw.title.filter(|t| !t.is_empty()).unwrap_or_else(|| filename.to_string()),
        summary: raw
            .summary
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| safe_truncate(content, SUMMARY_PREFIX).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_health_keywords() {
        let result = categorize_offline("I love my morning yoga and meditation routine", "morning.txt");
        assert_eq!(result.pillar, Pillar::Health);
        assert_eq!(result.category, Pillar::Health.categories()[0]);
        assert_eq!(result.title, "morning");
        assert!(result.tags.is_empty());
    }

    #[test]
    fn test_offline_no_matches_defaults_to_wisdom() {
        let result = categorize_offline("zzz qqq xxx", "random.txt");
        assert_eq!(result.pillar, Pillar::Wisdom);
        assert_eq!(result.category, Pillar::Wisdom.categories()[0]);
    }

    #[test]
    fn test_offline_tie_defaults_to_wisdom() {
        // one health term, one wealth term, one wisdom term
        let result = categorize_offline("yoga salary book", "mixed.txt");
        assert_eq!(result.pillar, Pillar::Wisdom);
    }

    #[test]
    fn test_offline_wealth_beats_wisdom_on_strict_lead() {
        let result = categorize_offline("salary budget book", "notes.txt");
        assert_eq!(result.pillar, Pillar::Wealth);
        assert_eq!(result.category, Pillar::Wealth.categories()[0]);
    }

    #[test]
    fn test_offline_filename_counts_toward_score() {
        let result = categorize_offline("nothing relevant here at all", "yoga.txt");
        assert_eq!(result.pillar, Pillar::Health);
    }

    #[test]
    fn test_offline_terms_count_once_per_presence() {
        // "yoga" five times is still one health point; two wealth terms win
        let result = categorize_offline("yoga yoga yoga yoga yoga salary budget", "plan.txt");
        assert_eq!(result.pillar, Pillar::Wealth);
    }

    #[test]
    fn test_offline_empty_filename_stem_is_untitled() {
        let result = categorize_offline("plain content", ".txt");
        assert_eq!(result.title, "Untitled");
    }

    #[test]
    fn test_offline_summary_is_prefix() {
        let content = "a".repeat(500);
        let result = categorize_offline(&content, "long.txt");
        assert_eq!(result.summary.len(), 200);
    }

    #[test]
    fn test_validate_unknown_pillar_becomes_wisdom() {
        let raw = RawClassification {
            pillar: Some("finance".to_string()),
            category: Some("Budgeting & Expenses".to_string()),
            tags: vec![],
            title: Some("t".to_string()),
            summary: Some("s".to_string()),
        };
        let result = validate(raw, "content", "file.txt");
        assert_eq!(result.pillar, Pillar::Wisdom);
        // category was only valid for wealth, so it falls back too
        assert_eq!(result.category, Pillar::Wisdom.categories()[0]);
    }

    #[test]
    fn test_validate_bad_category_becomes_first() {
        let raw = RawClassification {
            pillar: Some("health".to_string()),
            category: Some("Nonexistent".to_string()),
            tags: vec![],
            title: Some("t".to_string()),
            summary: Some("s".to_string()),
        };
        let result = validate(raw, "content", "file.txt");
        assert_eq!(result.pillar, Pillar::Health);
        assert_eq!(result.category, Pillar::Health.categories()[0]);
    }

    #[test]
    fn test_validate_caps_tags_at_five() {
        let raw = RawClassification {
            pillar: Some("wisdom".to_string()),
            category: Some("Books & Reading".to_string()),
            tags: (0..8).map(|i| format!("tag{}", i)).collect(),
            title: Some("t".to_string()),
            summary: Some("s".to_string()),
        };
        let result = validate(raw, "content", "file.txt");
        assert_eq!(result.tags.len(), 5);
        assert_eq!(result.category, "Books & Reading");
    }

    #[test]
    fn test_validate_fills_missing_title_and_summary() {
        let raw = RawClassification {
            pillar: None,
            category: None,
            tags: vec![],
            title: None,
            summary: None,
        };
        let result = validate(raw, "some content here", "fallback.txt");
        assert_eq!(result.title, "fallback.txt");
        assert_eq!(result.summary, "some content here");
    }
}
