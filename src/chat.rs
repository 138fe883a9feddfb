//! Assistant over the note collection.
//!
//! With a configured key: remote chat with the notes woven into the system
//! prompt. Without one: deterministic substring search over titles, content
//! and categories.

use crate::llm::{self, ChatMessage, ChatOptions};
use crate::settings::SettingsStore;
use crate::store::Note;
use crate::taxonomy::{pillar_reference, Pillar};
use crate::utils::safe_truncate;

/// At most this many notes are summarized into the prompt
const CONTEXT_NOTE_LIMIT: usize = 80;
/// Per-note content preview length inside the prompt
const CONTEXT_PREVIEW: usize = 80;
/// Chat history kept for context
const HISTORY_LIMIT: usize = 10;
/// Offline search shows at most this many hits
const SEARCH_RESULT_LIMIT: usize = 5;

/// Answer a user message, remote or offline depending on configuration
pub async fn respond(
    message: &str,
    notes: &[Note],
    history: &[ChatMessage],
    settings: &SettingsStore,
) -> Result<String, String> {
    if settings.has_api_key() {
        let api_key = settings.get_api_key().unwrap_or_default();
        chat_with_context(&api_key, settings.get_model(), message, notes, history).await
    } else {
        Ok(offline_search(message, notes))
    }
}

/// Remote chat with the user's notes as context
pub async fn chat_with_context(
    api_key: &str,
    model: &str,
    message: &str,
    notes: &[Note],
    history: &[ChatMessage],
) -> Result<String, String> {
    let notes_summary = notes
        .iter()
        .take(CONTEXT_NOTE_LIMIT)
        .map(|n| {
            format!(
                "[{}/{}] \"{}\" - {}...",
                n.pillar.as_str(),
                n.category,
                n.title,
                safe_truncate(&n.content, CONTEXT_PREVIEW)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let count_for = |pillar: Pillar| notes.iter().filter(|n| n.pillar == pillar).count();

    let system_prompt = format!(
        r#"You are ThoughtSpace AI, a helpful assistant for a personal knowledge management app.
The user organizes their life into three pillars: Health, Wealth, and Wisdom.

PILLARS AND CATEGORIES:
{}

USER'S NOTES STATS:
- Health: {} notes
- Wealth: {} notes
- Wisdom: {} notes
- Total: {} notes

USER'S NOTES (sample):
{}

You can:
1. Help find specific notes by topic, pillar, or category
2. Suggest how to organize or tag notes
3. Provide insights about their knowledge distribution
4. Answer questions about their content
5. Suggest connections between notes across pillars

When referencing notes, mention their title and pillar. Be concise, friendly, and helpful."#,
        pillar_reference(),
        count_for(Pillar::Health),
        count_for(Pillar::Wealth),
        count_for(Pillar::Wisdom),
        notes.len(),
        notes_summary
    );

    let mut messages = vec![ChatMessage::system(system_prompt)];
    let skip = history.len().saturating_sub(HISTORY_LIMIT);
    messages.extend(history.iter().skip(skip).cloned());
    messages.push(ChatMessage::user(message));

    llm::call_chat(api_key, model, messages, ChatOptions { json: false, temperature: Some(0.5) })
        .await
}

/// Keyword search substitute for chat when no key is configured.
///
/// Naming a pillar in the query restricts results to it. Whole-query
/// substring matching over title/content/category comes first; if nothing
/// matches, individual query words (longer than 2 chars) are tried.
pub fn offline_search(query: &str, notes: &[Note]) -> String {
    let q = query.to_lowercase();

    let pillar_mentioned = Pillar::ALL
        .iter()
        .copied()
        .find(|p| q.contains(p.as_str()) || q.contains(&p.display_name().to_lowercase()));

    let scoped: Vec<&Note> = notes
        .iter()
        .filter(|n| pillar_mentioned.map_or(true, |p| n.pillar == p))
        .collect();

    let matches: Vec<&Note> = scoped
        .iter()
        .copied()
        .filter(|n| {
            n.title.to_lowercase().contains(&q)
                || n.content.to_lowercase().contains(&q)
                || n.category.to_lowercase().contains(&q)
        })
        .collect();

    if matches.is_empty() {
        // Word-level fallback
        let words: Vec<&str> = q.split_whitespace().filter(|w| w.len() > 2).collect();
        let word_matches: Vec<&Note> = scoped
            .iter()
            .copied()
            .filter(|n| {
                let text =
                    format!("{} {} {}", n.title, n.content, n.category).to_lowercase();
                words.iter().any(|w| text.contains(w))
            })
            .collect();

        if word_matches.is_empty() {
            return format!(
                "No notes found matching \"{}\". Try different keywords or add an API key in Settings for smarter search.",
                query
            );
        }

        return format!(
            "Found {} related note{}:\n\n{}",
            word_matches.len(),
            if word_matches.len() > 1 { "s" } else { "" },
            format_hits(&word_matches)
        );
    }

    let mut out = format!(
        "Found {} note{} matching \"{}\":\n\n{}",
        matches.len(),
        if matches.len() > 1 { "s" } else { "" },
        query,
        format_hits(&matches)
    );
    if matches.len() > SEARCH_RESULT_LIMIT {
        out.push_str(&format!("\n\n...and {} more.", matches.len() - SEARCH_RESULT_LIMIT));
    }
    out
}

fn format_hits(hits: &[&Note]) -> String {
    hits.iter()
        .take(SEARCH_RESULT_LIMIT)
        .map(|n| format!("- \"{}\" ({} {})", n.title, n.pillar.emoji(), n.category))
        .collect::<Vec<_>>()
        .join("\n")
}
