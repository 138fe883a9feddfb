// =============================================================================
// Notes Store
// =============================================================================
//
// Canonical note collection plus derived category aggregates. Aggregates are
// rebuilt in full after every mutation, so readers always see a state that
// matches the committed note list — there is no incremental patching and no
// partially updated aggregate is ever observable.
//
// The store does not re-validate pillar/category: the classifier guarantees
// taxonomic validity for pipeline-created notes, and direct callers are
// expected to supply already-valid data.

use serde::{Deserialize, Serialize};

use crate::layout::{category_anchor, Point};
use crate::taxonomy::Pillar;

/// Where a note's content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Markdown,
    Screenshot,
    Pdf,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Text => "text",
            SourceKind::Markdown => "markdown",
            SourceKind::Screenshot => "screenshot",
            SourceKind::Pdf => "pdf",
        }
    }
}

/// Optional per-note metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A committed note in the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source_kind: SourceKind,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds, always >= created_at
    pub updated_at: i64,
    pub pillar: Pillar,
    /// Always a member of `pillar.categories()` — enforced upstream by the
    /// classifier's validation, never here
    pub category: String,
    pub tags: Vec<String>,
    pub position: Point,
    pub metadata: NoteMetadata,
}

/// Partial fields for `NotesStore::update`. `id` is immutable.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub pillar: Option<Pillar>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub position: Option<Point>,
    pub metadata: Option<NoteMetadata>,
}

/// Derived summary of the notes in one (pillar, category) cell.
/// Never mutated directly — rebuilt from scratch on every store mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub id: String,
    pub name: String,
    pub pillar: Pillar,
    pub note_count: usize,
    /// Static anchor around the pillar, independent of note contents
    pub position: Point,
    pub note_ids: Vec<String>,
    /// Max `updated_at` over members; None while empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

/// Aggregate id: `{pillar}-{category-slug}`
fn category_id(pillar: Pillar, category: &str) -> String {
    format!("{}-{}", pillar.as_str(), category.to_lowercase().replace(' ', "-"))
}

/// The canonical note collection.
///
/// Owned explicitly and passed into collaborators — mutation only goes
/// through the operations below.
#[derive(Debug, Default)]
pub struct NotesStore {
    notes: Vec<Note>,
    categories: Vec<CategoryAggregate>,
}

impl NotesStore {
    pub fn new() -> Self {
        let mut store = Self { notes: Vec::new(), categories: Vec::new() };
        store.rebuild_categories();
        store
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn all(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn categories(&self) -> &[CategoryAggregate] {
        &self.categories
    }

    pub fn add(&mut self, note: Note) {
        self.notes.push(note);
        self.rebuild_categories();
    }

    pub fn update(&mut self, id: &str, updates: NoteUpdate) -> Result<(), String> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| format!("Note not found: {}", id))?;

        if let Some(title) = updates.title {
            note.title = title;
        }
        if let Some(content) = updates.content {
            note.content = content;
        }
        if let Some(pillar) = updates.pillar {
            note.pillar = pillar;
        }
        if let Some(category) = updates.category {
            note.category = category;
        }
        if let Some(tags) = updates.tags {
            note.tags = tags;
        }
        if let Some(position) = updates.position {
            note.position = position;
        }
        if let Some(metadata) = updates.metadata {
            note.metadata = metadata;
        }
        note.updated_at = chrono::Utc::now().timestamp_millis().max(note.created_at);

        self.rebuild_categories();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Note, String> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| format!("Note not found: {}", id))?;
        let removed = self.notes.remove(index);
        self.rebuild_categories();
        Ok(removed)
    }

    /// Recompute all 18 aggregates from the current note list. Called
    /// synchronously at the end of every mutation.
    fn rebuild_categories(&mut self) {
        let mut categories: Vec<CategoryAggregate> = Vec::with_capacity(18);

        for pillar in Pillar::ALL {
            let names = pillar.categories();
            for (index, name) in names.iter().enumerate() {
                categories.push(CategoryAggregate {
                    id: category_id(pillar, name),
                    name: name.to_string(),
                    pillar,
                    note_count: 0,
                    position: category_anchor(pillar, index, names.len()),
                    note_ids: Vec::new(),
                    last_updated: None,
                });
            }
        }

        for note in &self.notes {
            let id = category_id(note.pillar, &note.category);
            if let Some(aggregate) = categories.iter_mut().find(|c| c.id == id) {
                aggregate.note_count += 1;
                aggregate.note_ids.push(note.id.clone());
                aggregate.last_updated = Some(
                    aggregate.last_updated.map_or(note.updated_at, |t| t.max(note.updated_at)),
                );
            }
        }

        self.categories = categories;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note(id: &str, pillar: Pillar, category: &str, updated_at: i64) -> Note {
        Note {
            id: id.to_string(),
            title: format!("note {}", id),
            content: "content".to_string(),
            source_kind: SourceKind::Text,
            created_at: updated_at,
            updated_at,
            pillar,
            category: category.to_string(),
            tags: vec![],
            position: Point::default(),
            metadata: NoteMetadata::default(),
        }
    }

    /// Aggregate counts must equal the note total and every note must land
    /// in exactly one aggregate's member list.
    fn assert_aggregates_consistent(store: &NotesStore) {
        let total: usize = store.categories().iter().map(|c| c.note_count).sum();
        assert_eq!(total, store.len());

        for note in store.all() {
            let holders = store
                .categories()
                .iter()
                .filter(|c| c.note_ids.contains(&note.id))
                .count();
            assert_eq!(holders, 1, "note {} in {} aggregates", note.id, holders);
        }

        for aggregate in store.categories() {
            assert_eq!(aggregate.note_count, aggregate.note_ids.len());
        }
    }

    #[test]
    fn test_empty_store_has_all_eighteen_aggregates() {
        let store = NotesStore::new();
        assert_eq!(store.categories().len(), 18);
        assert!(store.categories().iter().all(|c| c.note_count == 0));
        assert!(store.categories().iter().all(|c| c.last_updated.is_none()));
    }

    #[test]
    fn test_aggregates_consistent_over_mutation_sequence() {
        let mut store = NotesStore::new();
        assert_aggregates_consistent(&store);

        store.add(sample_note("a", Pillar::Health, "Mental Wellness", 100));
        assert_aggregates_consistent(&store);

        store.add(sample_note("b", Pillar::Health, "Mental Wellness", 200));
        assert_aggregates_consistent(&store);

        store.add(sample_note("c", Pillar::Wealth, "Income & Earnings", 300));
        assert_aggregates_consistent(&store);

        store
            .update("a", NoteUpdate { title: Some("renamed".to_string()), ..Default::default() })
            .unwrap();
        assert_aggregates_consistent(&store);
        assert_eq!(store.get("a").unwrap().title, "renamed");

        store.remove("b").unwrap();
        assert_aggregates_consistent(&store);

        store.remove("a").unwrap();
        store.remove("c").unwrap();
        assert_aggregates_consistent(&store);
        assert!(store.is_empty());
    }

    #[test]
    fn test_last_updated_is_max_over_members() {
        let mut store = NotesStore::new();
        store.add(sample_note("a", Pillar::Wisdom, "Books & Reading", 100));
        store.add(sample_note("b", Pillar::Wisdom, "Books & Reading", 500));
        store.add(sample_note("c", Pillar::Wisdom, "Books & Reading", 300));

        let aggregate = store
            .categories()
            .iter()
            .find(|c| c.id == "wisdom-books-&-reading")
            .unwrap();
        assert_eq!(aggregate.note_count, 3);
        assert_eq!(aggregate.last_updated, Some(500));
    }

    #[test]
    fn test_update_moves_note_between_aggregates() {
        let mut store = NotesStore::new();
        store.add(sample_note("a", Pillar::Health, "Fitness & Movement", 100));

        store
            .update(
                "a",
                NoteUpdate {
                    pillar: Some(Pillar::Wisdom),
                    category: Some("Life Philosophy".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_aggregates_consistent(&store);
        let old = store.categories().iter().find(|c| c.id == "health-fitness-&-movement").unwrap();
        let new = store.categories().iter().find(|c| c.id == "wisdom-life-philosophy").unwrap();
        assert_eq!(old.note_count, 0);
        assert_eq!(new.note_count, 1);
    }

    #[test]
    fn test_update_bumps_updated_at_and_keeps_id() {
        let mut store = NotesStore::new();
        store.add(sample_note("a", Pillar::Health, "Mental Wellness", 100));
        store
            .update("a", NoteUpdate { content: Some("new".to_string()), ..Default::default() })
            .unwrap();

        let note = store.get("a").unwrap();
        assert_eq!(note.id, "a");
        assert!(note.updated_at >= note.created_at);
        assert!(note.updated_at > 100);
    }

    #[test]
    fn test_update_missing_note_errors() {
        let mut store = NotesStore::new();
        assert!(store.update("ghost", NoteUpdate::default()).is_err());
        assert!(store.remove("ghost").is_err());
    }

    #[test]
    fn test_aggregate_positions_are_static() {
        let mut store = NotesStore::new();
        let before: Vec<Point> = store.categories().iter().map(|c| c.position).collect();
        store.add(sample_note("a", Pillar::Wealth, "Career & Work Projects", 100));
        let after: Vec<Point> = store.categories().iter().map(|c| c.position).collect();
        assert_eq!(before, after);
    }
}
