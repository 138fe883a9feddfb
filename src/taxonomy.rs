// =============================================================================
// Three Pillars Taxonomy
// =============================================================================
//
// Static definition of the three life pillars (health, wealth, wisdom), their
// fixed categories, classification keyword lexicons, and canvas anchor points.
// Pure data: nothing here mutates after process start.

use serde::{Deserialize, Serialize};

use crate::layout::Point;

/// The three fixed top-level life domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    Health,
    Wealth,
    Wisdom,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::Health, Pillar::Wealth, Pillar::Wisdom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pillar::Health => "health",
            Pillar::Wealth => "wealth",
            Pillar::Wisdom => "wisdom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "health" => Some(Pillar::Health),
            "wealth" => Some(Pillar::Wealth),
            "wisdom" => Some(Pillar::Wisdom),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Pillar::Health => "Health",
            Pillar::Wealth => "Wealth",
            Pillar::Wisdom => "Wisdom",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Pillar::Health => "\u{1F331}",  // seedling
            Pillar::Wealth => "\u{1F48E}",  // gem
            Pillar::Wisdom => "\u{1F4DA}",  // books
        }
    }

    /// The six fixed sub-categories of this pillar, in display order.
    /// The first entry doubles as the fallback category for validation.
    pub fn categories(&self) -> &'static [&'static str; 6] {
        match self {
            Pillar::Health => &[
                "Fitness & Movement",
                "Nutrition & Cooking",
                "Mental Wellness",
                "Sleep & Recovery",
                "Medical & Healthcare",
                "Habits & Routines",
            ],
            Pillar::Wealth => &[
                "Career & Work Projects",
                "Skills & Professional Development",
                "Income & Earnings",
                "Investments & Assets",
                "Budgeting & Expenses",
                "Business Ideas & Entrepreneurship",
            ],
            Pillar::Wisdom => &[
                "Technical Learning",
                "Books & Reading",
                "Creative Projects",
                "Life Philosophy",
                "Productivity & Systems",
                "Random Ideas & Curiosities",
            ],
        }
    }

    /// Lowercase keyword lexicon used only by the offline classifier
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Pillar::Health => &[
                "workout", "nutrition", "sleep", "health", "therapy", "meditation",
                "fitness", "recipe", "diet", "wellness", "exercise", "yoga", "gym",
                "meal", "cooking", "recovery", "habits", "routine", "doctor", "medical",
            ],
            Pillar::Wealth => &[
                "career", "salary", "investment", "stock", "business", "income",
                "budget", "project", "work", "meeting", "startup", "savings",
                "expense", "money", "finance", "crypto", "portfolio", "job",
            ],
            Pillar::Wisdom => &[
                "learn", "tutorial", "course", "book", "philosophy", "creative",
                "idea", "design", "code", "programming", "art", "writing", "reading",
                "study", "knowledge", "skill", "pattern",
            ],
        }
    }

    /// Fixed canvas anchor for this pillar (triangle formation)
    pub fn anchor(&self) -> Point {
        match self {
            Pillar::Health => Point { x: -600.0, y: 0.0 },
            Pillar::Wealth => Point { x: 0.0, y: -400.0 },
            Pillar::Wisdom => Point { x: 600.0, y: 0.0 },
        }
    }
}

/// Render the pillar/category reference block embedded in LLM prompts.
///
/// Format: `{emoji} {Name} ({key}): {categories joined by ", "}` per line.
pub fn pillar_reference() -> String {
    Pillar::ALL
        .iter()
        .map(|p| {
            format!(
                "{} {} ({}): {}",
                p.emoji(),
                p.display_name(),
                p.as_str(),
                p.categories().join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
