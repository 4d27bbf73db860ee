//! Data models for smart flashcards.

use serde::{Deserialize, Deserializer, Serialize};

/// A flashcard.
///
/// Cards carry no identifier; a card is addressed by its position in the
/// working sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Prompt side.
    #[serde(rename = "fronte")]
    pub front: String,
    /// Answer side.
    #[serde(rename = "retro")]
    pub back: String,
}

impl Flashcard {
    /// Create a new card.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Subject picked on the input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Mathematics,
    Science,
    History,
    Language,
    Literature,
    #[default]
    General,
}

impl Subject {
    pub const ALL: [Subject; 6] = [
        Self::Mathematics,
        Self::Science,
        Self::History,
        Self::Language,
        Self::Literature,
        Self::General,
    ];

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mathematics => "Mathematics",
            Self::Science => "Science",
            Self::History => "History",
            Self::Language => "Language",
            Self::Literature => "Literature",
            Self::General => "General",
        }
    }

    /// Next subject in the picker, wrapping around.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    /// Previous subject in the picker, wrapping around.
    pub fn prev(self) -> Self {
        let pos = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What the user asked to study.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyRequest {
    /// Topic line, e.g. "spanish verbs".
    pub topic: String,
    /// Pasted study material.
    pub material: String,
    /// Subject area.
    pub subject: Subject,
}

/// Persisted session state.
///
/// Field names on disk are fixed; any missing field reads back as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Working card sequence.
    #[serde(rename = "carte", default, deserialize_with = "null_as_empty")]
    pub cards: Vec<Flashcard>,
    /// Indices marked as known.
    #[serde(rename = "conosciute", default, deserialize_with = "null_as_empty")]
    pub known: Vec<usize>,
    /// Indices marked for review.
    #[serde(rename = "inCorso", default, deserialize_with = "null_as_empty")]
    pub in_progress: Vec<usize>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Snapshot {
    /// Whether there is anything to study.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let card = Flashcard::new("What is 2+2?", "4");
        assert_eq!(card.front, "What is 2+2?");
        assert_eq!(card.back, "4");
    }

    #[test]
    fn test_snapshot_field_names() {
        let snapshot = Snapshot {
            cards: vec![Flashcard::new("Madrid", "Capitale della Spagna")],
            known: vec![0],
            in_progress: vec![],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["carte"][0]["fronte"], "Madrid");
        assert_eq!(json["carte"][0]["retro"], "Capitale della Spagna");
        assert_eq!(json["conosciute"], serde_json::json!([0]));
        assert_eq!(json["inCorso"], serde_json::json!([]));
    }

    #[test]
    fn test_snapshot_missing_fields() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"carte":[{"fronte":"a","retro":"b"}]}"#).unwrap();
        assert_eq!(snapshot.cards.len(), 1);
        assert!(snapshot.known.is_empty());
        assert!(snapshot.in_progress.is_empty());

        let empty: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());

        let nulls: Snapshot =
            serde_json::from_str(r#"{"carte":null,"conosciute":null,"inCorso":[1]}"#).unwrap();
        assert!(nulls.cards.is_empty());
        assert!(nulls.known.is_empty());
        assert_eq!(nulls.in_progress, vec![1]);
    }

    #[test]
    fn test_subject_cycle() {
        assert_eq!(Subject::General.next(), Subject::Mathematics);
        assert_eq!(Subject::Mathematics.prev(), Subject::General);
        assert_eq!(Subject::History.next().prev(), Subject::History);
    }
}
