//! Card generators.

use crate::models::{Flashcard, StudyRequest};

/// Trait for turning a study request into cards.
pub trait CardGenerator: Send + Sync {
    /// Generator name.
    fn name(&self) -> &str;

    /// Produce the card sequence for a request.
    fn generate(&self, request: &StudyRequest) -> Vec<Flashcard>;
}

/// Fixed demonstration set. Ignores the request entirely.
#[derive(Debug, Default)]
pub struct DemoGenerator;

impl CardGenerator for DemoGenerator {
    fn name(&self) -> &str {
        "Demo"
    }

    fn generate(&self, _request: &StudyRequest) -> Vec<Flashcard> {
        vec![
            Flashcard::new("Madrid", "Capitale della Spagna"),
            Flashcard::new(
                "Fotosintesi",
                "Processo mediante cui le piante producono energia",
            ),
            Flashcard::new("1789", "Anno della Rivoluzione Francese"),
        ]
    }
}

/// Get generator by name.
pub fn get_generator(name: &str) -> Box<dyn CardGenerator> {
    match name.to_lowercase().as_str() {
        "demo" => Box::new(DemoGenerator),
        other => {
            tracing::warn!(generator = other, "unknown generator, falling back to demo");
            Box::new(DemoGenerator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;

    #[test]
    fn test_demo_ignores_request() {
        let generator = DemoGenerator;
        let empty = generator.generate(&StudyRequest::default());
        let filled = generator.generate(&StudyRequest {
            topic: "verbi spagnoli".to_string(),
            material: "hablar, comer, vivir".to_string(),
            subject: Subject::Language,
        });
        assert_eq!(empty, filled);
        assert_eq!(empty.len(), 3);
        assert_eq!(empty[0].front, "Madrid");
        assert_eq!(empty[1].front, "Fotosintesi");
        assert_eq!(empty[2].front, "1789");
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(get_generator("demo").name(), "Demo");
        assert_eq!(get_generator("gpt").name(), "Demo");
    }
}
