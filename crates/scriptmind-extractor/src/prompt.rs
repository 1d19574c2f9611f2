//! Prompt engineering for per-category memory extraction

use scriptmind_domain::Category;

/// Builds the prompt and system message for one (chunk, category) call
pub struct PromptBuilder<'a> {
    category: Category,
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for `text`
    pub fn new(category: Category, text: &'a str) -> Self {
        Self { category, text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(self.text.len() + 1500);

        // 1. Instructions for the category
        prompt.push_str(instructions(self.category));
        prompt.push_str("\n\n");

        // 2. The text to analyze, verbatim
        prompt.push_str("Script excerpt:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        // 3. Output format reminder
        prompt.push_str("Output format (a single JSON object only, no additional text):\n");
        prompt.push_str(schema(self.category));

        prompt
    }

    /// System message constraining the reply to the category's schema
    pub fn system_message(&self) -> String {
        format!(
            "You extract structured memories from movie scripts. Respond only with JSON matching this schema: {}",
            schema_compact(self.category)
        )
    }
}

fn instructions(category: Category) -> &'static str {
    match category {
        Category::Semantic => SEMANTIC_INSTRUCTIONS,
        Category::Episodic => EPISODIC_INSTRUCTIONS,
        Category::Procedural => PROCEDURAL_INSTRUCTIONS,
    }
}

fn schema(category: Category) -> &'static str {
    match category {
        Category::Semantic => SEMANTIC_SCHEMA,
        Category::Episodic => EPISODIC_SCHEMA,
        Category::Procedural => PROCEDURAL_SCHEMA,
    }
}

fn schema_compact(category: Category) -> String {
    schema(category).split_whitespace().collect::<Vec<_>>().join(" ")
}

const SEMANTIC_INSTRUCTIONS: &str = r#"Extract SEMANTIC memory from the movie script excerpt below:
general knowledge about the story world that stays true regardless of when it is shown.

Rules:
- facts: standalone statements about characters, places, objects and relationships
- concepts: themes, ideas and motifs the excerpt explores
- character_traits: for each named character, short descriptions of personality or appearance
- world_building: setting details, technology, history, rules of the world
- One idea per entry, written as a complete sentence or short phrase
- Only include what the excerpt supports; use empty lists when nothing applies"#;

const EPISODIC_INSTRUCTIONS: &str = r#"Extract EPISODIC memory from the movie script excerpt below:
specific events and experiences, in the order they happen.

Rules:
- events: key plot events, one per entry, in story order
- scenes: one object per scene with its location, the characters present and a one-sentence summary
- timeline: time markers and sequencing cues ("the next morning", "ten years earlier")
- turning_points: moments that change a character's situation or the direction of the story
- Only include what the excerpt supports; use empty lists when nothing applies"#;

const PROCEDURAL_INSTRUCTIONS: &str = r#"Extract PROCEDURAL memory from the movie script excerpt below:
how characters do things.

Rules:
- skills: abilities characters demonstrate ("Trinity can pilot a helicopter")
- processes: step-by-step methods, plans or rituals shown or described
- behaviors: habitual patterns in how characters act or react
- rules: rules, codes or protocols characters follow or enforce
- Only include what the excerpt supports; use empty lists when nothing applies"#;

const SEMANTIC_SCHEMA: &str = r#"{
  "facts": ["string"],
  "concepts": ["string"],
  "character_traits": {"Character Name": ["trait"]},
  "world_building": ["string"]
}"#;

const EPISODIC_SCHEMA: &str = r#"{
  "events": ["string"],
  "scenes": [{"location": "string", "characters": ["string"], "summary": "string"}],
  "timeline": ["string"],
  "turning_points": ["string"]
}"#;

const PROCEDURAL_SCHEMA: &str = r#"{
  "skills": ["string"],
  "processes": ["string"],
  "behaviors": ["string"],
  "rules": ["string"]
}"#;
