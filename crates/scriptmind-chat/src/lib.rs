//! Scriptmind Chat
//!
//! Answers questions about a movie from an excerpt of its script and the
//! memories extracted from it.
//!
//! # Examples
//!
//! ```no_run
//! use scriptmind_chat::MovieChatbot;
//! use scriptmind_domain::MemorySet;
//! use scriptmind_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OllamaProvider::default_endpoint("llama3")?;
//! let mut bot = MovieChatbot::new(llm);
//! bot.set_context("FADE IN: ...", MemorySet::default());
//!
//! let answer = bot.ask("Who is Morpheus?").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use scriptmind_domain::{Category, MemorySet, TextGenerator};
use thiserror::Error;
use tracing::{debug, warn};

/// Characters of the script kept as chat context
pub const DEFAULT_CONTEXT_CHARS: usize = 3000;

/// System message for every chat call
pub const SYSTEM_MESSAGE: &str =
    "You are a knowledgeable movie assistant. Answer accurately using the provided context.";

/// Errors that can occur while chatting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// No script has been processed yet
    #[error("Please upload and process a movie script first.")]
    NoContext,

    /// The question is blank
    #[error("Question is empty")]
    EmptyQuestion,

    /// The generation service failed
    #[error("Error generating answer: {0}")]
    Generation(String),
}

/// Question answering over one processed script
pub struct MovieChatbot<G: TextGenerator> {
    generator: G,
    context_chars: usize,
    script_context: String,
    memories: Option<MemorySet>,
    history: Vec<(String, String)>,
}

impl<G: TextGenerator> MovieChatbot<G> {
    /// Create a chatbot without context
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            context_chars: DEFAULT_CONTEXT_CHARS,
            script_context: String::new(),
            memories: None,
            history: Vec::new(),
        }
    }

    /// Keep this many characters of the script as context
    pub fn with_context_chars(mut self, context_chars: usize) -> Self {
        self.context_chars = context_chars;
        self
    }

    /// Set the script and memories the answers are based on
    ///
    /// Only the first characters of the script are kept. History is left
    /// untouched.
    pub fn set_context(&mut self, script: &str, memories: MemorySet) {
        self.script_context = script.chars().take(self.context_chars).collect();
        self.memories = Some(memories);
    }

    /// Whether a script has been set
    pub fn has_context(&self) -> bool {
        self.memories.is_some()
    }

    /// The kept script excerpt
    pub fn script_context(&self) -> &str {
        &self.script_context
    }

    /// Ask a question about the movie
    ///
    /// Successful answers are appended to the history; failed calls are not.
    pub async fn ask(&mut self, question: &str) -> Result<String, ChatError> {
        let memories = self.memories.as_ref().ok_or(ChatError::NoContext)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }

        let prompt = build_prompt(&self.script_context, memories, question);
        debug!(prompt_chars = prompt.len(), "Asking chatbot question");

        let answer = self
            .generator
            .generate(&prompt, SYSTEM_MESSAGE)
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat generation failed");
                ChatError::Generation(e.to_string())
            })?;

        self.history.push((question.to_string(), answer.clone()));
        Ok(answer)
    }

    /// Questions and answers so far, oldest first
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    /// Forget the conversation, keeping the context
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

fn build_prompt(script_context: &str, memories: &MemorySet, question: &str) -> String {
    let section = |category: Category| {
        serde_json::to_string_pretty(&memories.category_json(category)).unwrap_or_else(|_| "{}".to_string())
    };

    format!(
        "Answer the question about the movie using the script excerpt and the extracted memories below.\n\
         If the context does not contain the answer, say so instead of guessing.\n\n\
         SCRIPT EXCERPT:\n{}\n\n\
         SEMANTIC MEMORY (facts, concepts, characters, world):\n{}\n\n\
         EPISODIC MEMORY (events, scenes, timeline):\n{}\n\n\
         PROCEDURAL MEMORY (skills, processes, behaviors, rules):\n{}\n\n\
         QUESTION: {}\n\n\
         ANSWER:",
        script_context,
        section(Category::Semantic),
        section(Category::Episodic),
        section(Category::Procedural),
        question
    )
}
