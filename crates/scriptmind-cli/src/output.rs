//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use scriptmind_domain::{Category, MemorySet};
use scriptmind_extractor::ExtractionOutcome;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a memory set, or one category of it.
    pub fn format_memories(&self, memories: &MemorySet, category: Option<Category>) -> Result<String> {
        let categories: Vec<Category> = match category {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };

        match self.format {
            OutputFormat::Json => match category {
                Some(category) => Ok(serde_json::to_string_pretty(&memories.category_json(category))?),
                None => Ok(serde_json::to_string_pretty(memories)?),
            },
            OutputFormat::Table => Ok(self.format_memories_table(memories, &categories)),
            OutputFormat::Quiet => Ok(memory_rows(memories, &categories)
                .into_iter()
                .map(|(_, _, entry)| entry)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format memories as a table.
    fn format_memories_table(&self, memories: &MemorySet, categories: &[Category]) -> String {
        let rows = memory_rows(memories, categories);
        if rows.is_empty() {
            return self.colorize("No memories found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Category", "Field", "Entry"]);
        for (category, field, entry) in rows {
            builder.push_record([category.as_str(), field, entry.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format the result of an extraction run.
    pub fn format_summary(&self, outcome: &ExtractionOutcome) -> Result<String> {
        let metadata = &outcome.metadata;
        match self.format {
            OutputFormat::Json => {
                let items: serde_json::Map<String, Value> = Category::ALL
                    .iter()
                    .map(|c| (c.as_str().to_string(), outcome.memories.record(*c).item_count().into()))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "metadata": serde_json::to_value(metadata)?,
                    "items": items,
                }))?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Category", "Items", "Failed chunks"]);
                for category in Category::ALL {
                    let failed = metadata.failed_chunks.get(&category).copied().unwrap_or(0);
                    builder.push_record([
                        category.as_str().to_string(),
                        outcome.memories.record(category).item_count().to_string(),
                        format!("{}/{}", failed, metadata.chunk_count),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                let footer = format!(
                    "{} chunks, model {}, {:.1}s",
                    metadata.chunk_count,
                    metadata.model_name,
                    metadata.processing_time_ms as f64 / 1000.0
                );
                Ok(format!("{}\n{}", table, self.colorize(&footer, "cyan")))
            }
            OutputFormat::Quiet => Ok(Category::ALL
                .iter()
                .map(|c| format!("{} {}", c, outcome.memories.record(*c).item_count()))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a chatbot answer.
    pub fn answer(&self, answer: &str) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({ "answer": answer }).to_string(),
            _ => answer.trim().to_string(),
        }
    }

    /// Format a progress milestone.
    pub fn progress(&self, message: &str, percent: u8) -> String {
        self.colorize(&format!("[{:>3}%] {}", percent, message), "cyan")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// One `(category, field, entry)` row per displayed entry, in field order.
fn memory_rows(memories: &MemorySet, categories: &[Category]) -> Vec<(Category, &'static str, String)> {
    let mut rows = Vec::new();
    for &category in categories {
        let value = memories.category_json(category);
        for field in category.fields() {
            for entry in display_entries(&value[*field]) {
                rows.push((category, *field, entry));
            }
        }
    }
    rows
}

/// Render a field value as display lines.
fn display_entries(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(display_item).collect(),
        // Character traits: one line per character
        Value::Object(map) => map
            .iter()
            .map(|(name, traits)| format!("{}: {}", name, join_strings(traits)))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![display_item(other)],
    }
}

fn display_item(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(scene) => {
            let location = scene.get("location").and_then(Value::as_str).unwrap_or_default();
            let summary = scene.get("summary").and_then(Value::as_str).unwrap_or_default();
            let characters = scene.get("characters").map(join_strings).unwrap_or_default();
            format!("{} [{}]: {}", location, characters, summary)
        }
        other => other.to_string(),
    }
}

fn join_strings(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
