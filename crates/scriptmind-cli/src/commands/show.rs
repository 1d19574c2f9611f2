//! Show command implementation.

use crate::cli::ShowArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use scriptmind_store::JsonFileStore;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, formatter: &Formatter) -> Result<()> {
    let document = JsonFileStore::load_document(&args.memories)?;

    if formatter.format() == OutputFormat::Table {
        if let Some(source) = &document.source {
            eprintln!("{}", formatter.info(&format!("Memories extracted from {}", source)));
        }
    }

    println!(
        "{}",
        formatter.format_memories(&document.memories, args.category.map(Into::into))?
    );
    Ok(())
}
