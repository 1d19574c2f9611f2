//! Chat command implementation.

use crate::cli::ChatArgs;
use crate::commands::{build_provider, load_context};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::repl;
use scriptmind_chat::MovieChatbot;

/// Execute the chat command.
pub async fn execute_chat(args: ChatArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (script, memories) = load_context(&args.memories, &args.script)?;
    let provider = build_provider(&config.provider, &args.provider)?;

    let mut chatbot = MovieChatbot::new(provider);
    chatbot.set_context(&script, memories);

    repl::run_chat(&mut chatbot, formatter, config.settings.history_size).await
}
