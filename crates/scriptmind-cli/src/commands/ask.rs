//! Ask command implementation.

use crate::cli::AskArgs;
use crate::commands::{build_provider, load_context};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use scriptmind_chat::MovieChatbot;

/// Execute the ask command.
pub async fn execute_ask(args: AskArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (script, memories) = load_context(&args.memories, &args.script)?;
    let provider = build_provider(&config.provider, &args.provider)?;

    let mut chatbot = MovieChatbot::new(provider);
    chatbot.set_context(&script, memories);

    let answer = chatbot.ask(&args.question).await?;
    println!("{}", formatter.answer(&answer));
    Ok(())
}
