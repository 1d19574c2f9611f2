//! Interactive chat loop.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use scriptmind_chat::MovieChatbot;
use scriptmind_domain::TextGenerator;
use std::path::PathBuf;

/// One line of chat input.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Exit,
    Help,
    History,
    Clear,
    Question(&'a str),
}

/// Run the interactive chat loop until `exit` or end of input.
pub async fn run_chat<G: TextGenerator>(
    chatbot: &mut MovieChatbot<G>,
    formatter: &Formatter,
    history_size: usize,
) -> Result<()> {
    println!("{}", formatter.info("Scriptmind chat - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    // Load history
    let history_path = history_path();
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("scriptmind> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_input(line) {
                    ChatInput::Exit => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    ChatInput::Help => print_help(formatter),
                    ChatInput::History => print_history(chatbot.history(), formatter),
                    ChatInput::Clear => {
                        chatbot.clear_history();
                        println!("{}", formatter.success("Conversation cleared"));
                    }
                    ChatInput::Question(question) => match chatbot.ask(question).await {
                        Ok(answer) => {
                            println!("{}", formatter.answer(&answer));
                            println!();
                        }
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    if let Some(path) = &history_path {
        editor.save_history(path).ok();
    }

    Ok(())
}

fn parse_input(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "exit" | "quit" | "q" => ChatInput::Exit,
        "help" | "?" => ChatInput::Help,
        "history" => ChatInput::History,
        "clear" => ChatInput::Clear,
        question => ChatInput::Question(question),
    }
}

fn history_path() -> Option<PathBuf> {
    let dir = Config::dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("chat_history.txt"))
}

fn print_history(history: &[(String, String)], formatter: &Formatter) {
    if history.is_empty() {
        println!("{}", formatter.info("No questions asked yet"));
        return;
    }
    for (i, (question, answer)) in history.iter().enumerate() {
        println!("{}", formatter.info(&format!("Q{}: {}", i + 1, question)));
        println!("{}", answer.trim());
        println!();
    }
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <question>       - Ask about the movie");
    println!("  history          - Show questions and answers so far");
    println!("  clear            - Forget the conversation");
    println!("  help, ?          - Show this help");
    println!("  exit, quit, q    - Leave the chat");
    println!();
}
