//! UI utilities for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Prompt shown by the line editor
pub fn prompt(nickname: &str) -> String {
    format!("{}> ", nickname)
}

/// Print output from a background task and redisplay the prompt after it
pub fn print_with_prompt(output: &str, nickname: &str) {
    print!("{}{}", output, prompt(nickname));
    std::io::stdout().flush().ok();
}

/// Spawn a dedicated thread running the line editor.
///
/// Lines arrive on the returned channel; it closes on Ctrl+C, Ctrl+D or an
/// editor error. The thread outlives reconnects so only one editor owns the terminal.
pub fn spawn_line_reader(nickname: &str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = prompt(nickname);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
