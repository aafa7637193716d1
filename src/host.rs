//! Synchronous console host: prompt, read a line, run a turn, print the reply.

use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::warn;

use crate::core::session::{ConversationSession, SessionError, Turn};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Printed before each read, without a trailing newline.
    pub prompt: String,
    /// Print the classified intent and matched keyword before each reply.
    pub explain: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        HostOptions {
            prompt: "You: ".to_string(),
            explain: false,
        }
    }
}

/// Summary of a finished conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranscriptStats {
    pub turns: u64,
    pub interrupted: bool,
}

/// Drive `session` until it terminates.
///
/// End of input, or a failed read, is reported to the session as
/// `Turn::Interrupted` so the farewell is still printed.
pub fn run<R: BufRead, W: Write>(
    session: &mut ConversationSession,
    mut reader: R,
    mut writer: W,
    options: &HostOptions,
) -> Result<TranscriptStats, HostError> {
    let mut stats = TranscriptStats::default();

    while session.is_active() {
        write!(writer, "{}", options.prompt)?;
        writer.flush()?;

        let mut line = String::new();
        let turn = match reader.read_line(&mut line) {
            Ok(0) => Turn::Interrupted,
            Ok(_) => Turn::Text(line),
            Err(e) => {
                warn!(error = %e, "failed to read input");
                Turn::Interrupted
            }
        };

        match &turn {
            Turn::Interrupted => {
                stats.interrupted = true;
                // Keep the farewell off the prompt line.
                writeln!(writer)?;
            }
            Turn::Text(text) if options.explain && !text.trim().is_empty() => {
                explain(session, text, &mut writer)?;
            }
            Turn::Text(_) => {}
        }

        let outcome = session.process(turn)?;
        stats.turns += 1;
        writeln!(writer, "Bot: {}", outcome.reply)?;
    }

    Ok(stats)
}

fn explain<W: Write>(
    session: &ConversationSession,
    text: &str,
    writer: &mut W,
) -> std::io::Result<()> {
    if session.is_exit_phrase(text) {
        return writeln!(writer, "[exit phrase]");
    }
    let result = session.classifier().classify_detailed(text);
    match (result.rule_index, result.keyword) {
        (Some(index), Some(keyword)) => writeln!(
            writer,
            "[intent: {}, rule {}, keyword '{}']",
            result.intent, index, keyword
        ),
        _ => writeln!(writer, "[intent: {}, no rule matched]", result.intent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    /// Yields its lines, then fails every read.
    struct FailingReader {
        inner: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl BufRead for FailingReader {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if self.inner.position() as usize >= self.inner.get_ref().len() {
                return Err(io::Error::new(io::ErrorKind::Other, "terminal went away"));
            }
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt)
        }
    }

    fn session() -> ConversationSession {
        ConversationSession::builder().seed(9).build().unwrap()
    }

    fn run_script(input: &str, options: &HostOptions) -> (TranscriptStats, String) {
        let mut session = session();
        let mut output = Vec::new();
        let stats = run(&mut session, Cursor::new(input), &mut output, options).unwrap();
        assert!(!session.is_active());
        (stats, String::from_utf8(output).unwrap())
    }

    #[test]
    fn exit_stops_reading() {
        let (stats, output) = run_script("hello\nexit\nhello again\n", &HostOptions::default());
        assert_eq!(stats.turns, 2);
        assert!(!stats.interrupted);
        assert_eq!(output.matches("Bot: ").count(), 2);
    }

    #[test]
    fn end_of_input_is_an_interruption() {
        let (stats, output) = run_script("hello\n", &HostOptions::default());
        assert_eq!(stats.turns, 2);
        assert!(stats.interrupted);
        assert!(output.ends_with("Bot: Looks like we were cut off. Goodbye!\n"));
    }

    #[test]
    fn blank_line_prompts_again() {
        let (_, output) = run_script("\nquit\n", &HostOptions::default());
        assert!(output.contains("Bot: Please say something!\n"));
    }

    #[test]
    fn explain_mode_annotates_turns() {
        let options = HostOptions {
            prompt: "> ".to_string(),
            explain: true,
        };
        let (_, output) = run_script("what's the weather\nsomething else\nbye\n", &options);
        assert!(output.contains("[intent: weather, rule 3, keyword 'weather']"));
        assert!(output.contains("[intent: default, no rule matched]"));
        assert!(output.starts_with("> "));
    }

    #[test]
    fn explain_mode_flags_exit_phrases() {
        let options = HostOptions {
            prompt: "> ".to_string(),
            explain: true,
        };
        let (stats, output) = run_script("quit\n", &options);
        assert_eq!(stats.turns, 1);
        assert!(output.contains("[exit phrase]"));
        assert!(!output.contains("no rule matched"));
    }

    #[test]
    fn read_error_is_an_interruption() {
        let mut session = session();
        let reader = FailingReader {
            inner: Cursor::new(b"hello\n".to_vec()),
        };
        let mut output = Vec::new();
        let stats = run(&mut session, reader, &mut output, &HostOptions::default()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(stats.interrupted);
        assert_eq!(stats.turns, 2);
        assert!(!session.is_active());
        assert!(output.ends_with("Bot: Looks like we were cut off. Goodbye!\n"));
    }
}
