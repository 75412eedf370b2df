//! Line editing for the terminal shell.
//!
//! rustyline blocks its thread while it waits for a key, so the editor lives on a
//! blocking task and the async shell asks it for one line at a time.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::sync::{mpsc, oneshot};

/// Outcome of one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Ctrl-D, closed stdin, or the reader is gone.
    Eof,
    Failed(String),
}

/// Maps a rustyline result onto a shell event.
pub fn classify(result: Result<String, ReadlineError>) -> ReadEvent {
    match result {
        Ok(line) => ReadEvent::Line(line),
        Err(ReadlineError::Interrupted) => ReadEvent::Interrupted,
        Err(ReadlineError::Eof) => ReadEvent::Eof,
        Err(e) => ReadEvent::Failed(e.to_string()),
    }
}

type Request = (String, oneshot::Sender<ReadEvent>);

/// Handle to the editor task. Dropping it ends the task after the current prompt.
pub struct LineReader {
    requests: mpsc::Sender<Request>,
}

impl LineReader {
    /// Starts the editor on a blocking task. Must be called inside a tokio runtime.
    pub fn spawn() -> Self {
        let (requests, mut incoming) = mpsc::channel::<Request>(1);

        tokio::task::spawn_blocking(move || {
            let mut editor = match Editor::<(), DefaultHistory>::new() {
                Ok(editor) => editor,
                Err(e) => {
                    tracing::error!("Failed to initialize line editor: {}", e);
                    let message = format!("line editor unavailable: {}", e);
                    while let Some((_, reply)) = incoming.blocking_recv() {
                        let _ = reply.send(ReadEvent::Failed(message.clone()));
                    }
                    return;
                }
            };

            while let Some((prompt, reply)) = incoming.blocking_recv() {
                let event = classify(editor.readline(&prompt));
                if let ReadEvent::Line(line) = &event {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        let _ = editor.add_history_entry(trimmed);
                    }
                }
                if reply.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!("Line editor stopped");
        });

        Self { requests }
    }

    /// Shows `prompt` and waits for the user's line.
    pub async fn read_line(&self, prompt: &str) -> ReadEvent {
        let (reply, response) = oneshot::channel();
        if self.requests.send((prompt.to_string(), reply)).await.is_err() {
            return ReadEvent::Eof;
        }
        response.await.unwrap_or(ReadEvent::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_readline_results() {
        assert_eq!(
            classify(Ok("set gpa 3.2".to_string())),
            ReadEvent::Line("set gpa 3.2".to_string())
        );
        assert_eq!(classify(Err(ReadlineError::Interrupted)), ReadEvent::Interrupted);
        assert_eq!(classify(Err(ReadlineError::Eof)), ReadEvent::Eof);

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "tty gone");
        assert!(matches!(
            classify(Err(ReadlineError::Io(io))),
            ReadEvent::Failed(message) if message.contains("tty gone")
        ));
    }

    #[tokio::test]
    async fn test_dropped_editor_task_reads_as_eof() {
        let (requests, incoming) = mpsc::channel::<Request>(1);
        drop(incoming);
        let reader = LineReader { requests };
        assert_eq!(reader.read_line("> ").await, ReadEvent::Eof);
    }
}
