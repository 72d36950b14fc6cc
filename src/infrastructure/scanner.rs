use crate::domain::ports::BadgeScanner;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

/// Line-based input shared between a command loop and a [`PromptScanner`].
pub type SharedInput<R> = Arc<AsyncMutex<R>>;

/// Reads badge codes typed (or emitted by a keyboard-wedge scanner) on a line-based input.
///
/// End of input or an empty line counts as a failed capture.
pub struct PromptScanner<R> {
    input: SharedInput<R>,
    prompt: String,
}

impl<R> PromptScanner<R> {
    pub fn new(input: SharedInput<R>) -> Self {
        Self {
            input,
            prompt: "Badge: ".to_string(),
        }
    }

    pub fn from_reader(input: R) -> Self {
        Self::new(Arc::new(AsyncMutex::new(input)))
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

#[async_trait]
impl<R> BadgeScanner for PromptScanner<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn capture(&self) -> Option<String> {
        eprint!("{}", self.prompt);
        let mut line = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => {
                let code = line.trim().to_string();
                (!code.is_empty()).then_some(code)
            }
            Err(err) => {
                debug!(error = %err, "badge capture failed");
                None
            }
        }
    }
}

/// Replays a fixed sequence of captures; exhausted scripts fail the capture.
#[derive(Default)]
pub struct ScriptedScanner {
    captures: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedScanner {
    pub fn new<I, S>(captures: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            captures: Mutex::new(captures.into_iter().map(|c| c.map(Into::into)).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Option<String>>> {
        self.captures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BadgeScanner for ScriptedScanner {
    async fn capture(&self) -> Option<String> {
        self.lock().pop_front().flatten()
    }
}
