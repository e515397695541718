//! One prompt-box session: recall history, commit a prompt, hand the reply on.

use thiserror::Error;
use tracing::info;

use crate::{
    history::{HistoryCursor, HistoryError, HistoryStore},
    inject::InputInjector,
    llm::{ChatError, ChatOpts, Message, ModelClient},
};

pub const COMMAND_INSTRUCTION: &str =
    "Provide only the CLI command to solve the following. Dont use code block, just the command: ";

/// How the interactive part of a session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Commit(String),
    Abandon,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("completion failed: {0}")]
    Service(#[from] ChatError),
}

pub struct Session<C> {
    store: HistoryStore,
    client: C,
    opts: ChatOpts,
}

impl<C: ModelClient> Session<C> {
    pub fn new(store: HistoryStore, client: C, opts: ChatOpts) -> Self {
        Self {
            store,
            client,
            opts,
        }
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn cursor(&self) -> Result<HistoryCursor, HistoryError> {
        HistoryCursor::from_store(&self.store)
    }

    /// Records the prompt, asks the model for a command and types the reply.
    ///
    /// The prompt is used exactly as typed; an empty one is simply not stored.
    /// History failures abort before anything is sent.
    pub async fn commit<I>(&self, prompt: &str, injector: &mut I) -> Result<String, SessionError>
    where
        I: InputInjector + ?Sized,
    {
        self.store.append(prompt)?;

        info!(target: "session", "query model={} prompt_len={}", self.opts.model, prompt.len());
        let msgs = [Message::user(format!("{COMMAND_INSTRUCTION}{prompt}"))];
        let reply = self.client.send_chat(&msgs, &self.opts).await?;
        // A trailing newline would submit the command in the target shell.
        let command = reply.text.trim_end_matches(['\r', '\n']);
        info!(target: "session", "typing reply len={} finish_reason={:?}", command.len(), reply.finish_reason);
        injector.type_text(command);
        Ok(command.to_string())
    }
}
