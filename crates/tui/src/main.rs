mod app;
mod events;
mod inject;
mod logging;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::{Context, Result};
use kk_core::{
    config::{FileConfig, HistoryConfig},
    history::HistoryStore,
    session::{Outcome, Session},
};
use providers::openai::{OpenAiClient, OpenAiConfig};
use terminal::TerminalGuard;
use tracing::{error, info};

fn main() -> Result<()> {
    let _log_guard = logging::init();
    let res = run();
    if let Err(e) = &res {
        error!(target: "tui", "fatal: {:#}", e);
    }
    res
}

fn run() -> Result<()> {
    let file = FileConfig::load()?;
    let ai_cfg = OpenAiConfig::from_env_and_file(&file)?;
    let client = OpenAiClient::new(ai_cfg.clone()).context("build http client")?;

    let history = HistoryConfig::resolve(&file);
    info!(target: "tui", "history file {} (max {})", history.path.display(), history.max_records);
    let session = Session::new(HistoryStore::new(history), client, ai_cfg.chat_opts());
    let cursor = session.cursor().context("load prompt history")?;

    let outcome = {
        let mut term = TerminalGuard::new()?;
        let mut app = app::App::new(cursor);
        let res = events::run(&mut term.terminal, &mut app);
        term.restore().context("restore terminal")?;
        res?
    };

    let prompt = match outcome {
        Outcome::Commit(p) => p,
        Outcome::Abandon => return Ok(()),
    };

    let mut injector = inject::from_env();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start runtime")?;
    rt.block_on(session.commit(&prompt, injector.as_mut()))?;
    Ok(())
}
