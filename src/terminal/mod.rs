//! Interactive terminal driver for HeartGarden
//!
//! Stands in for the rendering and navigation layers: prints the companion's
//! display state, reads the user's choices and shows the garden.

mod navigator;
mod session;

pub use navigator::ChannelNavigator;
pub use session::{TERMINAL_CAROUSEL_WIDTH, TerminalSession, parse_index, parse_mood, parse_task, progress_bar};

use std::sync::Arc;

use eyre::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::flow::FlowController;
use crate::garden::GardenRegistry;
use crate::llm::{ChatCompletionClient, create_client};
use crate::prompts::PromptLoader;

/// Run an interactive companion session
///
/// This is the main entry point for `heartgarden chat`.
pub async fn run_interactive(config: &Config, skip_to_tasks: bool) -> Result<()> {
    config.validate()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let chat = ChatCompletionClient::from_config(llm, &config.llm);

    let system_prompt = PromptLoader::from_config(&config.companion)
        .companion_prompt(&config.companion.name)
        .context("Failed to render companion prompt")?;

    let garden = GardenRegistry::spawn();
    let (navigator, routes) = ChannelNavigator::new();
    let flow = FlowController::spawn(
        config.flow.clone(),
        system_prompt,
        chat,
        garden.clone(),
        Arc::new(navigator.clone()),
    );
    info!(companion = %config.companion.name, skip_to_tasks, "Starting terminal session");

    let mut session = TerminalSession::new(config.companion.name.clone(), flow.clone(), garden.clone(), navigator, routes);
    let result = session.run(skip_to_tasks).await;

    let _ = flow.shutdown().await;
    let _ = garden.shutdown().await;
    result
}
