//! Integration tests for HeartGarden
//!
//! These tests drive the flow controller, garden and prompt loader together
//! through the public API, with a scripted model and a recording navigator.

use std::sync::Arc;
use std::time::Duration;

use heartgarden::config::Config;
use heartgarden::domain::{Mood, TaskCategory};
use heartgarden::flow::{
    DisplayState, EntryMode, FlowController, FlowHandle, FlowStage, InputOutcome, Route, RouteParams,
};
use heartgarden::garden::GardenRegistry;
use heartgarden::llm::{ChatCompletionClient, FALLBACK_REPLY};
use heartgarden::prompts::PromptLoader;
use heartgarden::testing::{RecordingNavigator, ScriptedLlmClient, ScriptedReply, quick_flow_config};
use heartgarden::transcript::{Role, Turn};
use tempfile::TempDir;

struct App {
    flow: FlowHandle,
    garden: GardenRegistry,
    llm: Arc<ScriptedLlmClient>,
    nav: Arc<RecordingNavigator>,
    prompt: String,
}

fn app(llm: ScriptedLlmClient) -> App {
    let prompt = PromptLoader::embedded_only()
        .companion_prompt("Aegis")
        .expect("embedded prompt renders");
    let llm = Arc::new(llm);
    let chat = ChatCompletionClient::new(llm.clone(), 500, 0.7, Duration::from_millis(500));
    let garden = GardenRegistry::spawn();
    let nav = Arc::new(RecordingNavigator::new());
    let flow = FlowController::spawn(quick_flow_config(), prompt.clone(), chat, garden.clone(), nav.clone());
    App {
        flow,
        garden,
        llm,
        nav,
        prompt,
    }
}

async fn settle(flow: &FlowHandle) -> DisplayState {
    tokio::time::timeout(Duration::from_secs(3), flow.wait_until_settled())
        .await
        .expect("flow did not settle")
        .expect("flow controller stopped")
}

// =============================================================================
// Guided session
// =============================================================================

#[tokio::test]
async fn test_session_plants_seed_and_hands_off_once() {
    let app = app(ScriptedLlmClient::replying(&[
        "Hi there",
        "I'm sorry to hear that. What's been happening?",
        "That sounds heavy. Which one feels right for you to start with today?",
        "Sounds good! Let's go to our garden! 🌱",
    ]));

    let mut params = RouteParams::default();
    assert_eq!(app.flow.on_focus(&mut params).await.unwrap(), InputOutcome::Applied);

    let state = settle(&app.flow).await;
    assert_eq!(state.stage, FlowStage::MoodSelect);
    assert_eq!(state.message, "Hi there");

    app.flow.confirm_mood().await.unwrap();
    let state = settle(&app.flow).await;
    assert_eq!(state.stage, FlowStage::MoodWrite);

    app.flow.edit_reflection("I feel stuck").await.unwrap();
    app.flow.submit_reflection().await.unwrap();
    let state = settle(&app.flow).await;
    assert_eq!(state.stage, FlowStage::TaskSelect);

    app.flow.select_task(TaskCategory::Sleep).await.unwrap();
    let state = settle(&app.flow).await;
    assert_eq!(state.stage, FlowStage::FinalMessage);
    assert!(state.handed_off);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.nav.routes(), vec![Route::Garden]);

    let seeds = app.garden.list_seeds().await.unwrap();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].task_type, TaskCategory::Sleep);
    assert_eq!(seeds[0].progress, 0.0);

    // The first request carried the rendered companion prompt
    let requests = app.llm.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].messages[0], Turn::system(app.prompt.clone()));
    assert_eq!(requests[0].messages[1], Turn::user("Start conversation"));
    assert_eq!(requests[0].max_tokens, 500);

    let transcript = app.flow.transcript().await.unwrap();
    let roles: Vec<Role> = transcript.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::System,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
        ]
    );
}

#[tokio::test]
async fn test_return_from_garden_starts_new_task_round() {
    let app = app(ScriptedLlmClient::replying(&["hello", "go on", "pick one", "bye", "another good pick"]));

    app.flow.enter(EntryMode::Fresh).await.unwrap();
    settle(&app.flow).await;
    app.flow.highlight_mood(Mood::Great).await.unwrap();
    app.flow.confirm_mood().await.unwrap();
    settle(&app.flow).await;
    app.flow.edit_reflection("Better today").await.unwrap();
    app.flow.submit_reflection().await.unwrap();
    settle(&app.flow).await;
    app.flow.select_task(TaskCategory::Social).await.unwrap();
    settle(&app.flow).await;

    // Back from the garden with the shortcut flag
    let mut params = RouteParams::skip_to_task_select();
    assert_eq!(app.flow.on_focus(&mut params).await.unwrap(), InputOutcome::Applied);
    let state = app.flow.snapshot().await.unwrap();
    assert_eq!(state.stage, FlowStage::TaskSelect);
    assert_eq!(state.message, "Would you like to choose a new task?");

    app.flow.select_task(TaskCategory::Exercise).await.unwrap();
    let state = settle(&app.flow).await;
    assert_eq!(state.message, "another good pick");

    let seeds = app.garden.list_seeds().await.unwrap();
    let kinds: Vec<TaskCategory> = seeds.iter().map(|s| s.task_type).collect();
    assert_eq!(kinds, vec![TaskCategory::Social, TaskCategory::Exercise]);
    assert_ne!(seeds[0].id, seeds[1].id);
    assert_eq!(app.nav.garden_visits(), 2);
}

#[tokio::test]
async fn test_unresponsive_model_times_out_to_fallback() {
    let app = app(ScriptedLlmClient::new([
        ScriptedReply::text("too late").after(Duration::from_secs(5))
    ]));

    app.flow.enter(EntryMode::Fresh).await.unwrap();
    let state = settle(&app.flow).await;

    assert_eq!(state.stage, FlowStage::MoodSelect);
    assert_eq!(state.message, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_garden_growth_after_session() {
    let app = app(ScriptedLlmClient::replying(&["Lovely"]));

    let mut params = RouteParams::skip_to_task_select();
    app.flow.on_focus(&mut params).await.unwrap();
    app.flow.select_task(TaskCategory::Exercise).await.unwrap();
    let state = settle(&app.flow).await;

    let id = state.selections.seed.expect("seed planted");
    // One extra completion stays capped at full growth
    for _ in 0..=TaskCategory::Exercise.activities().len() {
        app.garden.record_activity_completed(&id).await.unwrap();
    }
    let seed = app.garden.get_seed(&id).await.unwrap().unwrap();
    assert!(seed.is_fully_grown());
}

// =============================================================================
// Configuration and prompts
// =============================================================================

#[test]
fn test_config_file_drives_prompt_override() {
    let temp = TempDir::new().unwrap();
    let prompt_dir = temp.path().join("prompts");
    std::fs::create_dir_all(&prompt_dir).unwrap();
    std::fs::write(
        prompt_dir.join("companion.pmt"),
        "I am {{name}}. Moods: {{#each moods}}{{this.id}} {{/each}}",
    )
    .unwrap();

    let config_path = temp.path().join("heartgarden.yml");
    std::fs::write(
        &config_path,
        format!(
            "companion:\n  name: Fern\n  prompt-dir: {}\nflow:\n  final-delay-ms: 10\n",
            prompt_dir.display()
        ),
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.companion.name, "Fern");
    assert_eq!(config.flow.final_delay_ms, 10);
    assert_eq!(config.flow.display_delay_ms, 1500);

    let prompt = PromptLoader::new(config.companion.prompt_dir.as_deref(), temp.path())
        .companion_prompt(&config.companion.name)
        .unwrap();
    assert_eq!(prompt, "I am Fern. Moods: great good okay meh bad ");
}
