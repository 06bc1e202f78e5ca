//! FlowController - actor that owns one companion session at a time
//!
//! Every mutation of the stage, the transcript and the selections happens on
//! the actor task. Completion calls and delayed transitions run on spawned
//! tasks and post their results back tagged with the session they belong to,
//! so late results from an earlier session are dropped instead of applied.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::messages::{EntryMode, FlowCommand, FlowError, FlowEvent, FlowResponse};
use super::timer::{Transition, TransitionTimers};
use super::{DisplayState, FlowStage, InputOutcome, Navigator, Route, RouteParams, Selections, SessionId};
use crate::config::FlowConfig;
use crate::domain::{CompanionExpression, Mood, MoodCarousel, TaskCategory};
use crate::garden::GardenRegistry;
use crate::llm::ChatCompletionClient;
use crate::transcript::{ConversationTranscript, Role, Turn};

/// User turn that opens a fresh conversation
pub const START_MESSAGE: &str = "Start conversation";

/// Message shown when re-entering straight at task selection
pub const SHORTCUT_MESSAGE: &str = "Would you like to choose a new task?";

/// Text destined for one stage
#[derive(Debug, Clone)]
struct StageMessage {
    stage: FlowStage,
    text: String,
}

/// Which user action an outstanding completion answers
#[derive(Debug, Clone, Copy)]
enum PendingReply {
    Greeting,
    MoodConfirmed,
    Reflection,
    TaskChosen(TaskCategory),
}

/// Handle to send commands to the FlowController actor
#[derive(Clone)]
pub struct FlowHandle {
    tx: mpsc::Sender<FlowCommand>,
    display_rx: watch::Receiver<DisplayState>,
}

impl FlowHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> FlowCommand) -> FlowResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| FlowError::ChannelError)?;
        reply_rx.await.map_err(|_| FlowError::ChannelError)
    }

    /// Start a new session, discarding whatever the previous one had pending
    pub async fn enter(&self, mode: EntryMode) -> FlowResponse<SessionId> {
        debug!(?mode, "enter: called");
        self.request(|reply| FlowCommand::Enter { mode, reply }).await
    }

    /// The companion view gained focus with these route parameters
    ///
    /// A set skip flag is consumed and jumps to task selection. Without it a
    /// fresh session starts only if none has run yet.
    pub async fn on_focus(&self, params: &mut RouteParams) -> FlowResponse<InputOutcome> {
        let skip = params.take_skip_flag();
        debug!(%skip, "on_focus: called");
        self.request(|reply| FlowCommand::Focus { skip, reply }).await
    }

    /// The mood carousel was measured at `width`
    pub async fn layout_moods(&self, width: f64) -> FlowResponse<InputOutcome> {
        debug!(%width, "layout_moods: called");
        self.request(|reply| FlowCommand::LayoutMoods { width, reply }).await
    }

    /// The mood carousel settled at horizontal `offset`
    pub async fn scroll_moods(&self, offset: f64) -> FlowResponse<InputOutcome> {
        debug!(%offset, "scroll_moods: called");
        self.request(|reply| FlowCommand::ScrollMoods { offset, reply }).await
    }

    pub async fn highlight_mood(&self, mood: Mood) -> FlowResponse<InputOutcome> {
        debug!(%mood, "highlight_mood: called");
        self.request(|reply| FlowCommand::HighlightMood { mood, reply }).await
    }

    pub async fn confirm_mood(&self) -> FlowResponse<InputOutcome> {
        debug!("confirm_mood: called");
        self.request(|reply| FlowCommand::ConfirmMood { reply }).await
    }

    pub async fn edit_reflection(&self, text: impl Into<String>) -> FlowResponse<InputOutcome> {
        let text = text.into();
        debug!(len = text.len(), "edit_reflection: called");
        self.request(|reply| FlowCommand::EditReflection { text, reply }).await
    }

    pub async fn submit_reflection(&self) -> FlowResponse<InputOutcome> {
        debug!("submit_reflection: called");
        self.request(|reply| FlowCommand::SubmitReflection { reply }).await
    }

    pub async fn select_task(&self, category: TaskCategory) -> FlowResponse<InputOutcome> {
        debug!(%category, "select_task: called");
        self.request(|reply| FlowCommand::SelectTask { category, reply }).await
    }

    /// Display state as the actor sees it right now
    pub async fn snapshot(&self) -> FlowResponse<DisplayState> {
        self.request(|reply| FlowCommand::Snapshot { reply }).await
    }

    /// Copy of the current session's transcript
    pub async fn transcript(&self) -> FlowResponse<Vec<Turn>> {
        self.request(|reply| FlowCommand::Transcript { reply }).await
    }

    /// Last published display state, without a round trip
    pub fn current(&self) -> DisplayState {
        self.display_rx.borrow().clone()
    }

    /// Receiver that is notified on every display change
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display_rx.clone()
    }

    /// Wait until the published display state satisfies `predicate`
    pub async fn wait_for(&self, predicate: impl FnMut(&DisplayState) -> bool) -> FlowResponse<DisplayState> {
        let mut rx = self.display_rx.clone();
        let state = rx.wait_for(predicate).await.map_err(|_| FlowError::ChannelError)?;
        Ok(state.clone())
    }

    /// Wait until a session is running with nothing in flight or scheduled
    pub async fn wait_until_settled(&self) -> FlowResponse<DisplayState> {
        self.wait_for(|s| s.session.is_some() && s.is_settled()).await
    }

    /// Shutdown the controller
    pub async fn shutdown(&self) -> FlowResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(FlowCommand::Shutdown)
            .await
            .map_err(|_| FlowError::ChannelError)
    }
}

/// Actor state for the guided companion flow
pub struct FlowController {
    config: FlowConfig,
    system_prompt: String,
    chat: ChatCompletionClient,
    garden: GardenRegistry,
    navigator: Arc<dyn Navigator>,

    events_tx: mpsc::Sender<FlowEvent>,
    display_tx: watch::Sender<DisplayState>,
    timers: TransitionTimers,

    last_session: u64,
    session: Option<SessionId>,
    stage: FlowStage,
    message: Option<StageMessage>,
    selections: Selections,
    carousel: MoodCarousel,
    transcript: ConversationTranscript,
    pending: Option<PendingReply>,
    transition_pending: bool,
    handed_off: bool,
    warned_long_transcript: bool,
}

impl FlowController {
    /// Spawn the controller actor and return a handle to it
    ///
    /// No session is started until the handle enters the flow.
    pub fn spawn(
        config: FlowConfig,
        system_prompt: String,
        chat: ChatCompletionClient,
        garden: GardenRegistry,
        navigator: Arc<dyn Navigator>,
    ) -> FlowHandle {
        debug!(
            display_delay_ms = config.display_delay_ms,
            final_delay_ms = config.final_delay_ms,
            "spawn: called"
        );
        let (tx, rx) = mpsc::channel(64);
        let (events_tx, events_rx) = mpsc::channel(64);
        let (display_tx, display_rx) = watch::channel(DisplayState::idle());

        let controller = Self {
            config,
            system_prompt,
            chat,
            garden,
            navigator,
            events_tx,
            display_tx,
            timers: TransitionTimers::new(),
            last_session: 0,
            session: None,
            stage: FlowStage::Loading,
            message: None,
            selections: Selections::default(),
            carousel: MoodCarousel::default(),
            transcript: ConversationTranscript::new(),
            pending: None,
            transition_pending: false,
            handed_off: false,
            warned_long_transcript: false,
        };
        tokio::spawn(controller.run(rx, events_rx));

        info!("FlowController spawned");
        FlowHandle { tx, display_rx }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<FlowCommand>, mut events: mpsc::Receiver<FlowEvent>) {
        debug!("run: started");
        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(FlowCommand::Shutdown) | None => {
                        info!("FlowController shutting down");
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                },
                Some(event) = events.recv() => self.handle_event(event).await,
            }
        }
        self.timers.cancel_all();
        debug!("FlowController actor stopped");
    }

    fn handle_command(&mut self, cmd: FlowCommand) {
        match cmd {
            FlowCommand::Enter { mode, reply } => {
                let session = self.start_session(mode);
                let _ = reply.send(session);
            }
            FlowCommand::Focus { skip, reply } => {
                let outcome = if skip {
                    self.start_session(EntryMode::SkipToTaskSelect);
                    InputOutcome::Applied
                } else if self.session.is_none() {
                    self.start_session(EntryMode::Fresh);
                    InputOutcome::Applied
                } else {
                    debug!("handle_command: focus without skip flag, session already running");
                    InputOutcome::Ignored
                };
                let _ = reply.send(outcome);
            }
            FlowCommand::LayoutMoods { width, reply } => {
                let _ = reply.send(self.layout_moods(width));
            }
            FlowCommand::ScrollMoods { offset, reply } => {
                let _ = reply.send(self.scroll_moods(offset));
            }
            FlowCommand::HighlightMood { mood, reply } => {
                let _ = reply.send(self.highlight_mood(mood));
            }
            FlowCommand::ConfirmMood { reply } => {
                let _ = reply.send(self.confirm_mood());
            }
            FlowCommand::EditReflection { text, reply } => {
                let _ = reply.send(self.edit_reflection(text));
            }
            FlowCommand::SubmitReflection { reply } => {
                let _ = reply.send(self.submit_reflection());
            }
            FlowCommand::SelectTask { category, reply } => {
                let _ = reply.send(self.select_task(category));
            }
            FlowCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            FlowCommand::Transcript { reply } => {
                let _ = reply.send(self.transcript.as_ordered_sequence().to_vec());
            }
            FlowCommand::Shutdown => {}
        }
    }

    async fn handle_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::CompletionArrived { session, reply } => self.on_completion(session, reply).await,
            FlowEvent::TransitionDue { session, transition } => self.on_transition(session, transition),
        }
    }

    // === Session lifecycle ===

    fn start_session(&mut self, mode: EntryMode) -> SessionId {
        let cancelled = self.timers.cancel_all();
        self.last_session += 1;
        let session = SessionId(self.last_session);
        info!(%session, ?mode, cancelled, "Session started");

        self.session = Some(session);
        self.transcript = ConversationTranscript::started(self.system_prompt.clone());
        self.selections = Selections::default();
        self.message = None;
        self.pending = None;
        self.transition_pending = false;
        self.handed_off = false;
        self.warned_long_transcript = false;

        match mode {
            EntryMode::Fresh => {
                self.stage = FlowStage::Loading;
                self.ask(session, START_MESSAGE.to_string(), PendingReply::Greeting);
            }
            EntryMode::SkipToTaskSelect => {
                self.stage = FlowStage::TaskSelect;
                self.message = Some(StageMessage {
                    stage: FlowStage::TaskSelect,
                    text: SHORTCUT_MESSAGE.to_string(),
                });
            }
        }

        self.publish();
        session
    }

    /// Append a user turn and request the model's reply in the background
    fn ask(&mut self, session: SessionId, content: String, pending: PendingReply) -> InputOutcome {
        debug!(%session, ?pending, "ask: called");
        if let Err(e) = self.transcript.append(Role::User, content) {
            warn!(error = %e, "ask: could not append user turn");
            return InputOutcome::Ignored;
        }
        self.check_transcript_length();
        self.pending = Some(pending);

        let turns = self.transcript.as_ordered_sequence().to_vec();
        let chat = self.chat.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let reply = chat.complete(&turns).await;
            let _ = events.send(FlowEvent::CompletionArrived { session, reply }).await;
        });
        InputOutcome::Applied
    }

    async fn on_completion(&mut self, session: SessionId, reply: String) {
        if self.session != Some(session) {
            debug!(%session, current = ?self.session, "on_completion: dropping reply for stale session");
            return;
        }
        let Some(pending) = self.pending.take() else {
            debug!(%session, "on_completion: no reply was expected");
            return;
        };
        debug!(%session, ?pending, "on_completion: called");

        if let Err(e) = self.transcript.append(Role::Assistant, reply.clone()) {
            warn!(error = %e, "on_completion: could not append assistant turn");
        }
        self.check_transcript_length();

        match pending {
            PendingReply::Greeting => {
                self.show(FlowStage::MoodSelect, reply);
                self.schedule(session, self.config.display_delay(), Transition::Reveal(FlowStage::MoodSelect));
            }
            PendingReply::MoodConfirmed => {
                self.show(FlowStage::MoodWrite, reply);
                self.enter_stage(FlowStage::MoodWrite);
            }
            PendingReply::Reflection => {
                self.show(FlowStage::TaskSelect, reply);
                self.schedule(session, self.config.display_delay(), Transition::Reveal(FlowStage::TaskSelect));
            }
            PendingReply::TaskChosen(category) => {
                match self.garden.add_seed(category).await {
                    Ok(seed) => self.selections.seed = Some(seed.id),
                    Err(e) => warn!(error = %e, %category, "on_completion: failed to plant seed"),
                }
                self.show(FlowStage::FinalMessage, reply);
                self.enter_stage(FlowStage::FinalMessage);
                self.schedule(session, self.config.final_delay(), Transition::HandOff);
            }
        }

        self.publish();
    }

    fn on_transition(&mut self, session: SessionId, transition: Transition) {
        if self.session != Some(session) {
            debug!(%session, ?transition, "on_transition: ignoring timer from stale session");
            return;
        }
        debug!(%session, ?transition, "on_transition: called");
        self.transition_pending = false;

        match transition {
            Transition::Reveal(stage) => self.enter_stage(stage),
            Transition::HandOff => {
                if self.handed_off {
                    debug!("on_transition: already handed off");
                } else {
                    self.handed_off = true;
                    info!(%session, "Handing off to garden view");
                    self.navigator.navigate(Route::Garden);
                }
            }
        }

        self.publish();
    }

    fn schedule(&mut self, session: SessionId, delay: Duration, transition: Transition) {
        self.transition_pending = true;
        self.timers.schedule(self.events_tx.clone(), session, delay, transition);
    }

    fn enter_stage(&mut self, stage: FlowStage) {
        info!(from = %self.stage, to = %stage, "Stage changed");
        self.stage = stage;
    }

    fn show(&mut self, stage: FlowStage, text: String) {
        self.message = Some(StageMessage { stage, text });
    }

    fn check_transcript_length(&mut self) {
        let turns = self.transcript.len();
        if !self.warned_long_transcript && turns > self.config.transcript_warn_turns {
            warn!(
                turns,
                limit = self.config.transcript_warn_turns,
                "Transcript is getting long; the full history is still sent on every call"
            );
            self.warned_long_transcript = true;
        }
    }

    // === User input ===

    fn is_stage(&self, stage: FlowStage) -> bool {
        self.stage == stage && self.pending.is_none()
    }

    fn ignored(&self, input: &str) -> InputOutcome {
        debug!(input, stage = %self.stage, awaiting = self.pending.is_some(), "Input ignored");
        InputOutcome::Ignored
    }

    fn layout_moods(&mut self, width: f64) -> InputOutcome {
        self.carousel = MoodCarousel::from_layout(width);
        if !self.carousel.is_measured() {
            return self.ignored("layout_moods");
        }
        // Recentre on the default mood whenever the list is measured
        self.selections.highlighted_mood = Mood::DEFAULT;
        self.publish();
        InputOutcome::Applied
    }

    fn scroll_moods(&mut self, offset: f64) -> InputOutcome {
        if !self.is_stage(FlowStage::MoodSelect) {
            return self.ignored("scroll_moods");
        }
        match self.carousel.mood_at(offset) {
            Some(mood) => {
                if mood != self.selections.highlighted_mood {
                    self.selections.highlighted_mood = mood;
                    self.publish();
                }
                InputOutcome::Applied
            }
            None => self.ignored("scroll_moods"),
        }
    }

    fn highlight_mood(&mut self, mood: Mood) -> InputOutcome {
        if !self.is_stage(FlowStage::MoodSelect) {
            return self.ignored("highlight_mood");
        }
        self.selections.highlighted_mood = mood;
        self.publish();
        InputOutcome::Applied
    }

    fn confirm_mood(&mut self) -> InputOutcome {
        let Some(session) = self.session else {
            return self.ignored("confirm_mood");
        };
        if !self.is_stage(FlowStage::MoodSelect) {
            return self.ignored("confirm_mood");
        }
        let mood = self.selections.highlighted_mood;
        let outcome = self.ask(session, mood.id().to_string(), PendingReply::MoodConfirmed);
        if outcome.is_applied() {
            self.selections.mood = Some(mood);
            self.publish();
        }
        outcome
    }

    fn edit_reflection(&mut self, text: String) -> InputOutcome {
        if !self.is_stage(FlowStage::MoodWrite) {
            return self.ignored("edit_reflection");
        }
        self.selections.reflection = text;
        self.publish();
        InputOutcome::Applied
    }

    fn submit_reflection(&mut self) -> InputOutcome {
        let Some(session) = self.session else {
            return self.ignored("submit_reflection");
        };
        if !self.is_stage(FlowStage::MoodWrite) || self.selections.reflection.trim().is_empty() {
            return self.ignored("submit_reflection");
        }
        let text = self.selections.reflection.clone();
        let outcome = self.ask(session, text, PendingReply::Reflection);
        if outcome.is_applied() {
            self.enter_stage(FlowStage::Loading);
            self.publish();
        }
        outcome
    }

    fn select_task(&mut self, category: TaskCategory) -> InputOutcome {
        let Some(session) = self.session else {
            return self.ignored("select_task");
        };
        if !self.is_stage(FlowStage::TaskSelect) {
            return self.ignored("select_task");
        }
        let outcome = self.ask(session, category.selection_sentence(), PendingReply::TaskChosen(category));
        if outcome.is_applied() {
            self.selections.task = Some(category);
            self.publish();
        }
        outcome
    }

    // === Display ===

    fn snapshot(&self) -> DisplayState {
        let message = match &self.message {
            Some(m) if m.stage == self.stage => m.text.clone(),
            _ => self.stage.placeholder().to_string(),
        };
        DisplayState {
            session: self.session,
            stage: self.stage,
            message,
            selections: self.selections.clone(),
            expression: CompanionExpression::for_stage(self.stage, self.selections.mood),
            awaiting_reply: self.pending.is_some(),
            transition_pending: self.transition_pending,
            handed_off: self.handed_off,
        }
    }

    fn publish(&self) {
        self.display_tx.send_replace(self.snapshot());
    }
}
