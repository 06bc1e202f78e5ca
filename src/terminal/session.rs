//! Terminal session: renders the flow and the garden, feeds input back

use std::time::Instant;

use colored::Colorize;
use eyre::{Result, eyre};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing::debug;

use super::ChannelNavigator;
use crate::domain::{MOOD_SNAP_INTERVAL, Mood, MoodCarousel, Seed, SeedId, TaskCategory, format_elapsed};
use crate::flow::{DisplayState, FlowHandle, FlowStage, InputOutcome, Navigator, Route, RouteParams};
use crate::garden::GardenRegistry;
use crate::transcript::Role;

/// Carousel width assumed for the terminal, a typical phone viewport
pub const TERMINAL_CAROUSEL_WIDTH: f64 = 390.0;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Which view currently owns the prompt
#[derive(Debug, Clone)]
enum View {
    Companion,
    Garden,
    Tasks {
        task_type: TaskCategory,
        seed: Option<SeedId>,
        opened: Instant,
    },
}

/// Interactive terminal session
pub struct TerminalSession {
    companion: String,
    flow: FlowHandle,
    garden: GardenRegistry,
    navigator: ChannelNavigator,
    routes: mpsc::UnboundedReceiver<Route>,
    carousel: MoodCarousel,
    view: View,
    /// Last `(stage, message)` printed, to avoid repeating it
    last_shown: Option<(FlowStage, String)>,
}

impl TerminalSession {
    pub fn new(
        companion: String,
        flow: FlowHandle,
        garden: GardenRegistry,
        navigator: ChannelNavigator,
        routes: mpsc::UnboundedReceiver<Route>,
    ) -> Self {
        Self {
            companion,
            flow,
            garden,
            navigator,
            routes,
            carousel: MoodCarousel::from_layout(TERMINAL_CAROUSEL_WIDTH),
            view: View::Companion,
            last_shown: None,
        }
    }

    /// Run the session main loop
    pub async fn run(&mut self, skip_to_tasks: bool) -> Result<()> {
        self.print_welcome();

        let mut params = if skip_to_tasks {
            RouteParams::skip_to_task_select()
        } else {
            RouteParams::default()
        };
        self.flow.on_focus(&mut params).await?;
        self.flow.layout_moods(self.carousel.width).await?;
        self.sync_views().await?;

        let mut rl = DefaultEditor::new().map_err(|e| eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await? {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    }

                    match self.view.clone() {
                        View::Companion => self.handle_companion_input(input).await?,
                        View::Garden => self.handle_garden_input(input).await?,
                        View::Tasks { task_type, seed, opened } => {
                            self.handle_tasks_input(input, task_type, seed, opened).await?
                        }
                    }
                    self.sync_views().await?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre!("Readline error: {}", err));
                }
            }
        }

        println!("See you in the garden!");
        Ok(())
    }

    fn prompt(&self) -> String {
        let label = match &self.view {
            View::Companion => self.companion.to_lowercase(),
            View::Garden => "garden".to_string(),
            View::Tasks { task_type, .. } => task_type.id().to_string(),
        };
        format!("{} ", format!("{}>", label).bright_magenta())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "HeartGarden".bright_magenta().bold());
        println!("Type {} for help, {} to leave", "/help".yellow(), "/quit".yellow());
        println!();
    }

    // === View routing ===

    /// Follow the flow until it settles and open any queued routes
    async fn sync_views(&mut self) -> Result<()> {
        loop {
            if matches!(self.view, View::Companion) {
                self.follow_flow().await?;
            }
            let mut moved = false;
            while let Ok(route) = self.routes.try_recv() {
                self.open(route).await?;
                moved = true;
            }
            if !moved {
                return Ok(());
            }
        }
    }

    /// Print every display change until nothing is in flight or scheduled
    async fn follow_flow(&mut self) -> Result<()> {
        let mut rx = self.flow.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            self.show_state(&state);
            if state.session.is_some() && state.is_settled() {
                return Ok(());
            }
            rx.changed().await.map_err(|_| eyre!("Flow controller stopped"))?;
        }
    }

    async fn open(&mut self, route: Route) -> Result<()> {
        debug!(route = route.name(), "open: called");
        match route {
            Route::Garden => {
                self.view = View::Garden;
                self.print_garden().await?;
            }
            Route::Tasks { task_type, seed } => {
                self.view = View::Tasks {
                    task_type,
                    seed,
                    opened: Instant::now(),
                };
                print_tasks(task_type);
            }
            Route::Companion { mut params } => {
                self.view = View::Companion;
                self.last_shown = None;
                self.flow.on_focus(&mut params).await?;
            }
        }
        Ok(())
    }

    // === Companion view ===

    fn show_state(&mut self, state: &DisplayState) {
        let key = (state.stage, state.message.clone());
        if self.last_shown.as_ref() == Some(&key) {
            return;
        }
        self.last_shown = Some(key);

        if state.stage == FlowStage::Loading {
            println!("{}", state.message.dimmed());
            return;
        }

        println!();
        println!("{} {}", state.expression.glyph().bright_magenta(), state.message);
        match state.stage {
            FlowStage::MoodSelect => print_moods(state.selections.highlighted_mood),
            FlowStage::MoodWrite => println!("{}", "Write down your mood...".dimmed()),
            FlowStage::TaskSelect => print_task_choices(),
            FlowStage::Loading | FlowStage::FinalMessage => {}
        }
    }

    async fn handle_companion_input(&mut self, input: &str) -> Result<()> {
        let state = self.flow.current();
        let outcome = match state.stage {
            FlowStage::MoodSelect => self.handle_mood_input(input, state.selections.highlighted_mood).await?,
            FlowStage::MoodWrite => {
                self.flow.edit_reflection(input).await?;
                self.flow.submit_reflection().await?
            }
            FlowStage::TaskSelect => match parse_task(input) {
                Some(category) => self.flow.select_task(category).await?,
                None => {
                    println!("{} Pick a task by number or name.", "?".yellow());
                    return Ok(());
                }
            },
            FlowStage::Loading | FlowStage::FinalMessage => InputOutcome::Ignored,
        };

        if outcome == InputOutcome::Ignored {
            println!("{}", format!("{} is busy, one moment...", self.companion).dimmed());
        }
        Ok(())
    }

    async fn handle_mood_input(&mut self, input: &str, highlighted: Mood) -> Result<InputOutcome> {
        let step = match input {
            "<" | "left" => Some(-MOOD_SNAP_INTERVAL),
            ">" | "right" => Some(MOOD_SNAP_INTERVAL),
            _ => None,
        };
        if let Some(step) = step {
            let offset = self.carousel.offset_for(highlighted) + step;
            let outcome = self.flow.scroll_moods(offset).await?;
            print_moods(self.flow.current().selections.highlighted_mood);
            return Ok(outcome);
        }

        if matches!(input, "ok" | "confirm" | "y") {
            return Ok(self.flow.confirm_mood().await?);
        }

        match parse_mood(input) {
            Some(mood) => {
                self.flow.highlight_mood(mood).await?;
                Ok(self.flow.confirm_mood().await?)
            }
            None => {
                println!(
                    "{} Use {} / {} to move, {} to confirm, or type a mood.",
                    "?".yellow(),
                    "<".yellow(),
                    ">".yellow(),
                    "ok".yellow()
                );
                Ok(InputOutcome::Applied)
            }
        }
    }

    // === Garden view ===

    async fn print_garden(&self) -> Result<()> {
        let seeds = self.garden.list_seeds().await?;
        println!();
        println!("{}", "Your Garden".bright_green().bold());
        if seeds.is_empty() {
            println!("{}", "  Nothing planted yet.".dimmed());
        }
        for (i, seed) in seeds.iter().enumerate() {
            println!("  {}", format_seed_line(i + 1, seed));
        }
        println!(
            "{}",
            "Open a seed by number, or type `new` to choose another task.".dimmed()
        );
        Ok(())
    }

    async fn handle_garden_input(&mut self, input: &str) -> Result<()> {
        if matches!(input, "new" | "back" | "home") {
            self.navigator.navigate(Route::Companion {
                params: RouteParams::skip_to_task_select(),
            });
            return Ok(());
        }

        let seeds = self.garden.list_seeds().await?;
        match parse_index(input, seeds.len()) {
            Some(i) => self.navigator.navigate(Route::Tasks {
                task_type: seeds[i].task_type,
                seed: Some(seeds[i].id.clone()),
            }),
            None => println!("{} No seed numbered {}.", "?".yellow(), input),
        }
        Ok(())
    }

    // === Tasks view ===

    async fn handle_tasks_input(
        &mut self,
        input: &str,
        task_type: TaskCategory,
        seed: Option<SeedId>,
        opened: Instant,
    ) -> Result<()> {
        if matches!(input, "back" | "garden") {
            self.navigator.navigate(Route::Garden);
            return Ok(());
        }

        let activities = task_type.activities();
        let Some(i) = parse_index(input, activities.len()) else {
            println!("{} Pick an activity by number, or `back`.", "?".yellow());
            return Ok(());
        };

        println!("{} {}", "Done:".bright_green(), activities[i].title);
        if task_type.is_timed() {
            println!("Time: {}", format_elapsed(opened.elapsed().as_secs()));
        }

        let Some(id) = seed else {
            return Ok(());
        };
        if let Some(grown) = self.garden.record_activity_completed(&id).await? {
            println!();
            println!("{}", "Congratulations!".bright_magenta().bold());
            println!("Your seed is growing... {}", progress_bar(grown.progress, PROGRESS_BAR_WIDTH));
            if grown.is_fully_grown() {
                println!("{}", "It's in full bloom!".bright_green());
            }
        }
        Ok(())
    }

    // === Slash commands ===

    async fn handle_slash_command(&mut self, input: &str) -> Result<SlashResult> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return Ok(SlashResult::Quit),
            "/garden" | "/g" => {
                self.navigator.navigate(Route::Garden);
                self.sync_views().await?;
            }
            "/transcript" | "/t" => {
                let turns = self.flow.transcript().await?;
                println!();
                for (i, turn) in turns.iter().enumerate().skip(1) {
                    let role = match turn.role {
                        Role::User => "You".bright_green(),
                        Role::Assistant => self.companion.bright_magenta(),
                        Role::System => "System".dimmed(),
                    };
                    println!("  {}. {}: {}", i, role, turn.content);
                }
                println!();
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        Ok(SlashResult::Continue)
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Leave HeartGarden", "/quit".yellow());
        println!("  {:14} Visit your garden", "/garden".yellow());
        println!("  {:14} Show the conversation so far", "/transcript".yellow());
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

fn print_moods(highlighted: Mood) {
    let line: Vec<String> = Mood::ALL
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let label = format!("{}.{}", i + 1, m.label());
            if *m == highlighted {
                format!("[{}]", label).bright_yellow().bold().to_string()
            } else {
                format!(" {} ", label)
            }
        })
        .collect();
    println!("  {}", line.join(" "));
}

fn print_task_choices() {
    for (i, category) in TaskCategory::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, category.label());
    }
}

fn print_tasks(task_type: TaskCategory) {
    println!();
    println!("{}", task_type.list_title().bright_cyan().bold());
    for (i, activity) in task_type.activities().iter().enumerate() {
        println!("  {}. {}", i + 1, activity.title);
    }
    println!("{}", "Complete an activity by number, or `back`.".dimmed());
}

fn format_seed_line(number: usize, seed: &Seed) -> String {
    format!(
        "{}. {:<15} {} planted {}",
        number,
        seed.task_type.label(),
        progress_bar(seed.progress, PROGRESS_BAR_WIDTH),
        seed.created_at.format("%H:%M")
    )
}

/// `[#####-----]  50%` style bar for a progress in `[0, 1]`
pub fn progress_bar(progress: f64, width: usize) -> String {
    let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (progress * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        (progress * 100.0).round() as u32
    )
}

/// 1-based position into a list of `len` items
pub fn parse_index(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

/// Mood by number on the scale or by name
pub fn parse_mood(input: &str) -> Option<Mood> {
    parse_index(input, Mood::ALL.len())
        .and_then(Mood::from_index)
        .or_else(|| input.parse().ok())
}

/// Task category by number in the list or by id
pub fn parse_task(input: &str) -> Option<TaskCategory> {
    parse_index(input, TaskCategory::ALL.len())
        .map(|i| TaskCategory::ALL[i])
        .or_else(|| input.parse().ok())
}
