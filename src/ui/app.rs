//! Main TUI application state and logic

use crate::animation::{
    InstructionGenerator, OrchestratorRegistry, Timeline, TimelineEvent, TimelineState,
};
use crate::config::{PlaybackOptions, MIN_SPEED};
use crate::error::TraceError;
use crate::scenarios::Scenario;
use crate::trace::{PlannedInstruction, Trace};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Speed change per `+`/`-` press
const SPEED_STEP: f64 = 0.25;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Structure,
    Instructions,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Structure => FocusedPane::Instructions,
            FocusedPane::Instructions => FocusedPane::Structure,
        }
    }
}

/// A scenario with its recorded trace and instruction plan
struct Loaded {
    scenario: Scenario,
    trace: Trace,
    plan: Vec<PlannedInstruction>,
}

/// The main application state
pub struct App {
    loaded: Vec<Loaded>,
    active: usize,

    /// One timeline per scenario, keyed by scenario name
    registry: OrchestratorRegistry<String>,
    options: PlaybackOptions,

    /// Events queued by timeline observers, drained once per frame
    events: Rc<RefCell<Vec<TimelineEvent>>>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    pub instruction_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Time of the previous frame, for driving the timeline
    pub last_tick: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Record every scenario and open `start` first
    pub fn new(start: Scenario, options: PlaybackOptions) -> Result<Self, TraceError> {
        let generator = InstructionGenerator::from_options(&options);
        let loaded = Scenario::ALL
            .into_iter()
            .map(|scenario| {
                let trace = scenario.build()?;
                let plan = trace.plan(&generator);
                Ok(Loaded {
                    scenario,
                    trace,
                    plan,
                })
            })
            .collect::<Result<Vec<_>, TraceError>>()?;
        let active = loaded
            .iter()
            .position(|l| l.scenario == start)
            .unwrap_or(0);

        let mut app = App {
            loaded,
            active,
            registry: OrchestratorRegistry::new(),
            options,
            events: Rc::new(RefCell::new(Vec::new())),
            focused_pane: FocusedPane::Structure,
            instruction_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_tick: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        };
        app.activate(active);
        Ok(app)
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        self.last_tick = Instant::now();
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            let now = Instant::now();
            let elapsed = now.duration_since(self.last_tick);
            self.last_tick = now;
            self.timeline().tick(elapsed);
            self.drain_events();

            // Short poll keeps playback smooth
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        self.registry.destroy_all();
        Ok(())
    }

    fn loaded(&self) -> &Loaded {
        &self.loaded[self.active]
    }

    /// Timeline of the active scenario, bound on first use
    fn timeline(&mut self) -> &mut Timeline<String> {
        let name = self.loaded[self.active].scenario.name();
        self.registry.get_or_create(name)
    }

    fn activate(&mut self, index: usize) {
        self.active = index;
        self.instruction_scroll = 0;

        let loaded = &self.loaded[index];
        let name = loaded.scenario.name();
        let timeline = self.registry.get_or_create(name);
        if timeline.state() == TimelineState::Uninitialized {
            let known = loaded.trace.element_ids();
            let lookup = |id: &str| known.contains(id).then(|| id.to_string());
            let instructions = loaded.plan.iter().map(|p| p.instruction.clone()).collect();

            timeline.set_speed(self.options.speed);
            timeline.set_loop(self.options.looping);
            timeline.create_timeline(instructions, &lookup);
            let sink = Rc::clone(&self.events);
            timeline.subscribe(move |event| sink.borrow_mut().push(*event));
        }
        self.status_message = loaded.scenario.description().to_string();
    }

    fn drain_events(&mut self) {
        let events: Vec<TimelineEvent> = self.events.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                TimelineEvent::Play => self.status_message = "Playing...".to_string(),
                TimelineEvent::Pause => self.status_message = "Paused".to_string(),
                TimelineEvent::Stop => self.status_message = "Jumped to start".to_string(),
                TimelineEvent::Complete => self.status_message = "Playback complete".to_string(),
                TimelineEvent::Progress { .. } => {}
            }
        }
    }

    /// Trace step to draw: the state after the active change, or the state
    /// before it when the target no longer exists (deletes)
    fn displayed_step(&self) -> usize {
        let loaded = self.loaded();
        let Some(timeline) = self.registry.get(loaded.scenario.name()) else {
            return 0;
        };
        let Some(planned) = loaded.plan.get(timeline.current_step()) else {
            return loaded.trace.len().saturating_sub(1);
        };
        let after = planned.trace_step;
        let present = loaded
            .trace
            .get(after)
            .is_some_and(|step| step.visual.iter().any(|e| e.id == planned.instruction.target_id));
        if present {
            after
        } else {
            after.saturating_sub(1)
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        let step = self.displayed_step();
        let loaded = &self.loaded[self.active];
        let timeline = self.registry.get(loaded.scenario.name());
        let current_step = timeline.map_or(0, |t| t.current_step());

        if let Some(trace_step) = loaded.trace.get(step) {
            let data = super::panes::StructureRenderData {
                title: loaded.scenario.description(),
                step_label: &trace_step.label,
                elements: &trace_step.visual,
                active: timeline.and_then(|t| t.current_instruction()),
                fraction: timeline.map_or(0.0, |t| t.step_fraction()),
                is_focused: self.focused_pane == FocusedPane::Structure,
            };
            super::panes::render_structure_pane(frame, columns[0], &data);
        }

        super::panes::render_instruction_pane(
            frame,
            columns[1],
            &loaded.plan,
            current_step,
            self.focused_pane == FocusedPane::Instructions,
            &mut self.instruction_scroll,
        );

        let status = super::panes::StatusRenderData {
            message: &self.status_message,
            scenario: loaded.scenario.name(),
            current_step,
            total_steps: loaded.plan.len(),
            is_playing: timeline.is_some_and(|t| t.is_playing()),
            speed: timeline.map_or(self.options.speed, |t| t.speed()),
            looping: timeline.is_some_and(|t| t.is_looping()),
        };
        super::panes::render_status_bar(frame, main_chunks[1], &status);
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Char(']') => {
                let next = (self.active + 1) % self.loaded.len();
                self.timeline().pause();
                self.activate(next);
            }
            KeyCode::Char('[') => {
                let prev = (self.active + self.loaded.len() - 1) % self.loaded.len();
                self.timeline().pause();
                self.activate(prev);
            }
            KeyCode::Left => {
                let timeline = self.timeline();
                timeline.pause();
                let moved = timeline.step_backward();
                self.status_message = if moved {
                    "Stepped backward".to_string()
                } else {
                    "Cannot step backward: at first instruction".to_string()
                };
            }
            KeyCode::Right => {
                let timeline = self.timeline();
                timeline.pause();
                let moved = timeline.step_forward();
                self.status_message = if moved {
                    "Stepped forward".to_string()
                } else {
                    "Cannot step forward: at last instruction".to_string()
                };
            }
            KeyCode::Up if self.focused_pane == FocusedPane::Instructions => {
                let timeline = self.timeline();
                let step = timeline.current_step().saturating_sub(1);
                timeline.go_to_step(step);
            }
            KeyCode::Down if self.focused_pane == FocusedPane::Instructions => {
                let timeline = self.timeline();
                let step = timeline.current_step() + 1;
                if step < timeline.total_steps() {
                    timeline.go_to_step(step);
                }
            }
            KeyCode::Char(' ') => {
                // Toggle playback (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    let timeline = self.timeline();
                    if timeline.is_playing() {
                        timeline.pause();
                    } else {
                        timeline.play();
                    }
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let timeline = self.timeline();
                timeline.set_speed(timeline.speed() + SPEED_STEP);
                self.status_message = format!("Speed {:.2}x", self.timeline().speed());
            }
            KeyCode::Char('-') => {
                let timeline = self.timeline();
                timeline.set_speed((timeline.speed() - SPEED_STEP).max(MIN_SPEED));
                self.status_message = format!("Speed {:.2}x", self.timeline().speed());
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                let timeline = self.timeline();
                let looping = !timeline.is_looping();
                timeline.set_loop(looping);
                self.status_message = if looping { "Loop on" } else { "Loop off" }.to_string();
            }
            KeyCode::Enter => {
                let timeline = self.timeline();
                timeline.pause();
                let last = timeline.total_steps().saturating_sub(1);
                timeline.go_to_step(last);
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.timeline().stop();
            }
            _ => {}
        }
    }
}
