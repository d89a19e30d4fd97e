//! Playback state machine over an instruction list
//!
//! ```text
//! Uninitialized --create_timeline--> Ready --play--> Playing <--pause/play--> Paused
//!                                      ^                |
//!                                      +------stop------+--(last step ends)--> Stopped
//! ```
//!
//! The timeline never schedules anything itself. The caller drives it with
//! [`Timeline::tick`] from its own frame loop; each instruction occupies one
//! step lasting `delay + duration`, scaled by the speed factor.
//!
//! Instruction targets are resolved once, at [`Timeline::create_timeline`],
//! through a caller-supplied [`TargetLookup`]. A target that cannot be found
//! is logged and left unbound; its step still exists but has no handle.
//!
//! Observers registered with [`Timeline::subscribe`] are called synchronously
//! on every step change with [`TimelineEvent::Progress`], and on play, pause,
//! stop and completion.

use super::AnimationInstruction;
use crate::config::{PlaybackOptions, MAX_SPEED, MIN_SPEED};
use log::{debug, warn};
use std::time::Duration;

/// Resolves an instruction target id to a renderer handle
pub trait TargetLookup {
    type Handle;

    fn lookup(&self, target_id: &str) -> Option<Self::Handle>;
}

impl<F, H> TargetLookup for F
where
    F: Fn(&str) -> Option<H>,
{
    type Handle = H;

    fn lookup(&self, target_id: &str) -> Option<H> {
        self(target_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    Uninitialized,
    Ready,
    Playing,
    Paused,
    Stopped,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEvent {
    Progress { current_step: usize, progress: f64 },
    Play,
    Pause,
    Stop,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&TimelineEvent)>;

pub struct Timeline<H> {
    state: TimelineState,
    instructions: Vec<AnimationInstruction>,
    handles: Vec<Option<H>>,
    current_step: usize,
    /// Scaled milliseconds spent in the current step
    step_elapsed_ms: f64,
    speed: f64,
    looping: bool,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl<H> Default for Timeline<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Timeline<H> {
    pub fn new() -> Self {
        Timeline {
            state: TimelineState::Uninitialized,
            instructions: Vec::new(),
            handles: Vec::new(),
            current_step: 0,
            step_elapsed_ms: 0.0,
            speed: 1.0,
            looping: false,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Timeline configured with the speed and loop flag of `options`
    pub fn with_options(options: &PlaybackOptions) -> Self {
        let mut timeline = Self::new();
        timeline.set_speed(options.speed);
        timeline.looping = options.looping;
        timeline
    }

    /// Load `instructions`, binding each target through `lookup`
    ///
    /// Resets to step 0 in the Ready state. Returns false only on a destroyed
    /// timeline.
    pub fn create_timeline<L>(&mut self, instructions: Vec<AnimationInstruction>, lookup: &L) -> bool
    where
        L: TargetLookup<Handle = H> + ?Sized,
    {
        if self.state == TimelineState::Destroyed {
            warn!("Timeline destroyed, ignoring create_timeline");
            return false;
        }

        self.handles = instructions
            .iter()
            .map(|instruction| {
                let handle = lookup.lookup(&instruction.target_id);
                if handle.is_none() {
                    warn!("Target element not found: {}", instruction.target_id);
                }
                handle
            })
            .collect();
        self.instructions = instructions;
        self.current_step = 0;
        self.step_elapsed_ms = 0.0;
        self.transition(TimelineState::Ready);
        debug!(
            "Timeline created with {} steps ({} bound)",
            self.instructions.len(),
            self.handles.iter().filter(|h| h.is_some()).count()
        );
        true
    }

    /// Drop the loaded instructions and return to Uninitialized
    pub fn clear(&mut self) {
        if self.state == TimelineState::Destroyed {
            return;
        }
        self.instructions.clear();
        self.handles.clear();
        self.current_step = 0;
        self.step_elapsed_ms = 0.0;
        self.transition(TimelineState::Uninitialized);
    }

    pub fn play(&mut self) {
        if !self.is_live("play") {
            return;
        }
        match self.state {
            TimelineState::Ready | TimelineState::Paused => {}
            TimelineState::Stopped => {
                self.current_step = 0;
                self.step_elapsed_ms = 0.0;
                self.notify_progress();
            }
            _ => return,
        }
        self.transition(TimelineState::Playing);
        self.emit(TimelineEvent::Play);
    }

    pub fn pause(&mut self) {
        if !self.is_live("pause") {
            return;
        }
        if self.state == TimelineState::Playing {
            self.transition(TimelineState::Paused);
            self.emit(TimelineEvent::Pause);
        }
    }

    /// Back to step 0, Ready
    pub fn stop(&mut self) {
        if !self.is_live("stop") {
            return;
        }
        self.current_step = 0;
        self.step_elapsed_ms = 0.0;
        self.transition(TimelineState::Ready);
        self.emit(TimelineEvent::Stop);
        self.notify_progress();
    }

    /// Advance one step; at the last step wraps to 0 only when looping.
    /// Returns whether the step changed.
    pub fn step_forward(&mut self) -> bool {
        if !self.is_live("step_forward") || self.instructions.is_empty() {
            return false;
        }
        if self.current_step + 1 < self.instructions.len() {
            self.current_step += 1;
        } else if self.looping && self.current_step != 0 {
            self.current_step = 0;
        } else {
            return false;
        }
        self.step_elapsed_ms = 0.0;
        self.notify_progress();
        true
    }

    /// Go back one step, stopping at 0
    pub fn step_backward(&mut self) -> bool {
        if !self.is_live("step_backward") || self.current_step == 0 {
            return false;
        }
        self.current_step -= 1;
        self.step_elapsed_ms = 0.0;
        self.notify_progress();
        true
    }

    /// Jump to `step`; out-of-range steps are rejected and change nothing
    pub fn go_to_step(&mut self, step: usize) -> bool {
        if !self.is_live("go_to_step") {
            return false;
        }
        if step >= self.instructions.len() {
            warn!("Invalid step: {} (total {})", step, self.instructions.len());
            return false;
        }
        self.current_step = step;
        self.step_elapsed_ms = 0.0;
        self.notify_progress();
        true
    }

    /// Set the playback speed factor, clamped to `[0.1, 4.0]`
    pub fn set_speed(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            warn!("Rejected playback speed {}", factor);
            return false;
        }
        self.speed = factor.clamp(MIN_SPEED, MAX_SPEED);
        true
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Advance playback by `elapsed` wall-clock time; returns steps advanced
    ///
    /// Only a Playing timeline moves. Finishing the last step without looping
    /// moves to Stopped and emits Complete. A looping timeline drops whole laps
    /// beyond the second, so at most two laps are walked and counted.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        if self.state != TimelineState::Playing {
            return 0;
        }
        if self.instructions.is_empty() {
            self.finish();
            return 0;
        }

        self.step_elapsed_ms += elapsed.as_secs_f64() * 1000.0 * self.speed;
        if self.looping {
            let lap: f64 = self
                .instructions
                .iter()
                .map(|instruction| instruction.total_ms().max(1) as f64)
                .sum();
            if self.step_elapsed_ms >= 2.0 * lap {
                self.step_elapsed_ms = lap + self.step_elapsed_ms % lap;
            }
        }
        let mut advanced = 0;
        loop {
            let step_ms = self.step_length_ms();
            if self.step_elapsed_ms < step_ms {
                break;
            }
            if self.current_step + 1 < self.instructions.len() {
                self.step_elapsed_ms -= step_ms;
                self.current_step += 1;
            } else if self.looping {
                self.step_elapsed_ms -= step_ms;
                self.current_step = 0;
            } else {
                self.step_elapsed_ms = step_ms;
                self.finish();
                break;
            }
            advanced += 1;
            self.notify_progress();
        }
        advanced
    }

    /// Eased progress through the active step, in `[0, 1]`
    pub fn step_fraction(&self) -> f64 {
        let Some(instruction) = self.current_instruction() else {
            return 0.0;
        };
        match self.state {
            TimelineState::Playing | TimelineState::Paused | TimelineState::Stopped => {
                let into_animation = self.step_elapsed_ms - instruction.delay_ms as f64;
                let duration = instruction.duration_ms.max(1) as f64;
                instruction.easing.apply(into_animation / duration)
            }
            _ => 0.0,
        }
    }

    /// `current_step / total_steps`, 0 when nothing is loaded
    pub fn get_progress(&self) -> f64 {
        if self.instructions.is_empty() {
            return 0.0;
        }
        self.current_step as f64 / self.instructions.len() as f64
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.instructions.len()
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TimelineState::Playing
    }

    pub fn instructions(&self) -> &[AnimationInstruction] {
        &self.instructions
    }

    pub fn current_instruction(&self) -> Option<&AnimationInstruction> {
        self.instructions.get(self.current_step)
    }

    /// Bound handle of `step`, `None` if its target was not found
    pub fn handle(&self, step: usize) -> Option<&H> {
        self.handles.get(step).and_then(Option::as_ref)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&TimelineEvent) + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer, _)| *observer != id);
        self.observers.len() != before
    }

    /// Release instructions, handles and observers; terminal
    pub fn destroy(&mut self) {
        self.instructions.clear();
        self.handles.clear();
        self.observers.clear();
        self.current_step = 0;
        self.step_elapsed_ms = 0.0;
        self.transition(TimelineState::Destroyed);
    }

    fn finish(&mut self) {
        self.transition(TimelineState::Stopped);
        self.emit(TimelineEvent::Complete);
    }

    fn step_length_ms(&self) -> f64 {
        self.current_instruction()
            .map_or(1, |instruction| instruction.total_ms().max(1)) as f64
    }

    fn is_live(&self, operation: &str) -> bool {
        match self.state {
            TimelineState::Uninitialized => {
                warn!("Timeline not initialized, ignoring {}", operation);
                false
            }
            TimelineState::Destroyed => {
                warn!("Timeline destroyed, ignoring {}", operation);
                false
            }
            _ => true,
        }
    }

    fn transition(&mut self, next: TimelineState) {
        if self.state != next {
            debug!("Timeline {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn notify_progress(&mut self) {
        let event = TimelineEvent::Progress {
            current_step: self.current_step,
            progress: self.get_progress(),
        };
        self.emit(event);
    }

    fn emit(&mut self, event: TimelineEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}
