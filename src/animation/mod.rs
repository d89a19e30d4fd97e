//! Animation instructions and their playback
//!
//! This module turns diff output into renderer-facing work:
//! - [`AnimationInstruction`]: one verb applied to one target over time
//! - [`InstructionGenerator`]: maps each [`Transition`] to exactly one instruction
//! - [`timeline`]: seekable, speed-controlled playback state machine
//! - [`registry`]: caller-owned set of named timelines
//!
//! # Easing
//!
//! [`Easing`] names the curve a renderer should use; [`Easing::apply`] evaluates
//! it so a terminal renderer (or a test) can interpolate without a tween library.

pub mod registry;
pub mod timeline;

use crate::config::{PlaybackOptions, DEFAULT_DURATION_MS};
use crate::diff::{Transition, TransitionKind, TransitionState};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

pub use registry::OrchestratorRegistry;
pub use timeline::{ObserverId, TargetLookup, Timeline, TimelineEvent, TimelineState};

/// Visual verb of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimationVerb {
    Insert,
    Delete,
    Update,
    Move,
    Highlight,
    Scale,
    FadeIn,
    FadeOut,
    PathDraw,
}

impl AnimationVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationVerb::Insert => "INSERT",
            AnimationVerb::Delete => "DELETE",
            AnimationVerb::Update => "UPDATE",
            AnimationVerb::Move => "MOVE",
            AnimationVerb::Highlight => "HIGHLIGHT",
            AnimationVerb::Scale => "SCALE",
            AnimationVerb::FadeIn => "FADE_IN",
            AnimationVerb::FadeOut => "FADE_OUT",
            AnimationVerb::PathDraw => "PATH_DRAW",
        }
    }
}

impl fmt::Display for AnimationVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TransitionKind> for AnimationVerb {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Insert => AnimationVerb::Insert,
            TransitionKind::Delete => AnimationVerb::Delete,
            TransitionKind::Update => AnimationVerb::Update,
            TransitionKind::Move => AnimationVerb::Move,
        }
    }
}

/// Timing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    Bounce,
    Elastic,
}

impl Easing {
    /// Eased progress for linear progress `t`, clamped to `[0, 1]`
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t.powi(3),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Bounce => bounce_out(t),
            Easing::Elastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * (2.0 * PI / 3.0)).sin() + 1.0
                }
            }
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// One verb applied to one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationInstruction {
    #[serde(rename = "type")]
    pub verb: AnimationVerb,
    pub target_id: String,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(rename = "delay", default)]
    pub delay_ms: u64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<TransitionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<TransitionState>,
}

impl AnimationInstruction {
    /// Delay plus duration
    pub fn total_ms(&self) -> u64 {
        self.delay_ms.saturating_add(self.duration_ms)
    }
}

/// Maps transitions to instructions, one to one
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionGenerator {
    pub duration_ms: u64,
    pub delay_ms: u64,
    pub easing: Easing,
}

impl Default for InstructionGenerator {
    fn default() -> Self {
        InstructionGenerator {
            duration_ms: DEFAULT_DURATION_MS,
            delay_ms: 0,
            easing: Easing::default(),
        }
    }
}

impl InstructionGenerator {
    pub fn from_options(options: &PlaybackOptions) -> Self {
        InstructionGenerator {
            duration_ms: options.duration_ms,
            delay_ms: options.delay_ms,
            easing: options.easing,
        }
    }

    pub fn instruction(&self, transition: &Transition) -> AnimationInstruction {
        AnimationInstruction {
            verb: transition.kind.into(),
            target_id: transition.element_id.clone(),
            duration_ms: self.duration_ms,
            delay_ms: self.delay_ms,
            easing: self.easing,
            from: transition.from.clone(),
            to: transition.to.clone(),
        }
    }

    pub fn generate(&self, transitions: &[Transition]) -> Vec<AnimationInstruction> {
        transitions.iter().map(|t| self.instruction(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_curve_hits_endpoints() {
        let curves = [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseInCubic,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
            Easing::Bounce,
            Easing::Elastic,
        ];
        for easing in curves {
            assert!(easing.apply(0.0).abs() < 1e-9, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?}", easing);
        }
    }

    #[test]
    fn test_default_instruction_timing() {
        let transition = Transition::insert("seq-0", TransitionState::at(0).with_value(&1));
        let instruction = InstructionGenerator::default().instruction(&transition);
        assert_eq!(instruction.verb, AnimationVerb::Insert);
        assert_eq!(instruction.duration_ms, 300);
        assert_eq!(instruction.easing, Easing::EaseInOut);

        let encoded = serde_json::to_value(&instruction).unwrap();
        assert_eq!(encoded["type"], "INSERT");
        assert_eq!(encoded["targetId"], "seq-0");
        assert_eq!(encoded["easing"], "easeInOut");
    }
}
