//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`structure`]: the elements of the displayed trace step, with the target
//!   of the playing instruction highlighted in its verb's color
//! - [`instructions`]: scrolling list of every instruction in the timeline
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each pane module exports a primary `render_*` function; panes with many
//! inputs take a `*RenderData` struct.

pub mod instructions;
pub mod status;
pub mod structure;

pub use instructions::render_instruction_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use structure::{render_structure_pane, StructureRenderData};
