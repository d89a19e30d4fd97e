//! # Introduction
//!
//! dsanim models the classic teaching data structures, records their state as
//! canonical snapshots, and turns the difference between consecutive snapshots
//! into a playable animation timeline. A terminal viewer built with
//! [ratatui](https://docs.rs/ratatui) plays the result.
//!
//! ## Pipeline
//!
//! ```text
//! Engine mutation → Snapshot → Diff → Transitions → Instructions → Timeline → Renderer
//! ```
//!
//! 1. [`structures`]: the seven engines (array, linked list, stack, queue,
//!    hash table, BST/AVL/heap tree, graph) and the [`structures::Structure`]
//!    snapshot contract.
//! 2. [`trace`]: records labelled snapshots of one engine as it is mutated.
//! 3. [`diff`]: compares two snapshots and yields typed
//!    [`diff::Transition`]s.
//! 4. [`animation`]: maps transitions to [`animation::AnimationInstruction`]s
//!    and plays them through a [`animation::Timeline`].
//! 5. [`config`]: playback options and shared constants.
//! 6. [`scenarios`]: bundled teaching walkthroughs, one per structure kind.
//! 7. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! ## Logging
//!
//! The library logs through the [`log`] facade only (missing animation
//! targets, ignored playback calls, malformed snapshots). Installing a logger
//! is up to the binary.

pub mod animation;
pub mod config;
pub mod diff;
pub mod error;
pub mod scenarios;
pub mod structures;
pub mod trace;
pub mod ui;
