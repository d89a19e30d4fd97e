//! Named timelines owned by the caller
//!
//! One registry is built at startup and passed to whatever needs to create or
//! tear down timelines. Lookup by id is create-or-return, so two callers asking
//! for the same id share one timeline.

use super::Timeline;
use log::debug;
use rustc_hash::FxHashMap;

pub struct OrchestratorRegistry<H> {
    timelines: FxHashMap<String, Timeline<H>>,
}

impl<H> Default for OrchestratorRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> OrchestratorRegistry<H> {
    pub fn new() -> Self {
        OrchestratorRegistry {
            timelines: FxHashMap::default(),
        }
    }

    /// Timeline registered under `id`, created on first request
    pub fn get_or_create(&mut self, id: &str) -> &mut Timeline<H> {
        self.timelines.entry(id.to_string()).or_insert_with(|| {
            debug!("Creating timeline '{}'", id);
            Timeline::new()
        })
    }

    pub fn get(&self, id: &str) -> Option<&Timeline<H>> {
        self.timelines.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Timeline<H>> {
        self.timelines.get_mut(id)
    }

    /// Destroy and forget one timeline; false if `id` is unknown
    pub fn destroy(&mut self, id: &str) -> bool {
        match self.timelines.remove(id) {
            Some(mut timeline) => {
                timeline.destroy();
                debug!("Destroyed timeline '{}'", id);
                true
            }
            None => false,
        }
    }

    pub fn destroy_all(&mut self) {
        for (id, mut timeline) in self.timelines.drain() {
            timeline.destroy();
            debug!("Destroyed timeline '{}'", id);
        }
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.timelines.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
