//! Animation Sets
//!
//! A named, ordered, non-empty loop of frames ("idle", "talking", ...) and
//! the registry an entity keeps them in. Sets are immutable once registered.

use std::collections::HashMap;

use crate::error::{AnimatorError, Result};
use crate::frame::Frame;

/// A named loop of frames
#[derive(Clone, Debug)]
pub struct AnimationSet<H> {
    name: String,
    frames: Vec<Frame<H>>,
}

impl<H> AnimationSet<H> {
    /// Create a set; fails if `frames` is empty
    pub fn new(name: impl Into<String>, frames: Vec<Frame<H>>) -> Result<Self> {
        let name = name.into();
        if frames.is_empty() {
            return Err(AnimatorError::EmptyAnimationSet { name });
        }
        Ok(Self { name, frames })
    }

    /// Set name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of frames (never zero)
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`
    pub fn frame(&self, index: usize) -> Option<&Frame<H>> {
        self.frames.get(index)
    }

    /// All frames in display order
    pub fn frames(&self) -> &[Frame<H>] {
        &self.frames
    }
}

/// Name → set lookup owned by an entity
#[derive(Clone, Debug)]
pub struct AnimationRegistry<H> {
    sets: HashMap<String, AnimationSet<H>>,
    /// Registration order, for stable listings
    order: Vec<String>,
}

impl<H> AnimationRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sets: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a set; names must be unique
    pub fn register(&mut self, set: AnimationSet<H>) -> Result<()> {
        if self.sets.contains_key(set.name()) {
            return Err(AnimatorError::DuplicateAnimationSet {
                name: set.name().to_string(),
            });
        }
        self.order.push(set.name().to_string());
        self.sets.insert(set.name().to_string(), set);
        Ok(())
    }

    /// Look up a set by name
    pub fn get(&self, name: &str) -> Option<&AnimationSet<H>> {
        self.sets.get(name)
    }

    /// Whether a set with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<H> Default for AnimationRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
