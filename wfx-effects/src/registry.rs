//! Name -> effect factory lookup

use crate::effects::{
    Blink, Breathe, Drip, FireNoise2D, GravFreq, Matripix, Rainbow, Sinelon, Snow, Twinkle,
    DEFAULT_SEED,
};
use thiserror::Error;
use tracing::debug;
use wfx_core::Animation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),
}

/// Builds a fresh effect from a random seed
pub type EffectFactory = fn(u64) -> Box<dyn Animation>;

/// Catalog of available effects, sorted by name
pub struct EffectRegistry {
    entries: Vec<(&'static str, EffectFactory)>,
}

impl EffectRegistry {
    /// Registry holding every builtin effect
    pub fn builtin() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
        };
        registry.register("Blink", |_| Box::new(Blink::new()));
        registry.register("Breathe", |_| Box::new(Breathe::new()));
        registry.register("Drip", |seed| Box::new(Drip::with_seed(seed)));
        registry.register("FireNoise2D", |_| Box::new(FireNoise2D::new()));
        registry.register("GravFreq", |_| Box::new(GravFreq::new()));
        registry.register("Matripix", |_| Box::new(Matripix::new()));
        registry.register("Rainbow", |_| Box::new(Rainbow::new()));
        registry.register("Sinelon", |_| Box::new(Sinelon::new()));
        registry.register("Snow", |seed| Box::new(Snow::with_seed(seed)));
        registry.register("Twinkle", |seed| Box::new(Twinkle::with_seed(seed)));
        registry
    }

    /// Add or replace an entry, keeping the catalog sorted
    pub fn register(&mut self, name: &'static str, factory: EffectFactory) {
        match self.entries.binary_search_by(|(n, _)| n.cmp(&name)) {
            Ok(i) => self.entries[i].1 = factory,
            Err(i) => self.entries.insert(i, (name, factory)),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<(&'static str, EffectFactory)> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Canonical spelling of `name`, if registered
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        self.lookup(name).map(|(n, _)| n)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Animation>, RegistryError> {
        self.create_seeded(name, DEFAULT_SEED)
    }

    pub fn create_seeded(&self, name: &str, seed: u64) -> Result<Box<dyn Animation>, RegistryError> {
        let (canonical, factory) = self
            .lookup(name)
            .ok_or_else(|| RegistryError::UnknownEffect(name.to_string()))?;
        debug!(effect = canonical, seed, "creating effect");
        Ok(factory(seed))
    }

    /// Name `offset` places away from `current` in catalog order, wrapping
    ///
    /// An unknown `current` counts as the first entry.
    pub fn cycle(&self, current: &str, offset: isize) -> Option<&'static str> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len() as isize;
        let here = self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(current))
            .unwrap_or(0) as isize;
        let next = (here + offset).rem_euclid(len) as usize;
        Some(self.entries[next].0)
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
