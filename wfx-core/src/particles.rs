//! Fixed-capacity particle pool
//!
//! Slots are allocated once at construction and never grow. Spawning into a
//! full pool drops the request. Freed slots are reused by the next spawn;
//! each reuse bumps the slot generation so stale handles stop resolving.

use crate::color::Rgb;
use tracing::trace;

/// Remaining lifetime of a particle, counted in `step` calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    Frames(u32),
    #[default]
    Infinite,
}

/// Simulated point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub ax: f32,
    pub ay: f32,
    pub color: Rgb,
    pub life: Lifetime,
    /// Effect-specific value, e.g. a phase offset
    pub scratch: f32,
}

impl Particle {
    /// Particle at rest with infinite life
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            ax: 0.0,
            ay: 0.0,
            color: Rgb::WHITE,
            life: Lifetime::Infinite,
            scratch: 0.0,
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn with_acceleration(mut self, ax: f32, ay: f32) -> Self {
        self.ax = ax;
        self.ay = ay;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_life(mut self, life: Lifetime) -> Self {
        self.life = life;
        self
    }

    pub fn with_scratch(mut self, scratch: f32) -> Self {
        self.scratch = scratch;
        self
    }

    /// One Euler step: velocity first, then position
    pub fn integrate(&mut self) {
        self.vx += self.ax;
        self.vy += self.ay;
        self.x += self.vx;
        self.y += self.vy;
    }
}

/// Generation-checked reference to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    index: usize,
    generation: u32,
}

impl ParticleHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
struct Slot {
    particle: Particle,
    generation: u32,
    alive: bool,
}

impl Slot {
    fn free(&mut self) {
        self.alive = false;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Pool of at most `capacity` live particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    slots: Vec<Slot>,
    live: usize,
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                particle: Particle::at(0.0, 0.0),
                generation: 0,
                alive: false,
            })
            .collect();
        Self { slots, live: 0 }
    }

    /// Insert into the first free slot; `None` when the pool is full
    pub fn spawn(&mut self, particle: Particle) -> Option<ParticleHandle> {
        let Some(index) = self.slots.iter().position(|s| !s.alive) else {
            trace!(capacity = self.slots.len(), "particle pool full, spawn dropped");
            return None;
        };
        let slot = &mut self.slots[index];
        slot.particle = particle;
        slot.alive = true;
        self.live += 1;
        Some(ParticleHandle {
            index,
            generation: slot.generation,
        })
    }

    fn live_slot(&self, handle: ParticleHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index)
            .filter(|s| s.alive && s.generation == handle.generation)
    }

    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.live_slot(handle).map(|s| &s.particle)
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.slots
            .get_mut(handle.index)
            .filter(|s| s.alive && s.generation == handle.generation)
            .map(|s| &mut s.particle)
    }

    /// Free the slot behind `handle`; false if it was already gone
    pub fn remove(&mut self, handle: ParticleHandle) -> bool {
        if self.live_slot(handle).is_none() {
            return false;
        }
        self.slots[handle.index].free();
        self.live -= 1;
        true
    }

    /// Integrate every live particle and count down finite lifetimes
    ///
    /// A particle whose lifetime reaches zero is freed in the same call.
    pub fn step(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.alive) {
            slot.particle.integrate();
            if let Lifetime::Frames(n) = slot.particle.life {
                let remaining = n.saturating_sub(1);
                slot.particle.life = Lifetime::Frames(remaining);
                if remaining == 0 {
                    slot.free();
                    self.live -= 1;
                }
            }
        }
    }

    /// Visit each live particle once in slot order; `false` frees it
    pub fn retain(&mut self, mut keep: impl FnMut(&mut Particle) -> bool) {
        for slot in self.slots.iter_mut().filter(|s| s.alive) {
            if !keep(&mut slot.particle) {
                slot.free();
                self.live -= 1;
            }
        }
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.alive) {
            slot.free();
        }
        self.live = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|s| s.alive).map(|s| &s.particle)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.slots
            .iter_mut()
            .filter(|s| s.alive)
            .map(|s| &mut s.particle)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_full(&self) -> bool {
        self.live == self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_past_capacity_drops() {
        let mut pool = ParticleSystem::new(4);
        for i in 0..10 {
            let handle = pool.spawn(Particle::at(i as f32, 0.0));
            assert_eq!(handle.is_some(), i < 4);
        }
        assert_eq!(pool.live_count(), 4);
        assert!(pool.is_full());
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn test_clear_empties_pool() {
        let mut pool = ParticleSystem::new(3);
        let h = pool.spawn(Particle::at(0.0, 0.0)).unwrap();
        pool.spawn(Particle::at(1.0, 0.0));
        pool.clear();
        assert_eq!(pool.live_count(), 0);
        assert!(pool.is_empty());
        assert_eq!(pool.iter().count(), 0);
        assert!(pool.get(h).is_none());
    }

    #[test]
    fn test_step_integrates_velocity_then_position() {
        let mut pool = ParticleSystem::new(1);
        let h = pool
            .spawn(
                Particle::at(1.0, 2.0)
                    .with_velocity(0.5, 0.0)
                    .with_acceleration(0.0, 1.0),
            )
            .unwrap();
        pool.step();
        let p = pool.get(h).unwrap();
        assert_eq!((p.vx, p.vy), (0.5, 1.0));
        assert_eq!((p.x, p.y), (1.5, 3.0));
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut pool = ParticleSystem::new(2);
        pool.spawn(Particle::at(0.0, 0.0).with_life(Lifetime::Frames(2)));
        pool.spawn(Particle::at(1.0, 0.0));
        pool.step();
        assert_eq!(pool.live_count(), 2);
        pool.step();
        assert_eq!(pool.live_count(), 1);
        let remaining: Vec<f32> = pool.iter().map(|p| p.x).collect();
        assert_eq!(remaining, vec![1.0]);
    }

    #[test]
    fn test_freed_slot_reused_and_stale_handle_rejected() {
        let mut pool = ParticleSystem::new(2);
        let a = pool.spawn(Particle::at(0.0, 0.0)).unwrap();
        pool.spawn(Particle::at(1.0, 0.0));
        assert!(pool.remove(a));
        assert!(!pool.remove(a));

        let c = pool.spawn(Particle::at(5.0, 0.0)).unwrap();
        assert_eq!(c.index(), a.index());
        assert!(pool.get(a).is_none());
        assert_eq!(pool.get(c).map(|p| p.x), Some(5.0));
    }

    #[test]
    fn test_spawn_fills_lowest_free_slot() {
        let mut pool = ParticleSystem::new(4);
        let handles: Vec<_> = (0..4)
            .map(|i| pool.spawn(Particle::at(i as f32, 0.0)).unwrap())
            .collect();
        pool.remove(handles[3]);
        pool.remove(handles[1]);
        let next = pool.spawn(Particle::at(9.0, 0.0)).unwrap();
        assert_eq!(next.index(), 1);
        let last = pool.spawn(Particle::at(9.0, 0.0)).unwrap();
        assert_eq!(last.index(), 3);
        assert!(pool.is_full());
    }

    #[test]
    fn test_retain_visits_each_once() {
        let mut pool = ParticleSystem::new(6);
        for i in 0..6 {
            pool.spawn(Particle::at(i as f32, 0.0));
        }
        let mut visited = Vec::new();
        pool.retain(|p| {
            visited.push(p.x as i32);
            p.x as i32 % 2 == 0
        });
        assert_eq!(visited, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(pool.live_count(), 3);
        let left: Vec<i32> = pool.iter().map(|p| p.x as i32).collect();
        assert_eq!(left, vec![0, 2, 4]);
    }

    #[test]
    fn test_get_mut_and_iter_mut() {
        let mut pool = ParticleSystem::new(2);
        let h = pool.spawn(Particle::at(0.0, 0.0)).unwrap();
        if let Some(p) = pool.get_mut(h) {
            p.scratch = 3.0;
        }
        for p in pool.iter_mut() {
            p.color = Rgb::RED;
        }
        let p = pool.get(h).unwrap();
        assert_eq!(p.scratch, 3.0);
        assert_eq!(p.color, Rgb::RED);
    }
}
