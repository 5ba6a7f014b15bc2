//! Effect host: owns the player, applies commands, produces frames

use crate::config::{Config, PaletteChoice, DEFAULT_EFFECT};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use wfx_core::{
    palette, Animation, AudioFeed, AudioSource, FrameOrder, Palette, PixelMapper, Player, Rgb,
};
use wfx_effects::{EffectRegistry, RegistryError};
use wfx_input::Command;

/// Primary colors offered by the color command
const COLOR_CYCLE: [Rgb; 8] = [
    Rgb::WHITE,
    Rgb::RED,
    Rgb { r: 255, g: 128, b: 0 },
    Rgb { r: 255, g: 255, b: 0 },
    Rgb::GREEN,
    Rgb { r: 0, g: 255, b: 255 },
    Rgb::BLUE,
    Rgb { r: 255, g: 0, b: 255 },
];

/// Monotonic time base that stands still while paused
#[derive(Debug)]
struct HostClock {
    origin: Instant,
    paused_total: Duration,
    paused_since: Option<Instant>,
}

impl HostClock {
    fn new(origin: Instant) -> Self {
        Self {
            origin,
            paused_total: Duration::ZERO,
            paused_since: None,
        }
    }

    fn now_ns(&self, now: Instant) -> u64 {
        let now = self.paused_since.unwrap_or(now);
        let running = now
            .saturating_duration_since(self.origin)
            .saturating_sub(self.paused_total);
        running.as_nanos().min(u64::MAX as u128) as u64
    }

    fn pause(&mut self, now: Instant) {
        if self.paused_since.is_none() {
            self.paused_since = Some(now);
        }
    }

    fn resume(&mut self, now: Instant) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total += now.saturating_duration_since(since);
        }
    }
}

/// Runs one effect at a time on a fixed grid
pub struct Host {
    registry: EffectRegistry,
    player: Player,
    feed: Arc<AudioFeed>,
    seed: u64,
    palette: PaletteChoice,
    color_index: usize,
    clock: HostClock,
    frame: Vec<Rgb>,
}

impl Host {
    pub fn new(config: &Config, feed: Arc<AudioFeed>, origin: Instant) -> Self {
        let registry = EffectRegistry::builtin();
        let name = match registry.canonical_name(&config.effect) {
            Some(name) => name,
            None => {
                warn!(effect = %config.effect, "unknown effect, using {}", DEFAULT_EFFECT);
                DEFAULT_EFFECT
            }
        };

        let color_index = COLOR_CYCLE
            .iter()
            .position(|c| *c == config.color)
            .unwrap_or(0);

        let mut first: Box<dyn Animation> = match registry.create_seeded(name, config.seed) {
            Ok(fx) => fx,
            Err(_) => Box::new(wfx_effects::Rainbow::new()),
        };
        first.set_speed(config.speed as i32);
        first.set_intensity(config.intensity as i32);
        first.set_color(config.color);
        first.set_mapper(config.mapper);
        prepare(first.as_mut(), &feed, &config.palette);

        let mut player = Player::new(first);
        player.init(config.width, config.height);

        Self {
            registry,
            player,
            feed,
            seed: config.seed,
            palette: config.palette.clone(),
            color_index,
            clock: HostClock::new(origin),
            frame: Vec::new(),
        }
    }

    pub fn effect_name(&self) -> &'static str {
        self.player.animation().name()
    }

    pub fn animation(&self) -> &dyn Animation {
        self.player.animation()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Swap to effect `name`, carrying over the shared parameters
    pub fn select(&mut self, name: &str) -> Result<&'static str, RegistryError> {
        let mut next = self.registry.create_seeded(name, self.seed)?;
        {
            let current = self.player.animation();
            next.set_speed(current.speed() as i32);
            next.set_intensity(current.intensity() as i32);
            next.set_color(current.color());
            next.set_mapper(current.mapper());
        }
        prepare(next.as_mut(), &self.feed, &self.palette);
        self.player.replace(next);

        let name = self.effect_name();
        info!(effect = name, "effect selected");
        Ok(name)
    }

    fn step_effect(&mut self, offset: isize) -> Option<String> {
        let target = self.registry.cycle(self.effect_name(), offset)?;
        match self.select(target) {
            Ok(name) => Some(name.to_string()),
            Err(e) => Some(e.to_string()),
        }
    }

    fn step_palette(&mut self, offset: isize) -> String {
        let names = palette::names();
        if names.is_empty() {
            return "no palettes".to_string();
        }
        let len = names.len() as isize;
        let current = match &self.palette {
            PaletteChoice::Named(name) => names.iter().position(|n| n.eq_ignore_ascii_case(name)),
            _ => None,
        };
        let next = match current {
            Some(i) => (i as isize + offset).rem_euclid(len),
            None if offset >= 0 => 0,
            None => len - 1,
        } as usize;
        self.set_palette_choice(PaletteChoice::Named(names[next].to_string()));
        format!("palette {}", names[next])
    }

    fn set_palette_choice(&mut self, choice: PaletteChoice) {
        self.palette = choice;
        let fx = self.player.animation_mut();
        let palette = resolve_palette(&self.palette, fx.default_palette_name());
        fx.set_palette(palette);
    }

    /// Apply a command, returning a status message for the UI
    pub fn apply(&mut self, command: Command, now: Instant) -> Option<String> {
        match command {
            Command::NextEffect => self.step_effect(1),
            Command::PrevEffect => self.step_effect(-1),
            Command::NextPalette => Some(self.step_palette(1)),
            Command::PrevPalette => Some(self.step_palette(-1)),
            Command::ClearPalette => {
                self.set_palette_choice(PaletteChoice::Off);
                Some("palette off".to_string())
            }
            Command::AdjustSpeed(delta) => {
                let fx = self.player.animation_mut();
                fx.set_speed(fx.speed() as i32 + delta);
                None
            }
            Command::AdjustIntensity(delta) => {
                let fx = self.player.animation_mut();
                fx.set_intensity(fx.intensity() as i32 + delta);
                None
            }
            Command::CycleColor => {
                self.color_index = (self.color_index + 1) % COLOR_CYCLE.len();
                self.player.animation_mut().set_color(COLOR_CYCLE[self.color_index]);
                None
            }
            Command::ToggleMapper => {
                let fx = self.player.animation_mut();
                let mapper: PixelMapper = fx.mapper().next();
                fx.set_mapper(mapper);
                Some(format!("mapper {}", mapper.name()))
            }
            Command::TogglePause => {
                if self.is_paused() {
                    self.clock.resume(now);
                    Some("resumed".to_string())
                } else {
                    self.clock.pause(now);
                    Some("paused".to_string())
                }
            }
            Command::Restart => {
                let name = self.effect_name();
                self.select(name).ok().map(|n| format!("{} restarted", n))
            }
            Command::ToggleHelp | Command::Quit => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.clock.paused_since.is_some()
    }

    /// Effect time for a host instant
    pub fn now_ns(&self, now: Instant) -> u64 {
        self.clock.now_ns(now)
    }

    /// Advance (unless paused) and render the full grid
    ///
    /// Returns the effect's continuation flag.
    pub fn tick(&mut self, now: Instant) -> bool {
        let keep_running = if self.is_paused() {
            self.player.wants_to_continue()
        } else {
            self.player.update(self.clock.now_ns(now))
        };
        self.player.render_frame(&mut self.frame, FrameOrder::RowMajor);
        keep_running
    }

    /// Last rendered frame, row-major
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    /// Copy the live effect settings into `config` so they survive a restart
    pub fn write_back(&self, config: &mut Config) {
        let fx = self.player.animation();
        config.effect = fx.name().to_string();
        config.speed = fx.speed();
        config.intensity = fx.intensity();
        config.color = fx.color();
        config.mapper = fx.mapper();
        config.palette = self.palette.clone();
    }

    pub fn shutdown(&mut self) {
        self.player.cleanup();
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.player.cleanup();
    }
}

/// Attach audio and the palette choice to a fresh effect
fn prepare(fx: &mut dyn Animation, feed: &Arc<AudioFeed>, choice: &PaletteChoice) {
    let audio: Arc<dyn AudioSource> = feed.clone();
    fx.attach_audio(audio);
    fx.set_palette(resolve_palette(choice, fx.default_palette_name()));
}

fn resolve_palette(choice: &PaletteChoice, preferred: &str) -> Option<Arc<Palette>> {
    match choice {
        PaletteChoice::Off => None,
        PaletteChoice::Auto => palette::by_name(preferred),
        PaletteChoice::Named(name) => palette::by_name(name).or_else(|| {
            warn!(palette = %name, "unknown palette");
            None
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfx_core::Lifecycle;

    fn host(effect: &str) -> (Host, Instant) {
        let config = Config {
            effect: effect.to_string(),
            width: 8,
            height: 4,
            ..Config::default()
        };
        let origin = Instant::now();
        (Host::new(&config, Arc::new(AudioFeed::new()), origin), origin)
    }

    #[test]
    fn test_starts_ready_with_config_size() {
        let (mut host, origin) = host("snow");
        assert_eq!(host.effect_name(), "Snow");
        assert_eq!(host.player().state(), Lifecycle::Ready);
        assert!(host.tick(origin));
        assert_eq!(host.frame().len(), 32);
    }

    #[test]
    fn test_unknown_effect_falls_back() {
        let (host, _) = host("Plasma");
        assert_eq!(host.effect_name(), DEFAULT_EFFECT);
    }

    #[test]
    fn test_auto_palette_uses_effect_preference() {
        let (host, _) = host("Snow");
        let pal = host.animation().palette().map(|p| p.name().to_string());
        assert_eq!(pal.as_deref(), Some("Ice"));
    }

    #[test]
    fn test_switch_keeps_parameters() {
        let (mut host, now) = host("Twinkle");
        host.apply(Command::AdjustSpeed(40), now);
        host.apply(Command::AdjustIntensity(-200), now);
        host.apply(Command::ToggleMapper, now);
        let before = host.effect_name();

        host.apply(Command::NextEffect, now);
        assert_ne!(host.effect_name(), before);
        assert_eq!(host.animation().speed(), 168);
        assert_eq!(host.animation().intensity(), 0);
        assert_eq!(host.animation().mapper(), PixelMapper::RowMajor);
        assert_eq!(host.player().state(), Lifecycle::Ready);

        host.apply(Command::PrevEffect, now);
        assert_eq!(host.effect_name(), before);
    }

    #[test]
    fn test_palette_commands() {
        let (mut host, now) = host("Rainbow");
        let names = palette::names();

        host.apply(Command::NextPalette, now);
        assert_eq!(
            host.animation().palette().map(|p| p.name().to_string()),
            Some(names[0].to_string())
        );
        host.apply(Command::PrevPalette, now);
        assert_eq!(
            host.animation().palette().map(|p| p.name().to_string()),
            Some(names[names.len() - 1].to_string())
        );
        host.apply(Command::ClearPalette, now);
        assert!(host.animation().palette().is_none());
    }

    #[test]
    fn test_color_cycle_wraps() {
        let (mut host, now) = host("Blink");
        for _ in 0..COLOR_CYCLE.len() {
            host.apply(Command::CycleColor, now);
        }
        assert_eq!(host.animation().color(), Rgb::WHITE);
    }

    #[test]
    fn test_pause_freezes_effect_time() {
        let (mut host, origin) = host("Blink");
        let t1 = origin + Duration::from_millis(100);
        host.apply(Command::TogglePause, t1);
        assert!(host.is_paused());
        assert_eq!(host.now_ns(t1 + Duration::from_secs(5)), host.now_ns(t1));

        let t2 = t1 + Duration::from_secs(5);
        host.apply(Command::TogglePause, t2);
        assert!(!host.is_paused());
        let later = host.now_ns(t2 + Duration::from_millis(50));
        assert_eq!(later, Duration::from_millis(150).as_nanos() as u64);
    }

    #[test]
    fn test_write_back_keeps_session_settings() {
        let (mut host, now) = host("Twinkle");
        host.apply(Command::NextEffect, now);
        host.apply(Command::AdjustSpeed(-8), now);
        host.apply(Command::CycleColor, now);
        host.apply(Command::ClearPalette, now);

        let mut config = Config {
            fps: 30,
            ..Config::default()
        };
        host.write_back(&mut config);
        assert_eq!(config.effect, host.effect_name());
        assert_eq!(config.speed, 120);
        assert_eq!(config.color, COLOR_CYCLE[1]);
        assert_eq!(config.palette, PaletteChoice::Off);
        assert_eq!(config.fps, 30);

        // Loads back to the same settings
        let reloaded = Config::parse(&config.serialize());
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_shutdown_stops_player() {
        let (mut host, now) = host("Drip");
        host.tick(now);
        host.shutdown();
        host.shutdown();
        assert_eq!(host.player().state(), Lifecycle::Stopped);
    }
}
