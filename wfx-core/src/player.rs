//! Host-side driver enforcing the animation lifecycle

use crate::animation::{Animation, Grid};
use crate::color::Rgb;
use crate::mapper::PixelMapper;
use tracing::debug;

/// Where a [`Player`] is in the animation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    Stopped,
}

/// Frame ordering used by [`Player::render_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameOrder {
    /// `buffer[y * width + x]`
    #[default]
    RowMajor,
    /// `buffer[mapper.index(x, y, width)]`, the order a strip expects
    Mapped(PixelMapper),
}

/// Owns one effect and guards its state machine
///
/// `render` outside `Ready` returns black instead of reaching the effect,
/// and `cleanup` runs the effect's hook at most once per `init`.
pub struct Player {
    animation: Box<dyn Animation>,
    grid: Grid,
    state: Lifecycle,
    keep_running: bool,
}

impl Player {
    pub fn new(animation: Box<dyn Animation>) -> Self {
        Self {
            animation,
            grid: Grid::default(),
            state: Lifecycle::Uninitialized,
            keep_running: true,
        }
    }

    pub fn init(&mut self, width: usize, height: usize) {
        debug!(effect = self.animation.name(), width, height, "init");
        self.grid = Grid::new(width, height);
        self.animation.init(width, height);
        self.state = Lifecycle::Ready;
        self.keep_running = true;
    }

    /// Advance one frame; a no-op outside `Ready`
    ///
    /// Returns the effect's continuation flag, false when not running.
    pub fn update(&mut self, now_ns: u64) -> bool {
        if self.state != Lifecycle::Ready {
            return false;
        }
        self.keep_running = self.animation.update(now_ns);
        self.keep_running
    }

    pub fn render(&self, x: i32, y: i32) -> Rgb {
        if self.state != Lifecycle::Ready || !self.grid.contains(x, y) {
            return Rgb::BLACK;
        }
        self.animation.render(x, y)
    }

    /// Render the whole grid into `out`, resizing it to the pixel count
    pub fn render_frame(&self, out: &mut Vec<Rgb>, order: FrameOrder) {
        let (width, height) = (self.grid.width(), self.grid.height());
        out.clear();
        out.resize(self.grid.pixel_count(), Rgb::BLACK);
        for y in 0..height {
            for x in 0..width {
                let index = match order {
                    FrameOrder::RowMajor => y * width + x,
                    FrameOrder::Mapped(mapper) => mapper.index(x, y, width),
                };
                out[index] = self.render(x as i32, y as i32);
            }
        }
    }

    /// Release the effect's resources; later calls do nothing
    pub fn cleanup(&mut self) {
        if self.state == Lifecycle::Ready {
            debug!(effect = self.animation.name(), "cleanup");
            self.animation.cleanup();
        }
        if self.state != Lifecycle::Uninitialized {
            self.state = Lifecycle::Stopped;
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Last continuation flag returned by the effect
    pub fn wants_to_continue(&self) -> bool {
        self.keep_running
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn animation(&self) -> &dyn Animation {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> &mut dyn Animation {
        self.animation.as_mut()
    }

    /// Swap in a new effect, cleaning up the old one
    ///
    /// The new effect is initialized on the current grid when one exists.
    pub fn replace(&mut self, animation: Box<dyn Animation>) -> Box<dyn Animation> {
        self.cleanup();
        let old = std::mem::replace(&mut self.animation, animation);
        if self.grid.pixel_count() > 0 {
            self.init(self.grid.width(), self.grid.height());
        } else {
            self.state = Lifecycle::Uninitialized;
        }
        old
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("animation", &self.animation.name())
            .field("grid", &self.grid)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationParams, Capabilities};

    /// Paints every pixel with the primary color and counts cleanups
    #[derive(Default)]
    struct Solid {
        params: AnimationParams,
        grid: Grid,
        frames: u32,
        cleanups: u32,
    }

    impl Animation for Solid {
        fn name(&self) -> &'static str {
            "Solid"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                color: true,
                two_d: true,
                ..Capabilities::NONE
            }
        }

        fn init(&mut self, width: usize, height: usize) {
            self.grid = Grid::new(width, height);
            self.frames = 0;
        }

        fn update(&mut self, _now_ns: u64) -> bool {
            self.frames += 1;
            self.frames < 3
        }

        fn render(&self, x: i32, y: i32) -> Rgb {
            if !self.grid.contains(x, y) {
                return Rgb::BLACK;
            }
            self.params.color
        }

        fn params(&self) -> &AnimationParams {
            &self.params
        }

        fn params_mut(&mut self) -> &mut AnimationParams {
            &mut self.params
        }

        fn cleanup(&mut self) {
            self.cleanups += 1;
        }
    }

    #[test]
    fn test_render_before_init_is_black() {
        let player = Player::new(Box::<Solid>::default());
        assert_eq!(player.state(), Lifecycle::Uninitialized);
        assert_eq!(player.render(0, 0), Rgb::BLACK);
    }

    #[test]
    fn test_lifecycle() {
        let mut player = Player::new(Box::<Solid>::default());
        player.cleanup();
        assert_eq!(player.state(), Lifecycle::Uninitialized);

        player.init(2, 2);
        assert_eq!(player.state(), Lifecycle::Ready);
        assert!(player.update(0));
        assert_eq!(player.render(1, 1), Rgb::WHITE);
        assert_eq!(player.render(2, 1), Rgb::BLACK);

        player.cleanup();
        player.cleanup();
        assert_eq!(player.state(), Lifecycle::Stopped);
        assert_eq!(player.render(0, 0), Rgb::BLACK);
        assert!(!player.update(1));

        player.init(3, 3);
        assert_eq!(player.state(), Lifecycle::Ready);
        assert_eq!(player.render(2, 2), Rgb::WHITE);
    }

    #[test]
    fn test_continuation_flag() {
        let mut player = Player::new(Box::<Solid>::default());
        player.init(1, 1);
        assert!(player.update(0));
        assert!(player.update(1));
        assert!(!player.update(2));
        assert!(!player.wants_to_continue());
    }

    #[test]
    fn test_render_frame_orders() {
        let mut player = Player::new(Box::<Solid>::default());
        player.animation_mut().set_color(Rgb::RED);
        player.init(3, 2);
        player.update(0);

        let mut frame = Vec::new();
        player.render_frame(&mut frame, FrameOrder::RowMajor);
        assert_eq!(frame.len(), 6);
        assert!(frame.iter().all(|c| *c == Rgb::RED));

        player.render_frame(&mut frame, FrameOrder::Mapped(PixelMapper::Serpentine));
        assert!(frame.iter().all(|c| *c == Rgb::RED));
    }

    #[test]
    fn test_replace_reinitializes() {
        let mut player = Player::new(Box::<Solid>::default());
        player.init(4, 4);
        let mut next = Solid::default();
        next.params.color = Rgb::BLUE;
        player.replace(Box::new(next));
        assert_eq!(player.state(), Lifecycle::Ready);
        assert_eq!(player.render(3, 3), Rgb::BLUE);
    }
}
