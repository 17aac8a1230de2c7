//! Screen resolution tracking.
//!
//! Resolution changes arrive from the window at any time but are applied at
//! the start of the next frame, together with every resolution dependent
//! resource:
//!
//! ```text
//! set_resolution(w, h) ──► [size + aspect ratio stored, dirty]
//!                                    │
//! prepare_new_frame()  ◄─────────────┘
//!     │
//!     └──► swapchain, screen images, half size depth pyramid,
//!          depth pyramid shader constants
//! ```
//!
//! A zero width or height means the window is minimized. While minimized the
//! renderer issues no backend calls at all; the pending size is applied once
//! a non-zero size arrives.

/// Resize event returned by [`ResolutionState::take_pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    /// New width in pixels.
    pub width: u32,
    /// New height in pixels.
    pub height: u32,
}

impl ResizeEvent {
    /// Size of the half resolution depth pyramid.
    pub fn half_size(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }
}

/// Current screen size and minimized state.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionState {
    width: u32,
    height: u32,
    /// Size the screen resources currently have.
    applied: (u32, u32),
    minimized: bool,
    dirty: bool,
}

impl ResolutionState {
    /// State whose resources were created at `width` × `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            applied: (width, height),
            minimized: width == 0 || height == 0,
            dirty: false,
        }
    }

    /// Record a new window size.
    pub fn set(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;

        if width == 0 || height == 0 {
            self.minimized = true;
            log::debug!("Window minimized");
            return;
        }
        self.minimized = false;
        self.dirty = true;
        log::trace!("Resolution set to {}x{} (pending)", width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Width divided by height, or 1 while minimized.
    pub fn aspect_ratio(&self) -> f32 {
        if self.minimized {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Whether resources still have to be resized.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the pending resize.
    ///
    /// Returns `None` while minimized or when nothing changed since the last
    /// call.
    pub fn take_pending(&mut self) -> Option<ResizeEvent> {
        if self.minimized || !self.dirty {
            return None;
        }
        self.dirty = false;

        let previous = self.applied;
        self.applied = (self.width, self.height);
        log::debug!(
            "Resize applied: {}x{} -> {}x{}",
            previous.0,
            previous.1,
            self.width,
            self.height
        );

        Some(ResizeEvent {
            width: self.width,
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let state = ResolutionState::new(1920, 1080);
        assert_eq!(state.size(), (1920, 1080));
        assert!(!state.is_minimized());
        assert!(!state.is_dirty());
        assert!((state.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_marks_dirty_once() {
        let mut state = ResolutionState::new(1920, 1080);
        state.set(1280, 720);
        assert!(state.is_dirty());

        let event = state.take_pending().unwrap();
        assert_eq!(
            event,
            ResizeEvent {
                width: 1280,
                height: 720,
            }
        );
        assert_eq!(event.half_size(), (640, 360));
        assert!(state.take_pending().is_none());
    }

    #[test]
    fn test_zero_size_minimizes() {
        let mut state = ResolutionState::new(1920, 1080);
        state.set(0, 1080);
        assert!(state.is_minimized());
        assert!(!state.is_dirty());
        assert!(state.take_pending().is_none());
        assert_eq!(state.aspect_ratio(), 1.0);

        state.set(1920, 0);
        assert_eq!(state.aspect_ratio(), 1.0);

        state.set(1280, 640);
        assert_eq!(state.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_restore_after_minimize_is_dirty() {
        let mut state = ResolutionState::new(1920, 1080);
        state.set(0, 0);
        state.set(800, 600);
        assert!(!state.is_minimized());
        let event = state.take_pending().unwrap();
        assert_eq!((event.width, event.height), (800, 600));
        assert_eq!(event.half_size(), (400, 300));
    }

    #[test]
    fn test_resize_while_minimized_is_kept() {
        let mut state = ResolutionState::new(1920, 1080);
        state.set(1024, 768);
        state.set(0, 0);
        assert!(state.take_pending().is_none());
        state.set(1024, 768);
        assert_eq!(state.take_pending().unwrap().width, 1024);
    }

    #[test]
    fn test_created_minimized() {
        let state = ResolutionState::new(0, 0);
        assert!(state.is_minimized());
    }
}
