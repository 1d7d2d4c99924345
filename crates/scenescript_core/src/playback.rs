//! Playhead for stepping through a recorded scene

/// Current frame of a looping scene player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playhead {
    frame: u32,
    length: u32,
    running: bool,
}

impl Playhead {
    /// Playhead at frame 0 of a scene with `length` frames, running
    pub fn new(length: u32) -> Self {
        Self {
            frame: 0,
            length: length.max(1),
            running: true,
        }
    }

    /// Current frame
    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pause or resume automatic advancing
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Advance one frame, wrapping to 0 after the last frame
    pub fn advance(&mut self) -> u32 {
        self.frame = (self.frame + 1) % self.length;
        self.frame
    }

    /// Step back one frame, wrapping to the last frame before 0
    pub fn step_back(&mut self) -> u32 {
        self.frame = if self.frame == 0 { self.length - 1 } else { self.frame - 1 };
        self.frame
    }

    /// Advance only if running; returns the frame to show
    pub fn tick(&mut self) -> u32 {
        if self.running {
            self.advance()
        } else {
            self.frame
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        let mut head = Playhead::new(3);
        assert_eq!(head.advance(), 1);
        assert_eq!(head.advance(), 2);
        assert_eq!(head.advance(), 0);
    }

    #[test]
    fn test_step_back_wraps() {
        let mut head = Playhead::new(300);
        assert_eq!(head.step_back(), 299);
        assert_eq!(head.step_back(), 298);
    }

    #[test]
    fn test_paused_tick_holds() {
        let mut head = Playhead::new(10);
        head.toggle();
        assert!(!head.is_running());
        assert_eq!(head.tick(), 0);
        head.toggle();
        assert_eq!(head.tick(), 1);
    }

    #[test]
    fn test_zero_length_is_single_frame() {
        let mut head = Playhead::new(0);
        assert_eq!(head.advance(), 0);
        assert_eq!(head.step_back(), 0);
    }
}
