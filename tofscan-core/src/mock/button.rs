//! Mock start button

use crate::traits::Button;

/// Mock button with a scripted level
#[derive(Debug, Clone, Default)]
pub struct MockButton {
    /// Level returned by every read
    held: bool,
    /// Pending single-read presses
    taps: u32,
    /// Number of reads so far
    reads: u32,
}

impl MockButton {
    /// Button that is never pressed
    pub fn released() -> Self {
        Self::default()
    }

    /// Button that reads pressed on every read
    pub fn held() -> Self {
        Self {
            held: true,
            ..Self::default()
        }
    }

    /// Button that reads pressed on the next read only
    pub fn tapped() -> Self {
        let mut button = Self::default();
        button.tap();
        button
    }

    /// Queue one more single-read press
    pub fn tap(&mut self) {
        self.taps += 1;
    }

    /// Change the held level
    pub fn set_held(&mut self, held: bool) {
        self.held = held;
    }

    /// Number of times the level was read
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl Button for MockButton {
    fn is_pressed(&mut self) -> bool {
        self.reads += 1;
        if self.taps > 0 {
            self.taps -= 1;
            return true;
        }
        self.held
    }
}
