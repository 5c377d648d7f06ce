//! Operator input trait

/// Momentary start button
///
/// Read as a raw level each idle iteration. No debouncing and no stored
/// history: a press is whatever the level reads at the time of the call.
pub trait Button {
    /// Check if the button currently reads pressed
    ///
    /// Takes `&mut self` because some GPIO reads require mutable access.
    fn is_pressed(&mut self) -> bool;
}
