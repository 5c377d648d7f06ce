//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Button observed pressed while idle
    ButtonPressed,
    /// Last step of the forward (sampling) arc taken
    ForwardArcComplete,
    /// Last step of the return arc taken
    ReturnArcComplete,
}
