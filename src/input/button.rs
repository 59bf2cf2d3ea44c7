//! # Button Normalization Module
//!
//! Converts raw integer button samples into boolean state plus press and
//! release edges.
//!
//! Any positive raw value counts as pressed (evdev reports 2 for key
//! repeat, HID backends report arbitrary positive magnitudes). An edge
//! fires only when the new state differs from the stored state; the stored
//! state always follows the sample so it can never go stale.

/// A button state transition worth dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    /// Transition from released to pressed.
    Down,
    /// Transition from pressed to released.
    Up,
}

/// Computes the new button state and the edge, if any, for a raw sample.
///
/// # Arguments
///
/// * `previous` - The currently stored state for the button
/// * `raw` - Raw sample; pressed iff `raw > 0`
///
/// # Returns
///
/// `(is_down, edge)` — the caller must store `is_down` unconditionally.
///
/// # Examples
///
/// ```
/// use padhub::input::button::{transition, ButtonEdge};
///
/// assert_eq!(transition(false, 1), (true, Some(ButtonEdge::Down)));
/// assert_eq!(transition(true, 0), (false, Some(ButtonEdge::Up)));
/// assert_eq!(transition(true, 1), (true, None));
/// ```
#[must_use]
pub fn transition(previous: bool, raw: i32) -> (bool, Option<ButtonEdge>) {
    let is_down = raw > 0;
    let edge = match (previous, is_down) {
        (false, true) => Some(ButtonEdge::Down),
        (true, false) => Some(ButtonEdge::Up),
        _ => None,
    };
    (is_down, edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_edge_from_released() {
        assert_eq!(transition(false, 1), (true, Some(ButtonEdge::Down)));
    }

    #[test]
    fn test_up_edge_from_pressed() {
        assert_eq!(transition(true, 0), (false, Some(ButtonEdge::Up)));
    }

    #[test]
    fn test_no_edge_when_held() {
        assert_eq!(transition(true, 1), (true, None));
    }

    #[test]
    fn test_no_edge_when_released() {
        assert_eq!(transition(false, 0), (false, None));
    }

    #[test]
    fn test_key_repeat_counts_as_pressed() {
        // evdev emits value 2 for autorepeat; no spurious edge.
        assert_eq!(transition(true, 2), (true, None));
        assert_eq!(transition(false, 2), (true, Some(ButtonEdge::Down)));
    }

    #[test]
    fn test_negative_value_counts_as_released() {
        assert_eq!(transition(true, -1), (false, Some(ButtonEdge::Up)));
    }

    #[test]
    fn test_scenario_release_fires_once() {
        // Button previously down, raw 0 -> one up edge; further raw 0
        // samples fire nothing.
        let (state, edge) = transition(true, 0);
        assert_eq!(edge, Some(ButtonEdge::Up));

        let (state, edge) = transition(state, 0);
        assert_eq!(edge, None);
        assert!(!state);
    }
}
