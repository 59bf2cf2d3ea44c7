//! # Axis Normalization Module
//!
//! Converts raw integer axis samples into normalized floats in [-1, 1] and
//! decides whether a sample represents a real change.
//!
//! ## Deadzone (flat)
//!
//! Resting-position jitter is reported relative to electrical zero, so raw
//! values with `-flat < raw < flat` are flattened to 0 before range
//! mapping.
//!
//! ## Range mapping
//!
//! The flattened raw value is mapped linearly from `[minimum, maximum]` to
//! `[0, 1]`, then to `[-1, 1]` via `2*norm - 1`, and clamped to absorb
//! rounding and out-of-spec samples.
//!
//! ## Change detection (fuzz)
//!
//! Sensor noise smaller than the device-reported `fuzz` must not flood
//! consumers with near-identical values. The fuzz is scaled into normalized
//! units (`2*fuzz / (maximum - minimum)`) and used as an epsilon around the
//! previously accepted value; when the backend reports no fuzz a small
//! fixed epsilon is used instead.
//!
//! ## Usage
//!
//! ```
//! use padhub::input::axis::AxisCalibration;
//!
//! let mut cal = AxisCalibration::new(0, 255, 8, 2);
//!
//! // Near-center sample falls inside the fuzz epsilon of the initial 0.0.
//! assert_eq!(cal.normalize(128), None);
//!
//! // A real deflection is accepted and remembered.
//! let value = cal.normalize(200).unwrap();
//! assert!((value - 0.569).abs() < 0.01);
//! assert_eq!(cal.normalize(200), None); // unchanged on repeat
//! ```

/// Change-detection epsilon used when the backend reports no fuzz.
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// Per-axis calibration and change-detection state.
///
/// The raw bounds, deadzone, and fuzz are immutable after construction;
/// only the last accepted normalized value mutates, on every accepted
/// change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCalibration {
    /// Raw sample lower bound.
    minimum: f32,
    /// Raw sample upper bound.
    maximum: f32,
    /// Deadzone half-width in raw units.
    flat: i32,
    /// Change-detection epsilon in normalized units, derived from fuzz.
    epsilon: f32,
    /// Last normalized value accepted as a change.
    last_value: f32,
}

impl AxisCalibration {
    /// Creates a calibration from the raw bounds a capability scan reports.
    ///
    /// # Arguments
    ///
    /// * `minimum` / `maximum` - Raw sample bounds
    /// * `flat` - Deadzone half-width in raw units
    /// * `fuzz` - Backend noise threshold in raw units; 0 selects a small
    ///   fixed epsilon
    ///
    /// # Examples
    ///
    /// ```
    /// use padhub::input::axis::AxisCalibration;
    ///
    /// let cal = AxisCalibration::new(-32768, 32767, 128, 16);
    /// assert_eq!(cal.last_value(), 0.0);
    /// ```
    #[must_use]
    pub fn new(minimum: i32, maximum: i32, flat: i32, fuzz: i32) -> Self {
        // The full i32 range is a legal calibration; subtract as floats so
        // the difference cannot overflow.
        let range = maximum as f32 - minimum as f32;
        let epsilon = if fuzz > 0 && range > 0.0 {
            2.0 * fuzz as f32 / range
        } else {
            DEFAULT_EPSILON
        };
        Self {
            minimum: minimum as f32,
            maximum: maximum as f32,
            flat,
            epsilon,
            last_value: 0.0,
        }
    }

    /// Returns the last normalized value accepted as a change.
    #[must_use]
    pub fn last_value(&self) -> f32 {
        self.last_value
    }

    /// Returns the change-detection epsilon in normalized units.
    #[must_use]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Normalizes a raw sample and applies change detection.
    ///
    /// Returns `Some(value)` when the sample represents a real change, in
    /// which case the value has been stored as the new comparison point.
    /// Returns `None` for samples inside the change epsilon of the previous
    /// value, and for any sample on a degenerate axis
    /// (`maximum == minimum`).
    ///
    /// # Examples
    ///
    /// ```
    /// use padhub::input::axis::AxisCalibration;
    ///
    /// let mut cal = AxisCalibration::new(0, 255, 0, 0);
    /// assert_eq!(cal.normalize(0), Some(-1.0));
    /// assert_eq!(cal.normalize(255), Some(1.0));
    /// ```
    pub fn normalize(&mut self, raw: i32) -> Option<f32> {
        // Degenerate calibration carries no range information.
        if self.maximum <= self.minimum {
            return None;
        }

        let flattened = flatten(raw, self.flat);
        let value = map_range(flattened as f32, self.minimum, self.maximum);

        if (value - self.last_value).abs() < self.epsilon {
            return None;
        }

        self.last_value = value;
        Some(value)
    }
}

/// Flattens resting-position jitter around electrical zero.
///
/// Raw values strictly inside `(-flat, flat)` become 0; everything else
/// passes through unchanged.
///
/// # Examples
///
/// ```
/// use padhub::input::axis::flatten;
///
/// assert_eq!(flatten(5, 8), 0);
/// assert_eq!(flatten(-7, 8), 0);
/// assert_eq!(flatten(8, 8), 8);
/// assert_eq!(flatten(200, 8), 200);
/// ```
#[must_use]
pub fn flatten(raw: i32, flat: i32) -> i32 {
    if raw > -flat && raw < flat {
        0
    } else {
        raw
    }
}

/// Maps a raw value linearly from `[minimum, maximum]` to `[-1, 1]`.
///
/// The caller guarantees `maximum > minimum`. The result is clamped to
/// absorb rounding and out-of-spec samples.
///
/// # Examples
///
/// ```
/// use padhub::input::axis::map_range;
///
/// assert_eq!(map_range(0.0, 0.0, 255.0), -1.0);
/// assert_eq!(map_range(255.0, 0.0, 255.0), 1.0);
/// assert!(map_range(400.0, 0.0, 255.0) <= 1.0);
/// ```
#[must_use]
pub fn map_range(raw: f32, minimum: f32, maximum: f32) -> f32 {
    let norm = (raw - minimum) / (maximum - minimum);
    (2.0 * norm - 1.0).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Range Mapping Tests ====================

    #[test]
    fn test_map_range_endpoints() {
        assert_eq!(map_range(0.0, 0.0, 255.0), -1.0);
        assert_eq!(map_range(255.0, 0.0, 255.0), 1.0);
    }

    #[test]
    fn test_map_range_center() {
        // Exact midpoint maps to ~0 (127.5 is the true center of 0..255)
        let center = map_range(127.5, 0.0, 255.0);
        assert!(center.abs() < 0.001);
    }

    #[test]
    fn test_map_range_signed_bounds() {
        assert_eq!(map_range(-32768.0, -32768.0, 32767.0), -1.0);
        assert_eq!(map_range(32767.0, -32768.0, 32767.0), 1.0);
        assert!(map_range(0.0, -32768.0, 32767.0).abs() < 0.001);
    }

    #[test]
    fn test_map_range_clamps_out_of_spec() {
        assert_eq!(map_range(300.0, 0.0, 255.0), 1.0);
        assert_eq!(map_range(-50.0, 0.0, 255.0), -1.0);
    }

    #[test]
    fn test_map_range_stays_in_unit_interval() {
        for raw in 0..=255 {
            let value = map_range(raw as f32, 0.0, 255.0);
            assert!((-1.0..=1.0).contains(&value), "raw {} -> {}", raw, value);
        }
    }

    // ==================== Flatten Tests ====================

    #[test]
    fn test_flatten_inside_deadzone() {
        assert_eq!(flatten(0, 8), 0);
        assert_eq!(flatten(7, 8), 0);
        assert_eq!(flatten(-7, 8), 0);
    }

    #[test]
    fn test_flatten_on_boundary() {
        // The band is exclusive on both sides.
        assert_eq!(flatten(8, 8), 8);
        assert_eq!(flatten(-8, 8), -8);
    }

    #[test]
    fn test_flatten_outside_deadzone() {
        assert_eq!(flatten(100, 8), 100);
        assert_eq!(flatten(-100, 8), -100);
    }

    #[test]
    fn test_flatten_zero_flat_passes_through() {
        assert_eq!(flatten(1, 0), 1);
        assert_eq!(flatten(-1, 0), -1);
        assert_eq!(flatten(0, 0), 0);
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_endpoints() {
        let mut cal = AxisCalibration::new(0, 255, 0, 0);
        assert_eq!(cal.normalize(0), Some(-1.0));
        assert_eq!(cal.normalize(255), Some(1.0));
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut cal = AxisCalibration::new(0, 255, 0, 0);
        assert!(cal.normalize(200).is_some());
        // Same raw value again never reports a change.
        assert_eq!(cal.normalize(200), None);
        assert_eq!(cal.normalize(200), None);
    }

    #[test]
    fn test_normalize_updates_last_value() {
        let mut cal = AxisCalibration::new(0, 255, 0, 0);
        let value = cal.normalize(255).unwrap();
        assert_eq!(cal.last_value(), value);
    }

    #[test]
    fn test_normalize_rejected_sample_keeps_last_value() {
        let mut cal = AxisCalibration::new(0, 255, 0, 2);
        let accepted = cal.normalize(200).unwrap();
        // One raw step is below the fuzz epsilon; last value must not move.
        assert_eq!(cal.normalize(201), None);
        assert_eq!(cal.last_value(), accepted);
    }

    #[test]
    fn test_normalize_epsilon_law() {
        let mut cal = AxisCalibration::new(0, 255, 0, 2);
        let epsilon = cal.epsilon();
        assert!((epsilon - 4.0 / 255.0).abs() < 1e-6);

        // Just outside the epsilon from 0.0 is a change.
        let raw_outside = 130; // |norm| ~ 0.0196 > 0.0157
        assert!(cal.normalize(raw_outside).is_some());
    }

    #[test]
    fn test_normalize_fuzz_zero_uses_default_epsilon() {
        let cal = AxisCalibration::new(0, 255, 0, 0);
        assert_eq!(cal.epsilon(), DEFAULT_EPSILON);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        // maximum == minimum must not divide by zero and never changes.
        let mut cal = AxisCalibration::new(128, 128, 0, 0);
        assert_eq!(cal.normalize(0), None);
        assert_eq!(cal.normalize(128), None);
        assert_eq!(cal.normalize(255), None);
        assert_eq!(cal.last_value(), 0.0);
    }

    #[test]
    fn test_normalize_full_integer_range() {
        // Bounds spanning the whole i32 range must not overflow the range
        // computation; the epsilon stays positive and mapping still works.
        let mut cal = AxisCalibration::new(i32::MIN, i32::MAX, 0, 1);
        assert!(cal.epsilon() > 0.0);
        assert_eq!(cal.normalize(i32::MAX), Some(1.0));
        assert_eq!(cal.normalize(i32::MIN), Some(-1.0));
    }

    #[test]
    fn test_normalize_inverted_range() {
        // maximum < minimum is treated the same as degenerate.
        let mut cal = AxisCalibration::new(255, 0, 0, 0);
        assert_eq!(cal.normalize(128), None);
    }

    #[test]
    fn test_normalize_deadzone_flattens_before_mapping() {
        // A signed axis resting slightly off zero flattens to exact center.
        let mut cal = AxisCalibration::new(-127, 127, 8, 0);
        let value = cal.normalize(5).unwrap_or(0.0);
        assert!(value.abs() < 0.01);
    }

    #[test]
    fn test_normalize_values_always_in_range() {
        let mut cal = AxisCalibration::new(0, 255, 8, 0);
        for raw in [-100, 0, 1, 64, 127, 128, 200, 255, 400] {
            if let Some(value) = cal.normalize(raw) {
                assert!((-1.0..=1.0).contains(&value), "raw {} -> {}", raw, value);
            }
        }
    }

    // ==================== Scenario Tests ====================

    #[test]
    fn test_scenario_resting_center_is_noise() {
        // min 0, max 255, flat 8, fuzz 2, previous 0.0:
        // raw 128 -> ~0.003, inside the fuzz epsilon -> unchanged.
        let mut cal = AxisCalibration::new(0, 255, 8, 2);
        assert_eq!(cal.normalize(128), None);

        // raw 200 -> ~0.569 -> changed.
        let value = cal.normalize(200).unwrap();
        assert!((value - 0.569).abs() < 0.01);
    }

    #[test]
    fn test_scenario_full_sweep() {
        let mut cal = AxisCalibration::new(0, 255, 8, 2);
        assert_eq!(cal.normalize(0), Some(-1.0));
        assert_eq!(cal.normalize(255), Some(1.0));
        // The flat band flattens toward raw 0 (electrical zero), which for
        // an unsigned 0..255 axis is the low endpoint, not the center.
        assert_eq!(cal.normalize(3), Some(-1.0));
    }
}
