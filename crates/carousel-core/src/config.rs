#![forbid(unsafe_code)]

//! Carousel configuration.
//!
//! The container element carries a JSON settings payload. The five core keys
//! (`autoplay`, `autoplay_speed`, `animation_speed`, `infinite_loop`,
//! `pause_on_hover`) are required: a payload missing any of them fails to
//! parse instead of falling back to a guess. Everything else is optional and
//! has a documented default.
//!
//! Payloads produced by page builders are loosely typed, so durations accept
//! integers, floats, or numeric strings, and flags accept booleans or the
//! `"yes"`/`"no"`/`"true"`/`"false"`/`"1"`/`"0"`/`""` strings.
//!
//! # Example
//!
//! ```
//! use carousel_core::config::CarouselConfig;
//!
//! let config = CarouselConfig::from_json(
//!     r#"{"autoplay":true,"autoplay_speed":"4000","animation_speed":500,
//!         "infinite_loop":"yes","pause_on_hover":false}"#,
//! )
//! .unwrap();
//! assert!(config.infinite_loop);
//! assert_eq!(config.autoplay_speed.as_millis(), 4000);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Gap between adjacent slides, in pixels.
pub const DEFAULT_SLIDE_GAP: f32 = 8.0;
/// Displacement (px) beyond which a drag commits to the adjacent slide.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;
/// Release velocity (px/ms) beyond which a drag commits regardless of distance.
pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 0.3;
/// Movement (px) required before a gesture is locked to an axis.
pub const DEFAULT_AXIS_LOCK_THRESHOLD: f32 = 5.0;
/// Damping applied to drag distance past the first or last slide.
pub const DEFAULT_EDGE_RESISTANCE: f32 = 0.3;
/// Floor for the time delta used in velocity estimation.
pub const DEFAULT_MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);
/// A release this long after the last movement no longer counts as a flick.
pub const DEFAULT_RELEASE_WINDOW: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Loop strategy
// ---------------------------------------------------------------------------

/// How `infinite_loop` wraps from the last slide to the first (and back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStrategy {
    /// Animate straight back across the track to the wrapped index.
    #[default]
    Rewind,
    /// Keep a clone of the last slide before the first and a clone of the
    /// first after the last; wrap onto the clone, then re-anchor silently.
    Clones,
}

// ---------------------------------------------------------------------------
// Gesture tuning
// ---------------------------------------------------------------------------

/// Thresholds used by the gesture tracker and the swipe decision rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum |displacement| in px for a distance-triggered swipe (default: 50).
    pub swipe_threshold: f32,
    /// Minimum |velocity| in px/ms for a flick-triggered swipe (default: 0.3).
    pub velocity_threshold: f32,
    /// Movement in px before the axis lock is decided (default: 5).
    pub axis_lock_threshold: f32,
    /// Multiplier applied to drag distance beyond the track edges (default: 0.3).
    pub edge_resistance: f32,
    /// Time-delta floor for velocity estimation (default: 1ms).
    #[serde(with = "millis")]
    pub min_sample_interval: Duration,
    /// Pointer held still longer than this before release drops the
    /// release velocity to zero (default: 100ms).
    #[serde(with = "millis")]
    pub release_window: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            axis_lock_threshold: DEFAULT_AXIS_LOCK_THRESHOLD,
            edge_resistance: DEFAULT_EDGE_RESISTANCE,
            min_sample_interval: DEFAULT_MIN_SAMPLE_INTERVAL,
            release_window: DEFAULT_RELEASE_WINDOW,
        }
    }
}

impl GestureConfig {
    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold > 0.0) {
            return Err(ConfigError::invalid(
                "gesture.swipe_threshold",
                format!("expected a positive distance, got {}", self.swipe_threshold),
            ));
        }
        if !(self.velocity_threshold.is_finite() && self.velocity_threshold > 0.0) {
            return Err(ConfigError::invalid(
                "gesture.velocity_threshold",
                format!(
                    "expected a positive velocity, got {}",
                    self.velocity_threshold
                ),
            ));
        }
        if !(self.axis_lock_threshold.is_finite() && self.axis_lock_threshold >= 0.0) {
            return Err(ConfigError::invalid(
                "gesture.axis_lock_threshold",
                format!(
                    "expected a non-negative distance, got {}",
                    self.axis_lock_threshold
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.edge_resistance) {
            return Err(ConfigError::invalid(
                "gesture.edge_resistance",
                format!("expected a factor in [0, 1], got {}", self.edge_resistance),
            ));
        }
        if self.min_sample_interval.is_zero() {
            return Err(ConfigError::invalid(
                "gesture.min_sample_interval",
                "must be at least 1ms",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CarouselConfig
// ---------------------------------------------------------------------------

/// Immutable per-widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Advance automatically every `autoplay_speed`.
    #[serde(with = "flag")]
    pub autoplay: bool,
    /// Interval between autoplay advances.
    #[serde(with = "millis")]
    pub autoplay_speed: Duration,
    /// Duration of a committed slide transition.
    #[serde(with = "millis")]
    pub animation_speed: Duration,
    /// Wrap past either end instead of clamping.
    #[serde(with = "flag")]
    pub infinite_loop: bool,
    /// Suspend autoplay while the pointer hovers the carousel.
    #[serde(with = "flag")]
    pub pause_on_hover: bool,
    /// Visible sliver (px) of the previous slide kept at rest.
    #[serde(default)]
    pub peek_amount: f32,
    /// Gap between slides in px.
    #[serde(default = "default_slide_gap")]
    pub slide_gap: f32,
    #[serde(default)]
    pub loop_strategy: LoopStrategy,
    #[serde(default)]
    pub gesture: GestureConfig,
}

fn default_slide_gap() -> f32 {
    DEFAULT_SLIDE_GAP
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            autoplay_speed: Duration::from_millis(3000),
            animation_speed: Duration::from_millis(500),
            infinite_loop: false,
            pause_on_hover: false,
            peek_amount: 0.0,
            slide_gap: DEFAULT_SLIDE_GAP,
            loop_strategy: LoopStrategy::Rewind,
            gesture: GestureConfig::default(),
        }
    }
}

impl CarouselConfig {
    /// Parse and validate a JSON settings payload.
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an optional payload, treating an absent or blank attribute as
    /// [`ConfigError::Missing`].
    pub fn from_payload(payload: Option<&str>) -> Result<Self, ConfigError> {
        match payload {
            Some(text) if !text.trim().is_empty() => Self::from_json(text),
            _ => Err(ConfigError::Missing),
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay && self.autoplay_speed.is_zero() {
            return Err(ConfigError::invalid(
                "autoplay_speed",
                "must be positive when autoplay is enabled",
            ));
        }
        if !(self.peek_amount.is_finite() && self.peek_amount >= 0.0) {
            return Err(ConfigError::invalid(
                "peek_amount",
                format!("expected a non-negative length, got {}", self.peek_amount),
            ));
        }
        if !(self.slide_gap.is_finite() && self.slide_gap >= 0.0) {
            return Err(ConfigError::invalid(
                "slide_gap",
                format!("expected a non-negative length, got {}", self.slide_gap),
            ));
        }
        self.gesture.validate()
    }

    /// Whether the track carries wrap-around clones.
    #[must_use]
    pub fn uses_clones(&self) -> bool {
        self.infinite_loop && self.loop_strategy == LoopStrategy::Clones
    }

    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool, speed: Duration) -> Self {
        self.autoplay = autoplay;
        self.autoplay_speed = speed;
        self
    }

    #[must_use]
    pub fn with_animation_speed(mut self, speed: Duration) -> Self {
        self.animation_speed = speed;
        self
    }

    #[must_use]
    pub fn with_infinite_loop(mut self, infinite_loop: bool) -> Self {
        self.infinite_loop = infinite_loop;
        self
    }

    #[must_use]
    pub fn with_pause_on_hover(mut self, pause_on_hover: bool) -> Self {
        self.pause_on_hover = pause_on_hover;
        self
    }

    #[must_use]
    pub fn with_peek_amount(mut self, peek_amount: f32) -> Self {
        self.peek_amount = peek_amount;
        self
    }

    #[must_use]
    pub fn with_slide_gap(mut self, slide_gap: f32) -> Self {
        self.slide_gap = slide_gap;
        self
    }

    #[must_use]
    pub fn with_loop_strategy(mut self, strategy: LoopStrategy) -> Self {
        self.loop_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }
}

// ---------------------------------------------------------------------------
// Loose field codecs
// ---------------------------------------------------------------------------

/// Millisecond durations: `500`, `500.0`, or `"500"`.
mod millis {
    use std::time::Duration;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Float(f64),
        Text(String),
    }

    /// Whole milliseconds as an integer; anything finer as a float so the
    /// value parses back unchanged.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if value.subsec_nanos() % 1_000_000 == 0 {
            serializer.serialize_u64(value.as_millis().min(u128::from(u64::MAX)) as u64)
        } else {
            serializer.serialize_f64(value.as_secs_f64() * 1000.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = match Repr::deserialize(deserializer)? {
            Repr::Int(ms) => return Ok(Duration::from_millis(ms)),
            Repr::Float(ms) => ms,
            Repr::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("`{text}` is not a millisecond count")))?,
        };
        if !ms.is_finite() || ms < 0.0 {
            return Err(D::Error::custom(format!(
                "{ms} is not a non-negative millisecond count"
            )));
        }
        Ok(Duration::from_micros((ms * 1000.0).round() as u64))
    }
}

/// Page-builder switches: `true`, `"yes"`, `"1"`, `""`, ...
mod flag {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Bool(value) => Ok(value),
            Repr::Int(0) => Ok(false),
            Repr::Int(1) => Ok(true),
            Repr::Int(other) => Err(D::Error::custom(format!("{other} is not a switch value"))),
            Repr::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" | "on" => Ok(true),
                "no" | "false" | "0" | "off" | "" => Ok(false),
                _ => Err(D::Error::custom(format!("`{text}` is not a switch value"))),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "autoplay": true,
        "autoplay_speed": 3000,
        "animation_speed": 500,
        "infinite_loop": false,
        "pause_on_hover": true
    }"#;

    #[test]
    fn minimal_payload_uses_documented_defaults() {
        let config = CarouselConfig::from_json(MINIMAL).unwrap();
        assert!(config.autoplay);
        assert_eq!(config.autoplay_speed, Duration::from_millis(3000));
        assert_eq!(config.animation_speed, Duration::from_millis(500));
        assert!(!config.infinite_loop);
        assert!(config.pause_on_hover);
        assert_eq!(config.slide_gap, DEFAULT_SLIDE_GAP);
        assert_eq!(config.peek_amount, 0.0);
        assert_eq!(config.loop_strategy, LoopStrategy::Rewind);
        assert_eq!(config.gesture, GestureConfig::default());
    }

    #[test]
    fn missing_core_key_is_malformed() {
        let err = CarouselConfig::from_json(
            r#"{"autoplay":true,"autoplay_speed":3000,"animation_speed":500,"infinite_loop":false}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
        assert!(err.to_string().contains("pause_on_hover"));
    }

    #[test]
    fn absent_and_blank_payloads_are_missing() {
        assert!(matches!(
            CarouselConfig::from_payload(None),
            Err(ConfigError::Missing)
        ));
        assert!(matches!(
            CarouselConfig::from_payload(Some("   ")),
            Err(ConfigError::Missing)
        ));
    }

    #[test]
    fn truncated_json_is_malformed() {
        let err = CarouselConfig::from_payload(Some(r#"{"autoplay": tr"#)).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn loose_page_builder_values_are_accepted() {
        let config = CarouselConfig::from_json(
            r#"{"autoplay":"yes","autoplay_speed":"2500","animation_speed":"450.5",
                "infinite_loop":1,"pause_on_hover":"","loop_strategy":"clones"}"#,
        )
        .unwrap();
        assert!(config.autoplay);
        assert_eq!(config.autoplay_speed, Duration::from_millis(2500));
        assert_eq!(config.animation_speed, Duration::from_micros(450_500));
        assert!(config.infinite_loop);
        assert!(!config.pause_on_hover);
        assert!(config.uses_clones());
    }

    #[test]
    fn garbage_switch_value_is_rejected() {
        let err = CarouselConfig::from_json(
            r#"{"autoplay":"maybe","autoplay_speed":1,"animation_speed":1,
                "infinite_loop":false,"pause_on_hover":false}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = CarouselConfig::from_json(
            r#"{"autoplay":false,"autoplay_speed":-5,"animation_speed":1,
                "infinite_loop":false,"pause_on_hover":false}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn zero_autoplay_speed_only_matters_with_autoplay() {
        let off = r#"{"autoplay":false,"autoplay_speed":0,"animation_speed":300,
                      "infinite_loop":false,"pause_on_hover":false}"#;
        assert!(CarouselConfig::from_json(off).is_ok());

        let on = off.replace(r#""autoplay":false"#, r#""autoplay":true"#);
        let err = CarouselConfig::from_json(&on).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "autoplay_speed",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let payload = MINIMAL.replace('}', r#","arrows":"yes","dots":false}"#);
        assert!(CarouselConfig::from_json(&payload).is_ok());
    }

    #[test]
    fn partial_gesture_object_keeps_other_defaults() {
        let payload = MINIMAL.replace('}', r#","gesture":{"swipe_threshold":80}}"#);
        let config = CarouselConfig::from_json(&payload).unwrap();
        assert_eq!(config.gesture.swipe_threshold, 80.0);
        assert_eq!(
            config.gesture.velocity_threshold,
            DEFAULT_VELOCITY_THRESHOLD
        );
        assert_eq!(
            config.gesture.min_sample_interval,
            DEFAULT_MIN_SAMPLE_INTERVAL
        );
        assert_eq!(config.gesture.release_window, DEFAULT_RELEASE_WINDOW);
    }

    #[test]
    fn out_of_range_resistance_is_invalid() {
        let payload = MINIMAL.replace('}', r#","gesture":{"edge_resistance":1.5}}"#);
        let err = CarouselConfig::from_json(&payload).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "gesture.edge_resistance",
                ..
            }
        ));
    }

    #[test]
    fn negative_peek_is_invalid() {
        let config = CarouselConfig::default().with_peek_amount(-4.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "peek_amount",
                ..
            })
        ));
    }

    #[test]
    fn clones_require_infinite_loop() {
        let config = CarouselConfig::default().with_loop_strategy(LoopStrategy::Clones);
        assert!(!config.uses_clones());
        assert!(config.with_infinite_loop(true).uses_clones());
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = CarouselConfig::default()
            .with_autoplay(true, Duration::from_millis(1200))
            .with_peek_amount(24.0);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CarouselConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn fractional_millis_survive_reserialization() {
        let config = CarouselConfig::default()
            .with_animation_speed(Duration::from_micros(450_500))
            .with_gesture(GestureConfig {
                min_sample_interval: Duration::from_micros(500),
                ..GestureConfig::default()
            });
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CarouselConfig::from_json(&json).unwrap(), config);
    }
}
