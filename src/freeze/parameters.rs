//! Control-rate parameter staging.
//!
//! [`StagedParameters`] is the only state shared between the control context
//! and the audio context. Setters store a clamped value into a per-field atomic
//! and flag it pending; the audio context drains every pending field into its
//! private [`EffectConfig`] once, at the start of a block. A second write before
//! the commit simply replaces the first.
//!
//! Every field fits in a single 32-bit atomic, so a commit never observes half
//! of a write. Frequency ranges are packed as two 16-bit centi-hertz values for
//! the same reason.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::buffer::BitDepth;
use crate::utils::clamp;

/// Upper bound for the playback speed multiplier.
pub const MAX_SPEED: f32 = 4.0;

/// Upper bound for a packed oscillator frequency, in Hz.
pub const MAX_PACKED_FREQUENCY: f32 = u16::MAX as f32 / 100.0;

/// Oscillator frequency range in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyRange {
    pub min: f32,
    pub max: f32,
}

impl FrequencyRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.max > 0.0
            && self.min <= self.max
    }

    fn pack(self) -> u32 {
        let to_centi = |hz: f32| (clamp(hz, 0.0, MAX_PACKED_FREQUENCY) * 100.0 + 0.5) as u32;
        let (a, b) = (to_centi(self.min), to_centi(self.max));
        (a.min(b) << 16) | a.max(b)
    }

    fn unpack(packed: u32) -> Self {
        Self {
            min: (packed >> 16) as f32 / 100.0,
            max: (packed & 0xFFFF) as f32 / 100.0,
        }
    }
}

/// Parameter snapshot used by the audio context.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectConfig {
    pub bit_depth: BitDepth,
    /// Loop length as a fraction of the buffer.
    pub length: f32,
    /// Loop centre as a fraction of the buffer.
    pub centre: f32,
    /// Playback speed multiplier, 1.0 is the recorded rate.
    pub speed: f32,
    pub reverse: bool,
    pub cross_fade: bool,
    pub freeze_active: bool,
    /// Dry/wet balance while frozen.
    pub mix: f32,
    pub wow_amount: f32,
    pub flutter_amount: f32,
    pub wow_range: FrequencyRange,
    pub flutter_range: FrequencyRange,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            bit_depth: BitDepth::Sixteen,
            length: 0.5,
            centre: 0.5,
            speed: 1.0,
            reverse: false,
            cross_fade: true,
            freeze_active: false,
            mix: 1.0,
            wow_amount: 0.0,
            flutter_amount: 0.0,
            wow_range: FrequencyRange::new(0.3, 1.2),
            flutter_range: FrequencyRange::new(6.0, 12.0),
        }
    }
}

impl EffectConfig {
    /// Copy with every field clamped to its valid range.
    pub fn sanitized(&self) -> Self {
        Self {
            length: clamp(self.length, 0.0, 1.0),
            centre: clamp(self.centre, 0.0, 1.0),
            speed: clamp(self.speed, 0.0, MAX_SPEED),
            mix: clamp(self.mix, 0.0, 1.0),
            wow_amount: clamp(self.wow_amount, 0.0, 1.0),
            flutter_amount: clamp(self.flutter_amount, 0.0, 1.0),
            wow_range: FrequencyRange::unpack(self.wow_range.pack()),
            flutter_range: FrequencyRange::unpack(self.flutter_range.pack()),
            ..*self
        }
    }
}

/// Bit set of fields changed by a commit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pending(u32);

impl Pending {
    pub const BIT_DEPTH: Pending = Pending(1 << 0);
    pub const LENGTH: Pending = Pending(1 << 1);
    pub const CENTRE: Pending = Pending(1 << 2);
    pub const SPEED: Pending = Pending(1 << 3);
    pub const REVERSE: Pending = Pending(1 << 4);
    pub const CROSS_FADE: Pending = Pending(1 << 5);
    pub const FREEZE: Pending = Pending(1 << 6);
    pub const MIX: Pending = Pending(1 << 7);
    pub const WOW_AMOUNT: Pending = Pending(1 << 8);
    pub const FLUTTER_AMOUNT: Pending = Pending(1 << 9);
    pub const WOW_RANGE: Pending = Pending(1 << 10);
    pub const FLUTTER_RANGE: Pending = Pending(1 << 11);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any flag of `other` is set.
    #[inline]
    pub fn intersects(self, other: Pending) -> bool {
        self.0 & other.0 != 0
    }
}

impl core::ops::BitOr for Pending {
    type Output = Pending;

    fn bitor(self, rhs: Pending) -> Pending {
        Pending(self.0 | rhs.0)
    }
}

#[derive(Debug)]
pub struct StagedParameters {
    pending: AtomicU32,

    bit_depth: AtomicU8,
    length: AtomicU32,
    centre: AtomicU32,
    speed: AtomicU32,
    reverse: AtomicBool,
    cross_fade: AtomicBool,
    freeze_active: AtomicBool,
    mix: AtomicU32,
    wow_amount: AtomicU32,
    flutter_amount: AtomicU32,
    wow_range: AtomicU32,
    flutter_range: AtomicU32,
}

impl Default for StagedParameters {
    fn default() -> Self {
        Self::new(&EffectConfig::default())
    }
}

impl StagedParameters {
    pub fn new(config: &EffectConfig) -> Self {
        let config = config.sanitized();
        Self {
            pending: AtomicU32::new(0),
            bit_depth: AtomicU8::new(config.bit_depth.bits()),
            length: AtomicU32::new(config.length.to_bits()),
            centre: AtomicU32::new(config.centre.to_bits()),
            speed: AtomicU32::new(config.speed.to_bits()),
            reverse: AtomicBool::new(config.reverse),
            cross_fade: AtomicBool::new(config.cross_fade),
            freeze_active: AtomicBool::new(config.freeze_active),
            mix: AtomicU32::new(config.mix.to_bits()),
            wow_amount: AtomicU32::new(config.wow_amount.to_bits()),
            flutter_amount: AtomicU32::new(config.flutter_amount.to_bits()),
            wow_range: AtomicU32::new(config.wow_range.pack()),
            flutter_range: AtomicU32::new(config.flutter_range.pack()),
        }
    }

    /// Overwrites every field with `config` and drops anything pending.
    pub fn reset(&self, config: &EffectConfig) {
        let config = config.sanitized();
        self.bit_depth.store(config.bit_depth.bits(), Ordering::Relaxed);
        store_f32(&self.length, config.length);
        store_f32(&self.centre, config.centre);
        store_f32(&self.speed, config.speed);
        self.reverse.store(config.reverse, Ordering::Relaxed);
        self.cross_fade.store(config.cross_fade, Ordering::Relaxed);
        self.freeze_active.store(config.freeze_active, Ordering::Relaxed);
        store_f32(&self.mix, config.mix);
        store_f32(&self.wow_amount, config.wow_amount);
        store_f32(&self.flutter_amount, config.flutter_amount);
        self.wow_range.store(config.wow_range.pack(), Ordering::Relaxed);
        self.flutter_range.store(config.flutter_range.pack(), Ordering::Relaxed);
        self.pending.store(0, Ordering::Release);
    }

    #[inline]
    fn mark(&self, field: Pending) {
        self.pending.fetch_or(field.0, Ordering::Release);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire) != 0
    }

    pub fn set_bit_depth(&self, bits: u8) {
        let bit_depth = BitDepth::from_bits(bits);
        log::trace!("staged bit depth {}", bit_depth.bits());
        self.bit_depth.store(bit_depth.bits(), Ordering::Relaxed);
        self.mark(Pending::BIT_DEPTH);
    }

    pub fn set_length(&self, length: f32) {
        let length = clamp(length, 0.0, 1.0);
        log::trace!("staged length {length}");
        store_f32(&self.length, length);
        self.mark(Pending::LENGTH);
    }

    pub fn set_centre(&self, centre: f32) {
        let centre = clamp(centre, 0.0, 1.0);
        log::trace!("staged centre {centre}");
        store_f32(&self.centre, centre);
        self.mark(Pending::CENTRE);
    }

    pub fn set_speed(&self, speed: f32) {
        let speed = clamp(speed, 0.0, MAX_SPEED);
        log::trace!("staged speed {speed}");
        store_f32(&self.speed, speed);
        self.mark(Pending::SPEED);
    }

    pub fn set_reverse(&self, reverse: bool) {
        log::trace!("staged reverse {reverse}");
        self.reverse.store(reverse, Ordering::Relaxed);
        self.mark(Pending::REVERSE);
    }

    pub fn set_cross_fade(&self, cross_fade: bool) {
        log::trace!("staged cross fade {cross_fade}");
        self.cross_fade.store(cross_fade, Ordering::Relaxed);
        self.mark(Pending::CROSS_FADE);
    }

    pub fn set_freeze(&self, active: bool) {
        log::trace!("staged freeze {active}");
        self.freeze_active.store(active, Ordering::Relaxed);
        self.mark(Pending::FREEZE);
    }

    pub fn set_mix(&self, mix: f32) {
        let mix = clamp(mix, 0.0, 1.0);
        log::trace!("staged mix {mix}");
        store_f32(&self.mix, mix);
        self.mark(Pending::MIX);
    }

    /// Depth of the slow modulation, in speed units.
    pub fn set_wow_amount(&self, amount: f32) {
        let amount = clamp(amount, 0.0, 1.0);
        log::trace!("staged wow amount {amount}");
        store_f32(&self.wow_amount, amount);
        self.mark(Pending::WOW_AMOUNT);
    }

    /// Depth of the fast modulation, in speed units.
    pub fn set_flutter_amount(&self, amount: f32) {
        let amount = clamp(amount, 0.0, 1.0);
        log::trace!("staged flutter amount {amount}");
        store_f32(&self.flutter_amount, amount);
        self.mark(Pending::FLUTTER_AMOUNT);
    }

    pub fn set_wow_frequency_range(&self, min: f32, max: f32) {
        log::trace!("staged wow range {min}..{max}");
        self.wow_range
            .store(FrequencyRange::new(min, max).pack(), Ordering::Relaxed);
        self.mark(Pending::WOW_RANGE);
    }

    pub fn set_flutter_frequency_range(&self, min: f32, max: f32) {
        log::trace!("staged flutter range {min}..{max}");
        self.flutter_range
            .store(FrequencyRange::new(min, max).pack(), Ordering::Relaxed);
        self.mark(Pending::FLUTTER_RANGE);
    }

    /// Drains every pending field into `config`. Audio context only.
    pub fn commit(&self, config: &mut EffectConfig) -> Pending {
        let pending = Pending(self.pending.swap(0, Ordering::Acquire));
        if pending.is_empty() {
            return pending;
        }

        if pending.intersects(Pending::BIT_DEPTH) {
            config.bit_depth = BitDepth::from_bits(self.bit_depth.load(Ordering::Relaxed));
        }
        if pending.intersects(Pending::LENGTH) {
            config.length = load_f32(&self.length);
        }
        if pending.intersects(Pending::CENTRE) {
            config.centre = load_f32(&self.centre);
        }
        if pending.intersects(Pending::SPEED) {
            config.speed = load_f32(&self.speed);
        }
        if pending.intersects(Pending::REVERSE) {
            config.reverse = self.reverse.load(Ordering::Relaxed);
        }
        if pending.intersects(Pending::CROSS_FADE) {
            config.cross_fade = self.cross_fade.load(Ordering::Relaxed);
        }
        if pending.intersects(Pending::FREEZE) {
            config.freeze_active = self.freeze_active.load(Ordering::Relaxed);
        }
        if pending.intersects(Pending::MIX) {
            config.mix = load_f32(&self.mix);
        }
        if pending.intersects(Pending::WOW_AMOUNT) {
            config.wow_amount = load_f32(&self.wow_amount);
        }
        if pending.intersects(Pending::FLUTTER_AMOUNT) {
            config.flutter_amount = load_f32(&self.flutter_amount);
        }
        if pending.intersects(Pending::WOW_RANGE) {
            config.wow_range = FrequencyRange::unpack(self.wow_range.load(Ordering::Relaxed));
        }
        if pending.intersects(Pending::FLUTTER_RANGE) {
            config.flutter_range =
                FrequencyRange::unpack(self.flutter_range.load(Ordering::Relaxed));
        }

        pending
    }
}

#[inline]
fn store_f32(atomic: &AtomicU32, value: f32) {
    atomic.store(value.to_bits(), Ordering::Relaxed);
}

#[inline]
fn load_f32(atomic: &AtomicU32) -> f32 {
    f32::from_bits(atomic.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_clamp_at_the_boundary() {
        let staged = StagedParameters::default();
        let mut config = EffectConfig::default();

        staged.set_length(3.0);
        staged.set_centre(-1.0);
        staged.set_speed(100.0);
        staged.set_bit_depth(9);
        staged.set_mix(f32::NAN);
        staged.commit(&mut config);

        assert_eq!(config.length, 1.0);
        assert_eq!(config.centre, 0.0);
        assert_eq!(config.speed, MAX_SPEED);
        assert_eq!(config.bit_depth, BitDepth::Eight);
        assert_eq!(config.mix, 0.0);
    }

    #[test]
    fn commit_drains_once() {
        let staged = StagedParameters::default();
        let mut config = EffectConfig::default();

        staged.set_speed(2.0);
        assert!(staged.has_pending());
        let pending = staged.commit(&mut config);
        assert!(pending.intersects(Pending::SPEED));
        assert!(!pending.intersects(Pending::LENGTH));
        assert_eq!(config.speed, 2.0);

        assert!(staged.commit(&mut config).is_empty());
    }

    #[test]
    fn last_write_wins() {
        let staged = StagedParameters::default();
        let mut config = EffectConfig::default();

        staged.set_centre(0.1);
        staged.set_centre(0.9);
        staged.commit(&mut config);
        assert_eq!(config.centre, 0.9);
    }

    #[test]
    fn unflagged_fields_are_left_alone() {
        let staged = StagedParameters::default();
        let mut config = EffectConfig {
            length: 0.25,
            ..EffectConfig::default()
        };
        staged.set_reverse(true);
        staged.commit(&mut config);
        assert_eq!(config.length, 0.25);
        assert!(config.reverse);
    }

    #[test]
    fn ranges_survive_packing() {
        let staged = StagedParameters::default();
        let mut config = EffectConfig::default();

        staged.set_wow_frequency_range(2.0, 0.5);
        staged.set_flutter_frequency_range(7.25, 11.5);
        staged.commit(&mut config);

        assert_eq!(config.wow_range, FrequencyRange::new(0.5, 2.0));
        assert_eq!(config.flutter_range, FrequencyRange::new(7.25, 11.5));
    }

    #[test]
    fn reset_drops_pending() {
        let staged = StagedParameters::default();
        staged.set_freeze(true);
        staged.reset(&EffectConfig::default());
        assert!(!staged.has_pending());
    }
}
