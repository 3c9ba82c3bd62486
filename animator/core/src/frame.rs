//! Frames and Frame Durations
//!
//! A frame is one displayable image plus how long it stays on screen.
//! Durations are either fixed or drawn uniformly from a closed range every
//! time the scheduler decides when the next frame is due.

use rand::Rng;

use crate::error::{AnimatorError, Result};

/// How long a frame is displayed, in milliseconds
///
/// Only [`FrameDuration::fixed`] and [`FrameDuration::range`] build one, so a
/// range is never empty by the time it is sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDuration(Kind);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    /// Always the same delay
    Fixed(u64),
    /// Uniformly random delay in `[min, max]` (inclusive)
    Range { min: u64, max: u64 },
}

impl FrameDuration {
    /// Create a fixed duration, rejecting negative values
    pub fn fixed(ms: i64) -> Result<Self> {
        if ms < 0 {
            return Err(AnimatorError::InvalidDuration { min: ms, max: ms });
        }
        Ok(Self(Kind::Fixed(ms as u64)))
    }

    /// Create a ranged duration, rejecting negative bounds and `min > max`
    pub fn range(min: i64, max: i64) -> Result<Self> {
        if min < 0 || max < 0 || min > max {
            return Err(AnimatorError::InvalidDuration { min, max });
        }
        Ok(Self(Kind::Range {
            min: min as u64,
            max: max as u64,
        }))
    }

    /// Draw the delay for one scheduling decision
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self.0 {
            Kind::Fixed(ms) => ms,
            Kind::Range { min, max } => rng.gen_range(min..=max),
        }
    }

    /// Whether the delay is randomized
    pub fn is_ranged(&self) -> bool {
        matches!(self.0, Kind::Range { .. })
    }

    /// Smallest delay this duration can produce
    pub fn min_ms(&self) -> u64 {
        match self.0 {
            Kind::Fixed(ms) => ms,
            Kind::Range { min, .. } => min,
        }
    }

    /// Largest delay this duration can produce
    pub fn max_ms(&self) -> u64 {
        match self.0 {
            Kind::Fixed(ms) => ms,
            Kind::Range { max, .. } => max,
        }
    }
}

/// One displayable image and its display duration
///
/// `H` is the image service's handle to the decoded pixels; `width` and
/// `height` are the image's natural dimensions, used to preserve the aspect
/// ratio when the frame is scaled to the viewport.
#[derive(Clone, Debug)]
pub struct Frame<H> {
    image: H,
    width: u32,
    height: u32,
    duration: FrameDuration,
}

impl<H> Frame<H> {
    /// Create a frame from a decoded image
    pub fn new(image: H, width: u32, height: u32, duration: FrameDuration) -> Self {
        Self {
            image,
            width,
            height,
            duration,
        }
    }

    /// Handle to the decoded image
    pub fn image(&self) -> &H {
        &self.image
    }

    /// Natural image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Display duration
    pub fn duration(&self) -> FrameDuration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_duration() {
        let d = FrameDuration::fixed(200).unwrap();
        assert_eq!((d.min_ms(), d.max_ms()), (200, 200));
        assert!(!d.is_ranged());

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(d.sample(&mut rng), 200);
    }

    #[test]
    fn test_zero_duration_is_valid() {
        assert_eq!(FrameDuration::fixed(0).unwrap().max_ms(), 0);
        let d = FrameDuration::range(0, 0).unwrap();
        assert!(d.is_ranged());
        assert_eq!((d.min_ms(), d.max_ms()), (0, 0));
    }

    #[test]
    fn test_negative_fixed_rejected() {
        assert_eq!(
            FrameDuration::fixed(-1),
            Err(AnimatorError::InvalidDuration { min: -1, max: -1 })
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert_eq!(
            FrameDuration::range(5000, 500),
            Err(AnimatorError::InvalidDuration { min: 5000, max: 500 })
        );
        assert!(FrameDuration::range(-10, 10).is_err());
    }

    #[test]
    fn test_degenerate_range_samples_its_only_value() {
        let d = FrameDuration::range(300, 300).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(d.sample(&mut rng), 300);
        }
    }

    #[test]
    fn test_frame_accessors() {
        let frame = Frame::new("neutral", 64, 128, FrameDuration::fixed(100).unwrap());
        assert_eq!(*frame.image(), "neutral");
        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 128);
        assert_eq!(frame.duration().min_ms(), 100);
        assert_eq!(frame.duration().max_ms(), 100);
    }
}
