//! Reference resolution handling.
//!
//! Status bars and HUDs are authored against a logical reference
//! resolution. An unset axis (zero) falls back to the classic 320x200.

/// Default horizontal reference resolution.
pub const HORIZONTAL_RESOLUTION_DEFAULT: i32 = 320;
/// Default vertical reference resolution.
pub const VERTICAL_RESOLUTION_DEFAULT: i32 = 200;

/// Logical resolution a layout was designed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceResolution {
    pub horizontal: i32,
    pub vertical: i32,
}

impl ReferenceResolution {
    pub const fn new(horizontal: i32, vertical: i32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Copy with zero axes replaced by the defaults.
    pub fn validated(self) -> Self {
        let (horizontal, vertical) = validate_resolution(self.horizontal, self.vertical);
        Self {
            horizontal,
            vertical,
        }
    }
}

impl Default for ReferenceResolution {
    fn default() -> Self {
        Self::new(HORIZONTAL_RESOLUTION_DEFAULT, VERTICAL_RESOLUTION_DEFAULT)
    }
}

/// Replace any zero axis with the default reference resolution.
pub fn validate_resolution(hres: i32, vres: i32) -> (i32, i32) {
    let hres = if hres == 0 {
        HORIZONTAL_RESOLUTION_DEFAULT
    } else {
        hres
    };
    let vres = if vres == 0 {
        VERTICAL_RESOLUTION_DEFAULT
    } else {
        vres
    };
    (hres, vres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_axes_get_defaults() {
        assert_eq!(validate_resolution(0, 0), (320, 200));
        assert_eq!(validate_resolution(640, 0), (640, 200));
        assert_eq!(validate_resolution(0, 480), (320, 480));
    }

    #[test]
    fn test_nonzero_axes_untouched() {
        assert_eq!(validate_resolution(640, 400), (640, 400));
        // Only zero is "unset"; negatives pass through unchanged.
        assert_eq!(validate_resolution(-1, -1), (-1, -1));
    }

    #[test]
    fn test_validated_struct() {
        let res = ReferenceResolution::new(0, 240).validated();
        assert_eq!(res, ReferenceResolution::new(320, 240));
        assert_eq!(ReferenceResolution::default(), ReferenceResolution::new(320, 200));
    }

    proptest! {
        #[test]
        fn validate_is_idempotent(h in -2000i32..2000, v in -2000i32..2000) {
            let once = validate_resolution(h, v);
            let twice = validate_resolution(once.0, once.1);
            prop_assert_eq!(once, twice);
        }
    }
}
