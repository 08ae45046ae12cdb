//! Utilities

/// Clamp a value to the given range
pub fn clamp<T>(value: T, min: T, max: T) -> T where T: PartialOrd {
    if value < min { min } else if value > max { max } else { value }
}

/// Linearly interpolate between `a` and `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1, 0, 3), 0);
        assert_eq!(clamp(2, 0, 3), 2);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(-1.0, 1.0, 0.5), 0.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }
}
