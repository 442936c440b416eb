use num_traits::{AsPrimitive, Float};

/// Returns `n` values starting at `start`, `step` apart.
///
/// Each value is computed from its index rather than accumulated, so
/// rounding error does not grow along the sequence.
pub fn steps<T>(start: T, step: T, n: usize) -> impl Iterator<Item = T>
where
    T: Float + 'static,
    usize: AsPrimitive<T>,
{
    (0..n).map(move |i| start + i.as_() * step)
}

#[cfg(test)]
mod tests {
    use super::steps;

    #[test]
    fn test_steps() {
        let offsets: Vec<f64> = steps(-2.0, 0.5, 9).collect();
        assert_eq!(
            offsets,
            vec![-2.0, -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0]
        );
        assert_eq!(steps(0.0_f32, 1.0, 0).count(), 0);
    }
}
