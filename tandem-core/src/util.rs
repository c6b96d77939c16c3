//! Utilities shared by agents and workers.

/// Applies Polyak averaging on parameter slices.
///
/// `target = tau * target + (1 - tau) * source`, elementwise. `tau` is the
/// retention weight on the target: values close to 1 make the target track
/// the source slowly (the default agent configuration uses 0.995).
pub fn polyak_update(source: &[f32], target: &mut [f32], tau: f32) {
    debug_assert_eq!(source.len(), target.len());
    for (t, s) in target.iter_mut().zip(source.iter()) {
        *t = tau * *t + (1.0 - tau) * *s;
    }
}

#[cfg(test)]
mod tests {
    use super::polyak_update;

    #[test]
    fn test_polyak_update() {
        let tau = 0.7;
        let source = [1.0f32, 2.0, 3.0];
        let mut target = [4.0f32, 5.0, 6.0];
        polyak_update(&source, &mut target, tau);

        for (i, t) in target.iter().enumerate() {
            let expected = tau * (4.0 + i as f32) + (1.0 - tau) * (1.0 + i as f32);
            assert!((t - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_polyak_update_tau_one_freezes_target() {
        let source = [1.0f32, 1.0];
        let mut target = [0.5f32, -0.5];
        polyak_update(&source, &mut target, 1.0);
        assert_eq!(target, [0.5, -0.5]);
    }
}
