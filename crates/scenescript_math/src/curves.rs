//! Closed-form per-frame curves
//!
//! These are evaluated once per frame by the scene scripts; none of them
//! carries state between frames.

/// Triangular envelope: 0 at `center ± half_width`, 1 at `center`
///
/// `1 - |x - center| / half_width`. Values outside the support go negative;
/// callers that need a clamp apply it themselves.
#[inline]
pub fn triangle_envelope(x: f32, center: f32, half_width: f32) -> f32 {
    1.0 - (x - center).abs() / half_width
}

/// Re-centre a unit sample around `base`
///
/// `(sample - 0.5) * amplitude + base`, so a sample in `[0, 1)` lands in
/// `[base - amplitude/2, base + amplitude/2)`.
#[inline]
pub fn centered_jitter(sample: f32, amplitude: f32, base: f32) -> f32 {
    (sample - 0.5) * amplitude + base
}
