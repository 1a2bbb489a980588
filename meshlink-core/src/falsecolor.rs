/// Scalar to color mapping along a blue-to-red ramp
use crate::buffers::Rgb;
use crate::error::{Error, Result};

/// Ramp stops, evenly spaced from the minimum to the maximum value
const RAMP: [Rgb; 5] = [
    Rgb::new(0.0, 0.0, 1.0),
    Rgb::new(0.0, 1.0, 1.0),
    Rgb::new(0.0, 1.0, 0.0),
    Rgb::new(1.0, 1.0, 0.0),
    Rgb::new(1.0, 0.0, 0.0),
];

fn check_range(min: f32, max: f32) -> Result<()> {
    // Also rejects NaN bounds
    if !(min < max) {
        return Err(Error::InvalidRange { min, max });
    }
    Ok(())
}

fn ramp(t: f32) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (RAMP.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(RAMP.len() - 2);
    let frac = scaled - lower as f32;
    let (a, b) = (RAMP[lower], RAMP[lower + 1]);
    Rgb::new(
        a.r + (b.r - a.r) * frac,
        a.g + (b.g - a.g) * frac,
        a.b + (b.b - a.b) * frac,
    )
}

/// Color of `value` on a ramp spanning `[min, max]`.
///
/// Values outside the range take the end colors.
pub fn falsecolor(value: f32, min: f32, max: f32) -> Result<Rgb> {
    check_range(min, max)?;
    Ok(ramp((value - min) / (max - min)))
}

/// Colors for every value as a flat `[r1, g1, b1, r2, ...]` buffer
pub fn falsecolors(values: &[f32], min: f32, max: f32) -> Result<Vec<f32>> {
    check_range(min, max)?;
    Ok(values
        .iter()
        .flat_map(|v| ramp((v - min) / (max - min)).to_array())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ramp_ends_and_middle() {
        assert_eq!(falsecolor(0.0, 0.0, 10.0).unwrap(), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(falsecolor(10.0, 0.0, 10.0).unwrap(), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(falsecolor(5.0, 0.0, 10.0).unwrap(), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_interpolates_between_stops() {
        let c = falsecolor(1.25, 0.0, 10.0).unwrap();
        assert_relative_eq!(c.r, 0.0);
        assert_relative_eq!(c.g, 0.5);
        assert_relative_eq!(c.b, 1.0);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(falsecolor(-5.0, 0.0, 1.0).unwrap(), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(falsecolor(7.0, 0.0, 1.0).unwrap(), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_flat_output() {
        let flat = falsecolors(&[0.0, 1.0], 0.0, 1.0).unwrap();
        assert_eq!(flat, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(matches!(falsecolors(&[1.0], 2.0, 2.0), Err(Error::InvalidRange { .. })));
        assert!(falsecolor(1.0, 3.0, 2.0).is_err());
    }
}
