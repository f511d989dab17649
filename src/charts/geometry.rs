//! Chart Geometry
//! Colors, value ranges and pie slice layout shared by the interactive plot
//! and the static renderer.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Bar fill (material blue)
pub const BAR_RGB: (u8, u8, u8) = (33, 150, 243);
/// Line stroke (material green)
pub const LINE_RGB: (u8, u8, u8) = (76, 175, 80);
/// Scatter marker (material orange)
pub const SCATTER_RGB: (u8, u8, u8) = (255, 152, 0);
/// Histogram fill
pub const HISTOGRAM_RGB: (u8, u8, u8) = (31, 119, 180);

/// Pie slice palette
pub const PALETTE: [(u8, u8, u8); 10] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
    (188, 189, 34),
    (23, 190, 207),
];

/// Color for the `index`-th pie slice.
pub fn palette_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Y range covering all values and zero, padded by 5% on each side.
pub fn value_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max - min <= f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (
        if min < 0.0 { min - pad } else { min },
        if max > 0.0 { max + pad } else { max },
    )
}

/// One wedge of a pie chart. Angles in radians, counter-clockwise from +x.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Polygon outline of the wedge on a circle of `radius` at `center`.
    pub fn outline(&self, center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
        let sweep = self.end_angle - self.start_angle;
        let steps = ((sweep.abs() / TAU) * 120.0).ceil().max(2.0) as usize;

        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for i in 0..=steps {
            let angle = self.start_angle + sweep * i as f64 / steps as f64;
            points.push((
                center.0 + radius * angle.cos(),
                center.1 + radius * angle.sin(),
            ));
        }
        points
    }
}

/// Lay out pie slices starting at 12 o'clock, counter-clockwise.
///
/// Returns `None` when a value is negative or the total is not positive.
pub fn pie_slices<'a>(items: impl IntoIterator<Item = (&'a str, f64)>) -> Option<Vec<PieSlice>> {
    let items: Vec<(&str, f64)> = items.into_iter().collect();
    if items.iter().any(|(_, v)| *v < 0.0 || !v.is_finite()) {
        return None;
    }

    let total: f64 = items.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return None;
    }

    let mut angle = FRAC_PI_2;
    Some(
        items
            .into_iter()
            .map(|(label, value)| {
                let fraction = value / total;
                let start_angle = angle;
                angle += fraction * TAU;
                PieSlice {
                    label: label.to_string(),
                    fraction,
                    start_angle,
                    end_angle: angle,
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_fractions_sum_to_one() {
        let slices = pie_slices([("a", 1.0), ("b", 3.0)]).unwrap();
        assert_eq!(slices.len(), 2);
        assert!((slices[0].fraction - 0.25).abs() < 1e-12);
        assert!((slices[1].end_angle - (FRAC_PI_2 + TAU)).abs() < 1e-12);
        assert_eq!(slices[1].label, "b");
    }

    #[test]
    fn pie_rejects_negative_or_zero_total() {
        assert!(pie_slices([("a", -1.0), ("b", 3.0)]).is_none());
        assert!(pie_slices([("a", 0.0)]).is_none());
    }

    #[test]
    fn outline_starts_at_center() {
        let slices = pie_slices([("a", 1.0)]).unwrap();
        let outline = slices[0].outline((0.0, 0.0), 1.0);
        assert_eq!(outline[0], (0.0, 0.0));
        assert!(outline.len() > 100);
    }

    #[test]
    fn value_range_includes_zero() {
        let (lo, hi) = value_range(&[10.0, 20.0]);
        assert_eq!(lo, 0.0);
        assert!(hi > 20.0);

        let (lo, hi) = value_range(&[-5.0, 5.0]);
        assert!(lo < -5.0 && hi > 5.0);

        let (lo, hi) = value_range(&[0.0]);
        assert_eq!((lo, hi), (-1.0, 1.0));
    }
}
