use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

use super::canvas::Canvas;
use super::palette::PanelColor;

/// One labeled time series handed to the chart collaborator.
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    pub points: &'a [(i64, f64)],
    pub color: PanelColor,
    pub dashed: bool,
}

/// Chart-drawing capability. The render engine composes charts onto the
/// canvas at fixed offsets but does not own the plotting algorithm.
pub trait ChartRenderer: Send {
    /// Plot a series into `region`. `y_range` pins the vertical scale;
    /// without it the scale hugs the data.
    fn plot(&self, cv: &mut Canvas, region: Rectangle, series: &Series<'_>, y_range: Option<(f64, f64)>);

    /// Vertical marker at a horizontal fraction of the region.
    fn vline(&self, cv: &mut Canvas, region: Rectangle, x_frac: f64, color: PanelColor, dashed: bool);
}

/// Default chart renderer: plain scaled polylines, no axes.
#[derive(Debug, Default)]
pub struct PolylineChart;

const STROKE: u32 = 2;

impl ChartRenderer for PolylineChart {
    fn plot(&self, cv: &mut Canvas, region: Rectangle, series: &Series<'_>, y_range: Option<(f64, f64)>) {
        let pts = series.points;
        if pts.len() < 2 || region.size.width < 2 || region.size.height < 2 {
            return;
        }

        let x_min = pts.first().map(|p| p.0).unwrap_or(0) as f64;
        let x_max = pts.last().map(|p| p.0).unwrap_or(1) as f64;
        let x_span = (x_max - x_min).max(1.0);

        let (y_min, y_max) = y_range.unwrap_or_else(|| {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for &(_, v) in pts {
                lo = lo.min(v);
                hi = hi.max(v);
            }
            (lo, hi)
        });
        let y_span = (y_max - y_min).max(f64::EPSILON);

        let w = (region.size.width - 1) as f64;
        let h = (region.size.height - 1) as f64;
        let to_point = |&(x, v): &(i64, f64)| -> Point {
            let fx = (x as f64 - x_min) / x_span;
            let fy = ((v - y_min) / y_span).clamp(0.0, 1.0);
            region.top_left + Point::new((fx * w) as i32, ((1.0 - fy) * h) as i32)
        };

        let style = PrimitiveStyle::with_stroke(series.color, STROKE);
        for (i, pair) in pts.windows(2).enumerate() {
            // dashed series drop every other segment
            if series.dashed && i % 2 == 1 {
                continue;
            }
            let _ = Line::new(to_point(&pair[0]), to_point(&pair[1]))
                .into_styled(style)
                .draw(cv);
        }
    }

    fn vline(&self, cv: &mut Canvas, region: Rectangle, x_frac: f64, color: PanelColor, dashed: bool) {
        let x = region.top_left.x
            + ((x_frac.clamp(0.0, 1.0)) * (region.size.width.saturating_sub(1)) as f64) as i32;
        let y0 = region.top_left.y;
        let y1 = y0 + region.size.height as i32 - 1;
        let style = PrimitiveStyle::with_stroke(color, 1);
        if dashed {
            let mut y = y0;
            while y < y1 {
                let _ = Line::new(Point::new(x, y), Point::new(x, (y + 3).min(y1)))
                    .into_styled(style)
                    .draw(cv);
                y += 8;
            }
        } else {
            let _ = Line::new(Point::new(x, y0), Point::new(x, y1)).into_styled(style).draw(cv);
        }
    }
}

/// Hour-indexed day/night elevation curve: cos((h/12 - 1) * pi), the
/// trough at midnight and the crest at noon.
pub fn day_curve_samples() -> Vec<(i64, f64)> {
    (0..24)
        .map(|h| (h as i64, ((h as f64 / 12.0 - 1.0) * std::f64::consts::PI).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Rectangle {
        Rectangle::new(Point::new(10, 10), Size::new(100, 40))
    }

    #[test]
    fn plot_stays_inside_region() {
        let mut cv = Canvas::new(200, 100, PanelColor::White);
        let pts: Vec<(i64, f64)> = (0..48).map(|i| (i as i64 * 3600, (i % 7) as f64)).collect();
        let series = Series { points: &pts, color: PanelColor::Orange, dashed: false };
        PolylineChart.plot(&mut cv, region(), &series, None);

        for y in 0..100 {
            for x in 0..200 {
                if cv.get(x, y) == Some(PanelColor::Orange) {
                    // stroke width can spill one pixel past the region edge
                    assert!((9..=111).contains(&(x as i32)), "x={x}");
                    assert!((9..=51).contains(&(y as i32)), "y={y}");
                }
            }
        }
    }

    #[test]
    fn single_point_series_is_a_noop() {
        let mut cv = Canvas::new(200, 100, PanelColor::White);
        let pts = [(0i64, 5.0f64)];
        let series = Series { points: &pts, color: PanelColor::Red, dashed: false };
        PolylineChart.plot(&mut cv, region(), &series, None);
        assert!(cv.pixels().iter().all(|c| *c == PanelColor::White));
    }

    #[test]
    fn day_curve_shape() {
        let samples = day_curve_samples();
        assert_eq!(samples.len(), 24);
        assert!((samples[0].1 + 1.0).abs() < 1e-9); // midnight trough
        assert!((samples[12].1 - 1.0).abs() < 1e-9); // noon crest
    }
}
