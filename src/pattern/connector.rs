//! Adaptive edge-to-edge connector mesh.
//!
//! Two directed edges are sampled at the same parameters `t = i / n` and the
//! sample pairs are joined with one-pixel lines. `n` comes from the mean edge
//! length divided by the target spacing, so a recipe keeps its visual density
//! whether the region is two cells wide or twenty.

use crate::{
    foundation::{
        core::{Edge, Line, Rgba8},
        error::{SpriteError, SpriteResult},
    },
    raster::{draw::draw_line, surface::RasterSurface},
};

/// Number of connector intervals: `max(1, round(mean_length / spacing))`.
pub fn interval_count(edge1: Edge, edge2: Edge, target_spacing: f64) -> SpriteResult<usize> {
    if !target_spacing.is_finite() || target_spacing <= 0.0 {
        return Err(SpriteError::validation(format!(
            "connector spacing must be > 0 (got {target_spacing})"
        )));
    }
    let mean = (edge1.length() + edge2.length()) / 2.0;
    Ok(((mean / target_spacing).round() as usize).max(1))
}

/// The `n + 1` connector segments, first joining the two start points and
/// last joining the two end points.
pub fn connector_lines(edge1: Edge, edge2: Edge, target_spacing: f64) -> SpriteResult<Vec<Line>> {
    let n = interval_count(edge1, edge2, target_spacing)?;
    let lines = (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            Line::new(edge1.point_at(t), edge2.point_at(t))
        })
        .collect();
    Ok(lines)
}

/// Draws the connector mesh between two edges and returns the segments drawn.
pub fn draw_connectors(
    surface: &mut RasterSurface,
    edge1: Edge,
    edge2: Edge,
    target_spacing: f64,
    color: Rgba8,
) -> SpriteResult<Vec<Line>> {
    let lines = connector_lines(edge1, edge2, target_spacing)?;
    for line in &lines {
        draw_line(surface, line.p0, line.p1, color, 1.0);
    }
    tracing::trace!(count = lines.len(), "drew connectors");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Point;

    fn edge(x0: f64, y0: f64, x1: f64, y1: f64) -> Edge {
        Edge::new((x0, y0), (x1, y1))
    }

    #[test]
    fn count_follows_rounded_mean_length() {
        // Lengths 30 and 50 -> mean 40 -> 40 / 7.5 = 5.33 -> 5 intervals.
        let e1 = edge(0.0, 0.0, 30.0, 0.0);
        let e2 = edge(0.0, 10.0, 0.0, 60.0);
        let lines = connector_lines(e1, e2, 7.5).unwrap();
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn endpoints_join_start_and_end_points() {
        let e1 = edge(1.0, 2.0, 41.0, 12.0);
        let e2 = edge(5.0, 30.0, 20.0, 50.0);
        let lines = connector_lines(e1, e2, 3.0).unwrap();
        let first = lines.first().unwrap();
        let last = lines.last().unwrap();
        assert_eq!((first.p0, first.p1), (e1.a, e2.a));
        assert_eq!((last.p0, last.p1), (e1.b, e2.b));
    }

    #[test]
    fn short_edges_still_get_two_connectors() {
        let e1 = edge(0.0, 0.0, 1.0, 0.0);
        let e2 = edge(0.0, 5.0, 0.5, 5.0);
        assert_eq!(interval_count(e1, e2, 100.0).unwrap(), 1);
        assert_eq!(connector_lines(e1, e2, 100.0).unwrap().len(), 2);

        let p = edge(3.0, 3.0, 3.0, 3.0);
        assert_eq!(connector_lines(p, p, 1.0).unwrap().len(), 2);
    }

    #[test]
    fn coincident_edges_give_zero_length_connectors() {
        let e = edge(2.0, 2.0, 22.0, 12.0);
        let lines = connector_lines(e, e, 2.0).unwrap();
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.p0 == l.p1));
    }

    #[test]
    fn non_positive_spacing_is_rejected() {
        let e = edge(0.0, 0.0, 10.0, 0.0);
        for s in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                connector_lines(e, e, s),
                Err(SpriteError::Validation(_))
            ));
        }
    }

    #[test]
    fn parallel_edges_produce_evenly_spaced_rungs() {
        let mut s = RasterSurface::new(40, 20).unwrap();
        let e1 = edge(0.0, 2.0, 30.0, 2.0);
        let e2 = edge(0.0, 12.0, 30.0, 12.0);
        let lines = draw_connectors(&mut s, e1, e2, 5.0, Rgba8::WHITE).unwrap();
        assert_eq!(lines.len(), 7);
        for (i, l) in lines.iter().enumerate() {
            let expected = Point::new(5.0 * i as f64, 2.0);
            assert!(l.p0.distance(expected) < 1e-9, "rung {i} at {:?}", l.p0);
        }
        // Row 7 crosses every rung exactly once.
        let hits: Vec<_> = (0..40)
            .filter(|&x| s.get_pixel(x, 7).unwrap() == Rgba8::WHITE)
            .collect();
        assert_eq!(hits, vec![0, 5, 10, 15, 20, 25, 30]);
    }
}
