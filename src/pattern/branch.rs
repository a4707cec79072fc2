//! Branching pin/sleeve segments.
//!
//! A branch is a primary segment from an anchor, an optional lateral segment
//! of fixed length at its end, and an optional filled pad on the final point.
//! Random lengths come from a caller-owned RNG so batches can be seeded per task.

use rand::Rng;

use crate::{
    foundation::{
        core::{Line, Point, Rgba8, Vec2},
        error::{SpriteError, SpriteResult},
    },
    raster::{
        draw::{draw_line, fill_circle},
        surface::RasterSurface,
    },
};

/// Primary length (random when `None`) and lateral step (`0` = no bend,
/// `+1` / `-1` = one lateral unit to either side).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PinSpec {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub lateral_step: i8,
}

impl PinSpec {
    pub fn fixed(length: f64, lateral_step: i8) -> Self {
        Self {
            length: Some(length),
            lateral_step,
        }
    }

    pub fn random(lateral_step: i8) -> Self {
        Self {
            length: None,
            lateral_step,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchGenerator {
    pub min_length: u32,
    pub max_length: u32,
    pub lateral_unit: f64,
    /// `0` draws no pad.
    pub pad_radius: f64,
    pub stroke_width: f64,
    pub color: Rgba8,
}

/// Geometry of one traced branch. `mid == end` when there is no bend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub anchor: Point,
    pub mid: Point,
    pub end: Point,
    pub length: f64,
}

impl Branch {
    pub fn has_bend(&self) -> bool {
        self.mid != self.end
    }

    pub fn segments(&self) -> Vec<Line> {
        let mut out = vec![Line::new(self.anchor, self.mid)];
        if self.has_bend() {
            out.push(Line::new(self.mid, self.end));
        }
        out
    }
}

impl BranchGenerator {
    pub fn validate(&self) -> SpriteResult<()> {
        if self.min_length > self.max_length {
            return Err(SpriteError::validation(format!(
                "branch length range is empty ({} > {})",
                self.min_length, self.max_length
            )));
        }
        if !self.lateral_unit.is_finite() || !self.pad_radius.is_finite() {
            return Err(SpriteError::validation("branch geometry must be finite"));
        }
        if self.pad_radius < 0.0 {
            return Err(SpriteError::validation("pad radius must be >= 0"));
        }
        Ok(())
    }

    /// Uniform integer length in `[min_length, max_length]`.
    pub fn sample_length<R: Rng + ?Sized>(&self, rng: &mut R) -> SpriteResult<f64> {
        self.validate()?;
        Ok(f64::from(rng.random_range(self.min_length..=self.max_length)))
    }

    /// Computes branch geometry without drawing, sampling the length when the
    /// pin does not fix it.
    pub fn trace<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        anchor: Point,
        direction: Vec2,
        pin: PinSpec,
    ) -> SpriteResult<Branch> {
        let length = match pin.length {
            Some(l) => l,
            None => self.sample_length(rng)?,
        };
        self.trace_fixed(anchor, direction, length, pin.lateral_step)
    }

    /// Deterministic geometry for an explicit primary length.
    pub fn trace_fixed(
        &self,
        anchor: Point,
        direction: Vec2,
        length: f64,
        lateral_step: i8,
    ) -> SpriteResult<Branch> {
        let dir_len = direction.hypot();
        if !dir_len.is_finite() || dir_len == 0.0 {
            return Err(SpriteError::validation("branch direction must be non-zero"));
        }
        if !length.is_finite() {
            return Err(SpriteError::validation("branch length must be finite"));
        }
        let dir = direction / dir_len;

        let mid = anchor + dir * length;
        let end = if lateral_step != 0 {
            mid + lateral_axis(dir) * (f64::from(lateral_step) * self.lateral_unit)
        } else {
            mid
        };

        Ok(Branch {
            anchor,
            mid,
            end,
            length,
        })
    }

    /// Strokes the branch segments and fills the end pad.
    pub fn render(&self, surface: &mut RasterSurface, branch: &Branch) {
        for seg in branch.segments() {
            draw_line(surface, seg.p0, seg.p1, self.color, self.stroke_width);
        }
        if self.pad_radius > 0.0 {
            fill_circle(surface, branch.end, self.pad_radius, self.color);
        }
    }

    pub fn draw<R: Rng + ?Sized>(
        &self,
        surface: &mut RasterSurface,
        rng: &mut R,
        anchor: Point,
        direction: Vec2,
        pin: PinSpec,
    ) -> SpriteResult<Branch> {
        let branch = self.trace(rng, anchor, direction, pin)?;
        self.render(surface, &branch);
        Ok(branch)
    }
}

/// Unit vector orthogonal to `dir`, oriented toward +x (or +y when the
/// perpendicular is vertical). Opposite pin rows therefore bend the same way
/// for the same step sign.
fn lateral_axis(dir: Vec2) -> Vec2 {
    let perp = Vec2::new(-dir.y, dir.x);
    if perp.x < -1e-12 || (perp.x.abs() <= 1e-12 && perp.y < 0.0) {
        -perp
    } else {
        perp
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn generator() -> BranchGenerator {
        BranchGenerator {
            min_length: 20,
            max_length: 50,
            lateral_unit: 20.0,
            pad_radius: 3.0,
            stroke_width: 1.0,
            color: Rgba8::BLACK,
        }
    }

    #[test]
    fn fixed_straight_branch_is_one_segment_with_pad_at_end() {
        let g = generator();
        let mut s = RasterSurface::new(64, 64).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let b = g
            .draw(
                &mut s,
                &mut rng,
                Point::new(30.0, 50.0),
                Vec2::new(0.0, -1.0),
                PinSpec::fixed(25.0, 0),
            )
            .unwrap();

        assert_eq!(b.segments().len(), 1);
        assert_eq!(b.end, Point::new(30.0, 25.0));
        assert_eq!(b.anchor.distance(b.end), 25.0);
        for y in 25..=50 {
            assert_eq!(s.get_pixel(30, y).unwrap(), Rgba8::BLACK);
        }
        // Pad is centered on the end point.
        assert_eq!(s.get_pixel(27, 25).unwrap(), Rgba8::BLACK);
        assert_eq!(s.get_pixel(33, 25).unwrap(), Rgba8::BLACK);
        assert_eq!(s.get_pixel(30, 22).unwrap(), Rgba8::BLACK);
        assert_eq!(s.get_pixel(30, 21).unwrap(), Rgba8::TRANSPARENT);
        assert_eq!(s.get_pixel(30, 51).unwrap(), Rgba8::TRANSPARENT);
    }

    #[test]
    fn bent_branch_is_two_segments_with_pad_at_offset_end() {
        let g = generator();
        let mut s = RasterSurface::new(96, 96).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let b = g
            .draw(
                &mut s,
                &mut rng,
                Point::new(40.0, 10.0),
                Vec2::new(0.0, 1.0),
                PinSpec::fixed(30.0, 1),
            )
            .unwrap();

        let segs = b.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(b.mid, Point::new(40.0, 40.0));
        assert_eq!(b.end, Point::new(60.0, 40.0));
        assert_eq!(segs[1].p0, b.mid);
        assert_eq!(segs[1].p1, b.end);
        assert_eq!(s.get_pixel(50, 40).unwrap(), Rgba8::BLACK);
        assert_eq!(s.get_pixel(60, 37).unwrap(), Rgba8::BLACK);
        assert_eq!(s.get_pixel(60, 43).unwrap(), Rgba8::BLACK);
    }

    #[test]
    fn opposite_rows_bend_the_same_way() {
        let g = generator();
        let mut rng = StdRng::seed_from_u64(0);
        let anchor = Point::new(0.0, 0.0);
        let up = g
            .trace(&mut rng, anchor, Vec2::new(0.0, -1.0), PinSpec::fixed(10.0, -1))
            .unwrap();
        let down = g
            .trace(&mut rng, anchor, Vec2::new(0.0, 1.0), PinSpec::fixed(10.0, -1))
            .unwrap();
        assert_eq!(up.end, Point::new(-20.0, -10.0));
        assert_eq!(down.end, Point::new(-20.0, 10.0));
    }

    #[test]
    fn direction_need_not_be_unit_or_axis_aligned() {
        let g = generator();
        let mut rng = StdRng::seed_from_u64(0);
        let b = g
            .trace(
                &mut rng,
                Point::ORIGIN,
                Vec2::new(3.0, 4.0),
                PinSpec::fixed(10.0, 0),
            )
            .unwrap();
        assert!((b.end.x - 6.0).abs() < 1e-9);
        assert!((b.end.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_range_always_samples_its_single_value() {
        let g = BranchGenerator {
            min_length: 10,
            max_length: 10,
            ..generator()
        };
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let b = g
                .trace(
                    &mut rng,
                    Point::ORIGIN,
                    Vec2::new(1.0, 0.0),
                    PinSpec::random(0),
                )
                .unwrap();
            assert_eq!(b.length, 10.0);
            assert_eq!(b.anchor.distance(b.end), 10.0);
        }
    }

    #[test]
    fn sampled_lengths_stay_in_range_and_are_seed_reproducible() {
        let g = generator();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..100)
                .map(|_| g.sample_length(&mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        let a = draw(7);
        assert_eq!(a, draw(7));
        assert!(a.iter().all(|&l| (20.0..=50.0).contains(&l)));
        assert!(a.iter().any(|&l| l != a[0]));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let g = BranchGenerator {
            min_length: 30,
            max_length: 10,
            ..generator()
        };
        assert!(g.sample_length(&mut rng).is_err());
        assert!(
            generator()
                .trace(&mut rng, Point::ORIGIN, Vec2::ZERO, PinSpec::fixed(5.0, 0))
                .is_err()
        );
    }
}
