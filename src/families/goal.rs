use crate::{
    foundation::{
        core::{Edge, Point, Rgba8},
        error::{SpriteError, SpriteResult},
    },
    pattern::connector::draw_connectors,
    raster::{draw::draw_line, surface::RasterSurface},
};

/// Goal/connector texture: a thick open frame, an inner open rectangle, and a
/// connector mesh between them. Width scales with the gate length.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub cell_size: u32,
    /// Outer frame stroke.
    pub pipe: u32,
    /// Inner rectangle and corner diagonal stroke.
    pub pipe_inner: u32,
    pub kx1: f64,
    pub kx2: f64,
    pub ky1: f64,
    pub ky2: f64,
    /// Inner rectangle grows by this much on every side before truncation.
    pub delta: f64,
    /// Mesh corners are pulled in from the frame corners by `corner_k * pipe`.
    pub corner_k: f64,
    /// Mesh spacing is `cell_size / net_div`.
    pub net_div: f64,
    pub color: Rgba8,
    pub gate_lengths: Vec<u32>,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            cell_size: 128,
            pipe: 20,
            pipe_inner: 4,
            kx1: 0.30,
            kx2: 0.75,
            ky1: 0.27,
            ky2: 0.70,
            delta: 1.5,
            corner_k: 0.60,
            net_div: 17.0,
            color: Rgba8::WHITE,
            gate_lengths: (2..=20).step_by(2).collect(),
        }
    }
}

impl GoalConfig {
    pub fn validate(&self) -> SpriteResult<()> {
        if self.cell_size == 0 {
            return Err(SpriteError::validation("goal cell size must be > 0"));
        }
        if !self.net_div.is_finite() || self.net_div <= 0.0 {
            return Err(SpriteError::validation("goal net divisor must be > 0"));
        }
        // Keeps the mesh spacing at one pixel or more.
        if self.net_div > f64::from(self.cell_size) {
            return Err(SpriteError::validation(format!(
                "goal net divisor must be <= cell size {} (got {})",
                self.cell_size, self.net_div
            )));
        }
        for &g in &self.gate_lengths {
            validate_gate_length(g)?;
        }
        Ok(())
    }

    pub fn net_spacing(&self) -> f64 {
        f64::from(self.cell_size) / self.net_div
    }

    pub fn file_name(gate_length: u32) -> String {
        format!("goal_{gate_length:02}.png")
    }
}

fn validate_gate_length(gate_length: u32) -> SpriteResult<()> {
    if gate_length == 0 || !gate_length.is_multiple_of(2) {
        return Err(SpriteError::validation(format!(
            "gate length must be a positive even number (got {gate_length})"
        )));
    }
    Ok(())
}

/// Corner points of the three nested rectangles the recipe is built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalFrame {
    /// Outer frame corners: top-left, top-right, bottom-left, bottom-right.
    pub outer: [Point; 4],
    /// Inner rectangle corners, same order.
    pub inner: [Point; 4],
    /// Outer corners pulled inward to clear the frame stroke, same order.
    pub mesh: [Point; 4],
}

pub fn goal_frame(cfg: &GoalConfig, gate_length: u32) -> GoalFrame {
    let cell = f64::from(cfg.cell_size);
    let w = f64::from(gate_length) * cell;
    let h = cell;

    let outer = [
        Point::new(0.0, 0.0),
        Point::new(w - 1.0, 0.0),
        Point::new(0.0, h - 1.0),
        Point::new(w - 1.0, h - 1.0),
    ];

    let left = (cfg.kx1 * cell - cfg.delta).trunc();
    let right = (w - (cell - cfg.kx2 * cell) + cfg.delta).trunc();
    let top = (cfg.ky1 * cell - cfg.delta).trunc();
    let bottom = (h - (cell - cfg.ky2 * cell) + cfg.delta).trunc();
    let inner = [
        Point::new(left, top),
        Point::new(right, top),
        Point::new(left, bottom),
        Point::new(right, bottom),
    ];

    let k = cfg.corner_k * f64::from(cfg.pipe);
    let mesh = [
        Point::new(outer[0].x + k, outer[0].y + k),
        Point::new(outer[1].x - k, outer[1].y + k),
        Point::new(outer[2].x + k, outer[2].y - k),
        Point::new(outer[3].x - k, outer[3].y - k),
    ];

    GoalFrame { outer, inner, mesh }
}

/// Renders one goal texture of `gate_length * cell_size` by `cell_size` pixels.
///
/// The bottom side of both rectangles and the two bottom corner diagonals are
/// left out: the texture is open toward the bottom.
#[tracing::instrument(skip(cfg))]
pub fn render_goal(cfg: &GoalConfig, gate_length: u32) -> SpriteResult<RasterSurface> {
    validate_gate_length(gate_length)?;
    let width = gate_length
        .checked_mul(cfg.cell_size)
        .ok_or_else(|| SpriteError::validation("goal width overflows"))?;
    let mut img = RasterSurface::new(width, cfg.cell_size)?;

    let GoalFrame { outer, inner, mesh } = goal_frame(cfg, gate_length);
    let [p111, p112, p121, p122] = outer;
    let [p211, p212, p221, p222] = inner;
    let [q111, q112, q121, q122] = mesh;
    let color = cfg.color;

    for (a, b) in [(p121, p111), (p111, p112), (p112, p122)] {
        draw_line(&mut img, a, b, color, f64::from(cfg.pipe));
    }
    let inner_width = f64::from(cfg.pipe_inner);
    for (a, b) in [(p221, p211), (p211, p212), (p212, p222)] {
        draw_line(&mut img, a, b, color, inner_width);
    }
    for (a, b) in [(p111, p211), (p112, p212)] {
        draw_line(&mut img, a, b, color, inner_width);
    }

    let spacing = cfg.net_spacing();
    let nets = [
        // left
        (Edge::new(q111, p211), Edge::new(q121, p221)),
        (Edge::new(q111, q121), Edge::new(p211, p221)),
        // top
        (Edge::new(q111, p211), Edge::new(q112, p212)),
        (Edge::new(q111, q112), Edge::new(p211, p212)),
        // right
        (Edge::new(q112, p212), Edge::new(q122, p222)),
        (Edge::new(q112, q122), Edge::new(p212, p222)),
        // middle
        (Edge::new(p211, p221), Edge::new(p212, p222)),
        (Edge::new(p211, p212), Edge::new(p221, p222)),
    ];
    let mut connectors = 0usize;
    for (e1, e2) in nets {
        connectors += draw_connectors(&mut img, e1, e2, spacing, color)?.len();
    }
    tracing::debug!(width, connectors, "goal texture drawn");

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gate_lengths_are_even_two_to_twenty() {
        let cfg = GoalConfig::default();
        assert_eq!(cfg.gate_lengths, vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
        assert_eq!(GoalConfig::file_name(4), "goal_04.png");
        assert_eq!(GoalConfig::file_name(20), "goal_20.png");
    }

    #[test]
    fn frame_points_match_reference_numbers() {
        let f = goal_frame(&GoalConfig::default(), 2);
        assert_eq!(f.outer[3], Point::new(255.0, 127.0));
        assert_eq!(f.inner[0], Point::new(36.0, 33.0));
        assert_eq!(f.inner[3], Point::new(225.0, 91.0));
        assert_eq!(f.mesh[0], Point::new(12.0, 12.0));
        assert_eq!(f.mesh[3], Point::new(243.0, 115.0));
    }

    #[test]
    fn odd_or_zero_gate_length_is_rejected() {
        let cfg = GoalConfig::default();
        for g in [0, 3, 7] {
            assert!(matches!(
                render_goal(&cfg, g),
                Err(SpriteError::Validation(_))
            ));
        }
    }

    #[test]
    fn net_divisor_is_bounded_by_cell_size() {
        for net_div in [1e300, 129.0, f64::INFINITY, 0.0] {
            let cfg = GoalConfig {
                net_div,
                ..GoalConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(SpriteError::Validation(_))),
                "{net_div}"
            );
        }
        let cfg = GoalConfig {
            net_div: 128.0,
            ..GoalConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.net_spacing(), 1.0);
    }

    #[test]
    fn output_is_two_colored_and_open_at_the_bottom() {
        let cfg = GoalConfig::default();
        let s = render_goal(&cfg, 2).unwrap();
        assert_eq!((s.width(), s.height()), (256, 128));
        assert!(
            s.pixels()
                .all(|(_, _, c)| c == Rgba8::WHITE || c == Rgba8::TRANSPARENT)
        );
        assert_eq!(s.get_pixel(128, 127).unwrap(), Rgba8::TRANSPARENT);
        assert_eq!(s.get_pixel(128, 0).unwrap(), Rgba8::WHITE);
    }
}
