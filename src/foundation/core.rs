pub use kurbo::{Line, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8.
///
/// Serialized as a `[r, g, b, a]` array so palettes stay compact in config JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const RED: Self = Self::opaque(255, 0, 0);
    pub const BLUE: Self = Self::opaque(0, 0, 255);
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    pub const YELLOW: Self = Self::opaque(255, 255, 0);
    pub const MAGENTA: Self = Self::opaque(255, 0, 255);
    pub const CYAN: Self = Self::opaque(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Composites `src` over `self` with the coverage factor `coverage` (0..1).
    pub fn over(self, src: Rgba8, coverage: f32) -> Rgba8 {
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage <= 0.0 || src.a == 0 {
            return self;
        }

        let cov = ((coverage * 255.0).round() as i32).clamp(0, 255) as u16;
        let sa = mul_div255(u16::from(src.a), cov);
        if sa == 0 {
            return self;
        }

        let da = mul_div255(u16::from(self.a), 255 - u16::from(sa));
        let out_a = sa.saturating_add(da);
        if out_a == 0 {
            return Rgba8::TRANSPARENT;
        }

        let mix = |s: u8, d: u8| -> u8 {
            let num = u32::from(s) * u32::from(sa) + u32::from(d) * u32::from(da);
            ((num + u32::from(out_a) / 2) / u32::from(out_a)).min(255) as u8
        };

        Rgba8 {
            r: mix(src.r, self.r),
            g: mix(src.g, self.g),
            b: mix(src.b, self.b),
            a: out_a,
        }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        c.to_array()
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Directed segment used as a parametrization domain: `t = 0` at `a`, `t = 1` at `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: Point,
    pub b: Point,
}

impl Edge {
    pub fn new(a: impl Into<Point>, b: impl Into<Point>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn length(self) -> f64 {
        self.a.distance(self.b)
    }

    pub fn point_at(self, t: f64) -> Point {
        self.a.lerp(self.b, t)
    }
}
