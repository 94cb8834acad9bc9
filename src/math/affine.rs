use crate::math::Point;

/// 2D affine matrix in canvas order `[a, b, c, d, e, f]`:
///
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub data: [f64; 6],
}

impl Affine2 {
    pub fn new(data: [f64; 6]) -> Self {
        Self { data }
    }

    pub fn identity() -> Self {
        Self {
            data: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    pub fn from_translation(offset: Point) -> Self {
        Self {
            data: [1.0, 0.0, 0.0, 1.0, offset.x, offset.y],
        }
    }

    pub fn from_scale(sx: f64, sy: f64) -> Self {
        Self {
            data: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Rotation by `radians`; positive angles turn clockwise in y-down canvas space.
    pub fn from_rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            data: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    /// Scale by `(sx, sy)` then rotate, both about `pivot`.
    pub fn about(pivot: Point, sx: f64, sy: f64, radians: f64) -> Self {
        Self::from_translation(pivot)
            * Self::from_rotation(radians)
            * Self::from_scale(sx, sy)
            * Self::from_translation(Point::new(-pivot.x, -pivot.y))
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, e, f] = self.data;
        Point::new(a * point.x + c * point.y + e, b * point.x + d * point.y + f)
    }

    /// Rotation angle encoded in the linear part, in radians.
    pub fn rotation(&self) -> f64 {
        self.data[1].atan2(self.data[0])
    }

    /// Mean of the axis scale factors, used to size line widths.
    pub fn mean_scale(&self) -> f64 {
        let [a, b, c, d, _, _] = self.data;
        (a.hypot(b) + c.hypot(d)) / 2.0
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

/// `(lhs * rhs).transform_point(p) == lhs.transform_point(rhs.transform_point(p))`
impl std::ops::Mul for Affine2 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.data;
        let [a2, b2, c2, d2, e2, f2] = other.data;
        Self {
            data: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * e2 + c1 * f2 + e1,
                b1 * e2 + d1 * f2 + f1,
            ],
        }
    }
}

impl From<Affine2> for [f64; 6] {
    fn from(mat: Affine2) -> Self {
        mat.data
    }
}
