//! 2D affine transforms
//!
//! Matrices use the canvas layout `[a c e; b d f]`, mapping
//! `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`. With y pointing down,
//! a positive rotation angle turns clockwise on screen.

use crate::primitives::Point;

/// 2D affine transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::identity()
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Rotation by `angle` radians
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    ///
    /// This is how canvas `translate`/`rotate` calls accumulate onto the
    /// current transform.
    pub fn then_apply(&self, inner: &Transform2D) -> Self {
        Self {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON || !det.is_finite() {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// True when the transform only translates
    pub fn is_translation(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(p: Point, x: f32, y: f32) {
        assert!(
            (p.x - x).abs() < 1e-4 && (p.y - y).abs() < 1e-4,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    #[test]
    fn test_quarter_turn_is_clockwise_on_screen() {
        // +x axis rotates onto +y (down) in screen space
        approx(Transform2D::rotate(FRAC_PI_2).apply(Point::new(10.0, 0.0)), 0.0, 10.0);
    }

    #[test]
    fn test_translate_then_rotate_pivots_on_translation() {
        let t = Transform2D::translate(200.0, 150.0).then_apply(&Transform2D::rotate(FRAC_PI_2));
        approx(t.apply(Point::ZERO), 200.0, 150.0);
        approx(t.apply(Point::new(10.0, 0.0)), 200.0, 160.0);
    }

    #[test]
    fn test_invert_round_trips_points() {
        let t = Transform2D::translate(30.0, -5.0)
            .then_apply(&Transform2D::rotate(0.7))
            .then_apply(&Transform2D::scale(2.0, 0.5));
        let inv = t.invert().expect("invertible");
        approx(inv.apply(t.apply(Point::new(3.0, 4.0))), 3.0, 4.0);
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        assert!(Transform2D::scale(0.0, 1.0).invert().is_none());
    }
}
