use crate::math::Vec2;

/// Axis-aligned bounding box in raster (pixel) space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Bounds of all finite points, or `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Self> {
        let mut out: Option<Aabb2> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            match out.as_mut() {
                Some(b) => b.extend(*p),
                None => out = Some(Aabb2::new([p.x, p.y], [p.x, p.y])),
            }
        }
        out
    }

    pub fn extend(&mut self, p: Vec2) {
        self.min[0] = self.min[0].min(p.x);
        self.min[1] = self.min[1].min(p.y);
        self.max[0] = self.max[0].max(p.x);
        self.max[1] = self.max[1].max(p.y);
    }

    pub fn union(self, other: Aabb2) -> Aabb2 {
        Aabb2::new(
            [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        )
    }

    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min[0] <= other.max[0]
            && self.max[0] >= other.min[0]
            && self.min[1] <= other.max[1]
            && self.max[1] >= other.min[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn bounds_skip_non_finite_points() {
        let pts = [
            Vec2::new(1.0, 5.0),
            Vec2::new(f64::NAN, 0.0),
            Vec2::new(-2.0, 3.0),
        ];
        let b = Aabb2::from_points(&pts).expect("bounds");
        assert_eq!(b, Aabb2::new([-2.0, 3.0], [1.0, 5.0]));
        assert!(Aabb2::from_points(&[]).is_none());
    }

    #[test]
    fn intersection_and_union() {
        let a = Aabb2::new([0.0, 0.0], [10.0, 10.0]);
        let b = Aabb2::new([5.0, 5.0], [20.0, 20.0]);
        let c = Aabb2::new([11.0, 0.0], [12.0, 1.0]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.union(c), Aabb2::new([0.0, 0.0], [12.0, 10.0]));
    }
}
