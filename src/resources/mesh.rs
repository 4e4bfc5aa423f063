use glam::{Affine3A, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Axis-aligned bounds of this box after `matrix`.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut new_min = Vec3::splat(f32::INFINITY);
        let mut new_max = Vec3::splat(f32::NEG_INFINITY);
        for point in corners {
            let transformed = matrix.transform_point3(point);
            new_min = new_min.min(transformed);
            new_max = new_max.max(transformed);
        }

        Self {
            min: new_min,
            max: new_max,
        }
    }
}

/// CPU-side record of one primitive's geometry.
///
/// Vertex data stays with the renderer; the scene keeps what picking and
/// bookkeeping need.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub bounding_box: BoundingBox,
    pub vertex_count: usize,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, bounding_box: BoundingBox, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            bounding_box,
            vertex_count,
        }
    }

    /// Unit cube centred on the origin. Handy for hand-built scenes.
    #[must_use]
    pub fn unit_cube(name: impl Into<String>) -> Self {
        Self::new(
            name,
            BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
            24,
        )
    }
}
