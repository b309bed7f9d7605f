use crate::geometry::{Extent, ImagePoint};

/// In-progress crop drag. `extent` is measured from `first_point`, not an
/// absolute corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSession {
    first_point: ImagePoint,
    extent: Extent,
}

impl CropSession {
    pub const fn start(first_point: ImagePoint) -> Self {
        Self {
            first_point,
            extent: Extent::ZERO,
        }
    }

    pub const fn first_point(&self) -> ImagePoint {
        self.first_point
    }

    pub const fn extent(&self) -> Extent {
        self.extent
    }

    pub fn drag_to(&mut self, current: ImagePoint) -> Extent {
        self.extent = Extent::new(
            current.x - self.first_point.x,
            current.y - self.first_point.y,
        );
        self.extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_to_measures_extent_from_first_point() {
        let mut session = CropSession::start(ImagePoint::new(10, 10));
        assert_eq!(session.extent(), Extent::ZERO);
        assert_eq!(session.drag_to(ImagePoint::new(60, 40)), Extent::new(50, 30));
        assert_eq!(session.drag_to(ImagePoint::new(4, 2)), Extent::new(-6, -8));
        assert_eq!(session.first_point(), ImagePoint::new(10, 10));
    }
}
