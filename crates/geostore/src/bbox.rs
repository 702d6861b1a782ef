use geo::Rect;
use rstar::{RTreeObject, AABB};

/// R-tree envelope of a rectangle.
#[inline]
pub fn rect_envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(rect.min().into(), rect.max().into())
}

/// Extent of an arena entry (a grid cell or a way segment) in an R-tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaExtent {
    slot: u32, // Position of the entry in its arena
    envelope: AABB<[f64; 2]>,
}

impl ArenaExtent {
    pub fn new(slot: usize, rect: Rect<f64>) -> Self {
        Self { slot: slot as u32, envelope: rect_envelope(&rect) }
    }

    #[inline] pub fn slot(&self) -> usize { self.slot as usize }
}

impl RTreeObject for ArenaExtent {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { self.envelope }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;
    use rstar::RTree;

    #[test]
    fn extents_are_found_by_envelope() {
        let tree = RTree::bulk_load(vec![
            ArenaExtent::new(0, Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 })),
            ArenaExtent::new(1, Rect::new(coord! { x: 5.0, y: 5.0 }, coord! { x: 6.0, y: 6.0 })),
        ]);
        let hits: Vec<usize> = tree.locate_in_envelope_intersecting(&AABB::from_point([5.5, 5.5]))
            .map(ArenaExtent::slot)
            .collect();
        assert_eq!(hits, vec![1]);
    }
}
