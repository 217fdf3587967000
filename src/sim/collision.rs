//! Axis-aligned collision detection

use super::rect::Rect;

/// Do two rectangles overlap?
///
/// They overlap unless one lies entirely to the left, right, above or below
/// the other. Rectangles that share an edge count as overlapping.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.left() || a.left() > b.right() || a.top() < b.bottom() || a.bottom() > b.top())
}
