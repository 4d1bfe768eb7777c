//! External contour detection and measurement.

use image::GrayImage;
use image::imageops;
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::point::Point;
use tracing::debug;

use crate::region::Region;

/// Outer borders of the connected ink regions in `mask`.
///
/// Hole borders and anything nested inside a hole are dropped, so a ring
/// with a dot in its middle yields only the ring's outline. Blobs touching
/// the image border are reported like any other.
pub fn external_contours(mask: &GrayImage) -> Vec<Contour<i32>> {
    // find_contours only opens an outer border on a background pixel to the
    // left, so a blob starting in column 0 would come back as a hole. Trace
    // inside a 1px background frame and shift the points back.
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut framed, mask, 1, 1);

    let contours: Vec<Contour<i32>> = find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|mut c| {
            for p in &mut c.points {
                p.x -= 1;
                p.y -= 1;
            }
            c
        })
        .collect();

    debug!(count = contours.len(), "Found external contours");
    contours
}

/// Area enclosed by a closed boundary (shoelace formula).
///
/// Boundaries of one or two points enclose nothing and return 0.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
        .sum();

    (twice_area as f64 / 2.0).abs()
}

/// The contour with the largest enclosed area, with that area.
///
/// Ties resolve to the first contour in scan order.
pub fn largest_contour(contours: &[Contour<i32>]) -> Option<(&Contour<i32>, f64)> {
    contours
        .iter()
        .map(|c| (c, contour_area(&c.points)))
        .fold(None, |best, (c, area)| match best {
            Some((_, best_area)) if best_area >= area => best,
            _ => Some((c, area)),
        })
}

/// Smallest rectangle containing every boundary point.
///
/// Returns `None` for an empty point list.
pub fn bounding_region(points: &[Point<i32>]) -> Option<Region> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    // Contour points come from pixel indices and are never negative.
    Some(Region::new(
        min_x.max(0) as u32,
        min_y.max(0) as u32,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}
