use geo::Coord;

#[inline]
pub fn distance_squared(p: Coord<f64>, q: Coord<f64>) -> f64 {
    let (dx, dy) = (p.x - q.x, p.y - q.y);
    dx * dx + dy * dy
}

/// Distance from `p` to the closed segment `a`–`b`.
pub fn point_segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    if a == b {
        return distance_squared(p, a).sqrt();
    }
    let len2 = distance_squared(a, b);
    let r = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len2;
    if r <= 0.0 {
        return distance_squared(p, a).sqrt();
    }
    if r >= 1.0 {
        return distance_squared(p, b).sqrt();
    }
    // Perpendicular distance via the signed area.
    let s = ((a.y - p.y) * (b.x - a.x) - (a.x - p.x) * (b.y - a.y)) / len2;
    s.abs() * len2.sqrt()
}
