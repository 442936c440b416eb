use geo::geometry::Coord;

/// Returns `deg` reduced to `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let norm = deg.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs.
    if norm >= 360.0 {
        0.0
    } else {
        norm
    }
}

/// Returns the smallest absolute difference between two bearings,
/// in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_deg(a - b);
    diff.min(360.0 - diff)
}

/// Returns the bearing of the vector from `from` to `to`, in
/// `[0, 360)`. Axis-aligned vectors give exact cardinal bearings.
pub fn bearing_deg(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    match (dx == 0.0, dy == 0.0) {
        (true, false) if dy > 0.0 => 90.0,
        (true, false) => 270.0,
        (false, true) if dx < 0.0 => 180.0,
        _ => normalize_deg(dy.atan2(dx).to_degrees()),
    }
}

/// Returns the circular mean of `bearings`, in `[0, 360)`.
///
/// Each bearing is converted to a unit vector, the vectors are
/// averaged, and the mean direction is the angle of the result. The
/// mean is undefined (`None`) when there are no bearings or they
/// cancel out, e.g. 0° and 180°.
pub fn circular_mean<I>(bearings: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (mut sum_cos, mut sum_sin, mut n) = (0.0, 0.0, 0_usize);
    for bearing in bearings {
        let (cos, sin) = unit_vector(bearing);
        sum_cos += cos;
        sum_sin += sin;
        n += 1;
    }
    if n == 0 || sum_cos.hypot(sum_sin) < 1e-12 {
        return None;
    }
    Some(normalize_deg(sum_sin.atan2(sum_cos).to_degrees()))
}

/// Returns `(cos, sin)` of `bearing`.
///
/// Cardinal bearings produce exact components, so that sections cut
/// along the grid axes do not drift off their row or column.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit_vector(bearing: f64) -> (f64, f64) {
    let norm = normalize_deg(bearing);
    if norm % 90.0 == 0.0 {
        match (norm / 90.0) as u8 {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        }
    } else {
        let (sin, cos) = norm.to_radians().sin_cos();
        (cos, sin)
    }
}
