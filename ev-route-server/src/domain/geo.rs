//! Geographic primitives and route geometry.
//!
//! Distances are great-circle (haversine) distances in kilometres. Positions
//! between polyline vertices are linear interpolations in latitude/longitude,
//! with the along-route distance of an interpolated point taken as the same
//! fraction of its segment's haversine length. Projection, point lookup and
//! segment extraction all use this convention, so distances they report
//! agree with one another.

use std::fmt;

use super::DomainError;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slack allowed when an along-route distance overshoots the route length
/// through floating-point accumulation.
pub const ROUTE_LENGTH_TOLERANCE_KM: f64 = 1e-6;

/// Approximate kilometres per degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// A position on the Earth's surface in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a point, rejecting coordinates outside the valid ranges.
    pub fn checked(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::invalid("lat", "must be within -90..=90"));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::invalid("lng", "must be within -180..=180"));
        }
        Ok(Self { lat, lng })
    }

    /// Linear interpolation towards `other`; `t` is clamped to `0..=1`.
    ///
    /// Longitude takes the short way round, so segments crossing the
    /// antimeridian stay near it.
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        let t = t.clamp(0.0, 1.0);
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: wrap_lng(self.lng + lng_delta(self.lng, other.lng) * t),
        }
    }
}

/// Normalize a longitude into `(-180, 180]`.
fn wrap_lng(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Signed eastward longitude difference from `from` to `to`, in `(-180, 180]`.
fn lng_delta(from: f64, to: f64) -> f64 {
    wrap_lng(to - from)
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Great-circle distance between two points in kilometres.
///
/// # Examples
///
/// ```
/// use ev_route_server::domain::{GeoPoint, distance_km};
///
/// let seattle = GeoPoint::new(47.61, -122.33);
/// let boise = GeoPoint::new(43.62, -116.20);
///
/// let d = distance_km(seattle, boise);
/// assert!(d > 650.0 && d < 700.0);
/// assert_eq!(distance_km(seattle, seattle), 0.0);
/// ```
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// An axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Smallest box containing both points.
    ///
    /// A box cannot straddle the antimeridian, so when the short way between
    /// the points crosses it the box spans every longitude instead.
    pub fn spanning(a: GeoPoint, b: GeoPoint) -> Self {
        let crosses_antimeridian = (b.lng - a.lng).abs() > 180.0;
        let (min_lng, max_lng) = if crosses_antimeridian {
            (-180.0, 180.0)
        } else {
            (a.lng.min(b.lng), a.lng.max(b.lng))
        };

        BoundingBox {
            min_lat: a.lat.min(b.lat),
            min_lng,
            max_lat: a.lat.max(b.lat),
            max_lng,
        }
    }

    /// Grow the box by `km` on every side.
    ///
    /// Uses 1° latitude ≈ 111 km and scales longitude by the cosine of the
    /// box's mid-latitude. Results are clamped to valid coordinates.
    pub fn expanded_by_km(&self, km: f64) -> Self {
        let lat_pad = km / KM_PER_DEGREE;
        let mid_lat = ((self.min_lat + self.max_lat) / 2.0).to_radians();
        // Near the poles a longitude degree collapses; cap the stretch.
        let lng_pad = km / (KM_PER_DEGREE * mid_lat.cos().max(0.01));

        BoundingBox {
            min_lat: (self.min_lat - lat_pad).max(-90.0),
            min_lng: (self.min_lng - lng_pad).max(-180.0),
            max_lat: (self.max_lat + lat_pad).min(90.0),
            max_lng: (self.max_lng + lng_pad).min(180.0),
        }
    }

    /// Whether `point` lies inside or on the edge of the box.
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }

    /// Split into a grid of `rows` by `cols` equal tiles, row by row from
    /// the south-west corner. Zero counts are treated as one.
    pub fn tiles(&self, rows: usize, cols: usize) -> Vec<BoundingBox> {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let lat_step = (self.max_lat - self.min_lat) / rows as f64;
        let lng_step = (self.max_lng - self.min_lng) / cols as f64;

        let edge = |min: f64, max: f64, step: f64, i: usize, n: usize| {
            if i == n { max } else { min + step * i as f64 }
        };

        let mut tiles = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                tiles.push(BoundingBox {
                    min_lat: edge(self.min_lat, self.max_lat, lat_step, r, rows),
                    min_lng: edge(self.min_lng, self.max_lng, lng_step, c, cols),
                    max_lat: edge(self.min_lat, self.max_lat, lat_step, r + 1, rows),
                    max_lng: edge(self.min_lng, self.max_lng, lng_step, c + 1, cols),
                });
            }
        }
        tiles
    }
}

/// Result of projecting a point onto a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Cumulative route distance from the start to the projected point.
    pub along_route_km: f64,
    /// Distance from the point to its projection on the route.
    pub lateral_km: f64,
}

/// An ordered, traversable sequence of points.
///
/// # Invariants
///
/// - At least two points
/// - Every coordinate is finite
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    /// Build a polyline, validating that it is traversable.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self, DomainError> {
        if points.len() < 2 {
            return Err(DomainError::InvalidPolyline("needs at least two points"));
        }
        if points
            .iter()
            .any(|p| !p.lat.is_finite() || !p.lng.is_finite())
        {
            return Err(DomainError::InvalidPolyline("coordinates must be finite"));
        }
        Ok(Self { points })
    }

    /// The route vertices in travel order.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// First vertex.
    pub fn start(&self) -> GeoPoint {
        self.points[0]
    }

    /// Last vertex.
    pub fn end(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// Consecutive vertex pairs.
    fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total route length in kilometres.
    pub fn length_km(&self) -> f64 {
        self.segments().map(|(a, b)| distance_km(a, b)).sum()
    }

    /// The point `km` along the route, clamped to the route's ends.
    pub fn point_at(&self, km: f64) -> GeoPoint {
        if km <= 0.0 {
            return self.start();
        }

        let mut travelled = 0.0;
        for (a, b) in self.segments() {
            let len = distance_km(a, b);
            if travelled + len >= km {
                let t = if len > 0.0 { (km - travelled) / len } else { 0.0 };
                return a.lerp(b, t);
            }
            travelled += len;
        }

        self.end()
    }
}

/// Position along segment `a`→`b` closest to `point`, as a fraction in `0..=1`.
///
/// Works in a local equirectangular frame centred on the segment, which is
/// accurate for the short segments of a driving polyline.
fn segment_fraction(point: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let scale = ((a.lat + b.lat) / 2.0).to_radians().cos();

    let dx = lng_delta(a.lng, b.lng) * scale;
    let dy = b.lat - a.lat;
    let px = lng_delta(a.lng, point.lng) * scale;
    let py = point.lat - a.lat;

    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return 0.0;
    }

    ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
}

/// Project `point` onto the nearest position of `route`.
///
/// Equal lateral distances resolve to the earliest route position.
///
/// # Examples
///
/// ```
/// use ev_route_server::domain::{GeoPoint, Polyline, project_onto_route};
///
/// let route = Polyline::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]).unwrap();
/// let p = project_onto_route(GeoPoint::new(0.05, 0.5), &route);
///
/// assert!((p.along_route_km - route.length_km() / 2.0).abs() < 0.01);
/// assert!((p.lateral_km - 5.56).abs() < 0.01);
/// ```
pub fn project_onto_route(point: GeoPoint, route: &Polyline) -> Projection {
    let mut best = Projection {
        along_route_km: 0.0,
        lateral_km: distance_km(point, route.start()),
    };
    let mut travelled = 0.0;

    for (a, b) in route.segments() {
        let len = distance_km(a, b);
        let t = segment_fraction(point, a, b);
        let lateral_km = distance_km(point, a.lerp(b, t));

        if lateral_km < best.lateral_km {
            best = Projection {
                along_route_km: travelled + t * len,
                lateral_km,
            };
        }
        travelled += len;
    }

    best
}

/// Extract the part of `route` between two along-route distances.
///
/// The result starts and ends at interpolated points and keeps every
/// vertex strictly between them.
///
/// # Errors
///
/// Returns [`DomainError::Range`] unless
/// `0 <= start_km <= end_km <= route length`.
pub fn extract_segment(route: &Polyline, start_km: f64, end_km: f64) -> Result<Polyline, DomainError> {
    let length_km = route.length_km();

    let in_range = start_km.is_finite()
        && end_km.is_finite()
        && start_km >= 0.0
        && start_km <= end_km
        && end_km <= length_km + ROUTE_LENGTH_TOLERANCE_KM;
    if !in_range {
        return Err(DomainError::Range {
            start_km,
            end_km,
            length_km,
        });
    }

    let end_km = end_km.min(length_km);
    let start_km = start_km.min(end_km);

    let mut points = vec![route.point_at(start_km)];
    let mut travelled = 0.0;
    for (a, b) in route.segments() {
        travelled += distance_km(a, b);
        if travelled > start_km && travelled < end_km {
            points.push(b);
        }
    }
    points.push(if end_km >= length_km {
        route.end()
    } else {
        route.point_at(end_km)
    });

    Ok(Polyline { points })
}
