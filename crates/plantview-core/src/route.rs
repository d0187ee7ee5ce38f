//! Pipe route planning and arc-length sampling
//!
//! Routes run in a fixed horizontal plane at [`PIPE_HEIGHT`]. Two anchor
//! points either get a single straight run (when the planar offsets are
//! co-linear within [`BEND_EPSILON`]) or an L-shaped bend: the route departs
//! the `from` component along the X axis and arrives at the `to` component
//! along the Z axis, with a tessellated quarter-circle elbow at the corner.

use glam::Vec3;

use crate::topology::Medium;

/// Shared pipe height so all runs are horizontal
pub const PIPE_HEIGHT: f32 = 0.8;
/// Radius of the quarter-circle elbow at each bend
pub const ELBOW_RADIUS: f32 = 0.4;
/// Elbow tessellation steps (producing `ELBOW_STEPS + 1` arc points)
pub const ELBOW_STEPS: usize = 6;
/// Planar offset below which an axis is treated as aligned (no bend)
pub const BEND_EPSILON: f32 = 0.1;

/// An explicit pipe path between two component anchors.
///
/// Immutable once built; waypoints and per-segment lengths are computed at
/// construction and shared by both the pipe mesh builder and the flow
/// animator, so the displayed pipe and the marker path never diverge.
#[derive(Debug, Clone)]
pub struct Route {
    waypoints: Vec<Vec3>,
    seg_lengths: Vec<f32>,
    total_length: f32,
    medium: Medium,
}

impl Route {
    fn from_waypoints(waypoints: Vec<Vec3>, medium: Medium) -> Self {
        debug_assert!(waypoints.len() >= 2);
        let seg_lengths: Vec<f32> = waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        let total_length = seg_lengths.iter().sum();
        Self {
            waypoints,
            seg_lengths,
            total_length,
            medium,
        }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn seg_lengths(&self) -> &[f32] {
        &self.seg_lengths
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    /// Resolved start anchor, at the `from` component's skin
    pub fn start(&self) -> Vec3 {
        self.waypoints[0]
    }

    /// Resolved end anchor, at the `to` component's skin
    pub fn end(&self) -> Vec3 {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Sample a world position at `progress` in [0, 1] of the total length.
    ///
    /// Walks cumulative segment lengths and interpolates linearly inside the
    /// containing segment. Progress at or past 1 (or a rounding shortfall in
    /// the walk) clamps to the final waypoint; a zero-length route yields its
    /// single distinct waypoint.
    pub fn position_at(&self, progress: f32) -> Vec3 {
        let target = progress * self.total_length;
        let mut accumulated = 0.0;

        for (i, &seg_len) in self.seg_lengths.iter().enumerate() {
            if accumulated + seg_len >= target {
                if seg_len <= f32::EPSILON {
                    // Degenerate segment; its endpoints coincide
                    return self.waypoints[i];
                }
                let t = (target - accumulated) / seg_len;
                return self.waypoints[i].lerp(self.waypoints[i + 1], t);
            }
            accumulated += seg_len;
        }

        self.end()
    }
}

/// Plan a pipe route between two component anchors.
///
/// `from_pos` and `to_pos` are the components' ground placements; only the
/// planar (x, z) offsets are routed, at the fixed pipe height. `from_radius`
/// and `to_radius` are the components' connection clearances, so pipe
/// endpoints sit at the equipment skin rather than its center.
pub fn plan_route(
    from_pos: Vec3,
    to_pos: Vec3,
    from_radius: f32,
    to_radius: f32,
    medium: Medium,
) -> Route {
    let dx = to_pos.x - from_pos.x;
    let dz = to_pos.z - from_pos.z;

    let needs_bend = dx.abs() > BEND_EPSILON && dz.abs() > BEND_EPSILON;

    let mut waypoints = Vec::new();

    if needs_bend {
        let sign_x = dx.signum();
        let sign_z = dz.signum();

        // Depart along X, arrive along Z (fixed elbow orientation convention)
        let start = Vec3::new(from_pos.x + sign_x * from_radius, PIPE_HEIGHT, from_pos.z);
        let end = Vec3::new(to_pos.x, PIPE_HEIGHT, to_pos.z - sign_z * to_radius);

        let corner = Vec3::new(end.x, PIPE_HEIGHT, start.z);
        waypoints.push(start);
        waypoints.push(Vec3::new(
            corner.x - sign_x * ELBOW_RADIUS,
            PIPE_HEIGHT,
            corner.z,
        ));

        // Quarter-circle elbow, interpolating from the incoming direction to
        // the outgoing direction around the corner point
        let from_dir = Vec3::new(-sign_x, 0.0, 0.0);
        let to_dir = Vec3::new(0.0, 0.0, sign_z);
        for i in 0..=ELBOW_STEPS {
            let angle = (i as f32 / ELBOW_STEPS as f32) * std::f32::consts::FRAC_PI_2;
            let p = from_dir * (angle.cos() * ELBOW_RADIUS)
                + to_dir * (angle.sin() * ELBOW_RADIUS)
                + corner;
            waypoints.push(p);
        }

        waypoints.push(end);
    } else {
        let dist = (dx * dx + dz * dz).sqrt();
        let (dir_x, dir_z) = if dist > 0.0 {
            (dx / dist, dz / dist)
        } else {
            (0.0, 0.0)
        };

        waypoints.push(Vec3::new(
            from_pos.x + dir_x * from_radius,
            PIPE_HEIGHT,
            from_pos.z + dir_z * from_radius,
        ));
        waypoints.push(Vec3::new(
            to_pos.x - dir_x * to_radius,
            PIPE_HEIGHT,
            to_pos.z - dir_z * to_radius,
        ));
    }

    Route::from_waypoints(waypoints, medium)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.distance(b) < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn straight_route_offsets_endpoints_by_clearance() {
        // Co-linear along X: (0,0,0) -> (5,0,0), clearances 1.0
        let route = plan_route(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0, 1.0, Medium::Water);

        assert_eq!(route.waypoints().len(), 2);
        assert_close(route.start(), Vec3::new(1.0, PIPE_HEIGHT, 0.0));
        assert_close(route.end(), Vec3::new(4.0, PIPE_HEIGHT, 0.0));
        assert!((route.total_length() - 3.0).abs() < EPS);
    }

    #[test]
    fn bent_route_departs_along_x_and_arrives_along_z() {
        // (0,0,0) -> (5,0,5), clearances 1.0: corner at (5, *, 0)
        let route = plan_route(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), 1.0, 1.0, Medium::Product);

        assert_close(route.start(), Vec3::new(1.0, PIPE_HEIGHT, 0.0));
        assert_close(route.end(), Vec3::new(5.0, PIPE_HEIGHT, 4.0));

        // start + pre-elbow + 7 arc points + end
        assert_eq!(route.waypoints().len(), 10);

        // Every elbow point lies on the quarter circle around the corner
        let corner = Vec3::new(5.0, PIPE_HEIGHT, 0.0);
        for p in &route.waypoints()[2..9] {
            assert!((p.distance(corner) - ELBOW_RADIUS).abs() < 1e-4);
        }

        // Arc endpoints meet the trimmed straight runs
        assert_close(
            route.waypoints()[2],
            Vec3::new(5.0 - ELBOW_RADIUS, PIPE_HEIGHT, 0.0),
        );
        assert_close(
            route.waypoints()[8],
            Vec3::new(5.0, PIPE_HEIGHT, ELBOW_RADIUS),
        );
    }

    #[test]
    fn bend_is_asymmetric_under_argument_order() {
        let a = Vec3::ZERO;
        let b = Vec3::new(5.0, 0.0, 5.0);
        let forward = plan_route(a, b, 1.0, 1.0, Medium::Gas);
        let reverse = plan_route(b, a, 1.0, 1.0, Medium::Gas);
        // Both depart along X and arrive along Z, so the reversed route is
        // not the forward route traversed backwards.
        assert!(reverse.start().distance(forward.end()) > 1.0);
    }

    #[test]
    fn segment_lengths_sum_to_total() {
        let route = plan_route(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), 1.0, 1.0, Medium::Steam);
        let sum: f32 = route.seg_lengths().iter().sum();
        assert!((sum - route.total_length()).abs() < EPS);
        assert_eq!(route.seg_lengths().len(), route.waypoints().len() - 1);
    }

    #[test]
    fn sampler_hits_endpoints() {
        let route = plan_route(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), 1.0, 1.0, Medium::Air);
        assert_close(route.position_at(0.0), route.start());
        assert_close(route.position_at(1.0), route.end());
        // Past 1 clamps, never indexes out of range
        assert_close(route.position_at(1.5), route.end());
    }

    #[test]
    fn sampler_is_continuous() {
        let route = plan_route(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), 1.0, 1.0, Medium::Water);
        let steps = 1000;
        let max_step = route.total_length() / steps as f32;
        let mut prev = route.position_at(0.0);
        for i in 1..=steps {
            let p = route.position_at(i as f32 / steps as f32);
            assert!(p.distance(prev) < max_step * 2.0, "jump at step {i}");
            prev = p;
        }
    }

    #[test]
    fn zero_distance_route_is_degenerate_but_safe() {
        let route = plan_route(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0, Medium::Water);
        assert_eq!(route.waypoints().len(), 2);
        assert!(route.total_length() < EPS);
        // Sampler tolerates a zero-length total
        assert_close(route.position_at(0.0), Vec3::new(0.0, PIPE_HEIGHT, 0.0));
        assert_close(route.position_at(0.7), Vec3::new(0.0, PIPE_HEIGHT, 0.0));
    }

    #[test]
    fn near_zero_segments_do_not_break_sampling() {
        // The pre-elbow waypoint coincides with the first arc point, leaving a
        // zero-length segment in the list; sampling must walk past it.
        let route = plan_route(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), 1.0, 1.0, Medium::Water);
        assert!(route.seg_lengths().iter().any(|&len| len < EPS));
        for i in 0..=100 {
            let p = route.position_at(i as f32 / 100.0);
            assert!(p.is_finite());
        }
    }
}
