//! Flow marker progress math
//!
//! Markers carry only a progress fraction in [0, 1); their world position is
//! re-derived from the route sampler every tick, so no velocity state exists
//! beyond the fraction itself.

/// Traversal speed along routes, in world units per second
pub const FLOW_SPEED: f32 = 1.5;
/// Markers spawned per route, phase-offset at creation
pub const MARKERS_PER_ROUTE: usize = 3;
/// Routes shorter than this are treated as stationary to avoid division
/// blow-ups on degenerate geometry
pub const MIN_ROUTE_LENGTH: f32 = 1e-4;

/// Initial phase offset for marker `index` of `count`, distributing markers
/// evenly along the route at creation time.
pub fn initial_phase(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    index as f32 / count as f32
}

/// Advance a marker's progress by `delta` seconds at `speed`, wrapping past
/// 1.0 so markers loop indefinitely. Markers on routes below the length
/// floor never advance.
pub fn advance_progress(progress: f32, speed: f32, delta: f32, total_length: f32) -> f32 {
    if total_length < MIN_ROUTE_LENGTH {
        return progress;
    }
    let mut next = progress + (speed * delta) / total_length;
    if next > 1.0 {
        next -= 1.0;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_evenly_distributed() {
        assert_eq!(initial_phase(0, 3), 0.0);
        assert!((initial_phase(1, 3) - 1.0 / 3.0).abs() < 1e-6);
        assert!((initial_phase(2, 3) - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(initial_phase(0, 0), 0.0);
    }

    #[test]
    fn progress_wraps_past_one() {
        let p = advance_progress(0.95, 1.5, 1.0, 10.0);
        assert!((p - 0.1).abs() < 1e-5);
        assert!((0.0..1.0).contains(&p));
    }

    #[test]
    fn one_full_period_returns_to_starting_phase() {
        // Advancing by exactly total_length / speed time units wraps a marker
        // back to its original phase, for any nonzero starting phase.
        let total = 7.3;
        let speed = 1.5;
        let period = total / speed;
        for phase in [0.25, 1.0 / 3.0, 0.5, 0.9] {
            let p = advance_progress(phase, speed, period, total);
            assert!((p - phase).abs() < 1e-4, "phase {phase} drifted to {p}");
        }
    }

    #[test]
    fn zero_length_routes_are_stationary() {
        let p = advance_progress(0.4, 1.5, 0.016, 0.0);
        assert_eq!(p, 0.4);
        let p = advance_progress(0.4, 1.5, 0.016, MIN_ROUTE_LENGTH / 2.0);
        assert_eq!(p, 0.4);
    }
}
