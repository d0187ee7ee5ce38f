//! Plantview Core - Process topology, pipe routing, and interaction logic
//!
//! This crate provides the foundational types for the Plantview system:
//! - Process topology data model (components, connections) and JSON loading
//! - Pipe route planning between equipment anchors (straight runs and
//!   L-shaped bends with circular elbows)
//! - Arc-length parameterized sampling along planned routes
//! - Flow marker progress math for constant-speed animation
//! - The hover/selection state machine driving highlight transitions

pub mod flow;
pub mod interaction;
pub mod route;
pub mod topology;

pub use flow::{advance_progress, initial_phase, FLOW_SPEED, MARKERS_PER_ROUTE};
pub use interaction::{HighlightChange, HighlightState, InfoRequest, InteractionState};
pub use route::{plan_route, Route, ELBOW_RADIUS, PIPE_HEIGHT};
pub use topology::{
    Component, ComponentId, ComponentKind, Connection, Medium, ProcessTopology, TopologyError,
};
