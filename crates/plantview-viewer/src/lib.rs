//! Plantview Viewer - Interactive 3D process diagram
//!
//! Renders a process topology as 3D equipment connected by routed piping,
//! with flow markers animating along each pipe and mouse-driven
//! hover/selection of components.

pub mod app;
pub mod equipment;
pub mod flow;
pub mod picking;
pub mod process;
pub mod scene;
pub mod ui;
