//! Canvas components for job relationship graphs.

pub mod job_graph;
