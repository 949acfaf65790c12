use thiserror::Error;

/// Failures that make the graph degrade to drawing nothing.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("drawing surface unavailable: {0}")]
	SurfaceUnavailable(String),
	#[error("no browser window")]
	NoWindow,
}
