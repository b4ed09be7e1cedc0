use thiserror::Error;

/// Reasons the canvas could not be set up.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CanvasError {
	/// No global `window` (not running in a browser).
	#[error("no browser window available")]
	NoWindow,
	/// `window.innerWidth` / `innerHeight` did not yield a number.
	#[error("could not read the window size")]
	WindowSize,
	/// `getContext("2d")` failed or returned null.
	#[error("canvas 2d context unavailable")]
	NoContext,
}
