//! Error taxonomy
//!
//! Setup failures are fatal: they are reported once and the process exits.
//! Steady-state ticking has no failure mode; a failed blit stops the
//! presentation loop.

use std::fmt;

/// A collaborator could not be created at startup.
#[derive(Debug)]
pub enum SetupError {
    /// Offscreen canvas allocation failed (zero-sized or out of memory)
    Canvas(String),
    /// Window creation failed
    Window(String),
    /// Display surface creation failed
    Surface(String),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Canvas(msg) => write!(f, "canvas setup failed: {msg}"),
            SetupError::Window(msg) => write!(f, "window setup failed: {msg}"),
            SetupError::Surface(msg) => write!(f, "display surface setup failed: {msg}"),
        }
    }
}

impl std::error::Error for SetupError {}

/// A frame could not be copied onto the visible surface.
#[derive(Debug)]
pub struct PresentError(pub String);

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "present failed: {}", self.0)
    }
}

impl std::error::Error for PresentError {}
