//! Core traits that decouple the tiling logic from any specific windowing
//! system or input transport.
//!
//! Every concrete backend (the X11 adapter, the hotkey listener, a test
//! harness, …) implements one of these traits.  The
//! [`GeometryEngine`](crate::engine::GeometryEngine) and
//! [`CommandDispatcher`](crate::dispatcher::CommandDispatcher) only depend
//! on these abstractions.

use crate::geometry::{Monitor, Rect};
use std::sync::mpsc;

/// Abstraction over a windowing system that can report window and monitor
/// geometry and move windows around.
///
/// An implementation might talk to an X server, or it might be a scripted
/// fake used in tests.  Window handles are owned by the adapter and are
/// never held by the core beyond a single command's execution.
pub trait WindowSystem {
    /// Opaque handle for a window on this system.
    type Window: Copy + std::fmt::Debug;

    /// The error type produced by this windowing system.
    type Error: std::error::Error + Send + 'static;

    /// Return the currently active window, or `None` if the windowing
    /// system has no focused window to offer (unsupported hint, or the
    /// desktop itself is focused).
    fn active_window(&self) -> Result<Option<Self::Window>, Self::Error>;

    /// The window's *client* area: its size, positioned at the client
    /// origin in desktop coordinates.  Decorations are not included.
    fn client_geometry(&self, win: Self::Window) -> Result<Rect, Self::Error>;

    /// Desktop coordinates of the top-left corner of the window's decorated
    /// frame.  For an undecorated window this equals the client origin.
    fn frame_origin(&self, win: Self::Window) -> Result<(i32, i32), Self::Error>;

    /// The monitor the window currently occupies.
    fn monitor_of(&self, win: Self::Window) -> Result<Monitor, Self::Error>;

    /// Number of monitors attached to the desktop.
    fn monitor_count(&self) -> Result<usize, Self::Error>;

    /// Desktop-relative geometry of the monitor at `index`
    /// (`0..monitor_count()`).
    fn monitor_geometry(&self, index: usize) -> Result<Rect, Self::Error>;

    /// Whether the window is currently maximized.
    fn is_maximized(&self, win: Self::Window) -> Result<bool, Self::Error>;

    /// Ask the window manager to maximize the window.
    fn maximize(&self, win: Self::Window) -> Result<(), Self::Error>;

    /// Ask the window manager to unmaximize the window.
    ///
    /// Some window managers are known to ignore this request; the call
    /// reports only whether the request was *delivered*, not whether it had
    /// a visible effect.
    fn unmaximize(&self, win: Self::Window) -> Result<(), Self::Error>;

    /// Move the window so its decorated frame's top-left lands at the given
    /// desktop coordinates, and resize its client area to `width`×`height`.
    ///
    /// This split (frame position, client size) is how EWMH window managers
    /// interpret a configure request with north-west gravity.
    fn move_resize(
        &self,
        win: Self::Window,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of positioning command names.
///
/// Implementations listen on some input — grabbed X11 hotkeys, a test
/// harness, … — and forward each command name into the provided
/// [`mpsc::Sender`].  The dispatch loop does not know (or care) where the
/// names come from.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming command name into `sink`.
    ///
    /// This method blocks the calling thread.
    fn run(&mut self, sink: mpsc::Sender<String>) -> Result<(), Self::Error>;
}
