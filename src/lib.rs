//! **snaptile** — a keyboard-driven window-tiling helper for X11.
//!
//! Given a positioning command (`left`, `top-right`, `maximize`,
//! `monitor-switch`, …), snaptile computes a target rectangle for the
//! active window and moves/resizes it, compensating for window-manager
//! decorations and multi-monitor geometry.  Invoking the same command
//! repeatedly cycles the window through a list of layouts (half, third,
//! two-thirds of the monitor).
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::WindowSystem`] — abstracts window and monitor geometry
//!   queries and move/resize/maximize requests, so the tiling logic is not
//!   coupled to X11 and can run against a fake in tests.
//! * [`traits::CommandSource`] — abstracts the transport that delivers
//!   command names (grabbed hotkeys, a test harness, …) so the dispatch
//!   loop is not coupled to any specific input mechanism.
//!
//! The [`engine::GeometryEngine`] implements the decoration-aware geometry
//! math and the cycle algorithm; the [`dispatcher::CommandDispatcher`]
//! resolves command names through the [`layout::LayoutTable`] and drives
//! the engine.  Concrete backends live in [`x11`].
//!
//! snaptile is not a window manager: it never creates, destroys, or
//! reparents windows, and it leaves stacking and focus policy alone.

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod geometry;
pub mod keys;
pub mod layout;
pub mod traits;
pub mod x11;
