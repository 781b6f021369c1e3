//! X11 backends: the [`WindowSystem`](crate::traits::WindowSystem) adapter
//! and the global hotkey listener.
//!
//! Both talk to the X server through `x11rb` and rely on the window manager
//! being EWMH-compliant (`_NET_ACTIVE_WINDOW`, `_NET_FRAME_EXTENTS`,
//! `_NET_WM_STATE`).

pub mod adapter;
pub mod hotkeys;

pub use adapter::X11WindowSystem;
pub use hotkeys::HotkeyListener;
