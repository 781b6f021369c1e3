//! Physical hotkeys and their default command bindings.
//!
//! The bindings are expressed against the abstract [`PadKey`] identifiers,
//! so the layout table and engine never see key-symbol constants; only the
//! X11 hotkey backend translates a [`PadKey`] into a keysym.

/// A physical keypad key (the key itself, independent of NumLock state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadKey {
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpEnter,
}

/// The default key-to-command map.
///
/// The digits mirror the window positions on the numeric keypad: 1 is the
/// bottom-left corner, 5 the middle, 9 the top-right corner.  0 toggles
/// maximize and Enter cycles monitors.
pub const DEFAULT_BINDINGS: [(PadKey, &str); 11] = [
    (PadKey::Kp0, "maximize"),
    (PadKey::Kp1, "bottom-left"),
    (PadKey::Kp2, "bottom"),
    (PadKey::Kp3, "bottom-right"),
    (PadKey::Kp4, "left"),
    (PadKey::Kp5, "middle"),
    (PadKey::Kp6, "right"),
    (PadKey::Kp7, "top-left"),
    (PadKey::Kp8, "top"),
    (PadKey::Kp9, "top-right"),
    (PadKey::KpEnter, "monitor-switch"),
];
