//! Global hotkey listener: a [`CommandSource`] backed by X11 key grabs.
//!
//! Grabs Ctrl+Alt plus the numeric-keypad keys on the root window and
//! translates each key press into the bound command name.  Only the plain
//! Ctrl+Alt chord is grabbed, so the bindings require NumLock (and
//! CapsLock) to be off — same limitation the tool has always had.

use crate::keys::PadKey;
use crate::traits::CommandSource;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::mpsc;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, GrabMode, Keycode, ModMask};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

/// Keysyms for the keypad keys (from X11's `keysymdef.h`).
const XK_KP_ENTER: u32 = 0xff8d;
const XK_KP_0: u32 = 0xffb0;

/// The fixed modifier chord: Ctrl+Alt.
fn chord() -> ModMask {
    ModMask::CONTROL | ModMask::M1
}

/// Keysym for a physical keypad key.
fn keysym_of(key: PadKey) -> u32 {
    match key {
        PadKey::Kp0 => XK_KP_0,
        PadKey::Kp1 => XK_KP_0 + 1,
        PadKey::Kp2 => XK_KP_0 + 2,
        PadKey::Kp3 => XK_KP_0 + 3,
        PadKey::Kp4 => XK_KP_0 + 4,
        PadKey::Kp5 => XK_KP_0 + 5,
        PadKey::Kp6 => XK_KP_0 + 6,
        PadKey::Kp7 => XK_KP_0 + 7,
        PadKey::Kp8 => XK_KP_0 + 8,
        PadKey::Kp9 => XK_KP_0 + 9,
        PadKey::KpEnter => XK_KP_ENTER,
    }
}

/// Find the keycode carrying `keysym` in a flat keyboard-mapping table.
///
/// `keysyms` holds `per_keycode` entries for each keycode starting at
/// `min_keycode`; keypad keysyms usually sit in a shifted column, so every
/// column is searched.
fn find_keycode(keysyms: &[u32], per_keycode: usize, min_keycode: u8, keysym: u32) -> Option<Keycode> {
    if per_keycode == 0 {
        return None;
    }
    keysyms
        .chunks(per_keycode)
        .position(|chunk| chunk.contains(&keysym))
        .and_then(|i| u8::try_from(min_keycode as usize + i).ok())
}

/// Errors from the hotkey listener.
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    /// The X hotkey backend cannot be used at all: no display, no usable
    /// keycodes, or the chord is already grabbed by another client.
    #[error("hotkey backend unavailable: {0}")]
    Unavailable(String),

    /// The established event stream failed.
    #[error("x11 event error: {0}")]
    EventStream(String),
}

/// A [`CommandSource`] that owns the key grabs for the lifetime of the
/// process and blocks on the X event stream.
pub struct HotkeyListener {
    conn: RustConnection,
    bindings: HashMap<Keycode, String>,
}

impl HotkeyListener {
    /// Connect, resolve keycodes, and grab every bound chord.
    ///
    /// Fails with [`HotkeyError::Unavailable`] if the display cannot be
    /// opened or none of the bindings can be established — the caller
    /// should treat that as "daemon mode is not possible here".
    pub fn new(bindings: &[(PadKey, &str)]) -> Result<Self, HotkeyError> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| HotkeyError::Unavailable(format!("cannot open display: {}", e)))?;
        let setup = conn.setup();
        let root = setup.roots[screen_num].root;
        let min_keycode = setup.min_keycode;
        let max_keycode = setup.max_keycode;

        let mapping = conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)
            .map_err(|e| HotkeyError::Unavailable(format!("keyboard mapping: {}", e)))?
            .reply()
            .map_err(|e| HotkeyError::Unavailable(format!("keyboard mapping: {}", e)))?;
        let per_keycode = mapping.keysyms_per_keycode as usize;

        let mut resolved = HashMap::new();
        for (key, command) in bindings {
            match find_keycode(&mapping.keysyms, per_keycode, min_keycode, keysym_of(*key)) {
                Some(keycode) => {
                    resolved.insert(keycode, command.to_string());
                }
                None => warn!("no keycode for {:?}, skipping binding", key),
            }
        }
        if resolved.is_empty() {
            return Err(HotkeyError::Unavailable(
                "no bindable keypad keys on this keyboard".into(),
            ));
        }

        for keycode in resolved.keys() {
            conn.grab_key(
                false,
                root,
                chord(),
                *keycode,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
            )
            .map_err(|e| HotkeyError::Unavailable(format!("grab: {}", e)))?
            .check()
            .map_err(|e| {
                HotkeyError::Unavailable(format!("cannot grab keycode {}: {}", keycode, e))
            })?;
        }
        conn.flush()
            .map_err(|e| HotkeyError::Unavailable(format!("flush: {}", e)))?;

        info!("grabbed {} keypad hotkeys", resolved.len());
        Ok(Self {
            conn,
            bindings: resolved,
        })
    }
}

impl CommandSource for HotkeyListener {
    type Error = HotkeyError;

    /// Block on the X event stream, forwarding each grabbed key press as a
    /// command name.  Returns when the sink is closed.
    fn run(&mut self, sink: mpsc::Sender<String>) -> Result<(), HotkeyError> {
        loop {
            let event = self
                .conn
                .wait_for_event()
                .map_err(|e| HotkeyError::EventStream(e.to_string()))?;
            if let Event::KeyPress(press) = event {
                if let Some(command) = self.bindings.get(&press.detail) {
                    debug!("keycode {} -> {:?}", press.detail, command);
                    if sink.send(command.clone()).is_err() {
                        info!("sink closed, shutting down");
                        return Ok(());
                    }
                }
            }
        }
    }
}

//  Tests
