//! [`WindowSystem`] implementation backed by an X11 server.
//!
//! Geometry comes straight from the X protocol (`GetGeometry`,
//! `TranslateCoordinates`); everything window-manager-related goes through
//! EWMH root/window properties and client messages, and monitors are
//! enumerated via RandR.

use crate::geometry::{Monitor, Rect};
use crate::traits::WindowSystem;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, EventMask, Window,
};
use x11rb::rust_connection::RustConnection;

x11rb::atom_manager! {
    /// The EWMH atoms the adapter needs, interned once at connect time.
    Atoms:
    AtomsCookie {
        _NET_ACTIVE_WINDOW,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DESKTOP,
        _NET_FRAME_EXTENTS,
        _NET_WM_STATE,
        _NET_WM_STATE_MAXIMIZED_HORZ,
        _NET_WM_STATE_MAXIMIZED_VERT,
    }
}

/// `_NET_WM_STATE` client message actions.
const NET_WM_STATE_REMOVE: u32 = 0;
const NET_WM_STATE_ADD: u32 = 1;
/// Source indication: a normal application.
const SOURCE_APPLICATION: u32 = 1;

/// Errors that can occur when talking to the X server.
#[derive(Debug, thiserror::Error)]
pub enum X11Error {
    #[error("x11 connect error: {0}")]
    Connect(#[from] ConnectError),
    #[error("x11 connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("x11 reply error: {0}")]
    Reply(#[from] ReplyError),
    #[error("{0}")]
    Protocol(String),
}

/// X11-backed window system.
///
/// Holds one connection for the lifetime of the process; every query is a
/// fresh round trip, nothing is cached.
pub struct X11WindowSystem {
    conn: RustConnection,
    root: Window,
    atoms: Atoms,
}

impl X11WindowSystem {
    /// Connect to the display named by `$DISPLAY`.
    pub fn connect() -> Result<Self, X11Error> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn.setup().roots[screen_num].root;
        let atoms = Atoms::new(&conn)?.reply()?;
        Ok(Self { conn, root, atoms })
    }

    /// Read a window property as a list of 32-bit values.
    fn property32(
        &self,
        win: Window,
        property: Atom,
        type_: AtomEnum,
    ) -> Result<Vec<u32>, X11Error> {
        let reply = self
            .conn
            .get_property(false, win, property, type_, 0, 1024)?
            .reply()?;
        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    /// Desktop coordinates of the window's client-area origin.
    fn client_origin(&self, win: Window) -> Result<(i32, i32), X11Error> {
        let reply = self
            .conn
            .translate_coordinates(win, self.root, 0, 0)?
            .reply()?;
        Ok((reply.dst_x as i32, reply.dst_y as i32))
    }

    /// `_NET_FRAME_EXTENTS` as `(left, right, top, bottom)`.
    ///
    /// Missing property (undecorated window, or a WM that doesn't publish
    /// extents) means all-zero extents.
    fn net_frame_extents(&self, win: Window) -> Result<(u32, u32, u32, u32), X11Error> {
        let values = self.property32(win, self.atoms._NET_FRAME_EXTENTS, AtomEnum::CARDINAL)?;
        if values.len() < 4 {
            return Ok((0, 0, 0, 0));
        }
        Ok((values[0], values[1], values[2], values[3]))
    }

    /// All monitors, in RandR order.
    fn monitors(&self) -> Result<Vec<Rect>, X11Error> {
        let reply = self.conn.randr_get_monitors(self.root, true)?.reply()?;
        Ok(reply
            .monitors
            .iter()
            .map(|m| Rect::new(m.x as i32, m.y as i32, m.width as u32, m.height as u32))
            .collect())
    }

    /// Send a `_NET_WM_STATE` maximize/unmaximize request to the root.
    fn set_maximized(&self, win: Window, action: u32) -> Result<(), X11Error> {
        let event = ClientMessageEvent::new(
            32,
            win,
            self.atoms._NET_WM_STATE,
            [
                action,
                self.atoms._NET_WM_STATE_MAXIMIZED_HORZ,
                self.atoms._NET_WM_STATE_MAXIMIZED_VERT,
                SOURCE_APPLICATION,
                0,
            ],
        );
        self.conn.send_event(
            false,
            self.root,
            EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
            event,
        )?;
        self.conn.flush()?;
        Ok(())
    }
}

impl WindowSystem for X11WindowSystem {
    type Window = Window;
    type Error = X11Error;

    /// `_NET_ACTIVE_WINDOW` from the root, filtered so the desktop itself
    /// never counts as a target.
    fn active_window(&self) -> Result<Option<Window>, X11Error> {
        let values =
            self.property32(self.root, self.atoms._NET_ACTIVE_WINDOW, AtomEnum::WINDOW)?;
        let win = match values.first() {
            Some(&w) if w != 0 => w,
            _ => return Ok(None),
        };

        let types = self.property32(win, self.atoms._NET_WM_WINDOW_TYPE, AtomEnum::ATOM)?;
        if types.first() == Some(&self.atoms._NET_WM_WINDOW_TYPE_DESKTOP) {
            return Ok(None);
        }
        Ok(Some(win))
    }

    fn client_geometry(&self, win: Window) -> Result<Rect, X11Error> {
        let geo = self.conn.get_geometry(win)?.reply()?;
        let (x, y) = self.client_origin(win)?;
        Ok(Rect::new(x, y, geo.width as u32, geo.height as u32))
    }

    fn frame_origin(&self, win: Window) -> Result<(i32, i32), X11Error> {
        let (x, y) = self.client_origin(win)?;
        let (left, _right, top, _bottom) = self.net_frame_extents(win)?;
        Ok((x - left as i32, y - top as i32))
    }

    /// The monitor containing the client-area center, falling back to the
    /// first monitor for windows positioned off every monitor.
    fn monitor_of(&self, win: Window) -> Result<Monitor, X11Error> {
        let client = self.client_geometry(win)?;
        let cx = client.x + client.width as i32 / 2;
        let cy = client.y + client.height as i32 / 2;

        let monitors = self.monitors()?;
        if monitors.is_empty() {
            return Err(X11Error::Protocol("no monitors reported".into()));
        }
        let index = monitors
            .iter()
            .position(|m| m.contains(cx, cy))
            .unwrap_or(0);
        Ok(Monitor {
            index,
            rect: monitors[index],
        })
    }

    fn monitor_count(&self) -> Result<usize, X11Error> {
        Ok(self.monitors()?.len())
    }

    fn monitor_geometry(&self, index: usize) -> Result<Rect, X11Error> {
        let monitors = self.monitors()?;
        monitors.get(index).copied().ok_or_else(|| {
            X11Error::Protocol(format!(
                "monitor index {} out of range (have {})",
                index,
                monitors.len()
            ))
        })
    }

    fn is_maximized(&self, win: Window) -> Result<bool, X11Error> {
        let states = self.property32(win, self.atoms._NET_WM_STATE, AtomEnum::ATOM)?;
        Ok(states.contains(&self.atoms._NET_WM_STATE_MAXIMIZED_HORZ)
            && states.contains(&self.atoms._NET_WM_STATE_MAXIMIZED_VERT))
    }

    fn maximize(&self, win: Window) -> Result<(), X11Error> {
        self.set_maximized(win, NET_WM_STATE_ADD)
    }

    /// Delivery of the request is all that can be guaranteed here — some
    /// window managers ignore an unmaximize message.
    fn unmaximize(&self, win: Window) -> Result<(), X11Error> {
        self.set_maximized(win, NET_WM_STATE_REMOVE)
    }

    fn move_resize(
        &self,
        win: Window,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), X11Error> {
        let aux = ConfigureWindowAux::new()
            .x(x)
            .y(y)
            .width(width)
            .height(height);
        self.conn.configure_window(win, &aux)?;
        self.conn.flush()?;
        Ok(())
    }
}
