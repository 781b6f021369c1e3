//! The geometry engine: decoration-aware window geometry and the cycle
//! algorithm.
//!
//! The engine works on *combined* (decoration-inclusive) rectangles.  A
//! window's combined geometry is its client area plus the window-manager
//! frame: the border wraps both sides horizontally and the bottom edge,
//! while the titlebar only adds height on top.  Targets are expressed the
//! same way, so the engine subtracts the frame again when it converts a
//! target into a client-area move/resize call.
//!
//! The engine is generic over any [`WindowSystem`] implementation; in tests
//! it runs against a scripted fake.

use crate::geometry::{FracRect, FrameExtents, Monitor, Rect};
use crate::traits::WindowSystem;
use log::debug;

/// Possible errors from the geometry engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The windowing system returned an error.
    #[error("window system error: {0}")]
    WindowSystem(String),

    /// A cycle list with no entries reached the engine.  This is a
    /// configuration bug and is also rejected at table construction.
    #[error("empty cycle list")]
    EmptyCycleList,

    /// Subtracting the frame extents from the target rectangle would yield
    /// a non-positive client size.
    #[error(
        "target {target} too small for frame extents (border {border}, titlebar {titlebar})"
    )]
    Sizing {
        target: Rect,
        border: u32,
        titlebar: u32,
    },
}

/// Computes decoration-aware geometry and applies cycled layouts.
pub struct GeometryEngine<W: WindowSystem> {
    ws: W,
}

impl<W: WindowSystem> GeometryEngine<W> {
    pub fn new(ws: W) -> Self {
        Self { ws }
    }

    /// Shared access to the underlying windowing system.
    pub fn window_system(&self) -> &W {
        &self.ws
    }

    /// Current decoration thickness for `win`.
    ///
    /// Computed as the offset between the frame's outer origin and the
    /// client origin.  Recomputed on every call: a maximized or re-themed
    /// window may report different extents than it did a moment ago.
    pub fn frame_extents(&self, win: W::Window) -> Result<FrameExtents, EngineError> {
        let client = self.ws.client_geometry(win).map_err(wrap)?;
        let (fx, fy) = self.ws.frame_origin(win).map_err(wrap)?;
        Ok(FrameExtents {
            border: (client.x - fx).max(0) as u32,
            titlebar: (client.y - fy).max(0) as u32,
        })
    }

    /// The window's decoration-inclusive rectangle, relative to the monitor
    /// it occupies, together with that monitor.
    ///
    /// Size is `(client_w + 2·border, client_h + titlebar + border)`; the
    /// position is the frame origin shifted into the monitor's coordinate
    /// space.
    pub fn combined_geometry(&self, win: W::Window) -> Result<(Monitor, Rect), EngineError> {
        let client = self.ws.client_geometry(win).map_err(wrap)?;
        let extents = self.frame_extents(win)?;
        let (fx, fy) = self.ws.frame_origin(win).map_err(wrap)?;
        let monitor = self.ws.monitor_of(win).map_err(wrap)?;

        let combined = Rect {
            x: fx - monitor.rect.x,
            y: fy - monitor.rect.y,
            width: client.width + 2 * extents.border,
            height: client.height + extents.titlebar + extents.border,
        };
        Ok((monitor, combined))
    }

    /// Resolve a cycle list to absolute pixel rectangles against a monitor.
    ///
    /// Pure and idempotent: the same list against the same monitor size
    /// always yields the same rectangles.
    pub fn resolve_fractions(&self, fracs: &[FracRect], monitor: &Rect) -> Vec<Rect> {
        fracs.iter().map(|f| f.resolve(monitor)).collect()
    }

    /// Cycle `win` one step through `fracs` and reposition it.
    ///
    /// If the window's current combined geometry exactly equals a resolved
    /// entry at index `i`, entry `(i + 1) % len` is selected; otherwise the
    /// window was moved or resized externally (or this is the first
    /// application) and entry 0 is selected unconditionally.  Returns the
    /// selected rectangle.
    pub fn cycle(&self, fracs: &[FracRect], win: W::Window) -> Result<Rect, EngineError> {
        if fracs.is_empty() {
            return Err(EngineError::EmptyCycleList);
        }

        let (monitor, current) = self.combined_geometry(win)?;
        let slots = self.resolve_fractions(fracs, &monitor.rect);

        let mut target = None;
        for (pos, slot) in slots.iter().enumerate() {
            debug!("matching against slot {}, geometry {}", pos, slot);
            if current == *slot {
                let next = (pos + 1) % slots.len();
                debug!("matched slot {}, advancing to slot {}", pos, next);
                target = Some(slots[next]);
                break;
            }
        }

        let target = target.unwrap_or_else(|| {
            debug!("no match, picked first slot, geometry {}", slots[0]);
            slots[0]
        });

        self.reposition(win, &target, &monitor.rect)?;
        Ok(target)
    }

    /// Apply a decoration-inclusive target rectangle to the window.
    ///
    /// `target` is relative to `monitor`; pass a zero rect to position
    /// relative to the desktop as a whole.  The frame extents are queried
    /// fresh and subtracted to obtain the client-area move/resize call.
    pub fn reposition(
        &self,
        win: W::Window,
        target: &Rect,
        monitor: &Rect,
    ) -> Result<(), EngineError> {
        let extents = self.frame_extents(win)?;
        let x = target.x + monitor.x;
        let y = target.y + monitor.y;

        let width = match target.width.checked_sub(2 * extents.border) {
            Some(w) if w > 0 => w,
            _ => {
                return Err(EngineError::Sizing {
                    target: *target,
                    border: extents.border,
                    titlebar: extents.titlebar,
                })
            }
        };
        let height = match target.height.checked_sub(extents.titlebar + extents.border) {
            Some(h) if h > 0 => h,
            _ => {
                return Err(EngineError::Sizing {
                    target: *target,
                    border: extents.border,
                    titlebar: extents.titlebar,
                })
            }
        };

        debug!("reposition: to ({}, {}), {}x{}", x, y, width, height);
        self.ws.move_resize(win, x, y, width, height).map_err(wrap)
    }
}

/// Collapse an adapter error into an [`EngineError`].
fn wrap<E: std::error::Error>(e: E) -> EngineError {
    EngineError::WindowSystem(e.to_string())
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FracRect, Monitor, Rect};
    use std::cell::RefCell;

    const BORDER: u32 = 4;
    const TITLEBAR: u32 = 24;

    /// Scripted windowing system: one window, configurable monitors, frame
    /// extents baked into the client/frame origin difference.  Applies
    /// `move_resize` to its own state so round trips behave like a window
    /// manager that honors requests exactly.
    struct FakeWs {
        client: RefCell<Rect>,
        monitors: Vec<Rect>,
        maximized: RefCell<bool>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("fake error")]
    struct FakeError;

    impl FakeWs {
        fn single_monitor() -> Self {
            Self {
                client: RefCell::new(Rect::new(0, 0, 100, 100)),
                monitors: vec![Rect::new(0, 0, 1920, 1200)],
                maximized: RefCell::new(false),
            }
        }

        /// Place the window so its *combined* geometry equals `combined`,
        /// relative to `monitor`.
        fn place(&self, combined: Rect, monitor: &Rect) {
            *self.client.borrow_mut() = Rect {
                x: monitor.x + combined.x + BORDER as i32,
                y: monitor.y + combined.y + TITLEBAR as i32,
                width: combined.width - 2 * BORDER,
                height: combined.height - (TITLEBAR + BORDER),
            };
        }
    }

    impl WindowSystem for FakeWs {
        type Window = u32;
        type Error = FakeError;

        fn active_window(&self) -> Result<Option<u32>, FakeError> {
            Ok(Some(7))
        }

        fn client_geometry(&self, _: u32) -> Result<Rect, FakeError> {
            Ok(*self.client.borrow())
        }

        fn frame_origin(&self, _: u32) -> Result<(i32, i32), FakeError> {
            let c = self.client.borrow();
            Ok((c.x - BORDER as i32, c.y - TITLEBAR as i32))
        }

        fn monitor_of(&self, _: u32) -> Result<Monitor, FakeError> {
            let c = self.client.borrow();
            let index = self
                .monitors
                .iter()
                .position(|m| m.contains(c.x, c.y))
                .unwrap_or(0);
            Ok(Monitor {
                index,
                rect: self.monitors[index],
            })
        }

        fn monitor_count(&self) -> Result<usize, FakeError> {
            Ok(self.monitors.len())
        }

        fn monitor_geometry(&self, index: usize) -> Result<Rect, FakeError> {
            Ok(self.monitors[index])
        }

        fn is_maximized(&self, _: u32) -> Result<bool, FakeError> {
            Ok(*self.maximized.borrow())
        }

        fn maximize(&self, _: u32) -> Result<(), FakeError> {
            *self.maximized.borrow_mut() = true;
            Ok(())
        }

        fn unmaximize(&self, _: u32) -> Result<(), FakeError> {
            *self.maximized.borrow_mut() = false;
            Ok(())
        }

        fn move_resize(
            &self,
            _: u32,
            x: i32,
            y: i32,
            width: u32,
            height: u32,
        ) -> Result<(), FakeError> {
            // (x, y) is the frame origin; the client sits inside the frame.
            *self.client.borrow_mut() =
                Rect::new(x + BORDER as i32, y + TITLEBAR as i32, width, height);
            Ok(())
        }
    }

    fn left_cycle() -> Vec<FracRect> {
        vec![
            FracRect::new(0.0, 0.0, 0.5, 1.0),
            FracRect::new(0.0, 0.0, 1.0 / 3.0, 1.0),
            FracRect::new(0.0, 0.0, 2.0 / 3.0, 1.0),
        ]
    }

    #[test]
    fn frame_extents_from_origins() {
        let engine = GeometryEngine::new(FakeWs::single_monitor());
        let extents = engine.frame_extents(7).unwrap();
        assert_eq!(extents.border, BORDER);
        assert_eq!(extents.titlebar, TITLEBAR);
    }

    #[test]
    fn combined_geometry_adds_frame() {
        let ws = FakeWs::single_monitor();
        *ws.client.borrow_mut() = Rect::new(104, 74, 400, 300);
        let engine = GeometryEngine::new(ws);

        let (monitor, combined) = engine.combined_geometry(7).unwrap();
        assert_eq!(monitor.index, 0);
        assert_eq!(combined, Rect::new(100, 50, 408, 328));
    }

    #[test]
    fn combined_geometry_is_monitor_relative() {
        let ws = FakeWs {
            client: RefCell::new(Rect::new(0, 0, 100, 100)),
            monitors: vec![Rect::new(0, 0, 1920, 1200), Rect::new(1920, 0, 1024, 768)],
            maximized: RefCell::new(false),
        };
        // Place the window on the second monitor.
        ws.place(Rect::new(100, 50, 408, 328), &Rect::new(1920, 0, 1024, 768));
        let engine = GeometryEngine::new(ws);

        let (monitor, combined) = engine.combined_geometry(7).unwrap();
        assert_eq!(monitor.index, 1);
        assert_eq!(combined, Rect::new(100, 50, 408, 328));
    }

    #[test]
    fn resolve_fractions_matches_monitor_size() {
        let engine = GeometryEngine::new(FakeWs::single_monitor());
        let slots = engine.resolve_fractions(&left_cycle(), &Rect::new(0, 0, 1920, 1200));
        assert_eq!(
            slots,
            vec![
                Rect::new(0, 0, 960, 1200),
                Rect::new(0, 0, 640, 1200),
                Rect::new(0, 0, 1280, 1200),
            ]
        );
    }

    #[test]
    fn cycle_advances_from_matching_slot() {
        // Window sits exactly at entry 0 of `left` (left half of a
        // 1920×1200 monitor); invoking the cycle selects entry 1.
        let ws = FakeWs::single_monitor();
        ws.place(Rect::new(0, 0, 960, 1200), &Rect::new(0, 0, 1920, 1200));
        let engine = GeometryEngine::new(ws);

        let target = engine.cycle(&left_cycle(), 7).unwrap();
        assert_eq!(target, Rect::new(0, 0, 640, 1200));
    }

    #[test]
    fn cycle_wraps_from_last_slot() {
        let ws = FakeWs::single_monitor();
        ws.place(Rect::new(0, 0, 1280, 1200), &Rect::new(0, 0, 1920, 1200));
        let engine = GeometryEngine::new(ws);

        let target = engine.cycle(&left_cycle(), 7).unwrap();
        assert_eq!(target, Rect::new(0, 0, 960, 1200));
    }

    #[test]
    fn cycle_resets_on_mismatch() {
        let ws = FakeWs::single_monitor();
        ws.place(Rect::new(123, 45, 678, 90), &Rect::new(0, 0, 1920, 1200));
        let engine = GeometryEngine::new(ws);

        let target = engine.cycle(&left_cycle(), 7).unwrap();
        assert_eq!(target, Rect::new(0, 0, 960, 1200));
    }

    #[test]
    fn cycle_walks_the_whole_list() {
        let ws = FakeWs::single_monitor();
        ws.place(Rect::new(123, 45, 678, 90), &Rect::new(0, 0, 1920, 1200));
        let engine = GeometryEngine::new(ws);

        // First call resets to slot 0, then each call advances one step and
        // the fourth call wraps back around.
        assert_eq!(engine.cycle(&left_cycle(), 7).unwrap().width, 960);
        assert_eq!(engine.cycle(&left_cycle(), 7).unwrap().width, 640);
        assert_eq!(engine.cycle(&left_cycle(), 7).unwrap().width, 1280);
        assert_eq!(engine.cycle(&left_cycle(), 7).unwrap().width, 960);
    }

    #[test]
    fn cycle_top_right_first_application() {
        // Spec'd end-to-end case: `top-right` with no prior matching
        // geometry on a 1920×1200 monitor selects {960, 0, 960, 600}.
        let ws = FakeWs::single_monitor();
        ws.place(Rect::new(10, 10, 500, 400), &Rect::new(0, 0, 1920, 1200));
        let engine = GeometryEngine::new(ws);

        let top_right = vec![
            FracRect::new(0.5, 0.0, 0.5, 0.5),
            FracRect::new(2.0 / 3.0, 0.0, 1.0 / 3.0, 0.5),
            FracRect::new(1.0 / 3.0, 0.0, 2.0 / 3.0, 0.5),
        ];
        let target = engine.cycle(&top_right, 7).unwrap();
        assert_eq!(target, Rect::new(960, 0, 960, 600));
    }

    #[test]
    fn empty_cycle_list_fails_fast() {
        let engine = GeometryEngine::new(FakeWs::single_monitor());
        let err = engine.cycle(&[], 7).unwrap_err();
        assert!(matches!(err, EngineError::EmptyCycleList));
    }

    #[test]
    fn reposition_compensates_frame() {
        let ws = FakeWs::single_monitor();
        let engine = GeometryEngine::new(ws);

        let target = Rect::new(0, 0, 960, 1200);
        engine
            .reposition(7, &target, &Rect::new(0, 0, 1920, 1200))
            .unwrap();

        let client = *engine.window_system().client.borrow();
        assert_eq!(client.width, 960 - 2 * BORDER);
        assert_eq!(client.height, 1200 - (TITLEBAR + BORDER));
        // Frame at the target origin, client offset inward by the frame.
        assert_eq!((client.x, client.y), (BORDER as i32, TITLEBAR as i32));
    }

    #[test]
    fn reposition_round_trips_through_combined_geometry() {
        let ws = FakeWs::single_monitor();
        let engine = GeometryEngine::new(ws);

        let target = Rect::new(640, 0, 640, 600);
        let monitor = Rect::new(0, 0, 1920, 1200);
        engine.reposition(7, &target, &monitor).unwrap();

        let (_, combined) = engine.combined_geometry(7).unwrap();
        assert_eq!(combined, target);
    }

    #[test]
    fn reposition_offsets_by_monitor_origin() {
        let ws = FakeWs {
            client: RefCell::new(Rect::new(0, 0, 100, 100)),
            monitors: vec![Rect::new(0, 0, 1920, 1200), Rect::new(1920, 100, 1024, 768)],
            maximized: RefCell::new(false),
        };
        let engine = GeometryEngine::new(ws);

        engine
            .reposition(7, &Rect::new(10, 20, 400, 300), &Rect::new(1920, 100, 1024, 768))
            .unwrap();
        let client = *engine.window_system().client.borrow();
        let frame = (client.x - BORDER as i32, client.y - TITLEBAR as i32);
        assert_eq!(frame, (1930, 120));
    }

    #[test]
    fn reposition_rejects_undersized_target() {
        let engine = GeometryEngine::new(FakeWs::single_monitor());
        // Narrower than two borders.
        let err = engine
            .reposition(7, &Rect::new(0, 0, 2 * BORDER - 1, 600), &Rect::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Sizing { .. }));

        // Exactly the frame height: client height would be zero.
        let err = engine
            .reposition(7, &Rect::new(0, 0, 600, TITLEBAR + BORDER), &Rect::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Sizing { .. }));
    }
}
