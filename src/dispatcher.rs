//! Command dispatch: from a command name to a concrete action on the
//! active window.
//!
//! [`CommandDispatcher`] resolves a name through the [`LayoutTable`] and
//! either runs the geometry cycle or one of the named actions (maximize
//! toggle, monitor switch).  It holds no per-command state: every execution
//! queries the windowing system afresh, and a repeated command after a
//! failure is simply a fresh attempt.

use crate::engine::{EngineError, GeometryEngine};
use crate::layout::{LayoutEntry, LayoutTable, NamedAction};
use crate::traits::WindowSystem;
use log::{debug, info};

/// Possible errors from dispatching a command.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The command name is not in the layout table.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    /// The windowing system reported no active window to act on.
    #[error("no active window")]
    NoActiveWindow,

    /// The geometry engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The windowing system returned an error.
    #[error("window system error: {0}")]
    WindowSystem(String),
}

/// Resolves command names and executes them against the active window.
pub struct CommandDispatcher<W: WindowSystem> {
    table: LayoutTable,
    engine: GeometryEngine<W>,
}

impl<W: WindowSystem> CommandDispatcher<W> {
    pub fn new(table: LayoutTable, engine: GeometryEngine<W>) -> Self {
        Self { table, engine }
    }

    /// The layout table this dispatcher resolves names against.
    pub fn table(&self) -> &LayoutTable {
        &self.table
    }

    /// Execute one positioning command against the current active window.
    ///
    /// Success carries no payload; all effects are on-screen.  Failures are
    /// surfaced synchronously and never retried here — the caller (CLI or
    /// hotkey loop) decides what to report.
    pub fn execute(&self, command: &str) -> Result<(), DispatchError> {
        let entry = self
            .table
            .get(command)
            .ok_or_else(|| DispatchError::UnknownCommand(command.to_string()))?;

        let win = self.active_window()?;
        info!("executing {:?}", command);

        match entry {
            LayoutEntry::Cycle(fracs) => {
                let target = self.engine.cycle(fracs, win)?;
                debug!("{:?} selected {}", command, target);
                Ok(())
            }
            LayoutEntry::Action(NamedAction::ToggleMaximize) => self.toggle_maximize(win),
            LayoutEntry::Action(NamedAction::CycleMonitors) => self.cycle_monitors(win),
        }
    }

    /// Resolve the active window or fail.
    fn active_window(&self) -> Result<W::Window, DispatchError> {
        self.engine
            .window_system()
            .active_window()
            .map_err(wrap)?
            .ok_or(DispatchError::NoActiveWindow)
    }

    /// Maximize if unmaximized, unmaximize otherwise.
    ///
    /// Purely a function of the current state.  Whether the unmaximize
    /// request visibly takes effect is up to the window manager; some are
    /// known to ignore it.
    fn toggle_maximize(&self, win: W::Window) -> Result<(), DispatchError> {
        let ws = self.engine.window_system();
        if ws.is_maximized(win).map_err(wrap)? {
            debug!("window is maximized, requesting unmaximize");
            ws.unmaximize(win).map_err(wrap)
        } else {
            debug!("window is not maximized, requesting maximize");
            ws.maximize(win).map_err(wrap)
        }
    }

    /// Move the window to the next monitor, keeping its monitor-relative
    /// geometry.
    ///
    /// Maximize state is monitor-bound on most window managers, so a
    /// maximized window is unmaximized first and re-maximized on the target
    /// monitor after the move.
    fn cycle_monitors(&self, win: W::Window) -> Result<(), DispatchError> {
        let ws = self.engine.window_system();
        let (monitor, geometry) = self.engine.combined_geometry(win)?;

        let count = ws.monitor_count().map_err(wrap)?;
        let next = (monitor.index + 1) % count;
        let next_rect = ws.monitor_geometry(next).map_err(wrap)?;
        debug!(
            "monitor switch: {} -> {} ({}), keeping {}",
            monitor.index, next, next_rect, geometry
        );

        if ws.is_maximized(win).map_err(wrap)? {
            ws.unmaximize(win).map_err(wrap)?;
            self.engine.reposition(win, &geometry, &next_rect)?;
            ws.maximize(win).map_err(wrap)
        } else {
            self.engine.reposition(win, &geometry, &next_rect)?;
            Ok(())
        }
    }
}

/// Collapse an adapter error into a [`DispatchError`].
fn wrap<E: std::error::Error>(e: E) -> DispatchError {
    DispatchError::WindowSystem(e.to_string())
}

//  Tests
