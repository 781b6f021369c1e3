//! The layout table: positioning command names and what they resolve to.
//!
//! Each command name maps to a [`LayoutEntry`] — either an ordered list of
//! [`FracRect`]s to cycle through, or a [`NamedAction`] such as the maximize
//! toggle.  The table is validated when it is built and is read-only
//! afterwards; there is no mutation path at runtime.

use crate::geometry::FracRect;
use std::collections::BTreeMap;

const HALF: f64 = 1.0 / 2.0;
const THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;
const SIXTH: f64 = 1.0 / 6.0;

/// A command that maps to a behavior rather than a geometry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedAction {
    /// Maximize the window if it is not maximized, unmaximize it otherwise.
    ToggleMaximize,
    /// Move the window to the next monitor, keeping its monitor-relative
    /// position.
    CycleMonitors,
}

/// What a command name resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEntry {
    /// An ordered cycle of fractional layouts; repeated invocation advances
    /// through the list.
    Cycle(Vec<FracRect>),
    /// A named behavior.
    Action(NamedAction),
}

/// Error from building or overriding the layout table.
///
/// Any of these is fatal at startup: a table that could silently no-op on a
/// keypress is worse than one that refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("cycle list for command {0:?} is empty")]
    EmptyCycle(String),
    #[error("command {command:?} slot {slot}: fraction out of range [0, 1]")]
    FractionOutOfRange { command: String, slot: usize },
    #[error("cannot override named action {0:?} with a cycle list")]
    ActionOverride(String),
}

/// The static mapping from command name to [`LayoutEntry`].
///
/// Built once at startup from [`LayoutTable::builtin`] plus optional
/// per-command overrides from the config file, then never mutated.
#[derive(Debug, Clone)]
pub struct LayoutTable {
    entries: BTreeMap<String, LayoutEntry>,
}

impl LayoutTable {
    /// The built-in table.
    ///
    /// Directional commands cycle half → third → two-thirds of the monitor
    /// (the `top` and `bottom` cycles only have the full-width and
    /// center-third variants).
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();

        let mut cycle = |name: &str, fracs: Vec<FracRect>| {
            entries.insert(name.to_string(), LayoutEntry::Cycle(fracs));
        };

        cycle(
            "left",
            vec![
                FracRect::new(0.0, 0.0, HALF, 1.0),
                FracRect::new(0.0, 0.0, THIRD, 1.0),
                FracRect::new(0.0, 0.0, TWO_THIRDS, 1.0),
            ],
        );
        cycle(
            "middle",
            vec![
                FracRect::new(0.0, 0.0, 1.0, 1.0),
                FracRect::new(THIRD, 0.0, THIRD, 1.0),
                FracRect::new(SIXTH, 0.0, TWO_THIRDS, 1.0),
            ],
        );
        cycle(
            "right",
            vec![
                FracRect::new(HALF, 0.0, HALF, 1.0),
                FracRect::new(TWO_THIRDS, 0.0, THIRD, 1.0),
                FracRect::new(THIRD, 0.0, TWO_THIRDS, 1.0),
            ],
        );
        cycle(
            "top",
            vec![
                FracRect::new(0.0, 0.0, 1.0, HALF),
                FracRect::new(THIRD, 0.0, THIRD, HALF),
            ],
        );
        cycle(
            "bottom",
            vec![
                FracRect::new(0.0, HALF, 1.0, HALF),
                FracRect::new(THIRD, HALF, THIRD, HALF),
            ],
        );
        cycle(
            "top-left",
            vec![
                FracRect::new(0.0, 0.0, HALF, HALF),
                FracRect::new(0.0, 0.0, THIRD, HALF),
                FracRect::new(0.0, 0.0, TWO_THIRDS, HALF),
            ],
        );
        cycle(
            "top-right",
            vec![
                FracRect::new(HALF, 0.0, HALF, HALF),
                FracRect::new(TWO_THIRDS, 0.0, THIRD, HALF),
                FracRect::new(THIRD, 0.0, TWO_THIRDS, HALF),
            ],
        );
        cycle(
            "bottom-left",
            vec![
                FracRect::new(0.0, HALF, HALF, HALF),
                FracRect::new(0.0, HALF, THIRD, HALF),
                FracRect::new(0.0, HALF, TWO_THIRDS, HALF),
            ],
        );
        cycle(
            "bottom-right",
            vec![
                FracRect::new(HALF, HALF, HALF, HALF),
                FracRect::new(TWO_THIRDS, HALF, THIRD, HALF),
                FracRect::new(THIRD, HALF, TWO_THIRDS, HALF),
            ],
        );

        entries.insert(
            "maximize".to_string(),
            LayoutEntry::Action(NamedAction::ToggleMaximize),
        );
        entries.insert(
            "monitor-switch".to_string(),
            LayoutEntry::Action(NamedAction::CycleMonitors),
        );

        Self { entries }
    }

    /// Build the table from the built-in entries plus per-command cycle-list
    /// overrides (typically from the config file).
    ///
    /// Overrides may replace an existing cycle or add a brand-new command
    /// name, but may not shadow a named action.  Every override is validated
    /// before the table is returned.
    pub fn with_overrides(
        overrides: impl IntoIterator<Item = (String, Vec<FracRect>)>,
    ) -> Result<Self, LayoutError> {
        let mut table = Self::builtin();
        for (name, fracs) in overrides {
            if let Some(LayoutEntry::Action(_)) = table.entries.get(&name) {
                return Err(LayoutError::ActionOverride(name));
            }
            table.entries.insert(name, LayoutEntry::Cycle(fracs));
        }
        table.validate()?;
        Ok(table)
    }

    /// Check every cycle list: non-empty, all fractions in range.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (name, entry) in &self.entries {
            if let LayoutEntry::Cycle(fracs) = entry {
                if fracs.is_empty() {
                    return Err(LayoutError::EmptyCycle(name.clone()));
                }
                for (slot, frac) in fracs.iter().enumerate() {
                    if !frac.in_range() {
                        return Err(LayoutError::FractionOutOfRange {
                            command: name.clone(),
                            slot,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a command name.
    pub fn get(&self, command: &str) -> Option<&LayoutEntry> {
        self.entries.get(command)
    }

    /// All recognized command names, sorted.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self::builtin()
    }
}

//  Tests
