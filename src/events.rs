//! Event definitions for the application event loop.
//!
//! Terminal input, copy outcomes and tooltip timers all arrive on the same
//! channel and are applied one at a time.

use crossterm::event::{KeyEvent, MouseEvent};

use crate::clipboard::ClipboardError;
use crate::widget::TriggerId;

/// Represents an event in the application's main event loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// A clipboard write started from `trigger` has completed.
    CopyFinished {
        trigger: TriggerId,
        outcome: Result<(), ClipboardError>,
    },
    /// The auto-hide delay for `trigger`'s tooltip has elapsed.
    HideTooltip { trigger: TriggerId },
    /// A keyboard event received from the user.
    Key(KeyEvent),
    /// A mouse event received from the user.
    Mouse(MouseEvent),
    /// The terminal window was resized.
    Resize,
    /// Ctrl-C or SIGTERM.
    Shutdown,
}
