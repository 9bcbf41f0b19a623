//! Click-triggered tooltips anchored to a trigger element.

use ratatui::layout::Rect;
use serde::Deserialize;

/// Where the bubble is drawn relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Bottom,
    Top,
}

/// Visibility of a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Shown(String),
}

/// Tooltip attached to a single trigger. Only shown on demand, never on hover.
#[derive(Debug, Clone, Default)]
pub struct Tooltip {
    pub placement: Placement,
    state: TooltipState,
    title: String,
    /// Bumped every time the bubble is (re)shown.
    shows: u64,
}

impl Tooltip {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            ..Self::default()
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.state {
            TooltipState::Shown(message) => Some(message),
            TooltipState::Hidden => None,
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, TooltipState::Shown(_))
    }

    pub fn shows(&self) -> u64 {
        self.shows
    }

    pub fn show(&mut self) {
        self.shows += 1;
        self.state = TooltipState::Shown(self.title.clone());
    }

    pub fn hide(&mut self) {
        self.state = TooltipState::Hidden;
    }

    /// Replace the message and redisplay: hide, retitle, show.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.hide();
        self.title = message.into();
        self.show();
    }
}

/// Screen area of the bubble for `message` anchored to `anchor`, kept inside `frame`.
///
/// The bubble is bordered with one cell of horizontal padding on each side.
pub fn bubble_area(anchor: Rect, frame: Rect, placement: Placement, message: &str) -> Rect {
    let text_width = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
    let width = text_width.saturating_add(4).min(frame.width);
    let height = 3.min(frame.height);

    let center = anchor.x + anchor.width / 2;
    let max_x = (frame.x + frame.width).saturating_sub(width);
    let x = center.saturating_sub(width / 2).clamp(frame.x, max_x.max(frame.x));

    let below = anchor.y + anchor.height;
    let above = anchor.y.saturating_sub(height);
    let fits_below = below + height <= frame.y + frame.height;
    let fits_above = anchor.y >= frame.y + height;
    let y = match placement {
        Placement::Bottom if fits_below || !fits_above => below,
        Placement::Bottom => above,
        Placement::Top if fits_above || !fits_below => above,
        Placement::Top => below,
    };
    let max_y = (frame.y + frame.height).saturating_sub(height);
    let y = y.clamp(frame.y, max_y.max(frame.y));

    Rect::new(x, y, width, height)
}
