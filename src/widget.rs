//! The copy-link widget.
//!
//! Binds one or more trigger elements to a clipboard write of the current
//! location and reports the outcome with a short-lived tooltip. The widget
//! never blocks the event loop: writes run one at a time on a background
//! worker and come back as `Event::CopyFinished`, the auto-hide as
//! `Event::HideTooltip`.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clipboard::{self, ClipboardError, ClipboardWriter};
use crate::events::Event;
use crate::tooltip::{Placement, Tooltip};

/// Identity of a trigger element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub &'static str);

impl TriggerId {
    pub const HEADER: TriggerId = TriggerId("copy-btn-header");
    pub const FOOTER: TriggerId = TriggerId("copy-btn-footer");
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// How the tooltips behave.
#[derive(Debug, Clone)]
pub struct TooltipOptions {
    pub placement: Placement,
    pub hide_delay: Duration,
    pub success_message: String,
    pub failure_message: String,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            placement: Placement::Bottom,
            hide_delay: Duration::from_millis(1000),
            success_message: "Copied!".to_string(),
            failure_message: "Failed!".to_string(),
        }
    }
}

/// A clickable control with its tooltip.
#[derive(Debug, Clone)]
pub struct TriggerElement {
    pub id: TriggerId,
    /// Last drawn position; `None` until the first frame.
    pub area: Option<Rect>,
    pub tooltip: Tooltip,
}

type TextSource = Arc<dyn Fn() -> String + Send + Sync>;

/// A pending clipboard write.
struct CopyJob {
    trigger: TriggerId,
    text: String,
    events: mpsc::Sender<Event>,
}

pub struct CopyLinkWidget {
    options: TooltipOptions,
    triggers: Vec<TriggerElement>,
    clipboard: Arc<dyn ClipboardWriter>,
    text: TextSource,
    /// Started on the first copy so the widget can be built outside a runtime.
    queue: OnceLock<mpsc::UnboundedSender<CopyJob>>,
}

impl fmt::Debug for CopyLinkWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyLinkWidget")
            .field("options", &self.options)
            .field("triggers", &self.triggers)
            .finish_non_exhaustive()
    }
}

impl CopyLinkWidget {
    /// Attach click-triggered tooltips to `triggers` and bind them to copy
    /// whatever `text` returns at the moment of the click.
    ///
    /// Call once, after the UI is up.
    pub fn initialize<F>(
        options: TooltipOptions,
        triggers: &[TriggerId],
        clipboard: Arc<dyn ClipboardWriter>,
        text: F,
    ) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let triggers = triggers
            .iter()
            .map(|&id| TriggerElement {
                id,
                area: None,
                tooltip: Tooltip::new(options.placement),
            })
            .collect::<Vec<_>>();
        let hide_delay_ms = options.hide_delay.as_millis();
        info!(
            triggers = triggers.len(),
            placement = ?options.placement,
            hide_delay_ms,
            "copy link widget initialized"
        );
        Self {
            options,
            triggers,
            clipboard,
            text: Arc::new(text),
            queue: OnceLock::new(),
        }
    }

    pub fn triggers(&self) -> &[TriggerElement] {
        &self.triggers
    }

    pub fn tooltip(&self, trigger: TriggerId) -> Option<&Tooltip> {
        self.element(trigger).map(|element| &element.tooltip)
    }

    /// Record where `trigger` was drawn so clicks can be hit-tested.
    pub fn set_area(&mut self, trigger: TriggerId, area: Rect) {
        if let Some(element) = self.element_mut(trigger) {
            element.area = Some(area);
        }
    }

    /// The trigger drawn at the given cell, if any.
    pub fn trigger_at(&self, column: u16, row: u16) -> Option<TriggerId> {
        self.triggers.iter().find_map(|element| {
            let area = element.area?;
            let inside = column >= area.x
                && column < area.x + area.width
                && row >= area.y
                && row < area.y + area.height;
            inside.then_some(element.id)
        })
    }

    /// Handle a click on `trigger`: copy the current text in the background.
    ///
    /// Exactly one `Event::CopyFinished` follows, and outcomes arrive in click
    /// order. Returns `false` for an unknown trigger, in which case nothing is sent.
    pub fn copy(&self, trigger: TriggerId, events: &mpsc::Sender<Event>) -> bool {
        if self.element(trigger).is_none() {
            return false;
        }
        let text = (self.text)();
        debug!(%trigger, url = %text, "copying");
        let queue = self
            .queue
            .get_or_init(|| spawn_copy_worker(Arc::clone(&self.clipboard)));
        let job = CopyJob {
            trigger,
            text,
            events: events.clone(),
        };
        if queue.send(job).is_err() {
            warn!(%trigger, "copy worker stopped");
            return false;
        }
        true
    }

    /// Apply the result of a copy started with [`copy`](Self::copy).
    pub fn finish_copy(
        &mut self,
        trigger: TriggerId,
        outcome: Result<(), ClipboardError>,
        events: &mpsc::Sender<Event>,
    ) {
        match outcome {
            Ok(()) => self.on_copy_success(trigger, events),
            Err(err) => {
                warn!(%trigger, error = %err, "copy failed");
                self.on_copy_error(trigger, events);
            }
        }
    }

    pub fn on_copy_success(&mut self, trigger: TriggerId, events: &mpsc::Sender<Event>) {
        let message = self.options.success_message.clone();
        self.show_message(trigger, message, events);
    }

    pub fn on_copy_error(&mut self, trigger: TriggerId, events: &mpsc::Sender<Event>) {
        let message = self.options.failure_message.clone();
        self.show_message(trigger, message, events);
    }

    /// Hide `trigger`'s tooltip once the delay has passed.
    ///
    /// Earlier timers are not cancelled, so a timer from a previous click can
    /// hide a newer message early.
    pub fn schedule_auto_hide(&self, trigger: TriggerId, events: &mpsc::Sender<Event>) {
        let delay = self.options.hide_delay;
        let tx = events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::HideTooltip { trigger }).await;
        });
    }

    pub fn hide(&mut self, trigger: TriggerId) {
        if let Some(element) = self.element_mut(trigger) {
            element.tooltip.hide();
            debug!(%trigger, "tooltip hidden");
        }
    }

    fn show_message(&mut self, trigger: TriggerId, message: String, events: &mpsc::Sender<Event>) {
        let Some(element) = self.element_mut(trigger) else {
            return;
        };
        element.tooltip.set_message(message);
        debug!(%trigger, shows = element.tooltip.shows(), "tooltip shown");
        self.schedule_auto_hide(trigger, events);
    }

    fn element(&self, trigger: TriggerId) -> Option<&TriggerElement> {
        self.triggers.iter().find(|element| element.id == trigger)
    }

    fn element_mut(&mut self, trigger: TriggerId) -> Option<&mut TriggerElement> {
        self.triggers.iter_mut().find(|element| element.id == trigger)
    }
}

/// Run queued writes one after another so a slow write can never land after
/// a later one.
fn spawn_copy_worker(writer: Arc<dyn ClipboardWriter>) -> mpsc::UnboundedSender<CopyJob> {
    let (tx, mut rx) = mpsc::unbounded_channel::<CopyJob>();
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let outcome = clipboard::write_in_background(Arc::clone(&writer), job.text).await;
            let _ = job
                .events
                .send(Event::CopyFinished {
                    trigger: job.trigger,
                    outcome,
                })
                .await;
        }
    });
    tx
}
