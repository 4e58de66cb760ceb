//! The presentation shell around the mapper.
//!
//! Rendering itself belongs to an external timeline widget (vis-timeline in
//! the browser). This module decides what to show for a batch of rows, merges
//! the widget options, bridges item clicks back to the caller and owns the
//! widget instance: a [`TimelineMount`] holds at most one live widget, destroys
//! it before creating a replacement, and destroys it when dropped.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::binding::ResultRow;
use crate::classify::can_form_timeline;
use crate::error::Result;
use crate::mapping::{TimelineEntry, map_rows_to_entries};

/// Shown instead of a timeline when the batch has nothing to place.
pub const FALLBACK_TEXT: &str = "No valid timeline data found.";

/// Widget configuration, passed through to the renderer as-is.
pub type TimelineOptions = Map<String, Value>;

pub fn default_options() -> TimelineOptions {
    let mut options = Map::new();
    options.insert("selectable".into(), Value::Bool(true));
    options
}

/// Overlays `overrides` on the defaults. The merge is shallow and the override wins.
pub fn merge_options(overrides: Option<&TimelineOptions>) -> TimelineOptions {
    let mut merged = default_options();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Identifier of a clicked item. Widgets report numbers for our entries but
/// may hand back strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}
impl From<u64> for ItemId {
    fn from(id: u64) -> Self { ItemId::Number(id) }
}

/// What a widget reports for a click: the hit item, if any, and the raw event.
#[derive(Debug, Clone)]
pub struct ClickProps<E> {
    pub item: Option<ItemId>,
    pub event: E,
}

pub type ClickHandler<E> = Box<dyn FnMut(ClickProps<E>)>;
pub type NodeClick<E> = Rc<dyn Fn(ItemId, E)>;

/// A live widget instance created by a [`Renderer`].
pub trait Widget {
    type Event: 'static;
    fn on_click(&mut self, handler: ClickHandler<Self::Event>);
    fn destroy(self);
}

pub trait Renderer {
    type Widget: Widget;
    fn create(&mut self, entries: &[TimelineEntry], options: &TimelineOptions) -> Result<Self::Widget>;
}

/// Forwards clicks that hit an item to `callback`; clicks on empty space are dropped.
pub fn click_bridge<E: 'static>(callback: NodeClick<E>) -> ClickHandler<E> {
    Box::new(move |props: ClickProps<E>| {
        if let Some(item) = props.item {
            callback(item, props.event);
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    /// Nothing date-bearing in the batch; show [`FALLBACK_TEXT`].
    Fallback(&'static str),
    /// Date literals were present but none resolved, so the container stays empty.
    Blank,
    Timeline { entries: Vec<TimelineEntry>, options: TimelineOptions },
}

type EventOf<R> = <<R as Renderer>::Widget as Widget>::Event;

pub struct TimelineMount<R: Renderer> {
    renderer: R,
    widget: Option<R::Widget>,
    on_node_click: Option<NodeClick<EventOf<R>>>,
}

impl<R: Renderer> TimelineMount<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer, widget: None, on_node_click: None }
    }

    /// Registers the callback receiving `(item id, event)` for clicked items.
    /// Applies to widgets created from the next [`TimelineMount::update`] on.
    pub fn on_node_click(mut self, callback: impl Fn(ItemId, EventOf<R>) + 'static) -> Self {
        self.on_node_click = Some(Rc::new(callback));
        self
    }

    /// Replaces the current widget with one for `rows`. The previous widget is
    /// destroyed first, whatever the outcome.
    pub fn update(&mut self, rows: Option<&[ResultRow]>, options: Option<&TimelineOptions>) -> Result<Display> {
        self.unmount();
        let rows = rows.unwrap_or(&[]);
        if rows.is_empty() || !can_form_timeline(rows) {
            return Ok(Display::Fallback(FALLBACK_TEXT));
        }
        let entries = map_rows_to_entries(rows);
        if entries.is_empty() {
            return Ok(Display::Blank);
        }
        let options = merge_options(options);
        let mut widget = self.renderer.create(&entries, &options)?;
        if let Some(callback) = &self.on_node_click {
            widget.on_click(click_bridge(Rc::clone(callback)));
        }
        debug!(entries = entries.len(), "widget created");
        self.widget = Some(widget);
        Ok(Display::Timeline { entries, options })
    }

    pub fn widget(&self) -> Option<&R::Widget> {
        self.widget.as_ref()
    }
    pub fn widget_mut(&mut self) -> Option<&mut R::Widget> {
        self.widget.as_mut()
    }
    pub fn is_mounted(&self) -> bool {
        self.widget.is_some()
    }
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn unmount(&mut self) {
        if let Some(widget) = self.widget.take() {
            widget.destroy();
            debug!("widget destroyed");
        }
    }
}

impl<R: Renderer> Drop for TimelineMount<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// ------------- vis-timeline -------------

/// An item in the shape vis-timeline's `DataSet` expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisItem {
    pub id: u64,
    pub content: String,
    pub start: DateTime<Utc>,
}
impl From<&TimelineEntry> for VisItem {
    fn from(entry: &TimelineEntry) -> Self {
        VisItem { id: entry.id, content: entry.label.clone(), start: entry.instant }
    }
}

/// Items plus merged options, ready to hand to a browser-side vis-timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisPayload {
    pub items: Vec<VisItem>,
    pub options: TimelineOptions,
}

/// Builds [`VisTimeline`] payloads in-process.
#[derive(Debug, Default)]
pub struct VisRenderer;

impl Renderer for VisRenderer {
    type Widget = VisTimeline;
    fn create(&mut self, entries: &[TimelineEntry], options: &TimelineOptions) -> Result<VisTimeline> {
        Ok(VisTimeline {
            payload: VisPayload { items: entries.iter().map(VisItem::from).collect(), options: options.clone() },
            handler: None,
        })
    }
}

/// The widget side of [`VisRenderer`]. Click events arrive as raw JSON
/// from whatever forwards browser events, and are fed in through [`VisTimeline::dispatch`].
pub struct VisTimeline {
    payload: VisPayload,
    handler: Option<ClickHandler<Value>>,
}

impl VisTimeline {
    pub fn payload(&self) -> &VisPayload {
        &self.payload
    }
    /// Feeds a click into the registered handler. Returns false when none is registered.
    pub fn dispatch(&mut self, props: ClickProps<Value>) -> bool {
        match self.handler.as_mut() {
            Some(handler) => {
                handler(props);
                true
            }
            None => false,
        }
    }
}

impl Widget for VisTimeline {
    type Event = Value;
    fn on_click(&mut self, handler: ClickHandler<Value>) {
        self.handler = Some(handler);
    }
    /// The payload is plain data held in-process; dropping it releases everything.
    fn destroy(self) {}
}
