use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};
use sparqline::binding::{ResultRow, SparqlResults, ValueDescriptor};
use sparqline::error::{Result, SparqlineError};
use sparqline::mapping::TimelineEntry;
use sparqline::view::{
    merge_options, ClickHandler, ClickProps, Display, ItemId, Renderer, TimelineMount, TimelineOptions, VisRenderer,
    Widget, FALLBACK_TEXT,
};

/// Records widget lifecycle events in order.
#[derive(Clone, Default)]
struct Journal(Rc<RefCell<Vec<String>>>);
impl Journal {
    fn push(&self, line: String) {
        self.0.borrow_mut().push(line);
    }
    fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

struct FakeWidget {
    serial: usize,
    journal: Journal,
    handler: Option<ClickHandler<&'static str>>,
}
impl FakeWidget {
    fn click(&mut self, item: Option<ItemId>, event: &'static str) {
        if let Some(handler) = self.handler.as_mut() {
            handler(ClickProps { item, event });
        }
    }
}
impl Widget for FakeWidget {
    type Event = &'static str;
    fn on_click(&mut self, handler: ClickHandler<&'static str>) {
        self.handler = Some(handler);
    }
    fn destroy(self) {
        self.journal.push(format!("destroy {}", self.serial));
    }
}

#[derive(Default)]
struct FakeRenderer {
    journal: Journal,
    created: usize,
    fail: bool,
}
impl Renderer for FakeRenderer {
    type Widget = FakeWidget;
    fn create(&mut self, entries: &[TimelineEntry], options: &TimelineOptions) -> Result<FakeWidget> {
        if self.fail {
            return Err(SparqlineError::Render("canvas unavailable".into()));
        }
        self.created += 1;
        self.journal.push(format!("create {} items={} selectable={}", self.created, entries.len(), options["selectable"]));
        Ok(FakeWidget { serial: self.created, journal: self.journal.clone(), handler: None })
    }
}

fn films() -> Vec<ResultRow> {
    SparqlResults::from_json(include_str!("fixtures/films_compact.json")).unwrap().into_bindings()
}

fn options(value: Value) -> TimelineOptions {
    value.as_object().unwrap().clone()
}

#[test]
fn absent_or_empty_rows_show_fallback() {
    let mut mount = TimelineMount::new(FakeRenderer::default());
    assert_eq!(mount.update(None, None).unwrap(), Display::Fallback(FALLBACK_TEXT));
    assert_eq!(mount.update(Some(&[][..]), None).unwrap(), Display::Fallback(FALLBACK_TEXT));
    assert!(!mount.is_mounted());
    assert_eq!(FALLBACK_TEXT, "No valid timeline data found.");
}

#[test]
fn dateless_rows_show_fallback() {
    let rows = SparqlResults::from_json(include_str!("fixtures/mountains.json")).unwrap().into_bindings();
    let mut mount = TimelineMount::new(FakeRenderer::default());
    assert_eq!(mount.update(Some(rows.as_slice()), None).unwrap(), Display::Fallback(FALLBACK_TEXT));
    assert_eq!(mount.renderer().created, 0);
}

#[test]
fn unparseable_dates_leave_a_blank_container() {
    let rows = vec![ResultRow::new().with(
        "released",
        ValueDescriptor::typed_literal("unknown", "http://www.w3.org/2001/XMLSchema#date"),
    )];
    let mut mount = TimelineMount::new(FakeRenderer::default());
    assert_eq!(mount.update(Some(rows.as_slice()), None).unwrap(), Display::Blank);
    assert!(!mount.is_mounted());
}

#[test]
fn options_merge_over_defaults() {
    assert_eq!(merge_options(None), options(json!({"selectable": true})));
    let merged = merge_options(Some(&options(json!({"selectable": false, "orientation": "top"}))));
    assert_eq!(merged, options(json!({"selectable": false, "orientation": "top"})));

    let mut mount = TimelineMount::new(FakeRenderer::default());
    match mount.update(Some(films().as_slice()), Some(&options(json!({"stack": false})))).unwrap() {
        Display::Timeline { entries, options: merged } => {
            assert_eq!(entries.len(), 2);
            assert_eq!(merged["selectable"], true);
            assert_eq!(merged["stack"], false);
        }
        other => panic!("expected timeline, got {other:?}"),
    }
}

#[test]
fn widget_is_replaced_destroy_first_and_released_on_drop() {
    let renderer = FakeRenderer::default();
    let journal = renderer.journal.clone();
    {
        let mut mount = TimelineMount::new(renderer);
        mount.update(Some(films().as_slice()), None).unwrap();
        mount.update(Some(films().as_slice()), Some(&options(json!({"selectable": false})))).unwrap();
        assert!(mount.is_mounted());
    }
    assert_eq!(
        journal.lines(),
        vec![
            "create 1 items=2 selectable=true",
            "destroy 1",
            "create 2 items=2 selectable=false",
            "destroy 2",
        ]
    );
}

#[test]
fn fallback_update_releases_the_previous_widget() {
    let renderer = FakeRenderer::default();
    let journal = renderer.journal.clone();
    let mut mount = TimelineMount::new(renderer);
    mount.update(Some(films().as_slice()), None).unwrap();
    mount.update(None, None).unwrap();
    assert!(!mount.is_mounted());
    assert_eq!(journal.lines().last().map(String::as_str), Some("destroy 1"));
    mount.unmount();
    assert_eq!(journal.lines().len(), 2, "unmounting twice destroys nothing more");
}

#[test]
fn renderer_failure_leaves_nothing_mounted() {
    let mut mount = TimelineMount::new(FakeRenderer { fail: true, ..FakeRenderer::default() });
    let err = mount.update(Some(films().as_slice()), None).unwrap_err();
    assert!(format!("{err}").contains("canvas unavailable"));
    assert!(!mount.is_mounted());
}

#[test]
fn clicks_on_items_reach_the_callback() {
    let clicks: Rc<RefCell<Vec<(ItemId, &'static str)>>> = Rc::default();
    let seen = Rc::clone(&clicks);
    let mut mount = TimelineMount::new(FakeRenderer::default())
        .on_node_click(move |id, event| seen.borrow_mut().push((id, event)));
    mount.update(Some(films().as_slice()), None).unwrap();

    let widget = mount.widget_mut().unwrap();
    widget.click(Some(ItemId::from(1)), "click");
    widget.click(None, "background");
    widget.click(Some(ItemId::Text("2".into())), "tap");

    assert_eq!(
        *clicks.borrow(),
        vec![(ItemId::Number(1), "click"), (ItemId::Text("2".into()), "tap")]
    );
}

#[test]
fn no_callback_means_no_handler() {
    let mut mount = TimelineMount::new(FakeRenderer::default());
    mount.update(Some(films().as_slice()), None).unwrap();
    assert!(mount.widget().unwrap().handler.is_none());
}

#[test]
fn vis_renderer_builds_items() {
    let events: Rc<RefCell<Vec<ItemId>>> = Rc::default();
    let seen = Rc::clone(&events);
    let mut mount = TimelineMount::new(VisRenderer).on_node_click(move |id, _event| seen.borrow_mut().push(id));
    mount.update(Some(films().as_slice()), None).unwrap();

    let widget = mount.widget_mut().unwrap();
    let payload = serde_json::to_value(widget.payload()).unwrap();
    assert_eq!(
        payload,
        json!({
            "items": [
                {"id": 1, "content": "My Best Friend's Birthday", "start": "1987-01-01T00:00:00Z"},
                {"id": 2, "content": "Reservoir Dogs", "start": "1992-09-10T00:00:00Z"}
            ],
            "options": {"selectable": true}
        })
    );
    assert!(widget.dispatch(ClickProps { item: Some(ItemId::Number(2)), event: json!({"x": 10}) }));
    assert_eq!(*events.borrow(), vec![ItemId::Number(2)]);
}

#[test]
fn item_ids_accept_numbers_and_strings() {
    let ids: Vec<ItemId> = serde_json::from_value(json!([1, "2"])).unwrap();
    assert_eq!(ids, vec![ItemId::Number(1), ItemId::Text("2".into())]);
}
