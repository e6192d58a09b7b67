mod common;

use std::cell::RefCell;
use std::rc::Rc;

use bus::{LookupCommand, LookupEvent};
use core_types::ElementId;
use lookup::config::{ATTR_KEY, ATTR_MULTI, ATTR_SINGLE, ATTR_STRICT};
use lookup::{ElementAttrs, Key, LookupElement, MenuAction, RowKind, WidgetEvent};

use common::{Harness, container_of, search_query};

fn single(key: &str) -> ElementAttrs {
    ElementAttrs::new().flag(ATTR_SINGLE).with(ATTR_KEY, Some(key))
}

fn multi(key: &str) -> ElementAttrs {
    ElementAttrs::new().flag(ATTR_MULTI).with(ATTR_KEY, Some(key))
}

#[test]
fn binding_twice_attaches_one_widget() {
    let mut h = Harness::new();
    let element = LookupElement::new(ElementId(1), ElementId(2), single("env"));

    assert!(h.page.bind(&element));
    assert!(!h.page.bind(&element));
    assert_eq!(h.page.registry().len(), 1);

    h.send(ElementId(1), WidgetEvent::Focus);
    assert_eq!(h.commands().len(), 1);

    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    h.page.on_value_changed(ElementId(1), move |_, change| {
        sink.borrow_mut().push(change.value.clone());
    });
    h.page.handle_event(
        LookupEvent::SearchDone {
            element: ElementId(1),
            request_id: 1,
            query: String::new(),
            result: Ok(vec!["Prod".into()]),
        },
        h.now,
    );
    h.send(ElementId(1), WidgetEvent::Activate(MenuAction::Select("Prod".into())));
    assert_eq!(*calls.borrow(), vec!["Prod".to_string()]);
}

#[test]
fn bind_all_skips_unmarked_elements() {
    let mut h = Harness::new();
    let elements = [
        LookupElement::new(ElementId(1), ElementId(11), single("env")),
        LookupElement::new(ElementId(2), ElementId(12), ElementAttrs::new().with(ATTR_KEY, Some("x"))),
        LookupElement::new(ElementId(3), ElementId(13), multi("tags")).with_value("seed"),
    ];
    assert_eq!(h.page.bind_all(&elements), 2);
    assert_eq!(h.page.bind_all(&elements), 0);
    assert!(!h.page.is_bound(ElementId(2)));
    assert_eq!(h.page.value(ElementId(3)), "seed");
}

#[test]
fn inputs_within_the_window_coalesce_into_one_search() {
    let mut h = Harness::new();
    let el = h.bind(1, single("env"));

    for (text, gap) in [("p", 0), ("pr", 40), ("pro", 60), ("prod", 49)] {
        h.advance(gap);
        h.type_text(el, text);
    }
    h.advance(149);
    assert!(h.commands().is_empty());

    h.advance(1);
    let cmds = h.commands();
    assert_eq!(cmds.len(), 1);
    assert_eq!(search_query(&cmds[0]), "prod");
}

#[test]
fn stale_search_response_never_renders() {
    let mut h = Harness::new();
    let el = h.bind(1, single("env"));

    h.type_text(el, "ab");
    h.advance(150);
    let slow = h.commands().remove(0);
    h.type_text(el, "abc");
    h.advance(150);
    let fast = h.commands().remove(0);

    h.answer(&fast, &["abcd"]);
    h.answer(&slow, &["abacus", "abbey"]);

    let menu = h.page.menu(el).expect("menu visible");
    assert_eq!(menu.query, "abc");
    let kinds: Vec<RowKind> = menu.rows.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, [RowKind::Item, RowKind::NotFound]);
    assert_eq!(menu.rows[0].label, "abcd");
}

#[test]
fn chips_are_unique_ignoring_case() {
    let mut h = Harness::new();
    let el = h.bind(1, multi("tags"));

    h.type_text(el, "Foo");
    h.send(el, WidgetEvent::KeyDown(Key::Enter));
    h.type_text(el, "foo");
    h.send(el, WidgetEvent::KeyDown(Key::Enter));

    assert_eq!(h.hidden(el), "Foo");
    let selection = h.page.widget(el).and_then(|w| w.selection()).unwrap();
    assert_eq!(selection.values().collect::<Vec<_>>(), ["Foo"]);
}

#[test]
fn strict_focus_with_empty_input_offers_no_add_row() {
    let mut h = Harness::new();
    let el = h.bind(1, single("env").flag(ATTR_STRICT));

    h.send(el, WidgetEvent::Focus);
    let cmds = h.commands();
    assert_eq!(cmds.len(), 1);
    assert_eq!(search_query(&cmds[0]), "");

    h.answer(&cmds[0], &[]);
    let menu = h.page.menu(el).unwrap();
    assert_eq!(menu.rows.len(), 1);
    assert_eq!(menu.rows[0].kind, RowKind::NoMatches);
    assert!(menu.rows[0].actions.is_empty());
}

#[test]
fn chip_keys_suppress_the_default_action() {
    let mut h = Harness::new();
    let el = h.bind(1, multi("tags"));

    for (text, key) in [("a", Key::Enter), ("b", Key::Tab), ("c", Key::Comma)] {
        h.type_text(el, text);
        let outcome = h.send(el, WidgetEvent::KeyDown(key));
        assert!(outcome.prevent_default, "{key:?}");
        assert_eq!(h.page.value(el), "");
    }
    assert_eq!(h.hidden(el), "a,b,c");
    assert_eq!(h.page.hidden_fields(), vec![("tags", "a,b,c")]);
}

#[test]
fn document_clicks_close_menus_outside_their_container() {
    let mut h = Harness::new();
    let el = h.bind(1, single("env"));

    // No listener until the menu has been shown once.
    h.page.document_click(None, h.now);

    h.send(el, WidgetEvent::Focus);
    let cmd = h.commands().remove(0);
    h.answer(&cmd, &["Prod"]);

    h.page.document_click(Some(container_of(el)), h.now);
    assert!(h.page.menu(el).is_some());

    h.page.document_click(Some(ElementId(77)), h.now);
    assert!(h.page.menu(el).is_none());
}

#[test]
fn unbind_drops_widget_observers_and_completions() {
    let mut h = Harness::new();
    let el = h.bind(1, single("env"));
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    assert!(h.page.on_value_changed(el, move |_, _| *sink.borrow_mut() += 1));

    h.send(el, WidgetEvent::Focus);
    let cmd = h.commands().remove(0);
    assert!(h.page.unbind(el));
    assert!(!h.page.unbind(el));

    h.answer(&cmd, &["Prod"]);
    assert!(h.page.menu(el).is_none());
    assert!(!h.page.on_value_changed(el, |_, _| {}));
    assert_eq!(*calls.borrow(), 0);

    // Rebinding starts from scratch.
    assert!(h.page.bind(&LookupElement::new(el, container_of(el), single("env"))));
}

#[test]
fn toast_expires_through_pump() {
    let mut h = Harness::new();
    let el = h.bind(1, multi("tags"));

    h.send(el, WidgetEvent::Focus);
    let cmd = h.commands().remove(0);
    h.answer(&cmd, &["Alpha"]);
    h.send(el, WidgetEvent::Activate(MenuAction::Delete("Alpha".into())));
    assert_eq!(h.page.toast(el), Some("Removed from lookup: 'Alpha'"));
    assert!(h.page.next_deadline().is_some());

    h.advance(2000);
    assert_eq!(h.page.toast(el), None);
}

#[test]
fn commands_carry_widget_config() {
    let mut h = Harness::new();
    let el = h.bind(
        1,
        single(" team ").with(lookup::config::ATTR_LIMIT, Some("99")),
    );
    h.send(el, WidgetEvent::Focus);
    match &h.commands()[..] {
        [LookupCommand::Search { key, limit, .. }] => {
            assert_eq!(key.as_str(), "team");
            assert_eq!(*limit, 50);
        }
        other => panic!("unexpected {other:?}"),
    }
}
