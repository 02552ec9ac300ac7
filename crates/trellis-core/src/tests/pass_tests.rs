use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type EventLog = Rc<RefCell<Vec<String>>>;

fn plain_pass() -> Pass {
    Pass::builder(Context::empty(), Dispatch::noop(), StateStore::new()).build()
}

/// Pass whose commit and render ports append to a shared log.
fn logging_pass(states: StateStore) -> (Pass, EventLog) {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let commit_log = Rc::clone(&log);
    let render_log = Rc::clone(&log);
    let pass = build_pass(
        Context::empty(),
        Dispatch::noop(),
        states,
        move |states: &StateStore, id: ComponentId, state: Value| {
            commit_log.borrow_mut().push(format!("commit {}", id.raw()));
            states.insert(id, state);
        },
        move || render_log.borrow_mut().push("rerender".to_string()),
    );
    (pass, log)
}

fn label() -> ComponentDef {
    ComponentDef::new("Label", |bundle| {
        Element::from(bundle.prop("text").map(Value::to_display_string))
    })
}

#[test]
fn strings_pass_through_unchanged() {
    let pass = plain_pass();
    for s in ["", "hello", "  spaced  ", "<b>not markup</b>"] {
        let built = pass.build(&Element::text(s)).unwrap();
        assert_eq!(built.as_ref().and_then(VTree::as_text), Some(s));
    }
}

#[test]
fn numbers_become_decimal_text() {
    let pass = plain_pass();
    let cases = [(42.0, "42"), (-3.5, "-3.5"), (0.0, "0"), (0.25, "0.25")];
    for (n, expected) in cases {
        let built = pass.build(&Element::Number(n)).unwrap();
        assert_eq!(built.as_ref().and_then(VTree::as_text), Some(expected));
    }
}

#[test]
fn empty_builds_to_nothing() {
    let pass = plain_pass();
    assert!(pass.build(&Element::Empty).unwrap().is_none());
    assert!(pass.build(&Element::from(None::<String>)).unwrap().is_none());
}

#[test]
fn lists_keep_length_order_and_holes() {
    let pass = plain_pass();
    let list = Element::List(vec![
        Element::text("a"),
        Element::Empty,
        Element::Number(7.0),
        Element::List(vec![]),
    ]);
    let built = pass.build(&list).unwrap().unwrap();
    let items = built.as_list().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].as_ref().and_then(VTree::as_text), Some("a"));
    assert!(items[1].is_none());
    assert_eq!(items[2].as_ref().and_then(VTree::as_text), Some("7"));
    assert_eq!(
        items[3].as_ref().and_then(VTree::as_list).map(<[_]>::len),
        Some(0)
    );
}

#[test]
fn intrinsic_nodes_normalize_once_and_build_children_first() {
    let normalized = Rc::new(Cell::new(0));
    let order: EventLog = Rc::new(RefCell::new(Vec::new()));

    let count = Rc::clone(&normalized);
    let normalizer = move |raw: &Props| {
        count.set(count.get() + 1);
        raw.clone()
    };

    struct Ordered(EventLog);
    impl NodeFactory for Ordered {
        fn make_node(&self, tag: &str, props: Props, children: Vec<Option<VTree>>) -> VTree {
            self.0.borrow_mut().push(tag.to_string());
            Hyperscript.make_node(tag, props, children)
        }
    }

    let pass = Pass::builder(Context::empty(), Dispatch::noop(), StateStore::new())
        .normalizer(normalizer)
        .node_factory(Ordered(Rc::clone(&order)))
        .build();

    let tree = h(
        "div",
        props([("id", "root")]),
        vec![h("span", Props::new(), vec!["c1".into()]), Element::text("c2")],
    );
    let built = pass.build(&tree).unwrap().unwrap();

    assert_eq!(normalized.get(), 2, "once for div, once for span");
    assert_eq!(*order.borrow(), vec!["span", "div"]);
    let div = built.as_node().unwrap();
    assert_eq!(div.children.len(), 2);
    assert_eq!(built.to_markup(), "<div id=\"root\"><span>c1</span>c2</div>");
}

#[test]
fn component_nodes_become_unrendered_widgets_with_raw_children() {
    let renders = Rc::new(Cell::new(0));
    let seen = Rc::clone(&renders);
    let card = ComponentDef::new("Card", move |bundle| {
        seen.set(seen.get() + 1);
        Element::List(bundle.children.to_vec())
    });
    let raw_children = vec![h("p", Props::new(), vec!["body".into()])];
    let pass = plain_pass();

    let built = pass
        .build(&Element::component(
            &card,
            props([("title", "Hi")]),
            raw_children.clone(),
        ))
        .unwrap()
        .unwrap();

    let widget = built.as_widget().expect("component builds to a widget");
    assert_eq!(renders.get(), 0, "render must not run during build");
    assert!(widget.component().ptr_eq(&card));
    assert_eq!(widget.props().get("title"), Some(&Value::from("Hi")));
    assert_eq!(widget.children(), raw_children.as_slice());
    assert!(widget.rendered().is_none());
    assert!(widget.pass().ptr_eq(&pass));
}

#[test]
fn children_of_components_are_not_normalized_during_build() {
    let normalized = Rc::new(Cell::new(0));
    let count = Rc::clone(&normalized);
    let pass = Pass::builder(Context::empty(), Dispatch::noop(), StateStore::new())
        .normalizer(move |raw: &Props| {
            count.set(count.get() + 1);
            raw.clone()
        })
        .build();
    let tree = Element::component(
        &label(),
        Props::new(),
        vec![h("b", props([("class", "x")]), vec![])],
    );
    pass.build(&tree).unwrap();
    assert_eq!(normalized.get(), 0);
}

#[test]
fn missing_render_is_an_error() {
    let ghost = ComponentDef::declared("Ghost");
    let err = plain_pass()
        .build(&Element::component(&ghost, Props::new(), vec![]))
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingRenderCapability {
            component: "Ghost".into()
        }
    );
    assert_eq!(err.to_string(), "no render() in component Ghost");
}

#[test]
fn missing_render_deep_in_the_tree_aborts_without_constructing_nodes() {
    let made = Rc::new(Cell::new(0));
    struct Counting(Rc<Cell<usize>>);
    impl NodeFactory for Counting {
        fn make_node(&self, tag: &str, props: Props, children: Vec<Option<VTree>>) -> VTree {
            self.0.set(self.0.get() + 1);
            Hyperscript.make_node(tag, props, children)
        }
    }
    let pass = Pass::builder(Context::empty(), Dispatch::noop(), StateStore::new())
        .node_factory(Counting(Rc::clone(&made)))
        .build();
    let tree = h(
        "section",
        Props::new(),
        vec![Element::component(
            &ComponentDef::declared("Ghost"),
            Props::new(),
            vec![],
        )],
    );
    assert!(pass.build(&tree).is_err());
    assert_eq!(made.get(), 0);
}

#[test]
fn set_state_commits_before_requesting_a_render() {
    let (pass, log) = logging_pass(StateStore::new());
    let id = ComponentId::new(5);
    pass.set_state(id, Value::from("a"));
    pass.set_state(id, Value::from("b"));
    assert_eq!(
        *log.borrow(),
        vec!["commit 5", "rerender", "commit 5", "rerender"]
    );
}

#[test]
fn each_render_request_observes_its_own_commit() {
    let states = StateStore::new();
    let id = ComponentId::new(5);
    let observed = Rc::new(RefCell::new(Vec::new()));
    let peek = Rc::clone(&observed);
    let store = states.clone();
    let pass = Pass::builder(Context::empty(), Dispatch::noop(), states)
        .scheduler(move || peek.borrow_mut().push(store.get(id)))
        .build();

    pass.set_state(id, Value::from(1));
    pass.set_state(id, Value::from(2));
    assert_eq!(
        *observed.borrow(),
        vec![Some(Value::from(1)), Some(Value::from(2))]
    );
}

#[test]
fn commit_state_never_requests_a_render() {
    let states = StateStore::new();
    let (pass, log) = logging_pass(states.clone());
    pass.commit_state(ComponentId::new(1), Value::from(true));
    pass.commit_state(ComponentId::new(1), Value::from(true));
    assert_eq!(*log.borrow(), vec!["commit 1", "commit 1"]);
    assert_eq!(states.get(ComponentId::new(1)), Some(Value::Bool(true)));
}

#[test]
fn set_state_default_stores_an_empty_map() {
    let states = StateStore::new();
    let (pass, log) = logging_pass(states.clone());
    pass.set_state_default(ComponentId::new(8));
    assert_eq!(states.get(ComponentId::new(8)), Some(Value::empty_map()));
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn states_is_the_store_the_pass_was_built_with() {
    let states = StateStore::new();
    let pass = Pass::builder(Context::empty(), Dispatch::noop(), states.clone()).build();
    assert!(pass.states().ptr_eq(&states));
    pass.commit_state(ComponentId::new(3), Value::from("x"));
    assert_eq!(states.get(ComponentId::new(3)), Some(Value::from("x")));
}

#[test]
fn component_ids_follow_position_and_keys() {
    let pass = plain_pass();
    let label = label();
    let row = |key: Option<&str>| {
        let el = Element::component(&label, Props::new(), vec![]);
        match key {
            Some(key) => el.with_key(key),
            None => el,
        }
    };

    let ids = |tree: &Element| -> Vec<ComponentId> {
        let built = pass.build(tree).unwrap().unwrap();
        built
            .as_list()
            .unwrap()
            .iter()
            .flatten()
            .filter_map(|item| item.as_widget().map(Widget::id))
            .collect()
    };

    let first = ids(&Element::List(vec![row(None), row(None)]));
    let again = ids(&Element::List(vec![row(None), row(None)]));
    assert_eq!(first, again);
    assert_ne!(first[0], first[1]);

    let keyed = ids(&Element::List(vec![row(Some("a")), row(Some("b"))]));
    let swapped = ids(&Element::List(vec![row(Some("b")), row(Some("a"))]));
    assert_eq!(keyed[0], swapped[1]);
    assert_eq!(keyed[1], swapped[0]);
}

#[test]
fn explicit_ids_bypass_the_identity_policy() {
    let built = plain_pass()
        .build(&Element::component(&label(), Props::new(), vec![]).with_id(ComponentId::new(77)))
        .unwrap()
        .unwrap();
    assert_eq!(built.as_widget().map(Widget::id), Some(ComponentId::new(77)));
}

#[test]
fn widgets_carry_the_pass_context_and_dispatch() {
    let ctx = Context::new("app");
    let dispatch = Dispatch::noop();
    let pass = Pass::builder(ctx.clone(), dispatch.clone(), StateStore::new()).build();
    let built = pass
        .build(&Element::component(&label(), Props::new(), vec![]))
        .unwrap()
        .unwrap();
    let widget = built.as_widget().unwrap();
    assert!(widget.context().ptr_eq(&ctx));
    assert!(widget.dispatch().ptr_eq(&dispatch));
}
