use trellis_core::{
    h, props, BuildError, Callback, ComponentDef, Context, Dispatch, Element, Props, Session,
    SessionOptions, VTree, Value,
};

struct Theme {
    title: &'static str,
}

fn counter() -> ComponentDef {
    ComponentDef::builder("Counter")
        .initial_state(|props| {
            Value::map([(
                "count",
                props.get("start").cloned().unwrap_or(Value::from(0)),
            )])
        })
        .render(|bundle| {
            let count = bundle
                .state
                .get("count")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let step = |delta: f64| {
                let updater = bundle.updater();
                let dispatch = bundle.dispatch.clone();
                Callback::new(move |_| {
                    updater.update(|state| state.with("count", count + delta));
                    dispatch.send(if delta > 0.0 { "increment" } else { "decrement" });
                })
            };
            let title = bundle
                .context
                .get::<Theme>()
                .map(|theme| theme.title)
                .unwrap_or("Counter");
            h(
                "div",
                props([("class", "counter")]),
                vec![
                    h("h1", Props::new(), vec![title.into()]),
                    h(
                        "button",
                        props([("id", Value::from("dec")), ("onclick", step(-1.0).into())]),
                        vec!["-".into()],
                    ),
                    h("span", Props::new(), vec![count.into()]),
                    h(
                        "button",
                        props([("id", Value::from("inc")), ("onclick", step(1.0).into())]),
                        vec!["+".into()],
                    ),
                ],
            )
        })
        .on_create(|bundle| log::info!("counter {} mounted", bundle.id))
        .build()
}

/// Finds the click handler of the element with the given `id` prop.
fn handler(tree: &VTree, id: &str) -> Option<Callback> {
    match tree {
        VTree::Text(_) => None,
        VTree::List(items) => items.iter().flatten().find_map(|t| handler(t, id)),
        VTree::Node(node) => {
            if node.props.get("id").and_then(Value::as_str) == Some(id) {
                return node.props.get("onclick").and_then(Value::as_callback).cloned();
            }
            node.children.iter().flatten().find_map(|t| handler(t, id))
        }
        VTree::Widget(widget) => widget.rendered().and_then(|t| handler(t, id)),
    }
}

fn click(session: &Session, id: &str) {
    match session.tree().and_then(|tree| handler(tree, id)) {
        Some(callback) => callback.call(Value::Null),
        None => log::warn!("nothing to click at #{id}"),
    }
}

fn main() -> Result<(), BuildError> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let counter = counter();
    let mut session = Session::new(
        Context::new(Theme {
            title: "Trellis Counter",
        }),
        Dispatch::new(|action| log::info!("action: {}", action.to_display_string())),
        move || Element::component(&counter, props([("start", 10)]), vec![]),
        SessionOptions::default(),
    );

    session.render()?;
    println!("initial:  {}", session.markup());

    for target in ["inc", "inc", "inc", "dec"] {
        click(&session, target);
        let renders = session.flush()?;
        println!(
            "{target}:      {} ({} render{})",
            session.markup(),
            renders,
            if renders == 1 { "" } else { "s" }
        );
    }

    let stats = session.last_stats();
    println!(
        "last render: {} reused, {} rerendered, {} slots in store",
        stats.reused,
        stats.rerendered,
        session.states().len()
    );
    Ok(())
}
