//! Prop normalization port.

use crate::value::{Props, Value};

/// Turns raw descriptor props into the shape the node factory expects.
/// Called once per intrinsic node.
pub trait PropNormalizer: 'static {
    fn normalize(&self, props: &Props) -> Props;
}

impl<F> PropNormalizer for F
where
    F: Fn(&Props) -> Props + 'static,
{
    fn normalize(&self, props: &Props) -> Props {
        self(props)
    }
}

/// Leaves props untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityNormalizer;

impl PropNormalizer for IdentityNormalizer {
    fn normalize(&self, props: &Props) -> Props {
        props.clone()
    }
}

/// Small set of DOM-flavoured rewrites:
/// - `Null` and `false` props are dropped,
/// - `class` becomes `className`, `for` becomes `htmlFor`,
/// - a list class joins its truthy entries with spaces,
/// - a map class keeps the names whose value is truthy.
///
/// A class that collapses to an empty string is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNormalizer;

impl PropNormalizer for DefaultNormalizer {
    fn normalize(&self, props: &Props) -> Props {
        let mut out = Props::with_capacity(props.len());
        for (name, value) in props {
            if matches!(value, Value::Null | Value::Bool(false)) {
                continue;
            }
            match name.as_str() {
                "class" | "className" => match class_value(value) {
                    Value::Str(joined) if joined.is_empty() => {}
                    joined => {
                        out.insert("className".to_string(), joined);
                    }
                },
                "for" => {
                    out.insert("htmlFor".to_string(), value.clone());
                }
                _ => {
                    out.insert(name.clone(), value.clone());
                }
            }
        }
        out
    }
}

fn class_value(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::Str(
            items
                .iter()
                .filter(|item| item.is_truthy())
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::Map(flags) => Value::Str(
            flags
                .iter()
                .filter(|(_, on)| on.is_truthy())
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        other => other.clone(),
    }
}
