use crate::model::Vec2;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

/// Build tooltip content from a node's `data-name` and `data-attrs`.
/// Attribute text that is not a JSON object yields no rows.
pub fn content(name: Option<&str>, attrs: Option<&str>) -> TooltipContent {
    let rows = attrs
        .and_then(|a| serde_json::from_str::<Value>(a).ok())
        .and_then(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .map(|map| {
            map.into_iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s,
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k, text)
                })
                .collect()
        })
        .unwrap_or_default();
    TooltipContent { title: name.unwrap_or_default().to_string(), rows }
}

/// Top-left corner for a tooltip of `size` next to the pointer.
///
/// The box sits `pad` below-right of the pointer and flips to the other side
/// of the pointer on any axis where it would come within `margin` of the
/// window edge.
pub fn place(pointer: Vec2, size: Vec2, window: Vec2, pad: f32, margin: f32) -> Vec2 {
    let mut x = pointer.x + pad;
    let mut y = pointer.y + pad;
    if x + size.x > window.x - margin {
        x = pointer.x - size.x - pad;
    }
    if y + size.y > window.y - margin {
        y = pointer.y - size.y - pad;
    }
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_attribute_order() {
        let c = content(Some("Ana"), Some(r#"{"role":"dev","age":31,"lead":true}"#));
        assert_eq!(c.title, "Ana");
        assert_eq!(
            c.rows,
            vec![
                ("role".to_string(), "dev".to_string()),
                ("age".to_string(), "31".to_string()),
                ("lead".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_attrs_show_title_only() {
        let c = content(Some("Bob"), Some("{not json"));
        assert_eq!(c.title, "Bob");
        assert!(c.rows.is_empty());
        assert!(content(None, Some("[1,2]")).rows.is_empty());
        assert_eq!(content(None, None).title, "");
    }

    #[test]
    fn placement_flips_near_edges() {
        let win = Vec2::new(800.0, 600.0);
        let size = Vec2::new(200.0, 100.0);
        assert_eq!(place(Vec2::new(100.0, 100.0), size, win, 10.0, 6.0), Vec2::new(110.0, 110.0));
        assert_eq!(place(Vec2::new(700.0, 550.0), size, win, 10.0, 6.0), Vec2::new(490.0, 440.0));
    }
}
