use crate::geometry::limits;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Body of `POST /api/graph-command/`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphCommand {
    pub command: &'static str,
    pub payload: Value,
}

/// Translate a typed command line into a graph command.
///
/// ```text
/// create node <id> [label=..] [key=value ...]
/// update node <id> key=value ...
/// delete node <id>
/// create edge <from> <to> [type=..]
/// ```
pub fn parse(input: &str) -> Result<GraphCommand, (&'static str, String)> {
    if input.len() > limits::MAX_COMMAND_LEN {
        return Err(("command_parse", format!("command longer than {} characters", limits::MAX_COMMAND_LEN)));
    }
    let tokens = tokenize(input)?;
    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
    match words.as_slice() {
        [] => Err(("command_parse", "empty command".into())),
        ["create", "node", id, rest @ ..] => {
            let mut payload = Map::new();
            payload.insert("id".into(), Value::String(id.to_string()));
            for (k, v) in pairs(rest)? {
                payload.insert(k, v);
            }
            Ok(GraphCommand { command: "create_node", payload: Value::Object(payload) })
        }
        ["update", "node", id, rest @ ..] => {
            let updates: Map<String, Value> = pairs(rest)?.into_iter().collect();
            if updates.is_empty() {
                return Err(("command_parse", "update node needs at least one key=value".into()));
            }
            Ok(GraphCommand { command: "update_node", payload: json!({ "id": id, "updates": updates }) })
        }
        ["delete", "node", id] => Ok(GraphCommand { command: "delete_node", payload: json!({ "id": id }) }),
        ["create", "edge", from, to, rest @ ..] => {
            let mut edge_type = Value::String("related".into());
            for (k, v) in pairs(rest)? {
                if k != "type" {
                    return Err(("command_parse", format!("unknown edge option '{}'", k)));
                }
                edge_type = v;
            }
            Ok(GraphCommand {
                command: "create_edge",
                payload: json!({ "from": from, "to": to, "type": edge_type }),
            })
        }
        [verb, ..] => Err(("command_parse", format!("unrecognized command '{}'", verb))),
    }
}

/// Outcome of a command response: the new graph, or a message for the user.
pub fn classify(status: u16, body: &Value) -> Result<Value, String> {
    let server_error = body.get("error").and_then(Value::as_str);
    if !(200..300).contains(&status) {
        return Err(match server_error {
            Some(e) => e.to_string(),
            None => format!("command failed with HTTP {}", status),
        });
    }
    if let Some(e) = server_error {
        return Err(e.to_string());
    }
    body.get("graph").cloned().ok_or_else(|| "response has no graph".to_string())
}

fn tokenize(input: &str) -> Result<Vec<String>, (&'static str, String)> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            '\\' if in_quotes => match chars.next() {
                Some(n) => cur.push(n),
                None => break,
            },
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    out.push(std::mem::take(&mut cur));
                    has_token = false;
                }
            }
            c => {
                cur.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err(("command_parse", "unterminated quote".into()));
    }
    if has_token {
        out.push(cur);
    }
    Ok(out)
}

fn pairs(words: &[&str]) -> Result<Vec<(String, Value)>, (&'static str, String)> {
    words
        .iter()
        .map(|w| {
            let (k, v) = w
                .split_once('=')
                .ok_or_else(|| ("command_parse", format!("expected key=value, got '{}'", w)))?;
            if k.is_empty() {
                return Err(("command_parse", format!("missing key in '{}'", w)));
            }
            Ok((k.to_string(), scalar(v)))
        })
        .collect()
}

// Numbers and booleans travel typed; everything else is a string.
fn scalar(v: &str) -> Value {
    match serde_json::from_str::<Value>(v) {
        Ok(n @ Value::Number(_)) | Ok(n @ Value::Bool(_)) => n,
        _ => Value::String(v.to_string()),
    }
}
