use crate::affinity::*;

pub fn read_json_file(path: &str) -> AffResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: path.to_string(),
    })
}

/// Identifiers are sometimes written as numbers.
pub fn read_js_id(x: &JSValue) -> Option<String> {
    match x {
        JSValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JSValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A text field, dropped when blank.
pub fn read_js_text(x: Option<&JSValue>) -> Option<String> {
    match x {
        Some(JSValue::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// A list of texts, written either as a single string or as an array.
pub fn read_js_text_list(x: Option<&JSValue>) -> Vec<String> {
    match x {
        Some(JSValue::Array(xs)) => xs.iter().filter_map(|x| read_js_text(Some(x))).collect(),
        Some(v @ JSValue::String(_)) => read_js_text(Some(v)).into_iter().collect(),
        _ => vec![],
    }
}

/// Reads a position written as a label: 1, -1, 0, +, -, for, against, abstention.
pub fn read_position_label(s: &str) -> Option<Position> {
    match s.trim().to_lowercase().as_str() {
        "1" | "+1" | "+" | "for" => Some(Position::For),
        "-1" | "-" | "against" => Some(Position::Against),
        "0" | "abstention" | "abstain" => Some(Position::Abstention),
        _ => None,
    }
}
