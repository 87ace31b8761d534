// Reads the answers of the user from a JSON object.

use std::collections::BTreeMap;

use crate::affinity::{io_common::*, *};

pub fn read_json_answers(path: &str) -> AffResult<UserChoices> {
    let js = read_json_file(path)?;
    parse_json_answers(js, path)
}

pub fn parse_json_answers(js: JSValue, path: &str) -> AffResult<UserChoices> {
    let raw: BTreeMap<String, JSValue> = serde_json::from_value(js).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    let mut res = UserChoices::new();
    for (vote_id, value) in raw.iter() {
        let position = match value {
            JSValue::Number(n) => n.as_f64().and_then(Position::from_value),
            JSValue::String(s) => read_position_label(s),
            _ => None,
        };
        match position {
            Some(p) => {
                res.insert(vote_id.clone(), p);
            }
            None => warn!(
                "read_json_answers: cannot understand the answer {:?} to {}, skipping",
                value, vote_id
            ),
        }
    }
    debug!("read_json_answers: {:?} answers in {}", res.len(), path);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers() {
        let js = json!({"v1": 1, "v2": -1, "v3": 0, "v4": "against", "v5": null, "v6": 7});
        let c = parse_json_answers(js, "answers.json").unwrap();
        assert_eq!(c.len(), 4);
        assert_eq!(c["v4"], Position::Against);
        assert!(!c.contains_key("v5"));
    }
}
