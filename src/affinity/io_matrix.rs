// Reads the matrix of the recorded positions.

use std::collections::BTreeMap;

use crate::affinity::{io_common::*, *};

pub fn read_matrix(path: &str) -> AffResult<PositionMatrix> {
    let js = read_json_file(path)?;
    parse_matrix(js, path)
}

pub fn parse_matrix(js: JSValue, path: &str) -> AffResult<PositionMatrix> {
    let rows: BTreeMap<String, BTreeMap<String, JSValue>> =
        serde_json::from_value(js).context(ParsingJsonSnafu {
            path: path.to_string(),
        })?;
    let mut matrix = PositionMatrix::new();
    let mut coerced: usize = 0;
    for (vote_id, row) in rows.iter() {
        matrix.insert_vote(vote_id);
        for (member_id, value) in row.iter() {
            let position = match value {
                JSValue::Null => None,
                JSValue::Number(n) => {
                    let p = n.as_f64().and_then(Position::from_value);
                    if p.is_none() {
                        coerced += 1;
                    }
                    p
                }
                _ => {
                    coerced += 1;
                    None
                }
            };
            matrix.insert(vote_id, member_id, position);
        }
    }
    if coerced > 0 {
        warn!(
            "read_matrix: {:?} positions outside of 1, -1, 0 were treated as absent",
            coerced
        );
    }
    debug!(
        "read_matrix: {:?} votes and {:?} members in {}",
        matrix.len(),
        matrix.member_ids().len(),
        path
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_and_coercion() {
        let js = json!({
            "v1": {"a": 1, "b": -1, "c": 0, "d": null, "e": 2, "f": "yes"},
            "v2": {}
        });
        let m = parse_matrix(js, "matrix.json").unwrap();
        assert_eq!(m.len(), 2);
        assert!(m.contains_vote("v2"));
        let row = m.row("v1").unwrap();
        assert_eq!(row["a"], Some(Position::For));
        assert_eq!(row["b"], Some(Position::Against));
        assert_eq!(row["c"], Some(Position::Abstention));
        assert_eq!(row["d"], None);
        assert_eq!(row["e"], None);
        assert_eq!(row["f"], None);
        assert_eq!(m.member_ids().len(), 6);
    }

    #[test]
    fn rows_must_be_objects() {
        assert!(parse_matrix(json!({"v1": [1, 2]}), "matrix.json").is_err());
    }
}
