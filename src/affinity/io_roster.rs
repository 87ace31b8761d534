// Reads the member roster.

use serde::Deserialize;

use crate::affinity::{io_common::*, *};

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct RosterRecord {
    #[serde(default)]
    id: JSValue,
    name: Option<String>,
    country: Option<String>,
    group: Option<String>,
    party: Option<String>,
    party_sig: Option<String>,
    image: Option<String>,
    // Older rosters use this name for the portrait.
    photo: Option<String>,
}

fn blank_to_none(s: Option<String>) -> Option<String> {
    s.map(|x| x.trim().to_string()).filter(|x| !x.is_empty())
}

pub fn read_members(path: &str) -> AffResult<Vec<Member>> {
    let js = read_json_file(path)?;
    parse_members(js, path)
}

pub fn parse_members(js: JSValue, path: &str) -> AffResult<Vec<Member>> {
    let records: Vec<RosterRecord> = serde_json::from_value(js).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    let mut res: Vec<Member> = Vec::new();
    for (idx, r) in records.into_iter().enumerate() {
        let id = match read_js_id(&r.id) {
            Some(id) => id,
            None => {
                warn!("read_members: record {} has no id, skipping", idx);
                continue;
            }
        };
        let name = blank_to_none(r.name).unwrap_or_else(|| id.clone());
        res.push(Member {
            name,
            country: blank_to_none(r.country),
            group: blank_to_none(r.group),
            party: blank_to_none(r.party),
            party_sig: blank_to_none(r.party_sig),
            image: blank_to_none(r.image).or_else(|| blank_to_none(r.photo)),
            id,
        });
    }
    debug!("read_members: {:?} members in {}", res.len(), path);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_fields() {
        let js = json!([
            {"id": 124831, "name": "Ana Pérez", "country": "Spain", "group": "S&D",
             "party": "PSOE", "party_sig": "PSOE", "photo": "https://img/1.jpg"},
            {"id": "97058", "name": " ", "country": null, "image": "https://img/2.jpg", "photo": "x"},
            {"id": null, "name": "Nobody"}
        ]);
        let members = parse_members(js, "roster.json").unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, "124831");
        assert_eq!(members[0].image.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(members[0].party_sig.as_deref(), Some("PSOE"));
        assert_eq!(members[1].name, "97058");
        assert_eq!(members[1].country, None);
        assert_eq!(members[1].image.as_deref(), Some("https://img/2.jpg"));
    }

    #[test]
    fn roster_must_be_an_array() {
        assert!(parse_members(json!({"id": "1"}), "roster.json").is_err());
    }
}
