// Reads the vote catalogue.
//
// The catalogues come from different sources and do not agree on the names of the
// fields. All of them are normalized here into a single `Vote`.

use serde::Deserialize;

use crate::affinity::{io_common::*, *};

#[derive(PartialEq, Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct CatalogueRecord {
    id: Option<JSValue>,
    #[serde(rename = "voteId")]
    vote_id: Option<JSValue>,
    question: Option<JSValue>,
    q: Option<JSValue>,
    title: Option<JSValue>,
    #[serde(rename = "queSeVota")]
    que_se_vota: Option<JSValue>,
    explanation: Option<JSValue>,
    #[serde(rename = "aFavor")]
    a_favor: Option<JSValue>,
    #[serde(rename = "enContra")]
    en_contra: Option<JSValue>,
    url: Option<JSValue>,
}

fn normalize(r: &CatalogueRecord) -> Option<Vote> {
    // The roll-call id takes precedence over the local id.
    let id = r
        .vote_id
        .as_ref()
        .and_then(read_js_id)
        .or_else(|| r.id.as_ref().and_then(read_js_id))?;
    let question = read_js_text(r.question.as_ref())
        .or_else(|| read_js_text(r.q.as_ref()))
        .or_else(|| read_js_text(r.title.as_ref()))?;
    Some(Vote {
        id,
        question,
        explanation: read_js_text(r.que_se_vota.as_ref())
            .or_else(|| read_js_text(r.explanation.as_ref())),
        arguments_for: read_js_text_list(r.a_favor.as_ref()),
        arguments_against: read_js_text_list(r.en_contra.as_ref()),
        url: read_js_text(r.url.as_ref()),
    })
}

pub fn read_catalogue(path: &str) -> AffResult<Vec<Vote>> {
    let js = read_json_file(path)?;
    parse_catalogue(js, path)
}

pub fn parse_catalogue(js: JSValue, path: &str) -> AffResult<Vec<Vote>> {
    let records: Vec<CatalogueRecord> = serde_json::from_value(js).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    let mut res: Vec<Vote> = Vec::new();
    for (idx, r) in records.iter().enumerate() {
        match normalize(r) {
            Some(v) => res.push(v),
            None => warn!(
                "read_catalogue: record {} has no id or no question, skipping",
                idx
            ),
        }
    }
    debug!("read_catalogue: {:?} votes in {}", res.len(), path);
    Ok(res)
}
