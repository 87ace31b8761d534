use crate::affinity::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataSources {
    pub members: Option<String>,
    pub votes: Option<String>,
    pub matrix: Option<String>,
    pub answers: Option<String>,
    #[serde(rename = "answersType")]
    pub answers_type: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct AffinityOptions {
    pub mode: Option<String>,
    #[serde(rename = "minOverlap")]
    pub min_overlap: Option<u32>,
    #[serde(rename = "abstentionSoft")]
    pub abstention_soft: Option<bool>,
    #[serde(rename = "rankingMode")]
    pub ranking_mode: Option<String>,
    pub subgroup: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuizSettings {
    pub size: Option<usize>,
    pub seed: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    #[serde(rename = "filterSubgroup")]
    pub filter_subgroup: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct AffinityConfig {
    #[serde(rename = "dataSources", default)]
    pub data_sources: DataSources,
    #[serde(default)]
    pub options: AffinityOptions,
    #[serde(default)]
    pub quiz: QuizSettings,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
}

/// The options as written in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub mode: String,
    #[serde(rename = "minOverlap")]
    pub min_overlap: u32,
    #[serde(rename = "abstentionSoft")]
    pub abstention_soft: bool,
    #[serde(rename = "rankingMode")]
    pub ranking_mode: String,
    pub subgroup: String,
    pub answered: usize,
}

pub fn validate_options(opts: &AffinityOptions) -> AffResult<ScoreOptions> {
    let defaults = ScoreOptions::DEFAULT_OPTIONS;
    let mode = match opts.mode.as_deref() {
        None | Some("coverage") => AffinityMode::Coverage,
        Some("raw") => AffinityMode::Raw,
        Some(x) => {
            whatever!("Cannot use affinity mode {:?}: expected coverage or raw", x)
        }
    };
    let res = ScoreOptions {
        min_overlap: opts.min_overlap.unwrap_or(defaults.min_overlap),
        abstention_soft: opts.abstention_soft.unwrap_or(defaults.abstention_soft),
        ..defaults
    }
    .with_mode(mode);
    Ok(res)
}

pub fn validate_present(opts: &AffinityOptions) -> AffResult<PresentSettings> {
    let res = PresentSettings {
        ranking_mode: match opts.ranking_mode.as_deref() {
            None | Some("dense") => RankingMode::Dense,
            Some("competition") => RankingMode::Competition,
            Some(x) => {
                whatever!(
                    "Cannot use ranking mode {:?}: expected dense or competition",
                    x
                )
            }
        },
        subgroup: match opts.subgroup.as_deref() {
            None | Some("country") => SubgroupKey::Country,
            Some("group") => SubgroupKey::Group,
            Some("party") => SubgroupKey::Party,
            Some(x) => {
                whatever!(
                    "Cannot use sub-group {:?}: expected country, group or party",
                    x
                )
            }
        },
    };
    Ok(res)
}

pub fn ranking_mode_name(mode: RankingMode) -> &'static str {
    match mode {
        RankingMode::Dense => "dense",
        RankingMode::Competition => "competition",
    }
}

pub fn subgroup_name(key: SubgroupKey) -> &'static str {
    match key {
        SubgroupKey::Country => "country",
        SubgroupKey::Group => "group",
        SubgroupKey::Party => "party",
    }
}

pub fn read_summary(path: &str) -> AffResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    debug!("read_summary: {} results", js["results"].as_array().map_or(0, |a| a.len()));
    Ok(js)
}
