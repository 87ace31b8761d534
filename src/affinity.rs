use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use vote_affinity::builder::{restrict_to_matrix, Builder};
use vote_affinity::ranking::{page_of, present, RankedEntry, Ranking, Reveal, Standing};
use vote_affinity::*;

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::affinity::config_reader::*;

pub mod config_reader;
mod io_answers;
mod io_catalogue;
mod io_common;
mod io_csv;
mod io_matrix;
mod io_roster;
mod quiz;

#[derive(Debug, Snafu)]
pub enum AffinityError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing to {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening the CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno} of the CSV file is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error reading the answers from the terminal"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("The quiz could not be started"))]
    StartingQuiz { source: AffinityErrors },
    #[snafu(display("Missing data source: {name}"))]
    MissingSource { name: String },
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AffResult<T> = Result<T, AffinityError>;

/// Where the answers of the user come from.
#[derive(Eq, PartialEq, Debug, Clone)]
enum AnswerSource {
    Json(String),
    Csv(String),
    Quiz,
}

/// Everything needed for one run, once the configuration file and the flags are merged.
#[derive(PartialEq, Debug, Clone)]
struct RunSettings {
    members: String,
    votes: Option<String>,
    matrix: String,
    answers: AnswerSource,
    options: ScoreOptions,
    present: PresentSettings,
    quiz_size: usize,
    seed: u32,
    search: Option<String>,
    filter_subgroup: Option<String>,
    limit: usize,
    out: Option<String>,
}

fn resolve(root: &Option<PathBuf>, p: &str) -> String {
    match root {
        Some(r) => r.join(p).display().to_string(),
        None => p.to_string(),
    }
}

fn merge_settings(args: &Args) -> AffResult<RunSettings> {
    let (config, root): (AffinityConfig, Option<PathBuf>) = match &args.config {
        Some(config_path) => {
            let config_str = fs::read_to_string(config_path).context(OpeningJsonSnafu {
                path: config_path.clone(),
            })?;
            let config: AffinityConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {
                path: config_path.clone(),
            })?;
            info!("config: {:?}", config);
            let root_p = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?;
            (config, Some(root_p.to_path_buf()))
        }
        None => (AffinityConfig::default(), None),
    };

    // Paths given on the command line are taken as they are.
    let source = |flag: &Option<String>, from_config: &Option<String>| -> Option<String> {
        flag.clone()
            .or_else(|| from_config.as_ref().map(|p| resolve(&root, p)))
    };
    let sources = &config.data_sources;
    let members = source(&args.members, &sources.members).context(MissingSourceSnafu {
        name: "members".to_string(),
    })?;
    let matrix = source(&args.matrix, &sources.matrix).context(MissingSourceSnafu {
        name: "matrix".to_string(),
    })?;
    let votes = source(&args.votes, &sources.votes);

    let answers_type = args
        .answers_type
        .clone()
        .or_else(|| sources.answers_type.clone())
        .unwrap_or_else(|| "json".to_string());
    let answers = match (source(&args.answers, &sources.answers), answers_type.as_str()) {
        (None, _) => AnswerSource::Quiz,
        (Some(p), "json") => AnswerSource::Json(p),
        (Some(p), "csv") => AnswerSource::Csv(p),
        (Some(_), x) => whatever!("Unknown answers type {:?}", x),
    };

    let mut opts = config.options.clone();
    if args.mode.is_some() {
        opts.mode = args.mode.clone();
    }
    if args.min_overlap.is_some() {
        opts.min_overlap = args.min_overlap;
    }
    if args.abstention_soft {
        opts.abstention_soft = Some(true);
    }
    if args.ranking_mode.is_some() {
        opts.ranking_mode = args.ranking_mode.clone();
    }
    if args.subgroup.is_some() {
        opts.subgroup = args.subgroup.clone();
    }
    let options = validate_options(&opts)?;
    let present = validate_present(&opts)?;

    let output = &config.output_settings;
    let quiz_size = args
        .quiz_size
        .or(config.quiz.size)
        .unwrap_or(Builder::DEFAULT_SIZE);
    let limit = args
        .limit
        .or(output.limit)
        .unwrap_or(Reveal::DEFAULT_REVEAL.shown);
    let out = match (&args.out, &output.output_path) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) => Some(resolve(&root, p)),
        (None, None) => None,
    };

    Ok(RunSettings {
        members,
        votes,
        matrix,
        answers,
        options,
        present,
        quiz_size,
        seed: args.seed.or(config.quiz.seed).unwrap_or(0),
        search: args.search.clone().or_else(|| output.search.clone()),
        filter_subgroup: args
            .filter_subgroup
            .clone()
            .or_else(|| output.filter_subgroup.clone()),
        limit,
        out,
    })
}

fn mode_name(options: &ScoreOptions) -> &'static str {
    match options.mode() {
        AffinityMode::Coverage => "coverage",
        AffinityMode::Raw => "raw",
    }
}

fn standing_name(standing: Standing) -> &'static str {
    match standing {
        Standing::Scored => "scored",
        Standing::InsufficientOverlap => "insufficientOverlap",
        Standing::NotAnswered => "notAnswered",
    }
}

fn entry_to_json(e: &RankedEntry) -> JSValue {
    json!({
        "rank": e.global_position,
        "subgroupRank": e.subgroup_position,
        "id": e.member.id,
        "name": e.member.name,
        "country": e.member.country,
        "group": e.member.group,
        "party": e.member.party,
        "partySig": e.member.party_sig,
        "image": e.member.image,
        "affinity": e.affinity,
        "percent": e.percent(),
        "overlap": e.overlap,
        "coverage": e.coverage,
        "standing": standing_name(e.standing),
    })
}

/// The entries to display: search and sub-group filters, then the reveal count.
fn visible_entries<'a>(ranking: &'a Ranking, settings: &RunSettings) -> Vec<&'a RankedEntry> {
    let mut entries: Vec<&RankedEntry> = match &settings.search {
        Some(q) => ranking.search(q),
        None => ranking.entries().iter().collect(),
    };
    if let Some(value) = &settings.filter_subgroup {
        let key = ranking.settings().subgroup;
        entries.retain(|e| key.of(&e.member) == Some(value.as_str()));
    }
    let reveal = Reveal::new(settings.limit, Reveal::DEFAULT_REVEAL.step);
    page_of(&entries, &reveal).to_vec()
}

fn build_summary_js(settings: &RunSettings, answered: usize, ranking: &Ranking) -> JSValue {
    let c = OutputConfig {
        mode: mode_name(&settings.options).to_string(),
        min_overlap: settings.options.min_overlap,
        abstention_soft: settings.options.abstention_soft,
        ranking_mode: ranking_mode_name(settings.present.ranking_mode).to_string(),
        subgroup: subgroup_name(settings.present.subgroup).to_string(),
        answered,
    };
    let results: Vec<JSValue> = visible_entries(ranking, settings)
        .iter()
        .map(|e| entry_to_json(e))
        .collect();
    json!({
        "config": c,
        "total": ranking.len(),
        "results": results })
}

fn read_answers<R: BufRead, W: Write>(
    settings: &RunSettings,
    matrix: &PositionMatrix,
    input: R,
    output: W,
) -> AffResult<UserChoices> {
    match &settings.answers {
        AnswerSource::Json(p) => io_answers::read_json_answers(p),
        AnswerSource::Csv(p) => io_csv::read_csv_answers(p),
        AnswerSource::Quiz => {
            let votes_p = settings.votes.clone().context(MissingSourceSnafu {
                name: "votes".to_string(),
            })?;
            let catalogue = io_catalogue::read_catalogue(&votes_p)?;
            let mut session = Builder::new(&settings.options)
                .context(StartingQuizSnafu {})?
                .catalogue(&catalogue)
                .context(StartingQuizSnafu {})?
                .size(settings.quiz_size)
                .context(StartingQuizSnafu {})?
                .seed(settings.seed)
                .build(matrix)
                .context(StartingQuizSnafu {})?;
            quiz::run_quiz(&mut session, matrix, input, output)?;
            Ok(session.choices().clone())
        }
    }
}

fn write_summary(pretty: &str, out: &Option<String>) -> AffResult<()> {
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty).context(WritingFileSnafu {
                path: path.to_string(),
            })?;
        }
    }
    Ok(())
}

/// Runs the program with the given arguments.
///
/// `input` and `output` are only used by the interactive quiz.
pub fn run_affinity<R: BufRead, W: Write>(args: &Args, input: R, output: W) -> AffResult<()> {
    let settings = merge_settings(args)?;
    debug!("run_affinity: settings: {:?}", settings);

    let roster = io_roster::read_members(&settings.members)?;
    let matrix = io_matrix::read_matrix(&settings.matrix)?;
    info!(
        "Read {:?} members and {:?} votes with positions",
        roster.len(),
        matrix.len()
    );

    let all_choices = read_answers(&settings, &matrix, input, output)?;
    let choices = restrict_to_matrix(&all_choices, &matrix);
    if choices.len() < all_choices.len() {
        warn!(
            "{:?} answers are on votes without recorded positions, ignoring them",
            all_choices.len() - choices.len()
        );
    }
    if choices.len() < settings.options.min_overlap as usize {
        warn!(
            "Only {:?} answers: answer at least {:?} questions to compute affinities",
            choices.len(),
            settings.options.min_overlap
        );
    }

    let scored = score(&choices, &matrix, &settings.options);
    let ranking = present(&scored, &choices, &matrix, &roster, &settings.present);
    for e in ranking.page(&Reveal::new(settings.limit, settings.limit)) {
        info!(
            "{:>4} {:>3}% {} ({})",
            e.global_position,
            e.percent(),
            e.member.name,
            e.member.group.as_deref().unwrap_or("-")
        );
    }

    let result_js = build_summary_js(&settings, choices.len(), &ranking);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(WritingJsonSnafu {})?;
    write_summary(&pretty_js_stats, &settings.out)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_affinity_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");
    info!("Running test {}", test_name);
    let config_path = format!("{}/{}/{}", test_dir, test_name, config_lpath);
    let summary_path = format!("{}/{}/{}", test_dir, test_name, summary_lpath);
    let args = <Args as clap::Parser>::parse_from([
        "mepmatch",
        "--config",
        config_path.as_str(),
        "--reference",
        summary_path.as_str(),
        "--out",
        "stdout",
    ]);
    let res = run_affinity(&args, std::io::empty(), std::io::sink());
    if let Err(e) = res {
        panic!("Test {} failed: {}", test_name, e);
    }
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_affinity_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}
