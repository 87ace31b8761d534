use clap::Parser;

/// Finds the members of parliament who voted like you on real roll-call votes.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file listing the data sources and the options.
    /// The paths inside the file are relative to its directory. The flags below override its content.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The member roster in JSON format.
    #[clap(long, value_parser)]
    pub members: Option<String>,

    /// (file path) The vote catalogue in JSON format. Required for the interactive quiz.
    #[clap(long, value_parser)]
    pub votes: Option<String>,

    /// (file path) The matrix of the recorded positions in JSON format.
    #[clap(long, value_parser)]
    pub matrix: Option<String>,

    /// (file path) The answers of the user. If not provided, an interactive quiz is started.
    #[clap(short, long, value_parser)]
    pub answers: Option<String>,

    /// (json or csv, default json) The format of the answers file.
    #[clap(long, value_parser)]
    pub answers_type: Option<String>,

    /// (coverage or raw, default coverage) How the affinity is computed.
    #[clap(long, value_parser)]
    pub mode: Option<String>,

    /// (default 5) The minimum number of votes in common with a member.
    #[clap(long, value_parser)]
    pub min_overlap: Option<u32>,

    /// If passed as an argument, a disagreement where one side abstained counts for half.
    #[clap(long, takes_value = false)]
    pub abstention_soft: bool,

    /// (dense or competition, default dense) How tied positions are numbered.
    #[clap(long, value_parser)]
    pub ranking_mode: Option<String>,

    /// (country, group or party, default country) The attribute used for the sub-group ranking.
    #[clap(long, value_parser)]
    pub subgroup: Option<String>,

    /// (text) Only show the members whose name, group or country contain this text.
    #[clap(short, long, value_parser)]
    pub search: Option<String>,

    /// (text) Only show the members of this sub-group.
    #[clap(long, value_parser)]
    pub filter_subgroup: Option<String>,

    /// (default 10) The number of members to show.
    #[clap(short, long, value_parser)]
    pub limit: Option<usize>,

    /// (default 10) The number of questions of the interactive quiz.
    #[clap(long, value_parser)]
    pub quiz_size: Option<usize>,

    /// (default 0) The seed used to pick the questions of the interactive quiz.
    #[clap(long, value_parser)]
    pub seed: Option<u32>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing an expected summary in JSON format. If provided, mepmatch will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
