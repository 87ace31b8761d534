// Primitives for reading the answers from CSV files.

use crate::affinity::{io_common::*, *};

pub fn read_csv_answers(path: &str) -> AffResult<UserChoices> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path.to_string(),
        })?;
    parse_csv_answers(rdr)
}

fn parse_csv_answers<R: std::io::Read>(rdr: csv::Reader<R>) -> AffResult<UserChoices> {
    let mut res = UserChoices::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_answers: {:?} {:?}", lineno, line);
        if line.iter().all(|s| s.is_empty()) {
            continue;
        }
        let vote_id = line.get(0).context(CsvLineTooShortSnafu { lineno })?;
        let label = line.get(1).context(CsvLineTooShortSnafu { lineno })?;
        match read_position_label(label) {
            Some(p) => {
                res.insert(vote_id.to_string(), p);
            }
            // The header is optional.
            None if lineno == 1 => {
                debug!("read_csv_answers: treating {:?} as a header", line);
            }
            None => {
                whatever!(
                    "line {}: cannot understand the position {:?} for vote {}",
                    lineno,
                    label,
                    vote_id
                )
            }
        }
    }
    Ok(res)
}
