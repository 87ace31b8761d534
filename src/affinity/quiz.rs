// The interactive quiz in the terminal.

use vote_affinity::builder::Session;

use crate::affinity::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Command {
    Answer(Position),
    Back,
    Quit,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        "f" | "for" | "1" | "+" => Command::Answer(Position::For),
        "a" | "against" | "-1" | "-" => Command::Answer(Position::Against),
        "0" | "abstention" | "abstain" => Command::Answer(Position::Abstention),
        "b" | "back" => Command::Back,
        "q" | "quit" => Command::Quit,
        _ => Command::Unknown,
    }
}

fn write_question<W: Write>(session: &Session, vote: &Vote, output: &mut W) -> std::io::Result<()> {
    writeln!(output)?;
    writeln!(
        output,
        "Question {} of {} ({}% answered)",
        session.index() + 1,
        session.len(),
        session.progress_pct()
    )?;
    writeln!(output, "{}", vote.question)?;
    if let Some(expl) = &vote.explanation {
        writeln!(output, "  {}", expl)?;
    }
    for arg in vote.arguments_for.iter() {
        writeln!(output, "  + {}", arg)?;
    }
    for arg in vote.arguments_against.iter() {
        writeln!(output, "  - {}", arg)?;
    }
    if let Some(url) = &vote.url {
        writeln!(output, "  source: {}", url)?;
    }
    if let Some(p) = session.position(&vote.id) {
        writeln!(output, "  current answer: {:?}", p)?;
    }
    write!(output, "[f]or / [a]gainst / [0] abstention / [b]ack / [q]uit > ")?;
    output.flush()
}

/// Asks the questions of the session until all of them are answered, the user quits
/// or the input ends.
pub fn run_quiz<R: BufRead, W: Write>(
    session: &mut Session,
    matrix: &PositionMatrix,
    input: R,
    mut output: W,
) -> AffResult<()> {
    let mut lines = input.lines();
    while let Some(vote) = session.current().cloned() {
        write_question(session, &vote, &mut output).context(WritingFileSnafu {
            path: "terminal".to_string(),
        })?;
        let line = match lines.next() {
            Some(l) => l.context(ReadingInputSnafu {})?,
            None => {
                debug!("run_quiz: end of input");
                session.finish();
                break;
            }
        };
        match parse_command(&line) {
            Command::Answer(p) => {
                session
                    .answer(&vote.id, p)
                    .context(StartingQuizSnafu {})?;
            }
            Command::Back => session.back(),
            Command::Quit => session.finish(),
            Command::Unknown => {
                writeln!(output, "Please answer f, a, 0, b or q.").context(WritingFileSnafu {
                    path: "terminal".to_string(),
                })?;
            }
        }
    }
    info!(
        "run_quiz: {:?} of {:?} questions answered",
        session.answered(),
        session.len()
    );
    if !session.has_enough_answers(matrix) {
        writeln!(
            output,
            "Answer at least {} questions to compute affinities.",
            session.options().min_overlap
        )
        .context(WritingFileSnafu {
            path: "terminal".to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn setup() -> (Session, PositionMatrix) {
        let mut matrix = PositionMatrix::new();
        let mut votes = Vec::new();
        for i in 1..=3 {
            let id = format!("v{}", i);
            matrix.insert(&id, "m1", Some(Position::For));
            votes.push(Vote::new(&id, &format!("Question {}?", i)));
        }
        let session = Builder::new(&ScoreOptions::DEFAULT_OPTIONS)
            .unwrap()
            .catalogue(&votes)
            .unwrap()
            .build(&matrix)
            .unwrap();
        (session, matrix)
    }

    #[test]
    fn answers_every_question() {
        let (mut session, matrix) = setup();
        let mut out: Vec<u8> = Vec::new();
        run_quiz(&mut session, &matrix, Cursor::new("f\nwhat\nb\na\n0\nf\n"), &mut out).unwrap();
        assert!(session.is_done());
        assert_eq!(session.answered(), 3);
        let first = &session.questions()[0].id;
        // The first answer was replaced after going back.
        assert_eq!(session.position(first), Some(Position::Against));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please answer"));
        assert!(text.contains("Question 1 of 3"));
        assert!(text.contains("Answer at least 5 questions"));
    }

    #[test]
    fn quit_and_end_of_input() {
        let (mut session, matrix) = setup();
        run_quiz(&mut session, &matrix, Cursor::new("f\nq\n"), std::io::sink()).unwrap();
        assert!(session.is_done());
        assert_eq!(session.answered(), 1);

        let (mut session, matrix) = setup();
        run_quiz(&mut session, &matrix, Cursor::new(""), std::io::sink()).unwrap();
        assert!(session.is_done());
        assert_eq!(session.answered(), 0);
    }

    #[test]
    fn commands() {
        assert_eq!(parse_command(" F "), Command::Answer(Position::For));
        assert_eq!(parse_command("-"), Command::Answer(Position::Against));
        assert_eq!(parse_command("back"), Command::Back);
        assert_eq!(parse_command(""), Command::Unknown);
    }
}
