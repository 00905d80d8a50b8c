//! Plain-text instance format.
//!
//! ```text
//! 3 3
//! [0 3 1 5] [1 4 2 2] [2 3]
//! [1 2 2 6] [0 4]
//! [2 4]
//! ```
//!
//! The first non-blank line holds the job count and the machine count. Each
//! of the next `job count` lines is one job; every bracketed group is one
//! operation and lists its alternatives as interleaved `machine duration`
//! pairs. A blank job line is a job without operations. Job ids are
//! assigned by line order, and blank lines after the last job are ignored.

use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::models::{Instance, Job, Operation, Time};

/// Parses an instance from text.
///
/// # Errors
/// - [`ScheduleError::Parse`] for malformed lines, brackets or numbers, or
///   a job line count that differs from the header.
/// - [`ScheduleError::InvalidInstance`] if the decoded instance fails
///   validation (unknown machine, zero duration, ...).
///
/// # Example
/// ```
/// use u_fjsp::loader::parse_instance;
///
/// let instance = parse_instance("2 2\n[0 3] [1 5]\n[1 6 0 3]\n").unwrap();
/// assert_eq!(instance.job_count(), 2);
/// assert_eq!(instance.operation(1, 0).unwrap().alternatives.len(), 2);
/// ```
pub fn parse_instance(text: &str) -> Result<Instance> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    let (header_line, header) = lines
        .find(|(_, l)| !l.is_empty())
        .ok_or_else(|| ScheduleError::parse(1, "missing header line"))?;
    let (job_count, machine_count) = parse_header(header_line, header)?;

    let mut jobs = Vec::with_capacity(job_count);
    let mut last_line = header_line;
    for (line_no, line) in lines {
        if jobs.len() == job_count {
            if line.is_empty() {
                continue;
            }
            return Err(ScheduleError::parse(
                line_no,
                format!("more job lines than the {job_count} announced"),
            ));
        }
        let operations = parse_job_line(line_no, line)?;
        let job = operations
            .into_iter()
            .fold(Job::new(jobs.len()), Job::with_operation);
        jobs.push(job);
        last_line = line_no;
    }

    if jobs.len() != job_count {
        return Err(ScheduleError::parse(
            last_line,
            format!("expected {job_count} job lines, found {}", jobs.len()),
        ));
    }

    debug!(job_count, machine_count, "instance parsed");
    Instance::new(machine_count, jobs)
}

/// Reads and parses an instance file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Instance> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_instance(&text)
}

/// Writes an instance back in the text format.
pub fn format_instance(instance: &Instance) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", instance.job_count(), instance.machine_count());
    for job in instance.jobs() {
        let groups: Vec<String> = job
            .operations
            .iter()
            .map(|op| {
                let pairs: Vec<String> = op
                    .alternatives
                    .iter()
                    .map(|a| format!("{} {}", a.machine, a.duration))
                    .collect();
                format!("[{}]", pairs.join(" "))
            })
            .collect();
        let _ = writeln!(out, "{}", groups.join(" "));
    }
    out
}

fn parse_header(line_no: usize, line: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [jobs, machines] = fields.as_slice() else {
        return Err(ScheduleError::parse(
            line_no,
            format!("header needs job and machine counts, got {line:?}"),
        ));
    };
    let job_count = parse_number::<usize>(line_no, jobs)?;
    let machine_count = parse_number::<usize>(line_no, machines)?;
    Ok((job_count, machine_count))
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Word(&'a str),
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            if let Some(r) = rest.strip_prefix('[') {
                tokens.push(Token::Open);
                rest = r;
            } else if let Some(r) = rest.strip_prefix(']') {
                tokens.push(Token::Close);
                rest = r;
            } else {
                let end = rest.find(['[', ']']).unwrap_or(rest.len());
                tokens.push(Token::Word(&rest[..end]));
                rest = &rest[end..];
            }
        }
    }
    tokens
}

fn parse_job_line(line_no: usize, line: &str) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();
    let mut group: Option<Vec<&str>> = None;

    for token in tokenize(line) {
        match token {
            Token::Open => {
                if group.is_some() {
                    return Err(ScheduleError::parse(line_no, "nested '['"));
                }
                group = Some(Vec::new());
            }
            Token::Word(w) => match group.as_mut() {
                Some(words) => words.push(w),
                None => {
                    return Err(ScheduleError::parse(
                        line_no,
                        format!("{w:?} outside of a bracketed operation"),
                    ));
                }
            },
            Token::Close => {
                let Some(words) = group.take() else {
                    return Err(ScheduleError::parse(line_no, "unbalanced bracket"));
                };
                operations.push(parse_operation(line_no, &words)?);
            }
        }
    }

    if group.is_some() {
        return Err(ScheduleError::parse(line_no, "unbalanced bracket"));
    }
    Ok(operations)
}

fn parse_operation(line_no: usize, words: &[&str]) -> Result<Operation> {
    if words.is_empty() {
        return Err(ScheduleError::parse(line_no, "operation without alternatives"));
    }
    if words.len() % 2 != 0 {
        return Err(ScheduleError::parse(
            line_no,
            "alternatives must be machine/duration pairs",
        ));
    }
    words.chunks_exact(2).try_fold(Operation::new(), |op, pair| {
        let machine = parse_number::<usize>(line_no, pair[0])?;
        let duration = parse_number::<Time>(line_no, pair[1])?;
        Ok(op.with_alternative(machine, duration))
    })
}

fn parse_number<T: std::str::FromStr>(line_no: usize, word: &str) -> Result<T> {
    word.parse()
        .map_err(|_| ScheduleError::parse(line_no, format!("{word:?} is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Alternative;

    const SAMPLE: &str = "3 3\n\
        [0 3 1 5] [1 4 2 2] [2 3]\n\
        [1 2 2 6] [0 4]\n\
        [2 4]\n";

    #[test]
    fn test_parse_sample() {
        let inst = parse_instance(SAMPLE).unwrap();
        assert_eq!(inst.job_count(), 3);
        assert_eq!(inst.machine_count(), 3);
        assert_eq!(inst.total_operations(), 6);
        assert_eq!(
            inst.operation(0, 0).unwrap().alternatives,
            vec![Alternative::new(0, 3), Alternative::new(1, 5)]
        );
        assert_eq!(inst.job(2).unwrap().operation_count(), 1);
    }

    #[test]
    fn test_duplicate_machine_in_group() {
        let inst = parse_instance("1 2\n[0 3] [1 5] [1 6 1 3]\n").unwrap();
        let op = inst.operation(0, 2).unwrap();
        assert_eq!(op.alternatives.len(), 2);
        assert_eq!(inst.remaining_work().row(0), &[11, 8, 3, 0]);
    }

    #[test]
    fn test_tolerates_spacing_and_trailing_blank_lines() {
        let text = "\n2 2\n[ 0 3 ][1 5]\n   [1   2]  \n\n\n";
        let inst = parse_instance(text).unwrap();
        assert_eq!(inst.job(0).unwrap().operation_count(), 2);
        assert_eq!(inst.operation(1, 0).unwrap().alternatives[0], Alternative::new(1, 2));
    }

    #[test]
    fn test_blank_job_line_is_an_empty_job() {
        let inst = parse_instance("3 1\n[0 3]\n\n[0 2]\n").unwrap();
        assert_eq!(inst.job_count(), 3);
        assert!(!inst.job(1).unwrap().has_operations());
        assert_eq!(inst.job(2).unwrap().operation_count(), 1);

        let inst = parse_instance("2 1\n[0 3]\n\n").unwrap();
        assert_eq!(inst.job_count(), 2);
        assert!(!inst.job(1).unwrap().has_operations());
    }

    #[test]
    fn test_format_round_trip_with_empty_jobs() {
        let inst = Instance::new(
            1,
            vec![
                Job::new(0),
                Job::new(1).with_operation(Operation::single(0, 4)),
                Job::new(2),
            ],
        )
        .unwrap();
        let text = format_instance(&inst);
        assert_eq!(text, "3 1\n\n[0 4]\n\n");
        assert_eq!(parse_instance(&text).unwrap(), inst);
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", 1),
            ("2\n[0 1]\n[0 1]\n", 1),
            ("x 1\n[0 1]\n", 1),
            ("1 1\n[0 1\n", 2),
            ("1 1\n[0 1]]\n", 2),
            ("1 1\n[0 1 2]\n", 2),
            ("1 1\n[]\n", 2),
            ("1 1\n0 1\n", 2),
            ("1 1\n[0 a]\n", 2),
            ("1 1\n[[0 1]]\n", 2),
            ("1 1\n[0 1]\n[0 2]\n", 3),
        ];
        for (text, line) in cases {
            match parse_instance(text) {
                Err(ScheduleError::Parse { line: l, .. }) => assert_eq!(l, line, "{text:?}"),
                other => panic!("{text:?}: expected parse error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_instance_is_reported() {
        let err = parse_instance("1 1\n[3 2]\n").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidInstance { .. }));
        let err = parse_instance("1 1\n[0 0]\n").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidInstance { .. }));
    }

    #[test]
    fn test_format_round_trip() {
        let inst = parse_instance(SAMPLE).unwrap();
        let text = format_instance(&inst);
        assert_eq!(parse_instance(&text).unwrap(), inst);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_instance("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, ScheduleError::Io(_)));
    }
}
