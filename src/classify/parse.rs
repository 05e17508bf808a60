//! Success-output parsers.
//!
//! The engine emits one JSON record per line for list operations
//! (`--format '{{json .}}'`), a single JSON array for inspect operations,
//! and plain text for scalar operations. All parsing is conditioned on exit
//! code zero; a parse failure on successful output is a contract violation
//! with the engine and surfaces as the unexpected-response error.

use serde::de::DeserializeOwned;

use crate::exec::CommandResult;

use super::Error;

/// Parse line-delimited JSON records from a list operation.
///
/// # Errors
///
/// Returns [`Error::Unexpected`] when a non-empty line fails to decode.
pub fn parse_lines<T: DeserializeOwned>(result: &CommandResult) -> Result<Vec<T>, Error> {
    debug_assert!(result.is_success(), "parsing is conditioned on exit code 0");

    let mut records = Vec::new();
    for line in result.stdout().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str(trimmed) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::error!(line = %trimmed, error = %e, "unparseable record in list output");
                return Err(Error::unexpected(result.clone()));
            }
        }
    }
    Ok(records)
}

/// Parse the JSON array emitted by an inspect operation.
///
/// # Errors
///
/// Returns [`Error::Unexpected`] when stdout is not a decodable array.
pub fn parse_inspect<T: DeserializeOwned>(result: &CommandResult) -> Result<Vec<T>, Error> {
    debug_assert!(result.is_success(), "parsing is conditioned on exit code 0");

    serde_json::from_str(result.stdout()).map_err(|e| {
        tracing::error!(error = %e, "unparseable inspect output");
        Error::unexpected(result.clone())
    })
}

/// Parse an inspect operation expected to describe exactly one resource.
///
/// # Errors
///
/// Returns [`Error::Unexpected`] when the array is empty or undecodable.
pub fn parse_inspect_one<T: DeserializeOwned>(result: &CommandResult) -> Result<T, Error> {
    let mut records = parse_inspect::<T>(result)?;
    if records.len() != 1 {
        tracing::error!(count = records.len(), "inspect returned an unexpected record count");
        return Err(Error::unexpected(result.clone()));
    }
    Ok(records.remove(0))
}

/// Parse a single JSON object emitted by a scalar-format operation.
///
/// # Errors
///
/// Returns [`Error::Unexpected`] when stdout is not a decodable object.
pub fn parse_object<T: DeserializeOwned>(result: &CommandResult) -> Result<T, Error> {
    debug_assert!(result.is_success(), "parsing is conditioned on exit code 0");

    serde_json::from_str(result.stdout().trim()).map_err(|e| {
        tracing::error!(error = %e, "unparseable object output");
        Error::unexpected(result.clone())
    })
}

/// The trimmed plain-text payload of a scalar operation.
#[must_use]
pub fn parse_scalar(result: &CommandResult) -> String {
    result.stdout().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::path::PathBuf;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        #[serde(rename = "ID")]
        id: String,
    }

    fn success(stdout: &str) -> CommandResult {
        CommandResult::new(
            vec!["docker".to_string()],
            PathBuf::from("/"),
            stdout.to_string(),
            String::new(),
            0,
        )
    }

    #[test]
    fn lines_skips_blank_lines() {
        let result = success("{\"ID\":\"a\"}\n\n{\"ID\":\"b\"}\n");
        let records: Vec<Record> = parse_lines(&result).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
    }

    #[test]
    fn lines_is_pure() {
        let result = success("{\"ID\":\"a\"}\n");
        let first: Vec<Record> = parse_lines(&result).unwrap();
        let second: Vec<Record> = parse_lines(&result).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_line_is_unexpected() {
        let result = success("{\"ID\":\"a\"}\nnot json\n");
        let parsed: Result<Vec<Record>, _> = parse_lines(&result);
        assert!(matches!(parsed, Err(Error::Unexpected(_))));
    }

    #[test]
    fn inspect_one_rejects_empty_array() {
        let result = success("[]");
        let parsed: Result<Record, _> = parse_inspect_one(&result);
        assert!(matches!(parsed, Err(Error::Unexpected(_))));
    }

    #[test]
    fn inspect_one_unwraps_single_record() {
        let result = success("[{\"ID\":\"abc\"}]");
        let record: Record = parse_inspect_one(&result).unwrap();
        assert_eq!(record.id, "abc");
    }

    #[test]
    fn scalar_trims_whitespace() {
        let result = success("  abc123\n");
        assert_eq!(parse_scalar(&result), "abc123");
    }
}
