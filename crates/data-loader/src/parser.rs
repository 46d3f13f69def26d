//! Parser for the population data files.
//!
//! - users.dat: id::name::age::latitude::longitude::tags (tags `|`-separated)
//! - embeddings.dat: id::v1,v2,...,vn
//!
//! Blank lines are skipped. Every error names the file and the 1-based line.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs;
use std::path::Path;

const USERS_FILE: &str = "users.dat";
const EMBEDDINGS_FILE: &str = "embeddings.dat";

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::Parse {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

fn parse_field<T>(file: &str, line: usize, field: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| parse_error(file, line, format!("Invalid {}: {}", field, e)))
}

/// Split a `|`-separated tag list, dropping empty entries
pub fn parse_tags(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse one users.dat line
fn parse_user_line(line: &str, line_no: usize) -> Result<User> {
    let parts: Vec<&str> = line.split("::").collect();
    // The tag column is optional so a trailing empty field may be dropped by editors
    if parts.len() != 5 && parts.len() != 6 {
        return Err(DataLoadError::FieldCount {
            file: USERS_FILE.to_string(),
            expected: 6,
            found: parts.len(),
            line: line_no,
        });
    }

    let name = parts[1].trim();
    if name.is_empty() {
        return Err(parse_error(USERS_FILE, line_no, "Missing name"));
    }
    // `|` separates list entries in the output table
    if name.contains('|') {
        return Err(parse_error(USERS_FILE, line_no, "Name must not contain '|'"));
    }

    Ok(User {
        id: parse_field(USERS_FILE, line_no, "id", parts[0])?,
        name: name.to_string(),
        age: parse_field(USERS_FILE, line_no, "age", parts[2])?,
        latitude: parse_field(USERS_FILE, line_no, "latitude", parts[3])?,
        longitude: parse_field(USERS_FILE, line_no, "longitude", parts[4])?,
        interests: parts.get(5).map(|t| parse_tags(t)).unwrap_or_default(),
        embedding: Vec::new(),
    })
}

/// Parse the users.dat file
pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    let lines = read_lines(path)?;
    let mut users = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        users.push(parse_user_line(line_trimmed, idx + 1)?);
    }

    Ok(users)
}

/// Parse one embeddings.dat line into `(id, vector)`
fn parse_embedding_line(line: &str, line_no: usize) -> Result<(UserId, Embedding)> {
    let (id, values) = line
        .split_once("::")
        .ok_or_else(|| parse_error(EMBEDDINGS_FILE, line_no, "Missing vector"))?;

    let id: UserId = parse_field(EMBEDDINGS_FILE, line_no, "id", id)?;
    let embedding = values
        .split(',')
        .map(|v| parse_field::<f32>(EMBEDDINGS_FILE, line_no, "component", v))
        .collect::<Result<Embedding>>()?;

    Ok((id, embedding))
}

/// Parse the embeddings.dat file
pub fn parse_embeddings(path: &Path) -> Result<Vec<(UserId, Embedding)>> {
    let lines = read_lines(path)?;
    let mut embeddings = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        embeddings.push(parse_embedding_line(line_trimmed, idx + 1)?);
    }

    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_line() {
        let user = parse_user_line("0::Jana::27::48.1486::17.1077::hiking|Jazz", 1).unwrap();
        assert_eq!(user.id, 0);
        assert_eq!(user.name, "Jana");
        assert_eq!(user.age, 27.0);
        assert!((user.latitude - 48.1486).abs() < 1e-9);
        assert_eq!(user.interests, vec!["hiking", "Jazz"]);
        assert!(user.embedding.is_empty());
    }

    #[test]
    fn test_parse_user_line_without_tags() {
        let user = parse_user_line("3::Peter::41::49.19::16.60", 7).unwrap();
        assert!(user.interests.is_empty());
    }

    #[test]
    fn test_parse_user_line_errors() {
        let err = parse_user_line("0::Jana::27", 4).unwrap_err();
        assert!(matches!(err, DataLoadError::FieldCount { found: 3, line: 4, .. }));

        let err = parse_user_line("0::Jana::old::48.1::17.1::", 9).unwrap_err();
        match err {
            DataLoadError::Parse { line, reason, .. } => {
                assert_eq!(line, 9);
                assert!(reason.contains("age"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" a | b||c "), vec!["a", "b", "c"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_parse_embedding_line() {
        let (id, v) = parse_embedding_line("12::0.5, -1.0,2", 1).unwrap();
        assert_eq!(id, 12);
        assert_eq!(v, vec![0.5, -1.0, 2.0]);

        assert!(parse_embedding_line("12", 2).is_err());
        assert!(parse_embedding_line("12::0.5,x", 3).is_err());
    }

    #[test]
    fn test_name_with_list_separator_rejected() {
        let err = parse_user_line("3::Anna|Maria::25::48.16::17.05::", 2).unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_users(Path::new("/definitely/not/here/users.dat")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
