//! Taxonomy import and lookup.
//!
//! Terms are described as delimited paths: `group|termset|term|subterm…`.

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::api::{ClientContext, LocalInputFault, ObjectId};

pub const DEFAULT_LCID: u32 = 1033;
pub const DEFAULT_DELIMITER: &str = "|";

/// Import term paths into the default term store. Each line creates (or
/// reuses) its group, term set and term chain; one round trip per line.
/// Returns the number of lines imported.
pub async fn import_terms(
    ctx: &mut ClientContext,
    lines: &[String],
    lcid: u32,
    delimiter: &str,
) -> Result<usize> {
    let mut imported = 0;
    for line in lines {
        let segments = parse_term_path(line, delimiter)?;
        let store = ctx.term_store();
        let group = ctx.ensure_term_group(store, segments[0].clone());
        let mut parent = ctx.ensure_term_set(group, segments[1].clone(), lcid);
        for name in &segments[2..] {
            parent = ctx.ensure_term(parent, name.clone(), lcid);
        }
        ctx.execute_query().await?;
        imported += 1;
    }
    info!("Imported {} term path(s)", imported);
    Ok(imported)
}

/// Import term paths from a file with one path per line. Blank lines are
/// skipped; a missing file is a local input fault.
pub async fn import_terms_from_file(
    ctx: &mut ClientContext,
    path: &Path,
    lcid: u32,
    delimiter: &str,
) -> Result<usize> {
    if !path.exists() {
        return Err(LocalInputFault::MissingFile(path.to_path_buf()).into());
    }
    let lines: Vec<String> = std::fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect();
    import_terms(ctx, &lines, lcid, delimiter).await
}

/// Resolve a term path to a handle on the leaf item (group, set or term).
/// Resolution faults remotely when any segment does not exist.
pub async fn get_taxonomy_item_by_path(
    ctx: &mut ClientContext,
    term_path: &str,
    delimiter: &str,
) -> Result<ObjectId> {
    let segments = split_non_empty(term_path, delimiter)?;
    let store = ctx.term_store();
    let mut handle = ctx.term_group_ref(store, segments[0].clone());
    if let Some(set_name) = segments.get(1) {
        handle = ctx.term_set_ref(handle, set_name.clone());
        for name in &segments[2..] {
            handle = ctx.term_ref(handle, name.clone());
        }
    }
    ctx.load(handle, &["Name", "Id"]);
    ctx.execute_query().await?;
    Ok(handle)
}

/// Split and validate one import line: at least group and term set, no
/// empty segments.
fn parse_term_path(line: &str, delimiter: &str) -> Result<Vec<String>> {
    let segments = split_non_empty(line, delimiter)?;
    if segments.len() < 2 {
        return Err(LocalInputFault::EmptyParameter("termset").into());
    }
    Ok(segments)
}

fn split_non_empty(path: &str, delimiter: &str) -> Result<Vec<String>> {
    if path.trim().is_empty() {
        return Err(LocalInputFault::EmptyParameter("term").into());
    }
    let segments: Vec<String> = path.split(delimiter).map(|s| s.trim().to_string()).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(LocalInputFault::EmptyParameter("term").into());
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term_path() {
        assert_eq!(
            parse_term_path("Company|Locations|Stockholm", "|").unwrap(),
            vec!["Company", "Locations", "Stockholm"]
        );
    }

    #[test]
    fn test_parse_rejects_group_only() {
        assert!(parse_term_path("Company", "|").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(parse_term_path("Company||Stockholm", "|").is_err());
        assert!(parse_term_path("", "|").is_err());
    }

    #[test]
    fn test_custom_delimiter() {
        assert_eq!(
            parse_term_path("Company;Locations", ";").unwrap(),
            vec!["Company", "Locations"]
        );
    }
}
