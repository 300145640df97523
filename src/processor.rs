//! # File Processing
//!
//! Reads a workbook, extracts its facts and saves them as a JSON array named after the
//! workbook, so that later callers can load them back by the workbook's file name.
use crate::facts::extract_facts;
use crate::inference::Heuristics;
use crate::spreadsheet::read_worksheet;
use crate::spreadsheet::Criteria;
use anyhow::Context;
use anyhow::Result;
use glob::Pattern;
use log::debug;
use log::info;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating saved facts.
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Facts for '{0}' not found at '{1}'")]
    FactsNotFound(String, String),

    #[error("'{0}' has no file stem")]
    MissingFileStem(String),
}

/// Path of the saved facts for an input file name: `<output_dir>/<stem>.json`.
pub fn facts_path(output_dir: &Path, file_name: &str) -> Result<PathBuf, ProcessorError> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ProcessorError::MissingFileStem(file_name.to_owned()))?;
    Ok(output_dir.join(format!("{}.json", stem)))
}

/// Extracts the facts of `input` and writes them to `<output_dir>/<input stem>.json`.
///
/// Returns the path of the written file.
pub fn process_file(input: &Path, output_dir: &Path, heuristics: &Heuristics, criteria: &Criteria) -> Result<PathBuf> {
    let name = input.display().to_string();
    let sheet = read_worksheet(input, criteria).with_context(|| name.clone())?;
    let facts = extract_facts(&sheet, heuristics).with_context(|| name.clone())?;

    let file_name = input
        .file_name()
        .and_then(|file_name| file_name.to_str())
        .ok_or_else(|| ProcessorError::MissingFileStem(name.clone()))?;
    let output = facts_path(output_dir, file_name)?;
    save_facts(&output, &facts).with_context(|| output.display().to_string())?;
    info!("{}: wrote {} fact(s) to {}", name, facts.len(), output.display());
    Ok(output)
}

/// Processes every file of `input_dir` whose name matches `pattern`, in name order.
pub fn process_directory(
    input_dir: &Path,
    pattern: &str,
    output_dir: &Path,
    heuristics: &Heuristics,
    criteria: &Criteria,
) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern).with_context(|| pattern.to_owned())?;
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(input_dir).with_context(|| input_dir.display().to_string())? {
        let path = entry?.path();
        let matched = path
            .file_name()
            .and_then(|file_name| file_name.to_str())
            .is_some_and(|file_name| pattern.matches(file_name));
        if matched && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    debug!("{}: {} file(s) match '{}'", input_dir.display(), inputs.len(), pattern);

    inputs
        .iter()
        .map(|input| process_file(input, output_dir, heuristics, criteria))
        .collect()
}

/// Writes facts as a JSON array indented by four spaces.
pub fn save_facts(output: &Path, facts: &[String]) -> Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(output)?);
    let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    serde::Serialize::serialize(facts, &mut serializer)?;
    writer.flush()?;
    Ok(())
}

/// Loads the facts saved for the input file `file_name`.
pub fn load_facts(output_dir: &Path, file_name: &str) -> Result<Vec<String>> {
    let path = facts_path(output_dir, file_name)?;
    if !path.is_file() {
        Err(ProcessorError::FactsNotFound(file_name.to_owned(), path.display().to_string()))?
    }
    let reader = BufReader::new(File::open(&path)?);
    let facts = serde_json::from_reader(reader).with_context(|| path.display().to_string())?;
    Ok(facts)
}

/// Loads the saved facts of several input files, failing on the first one missing.
pub fn load_all_facts<S: AsRef<str>>(output_dir: &Path, file_names: &[S]) -> Result<Vec<Vec<String>>> {
    file_names
        .iter()
        .map(|file_name| load_facts(output_dir, file_name.as_ref()))
        .collect()
}
