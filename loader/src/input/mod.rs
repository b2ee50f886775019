//! Reading raw fleet records from files.
//!
//! Supported formats:
//!
//! - JSON: an array of records, or a single record object
//! - JSON Lines: one record per line, blank lines skipped
//! - CSV: header row gives the field names, every cell becomes a string
//!
//! Nothing here validates records; a file that decodes is handed to the
//! loader as-is and bad records show up as data errors there.

use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{InputError, InputResult};
use crate::loader::{FleetLoader, IngestReport};
use crate::logs::log_info;

/// Encoding of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Pick from the file extension.
    #[default]
    Auto,
    Json,
    JsonLines,
    Csv,
}

impl FromStr for InputFormat {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" | "json-lines" => Ok(Self::JsonLines),
            "csv" => Ok(Self::Csv),
            other => Err(InputError::UnknownFormat(other.to_string())),
        }
    }
}

impl InputFormat {
    /// Resolve `Auto` from a path's extension.
    pub fn resolve(self, path: &Path) -> InputResult<Self> {
        if self != Self::Auto {
            return Ok(self);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::JsonLines),
            "csv" => Ok(Self::Csv),
            _ => Err(InputError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Read every record from a file.
pub fn read_records(path: &Path, format: InputFormat) -> InputResult<Vec<Value>> {
    match format.resolve(path)? {
        InputFormat::Csv => parse_csv(File::open(path)?),
        InputFormat::JsonLines => parse_json_lines(&std::fs::read_to_string(path)?),
        InputFormat::Json | InputFormat::Auto => parse_json(&std::fs::read_to_string(path)?),
    }
}

/// Parse a JSON document holding one record or an array of records.
pub fn parse_json(content: &str) -> InputResult<Vec<Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(records) => Ok(records),
        record @ Value::Object(_) => Ok(vec![record]),
        other => Err(InputError::UnexpectedShape(json_type(&other).to_string())),
    }
}

/// Parse JSON Lines. Each non-blank line must be valid JSON.
pub fn parse_json_lines(content: &str) -> InputResult<Vec<Value>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<Value>(line).map_err(|source| InputError::JsonLine {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Parse CSV with a header row into string-valued records.
pub fn parse_csv<R: Read>(reader: R) -> InputResult<Vec<Value>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();

    for row in rdr.records() {
        let row = row?;
        let map: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        records.push(Value::Object(map));
    }

    Ok(records)
}

/// Read each file and ingest it into the loader, one batch per file.
pub fn load_paths<P: AsRef<Path>>(
    loader: &mut FleetLoader,
    paths: &[P],
    format: InputFormat,
) -> InputResult<Vec<IngestReport>> {
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        log_info(format!("Reading {}", path.display()));
        let records = read_records(path, format)?;
        reports.push(loader.ingest(&records));
    }
    Ok(reports)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<InputFormat>().unwrap(), InputFormat::Json);
        assert_eq!("ndjson".parse::<InputFormat>().unwrap(), InputFormat::JsonLines);
        assert_eq!("csv".parse::<InputFormat>().unwrap(), InputFormat::Csv);
        assert!("xml".parse::<InputFormat>().is_err());
    }

    #[test]
    fn test_format_resolve() {
        let auto = InputFormat::Auto;
        assert_eq!(auto.resolve(Path::new("fleet.JSON")).unwrap(), InputFormat::Json);
        assert_eq!(auto.resolve(Path::new("fleet.jsonl")).unwrap(), InputFormat::JsonLines);
        assert_eq!(auto.resolve(Path::new("fleet.csv")).unwrap(), InputFormat::Csv);
        assert!(auto.resolve(Path::new("fleet")).is_err());
        assert_eq!(InputFormat::Csv.resolve(Path::new("fleet.txt")).unwrap(), InputFormat::Csv);
    }

    #[test]
    fn test_parse_json_shapes() {
        assert_eq!(parse_json(r#"[{"type":"car"},{"type":"drone"}]"#).unwrap().len(), 2);
        assert_eq!(parse_json(r#"{"type":"car"}"#).unwrap().len(), 1);

        let err = parse_json("42").unwrap_err();
        assert!(matches!(err, InputError::UnexpectedShape(ref s) if s == "a number"));
        assert!(matches!(parse_json("[{").unwrap_err(), InputError::Json(_)));
    }

    #[test]
    fn test_parse_json_lines() {
        let content = "{\"type\":\"car\"}\n\n  \n{\"type\":\"boat\"}\n";
        let records = parse_json_lines(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["type"], "boat");

        let err = parse_json_lines("{\"type\":\"car\"}\nnot json\n").unwrap_err();
        assert!(matches!(err, InputError::JsonLine { line: 2, .. }));
    }

    #[test]
    fn test_parse_csv() {
        let csv = "type,license,model,latLong,miles,make\n\
                   car,ABC1,Civic,\"1,2\",1200,Honda\n\
                   drone,D1,X,,,\n";
        let records = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["latLong"], "1,2");
        assert_eq!(records[0]["miles"], "1200");
        assert_eq!(records[1]["miles"], "");
    }

    #[test]
    fn test_load_paths_json_and_csv() {
        let json = temp_file(
            ".json",
            r#"[
                {"type":"car","license":"ABC1","model":"Civic","latLong":[1,2],"miles":"1200","make":"Honda"},
                {"type":"boat","id":"B1"}
            ]"#,
        );
        let csv = temp_file(
            ".csv",
            "type,license,model,latLong,airTimeHours,base\n\
             drone,D1,Mavic,\"45.5,-73.6\",12,Hangar 7\n",
        );

        let mut loader = FleetLoader::new();
        let reports = load_paths(&mut loader, &[json.path(), csv.path()], InputFormat::Auto).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].cars_added, 1);
        assert_eq!(reports[0].errors_added, 1);
        assert_eq!(reports[1].drones_added, 1);

        let drone = loader.find_drone_by_identifier("D1").unwrap();
        assert_eq!(drone.airtime_hours(), 12.0);
        assert_eq!(drone.position().long, -73.6);
    }

    #[test]
    fn test_load_paths_missing_file() {
        let mut loader = FleetLoader::new();
        let err = load_paths(&mut loader, &["/nonexistent/fleet.json"], InputFormat::Auto).unwrap_err();
        assert!(matches!(err, InputError::Io(_)));
    }
}
