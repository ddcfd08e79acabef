//! Pack loading pipeline: format detection, file discovery, parsing,
//! validation, and resolution into engine challenge values.

use crate::schema::{ChallengeData, ChallengePackData, TestData};
use gatelab_challenge::{Challenge, InputSetup, OutputSetup, TargetFn, TestSpec};
use gatelab_core::graph::Position;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a challenge pack.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// Two challenges in one pack share an id.
    #[error("duplicate challenge id '{id}'")]
    DuplicateId { id: String },

    /// A named function's arity does not match the input layout.
    #[error("challenge '{id}': {function:?} takes {expected} input(s), setup declares {actual}")]
    FunctionArity {
        id: String,
        function: TargetFn,
        expected: &'static str,
        actual: usize,
    },

    /// A named function demands a single output LED.
    #[error("challenge '{id}': function tests need exactly 1 output, setup declares {actual}")]
    FunctionOutputs { id: String, actual: usize },

    /// A truth table's row count does not cover all input assignments.
    #[error("challenge '{id}': truth table needs {expected} rows for {inputs} input(s), found {actual}")]
    TruthTableRows {
        id: String,
        inputs: usize,
        expected: usize,
        actual: usize,
    },

    /// A truth table row's width does not match the output count.
    #[error("challenge '{id}': truth table row {row} has {actual} value(s) for {expected} output(s)")]
    TruthTableWidth {
        id: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported pack file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Scan a directory for a pack file with the given base name.
///
/// Looks for `{base}.ron`, `{base}.toml`, and `{base}.json`. Returns
/// `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if more
/// than one format exists for the same base name.
pub fn find_pack_file(dir: &Path, base: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;
    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }
    Ok(found)
}

// ===========================================================================
// Parsing
// ===========================================================================

/// Parse pack source text in the given format. `origin` is only used for
/// error reporting.
pub fn parse_pack(
    source: &str,
    format: Format,
    origin: &Path,
) -> Result<ChallengePackData, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: origin.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(source).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(source).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(source).map_err(|e| parse_err(e.to_string())),
    }
}

// ===========================================================================
// Resolution
// ===========================================================================

/// Validate a parsed pack and resolve it into engine challenge values.
pub fn resolve_pack(pack: ChallengePackData) -> Result<Vec<Challenge>, DataLoadError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for challenge in &pack.challenges {
        if !seen.insert(&challenge.id) {
            return Err(DataLoadError::DuplicateId {
                id: challenge.id.clone(),
            });
        }
        validate_test(challenge)?;
    }

    Ok(pack.challenges.into_iter().map(resolve_challenge).collect())
}

fn validate_test(challenge: &ChallengeData) -> Result<(), DataLoadError> {
    let id = &challenge.id;
    let inputs = challenge.inputs.len();
    let outputs = challenge.outputs.len();
    match &challenge.test {
        TestData::Function(f) => {
            let arity_ok = match f {
                TargetFn::Not => inputs == 1,
                _ => inputs >= 1,
            };
            if !arity_ok {
                return Err(DataLoadError::FunctionArity {
                    id: id.clone(),
                    function: *f,
                    expected: if matches!(f, TargetFn::Not) {
                        "exactly 1"
                    } else {
                        "at least 1"
                    },
                    actual: inputs,
                });
            }
            if outputs != 1 {
                return Err(DataLoadError::FunctionOutputs {
                    id: id.clone(),
                    actual: outputs,
                });
            }
        }
        TestData::TruthTable(rows) => {
            let expected = 1usize << inputs;
            if rows.len() != expected {
                return Err(DataLoadError::TruthTableRows {
                    id: id.clone(),
                    inputs,
                    expected,
                    actual: rows.len(),
                });
            }
            for (row, values) in rows.iter().enumerate() {
                if values.len() != outputs {
                    return Err(DataLoadError::TruthTableWidth {
                        id: id.clone(),
                        row,
                        expected: outputs,
                        actual: values.len(),
                    });
                }
            }
        }
        TestData::Any => {}
    }
    Ok(())
}

fn resolve_challenge(data: ChallengeData) -> Challenge {
    // Function specs are strict about the number of inputs: the declared
    // layout fixes the arity, as the original challenge predicates did.
    let input_count = data.inputs.len();
    Challenge {
        id: data.id,
        name: data.name,
        description: data.description,
        hint: data.hint,
        sandbox: data.sandbox,
        inputs: data
            .inputs
            .into_iter()
            .map(|i| InputSetup {
                label: i.label,
                value: i.value,
                pos: Position::new(i.x, i.y),
            })
            .collect(),
        outputs: data
            .outputs
            .into_iter()
            .map(|o| OutputSetup {
                label: o.label,
                pos: Position::new(o.x, o.y),
            })
            .collect(),
        test: match data.test {
            TestData::Function(f) => TestSpec::Function {
                target: f,
                arity: input_count,
            },
            TestData::TruthTable(rows) => TestSpec::TruthTable(rows),
            TestData::Any => TestSpec::Any,
        },
    }
}

/// Read, parse, validate, and resolve a pack file.
pub fn load_pack(path: &Path) -> Result<Vec<Challenge>, DataLoadError> {
    let format = detect_format(path)?;
    let source = std::fs::read_to_string(path)?;
    resolve_pack(parse_pack(&source, format, path)?)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gatelab_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const RON_PACK: &str = r#"(
        challenges: [
            (
                id: "not",
                name: "Build NOT",
                description: "Invert input using 1 NAND",
                hint: "Connect both NAND inputs together",
                inputs: [(label: "A", x: 100, y: 150)],
                outputs: [(label: "OUT", x: 500, y: 150)],
                test: function(not),
            ),
            (
                id: "sandbox",
                name: "Free Build",
                sandbox: true,
                inputs: [(label: "A", x: 100, y: 100)],
                outputs: [(label: "OUT", x: 500, y: 100)],
                test: any,
            ),
        ],
    )"#;

    const TOML_PACK: &str = r#"
        [[challenges]]
        id = "and"
        name = "Build AND"
        inputs = [
            { label = "A", x = 80, y = 100 },
            { label = "B", x = 80, y = 220 },
        ]
        outputs = [{ label = "OUT", x = 550, y = 160 }]
        test = { function = "and" }
    "#;

    // -----------------------------------------------------------------------
    // detect_format / find_pack_file
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("pack.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("pack.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("pack.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("pack.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_pack_file_absent_and_present() {
        let dir = make_test_dir("find");
        assert!(find_pack_file(&dir, "pack").unwrap().is_none());

        fs::write(dir.join("pack.ron"), RON_PACK).unwrap();
        let found = find_pack_file(&dir, "pack").unwrap().unwrap();
        assert_eq!(found, dir.join("pack.ron"));
        cleanup(&dir);
    }

    #[test]
    fn find_pack_file_rejects_conflicting_formats() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("pack.ron"), RON_PACK).unwrap();
        fs::write(dir.join("pack.toml"), TOML_PACK).unwrap();
        assert!(matches!(
            find_pack_file(&dir, "pack"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // parse + resolve
    // -----------------------------------------------------------------------

    #[test]
    fn ron_pack_resolves() {
        let pack = parse_pack(RON_PACK, Format::Ron, Path::new("pack.ron")).unwrap();
        let challenges = resolve_pack(pack).unwrap();
        assert_eq!(challenges.len(), 2);
        assert_eq!(challenges[0].id, "not");
        assert!(matches!(
            challenges[0].test,
            TestSpec::Function {
                target: TargetFn::Not,
                arity: 1
            }
        ));
        assert!(challenges[1].sandbox);
        assert_eq!(challenges[0].inputs[0].pos.x, 100.0);
    }

    #[test]
    fn toml_pack_resolves() {
        let pack = parse_pack(TOML_PACK, Format::Toml, Path::new("pack.toml")).unwrap();
        let challenges = resolve_pack(pack).unwrap();
        assert_eq!(challenges.len(), 1);
        assert_eq!(challenges[0].inputs.len(), 2);
        assert!(matches!(
            challenges[0].test,
            TestSpec::Function {
                target: TargetFn::And,
                arity: 2
            }
        ));
    }

    #[test]
    fn json_pack_with_truth_table_resolves() {
        let src = r#"{
            "challenges": [{
                "id": "xor",
                "name": "Build XOR",
                "inputs": [
                    {"label": "A", "x": 80, "y": 100},
                    {"label": "B", "x": 80, "y": 220}
                ],
                "outputs": [{"label": "OUT", "x": 600, "y": 160}],
                "test": {"truth_table": [[false], [true], [true], [false]]}
            }]
        }"#;
        let pack = parse_pack(src, Format::Json, Path::new("pack.json")).unwrap();
        let challenges = resolve_pack(pack).unwrap();
        assert!(matches!(challenges[0].test, TestSpec::TruthTable(_)));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_pack("not a pack", Format::Json, Path::new("bad.json")).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    fn challenge_json(inputs: usize, outputs: usize, test: &str) -> String {
        let ins: Vec<String> = (0..inputs)
            .map(|i| format!(r#"{{"label": "I{i}", "x": 0, "y": 0}}"#))
            .collect();
        let outs: Vec<String> = (0..outputs)
            .map(|i| format!(r#"{{"label": "O{i}", "x": 0, "y": 0}}"#))
            .collect();
        format!(
            r#"{{"challenges": [{{"id": "c", "name": "C",
                "inputs": [{}], "outputs": [{}], "test": {test}}}]}}"#,
            ins.join(","),
            outs.join(","),
        )
    }

    fn resolve_src(src: &str) -> Result<Vec<Challenge>, DataLoadError> {
        resolve_pack(parse_pack(src, Format::Json, Path::new("pack.json")).unwrap())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let src = r#"{"challenges": [
            {"id": "c", "name": "A", "outputs": [{"label": "O", "x": 0, "y": 0}],
             "inputs": [{"label": "I", "x": 0, "y": 0}], "test": {"function": "not"}},
            {"id": "c", "name": "B", "test": "any"}
        ]}"#;
        assert!(matches!(
            resolve_src(src),
            Err(DataLoadError::DuplicateId { .. })
        ));
    }

    #[test]
    fn not_requires_exactly_one_input() {
        let src = challenge_json(2, 1, r#"{"function": "not"}"#);
        assert!(matches!(
            resolve_src(&src),
            Err(DataLoadError::FunctionArity { .. })
        ));
    }

    #[test]
    fn function_tests_require_one_output() {
        let src = challenge_json(2, 2, r#"{"function": "and"}"#);
        assert!(matches!(
            resolve_src(&src),
            Err(DataLoadError::FunctionOutputs { .. })
        ));
    }

    #[test]
    fn truth_table_must_cover_all_assignments() {
        let src = challenge_json(2, 1, r#"{"truth_table": [[false], [true]]}"#);
        assert!(matches!(
            resolve_src(&src),
            Err(DataLoadError::TruthTableRows { expected: 4, .. })
        ));
    }

    #[test]
    fn truth_table_rows_must_match_output_count() {
        let src = challenge_json(1, 1, r#"{"truth_table": [[false], [true, true]]}"#);
        assert!(matches!(
            resolve_src(&src),
            Err(DataLoadError::TruthTableWidth { row: 1, .. })
        ));
    }

    // -----------------------------------------------------------------------
    // load_pack
    // -----------------------------------------------------------------------

    #[test]
    fn load_pack_from_disk() {
        let dir = make_test_dir("load");
        let path = dir.join("pack.ron");
        fs::write(&path, RON_PACK).unwrap();
        let challenges = load_pack(&path).unwrap();
        assert_eq!(challenges.len(), 2);
        cleanup(&dir);
    }

    #[test]
    fn load_pack_missing_file_is_io_error() {
        let err = load_pack(Path::new("/nonexistent/pack.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io(_)));
    }
}
