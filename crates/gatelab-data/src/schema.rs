//! Serde structs for the on-disk challenge pack format.
//!
//! These mirror the file layout one-to-one; the loader resolves them into
//! engine types after validation. Unknown target-function names fail at
//! deserialization (the `TargetFn` enum is the closed set of names).

use gatelab_challenge::TargetFn;
use serde::Deserialize;

/// Top level of a pack file.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengePackData {
    pub challenges: Vec<ChallengeData>,
}

/// One challenge definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub sandbox: bool,
    #[serde(default)]
    pub inputs: Vec<InputSetupData>,
    #[serde(default)]
    pub outputs: Vec<OutputSetupData>,
    pub test: TestData,
}

/// An input switch in a challenge layout.
#[derive(Debug, Clone, Deserialize)]
pub struct InputSetupData {
    pub label: String,
    #[serde(default)]
    pub value: bool,
    pub x: f32,
    pub y: f32,
}

/// An output LED in a challenge layout.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSetupData {
    pub label: String,
    pub x: f32,
    pub y: f32,
}

/// Declarative test specification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestData {
    /// A named single-output boolean function of the inputs.
    Function(TargetFn),
    /// Expected outputs per assignment, row index = LSB-first bit pattern.
    TruthTable(Vec<Vec<bool>>),
    /// Always satisfied (sandbox packs).
    Any,
}
