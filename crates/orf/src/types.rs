//! Orf document types.
//!
//! These are produced by the tree builder in otto-core and consumed by
//! downstream components. The document is append-only during a single
//! build pass and treated as immutable once the builder hands it back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ORF_VERSION;

// ──────────────────────────────────────────────
// Libraries
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryType {
    /// A library shipped with the system, referenced by bare name.
    Builtin,
    /// A library referenced by a quoted path.
    FileReference,
}

/// A library the pipeline asks to have loaded at runtime.
///
/// Declared in the schema but not yet populated by the builder; reserved
/// for future `use` block processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub library_type: LibraryType,
    pub library_ref: String,
}

// ──────────────────────────────────────────────
// Configuration
// ──────────────────────────────────────────────

/// A single key's value inside a configuration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Whether the value is stored encrypted. The builder never sets this
    /// today; the field exists for components that layer secrets on top.
    #[serde(default)]
    pub encrypted: bool,
    pub value: String,
}

impl Setting {
    pub fn new(value: impl Into<String>) -> Self {
        Setting {
            encrypted: false,
            value: value.into(),
        }
    }
}

/// A named group of settings under `configure`, e.g. `github { ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    settings: BTreeMap<String, Setting>,
}

impl Configuration {
    pub fn insert(&mut self, key: impl Into<String>, setting: Setting) {
        self.settings.insert(key.into(), setting);
    }

    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.settings.get(key)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Setting)> {
        self.settings.iter()
    }
}

// ──────────────────────────────────────────────
// Runtimes
// ──────────────────────────────────────────────

/// The execution environment a stage runs under, e.g. `docker` with an
/// `image` setting. The type identifier is not validated against a known
/// set at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runtime {
    pub runtime_type: String,
    pub settings: BTreeMap<String, String>,
}

/// Position of a [`Runtime`] in the document's `runtimes` sequence.
///
/// Stages refer to their runtime by index rather than by a shared object,
/// so "the stage's runtime is the same entry as in the document" is an
/// index equality check and survives serialization unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeIndex(pub usize);

// ──────────────────────────────────────────────
// Stages
// ──────────────────────────────────────────────

/// Placeholder for a single unit of work within a stage. Schema-complete;
/// the builder does not populate steps yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {}

/// Placeholder for a captured file artifact. Schema-complete; unpopulated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCapture {}

/// A named unit of pipeline work.
///
/// `before`/`after`, `steps`, `capture`, and `restore` are reserved fields
/// carried for schema completeness; the builder leaves them empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub runtime: Option<RuntimeIndex>,
    pub steps: Vec<Step>,
    pub capture: BTreeMap<String, FileCapture>,
    pub restore: Vec<String>,
}

// ──────────────────────────────────────────────
// The document
// ──────────────────────────────────────────────

/// Orf is the Otto Representation Format: the parsed and serialized form
/// of a `.otto` file.
///
/// Collections are append-only during a single build pass; `version` never
/// changes after construction. Callers receive the document by value and
/// must not need to mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orf {
    version: u32,
    libraries: Vec<Library>,
    configuration: BTreeMap<String, Configuration>,
    runtimes: Vec<Runtime>,
    stages: Vec<Stage>,
}

impl Orf {
    /// The canonical empty document. A plain `const` value: every use site
    /// gets its own copy, so nothing can mutate a shared sentinel.
    pub const EMPTY: Orf = Orf {
        version: ORF_VERSION,
        libraries: Vec::new(),
        configuration: BTreeMap::new(),
        runtimes: Vec::new(),
        stages: Vec::new(),
    };

    pub fn new() -> Self {
        Orf::EMPTY
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn configuration(&self) -> &BTreeMap<String, Configuration> {
        &self.configuration
    }

    pub fn runtimes(&self) -> &[Runtime] {
        &self.runtimes
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Append a library, preserving declaration order.
    pub fn add_library(&mut self, library: Library) {
        self.libraries.push(library);
    }

    /// Register a named configuration section. A later section with the
    /// same name replaces the earlier one.
    pub fn add_configuration(&mut self, name: impl Into<String>, config: Configuration) {
        self.configuration.insert(name.into(), config);
    }

    /// Append a runtime and return its position in the document.
    pub fn add_runtime(&mut self, runtime: Runtime) -> RuntimeIndex {
        self.runtimes.push(runtime);
        RuntimeIndex(self.runtimes.len() - 1)
    }

    /// Append a stage, preserving declaration order.
    pub fn add_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Resolve a stage's runtime reference against the document.
    pub fn runtime(&self, index: RuntimeIndex) -> Option<&Runtime> {
        self.runtimes.get(index.0)
    }
}

impl Default for Orf {
    fn default() -> Self {
        Orf::EMPTY
    }
}
