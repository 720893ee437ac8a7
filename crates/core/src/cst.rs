//! Concrete syntax tree for the Otto pipeline DSL.
//!
//! Node kinds are closed enums matched exhaustively; there is no runtime
//! type inspection anywhere in the walk. Every node keeps the position of
//! its opening token so later passes can report against the source.

/// Position of a node's opening token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

/// A whole `.otto` source file.
///
/// Any of the blocks may be absent when the input was malformed; the
/// parser still returns the partial tree it managed to build.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub configure: Option<ConfigureBlock>,
    pub uses: Option<UseBlock>,
    pub pipeline: Option<PipelineBlock>,
}

/// `configure { github { ... } ... }`
#[derive(Debug, Clone)]
pub struct ConfigureBlock {
    pub sections: Vec<NamedSettings>,
    pub span: Span,
}

/// One named section inside `configure`, e.g. `github { account = '...' }`.
#[derive(Debug, Clone)]
pub struct NamedSettings {
    pub name: String,
    pub settings: Vec<Setting>,
    pub span: Span,
}

/// `use { stdlib 'some/path' }`
#[derive(Debug, Clone)]
pub struct UseBlock {
    pub refs: Vec<UseRef>,
    pub span: Span,
}

/// A single entry in a `use` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseRef {
    /// A bare identifier from the reserved set (currently only `stdlib`).
    Builtin(String),
    /// A quoted path; accepted regardless of content.
    Path(String),
}

/// `pipeline { stages { ... } }`
#[derive(Debug, Clone)]
pub struct PipelineBlock {
    pub stages: StagesBlock,
    pub span: Span,
}

/// `stages { stage { ... } ... }`
#[derive(Debug, Clone)]
pub struct StagesBlock {
    pub stages: Vec<StageBlock>,
    pub span: Span,
}

/// `stage { ... }` -- its body is an arbitrary mix of settings, runtime
/// and steps blocks, kept in source order.
#[derive(Debug, Clone)]
pub struct StageBlock {
    pub items: Vec<StageItem>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StageItem {
    Setting(Setting),
    Runtime(RuntimeBlock),
    Steps(StepsBlock),
}

/// `runtime { docker { image = 'alpine' } }`
#[derive(Debug, Clone)]
pub struct RuntimeBlock {
    pub runtime_type: String,
    pub settings: Vec<Setting>,
    pub span: Span,
}

/// `steps { sh 'env' ... }`
#[derive(Debug, Clone)]
pub struct StepsBlock {
    pub steps: Vec<StepCall>,
    pub span: Span,
}

/// A step invocation: a symbol and its single quoted argument.
#[derive(Debug, Clone)]
pub struct StepCall {
    pub symbol: String,
    /// Raw quoted lexeme, unquoted by whoever consumes it.
    pub arg: String,
    pub span: Span,
}

/// `key = 'value'` -- the value is the raw quoted lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub span: Span,
}
