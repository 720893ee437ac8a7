//! Tree builder: one depth-first walk over the CST, producing an Orf.
//!
//! A builder instance is single-use: it owns exactly one in-progress
//! document and one piece of scoped state (the stage currently under
//! construction). Driving a second walk through the same instance is
//! rejected with [`BuildError::BuilderReused`].

use otto_orf::{Configuration, Orf, Runtime, Setting as OrfSetting, Stage};
use std::collections::BTreeMap;

use crate::cst::{Document, NamedSettings, RuntimeBlock, Setting, StageItem};
use crate::error::BuildError;

/// Strip exactly one leading and one trailing quote from a raw string
/// lexeme. No escape decoding; the DSL defines no escape syntax.
fn unquote(raw: &str) -> String {
    let s = raw.strip_prefix('\'').unwrap_or(raw);
    let s = s.strip_suffix('\'').unwrap_or(s);
    s.to_owned()
}

#[derive(Debug, Default)]
pub struct TreeBuilder {
    orf: Orf,
    /// Single-slot register for the stage under construction. The grammar
    /// does not nest stages, so this never needs to be a stack.
    current_stage: Option<Stage>,
    completed: bool,
    walked: bool,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    /// Walk the document tree once, populating the in-progress Orf.
    ///
    /// Syntax problems never reach this far; the only failures here are
    /// structural invariant violations, which abort immediately.
    pub fn walk(&mut self, document: &Document) -> Result<(), BuildError> {
        if self.walked {
            return Err(BuildError::BuilderReused);
        }
        self.walked = true;

        if let Some(configure) = &document.configure {
            for section in &configure.sections {
                self.exit_named_settings(section);
            }
        }

        // `use` references are recognized by the grammar but not yet
        // materialized into the document's libraries field; that field
        // stays reserved until library loading lands.

        if let Some(pipeline) = &document.pipeline {
            for stage in &pipeline.stages.stages {
                self.enter_stage();
                for item in &stage.items {
                    match item {
                        StageItem::Setting(setting) => self.stage_setting(setting),
                        StageItem::Runtime(runtime) => self.exit_runtime(runtime),
                        // Steps are parsed but not yet carried into the
                        // document; the Orf field stays reserved.
                        StageItem::Steps(_) => {}
                    }
                }
                self.exit_stage()?;
            }
        }

        self.exit_document();
        Ok(())
    }

    /// The finished document, or the canonical empty one if the walk
    /// never completed. A partial build is never observable.
    pub fn into_orf(self) -> Orf {
        if self.completed {
            self.orf
        } else {
            Orf::EMPTY
        }
    }

    /// A named `configure` section becomes one Configuration entry.
    fn exit_named_settings(&mut self, section: &NamedSettings) {
        let mut config = Configuration::default();
        for setting in &section.settings {
            config.insert(&setting.key, OrfSetting::new(unquote(&setting.value)));
        }
        self.orf.add_configuration(&section.name, config);
    }

    fn enter_stage(&mut self) {
        self.current_stage = Some(Stage::default());
    }

    /// Within a stage's direct settings, only `name` is honored today;
    /// other keys are read and discarded.
    fn stage_setting(&mut self, setting: &Setting) {
        if let Some(stage) = self.current_stage.as_mut() {
            if setting.key == "name" {
                stage.name = unquote(&setting.value);
            }
        }
    }

    /// A runtime is always appended to the document; if a stage is under
    /// construction it also receives the new entry's index.
    fn exit_runtime(&mut self, runtime: &RuntimeBlock) {
        let mut settings = BTreeMap::new();
        for setting in &runtime.settings {
            settings.insert(setting.key.clone(), unquote(&setting.value));
        }
        let index = self.orf.add_runtime(Runtime {
            runtime_type: runtime.runtime_type.clone(),
            settings,
        });
        if let Some(stage) = self.current_stage.as_mut() {
            stage.runtime = Some(index);
        }
    }

    /// Commit the stage in the register, dropping anonymous stages.
    ///
    /// Exiting with an empty register means the walk and the grammar have
    /// come apart; that is a defect, not malformed input.
    fn exit_stage(&mut self) -> Result<(), BuildError> {
        let stage = self
            .current_stage
            .take()
            .ok_or(BuildError::UnmatchedStageExit)?;
        if !stage.name.is_empty() {
            self.orf.add_stage(stage);
        }
        Ok(())
    }

    fn exit_document(&mut self) {
        self.completed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCollector;
    use crate::{lexer, parser};
    use otto_orf::RuntimeIndex;

    const MIN_PIPELINE: &str = "pipeline { stages { stage { } } }";

    fn build(src: &str) -> Orf {
        let mut errors = ErrorCollector::new();
        let tokens = lexer::lex(src, &mut errors);
        let document = parser::parse(&tokens, &mut errors);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors.errors());
        let mut builder = TreeBuilder::new();
        builder.walk(&document).expect("walk should succeed");
        builder.into_orf()
    }

    const SIMPLE_PIPELINE: &str = "\
pipeline {
  stages {
    stage {
      name = 'Build'
      runtime {
        docker { image = 'alpine' }
      }
      steps {
        sh 'env'
      }
    }
  }
}";

    #[test]
    fn minimal_pipeline_builds_the_empty_document() {
        let orf = build(MIN_PIPELINE);
        assert_eq!(orf, Orf::EMPTY);
    }

    #[test]
    fn simple_pipeline_is_not_empty() {
        assert_ne!(build(SIMPLE_PIPELINE), Orf::EMPTY);
    }

    #[test]
    fn simple_pipeline_has_a_single_runtime() {
        let orf = build(SIMPLE_PIPELINE);
        assert_eq!(orf.runtimes().len(), 1);
        assert_eq!(orf.runtimes()[0].runtime_type, "docker");
        assert_eq!(
            orf.runtimes()[0].settings.get("image").map(String::as_str),
            Some("alpine")
        );
    }

    #[test]
    fn simple_pipeline_parses_out_the_stages() {
        let orf = build(SIMPLE_PIPELINE);
        assert_eq!(orf.stages().len(), 1);
        assert_eq!(orf.stages()[0].name, "Build");
    }

    #[test]
    fn stage_runtime_refers_to_the_document_entry() {
        let orf = build(SIMPLE_PIPELINE);
        let index = orf.stages()[0].runtime.expect("stage runtime");
        assert_eq!(index, RuntimeIndex(0));
        let runtime = orf.runtime(index).expect("no orphaned attachment");
        assert_eq!(runtime.runtime_type, "docker");
    }

    #[test]
    fn anonymous_stage_is_dropped_but_its_runtime_is_kept() {
        let src = "pipeline { stages { stage { runtime { docker { image = 'alpine' } } } } }";
        let orf = build(src);
        assert!(orf.stages().is_empty());
        assert_eq!(orf.runtimes().len(), 1);
    }

    #[test]
    fn unknown_stage_settings_are_discarded() {
        let src = "pipeline { stages { stage { name = 'Build' flavor = 'grape' } } }";
        let orf = build(src);
        assert_eq!(orf.stages().len(), 1);
        assert_eq!(orf.stages()[0].name, "Build");
    }

    #[test]
    fn quote_stripping_removes_exactly_one_pair() {
        let orf = build("pipeline { stages { stage { name = 'Build' } } }");
        assert_eq!(orf.stages()[0].name, "Build");
    }

    #[test]
    fn configure_sections_are_extracted() {
        let src = format!(
            "configure {{ github {{ account = 'rtyler' endpoint = 'api.github.com' }} }} {}",
            MIN_PIPELINE
        );
        let orf = build(&src);
        let github = orf.configuration().get("github").expect("github section");
        assert_eq!(github.len(), 2);
        let account = github.get("account").expect("account setting");
        assert_eq!(account.value, "rtyler");
        assert!(!account.encrypted);
        assert_eq!(github.get("endpoint").unwrap().value, "api.github.com");
    }

    #[test]
    fn independent_builders_produce_value_equal_documents() {
        assert_eq!(build(SIMPLE_PIPELINE), build(SIMPLE_PIPELINE));
    }

    #[test]
    fn a_builder_cannot_walk_twice() {
        let mut errors = ErrorCollector::new();
        let tokens = lexer::lex(MIN_PIPELINE, &mut errors);
        let document = parser::parse(&tokens, &mut errors);
        let mut builder = TreeBuilder::new();
        builder.walk(&document).expect("first walk");
        assert_eq!(builder.walk(&document), Err(BuildError::BuilderReused));
    }

    #[test]
    fn result_before_completion_is_the_empty_document() {
        let builder = TreeBuilder::new();
        assert_eq!(builder.into_orf(), Orf::EMPTY);
    }

    #[test]
    fn unmatched_stage_exit_is_fatal() {
        let mut builder = TreeBuilder::new();
        assert_eq!(builder.exit_stage(), Err(BuildError::UnmatchedStageExit));
    }
}
