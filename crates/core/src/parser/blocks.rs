//! Block productions for the Otto grammar.
//!
//! Each production consumes through its closing `}` when it can, records
//! errors in the collector otherwise, and returns `None` for regions that
//! could not be shaped into a node.

use super::Parser;
use crate::cst::{
    ConfigureBlock, Document, NamedSettings, PipelineBlock, RuntimeBlock, Setting, Span,
    StageBlock, StageItem, StagesBlock, StepCall, StepsBlock, UseBlock, UseRef,
};
use crate::lexer::Token;

impl Parser<'_> {
    fn span(&self) -> Span {
        let s = self.cur();
        Span {
            line: s.line,
            column: s.column,
        }
    }

    /// document := configure_block? use_block? pipeline_block
    pub(crate) fn parse_document(&mut self) -> Document {
        let mut doc = Document::default();

        if self.is_word("configure") {
            doc.configure = self.parse_configure();
        }
        if self.is_word("use") {
            doc.uses = self.parse_use();
        }

        if self.is_word("pipeline") {
            doc.pipeline = self.parse_pipeline();
        } else {
            self.error(format!(
                "expected 'pipeline', got {}",
                self.peek().describe()
            ));
            // The document cannot be salvaged without its pipeline block;
            // drain the rest so one missing keyword reports one error.
            while self.peek() != &Token::Eof {
                self.advance();
            }
        }

        if self.peek() != &Token::Eof {
            self.error(format!(
                "expected end of input, got {}",
                self.peek().describe()
            ));
        }

        doc
    }

    /// configure_block := 'configure' '{' named_settings_block* '}'
    fn parse_configure(&mut self) -> Option<ConfigureBlock> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace("configure") {
            return None;
        }

        let mut sections = Vec::new();
        loop {
            match self.peek().clone() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => {
                    self.error("unclosed 'configure' block");
                    break;
                }
                Token::Word(name) => {
                    if let Some(section) = self.parse_named_settings(name) {
                        sections.push(section);
                    }
                }
                other => {
                    self.error(format!(
                        "expected a section name in 'configure', got {}",
                        other.describe()
                    ));
                    self.advance();
                }
            }
        }
        Some(ConfigureBlock { sections, span })
    }

    /// named_settings_block := IDENT '{' settings_block '}'
    fn parse_named_settings(&mut self, name: String) -> Option<NamedSettings> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace(&name) {
            return None;
        }
        let settings = self.parse_settings_block(&name);
        Some(NamedSettings {
            name,
            settings,
            span,
        })
    }

    /// settings_block := setting* -- consumes through the closing '}'.
    fn parse_settings_block(&mut self, context: &str) -> Vec<Setting> {
        let mut settings = Vec::new();
        loop {
            match self.peek().clone() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => {
                    self.error(format!("unclosed '{}' block", context));
                    break;
                }
                Token::Word(key) => match self.parse_setting(key) {
                    Some(setting) => settings.push(setting),
                    None => self.recover_to_rbrace(),
                },
                other => {
                    self.error(format!(
                        "expected a setting in '{}', got {}",
                        context,
                        other.describe()
                    ));
                    self.advance();
                }
            }
        }
        settings
    }

    /// setting := IDENT '=' STRING
    fn parse_setting(&mut self, key: String) -> Option<Setting> {
        let span = self.span();
        self.advance();
        if self.peek() != &Token::Eq {
            self.error(format!(
                "expected '=' after '{}', got {}",
                key,
                self.peek().describe()
            ));
            return None;
        }
        self.advance();
        match self.peek().clone() {
            Token::Str(raw) => {
                self.advance();
                Some(Setting {
                    key,
                    value: raw,
                    span,
                })
            }
            other => {
                self.error(format!(
                    "expected string literal for '{}', got {}",
                    key,
                    other.describe()
                ));
                None
            }
        }
    }

    /// use_block := 'use' '{' (IDENT | STRING)* '}'
    ///
    /// Bare identifiers are restricted to the reserved set (`stdlib`);
    /// quoted strings are accepted as library paths regardless of content.
    fn parse_use(&mut self) -> Option<UseBlock> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace("use") {
            return None;
        }

        let mut refs = Vec::new();
        loop {
            match self.peek().clone() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => {
                    self.error("unclosed 'use' block");
                    break;
                }
                Token::Word(w) => {
                    if w == "stdlib" {
                        refs.push(UseRef::Builtin(w));
                    } else {
                        self.error(format!("unrecognized library identifier '{}'", w));
                    }
                    self.advance();
                }
                Token::Str(raw) => {
                    refs.push(UseRef::Path(raw));
                    self.advance();
                }
                other => {
                    self.error(format!(
                        "expected a library reference in 'use', got {}",
                        other.describe()
                    ));
                    self.advance();
                }
            }
        }
        Some(UseBlock { refs, span })
    }

    /// pipeline_block := 'pipeline' '{' stages_block '}'
    fn parse_pipeline(&mut self) -> Option<PipelineBlock> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace("pipeline") {
            return None;
        }

        let stages = if self.is_word("stages") {
            self.parse_stages()
        } else {
            self.error(format!("expected 'stages', got {}", self.peek().describe()));
            self.recover_to_rbrace();
            None
        };

        self.expect_rbrace("pipeline");
        stages.map(|stages| PipelineBlock { stages, span })
    }

    /// stages_block := 'stages' '{' stage_block+ '}'
    fn parse_stages(&mut self) -> Option<StagesBlock> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace("stages") {
            return None;
        }

        let mut stages = Vec::new();
        loop {
            match self.peek().clone() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => {
                    self.error("unclosed 'stages' block");
                    break;
                }
                Token::Word(w) if w == "stage" => {
                    if let Some(stage) = self.parse_stage() {
                        stages.push(stage);
                    }
                }
                other => {
                    self.error(format!(
                        "expected a 'stage' block, got {}",
                        other.describe()
                    ));
                    self.advance();
                }
            }
        }

        if stages.is_empty() {
            self.error("expected at least one 'stage' block in 'stages'");
        }
        Some(StagesBlock { stages, span })
    }

    /// stage_block := 'stage' '{' (settings_block | runtime_block | steps_block)* '}'
    fn parse_stage(&mut self) -> Option<StageBlock> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace("stage") {
            return None;
        }

        let mut items = Vec::new();
        loop {
            match self.peek().clone() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => {
                    self.error("unclosed 'stage' block");
                    break;
                }
                Token::Word(w) if w == "runtime" => match self.parse_runtime() {
                    Some(runtime) => items.push(StageItem::Runtime(runtime)),
                    None => self.recover_to_rbrace(),
                },
                Token::Word(w) if w == "steps" => match self.parse_steps() {
                    Some(steps) => items.push(StageItem::Steps(steps)),
                    None => self.recover_to_rbrace(),
                },
                Token::Word(key) => match self.parse_setting(key) {
                    Some(setting) => items.push(StageItem::Setting(setting)),
                    None => self.recover_to_rbrace(),
                },
                other => {
                    self.error(format!(
                        "expected a setting, 'runtime' or 'steps' in 'stage', got {}",
                        other.describe()
                    ));
                    self.advance();
                }
            }
        }
        Some(StageBlock { items, span })
    }

    /// runtime_block := 'runtime' '{' IDENT '{' settings_block '}' '}'
    fn parse_runtime(&mut self) -> Option<RuntimeBlock> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace("runtime") {
            return None;
        }

        let runtime_type = match self.peek().clone() {
            Token::Word(w) => {
                self.advance();
                w
            }
            other => {
                self.error(format!(
                    "expected a runtime type identifier, got {}",
                    other.describe()
                ));
                return None;
            }
        };

        if !self.expect_lbrace(&runtime_type) {
            return None;
        }
        let settings = self.parse_settings_block(&runtime_type);
        self.expect_rbrace("runtime");
        Some(RuntimeBlock {
            runtime_type,
            settings,
            span,
        })
    }

    /// steps_block := 'steps' '{' step* '}' where step := IDENT STRING
    fn parse_steps(&mut self) -> Option<StepsBlock> {
        let span = self.span();
        self.advance();
        if !self.expect_lbrace("steps") {
            return None;
        }

        let mut steps = Vec::new();
        loop {
            match self.peek().clone() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => {
                    self.error("unclosed 'steps' block");
                    break;
                }
                Token::Word(symbol) => {
                    let step_span = self.span();
                    self.advance();
                    match self.peek().clone() {
                        Token::Str(raw) => {
                            self.advance();
                            steps.push(StepCall {
                                symbol,
                                arg: raw,
                                span: step_span,
                            });
                        }
                        other => {
                            self.error(format!(
                                "expected string argument for step '{}', got {}",
                                symbol,
                                other.describe()
                            ));
                        }
                    }
                }
                other => {
                    self.error(format!(
                        "expected a step invocation, got {}",
                        other.describe()
                    ));
                    self.advance();
                }
            }
        }
        Some(StepsBlock { steps, span })
    }
}
