//! # Sticker Wizard
//!
//! The ordered step table and the handler for each step. A handler either
//! prompts, rejects the input with an explanation, or stores the parsed value
//! and moves on by dispatching the next step without input, so a single user
//! message can produce the confirmation of one step and the prompt of the next.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use uuid::Uuid;

use crate::application::renderer::Renderer;
use crate::application::session::Session;
use crate::application::validators;
use crate::domain::catalog::{ColorCatalog, FontCatalog};
use crate::domain::error::{WizardError, WizardResult};
use crate::domain::types::{Directive, Keyboard, MediaSource, RenderSpec, Rgb, StickerDraft};
use crate::strings::{logs, messages};

/// Commands that move through the wizard instead of answering a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCommand {
    NextStep,
    StepBack,
}

impl ServiceCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "next_step" => Some(Self::NextStep),
            "step_back" => Some(Self::StepBack),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NextStep => "next_step",
            Self::StepBack => "step_back",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SetText,
    SetBackgroundColor,
    SetFont,
    SetFontColor,
    SetSplitPattern,
    Render,
    Finalize,
}

/// Wizard order. A session's step index points into this table.
pub const STEPS: [Step; 7] = [
    Step::SetText,
    Step::SetBackgroundColor,
    Step::SetFont,
    Step::SetFontColor,
    Step::SetSplitPattern,
    Step::Render,
    Step::Finalize,
];

pub const FIRST_STEP: usize = 0;
pub const LAST_STEP: usize = STEPS.len() - 1;

impl Step {
    pub fn at(index: usize) -> Step {
        STEPS[index.min(LAST_STEP)]
    }

    pub fn index(self) -> usize {
        STEPS.iter().position(|s| *s == self).unwrap_or(FIRST_STEP)
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::SetText => "set_text",
            Step::SetBackgroundColor => "set_background_color",
            Step::SetFont => "set_font",
            Step::SetFontColor => "set_font_color",
            Step::SetSplitPattern => "set_splitting_numbers",
            Step::Render => "send_sticker",
            Step::Finalize => "send_png_sticker",
        }
    }
}

/// Step index after applying `command`, clamped to the table.
pub fn shifted_index(current: usize, command: ServiceCommand) -> usize {
    match command {
        ServiceCommand::NextStep => (current + 1).min(LAST_STEP),
        ServiceCommand::StepBack => current.saturating_sub(1).max(FIRST_STEP),
    }
}

/// Everything the wizard needs besides the session itself.
pub struct WizardSettings {
    pub colors: ColorCatalog,
    pub fonts: FontCatalog,
    pub font_example: Option<MediaSource>,
    pub content_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

pub struct StepMachine {
    settings: WizardSettings,
    renderer: Renderer,
}

impl StepMachine {
    pub fn new(settings: WizardSettings, renderer: Renderer) -> Self {
        Self { settings, renderer }
    }

    pub fn default_draft(&self) -> StickerDraft {
        StickerDraft::new(self.settings.fonts.default_font())
    }

    /// Runs the handler of the session's current step.
    ///
    /// `None` input enters the step and emits its prompt.
    pub fn dispatch(&self, session: &mut Session, input: Option<&str>) -> Vec<Directive> {
        tracing::debug!(
            "Wizard step '{}' input={:?}",
            session.current_step().name(),
            input
        );
        match session.current_step() {
            Step::SetText => self.set_text(session, input),
            Step::SetBackgroundColor => self.set_color(
                session,
                input,
                messages::SET_BACKGROUND_COLOR_PROMPT,
                |draft, rgb| draft.background_color = rgb,
            ),
            Step::SetFont => self.set_font(session, input),
            Step::SetFontColor => self.set_color(
                session,
                input,
                messages::SET_FONT_COLOR_PROMPT,
                |draft, rgb| draft.font_color = rgb,
            ),
            Step::SetSplitPattern => self.set_split_pattern(session, input),
            Step::Render => self.render(session),
            Step::Finalize => self.finalize(session, input),
        }
    }

    fn shift(&self, session: &mut Session, command: ServiceCommand) -> Vec<Directive> {
        session.step = shifted_index(session.step, command);
        self.dispatch(session, None)
    }

    fn advance(&self, session: &mut Session) -> Vec<Directive> {
        self.shift(session, ServiceCommand::NextStep)
    }

    fn set_text(&self, session: &mut Session, input: Option<&str>) -> Vec<Directive> {
        let Some(input) = input else {
            return vec![Directive::text(messages::SET_TEXT_PROMPT)];
        };
        if let Err(e) = validators::validate_text(input) {
            return vec![Directive::text(e.to_string())];
        }

        session.draft.text = Some(input.to_string());
        session.draft.split_pattern = None;
        self.advance(session)
    }

    fn set_color(
        &self,
        session: &mut Session,
        input: Option<&str>,
        prompt: &str,
        apply: fn(&mut StickerDraft, Rgb),
    ) -> Vec<Directive> {
        let keyboard = Keyboard::ColorNames(self.settings.colors.names());
        let Some(input) = input else {
            return vec![Directive::text_with(prompt, keyboard)];
        };
        if let Some(command) = ServiceCommand::parse(input) {
            return self.shift(session, command);
        }

        match validators::parse_color(input, &self.settings.colors) {
            Ok(rgb) => {
                apply(&mut session.draft, rgb);
                self.advance(session)
            }
            Err(e) => vec![Directive::text_with(e.to_string(), keyboard)],
        }
    }

    fn set_font(&self, session: &mut Session, input: Option<&str>) -> Vec<Directive> {
        let fonts = &self.settings.fonts;
        let keyboard = Keyboard::FontIndices {
            min: fonts.min_index(),
            max: fonts.max_index(),
        };
        let Some(input) = input else {
            let prompt = match &self.settings.font_example {
                Some(source) => Directive::Photo {
                    source: source.clone(),
                    caption: Some(messages::SET_FONT_PROMPT.to_string()),
                    keyboard,
                },
                None => Directive::text_with(messages::SET_FONT_PROMPT, keyboard),
            };
            return vec![prompt];
        };
        if let Some(command) = ServiceCommand::parse(input) {
            return self.shift(session, command);
        }

        match validators::parse_font_index(input, fonts) {
            Ok(font) => {
                session.draft.font = font.to_string();
                self.advance(session)
            }
            Err(e) => vec![Directive::text_with(e.to_string(), keyboard)],
        }
    }

    fn set_split_pattern(&self, session: &mut Session, input: Option<&str>) -> Vec<Directive> {
        let Some(text) = session.draft.text.as_deref() else {
            return self.abort(WizardError::MissingDraftField("text"));
        };
        let default = validators::default_split_pattern(text);
        let pattern = session
            .draft
            .split_pattern
            .get_or_insert(default)
            .clone();

        let Some(input) = input else {
            if pattern.len() == 1 {
                return self.advance(session);
            }
            let words = pattern.iter().map(|n| *n as usize).sum();
            return vec![Directive::text(messages::set_split_pattern_prompt(
                &validators::format_split_pattern(&pattern),
                words,
            ))];
        };
        if let Some(command) = ServiceCommand::parse(input) {
            return self.shift(session, command);
        }

        match validators::parse_split_pattern(input, &pattern) {
            Ok(parsed) => {
                session.draft.split_pattern = Some(parsed);
                self.advance(session)
            }
            Err(e) => vec![Directive::text(e.to_string())],
        }
    }

    /// Non-interactive: renders, stores the file and moves to the final question.
    fn render(&self, session: &mut Session) -> Vec<Directive> {
        if let Some(previous) = session.artifact.take() {
            let _ = std::fs::remove_file(previous);
        }

        match self.render_artifact(session) {
            Ok(path) => {
                session.artifact = Some(path.clone());
                session.step = shifted_index(session.step, ServiceCommand::NextStep);
                vec![
                    Directive::Photo {
                        source: MediaSource::Local(path),
                        caption: None,
                        keyboard: Keyboard::None,
                    },
                    Directive::text_with(messages::SEND_PNG_PROMPT, Keyboard::YesNo),
                ]
            }
            Err(e) => self.abort(e),
        }
    }

    fn render_artifact(&self, session: &Session) -> WizardResult<PathBuf> {
        let draft = &session.draft;
        let text = draft
            .text
            .as_deref()
            .ok_or(WizardError::MissingDraftField("text"))?;
        let pattern = draft
            .split_pattern
            .as_deref()
            .ok_or(WizardError::MissingDraftField("split pattern"))?;

        let spec = RenderSpec {
            lines: validators::split_into_lines(text, pattern),
            font: draft.font.clone(),
            font_color: draft.font_color,
            background_color: draft.background_color,
            width: self.settings.width,
            height: self.settings.height,
        };
        let image = self
            .renderer
            .render(&spec)
            .map_err(|e| WizardError::RenderFailed(e.to_string()))?;

        std::fs::create_dir_all(&self.settings.content_dir)
            .map_err(|e| WizardError::RenderFailed(e.to_string()))?;
        let path = self
            .settings
            .content_dir
            .join(artifact_file_name(session.created));
        image
            .save(&path)
            .map_err(|e| WizardError::RenderFailed(e.to_string()))?;

        tracing::info!("{}", logs::sticker_saved(&path.display().to_string()));
        Ok(path)
    }

    fn finalize(&self, session: &mut Session, input: Option<&str>) -> Vec<Directive> {
        let yes_no_prompt = || Directive::text_with(messages::SEND_PNG_PROMPT, Keyboard::YesNo);
        let Some(input) = input else {
            return vec![yes_no_prompt()];
        };

        let answer = match ServiceCommand::parse(input) {
            Some(ServiceCommand::StepBack) => {
                return vec![Directive::text(
                    WizardError::UnsupportedCommandAtStep.to_string(),
                )];
            }
            Some(ServiceCommand::NextStep) => messages::NO.to_uppercase(),
            None => input.trim().to_uppercase(),
        };

        let mut directives = Vec::new();
        if answer == messages::YES.to_uppercase() {
            match &session.artifact {
                Some(path) => directives.push(Directive::Document {
                    path: path.clone(),
                    caption: None,
                }),
                None => tracing::warn!("Finalize reached without a rendered sticker"),
            }
        } else if answer != messages::NO.to_uppercase() {
            return vec![Directive::text_with(messages::YES_NO_RETRY, Keyboard::YesNo)];
        }

        directives.push(Directive::CloseSession);
        directives.push(Directive::text(messages::END_MESSAGE));
        directives
    }

    /// Ends the session after a failure the user cannot fix by retrying.
    fn abort(&self, error: WizardError) -> Vec<Directive> {
        tracing::error!("Sticker wizard aborted: {}", error);
        vec![
            Directive::text(messages::RENDER_FAILED),
            Directive::CloseSession,
        ]
    }
}

/// `<YYYY-MM-DD>_<uuid>.png`, dated by the session's creation.
pub fn artifact_file_name(created: DateTime<Local>) -> String {
    format!("{}_{}.png", created.format("%Y-%m-%d"), Uuid::new_v4())
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::application::renderer::testing::BlockFonts;
    use std::path::Path;
    use std::sync::Arc;

    pub const FONTS: [&str; 3] = ["first.ttf", "second.ttf", "third.ttf"];
    pub const FONT_EXAMPLE: &str = "mxc://example.org/fonts";

    pub fn machine(content_dir: &Path) -> StepMachine {
        let fonts =
            FontCatalog::new(FONTS.iter().map(|f| f.to_string()).collect(), FONTS[0]).unwrap();
        let settings = WizardSettings {
            colors: ColorCatalog::default(),
            fonts,
            font_example: Some(MediaSource::Remote(FONT_EXAMPLE.to_string())),
            content_dir: content_dir.to_path_buf(),
            width: 512,
            height: 512,
        };
        let renderer = Renderer::new(Arc::new(BlockFonts::new(&FONTS)), 10, 1.5);
        StepMachine::new(settings, renderer)
    }

    pub fn session_at(machine: &StepMachine, step: Step) -> Session {
        let mut session = Session::new(Local::now(), machine.default_draft());
        session.step = step.index();
        session
    }

    pub fn texts(directives: &[Directive]) -> Vec<&str> {
        directives.iter().filter_map(|d| d.text_content()).collect()
    }
}
