//! # Wizard Errors
//!
//! Every user-recoverable variant displays as the message shown to the user,
//! so handlers can turn an error straight into a text directive.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error(
        "Вы не закончили создавать предыдущий стикер.\n\
         Если вы хотите начать сначала - пришлите команду /reset"
    )]
    SessionAlreadyOpen,

    #[error(
        "Для начала работы с ботом введите одну из доступных стартовых команд.\n\n\
         Стартовые команды:\n\
         /create_sticker - начать создание стикера"
    )]
    SessionNotFound,

    #[error(
        "Вы прислали недопустимый RGB-код.\n\
         Корректный RGB-код должен состоять из 3-х целых чисел, \
         каждое число д. б. в диапазоне от 0 до 255"
    )]
    InvalidColorCode,

    #[error(
        "Вы прислали неверный номер шрифта. Корректный номер д. б. целым \
         числом в диапазоне от {min} до {max}"
    )]
    InvalidFontIndex { min: u32, max: u32 },

    #[error(
        "Сумма чисел в присланной разбивке не равна количеству слов в вашем \
         тексте для стикера либо разбивка содержит недопустимые числа.\n\
         Примеры валидной разбивки текста:\n\
         \"Текст из 2 строк\" - \"2, 2\"\n\
         \"Текст из 3 строк\" - \"1, 2, 1\"\n\
         \"Текст из 4 строк\" - \"1, 1, 1, 1\""
    )]
    InvalidSplitPattern,

    #[error("Текст стикера не может содержать в себе смайлики, пришлите текст без смайликов")]
    EmojiNotAllowed,

    #[error("Текст стикера не может быть пустым, пришлите хотя бы одно слово")]
    EmptyText,

    #[error("Присланная команда не поддерживается на данном этапе создания стикера")]
    UnsupportedCommandAtStep,

    /// Render step reached with an incomplete draft.
    #[error("sticker draft is missing its {0}")]
    MissingDraftField(&'static str),

    #[error("sticker rendering failed: {0}")]
    RenderFailed(String),
}

pub type WizardResult<T> = Result<T, WizardError>;

/// Failures inside the renderer and font loading.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("nothing to render: text has no lines")]
    EmptyText,

    #[error("font '{0}' not found")]
    FontNotFound(String),

    #[error("failed to load font '{font}': {reason}")]
    FontLoad { font: String, reason: String },
}
