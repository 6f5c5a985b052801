//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes step prompts, answers to the final question and service replies.

pub const ACCESS_DENIED: &str = "Access Denied";
pub const UNKNOWN_COMMAND: &str = "❓ Неизвестная команда. Список команд: /start";

pub const SET_TEXT_PROMPT: &str = "✏️ Пришлите текст для стикера";

pub const SET_BACKGROUND_COLOR_PROMPT: &str = "🎨 Выберите цвет фона стикера из списка \
     либо пришлите RGB-код: три числа от 0 до 255, например \"255 255 255\".\n\
     /next_step - оставить белый фон\n\
     /step_back - вернуться к тексту";

pub const SET_FONT_PROMPT: &str = "🔤 Пришлите номер шрифта из списка на картинке.\n\
     /next_step - оставить шрифт по умолчанию\n\
     /step_back - вернуться к цвету фона";

pub const SET_FONT_COLOR_PROMPT: &str = "🖌 Выберите цвет текста из списка \
     либо пришлите RGB-код: три числа от 0 до 255, например \"0 0 0\".\n\
     /next_step - оставить чёрный цвет\n\
     /step_back - вернуться к шрифту";

pub fn set_split_pattern_prompt(pattern: &str, words: usize) -> String {
    format!(
        "📐 Сейчас каждое слово стоит на своей строке: {pattern} ({words} {}).\n\
         Пришлите, сколько слов поставить в каждую строку, через запятую. \
         Сумма чисел должна быть равна количеству слов.\n\
         /next_step - оставить как есть\n\
         /step_back - вернуться к цвету текста",
        word_form(words)
    )
}

pub const SEND_PNG_PROMPT: &str = "📎 Прислать стикер PNG-файлом? (Да/Нет)";
pub const YES_NO_RETRY: &str = "Пришлите \"Да\" либо \"Нет\"";
pub const YES: &str = "Да";
pub const NO: &str = "Нет";

pub const END_MESSAGE: &str = "✅ Готово! Чтобы создать новый стикер, \
     пришлите команду /create_sticker";

pub const RENDER_FAILED: &str = "❌ Не удалось создать стикер. \
     Попробуйте ещё раз: /create_sticker";

pub const OPTIONS_LABEL: &str = "Варианты";

/// Russian plural of "слово" for `count`.
pub fn word_form(count: usize) -> &'static str {
    let tens = count % 100;
    let ones = count % 10;
    if (11..=14).contains(&tens) {
        "слов"
    } else if ones == 1 {
        "слово"
    } else if (2..=4).contains(&ones) {
        "слова"
    } else {
        "слов"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_form() {
        assert_eq!(word_form(1), "слово");
        assert_eq!(word_form(2), "слова");
        assert_eq!(word_form(4), "слова");
        assert_eq!(word_form(5), "слов");
        assert_eq!(word_form(11), "слов");
        assert_eq!(word_form(21), "слово");
        assert_eq!(word_form(112), "слов");
    }

    #[test]
    fn test_split_prompt_mentions_pattern() {
        let text = set_split_pattern_prompt("1, 1, 1", 3);
        assert!(text.contains("1, 1, 1"));
        assert!(text.contains("3 слова"));
    }
}
