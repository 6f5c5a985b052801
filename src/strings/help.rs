//! # Help Text
//!
//! Command overview shown after a reset and on unknown input.

pub const MAIN: &str = concat!(
    "**🖼 Sticker Wizard**\n",
    "Начните работу с ботом с помощью одной из доступных стартовых команд.\n",
    "\n",
    "**Стартовые команды**\n",
    "* /create_sticker - начать создание стикера\n",
    "\n",
    "**Сервисные команды**\n",
    "* /next_step - пропустить текущий шаг (будет установлено значение по умолчанию)\n",
    "* /step_back - вернуться к предыдущему шагу\n",
    "* /reset - начать создание стикера сначала\n",
);
