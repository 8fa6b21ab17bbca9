use crate::app::Message;
use cosmic::widget::menu;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuAction {
    EditCards,
    RestartSession,
    About,
    Settings,
}

impl menu::action::MenuAction for MenuAction {
    type Message = crate::app::Message;

    fn message(&self) -> Self::Message {
        Message::MenuAction(*self)
    }
}
