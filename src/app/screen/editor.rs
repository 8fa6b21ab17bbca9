// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeSet;

use cosmic::cosmic_theme::Spacing;
use cosmic::iced::alignment::{Horizontal, Vertical};
use cosmic::iced::{Alignment, Length, Subscription};
use cosmic::iced_widget::{column, row};
use cosmic::widget::{Row, Space, button, container, list, scrollable, settings, text, text_input};
use cosmic::{Element, Task, theme};

use crate::app::core::database::SqliteStore;
use crate::app::core::editor::{EditorController, new_card};
use crate::app::core::models::card::Card;
use crate::app::core::utils::FlashzillaToast;
use crate::fl;

/// Screen [`State`] holder
pub struct EditorScreen {
    state: State,
}

/// The different states this screen can be in
enum State {
    Loading,
    Ready {
        cards: Vec<Card>,
        form: NewCardForm,
        selected: BTreeSet<usize>,
    },
}

/// State holder for the add card form
#[derive(Debug, Default)]
struct NewCardForm {
    prompt: String,
    answer: String,
}

impl NewCardForm {
    /// Returns true if submitting the form would save a card
    fn is_valid(&self) -> bool {
        new_card(&self.prompt, &self.answer).is_some()
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Callback after the saved cards have been read
    CardsLoaded(Vec<Card>),
    /// Callback after the card in the form has been saved
    CardAdded(Result<Vec<Card>, anywho::Error>),
    /// Callback after cards have been deleted
    CardsSaved(Result<Vec<Card>, anywho::Error>),

    /// User input on the prompt field
    PromptInput(String),
    /// User input on the answer field
    AnswerInput(String),
    /// Ask to save the card in the form
    AddCard,

    /// Select or unselect the card at the given position
    ToggleSelected(usize),
    /// Ask to delete the card at the given position
    DeleteCard(usize),
    /// Ask to delete every selected card
    DeleteSelected,

    /// Close the editor
    Done,
}

/// Allows us to talk with the parent screen
pub enum Action {
    None,
    Run(Task<Message>),
    AddToast(FlashzillaToast),

    Done,
}

impl EditorScreen {
    /// Init the screen
    pub fn new(editor: &EditorController<SqliteStore>) -> (Self, Task<Message>) {
        let editor = editor.clone();
        (
            Self {
                state: State::Loading,
            },
            Task::perform(async move { editor.cards().await }, Message::CardsLoaded),
        )
    }

    /// View of the screen
    pub fn view(&self) -> Element<'_, Message> {
        match &self.state {
            State::Loading => container(text(fl!("loading"))).center(Length::Fill).into(),
            State::Ready {
                cards,
                form,
                selected,
            } => {
                let spacing = theme::active().cosmic().spacing;

                let header = header_view(spacing);
                let form = form_view(spacing, form);
                let content = cards_view(spacing, cards, selected);

                container(
                    column![header, form, content]
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .spacing(spacing.space_s),
                )
                .padding(spacing.space_s)
                .center(Length::Fill)
                .into()
            }
        }
    }

    /// Handles interactions for this screen
    pub fn update(&mut self, message: Message, editor: &EditorController<SqliteStore>) -> Action {
        match message {
            Message::CardsLoaded(cards) => {
                self.state = State::Ready {
                    cards,
                    form: NewCardForm::default(),
                    selected: BTreeSet::new(),
                };
                Action::None
            }
            Message::CardAdded(res) => {
                let State::Ready {
                    cards,
                    form,
                    selected,
                } = &mut self.state
                else {
                    return Action::None;
                };

                match res {
                    Ok(saved) => {
                        *cards = saved;
                        *form = NewCardForm::default();
                        selected.clear();
                        Action::None
                    }
                    // The form keeps what was typed so it can be sent again
                    Err(e) => {
                        tracing::error!("failed to save the new card: {e}");
                        Action::AddToast(FlashzillaToast::new(e))
                    }
                }
            }
            Message::CardsSaved(res) => {
                let State::Ready {
                    cards, selected, ..
                } = &mut self.state
                else {
                    return Action::None;
                };

                match res {
                    Ok(saved) => {
                        *cards = saved;
                        // Positions are stale once the list changed
                        selected.clear();
                        Action::None
                    }
                    Err(e) => {
                        tracing::error!("failed to save cards: {e}");
                        Action::AddToast(FlashzillaToast::new(e))
                    }
                }
            }

            Message::PromptInput(value) => {
                if let State::Ready { form, .. } = &mut self.state {
                    form.prompt = value;
                }
                Action::None
            }
            Message::AnswerInput(value) => {
                if let State::Ready { form, .. } = &mut self.state {
                    form.answer = value;
                }
                Action::None
            }
            Message::AddCard => {
                let State::Ready { form, .. } = &self.state else {
                    return Action::None;
                };

                let (prompt, answer) = (form.prompt.clone(), form.answer.clone());
                let editor = editor.clone();
                Action::Run(Task::perform(
                    async move { editor.add_card(&prompt, &answer).await },
                    Message::CardAdded,
                ))
            }

            Message::ToggleSelected(index) => {
                let State::Ready { selected, .. } = &mut self.state else {
                    return Action::None;
                };

                if !selected.remove(&index) {
                    selected.insert(index);
                }
                Action::None
            }
            Message::DeleteCard(index) => remove_cards(editor, vec![index]),
            Message::DeleteSelected => {
                let State::Ready { selected, .. } = &self.state else {
                    return Action::None;
                };

                if selected.is_empty() {
                    return Action::None;
                }
                remove_cards(editor, selected.iter().copied().collect())
            }

            Message::Done => Action::Done,
        }
    }

    /// Subscriptions of this screen
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::none()
    }
}

fn remove_cards(editor: &EditorController<SqliteStore>, indices: Vec<usize>) -> Action {
    let editor = editor.clone();
    Action::Run(Task::perform(
        async move { editor.remove_cards(&indices).await },
        Message::CardsSaved,
    ))
}

//
// VIEWS
//

/// View of the header of this screen
fn header_view<'a>(spacing: Spacing) -> Element<'a, Message> {
    cosmic::widget::row::with_capacity(2)
        .align_y(Alignment::Center)
        .spacing(spacing.space_s)
        .padding([spacing.space_none, spacing.space_xxs])
        .push(text::title3(fl!("edit-cards")).width(Length::Fill))
        .push(
            button::text(fl!("done"))
                .class(theme::Button::Suggested)
                .on_press(Message::Done),
        )
        .into()
}

/// View of the add card form
fn form_view<'a>(spacing: Spacing, form: &'a NewCardForm) -> Element<'a, Message> {
    let add_button = Row::new()
        .push(Space::new(Length::Fill, Length::Shrink))
        .push(
            button::text(fl!("add-card"))
                .on_press_maybe(form.is_valid().then_some(Message::AddCard))
                .class(theme::Button::Suggested),
        );

    let section = settings::view_column(vec![
        settings::section()
            .title(fl!("add-card-section"))
            .add(
                cosmic::widget::column::with_children(vec![
                    text::body(fl!("prompt")).into(),
                    text_input(fl!("prompt"), &form.prompt)
                        .on_input(Message::PromptInput)
                        .into(),
                    text::body(fl!("answer")).into(),
                    text_input(fl!("answer"), &form.answer)
                        .on_input(Message::AnswerInput)
                        .into(),
                ])
                .spacing(spacing.space_xxs),
            )
            .into(),
    ]);

    column![section, add_button]
        .spacing(spacing.space_xs)
        .into()
}

/// View of the saved cards
fn cards_view<'a>(
    spacing: Spacing,
    cards: &'a [Card],
    selected: &'a BTreeSet<usize>,
) -> Element<'a, Message> {
    let title = row![
        text::title4(fl!("cards-created")).width(Length::Fill),
        button::text(fl!("delete-selected"))
            .class(theme::Button::Destructive)
            .on_press_maybe((!selected.is_empty()).then_some(Message::DeleteSelected)),
    ]
    .align_y(Alignment::Center)
    .spacing(spacing.space_s);

    let content: Element<'a, Message> = if cards.is_empty() {
        text(fl!("no-saved-cards")).into()
    } else {
        let mut cards_list = list::list_column().style(theme::Container::Card);

        for (index, card) in cards.iter().enumerate() {
            let is_selected = selected.contains(&index);

            cards_list = cards_list.add(
                row![
                    button::text(if is_selected {
                        fl!("selected")
                    } else {
                        fl!("select")
                    })
                    .class(if is_selected {
                        theme::Button::Suggested
                    } else {
                        theme::Button::Standard
                    })
                    .on_press(Message::ToggleSelected(index)),
                    column![
                        text::heading(&card.prompt),
                        text::caption(&card.answer),
                    ]
                    .width(Length::Fill),
                    button::text(fl!("delete"))
                        .class(theme::Button::Destructive)
                        .on_press(Message::DeleteCard(index)),
                ]
                .width(Length::Fill)
                .align_y(Alignment::Center)
                .spacing(spacing.space_s),
            );
        }

        cards_list.into()
    };

    column![
        title,
        scrollable(
            container(content)
                .align_x(Horizontal::Center)
                .align_y(Vertical::Top)
                .width(Length::Fill),
        )
        .height(Length::Fill)
    ]
    .spacing(spacing.space_xs)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::core::repository::CardRepository;

    async fn editor() -> (tempfile::TempDir, EditorController<SqliteStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("flashzilla.db"))
            .await
            .unwrap();
        (dir, EditorController::new(CardRepository::new(store)))
    }

    fn filled_screen() -> EditorScreen {
        EditorScreen {
            state: State::Ready {
                cards: Vec::new(),
                form: NewCardForm {
                    prompt: "Capital of France?".into(),
                    answer: "Paris".into(),
                },
                selected: BTreeSet::from([0]),
            },
        }
    }

    fn form(screen: &EditorScreen) -> (&str, &str) {
        match &screen.state {
            State::Ready { form, .. } => (form.prompt.as_str(), form.answer.as_str()),
            State::Loading => panic!("screen is still loading"),
        }
    }

    #[tokio::test]
    async fn failed_add_keeps_the_form() {
        let (_dir, editor) = editor().await;
        let mut screen = filled_screen();

        assert!(matches!(
            screen.update(Message::AddCard, &editor),
            Action::Run(_)
        ));
        assert_eq!(form(&screen), ("Capital of France?", "Paris"));

        let action = screen.update(
            Message::CardAdded(Err(anywho::anywho!("database is locked"))),
            &editor,
        );

        assert!(matches!(action, Action::AddToast(_)));
        assert_eq!(form(&screen), ("Capital of France?", "Paris"));
    }

    #[tokio::test]
    async fn successful_add_clears_the_form() {
        let (_dir, editor) = editor().await;
        let mut screen = filled_screen();
        let saved = vec![Card::new("Capital of France?", "Paris")];

        let action = screen.update(Message::CardAdded(Ok(saved.clone())), &editor);

        assert!(matches!(action, Action::None));
        assert_eq!(form(&screen), ("", ""));
        match &screen.state {
            State::Ready { cards, selected, .. } => {
                assert_eq!(cards, &saved);
                assert!(selected.is_empty());
            }
            State::Loading => panic!("screen is still loading"),
        }
    }
}
