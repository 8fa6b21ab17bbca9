// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use cosmic::cosmic_theme::Spacing;
use cosmic::iced::alignment::Horizontal;
use cosmic::iced::{Alignment, Background, Border, Color, Length, Padding, Point, Subscription};
use cosmic::iced_widget::{Stack, container::Style as ContainerStyle, mouse_area, row};
use cosmic::widget::{Space, button, container, text};
use cosmic::{Element, Task, theme};

use crate::app::core::database::SqliteStore;
use crate::app::core::deck::{Answer, DeckController};
use crate::app::core::models::card::Card;
use crate::app::core::repository::CardRepository;
use crate::app::core::swipe::{self, CardTransform, TintDirection};
use crate::config::DisplayOptions;
use crate::fl;

const CARD_WIDTH: f32 = 450.;
const CARD_HEIGHT: f32 = 250.;

/// Screen [`State`] holder
pub struct DeckScreen {
    state: State,
    /// Last known window focus, applied to every session that gets loaded
    is_foreground: bool,
}

enum State {
    Loading,
    Ready {
        deck: DeckController,
        pointer: Pointer,
    },
}

/// Where the pointer is over the deck and where the current drag started
#[derive(Debug, Default)]
struct Pointer {
    position: Point,
    pressed_at: Option<Point>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Ask to start a new session with the saved cards
    Restart,
    /// Callback after a new session has been loaded from the saved cards
    SessionLoaded(DeckController),

    /// One second went by
    Tick,
    /// The window gained or lost focus
    ForegroundChanged(bool),

    /// The pointer moved over the deck
    PointerMoved(Point),
    /// The pointer went down over the deck
    PointerPressed,
    /// The pointer went up or left the deck
    PointerReleased,

    /// Explicit answer buttons, both throw the top card away
    MarkAnswer(Answer),

    /// Ask to open the card editor
    OpenEditor,
}

/// Allows us to talk with the parent screen
pub enum Action {
    None,
    Run(Task<Message>),

    OpenEditor,
}

impl DeckScreen {
    /// Init the screen, loading the saved cards into a new session
    pub fn new(
        repository: &CardRepository<SqliteStore>,
        is_foreground: bool,
    ) -> (Self, Task<Message>) {
        (
            Self {
                state: State::Loading,
                is_foreground,
            },
            load_session(repository),
        )
    }

    /// View of the screen
    pub fn view(&self, options: DisplayOptions) -> Element<'_, Message> {
        match &self.state {
            State::Loading => container(text(fl!("loading"))).center(Length::Fill).into(),
            State::Ready { deck, .. } => {
                let spacing = theme::active().cosmic().spacing;

                let mut content = cosmic::widget::column::with_capacity(4)
                    .push(header_view(spacing, deck))
                    .push(deck_view(deck, options))
                    .spacing(spacing.space_m)
                    .align_x(Alignment::Center)
                    .width(Length::Fill);

                if options.show_answer_buttons() && !deck.is_empty() {
                    content = content.push(answer_buttons_view(spacing));
                }

                container(content)
                    .padding(spacing.space_m)
                    .center(Length::Fill)
                    .into()
            }
        }
    }

    /// Handles interactions for this screen
    pub fn update(
        &mut self,
        message: Message,
        repository: &CardRepository<SqliteStore>,
        options: DisplayOptions,
    ) -> Action {
        match message {
            Message::Restart => Action::Run(load_session(repository)),
            Message::SessionLoaded(mut deck) => {
                tracing::info!("starting a session with {} cards", deck.cards().len());
                deck.on_foreground_change(self.is_foreground);

                self.state = State::Ready {
                    deck,
                    pointer: Pointer::default(),
                };
                Action::None
            }

            Message::Tick => {
                if let State::Ready { deck, pointer } = &mut self.state {
                    deck.tick();

                    // The deck stops listening to the pointer once time is up
                    if !deck.is_interactive() {
                        pointer.pressed_at = None;
                    }
                }
                Action::None
            }
            Message::ForegroundChanged(is_foreground) => {
                self.is_foreground = is_foreground;
                if let State::Ready { deck, .. } = &mut self.state {
                    deck.on_foreground_change(is_foreground);
                }
                Action::None
            }

            Message::PointerMoved(position) => {
                let State::Ready { deck, pointer } = &mut self.state else {
                    return Action::None;
                };

                pointer.position = position;
                if let Some(start) = pointer.pressed_at {
                    deck.drag(position.x - start.x, position.y - start.y, options.render);
                }
                Action::None
            }
            Message::PointerPressed => {
                let State::Ready { deck, pointer } = &mut self.state else {
                    return Action::None;
                };

                if deck.is_interactive() && !deck.is_empty() {
                    pointer.pressed_at = Some(pointer.position);
                }
                Action::None
            }
            Message::PointerReleased => {
                let State::Ready { deck, pointer } = &mut self.state else {
                    return Action::None;
                };

                // Releases that never started on the deck are ignored
                if pointer.pressed_at.take().is_none() {
                    return Action::None;
                }

                if deck.swipe().drag_offset() == (0.0, 0.0) {
                    deck.tap();
                } else if let Some(decision) = deck.end_drag() {
                    tracing::debug!(?decision, "swipe ended");
                }
                Action::None
            }

            Message::MarkAnswer(answer) => {
                if let State::Ready { deck, .. } = &mut self.state {
                    deck.mark_answer(answer);
                }
                Action::None
            }

            Message::OpenEditor => Action::OpenEditor,
        }
    }

    /// Subscriptions of this screen
    pub fn subscription(&self) -> Subscription<Message> {
        match &self.state {
            State::Ready { deck, .. } if deck.is_active() && deck.remaining_seconds() > 0 => {
                cosmic::iced::time::every(Duration::from_secs(1)).map(|_| Message::Tick)
            }
            _ => Subscription::none(),
        }
    }
}

fn load_session(repository: &CardRepository<SqliteStore>) -> Task<Message> {
    let repository = repository.clone();
    Task::perform(
        async move {
            let mut deck = DeckController::new();
            deck.reload_session(&repository).await;
            deck
        },
        Message::SessionLoaded,
    )
}

//
// VIEWS
//

/// Remaining time, the restart button when the deck is empty and the editor button
fn header_view<'a>(spacing: Spacing, deck: &DeckController) -> Element<'a, Message> {
    let time = container(text::title3(fl!(
        "time-remaining",
        seconds = deck.remaining_seconds()
    )))
    .padding([spacing.space_xxs, spacing.space_m])
    .class(theme::Container::Card);

    let mut header = cosmic::widget::row::with_capacity(4)
        .align_y(Alignment::Center)
        .spacing(spacing.space_s)
        .push(Space::new(Length::Fill, Length::Shrink))
        .push(time);

    if deck.is_empty() {
        header = header.push(
            button::text(fl!("start-again"))
                .class(theme::Button::Suggested)
                .on_press(Message::Restart),
        );
    } else if !deck.is_interactive() {
        header = header.push(text::body(fl!("time-up")));
    }

    header
        .push(Space::new(Length::Fill, Length::Shrink))
        .push(
            button::text(fl!("edit-cards"))
                .class(theme::Button::Standard)
                .on_press(Message::OpenEditor),
        )
        .into()
}

/// The stack of cards, only the topmost one follows the pointer
fn deck_view<'a>(deck: &'a DeckController, options: DisplayOptions) -> Element<'a, Message> {
    let total = deck.cards().len();
    let top_transform = deck.swipe().transform(options.render);

    let mut cards = Stack::new().width(Length::Fill).height(Length::Fill);
    for (index, card) in deck.cards().iter().enumerate() {
        let is_top = deck.top_index() == Some(index);

        let (transform, revealed) = if is_top {
            (top_transform, deck.swipe().is_revealed())
        } else {
            (CardTransform::default(), false)
        };

        cards = cards.push(card_view(
            card,
            transform,
            revealed,
            options.narration_mode,
            swipe::stack_offset(index, total),
        ));
    }

    let area = container(cards)
        .width(Length::Fill)
        .height(Length::Fixed(CARD_HEIGHT + swipe::STACK_SPACING * total as f32 + 20.));

    // Lower cards never take input, and nothing does once the time is up
    if deck.top_index().is_some_and(|index| deck.is_card_interactive(index)) {
        mouse_area(area)
            .on_move(Message::PointerMoved)
            .on_press(Message::PointerPressed)
            .on_release(Message::PointerReleased)
            .on_exit(Message::PointerReleased)
            .into()
    } else {
        area.into()
    }
}

fn card_view<'a>(
    card: &'a Card,
    transform: CardTransform,
    revealed: bool,
    narration_mode: bool,
    offset_y: f32,
) -> Element<'a, Message> {
    let visible = card.visible_text(revealed, narration_mode);
    let opacity = transform.opacity;

    let mut body = cosmic::widget::column::with_capacity(2)
        .push(
            text::title2(visible.headline)
                .class(theme::Text::Color(faded(Color::BLACK, opacity)))
                .align_x(Horizontal::Center),
        )
        .align_x(Alignment::Center)
        .spacing(8);

    if let Some(detail) = visible.detail {
        body = body.push(
            text::title4(detail)
                .class(theme::Text::Color(faded(
                    Color::from_rgb(0.35, 0.35, 0.35),
                    opacity,
                )))
                .align_x(Horizontal::Center),
        );
    }

    let fill = faded(card_fill(transform), opacity);
    let shadow = faded(Color::from_rgba(0.0, 0.0, 0.0, 0.35), opacity);

    let face = container(body)
        .padding(20)
        .center_x(Length::Fixed(CARD_WIDTH))
        .center_y(Length::Fixed(CARD_HEIGHT))
        .style(move |_theme| ContainerStyle {
            background: Some(Background::Color(fill)),
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 25.0.into(),
            },
            shadow: cosmic::iced_core::Shadow {
                color: shadow,
                offset: cosmic::iced::Vector::new(0.0, 0.0),
                blur_radius: 10.0,
            },
            ..Default::default()
        });

    container(face)
        .padding(Padding {
            top: offset_y,
            right: (-transform.translate_x).max(0.0),
            bottom: 0.0,
            left: transform.translate_x.max(0.0),
        })
        .align_x(Horizontal::Center)
        .width(Length::Fill)
        .into()
}

fn answer_buttons_view<'a>(spacing: Spacing) -> Element<'a, Message> {
    row![
        button::text(fl!("mark-wrong"))
            .class(theme::Button::Destructive)
            .on_press(Message::MarkAnswer(Answer::Wrong))
            .width(Length::Fill),
        button::text(fl!("mark-correct"))
            .class(theme::Button::Suggested)
            .on_press(Message::MarkAnswer(Answer::Correct))
            .width(Length::Fill),
    ]
    .spacing(spacing.space_s)
    .width(Length::Fixed(CARD_WIDTH))
    .into()
}

//
// HELPERS
//

/// White fill blended over the green/red tint
fn card_fill(transform: CardTransform) -> Color {
    let Some(tint) = transform.tint else {
        return Color::WHITE;
    };

    let base = match tint.direction {
        TintDirection::Positive => Color::from_rgb(0.2, 0.7, 0.3),
        TintDirection::Negative => Color::from_rgb(0.85, 0.2, 0.2),
    };

    let white = tint.fill_strength;
    Color::from_rgb(
        white + base.r * (1.0 - white),
        white + base.g * (1.0 - white),
        white + base.b * (1.0 - white),
    )
}

fn faded(color: Color, opacity: f32) -> Color {
    Color {
        a: color.a * opacity,
        ..color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::core::deck::SESSION_SECONDS;
    use crate::app::core::swipe::RenderOptions;

    async fn repository() -> (tempfile::TempDir, CardRepository<SqliteStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("flashzilla.db"))
            .await
            .unwrap();
        (dir, CardRepository::new(store))
    }

    fn session() -> DeckController {
        let mut deck = DeckController::new();
        deck.reset_session(vec![Card::new("Q", "A")]);
        deck
    }

    fn loaded_deck(screen: &DeckScreen) -> &DeckController {
        match &screen.state {
            State::Ready { deck, .. } => deck,
            State::Loading => panic!("session was not loaded"),
        }
    }

    #[tokio::test]
    async fn session_loaded_in_the_background_stays_paused() {
        let (_dir, repository) = repository().await;
        let (mut screen, _) = DeckScreen::new(&repository, true);
        let options = DisplayOptions::default();

        screen.update(Message::ForegroundChanged(false), &repository, options);
        screen.update(Message::SessionLoaded(session()), &repository, options);
        assert!(!loaded_deck(&screen).is_active());

        screen.update(Message::Tick, &repository, options);
        assert_eq!(loaded_deck(&screen).remaining_seconds(), SESSION_SECONDS);

        screen.update(Message::ForegroundChanged(true), &repository, options);
        assert!(loaded_deck(&screen).is_active());
    }

    #[tokio::test]
    async fn session_started_while_unfocused_is_paused() {
        let (_dir, repository) = repository().await;
        let (mut screen, _) = DeckScreen::new(&repository, false);

        screen.update(
            Message::SessionLoaded(session()),
            &repository,
            DisplayOptions::default(),
        );

        assert!(!loaded_deck(&screen).is_active());
    }

    #[tokio::test]
    async fn time_running_out_releases_the_pointer() {
        let (_dir, repository) = repository().await;
        let (mut screen, _) = DeckScreen::new(&repository, true);
        let options = DisplayOptions::default();
        screen.update(Message::SessionLoaded(session()), &repository, options);

        screen.update(Message::PointerMoved(Point::new(10.0, 10.0)), &repository, options);
        screen.update(Message::PointerPressed, &repository, options);
        screen.update(Message::PointerMoved(Point::new(70.0, 10.0)), &repository, options);
        assert_eq!(loaded_deck(&screen).swipe().drag_offset(), (60.0, 0.0));

        for _ in 0..SESSION_SECONDS {
            screen.update(Message::Tick, &repository, options);
        }

        match &screen.state {
            State::Ready { deck, pointer } => {
                assert_eq!(pointer.pressed_at, None);
                assert_eq!(deck.swipe().drag_offset(), (0.0, 0.0));
            }
            State::Loading => panic!("session was not loaded"),
        }
    }

    #[test]
    fn resting_card_is_white() {
        assert_eq!(card_fill(CardTransform::default()), Color::WHITE);
    }

    #[test]
    fn fully_dragged_card_shows_its_tint() {
        let right = CardTransform::for_drag(80.0, RenderOptions::default());
        let left = CardTransform::for_drag(-80.0, RenderOptions::default());

        assert_eq!(card_fill(right), Color::from_rgb(0.2, 0.7, 0.3));
        assert_eq!(card_fill(left), Color::from_rgb(0.85, 0.2, 0.2));
    }

    #[test]
    fn colorless_mode_keeps_the_card_white() {
        let options = RenderOptions {
            differentiate_without_color: true,
        };
        assert_eq!(
            card_fill(CardTransform::for_drag(80.0, options)),
            Color::WHITE
        );
    }
}
