// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use cosmic::app::{Core, context_drawer};
use cosmic::cosmic_config;
use cosmic::iced::keyboard::{Key, Modifiers};
use cosmic::iced::{Event, Length, Subscription, window};
use cosmic::widget::about::About;
use cosmic::widget::menu::action::MenuAction as _;
use cosmic::widget::toaster::{ToastId, Toasts};
use cosmic::widget::{self, container, menu, text};
use cosmic::{Application, ApplicationExt, Element, Task};

use crate::app::app_menu::MenuAction;
use crate::app::context_page::ContextPage;
use crate::app::core::database::SqliteStore;
use crate::app::core::editor::EditorController;
use crate::app::core::repository::CardRepository;
use crate::app::core::utils::FlashzillaToast;
use crate::app::screen::{DeckScreen, EditorScreen, Screen, deck, editor};
use crate::config::{self, AppTheme, FlashzillaConfig};
use crate::flags::Flags;
use crate::key_binds::key_binds;
use crate::fl;

pub mod app_menu;
mod context_page;
pub mod core;
mod screen;

const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    core: Core,
    /// Display a context drawer with the designated page if defined.
    context_page: ContextPage,
    /// Contains the about page of the application
    about: About,
    /// Key bindings for the application's menu bar.
    key_binds: HashMap<menu::KeyBind, MenuAction>,
    /// Application Keyboard Modifiers (current state)
    modifiers: Modifiers,
    /// Handler to write configuration changes back to disk
    config_handler: Option<cosmic_config::Config>,
    /// Configuration data that persists between application runs.
    config: FlashzillaConfig,
    /// Application Themes
    app_themes: Vec<String>,
    /// Application Toasts
    toasts: Toasts<Message>,
    /// Whether the main window currently has focus
    window_focused: bool,
    /// Application State
    state: State,
}

/// The different states the application can be in
pub enum State {
    Loading,
    Ready {
        repository: CardRepository<SqliteStore>,
        editor: EditorController<SqliteStore>,
        screen: Screen,
    },
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    LaunchUrl(String),
    ToggleContextPage(ContextPage),
    UpdateConfig(FlashzillaConfig),
    UpdateTheme(usize),
    ToggleDifferentiateWithoutColor(bool),
    ToggleNarrationMode(bool),
    Key(Modifiers, Key),
    Modifiers(Modifiers),
    MenuAction(MenuAction),
    AddToast(FlashzillaToast),
    CloseToast(ToastId),

    /// Callback after the database has been opened
    DatabaseLoaded(Result<SqliteStore, anywho::Error>),
    /// The main window gained or lost focus
    WindowFocused(bool),

    OpenDeck,
    OpenEditor,
    Deck(deck::Message),
    Editor(editor::Message),
}

/// Create a COSMIC application from the app model
impl Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = Flags;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = config::APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(core: Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::Named::new(Self::APP_ID))
            .version(env!("CARGO_PKG_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            key_binds: key_binds(),
            modifiers: Modifiers::empty(),
            config_handler: flags.config_handler,
            config: flags.config,
            app_themes: vec![fl!("match-desktop"), fl!("dark"), fl!("light")],
            toasts: Toasts::new(Message::CloseToast),
            window_focused: true,
            state: State::Loading,
        };

        let tasks = vec![
            app.update_title(),
            cosmic::command::set_theme(app.config.app_theme.theme()),
            Task::perform(crate::app::core::init_database(Self::APP_ID), |res| {
                cosmic::action::app(Message::DatabaseLoaded(res))
            }),
        ];

        (app, Task::batch(tasks))
    }

    /// Elements to pack at the start of the header bar.
    fn header_start(&self) -> Vec<Element<'_, Self::Message>> {
        let menu_bar = menu::bar(vec![
            menu::Tree::with_children(
                Element::from(menu::root(fl!("file"))),
                menu::items(
                    &self.key_binds,
                    vec![
                        menu::Item::Button(fl!("edit-cards"), None, MenuAction::EditCards),
                        menu::Item::Button(
                            fl!("restart-session"),
                            None,
                            MenuAction::RestartSession,
                        ),
                    ],
                ),
            ),
            menu::Tree::with_children(
                Element::from(menu::root(fl!("view"))),
                menu::items(
                    &self.key_binds,
                    vec![
                        menu::Item::Button(fl!("about"), None, MenuAction::About),
                        menu::Item::Button(fl!("settings"), None, MenuAction::Settings),
                    ],
                ),
            ),
        ]);

        vec![menu_bar.into()]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        self.context_page.display(self)
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        let content: Element<'_, Self::Message> = match &self.state {
            State::Loading => container(text(fl!("loading"))).center(Length::Fill).into(),
            State::Ready { screen, .. } => match screen {
                Screen::Deck(deck_screen) => deck_screen
                    .view(self.config.display_options())
                    .map(Message::Deck),
                Screen::Editor(editor_screen) => editor_screen.view().map(Message::Editor),
            },
        };

        widget::toaster(&self.toasts, content)
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let mut subscriptions = vec![
            // Watch for key_bind inputs and focus changes
            cosmic::iced::event::listen_with(|event, status, _| match event {
                Event::Keyboard(cosmic::iced::keyboard::Event::KeyPressed {
                    key,
                    modifiers,
                    ..
                }) => match status {
                    cosmic::iced::event::Status::Ignored => Some(Message::Key(modifiers, key)),
                    cosmic::iced::event::Status::Captured => None,
                },
                Event::Keyboard(cosmic::iced::keyboard::Event::ModifiersChanged(modifiers)) => {
                    Some(Message::Modifiers(modifiers))
                }
                Event::Window(window::Event::Focused) => Some(Message::WindowFocused(true)),
                Event::Window(window::Event::Unfocused) => Some(Message::WindowFocused(false)),
                _ => None,
            }),
            // Watch for application configuration changes.
            self.core()
                .watch_config::<FlashzillaConfig>(Self::APP_ID)
                .map(|update| {
                    for why in update.errors {
                        tracing::error!(?why, "app config error");
                    }

                    Message::UpdateConfig(update.config)
                }),
        ];

        if let State::Ready { screen, .. } = &self.state {
            subscriptions.push(match screen {
                Screen::Deck(deck_screen) => deck_screen.subscription().map(Message::Deck),
                Screen::Editor(editor_screen) => editor_screen.subscription().map(Message::Editor),
            });
        }

        Subscription::batch(subscriptions)
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        match message {
            Message::LaunchUrl(url) => match open::that_detached(&url) {
                Ok(()) => {}
                Err(err) => {
                    tracing::error!("failed to open {url:?}: {err}");
                }
            },

            Message::ToggleContextPage(context_page) => {
                if self.context_page == context_page {
                    // Close the context drawer if the toggled context page is the same.
                    self.core.window.show_context = !self.core.window.show_context;
                } else {
                    // Open the context drawer to display the requested context page.
                    self.context_page = context_page;
                    self.core.window.show_context = true;
                }
            }

            Message::UpdateConfig(config) => {
                self.config = config;
            }

            Message::UpdateTheme(index) => {
                let app_theme = AppTheme::from_index(index);
                if let Some(handler) = &self.config_handler {
                    if let Err(err) = self.config.set_app_theme(handler, app_theme) {
                        tracing::error!("failed to save theme: {err}");
                    }
                }
                self.config.app_theme = app_theme;
                return cosmic::command::set_theme(self.config.app_theme.theme());
            }

            Message::ToggleDifferentiateWithoutColor(value) => {
                if let Some(handler) = &self.config_handler {
                    if let Err(err) = self.config.set_differentiate_without_color(handler, value) {
                        tracing::error!("failed to save accessibility setting: {err}");
                    }
                }
                self.config.differentiate_without_color = value;
            }

            Message::ToggleNarrationMode(value) => {
                if let Some(handler) = &self.config_handler {
                    if let Err(err) = self.config.set_narration_mode(handler, value) {
                        tracing::error!("failed to save accessibility setting: {err}");
                    }
                }
                self.config.narration_mode = value;
            }

            Message::Key(modifiers, key) => {
                for (key_bind, action) in self.key_binds.iter() {
                    if key_bind.matches(modifiers, &key) {
                        return self.update(action.message());
                    }
                }
            }

            // Updates the current state of keyboard modifiers
            Message::Modifiers(modifiers) => {
                self.modifiers = modifiers;
            }

            Message::MenuAction(action) => match action {
                MenuAction::EditCards => return self.update(Message::OpenEditor),
                MenuAction::RestartSession => return self.update(Message::OpenDeck),
                MenuAction::About => {
                    return self.update(Message::ToggleContextPage(ContextPage::About));
                }
                MenuAction::Settings => {
                    return self.update(Message::ToggleContextPage(ContextPage::Settings));
                }
            },

            Message::AddToast(toast) => {
                return self.toasts.push(toast.into()).map(cosmic::action::app);
            }

            Message::CloseToast(id) => {
                self.toasts.remove(id);
            }

            Message::DatabaseLoaded(res) => match res {
                Ok(store) => {
                    let repository = CardRepository::new(store);
                    let editor = EditorController::new(repository.clone());
                    let (screen, task) = DeckScreen::new(&repository, self.window_focused);

                    self.state = State::Ready {
                        repository,
                        editor,
                        screen: Screen::Deck(screen),
                    };
                    return task.map(Message::Deck).map(cosmic::action::app);
                }
                Err(err) => {
                    tracing::error!("error occurred opening the database: {err}");
                    std::process::exit(1);
                }
            },

            Message::WindowFocused(is_foreground) => {
                self.window_focused = is_foreground;
                return self.update(Message::Deck(deck::Message::ForegroundChanged(
                    is_foreground,
                )));
            }

            // Closing the editor always starts a fresh session
            Message::OpenDeck => {
                let State::Ready {
                    repository, screen, ..
                } = &mut self.state
                else {
                    return Task::none();
                };

                let (deck_screen, task) = DeckScreen::new(repository, self.window_focused);
                *screen = Screen::Deck(deck_screen);
                return task.map(Message::Deck).map(cosmic::action::app);
            }

            Message::OpenEditor => {
                let State::Ready { editor, screen, .. } = &mut self.state else {
                    return Task::none();
                };

                let (editor_screen, task) = EditorScreen::new(editor);
                *screen = Screen::Editor(editor_screen);
                return task.map(Message::Editor).map(cosmic::action::app);
            }

            Message::Deck(message) => {
                let options = self.config.display_options();
                let State::Ready {
                    repository, screen, ..
                } = &mut self.state
                else {
                    return Task::none();
                };

                let Screen::Deck(deck_screen) = screen else {
                    return Task::none();
                };

                match deck_screen.update(message, repository, options) {
                    deck::Action::None => {}
                    deck::Action::Run(task) => {
                        return task.map(Message::Deck).map(cosmic::action::app);
                    }
                    deck::Action::OpenEditor => return self.update(Message::OpenEditor),
                }
            }

            Message::Editor(message) => {
                let State::Ready { editor, screen, .. } = &mut self.state else {
                    return Task::none();
                };

                let Screen::Editor(editor_screen) = screen else {
                    return Task::none();
                };

                match editor_screen.update(message, editor) {
                    editor::Action::None => {}
                    editor::Action::Run(task) => {
                        return task.map(Message::Editor).map(cosmic::action::app);
                    }
                    editor::Action::AddToast(toast) => {
                        return self.update(Message::AddToast(toast));
                    }
                    editor::Action::Done => return self.update(Message::OpenDeck),
                }
            }
        }

        Task::none()
    }
}

impl AppModel {
    /// Updates the header and window titles.
    pub fn update_title(&mut self) -> Task<cosmic::Action<Message>> {
        let window_title = fl!("app-title");

        if let Some(id) = self.core.main_window_id() {
            self.set_window_title(window_title, id)
        } else {
            Task::none()
        }
    }

    /// The settings page for this app.
    pub fn settings(&self) -> Element<'_, Message> {
        widget::settings::view_column(vec![
            widget::settings::section()
                .title(fl!("appearance"))
                .add(
                    widget::settings::item::builder(fl!("theme")).control(widget::dropdown(
                        &self.app_themes,
                        Some(self.config.app_theme.to_index()),
                        Message::UpdateTheme,
                    )),
                )
                .into(),
            widget::settings::section()
                .title(fl!("accessibility"))
                .add(
                    widget::settings::item::builder(fl!("differentiate-without-color")).toggler(
                        self.config.differentiate_without_color,
                        Message::ToggleDifferentiateWithoutColor,
                    ),
                )
                .add(
                    widget::settings::item::builder(fl!("narration-mode"))
                        .toggler(self.config.narration_mode, Message::ToggleNarrationMode),
                )
                .into(),
        ])
        .into()
    }
}
