//! Demo composer application: terminal setup, the event loop, and the key
//! routing that feeds the mention controller its three key phases.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::config::MentionConfig;
use crate::host::ScreenPoint;
use crate::host::TextInputHost;
use crate::input::controller::MentionController;
use crate::overlay::manager::OverlayManager;
use crate::session::SessionResources;
use crate::sources;
use crate::sources::docs::DocRegistry;
use crate::sources::file::FileIndex;
use crate::sources::persona::PersonaBook;
use crate::tui::composer::Composer;
use crate::tui::popup::PopupSurface;
use crate::tui::theme::Theme;

use super::render;

/// Demo application state.
pub struct App {
    pub composer: Composer,
    pub controller: MentionController<PopupSurface>,
    pub resources: SessionResources,
    pub sent: Vec<String>,
    pub theme: Theme,
    pub composer_area: Rect,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &MentionConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let root = match &config.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        // Environments without a working watcher still get a fixed snapshot.
        let index = match FileIndex::open(&root, config.index_depth) {
            Ok(index) => index,
            Err(_) => FileIndex::snapshot(&root, config.index_depth),
        };
        let personas = match &config.personas {
            Some(path) => PersonaBook::load(path)?,
            None => PersonaBook::builtin(),
        };
        let docs = match &config.docs {
            Some(path) => DocRegistry::load(path)?,
            None => DocRegistry::builtin(),
        };
        let defaults =
            sources::default_items(Arc::new(index), Arc::new(personas), Arc::new(docs));

        Ok(App {
            composer: Composer::new(),
            controller: MentionController::new(OverlayManager::new(
                PopupSurface::new(),
                defaults,
            )),
            resources: SessionResources::new(),
            sent: Vec::new(),
            theme: Theme::default(),
            composer_area: Rect::default(),
            should_quit: false,
        })
    }

    /// Pin the composer to the bottom of the screen and record where its
    /// first text cell sits, so the overlay anchors to it.
    pub fn place(&mut self, area: Rect) {
        let height = 3.min(area.height);
        self.composer_area = Rect::new(area.x, area.y + area.height - height, area.width, height);
        self.composer.set_origin(ScreenPoint {
            x: self.composer_area.x + 1,
            y: self.composer_area.y + 1,
        });
    }

    /// Route one terminal key press: apply the edit to the composer, then
    /// run the controller's pressed/typed/released phases in order.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.controller.overlay_mut().close();
                self.release(key);
            }
            KeyCode::Enter => {
                if self.controller.overlay().is_visible() {
                    self.controller
                        .commit_selection(&mut self.composer, &mut self.resources);
                } else {
                    self.submit();
                    self.release(key);
                }
            }
            KeyCode::Tab => {
                self.controller.key_pressed(key);
                self.release(key);
            }
            KeyCode::Up | KeyCode::Down => {
                self.release(key);
            }
            KeyCode::Backspace => {
                self.composer.backspace();
                self.release(key);
            }
            KeyCode::Left => {
                self.composer.move_left();
                self.release(key);
            }
            KeyCode::Right => {
                self.composer.move_right();
                self.release(key);
            }
            KeyCode::Home => {
                self.composer.move_home();
                self.release(key);
            }
            KeyCode::End => {
                self.composer.move_end();
                self.release(key);
            }
            KeyCode::Char(ch)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.composer.insert_char(ch);
                self.controller.char_typed(&mut self.composer, ch);
                self.release(key);
            }
            _ => {
                self.release(key);
            }
        }
    }

    fn release(&mut self, key: KeyEvent) {
        self.controller
            .key_released(&mut self.composer, &mut self.resources, key);
    }

    fn submit(&mut self) {
        if self.composer.text().is_empty() {
            return;
        }
        self.sent.push(self.composer.text().to_string());
        self.composer.clear();
    }
}

/// Run the demo composer.
pub fn run(config: &MentionConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let size = terminal.size()?;
        app.place(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        // Marshal finished fetches back onto this thread.
        app.controller.overlay_mut().poll();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
