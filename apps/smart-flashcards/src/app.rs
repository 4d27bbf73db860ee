//! Application state and logic.

use crate::config::Config;
use crate::generator::{get_generator, CardGenerator};
use crate::models::{StudyRequest, Subject};
use crate::session::Session;
use crate::storage::{load_snapshot, save_snapshot, Database, Storage};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

pub struct App {
    pub storage: Box<dyn Storage>,
    pub config: Config,
    pub view: View,
    pub session: Session,
    pub generator: Box<dyn CardGenerator>,
    pub form: InputForm,
    pub message: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Input,
    Study,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Topic,
    Material,
    Subject,
    Generate,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Topic => Self::Material,
            Self::Material => Self::Subject,
            Self::Subject => Self::Generate,
            Self::Generate => Self::Topic,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Topic => Self::Generate,
            Self::Material => Self::Topic,
            Self::Subject => Self::Material,
            Self::Generate => Self::Subject,
        }
    }
}

/// Study request being filled in on the input view.
#[derive(Debug, Clone)]
pub struct InputForm {
    pub topic: String,
    pub material: String,
    pub subject: Subject,
    pub focus: FormField,
}

impl InputForm {
    pub fn new(subject: Subject) -> Self {
        Self {
            topic: String::new(),
            material: String::new(),
            subject,
            focus: FormField::Topic,
        }
    }

    pub fn request(&self) -> StudyRequest {
        StudyRequest {
            topic: self.topic.clone(),
            material: self.material.clone(),
            subject: self.subject,
        }
    }
}

impl App {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::load();
        let db_path = Config::db_path().unwrap_or_else(|| "storage.db".into());
        let db = Database::open(&db_path)?;
        info!(path = %db_path.display(), "opened local storage");
        Ok(Self::with_storage(config, Box::new(db)))
    }

    /// Build the app over any storage, restoring the last saved session.
    pub fn with_storage(config: Config, storage: Box<dyn Storage>) -> Self {
        let generator = get_generator(&config.study.generator);
        let mut session =
            Session::new().with_reset_reveal_on_navigate(config.study.reset_reveal_on_navigate);

        let snapshot = load_snapshot(storage.as_ref(), &config.storage.key);
        session.restore(snapshot, Utc::now());
        let view = if session.is_active() {
            info!(cards = session.total_cards(), "restored saved session");
            View::Study
        } else {
            View::Input
        };

        Self {
            storage,
            form: InputForm::new(config.study.default_subject),
            config,
            view,
            session,
            generator,
            message: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn tick(&mut self) {
        if self.session.is_timing() {
            self.session.tick(Utc::now());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.view {
            View::Input => self.handle_form_key(key),
            View::Study => self.handle_study_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.form.focus = self.form.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.form.focus = self.form.focus.prev();
                return;
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        // Chords are not text.
        if matches!(key.code, KeyCode::Char(_))
            && key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }

        match self.form.focus {
            FormField::Topic => match key.code {
                KeyCode::Enter => self.form.focus = FormField::Material,
                KeyCode::Backspace => { self.form.topic.pop(); }
                KeyCode::Char(c) => self.form.topic.push(c),
                _ => {}
            },
            FormField::Material => match key.code {
                KeyCode::Enter => self.form.material.push('\n'),
                KeyCode::Backspace => { self.form.material.pop(); }
                KeyCode::Char(c) => self.form.material.push(c),
                _ => {}
            },
            FormField::Subject => match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.form.subject = self.form.subject.prev(),
                KeyCode::Right | KeyCode::Char('l') => self.form.subject = self.form.subject.next(),
                KeyCode::Enter => self.form.focus = FormField::Generate,
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            },
            FormField::Generate => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.generate(),
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            },
        }
    }

    fn handle_study_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.session.toggle_reveal(),
            KeyCode::Char('l') | KeyCode::Right => {
                self.session.next_card();
                debug!(index = self.session.index(), "next card");
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.session.previous_card();
                debug!(index = self.session.index(), "previous card");
            }
            KeyCode::Char('s') => {
                self.session.shuffle(&mut rand::rng());
                debug!("shuffled cards");
                self.persist();
            }
            KeyCode::Char('1') => {
                debug!(index = self.session.index(), "marked known");
                self.session.mark_known();
                self.persist();
            }
            KeyCode::Char('2') => {
                debug!(index = self.session.index(), "marked in progress");
                self.session.mark_in_progress();
                self.persist();
            }
            KeyCode::Char('r') => self.review_difficult(),
            KeyCode::Char('R') => {
                self.session.reset_progress();
                info!("progress reset");
                self.persist();
                self.message = Some("Progress reset".to_string());
            }
            KeyCode::Char('n') => self.new_set(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn generate(&mut self) {
        let request = self.form.request();
        let cards = self.generator.generate(&request);
        info!(
            generator = self.generator.name(),
            topic = %request.topic,
            subject = request.subject.name(),
            cards = cards.len(),
            "generated card set"
        );
        self.session.generate(cards, Utc::now());
        self.view = View::Study;
        self.persist();
    }

    fn review_difficult(&mut self) {
        let marked = self.session.in_progress().len();
        self.session.review_difficult();
        info!(cards = self.session.total_cards(), "reviewing difficult cards");
        self.persist();
        if !self.session.is_active() {
            self.view = View::Input;
            if marked == 0 {
                self.message = Some("No cards marked for review".to_string());
            }
        }
    }

    fn new_set(&mut self) {
        self.session.clear();
        info!("cleared card set");
        self.persist();
        self.form = InputForm::new(self.config.study.default_subject);
        self.view = View::Input;
    }

    fn persist(&mut self) {
        let snapshot = self.session.snapshot();
        if let Err(e) = save_snapshot(self.storage.as_ref(), &self.config.storage.key, &snapshot) {
            warn!(error = %e, "failed to save progress");
            self.message = Some(format!("Could not save progress: {}", e));
        }
    }
}
