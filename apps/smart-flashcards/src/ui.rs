//! UI rendering for smart flashcards.

use crate::app::{App, FormField, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    match app.view {
        View::Input => draw_input(f, app),
        View::Study => draw_study(f, app),
    }

    if app.show_help {
        draw_help(f);
    }

    if let Some(msg) = &app.message {
        draw_message(f, msg);
    }
}

fn field_block(title: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default().borders(Borders::ALL).border_style(style);
    if title.is_empty() {
        block
    } else {
        block.title(format!(" {} ", title))
    }
}

fn draw_input(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Topic
            Constraint::Min(5),    // Material
            Constraint::Length(3), // Subject
            Constraint::Length(3), // Generate
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let header = Paragraph::new("Smart Flashcard Generator")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let form = &app.form;

    let topic = if form.topic.is_empty() && form.focus != FormField::Topic {
        Paragraph::new("e.g. spanish verbs, biology terms, historical dates")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(form.topic.as_str())
    };
    f.render_widget(
        topic.block(field_block("Topic", form.focus == FormField::Topic)),
        chunks[1],
    );

    let material = if form.material.is_empty() && form.focus != FormField::Material {
        Paragraph::new("Paste your study material here")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(form.material.as_str())
    };
    f.render_widget(
        material
            .wrap(Wrap { trim: false })
            .block(field_block("Material", form.focus == FormField::Material)),
        chunks[2],
    );

    let subject = Paragraph::new(Line::from(vec![
        Span::raw("< "),
        Span::styled(form.subject.name(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" >"),
    ]))
    .alignment(Alignment::Center)
    .block(field_block("Subject", form.focus == FormField::Subject));
    f.render_widget(subject, chunks[3]);

    let button_style = if form.focus == FormField::Generate {
        Style::default().fg(Color::Black).bg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue)
    };
    let button = Paragraph::new("Generate Flashcards")
        .style(button_style)
        .alignment(Alignment::Center)
        .block(field_block("", form.focus == FormField::Generate));
    f.render_widget(button, chunks[4]);

    let footer = Paragraph::new("Tab:Next field  Left/Right:Subject  Enter:Generate  Esc:Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[5]);

    match form.focus {
        FormField::Topic => {
            let x = (chunks[1].x + 1).saturating_add(clamp_u16(form.topic.chars().count()));
            f.set_cursor_position((x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
        }
        FormField::Material => {
            let last = form.material.rsplit('\n').next().unwrap_or("");
            let row = clamp_u16(form.material.matches('\n').count());
            let x = (chunks[2].x + 1).saturating_add(clamp_u16(last.chars().count()));
            let y = (chunks[2].y + 1).saturating_add(row);
            f.set_cursor_position((
                x.min(chunks[2].right().saturating_sub(2)),
                y.min(chunks[2].bottom().saturating_sub(2)),
            ));
        }
        _ => {}
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn draw_study(f: &mut Frame, app: &App) {
    let session = &app.session;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Counter
            Constraint::Min(5),    // Card
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Keys
        ])
        .split(f.area());

    let mut header = vec![Span::raw(format!(
        "Card {} of {}",
        session.index() + 1,
        session.total_cards()
    ))];
    if app.config.display.show_timer {
        header.push(Span::raw("  |  "));
        header.push(Span::styled(
            format!("Study time: {}", session.elapsed_display()),
            Style::default().fg(Color::Cyan),
        ));
    }
    let counter = Paragraph::new(Line::from(header))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(counter, chunks[0]);

    let index = session.index();
    let mut title = if session.is_revealed() { " Back".to_string() } else { " Front".to_string() };
    if session.is_known(index) {
        title.push_str(" [known]");
    }
    if session.is_in_progress(index) {
        title.push_str(" [review]");
    }
    title.push(' ');

    let text_style = if session.is_revealed() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let card = Paragraph::new(session.visible_text().unwrap_or(""))
        .style(text_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    f.render_widget(card, centered_rect(80, 100, chunks[1]));

    let percent = session.progress_percent();
    let label = format!("Progress: {}%", percent);
    if app.config.display.show_progress_bar {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(percent)
            .label(label);
        f.render_widget(gauge, chunks[2]);
    } else {
        let text = Paragraph::new(label)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(text, chunks[2]);
    }

    let keys = [
        ("Space", "Flip", Color::White),
        ("h/l", "Prev/Next", Color::White),
        ("s", "Shuffle", Color::White),
        ("1", "Known", Color::Green),
        ("2", "Review", Color::Yellow),
        ("r", "Review difficult", Color::Magenta),
        ("n", "New set", Color::Red),
        ("R", "Reset", Color::White),
    ];
    let key_spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label, color)| {
            vec![
                Span::styled(format!("[{}]", key), Style::default().fg(*color).add_modifier(Modifier::BOLD)),
                Span::raw(format!(" {}  ", label)),
            ]
        })
        .collect();
    let footer = Paragraph::new(Line::from(key_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[3]);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Smart Flashcards Keybindings

Input Form:
  Tab, Shift-Tab  Move between fields
  Left/Right      Change subject
  Enter           Generate (on the button)
  Esc             Quit

Study:
  Space, Enter    Flip card
  l, Right        Next card
  h, Left         Previous card
  s               Shuffle
  1               Mark known
  2               Mark for review
  r               Review difficult cards
  R               Reset progress
  n               New set
  q               Quit

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_message(f: &mut Frame, msg: &str) {
    let area = Rect::new(
        f.area().x + 2,
        f.area().height.saturating_sub(5),
        f.area().width.saturating_sub(4),
        3,
    )
    .intersection(f.area());
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::Database;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    out.push_str(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn test_app() -> App {
        App::with_storage(Config::default(), Box::new(Database::in_memory().unwrap()))
    }

    #[test]
    fn test_input_view() {
        let app = test_app();
        let screen = render(&app);
        assert!(screen.contains("Smart Flashcard Generator"));
        assert!(screen.contains("Generate Flashcards"));
        assert!(screen.contains("General"));
    }

    #[test]
    fn test_study_view() {
        let mut app = test_app();
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Enter);

        let screen = render(&app);
        assert!(screen.contains("Card 1 of 3"));
        assert!(screen.contains("Madrid"));
        assert!(screen.contains("Progress: 0%"));
        assert!(screen.contains("Study time: 00:00:00"));

        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char(' '));
        let screen = render(&app);
        assert!(screen.contains("Card 2 of 3"));
        assert!(screen.contains("Processo mediante cui le piante producono energia"));
        assert!(screen.contains("Progress: 33%"));
    }

    #[test]
    fn test_known_badge_and_hidden_timer() {
        let mut config = Config::default();
        config.display.show_timer = false;
        config.display.show_progress_bar = false;
        let mut app = App::with_storage(config, Box::new(Database::in_memory().unwrap()));
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('h'));

        let screen = render(&app);
        assert!(screen.contains("[known]"));
        assert!(!screen.contains("Study time"));
        assert!(screen.contains("Progress: 33%"));
    }

    #[test]
    fn test_long_pasted_line_renders() {
        let mut app = test_app();
        app.form.topic = "t".repeat(70_000);
        let screen = render(&app);
        assert!(screen.contains("Topic"));

        app.form.material = "a".repeat(65_535);
        app.form.focus = FormField::Material;
        let screen = render(&app);
        assert!(screen.contains("Material"));

        app.form.material = "\n".repeat(70_000);
        let screen = render(&app);
        assert!(screen.contains("Material"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = test_app();
        app.show_help = true;
        let screen = render(&app);
        assert!(screen.contains("Smart Flashcards Keybindings"));
    }
}
