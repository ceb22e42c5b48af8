use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::NoticeType;
use crate::domain::models::TextArea;
use crate::domain::models::UploadState;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::infrastructure::backends::BackendManager;

const INPUT_TITLE: &str = "Ask about your document, or /help";

fn status_title(app_state: &AppState) -> String {
    match app_state.session.upload_state().file_name() {
        Some(file_name) => return format!("AskMyDocs: {file_name}"),
        None => return "AskMyDocs".to_string(),
    }
}

fn status_lines(app_state: &AppState) -> Vec<Line<'static>> {
    let upload_state = app_state.session.upload_state();
    let colour = match upload_state {
        UploadState::Idle => Color::Gray,
        UploadState::Uploading(_) => Color::Yellow,
        UploadState::Succeeded(_) => Color::Green,
        UploadState::Failed(_, _) => Color::Red,
    };

    let mut lines = vec![Line::from(Span::styled(
        upload_state.status_text(),
        Style::default().fg(colour),
    ))];

    if let Some(notice) = &app_state.notice {
        let mut style = Style::default();
        if notice.notice_type() == NoticeType::Error {
            style = style.fg(Color::Red);
        }

        for line in notice.text.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), style)));
        }
    }

    return lines;
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    mut events: EventsService,
) -> Result<()> {
    let mut textarea = TextArea::with_title(INPUT_TITLE);
    let loading = Loading::default();

    loop {
        terminal.draw(|frame| {
            let status = status_lines(app_state);
            let title = status_title(app_state);
            let status_height = u16::try_from(status.len()).unwrap_or(u16::MAX).saturating_add(2);

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(status_height),
                    Constraint::Min(1),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            frame.render_widget(
                Paragraph::new(status)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .title(title)
                            .padding(Padding::new(1, 1, 0, 0)),
                    )
                    .wrap(Wrap { trim: false }),
                layout[0],
            );

            if layout[1].width != app_state.last_known_width
                || layout[1].height != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            app_state
                .bubble_list
                .render(frame, layout[1], app_state.scroll.position);

            if let Some(loading_text) = app_state.loading_text() {
                loading.render(frame, layout[2], &loading_text);
            } else {
                frame.render_widget(textarea.widget(), layout[2]);
            }
        })?;

        match events.next().await? {
            Event::KeyboardCTRLC() => {
                if !app_state.cancel() {
                    break;
                }
            }
            Event::KeyboardEnter() => {
                if app_state.session.is_busy() {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                textarea = TextArea::with_title(INPUT_TITLE);
                if app_state.handle_input(&input_str) {
                    break;
                }
            }
            Event::KeyboardCharInput(input) => {
                if !app_state.session.is_busy() {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if !app_state.session.is_busy() {
                    textarea.insert_str(text);
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => (),
            event => {
                app_state.handle_backend_event(event);
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let backend = BackendManager::get();
    let mut app_state = AppState::new(&backend, tx, &Config::get(ConfigKey::File)).await;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, EventsService::new(rx)).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
