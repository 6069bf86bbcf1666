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
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Action;
use crate::domain::models::DocumentState;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::Session;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Focus;
use crate::domain::services::Submission;
use crate::domain::services::Transcript;

const SIDEBAR_WIDTH: u16 = 32;

fn document_lines(document: &DocumentState) -> Vec<Line<'static>> {
    match document {
        DocumentState::Idle => {
            return vec![Line::from("No document - using general AI")];
        }
        DocumentState::Uploading { filename } => {
            return vec![
                Line::from(filename.to_string()),
                Line::from(Span::styled(
                    "Processing...",
                    Style::default().fg(Color::Yellow),
                )),
            ];
        }
        DocumentState::Active {
            filename,
            uploaded_at,
        } => {
            return vec![
                Line::from(filename.to_string()),
                Line::from(Span::styled(
                    format!("Ready {}", uploaded_at.format("%H:%M")),
                    Style::default().fg(Color::Green),
                )),
            ];
        }
        DocumentState::Failed { detail } => {
            return vec![Line::from(Span::styled(
                detail.to_string(),
                Style::default().fg(Color::Red),
            ))];
        }
    }
}

fn render<B: Backend>(
    frame: &mut Frame<'_, B>,
    app_state: &mut AppState,
    textarea: &tui_textarea::TextArea<'_>,
    loading: &Loading,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(frame.size());

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(4), Constraint::Min(1)])
        .split(columns[0]);

    let content = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Max(4),
        ])
        .split(columns[1]);

    if content[0].width != app_state.last_known_width
        || content[0].height != app_state.last_known_height
    {
        app_state.set_rect(content[0].width, content[0].height);
    }

    frame.render_widget(
        Paragraph::new(document_lines(&app_state.document))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Document")),
        sidebar[0],
    );

    let mut sidebar_block = Block::default().borders(Borders::ALL).title("Conversations");
    if app_state.focus == Focus::Sidebar {
        sidebar_block = sidebar_block
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Cyan));
    }

    let items = app_state
        .summaries
        .iter()
        .map(|summary| return ListItem::new(summary.title.to_string()))
        .collect::<Vec<ListItem<'_>>>();
    let mut list_state = ListState::default();
    if !app_state.summaries.is_empty() {
        list_state.select(Some(app_state.sidebar_index));
    }

    frame.render_stateful_widget(
        List::new(items)
            .block(sidebar_block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> "),
        sidebar[1],
        &mut list_state,
    );

    let lines = Transcript::lines(&app_state.conversation.messages, content[0].width);
    frame.render_widget(
        Paragraph::new(lines).scroll((app_state.scroll.position, 0)),
        content[0],
    );
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        content[0].inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app_state.scroll.scrollbar_state,
    );

    let short_id = app_state
        .conversation
        .id
        .chars()
        .take(8)
        .collect::<String>();
    let status = app_state.status_line.clone().unwrap_or_else(|| {
        return format!(
            "{} | chat {short_id} | /help for commands",
            app_state.session.user_email
        );
    });
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        content[1],
    );

    if app_state.waiting_for_backend {
        loading.render(frame, content[2]);
    } else {
        frame.render_widget(textarea.widget(), content[2]);
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    mut events: EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let loading = Loading::default();

    loop {
        terminal.draw(|frame| {
            render(frame, app_state, &textarea, &loading);
        })?;

        let event = events.next().await?;

        // A pending deletion captures the next keypress: y commits, anything
        // else cancels. Worker results and ticks pass through untouched.
        if app_state.pending_delete.is_some() {
            match event {
                Event::KeyboardCharInput(Input {
                    key: Key::Char('y'),
                    ..
                }) => {
                    if let Some(action) = app_state.confirm_delete() {
                        tx.send(action)?;
                    }
                    continue;
                }
                Event::KeyboardCharInput(_)
                | Event::KeyboardEnter()
                | Event::KeyboardTab()
                | Event::KeyboardPaste(_) => {
                    app_state.decline_delete();
                    continue;
                }
                _ => {}
            }
        }

        match event {
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardTab() => {
                app_state.focus = match app_state.focus {
                    Focus::Input => Focus::Sidebar,
                    Focus::Sidebar => Focus::Input,
                };
            }
            Event::UIScrollDown() => {
                if app_state.focus == Focus::Sidebar {
                    app_state.select_next();
                } else {
                    app_state.scroll.down();
                }
            }
            Event::UIScrollUp() => {
                if app_state.focus == Focus::Sidebar {
                    app_state.select_prev();
                } else {
                    app_state.scroll.up();
                }
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::KeyboardEnter() => {
                if app_state.focus == Focus::Sidebar {
                    if let Some(action) = app_state.open_selected() {
                        tx.send(action)?;
                        app_state.focus = Focus::Input;
                    }
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    continue;
                }

                textarea = TextArea::default();
                match app_state.handle_submit(input_str.trim()) {
                    Submission::Exit => {
                        break;
                    }
                    Submission::Pending(action) => {
                        tx.send(action)?;
                    }
                    Submission::Handled => {}
                }
            }
            Event::KeyboardPaste(text) => {
                if app_state.focus == Focus::Input && !app_state.waiting_for_backend {
                    textarea.insert_str(text.replace('\r', "\n"));
                }
            }
            Event::KeyboardCharInput(input) => {
                if app_state.focus == Focus::Sidebar {
                    if let Input {
                        key: Key::Char('d'),
                        ..
                    } = input
                    {
                        app_state.request_delete();
                    }
                    continue;
                }

                if !app_state.waiting_for_backend {
                    textarea.input(input);
                }
            }
            Event::UITick() => {}
            event => {
                if app_state.apply(event) {
                    break;
                }
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
    session: Session,
    tx: mpsc::UnboundedSender<Action>,
    event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
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

    let mut app_state = AppState::new(session);
    tx.send(Action::RefreshSummaries)?;

    let events = EventsService::new(event_rx);
    start_loop(&mut terminal, &mut app_state, tx, events).await?;

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
