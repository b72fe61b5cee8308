//! The interactive chat loop.
//!
//! UI events and request completions interleave on one timeline: the loop
//! polls the terminal, drains the completion channel, and applies both
//! through the store. The spawned assistant call is the only suspension
//! point anywhere in the program.

use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::Terminal;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::chat_request::RequestOutcome;
use crate::core::store::ChatStore;
use crate::ui::renderer;

/// View-local state: the input draft and scroll position. Everything the
/// transcript shows comes from store snapshots.
pub struct ChatUi {
    pub title: String,
    pub input: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
}

impl ChatUi {
    fn new(title: String) -> Self {
        Self {
            title,
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
        }
    }
}

pub async fn run_chat(
    mut store: ChatStore,
    mut completions: UnboundedReceiver<(RequestOutcome, u64)>,
    title: String,
) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = ChatUi::new(title);

    let result = loop {
        let snapshot = store.snapshot();
        terminal.draw(|f| renderer::draw(f, &snapshot, &ui))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Ok(());
                    }
                    KeyCode::Enter => {
                        // The store refuses blank input and double-sends; on
                        // refusal the draft stays put.
                        if store.submit(&ui.input) {
                            ui.input.clear();
                            ui.auto_scroll = true;
                        }
                    }
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        ui.input.push(c);
                    }
                    KeyCode::Backspace => {
                        ui.input.pop();
                    }
                    KeyCode::Up => {
                        scroll_up(&mut ui, &store, &terminal, 1);
                    }
                    KeyCode::Down => {
                        scroll_down(&mut ui, &store, &terminal, 1);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        scroll_up(&mut ui, &store, &terminal, 3);
                    }
                    MouseEventKind::ScrollDown => {
                        scroll_down(&mut ui, &store, &terminal, 3);
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // Apply settled requests; each one is a state transition, so force a
        // redraw before polling again.
        let mut resolved_any = false;
        while let Ok((outcome, request_id)) = completions.try_recv() {
            store.resolve(outcome, request_id);
            resolved_any = true;
        }
        if resolved_any {
            continue;
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn max_scroll_offset<B: ratatui::backend::Backend>(
    store: &ChatStore,
    terminal: &Terminal<B>,
) -> u16 {
    let terminal_height = terminal
        .size()
        .map(|size| size.height)
        .unwrap_or_default();
    // 3 rows for the input area, 1 for the transcript title
    let available_height = terminal_height.saturating_sub(3).saturating_sub(1);
    renderer::line_count(&store.snapshot()).saturating_sub(available_height)
}

fn scroll_up<B: ratatui::backend::Backend>(
    ui: &mut ChatUi,
    store: &ChatStore,
    terminal: &Terminal<B>,
    amount: u16,
) {
    if ui.auto_scroll {
        // Leaving auto-scroll: start from the bottom the user was looking at.
        ui.scroll_offset = max_scroll_offset(store, terminal);
        ui.auto_scroll = false;
    }
    ui.scroll_offset = ui.scroll_offset.saturating_sub(amount);
}

fn scroll_down<B: ratatui::backend::Backend>(
    ui: &mut ChatUi,
    store: &ChatStore,
    terminal: &Terminal<B>,
    amount: u16,
) {
    let max_offset = max_scroll_offset(store, terminal);
    ui.scroll_offset = ui.scroll_offset.saturating_add(amount).min(max_offset);
    if ui.scroll_offset >= max_offset {
        ui.auto_scroll = true;
    }
}
