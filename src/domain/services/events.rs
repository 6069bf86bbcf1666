#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::Event;

const TICK: time::Duration = time::Duration::from_millis(500);

/// Keyboard layer for the chat screen. Scrolling, paging, Tab and Enter get
/// their own events; everything else flows through as character input for
/// the textarea (or sidebar shortcuts, which the render loop resolves by
/// focus).
fn map_key(input: tui_textarea::Input) -> Event {
    use tui_textarea::Key;

    match (input.key, input.ctrl) {
        (Key::Up, false) | (Key::MouseScrollUp, _) => return Event::UIScrollUp(),
        (Key::Down, false) | (Key::MouseScrollDown, _) => return Event::UIScrollDown(),
        (Key::PageUp, _) | (Key::Char('u'), true) => return Event::UIScrollPageUp(),
        (Key::PageDown, _) | (Key::Char('d'), true) => return Event::UIScrollPageDown(),
        (Key::Char('c'), true) => return Event::KeyboardCTRLC(),
        (Key::Tab, _) => return Event::KeyboardTab(),
        (Key::Enter, _) => return Event::KeyboardEnter(),
        _ => return Event::KeyboardCharInput(input),
    }
}

fn map_terminal(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => return Some(map_key(key.into())),
        CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
            MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
            _ => return None,
        },
        // Resize redraws on the next tick; focus changes are noise.
        _ => return None,
    }
}

/// Single event source for the render loop: terminal input and worker
/// results muxed together, with a periodic tick so the screen refreshes
/// while idle.
pub struct EventsService {
    terminal_events: EventStream,
    worker_events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(worker_events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            terminal_events: EventStream::new(),
            worker_events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let event = tokio::select! {
                worker_event = self.worker_events.recv() => worker_event,
                terminal_event = self.terminal_events.next() => match terminal_event {
                    Some(Ok(event)) => map_terminal(event),
                    _ => None,
                },
                _ = time::sleep(TICK) => Some(Event::UITick()),
            };

            if let Some(event) = event {
                return Ok(event);
            }
        }
    }
}
