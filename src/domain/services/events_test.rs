use crossterm::event::Event as CrosstermEvent;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use tui_textarea::Input;
use tui_textarea::Key;

use super::map_key;
use super::map_terminal;
use crate::domain::models::Event;

fn key(key: Key) -> Input {
    return Input {
        key,
        ctrl: false,
        alt: false,
        shift: false,
    };
}

fn ctrl(key: Key) -> Input {
    return Input {
        key,
        ctrl: true,
        alt: false,
        shift: false,
    };
}

#[test]
fn it_maps_arrows_to_scrolling() {
    assert!(matches!(map_key(key(Key::Up)), Event::UIScrollUp()));
    assert!(matches!(map_key(key(Key::Down)), Event::UIScrollDown()));
}

#[test]
fn it_maps_paging_bindings() {
    assert!(matches!(map_key(key(Key::PageUp)), Event::UIScrollPageUp()));
    assert!(matches!(
        map_key(ctrl(Key::Char('u'))),
        Event::UIScrollPageUp()
    ));
    assert!(matches!(
        map_key(key(Key::PageDown)),
        Event::UIScrollPageDown()
    ));
    assert!(matches!(
        map_key(ctrl(Key::Char('d'))),
        Event::UIScrollPageDown()
    ));
}

#[test]
fn it_maps_interrupt_focus_and_submit_keys() {
    assert!(matches!(map_key(ctrl(Key::Char('c'))), Event::KeyboardCTRLC()));
    assert!(matches!(map_key(key(Key::Tab)), Event::KeyboardTab()));
    assert!(matches!(map_key(key(Key::Enter)), Event::KeyboardEnter()));
}

#[test]
fn it_passes_plain_characters_through_as_input() {
    match map_key(key(Key::Char('d'))) {
        Event::KeyboardCharInput(input) => {
            assert_eq!(input.key, Key::Char('d'));
            assert!(!input.ctrl);
        }
        _ => panic!("Expected character input"),
    }
}

#[test]
fn it_maps_paste_events() {
    let event = map_terminal(CrosstermEvent::Paste("hello".to_string()));

    match event {
        Some(Event::KeyboardPaste(text)) => assert_eq!(text, "hello"),
        _ => panic!("Expected a paste event"),
    }
}

#[test]
fn it_maps_the_mouse_wheel_to_scrolling() {
    let wheel = map_terminal(CrosstermEvent::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    }));

    assert!(matches!(wheel, Some(Event::UIScrollDown())));
}

#[test]
fn it_ignores_focus_noise() {
    assert!(map_terminal(CrosstermEvent::FocusGained).is_none());
    assert!(map_terminal(CrosstermEvent::FocusLost).is_none());
}
