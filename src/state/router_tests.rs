//! Tests for key routing.

use super::*;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ch(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn nav_on(screen: Screen) -> NavigationSession {
    let mut nav = NavigationSession::new();
    for step in [Screen::Namespace, Screen::Workload, Screen::Log] {
        if nav.current() == screen {
            break;
        }
        nav.request_transition(step);
    }
    nav
}

fn messages(routed: Routed) -> Vec<&'static str> {
    match routed {
        Routed::Navigation(msgs) => msgs.iter().map(Msg::kind).collect(),
        other => panic!("expected navigation, got {other:?}"),
    }
}

// ===== Stage 1: globals =====

#[test]
fn quit_and_help_are_global_on_every_screen() {
    let router = EventRouter::default();
    for screen in [Screen::Context, Screen::Namespace, Screen::Workload, Screen::Log] {
        let mut nav = nav_on(screen);
        assert!(matches!(
            router.route(&mut nav, ch('q')),
            Routed::Global(GlobalAction::Quit)
        ));
        assert!(matches!(
            router.route(&mut nav, ch('?')),
            Routed::Global(GlobalAction::ToggleHelp)
        ));
    }
}

#[test]
fn typing_q_in_search_is_text_not_quit() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);
    nav.enter_search();

    assert!(matches!(
        router.route(&mut nav, ch('q')),
        Routed::Forward(Panel::Search, _)
    ));
    assert!(matches!(
        router.route(&mut nav, KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
        Routed::Forward(Panel::Search, _)
    ));
}

#[test]
fn ctrl_c_quits_even_while_searching() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);
    nav.enter_search();

    assert!(matches!(
        router.route(&mut nav, ctrl('c')),
        Routed::Global(GlobalAction::Quit)
    ));
}

#[test]
fn f1_opens_help_while_searching() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);
    nav.enter_search();

    assert!(matches!(
        router.route(&mut nav, key(KeyCode::F(1))),
        Routed::Global(GlobalAction::ToggleHelp)
    ));
}

// ===== Stage 2: search entry =====

#[test]
fn enter_confirms_search_and_exits() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);
    nav.enter_search();

    let msgs = messages(router.route(&mut nav, key(KeyCode::Enter)));

    assert_eq!(msgs, vec!["search_confirmed"]);
    assert!(!nav.search_active());
    assert_eq!(nav.focused(), Panel::Log);
}

#[test]
fn esc_cancels_search_without_navigating_back() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);
    nav.enter_search();

    let msgs = messages(router.route(&mut nav, key(KeyCode::Esc)));

    assert_eq!(msgs, vec!["search_cancelled"]);
    assert_eq!(nav.current(), Screen::Log);
}

#[test]
fn backspace_and_arrows_go_to_search_input() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Workload);
    nav.enter_search();

    for k in [key(KeyCode::Backspace), key(KeyCode::Up), key(KeyCode::Left)] {
        assert!(matches!(
            router.route(&mut nav, k),
            Routed::Forward(Panel::Search, _)
        ));
    }
    assert_eq!(nav.current(), Screen::Workload);
}

// ===== Stage 3: screen actions =====

#[test]
fn confirm_descends_and_requests_load() {
    let router = EventRouter::default();
    let mut nav = NavigationSession::new();

    assert_eq!(
        messages(router.route(&mut nav, key(KeyCode::Enter))),
        vec!["context_selected"]
    );
    assert_eq!(nav.current(), Screen::Namespace);

    assert_eq!(
        messages(router.route(&mut nav, key(KeyCode::Enter))),
        vec!["namespace_selected"]
    );
    assert_eq!(nav.current(), Screen::Workload);

    assert_eq!(
        messages(router.route(&mut nav, key(KeyCode::Enter))),
        vec!["workload_selected"]
    );
    assert_eq!(nav.current(), Screen::Log);
    assert_eq!(nav.focused(), Panel::Log);
}

#[test]
fn confirm_on_parent_list_reloads_in_place() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Workload);
    nav.cycle_panel(CycleDirection::Backward);
    assert_eq!(nav.focused(), Panel::Namespace);

    assert_eq!(
        messages(router.route(&mut nav, key(KeyCode::Enter))),
        vec!["namespace_selected"]
    );
    assert_eq!(nav.current(), Screen::Workload);
}

#[test]
fn confirm_on_log_screen_is_forwarded() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);

    assert!(matches!(
        router.route(&mut nav, key(KeyCode::Enter)),
        Routed::Forward(Panel::Log, _)
    ));
}

#[test]
fn log_toggles_become_dedicated_messages() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);

    let cases = [
        ('f', "toggle_follow"),
        ('w', "toggle_wrap"),
        ('t', "toggle_timestamps"),
        ('s', "save_logs"),
        ('n', "next_match"),
        ('N', "prev_match"),
    ];
    for (c, expected) in cases {
        assert_eq!(messages(router.route(&mut nav, ch(c))), vec![expected]);
    }
}

#[test]
fn log_toggles_are_forwarded_on_list_screens() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Workload);

    assert!(matches!(
        router.route(&mut nav, ch('f')),
        Routed::Forward(Panel::Workload, _)
    ));
}

#[test]
fn clear_search_is_routed_on_every_screen() {
    let router = EventRouter::default();
    for screen in [Screen::Context, Screen::Namespace, Screen::Workload, Screen::Log] {
        let mut nav = nav_on(screen);
        assert_eq!(messages(router.route(&mut nav, ch('x'))), vec!["clear_search"]);
        assert_eq!(nav.current(), screen);
    }
}

#[test]
fn x_is_search_text_while_searching() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);
    nav.enter_search();

    assert!(matches!(
        router.route(&mut nav, ch('x')),
        Routed::Forward(Panel::Search, _)
    ));
}

#[test]
fn refresh_and_search_enter() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Namespace);

    assert_eq!(messages(router.route(&mut nav, ch('r'))), vec!["refresh"]);
    assert_eq!(messages(router.route(&mut nav, ch('/'))), vec!["search_started"]);
    assert!(nav.search_active());
    assert_eq!(nav.focused(), Panel::Search);
}

// ===== Stage 4: navigation =====

#[test]
fn tab_cycles_focus() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Workload);

    assert!(messages(router.route(&mut nav, key(KeyCode::Tab))).is_empty());
    assert_eq!(nav.focused(), Panel::Context);

    router.route(&mut nav, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
    assert_eq!(nav.focused(), Panel::Workload);
}

#[test]
fn back_from_log_stops_the_stream() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);

    assert_eq!(
        messages(router.route(&mut nav, key(KeyCode::Esc))),
        vec!["stop_stream"]
    );
    assert_eq!(nav.current(), Screen::Workload);
}

#[test]
fn back_on_context_screen_is_silently_consumed() {
    let router = EventRouter::default();
    let mut nav = NavigationSession::new();

    assert!(messages(router.route(&mut nav, key(KeyCode::Backspace))).is_empty());
    assert_eq!(nav.current(), Screen::Context);
}

// ===== Stage 5: forwarding =====

#[test]
fn scroll_keys_go_to_focused_panel() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Namespace);

    assert!(matches!(
        router.route(&mut nav, ch('j')),
        Routed::Forward(Panel::Namespace, _)
    ));
}

#[test]
fn unbound_keys_are_forwarded_unmodified() {
    let router = EventRouter::default();
    let mut nav = nav_on(Screen::Log);
    let k = ch('z');

    match router.route(&mut nav, k) {
        Routed::Forward(Panel::Log, forwarded) => assert_eq!(forwarded, k),
        other => panic!("unexpected {other:?}"),
    }
}
