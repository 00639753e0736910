//! Property-based tests for navigation, buffer and search invariants.
//!
//! Tests validate:
//! 1. Illegal transitions never change the navigation session
//! 2. The log buffer never exceeds its capacity and keeps the newest lines
//! 3. Search recomputation is deterministic
//! 4. next_match / prev_match are inverses
//! 5. Cancelling search entry leaves the applied query untouched
//! 6. Back from the log screen always lands on the workload screen

use kubeoptic::model::{CycleDirection, Panel, Screen};
use kubeoptic::state::navigation::is_allowed;
use kubeoptic::state::{
    LogBuffer, LogViewer, NavigationSession, SearchInput, SearchState, MAX_LINES,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;
use std::collections::VecDeque;

fn any_screen() -> impl Strategy<Value = Screen> {
    prop_oneof![
        Just(Screen::Context),
        Just(Screen::Namespace),
        Just(Screen::Workload),
        Just(Screen::Log),
    ]
}

/// Short lines drawn from a small alphabet so queries actually hit.
fn log_lines(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-cE ]{0,8}", 0..max)
}

fn buffer_of(lines: &[String]) -> LogBuffer {
    let mut buffer = LogBuffer::new();
    for line in lines {
        buffer.push(line.clone());
    }
    buffer
}

// ===== Property 1: Navigation =====

proptest! {
    #[test]
    fn illegal_transitions_leave_session_untouched(targets in prop::collection::vec(any_screen(), 0..40)) {
        let mut nav = NavigationSession::new();
        for to in targets {
            let before = nav.clone();
            let same = to == nav.current();
            let allowed = is_allowed(nav.current(), to);

            let changed = nav.request_transition(to);

            prop_assert_eq!(changed, same || allowed);
            if same || !allowed {
                prop_assert_eq!(&nav, &before);
            } else {
                prop_assert_eq!(nav.current(), to);
                prop_assert_eq!(nav.focused(), to.canonical_panel());
                prop_assert_eq!(nav.history().len(), before.history().len() + 1);
            }
            prop_assert!(nav.current().panel_cycle().contains(&nav.focused()));
        }
    }

    #[test]
    fn focus_cycling_stays_on_current_screen(
        targets in prop::collection::vec(any_screen(), 0..10),
        steps in prop::collection::vec(any::<bool>(), 0..20),
    ) {
        let mut nav = NavigationSession::new();
        for to in targets {
            nav.request_transition(to);
        }
        for forward in steps {
            let direction = if forward { CycleDirection::Forward } else { CycleDirection::Backward };
            nav.cycle_panel(direction);
            prop_assert!(nav.current().panel_cycle().contains(&nav.focused()));
        }
    }
}

// ===== Property 2: Bounded buffer =====

proptest! {
    #[test]
    fn buffer_keeps_most_recent_lines_in_order(capacity in 1usize..50, count in 0usize..200) {
        let mut buffer = LogBuffer::with_capacity(capacity);
        for i in 0..count {
            buffer.push(i.to_string());
        }

        prop_assert_eq!(buffer.len(), count.min(capacity));
        let kept: Vec<String> = buffer.iter().map(|l| l.text.clone()).collect();
        let expected: Vec<String> = (count.saturating_sub(capacity)..count).map(|i| i.to_string()).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn default_buffer_never_exceeds_max_lines(chunks in prop::collection::vec(1usize..400, 0..60)) {
        let mut buffer = LogBuffer::new();
        for (i, lines) in chunks.into_iter().enumerate() {
            let chunk = vec![format!("chunk {i}"); lines].join("\n");
            buffer.append_chunk(&chunk);
            prop_assert!(buffer.len() <= MAX_LINES);
        }
    }
}

// ===== Properties 3 and 4: Search =====

proptest! {
    #[test]
    fn recompute_is_deterministic(lines in log_lines(60), query in "[a-cE]{0,3}") {
        let buffer = buffer_of(&lines);
        let mut search = SearchState::new();
        search.set_query(query.clone(), &buffer);
        let first = search.matches().to_vec();

        search.recompute(&buffer);

        prop_assert_eq!(search.matches(), first.as_slice());
        for index in &first {
            let text = &buffer.get(*index).map(|l| l.text.to_lowercase()).unwrap_or_default();
            prop_assert!(text.contains(&query.to_lowercase()));
        }
    }

    #[test]
    fn next_then_prev_restores_cursor(
        lines in log_lines(60),
        query in "[a-c]{1,2}",
        moves in 0usize..30,
        forward_first in any::<bool>(),
    ) {
        let buffer = buffer_of(&lines);
        let mut search = SearchState::new();
        search.set_query(query, &buffer);
        for _ in 0..moves {
            search.next_match();
        }
        let cursor = search.cursor();

        if forward_first {
            search.next_match();
            search.prev_match();
        } else {
            search.prev_match();
            search.next_match();
        }

        prop_assert_eq!(search.cursor(), cursor);
    }
}

// ===== Property 5: Cancelled search entry =====

proptest! {
    #[test]
    fn cancelled_entry_leaves_query_and_matches(
        lines in log_lines(40),
        applied in "[a-c]{0,2}",
        typed in "[a-cE]{0,6}",
    ) {
        let mut viewer = LogViewer::default();
        viewer.append(&lines.join("\n"));
        viewer.set_query(&applied);
        let before = viewer.search().clone();

        let mut input = SearchInput::default();
        input.begin(viewer.search().query());
        for c in typed.chars() {
            input.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), &VecDeque::new());
            viewer.set_query(input.text());
        }
        viewer.set_query(input.saved_query());

        prop_assert_eq!(viewer.search().query(), before.query());
        prop_assert_eq!(viewer.search().matches(), before.matches());
    }
}

// ===== Property 6: Back from logs =====

proptest! {
    #[test]
    fn back_from_logs_lands_on_workloads(searching in any::<bool>(), cycles in 0usize..5) {
        let mut nav = NavigationSession::new();
        nav.request_transition(Screen::Namespace);
        nav.request_transition(Screen::Workload);
        nav.request_transition(Screen::Log);
        for _ in 0..cycles {
            nav.cycle_panel(CycleDirection::Forward);
        }
        if searching {
            nav.enter_search();
        }

        prop_assert!(nav.navigate_back());

        prop_assert_eq!(nav.current(), Screen::Workload);
        prop_assert_eq!(nav.focused(), Panel::Workload);
        prop_assert!(!nav.search_active());
    }
}
