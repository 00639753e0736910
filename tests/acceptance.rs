//! End-to-end scenarios driven through the public update loop.
//!
//! Every command is performed synchronously against a [`DemoCluster`] and its
//! completion fed back into [`AppState::update`], the same way the terminal
//! loop does it but without threads or a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kubeoptic::bus::{perform, Command, Msg};
use kubeoptic::config::KeyBindings;
use kubeoptic::model::{Panel, Screen, SourceError};
use kubeoptic::source::{Cluster, DemoCluster};
use kubeoptic::state::{AppState, StreamPhase, ViewerSettings, MAX_LINES};
use std::collections::VecDeque;
use std::path::PathBuf;

// ===== Harness =====

struct Harness {
    app: AppState,
    cluster: DemoCluster,
}

impl Harness {
    fn start(cluster: DemoCluster) -> Self {
        Self::with_settings(cluster, ViewerSettings::default())
    }

    fn with_settings(cluster: DemoCluster, settings: ViewerSettings) -> Self {
        let mut harness = Self {
            app: AppState::new(KeyBindings::default(), settings),
            cluster,
        };
        harness.send(Msg::Resize {
            width: 100,
            height: 24,
        });
        let init = harness.app.init();
        harness.drive(init);
        harness
    }

    fn drive(&mut self, cmds: Vec<Command>) {
        let mut queue: VecDeque<Command> = cmds.into();
        let mut steps = 0;
        while let Some(cmd) = queue.pop_front() {
            steps += 1;
            assert!(steps < 50_000, "update loop did not settle");
            let cluster: &dyn Cluster = &self.cluster;
            let msg = perform(cluster, cmd);
            queue.extend(self.app.update(msg));
        }
    }

    fn send(&mut self, msg: Msg) {
        let cmds = self.app.update(msg);
        self.drive(cmds);
    }

    fn press(&mut self, code: KeyCode) {
        self.send(Msg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Contexts → default namespace → api-gateway logs.
    fn open_logs(&mut self) {
        self.press(KeyCode::Enter);
        self.press(KeyCode::Enter);
        self.press(KeyCode::Enter);
        assert_eq!(self.app.nav().current(), Screen::Log);
    }

    fn lines(&self) -> Vec<String> {
        self.app
            .viewer()
            .buffer()
            .iter()
            .map(|l| l.text.clone())
            .collect()
    }
}

fn chunks(lines: &[&str]) -> Vec<Result<Option<String>, SourceError>> {
    lines.iter().map(|l| Ok(Some(l.to_string()))).collect()
}

// ===== Streaming =====

#[test]
fn follow_tracks_the_newest_line() {
    let mut h = Harness::start(DemoCluster::scripted(chunks(&["A", "B", "ERROR C"])));

    h.open_logs();

    assert_eq!(h.lines(), ["A", "B", "ERROR C"]);
    assert!(h.app.viewer().follow());
    assert_eq!(h.app.viewer().last_visible_row(), Some(2));
    assert_eq!(h.app.viewer().phase(), StreamPhase::Stopped);
}

#[test]
fn buffer_keeps_only_the_newest_lines() {
    let script: Vec<_> = (1..=MAX_LINES + 5)
        .map(|i| Ok(Some(format!("chunk {i}"))))
        .collect();
    let mut h = Harness::start(DemoCluster::scripted(script));

    h.open_logs();

    let buffer = h.app.viewer().buffer();
    assert_eq!(buffer.len(), MAX_LINES);
    assert_eq!(buffer.get(0).map(|l| l.text.as_str()), Some("chunk 6"));
    assert_eq!(
        buffer.get(MAX_LINES - 1).map(|l| l.text.clone()),
        Some(format!("chunk {}", MAX_LINES + 5))
    );
}

#[test]
fn transient_read_error_is_reported_and_retried() {
    let mut h = Harness::start(DemoCluster::scripted(vec![
        Ok(Some("before".to_string())),
        Err(SourceError::Read("connection reset".to_string())),
        Ok(Some("after".to_string())),
    ]));

    h.open_logs();

    assert_eq!(h.lines(), ["before", "after"]);
    let report = h.app.error().expect("read error surfaced");
    assert_eq!(report.context, "log streaming");
    assert!(report.message.contains("connection reset"));
}

#[test]
fn missing_workload_is_a_selection_error() {
    let mut h = Harness::start(DemoCluster::new());
    h.press(KeyCode::Enter);
    h.press(KeyCode::Enter);
    h.send(Msg::WorkloadsLoaded {
        context: "kind-demo".to_string(),
        namespace: "default".to_string(),
        result: Ok(Vec::new()),
    });

    h.press(KeyCode::Enter);

    assert!(h.app.error().is_some());
    assert_eq!(h.app.viewer().phase(), StreamPhase::Idle);
}

// ===== Search =====

#[test]
fn search_narrows_to_matches_and_wraps() {
    let mut h = Harness::start(DemoCluster::scripted(chunks(&[
        "INFO x", "ERROR y", "INFO z",
    ])));
    h.open_logs();

    h.press(KeyCode::Char('/'));
    h.type_text("error");
    h.press(KeyCode::Enter);

    let search = h.app.viewer().search();
    assert_eq!(search.matches(), [1]);
    assert_eq!(search.history().back().map(String::as_str), Some("error"));
    assert_eq!(h.app.viewer().displayed_len(), 1);

    h.press(KeyCode::Char('n'));
    assert_eq!(h.app.viewer().search().current_match(), Some(1));
}

#[test]
fn cancelled_search_leaves_viewer_unchanged() {
    let mut h = Harness::start(DemoCluster::scripted(chunks(&["INFO x", "ERROR y"])));
    h.open_logs();

    h.press(KeyCode::Char('/'));
    h.type_text("info");
    h.press(KeyCode::Esc);

    assert!(!h.app.nav().search_active());
    assert_eq!(h.app.viewer().search().query(), "");
    assert!(h.app.viewer().search().matches().is_empty());
    assert_eq!(h.app.viewer().displayed_len(), 2);
}

// ===== Navigation =====

#[test]
fn back_from_searching_logs_returns_to_workloads() {
    let mut h = Harness::start(DemoCluster::scripted(chunks(&["A"])));
    h.open_logs();
    h.press(KeyCode::Char('/'));
    assert!(h.app.nav().search_active());

    h.press(KeyCode::Esc);
    h.press(KeyCode::Esc);

    assert_eq!(h.app.nav().current(), Screen::Workload);
    assert_eq!(h.app.nav().focused(), Panel::Workload);
    assert!(!h.app.nav().search_active());
    assert!(h.app.viewer().buffer().is_empty());
}

// ===== Save =====

#[test]
fn save_writes_buffer_to_save_dir() {
    let dir: PathBuf = std::env::temp_dir().join("kubeoptic_acceptance_save");
    let _ = std::fs::remove_dir_all(&dir);
    let settings = ViewerSettings {
        save_dir: dir.clone(),
        ..ViewerSettings::default()
    };
    let mut h = Harness::with_settings(DemoCluster::scripted(chunks(&["one", "two"])), settings);
    h.open_logs();

    h.press(KeyCode::Char('s'));

    let notice = h.app.viewer().notice().expect("save notice").to_string();
    assert!(notice.starts_with("saved "));
    let saved: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(saved.len(), 1);
    let name = saved[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("default_api-gateway_"));
    assert!(name.ends_with(".log"));
    assert_eq!(std::fs::read_to_string(&saved[0]).unwrap(), "one\ntwo\n");
    let _ = std::fs::remove_dir_all(&dir);
}
