//! Single-flight debounce, fetch and reveal pipeline

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::trend::SelectedYear;

use super::InsightAnalyzer;
use super::request::{InsightContext, InsightRequest, fallback_text};

/// Monotonic id of one select cycle
pub type SessionId = u64;

/// Where the final text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Analysis,
    Fallback,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum InsightState {
    #[default]
    Idle,
    /// Waiting for the debounce or the analysis call
    Loading {
        session: SessionId,
        selection: SelectedYear,
    },
    /// Text is being revealed character by character
    Revealing {
        session: SessionId,
        selection: SelectedYear,
        revealed: usize,
        total: usize,
    },
    Done {
        session: SessionId,
        selection: SelectedYear,
        source: TextSource,
    },
    Canceled {
        session: SessionId,
    },
}

impl InsightState {
    pub fn session(&self) -> Option<SessionId> {
        match self {
            InsightState::Idle => None,
            InsightState::Loading { session, .. }
            | InsightState::Revealing { session, .. }
            | InsightState::Done { session, .. }
            | InsightState::Canceled { session } => Some(*session),
        }
    }

    pub fn selection(&self) -> Option<&SelectedYear> {
        match self {
            InsightState::Loading { selection, .. }
            | InsightState::Revealing { selection, .. }
            | InsightState::Done { selection, .. } => Some(selection),
            InsightState::Idle | InsightState::Canceled { .. } => None,
        }
    }

    /// Loading or revealing
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            InsightState::Loading { .. } | InsightState::Revealing { .. }
        )
    }

    /// Panel header text
    pub fn status_label(&self) -> &'static str {
        match self {
            InsightState::Idle | InsightState::Canceled { .. } => "等待查询",
            InsightState::Loading { .. } => "正在推演...",
            InsightState::Revealing { .. } => "正在解读...",
            InsightState::Done { .. } => "解读完成",
        }
    }
}

/// Snapshot observed by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightView {
    pub state: InsightState,
    pub text: String,
}

/// Debounce and reveal cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightTiming {
    pub debounce: Duration,
    pub tick: Duration,
    pub chars_per_tick: usize,
}

impl Default for InsightTiming {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            tick: Duration::from_millis(25),
            chars_per_tick: 1,
        }
    }
}

struct Shared {
    current: Mutex<SessionId>,
    view: watch::Sender<InsightView>,
}

impl Shared {
    fn is_current(&self, session: SessionId) -> bool {
        *self.current.lock() == session
    }

    /// Apply `f` only while `session` is still the current one
    fn update(&self, session: SessionId, f: impl FnOnce(&mut InsightView)) -> bool {
        let current = self.current.lock();
        if *current != session {
            return false;
        }
        self.view.send_modify(f);
        true
    }
}

/// Drives the insight panel for one chart
pub struct InsightSession {
    shared: Arc<Shared>,
    analyzer: Arc<dyn InsightAnalyzer>,
    context: InsightContext,
    timing: InsightTiming,
    task: Option<JoinHandle<()>>,
}

impl InsightSession {
    pub fn new(
        analyzer: Arc<dyn InsightAnalyzer>,
        context: InsightContext,
        timing: InsightTiming,
    ) -> Self {
        let (view, _) = watch::channel(InsightView::default());
        Self {
            shared: Arc::new(Shared {
                current: Mutex::new(0),
                view,
            }),
            analyzer,
            context,
            timing,
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<InsightView> {
        self.shared.view.subscribe()
    }

    pub fn view(&self) -> InsightView {
        self.shared.view.borrow().clone()
    }

    pub fn status_label(&self) -> &'static str {
        self.shared.view.borrow().state.status_label()
    }

    pub fn timing(&self) -> InsightTiming {
        self.timing
    }

    /// Start a new cycle for a selection, superseding any running one.
    /// Must be called from within a tokio runtime.
    pub fn select(&mut self, selection: SelectedYear) -> SessionId {
        let request = InsightRequest::new(&selection, &self.context);
        let session = {
            let mut current = self.shared.current.lock();
            *current += 1;
            self.shared.view.send_replace(InsightView {
                state: InsightState::Loading {
                    session: *current,
                    selection: selection.clone(),
                },
                text: String::new(),
            });
            *current
        };
        self.abort_task();
        debug!(
            session,
            year = selection.point.year,
            dimension = %selection.dimension,
            "insight requested"
        );

        self.task = Some(tokio::spawn(run_cycle(
            Arc::clone(&self.shared),
            Arc::clone(&self.analyzer),
            request,
            selection,
            self.timing,
            session,
        )));
        session
    }

    /// Stop the running cycle. Text revealed so far stays visible.
    pub fn cancel(&mut self) {
        {
            let mut current = self.shared.current.lock();
            let session = *current;
            if self.shared.view.borrow().state.is_active() {
                *current += 1;
                self.shared
                    .view
                    .send_modify(|v| v.state = InsightState::Canceled { session });
                debug!(session, "insight canceled");
            }
        }
        self.abort_task();
    }

    /// Cancel and clear the panel
    pub fn reset(&mut self) {
        {
            let mut current = self.shared.current.lock();
            *current += 1;
            self.shared.view.send_replace(InsightView::default());
        }
        self.abort_task();
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for InsightSession {
    fn drop(&mut self) {
        self.abort_task();
    }
}

async fn run_cycle(
    shared: Arc<Shared>,
    analyzer: Arc<dyn InsightAnalyzer>,
    request: InsightRequest,
    selection: SelectedYear,
    timing: InsightTiming,
    session: SessionId,
) {
    tokio::time::sleep(timing.debounce).await;
    if !shared.is_current(session) {
        return;
    }

    let text = match analyzer.analyze(&request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(session, error = %e, "analysis failed, using fallback text");
            let text = fallback_text(&selection.point);
            shared.update(session, |v| {
                v.state = InsightState::Done {
                    session,
                    selection,
                    source: TextSource::Fallback,
                };
                v.text = text;
            });
            return;
        }
    };

    // Byte offset after each char so prefixes never split a code point
    let ends: Vec<usize> = text
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .collect();
    let total = ends.len();
    let step = timing.chars_per_tick.max(1);

    let started = shared.update(session, |v| {
        v.state = InsightState::Revealing {
            session,
            selection: selection.clone(),
            revealed: 0,
            total,
        };
        v.text.clear();
    });
    if !started {
        return;
    }

    let mut revealed = 0;
    while revealed < total {
        tokio::time::sleep(timing.tick).await;
        revealed = (revealed + step).min(total);
        let prefix = &text[..ends[revealed - 1]];
        let applied = shared.update(session, |v| {
            if let InsightState::Revealing { revealed: r, .. } = &mut v.state {
                *r = revealed;
            }
            v.text.clear();
            v.text.push_str(prefix);
        });
        if !applied {
            return;
        }
    }

    shared.update(session, |v| {
        v.state = InsightState::Done {
            session,
            selection,
            source: TextSource::Analysis,
        };
        v.text = text;
    });
    debug!(session, chars = total, "insight revealed");
}
