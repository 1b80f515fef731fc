//! Unit tests for the insight module

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::sleep;

use super::*;
use crate::error::ApiError;
use crate::testutil::{marker, point};
use crate::trend::{Dimension, MarkerKind, SelectedYear};

type Reply = Box<dyn Fn(&InsightRequest) -> Result<String, ApiError> + Send + Sync>;

/// Analyzer with a canned reply that records every call
struct ScriptedAnalyzer {
    requests: Mutex<Vec<InsightRequest>>,
    delay: Duration,
    reply: Reply,
}

impl ScriptedAnalyzer {
    fn new(
        delay: Duration,
        reply: impl Fn(&InsightRequest) -> Result<String, ApiError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            delay,
            reply: Box::new(reply),
        })
    }

    fn replying(text: &'static str) -> Arc<Self> {
        Self::new(Duration::ZERO, move |_| Ok(text.to_string()))
    }

    fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    fn last_request(&self) -> Option<InsightRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl InsightAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, request: &InsightRequest) -> Result<String, ApiError> {
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        (self.reply)(request)
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn selection(year: i32, score: u8) -> SelectedYear {
    SelectedYear {
        point: point(year, score),
        dimension: Dimension::Career,
    }
}

fn context() -> InsightContext {
    let pillar = |name: &str, gan: &str, zhi: &str| Pillar {
        name: name.to_string(),
        gan: gan.to_string(),
        zhi: zhi.to_string(),
    };
    InsightContext {
        pillars: vec![
            pillar("年柱", "庚", "午"),
            pillar("月柱", "辛", "巳"),
            pillar("日柱", "甲", "子"),
            pillar("时柱", "丙", "寅"),
        ],
        pattern: Some("燥".to_string()),
        favorable: vec!["水".to_string(), "金".to_string()],
    }
}

fn session_with(analyzer: Arc<ScriptedAnalyzer>, timing: InsightTiming) -> InsightSession {
    InsightSession::new(analyzer, context(), timing)
}

/// Wait until the current cycle stops loading or revealing
async fn settle(session: &InsightSession) -> InsightView {
    let mut rx = session.subscribe();
    let view = rx
        .wait_for(|v| !v.state.is_active())
        .await
        .expect("session dropped");
    view.clone()
}

#[test]
fn test_request_from_selection() {
    let mut sel = selection(2024, 75);
    sel.point.markers.push(marker("文昌", "📜", MarkerKind::Favorable));
    sel.point.markers.push(marker("冲太岁", "💥", MarkerKind::Unfavorable));

    let request = InsightRequest::new(&sel, &context());
    assert_eq!(request.target_year, 2024);
    assert_eq!(request.year_gan, "甲");
    assert_eq!(request.year_zhi, "辰");
    assert_eq!(request.year_score, 75);
    assert_eq!(request.shensha, vec!["文昌", "冲太岁"]);
    assert_eq!(request.dimension, "career");
    assert_eq!(request.pattern, "燥");
    assert_eq!(request.fav_gods, vec!["水", "金"]);
    assert_eq!(request.user_bazi.year, "庚午");
    assert_eq!(request.user_bazi.time, "丙寅");
}

#[test]
fn test_request_defaults_when_context_missing() {
    let request = InsightRequest::new(&selection(2024, 75), &InsightContext::default());
    assert_eq!(request.pattern, UNKNOWN_PATTERN);
    assert!(request.fav_gods.is_empty());
    assert_eq!(request.user_bazi, UserBazi::default());

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["user_bazi"]["day"], "");
    assert_eq!(json["target_year"], 2024);
}

#[test]
fn test_half_known_pillar_is_sent_empty() {
    let mut ctx = context();
    ctx.pillars[1].zhi = String::new();
    ctx.pillars[3].gan = " ".to_string();

    assert_eq!(ctx.pillars[0].ganzhi(), "庚午");
    assert_eq!(ctx.pillars[1].ganzhi(), "");
    assert_eq!(ctx.pillars[3].ganzhi(), "");

    let request = InsightRequest::new(&selection(2024, 75), &ctx);
    assert_eq!(request.user_bazi.year, "庚午");
    assert_eq!(request.user_bazi.month, "");
    assert_eq!(request.user_bazi.day, "甲子");
    assert_eq!(request.user_bazi.time, "");
}

#[test]
fn test_fallback_text_format() {
    assert_eq!(
        fallback_text(&point(2024, 75)),
        "【天机暂隐】连接云端失败，请稍后重试。(2024年 甲辰 运势指数: 75分)"
    );
}

#[test]
fn test_status_labels() {
    assert_eq!(InsightState::Idle.status_label(), "等待查询");
    let sel = selection(2000, 50);
    let loading = InsightState::Loading {
        session: 1,
        selection: sel.clone(),
    };
    assert_eq!(loading.status_label(), "正在推演...");
    let revealing = InsightState::Revealing {
        session: 1,
        selection: sel.clone(),
        revealed: 0,
        total: 3,
    };
    assert_eq!(revealing.status_label(), "正在解读...");
    let done = InsightState::Done {
        session: 1,
        selection: sel,
        source: TextSource::Analysis,
    };
    assert_eq!(done.status_label(), "解读完成");
}

#[tokio::test(start_paused = true)]
async fn test_select_waits_for_debounce() {
    let analyzer = ScriptedAnalyzer::replying("吉星高照");
    let mut session = session_with(analyzer.clone(), InsightTiming::default());

    let id = session.select(selection(2024, 75));
    let view = session.view();
    assert_eq!(view.state.session(), Some(id));
    assert!(matches!(view.state, InsightState::Loading { .. }));
    assert!(view.text.is_empty());
    assert_eq!(session.status_label(), "正在推演...");

    sleep(ms(290)).await;
    assert_eq!(analyzer.calls(), 0);

    sleep(ms(20)).await;
    assert_eq!(analyzer.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_reselection_fetches_once() {
    let analyzer = ScriptedAnalyzer::replying("吉星高照");
    let mut session = session_with(analyzer.clone(), InsightTiming::default());

    session.select(selection(2020, 40));
    sleep(ms(100)).await;
    session.select(selection(2021, 50));
    sleep(ms(100)).await;
    let last = session.select(selection(2022, 60));

    let view = settle(&session).await;
    assert_eq!(analyzer.calls(), 1);
    assert_eq!(analyzer.last_request().unwrap().target_year, 2022);
    assert_eq!(view.text, "吉星高照");
    match view.state {
        InsightState::Done {
            session,
            selection,
            source,
        } => {
            assert_eq!(session, last);
            assert_eq!(selection.point.year, 2022);
            assert_eq!(source, TextSource::Analysis);
        }
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_text_revealed_per_tick() {
    let analyzer = ScriptedAnalyzer::replying("天机不可泄露");
    let mut session = session_with(analyzer, InsightTiming::default());
    session.select(selection(2024, 75));

    sleep(ms(305)).await;
    let view = session.view();
    assert!(matches!(
        view.state,
        InsightState::Revealing {
            revealed: 0,
            total: 6,
            ..
        }
    ));
    assert_eq!(session.status_label(), "正在解读...");

    sleep(ms(25)).await;
    assert_eq!(session.view().text, "天");
    sleep(ms(25)).await;
    assert_eq!(session.view().text, "天机");

    let view = settle(&session).await;
    assert_eq!(view.text, "天机不可泄露");
    assert_eq!(session.status_label(), "解读完成");
}

#[tokio::test(start_paused = true)]
async fn test_chars_per_tick() {
    let analyzer = ScriptedAnalyzer::replying("天机不可泄露");
    let timing = InsightTiming {
        chars_per_tick: 4,
        ..InsightTiming::default()
    };
    let mut session = session_with(analyzer, timing);
    session.select(selection(2024, 75));

    sleep(ms(330)).await;
    assert_eq!(session.view().text, "天机不可");
    sleep(ms(25)).await;
    let view = session.view();
    assert_eq!(view.text, "天机不可泄露");
    assert!(matches!(view.state, InsightState::Done { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_shows_fallback() {
    let analyzer = ScriptedAnalyzer::new(Duration::ZERO, |_| Err(ApiError::Status(503)));
    let mut session = session_with(analyzer.clone(), InsightTiming::default());
    session.select(selection(2024, 75));

    let view = settle(&session).await;
    assert_eq!(analyzer.calls(), 1);
    assert_eq!(view.text, fallback_text(&point(2024, 75)));
    assert!(matches!(
        view.state,
        InsightState::Done {
            source: TextSource::Fallback,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_new_selection_supersedes_reveal() {
    let analyzer = ScriptedAnalyzer::new(Duration::ZERO, |r| Ok(format!("{}年解读", r.target_year)));
    let mut session = session_with(analyzer.clone(), InsightTiming::default());

    session.select(selection(2020, 40));
    sleep(ms(360)).await;
    assert_eq!(session.view().text, "20");

    session.select(selection(2021, 50));
    let view = session.view();
    assert!(view.text.is_empty());
    assert_eq!(view.state.selection().unwrap().point.year, 2021);

    // Nothing from the first cycle may leak into the second
    let mut rx = session.subscribe();
    loop {
        rx.changed().await.unwrap();
        let view = rx.borrow_and_update().clone();
        assert!("2021年解读".starts_with(&view.text), "text {:?}", view.text);
        if !view.state.is_active() {
            break;
        }
    }
    assert_eq!(session.view().text, "2021年解读");
    assert_eq!(analyzer.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_fetch_result_is_dropped() {
    let analyzer = ScriptedAnalyzer::new(ms(200), |r| Ok(format!("{}年解读", r.target_year)));
    let mut session = session_with(analyzer.clone(), InsightTiming::default());

    session.select(selection(2020, 40));
    // First call is in flight at this point
    sleep(ms(350)).await;
    assert_eq!(analyzer.calls(), 1);
    session.select(selection(2021, 50));

    let view = settle(&session).await;
    assert_eq!(view.text, "2021年解读");
    assert_eq!(view.state.selection().unwrap().point.year, 2021);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_keeps_revealed_text() {
    let analyzer = ScriptedAnalyzer::replying("天机不可泄露");
    let mut session = session_with(analyzer.clone(), InsightTiming::default());
    let id = session.select(selection(2024, 75));

    sleep(ms(360)).await;
    session.cancel();
    let view = session.view();
    assert_eq!(view.state, InsightState::Canceled { session: id });
    assert_eq!(view.text, "天机");
    assert_eq!(session.status_label(), "等待查询");

    sleep(ms(1000)).await;
    assert_eq!(session.view(), view);
    assert_eq!(analyzer.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_debounce_skips_fetch() {
    let analyzer = ScriptedAnalyzer::replying("天机不可泄露");
    let mut session = session_with(analyzer.clone(), InsightTiming::default());
    session.select(selection(2024, 75));
    sleep(ms(100)).await;
    session.cancel();

    sleep(ms(1000)).await;
    assert_eq!(analyzer.calls(), 0);
    assert!(matches!(session.view().state, InsightState::Canceled { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_done_is_noop() {
    let analyzer = ScriptedAnalyzer::replying("吉");
    let mut session = session_with(analyzer, InsightTiming::default());
    session.select(selection(2024, 75));
    let done = settle(&session).await;
    session.cancel();
    assert_eq!(session.view(), done);
}

#[tokio::test(start_paused = true)]
async fn test_reset_returns_to_idle() {
    let analyzer = ScriptedAnalyzer::replying("天机不可泄露");
    let mut session = session_with(analyzer.clone(), InsightTiming::default());
    session.select(selection(2024, 75));
    sleep(ms(360)).await;

    session.reset();
    assert_eq!(session.view(), InsightView::default());
    sleep(ms(1000)).await;
    assert_eq!(session.view(), InsightView::default());
    assert_eq!(analyzer.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_session_ids_increase() {
    let analyzer = ScriptedAnalyzer::replying("吉");
    let mut session = session_with(analyzer, InsightTiming::default());
    let a = session.select(selection(2020, 40));
    let b = session.select(selection(2021, 40));
    session.reset();
    let c = session.select(selection(2022, 40));
    assert!(a < b && b < c);
}
