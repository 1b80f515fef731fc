//! Fixtures shared by unit tests

use crate::trend::{Dimension, DimensionSeries, Marker, MarkerKind, MultiDimensionTrend, TrendPoint};

const STEMS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];
const BRANCHES: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

/// Sexagenary label for a year (1984 is 甲子)
pub(crate) fn ganzhi(year: i32) -> String {
    let offset = (year - 1984).rem_euclid(60) as usize;
    format!("{}{}", STEMS[offset % 10], BRANCHES[offset % 12])
}

pub(crate) fn marker(name: &str, icon: &str, kind: MarkerKind) -> Marker {
    Marker {
        name: name.to_string(),
        icon: icon.to_string(),
        kind,
        desc: String::new(),
    }
}

pub(crate) fn point(year: i32, score: u8) -> TrendPoint {
    TrendPoint {
        year,
        ganzhi: ganzhi(year),
        score,
        markers: Vec::new(),
    }
}

/// `count` consecutive years with a deterministic score wave
pub(crate) fn points(start: i32, count: usize, seed: u32) -> Vec<TrendPoint> {
    (0..count)
        .map(|i| {
            let score = 20 + ((i as u32 * 7 + seed * 13) % 70) as u8;
            point(start + i as i32, score)
        })
        .collect()
}

pub(crate) fn multi(start: i32, count: usize) -> MultiDimensionTrend {
    Dimension::ALL
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            (
                d,
                DimensionSeries::new(d.key(), points(start, count, i as u32 + 1)),
            )
        })
        .collect()
}

/// Run `f` with a subscriber that records every event as plain text
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let sink = Sink::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = sink.0.lock().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
