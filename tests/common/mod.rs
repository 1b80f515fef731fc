//! Common test utilities

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use serde_json::{Value, json};

pub const FIRST_YEAR: i32 = 1990;
pub const YEARS: usize = 80;

const STEMS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];
const BRANCHES: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

const DIMENSIONS: [(&str, &str); 7] = [
    ("overall", "综合运势"),
    ("career", "事业运"),
    ("wealth", "财运"),
    ("health", "健康运"),
    ("love", "姻缘运"),
    ("parents", "父母运"),
    ("children", "子女运"),
];

/// Sexagenary label of a year (1984 is 甲子)
pub fn ganzhi(year: i32) -> String {
    let idx = (year - 1984).rem_euclid(60) as usize;
    format!("{}{}", STEMS[idx % 10], BRANCHES[idx % 12])
}

/// Deterministic score in 20..90
pub fn score(index: usize, seed: usize) -> u8 {
    (20 + (index * 7 + seed * 13) % 70) as u8
}

fn markers(year: i32) -> Value {
    match year {
        2024 => json!([
            {"name": "天乙贵人", "icon": "🛡️", "type": "吉", "desc": "逢凶化吉"},
            {"name": "冲太岁", "icon": "⚡", "type": "凶", "desc": ""}
        ]),
        2030 => json!([{"name": "红鸾", "icon": "💍", "type": "缘", "desc": ""}]),
        _ => json!([]),
    }
}

fn series(seed: usize) -> Vec<Value> {
    (0..YEARS)
        .map(|i| {
            let year = FIRST_YEAR + i as i32;
            json!({
                "year": year,
                "ganzhi": ganzhi(year),
                "score": score(i, seed),
                "markers": markers(year),
            })
        })
        .collect()
}

/// Calculate response for an 80-year life with all seven dimensions
pub fn sample_report() -> Value {
    let mut multi = serde_json::Map::new();
    for (seed, (key, name)) in DIMENSIONS.iter().enumerate() {
        multi.insert(
            key.to_string(),
            json!({"name": name, "data": series(seed + 1)}),
        );
    }
    json!({
        "success": true,
        "data": {
            "nickname": "测试",
            "gender": "乾造",
            "birth_info": {"solar": "1990年5月15日 10时30分", "location": "北京市 北京", "longitude": 116.41},
            "bazi": {
                "pillars": [
                    {"name": "年柱", "gan": "庚", "zhi": "午"},
                    {"name": "月柱", "gan": "辛", "zhi": "巳"},
                    {"name": "日柱", "gan": "甲", "zhi": "子"},
                    {"name": "时柱", "gan": "己", "zhi": "巳"}
                ],
                "day_master": "甲",
                "climate": "燥",
                "favorable": ["水", "金"],
                "energy_scores": {"木": 32.0, "火": 28.5, "土": 18.0, "金": 11.5, "水": 20.0}
            },
            "life_trend": series(1),
            "multi_dimension_trend": Value::Object(multi),
            "meta": {"pattern": "燥", "fav_gods": ["水"]}
        }
    })
}

/// Write a JSON value to the given path
pub fn write_json(path: &Path, value: &Value) -> std::io::Result<()> {
    std::fs::write(path, serde_json::to_vec_pretty(value)?)
}

/// Config with an instant debounce and a fast reveal
pub fn write_fast_config(dir: &Path, base_url: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("lifetrend.toml");
    let content = format!(
        "[api]\nbase_url = \"{}\"\ntimeout_secs = 5\n\n[insight]\ndebounce_ms = 0\ntick_ms = 1\nchars_per_tick = 2\n",
        base_url
    );
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Answer exactly one HTTP request with `body`, returning the raw request text
pub fn serve_once(body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        request
    });
    (url, handle)
}

/// Answer `count` HTTP requests, each with the body of the first route whose
/// prefix matches the request line (404 otherwise). Returns the raw requests.
pub fn serve_routes(
    routes: Vec<(&'static str, String)>,
    count: usize,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = std::thread::spawn(move || {
        let mut requests = Vec::new();
        for stream in listener.incoming().take(count) {
            let mut stream = stream.unwrap();
            let request = read_request(&mut stream);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let response = match routes.iter().find(|(prefix, _)| request_line.starts_with(*prefix)) {
                Some((_, body)) => format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                ),
                None => "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n".to_string(),
            };
            stream.write_all(response.as_bytes()).unwrap();
            requests.push(request);
        }
        requests
    });
    (url, handle)
}

fn read_request<R: Read>(stream: &mut R) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let body_len = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + body_len {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
