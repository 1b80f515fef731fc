use colored::*;

use lifetrend::api::FortuneReport;
use lifetrend::insight::Pillar;
use lifetrend::lookup::{Element, dimension_info, dimension_legend};
use lifetrend::trend::{Dimension, ScoreBand, SelectedYear, TimeWindow, TrendPoint};

/// Icons shown before the selection header collapses into "+N"
const MAX_HEADER_ICONS: usize = 4;
/// Width of the score bar in the year table
const BAR_WIDTH: usize = 20;

fn style_label(label: &str) -> ColoredString {
    label.bold()
}

pub(crate) fn print_error(msg: &str) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub(crate) fn print_warning(msg: &str) {
    eprintln!("{}: {}", "warning".yellow().bold(), msg);
}

pub(crate) fn get_display_name(filename: &str) -> &str {
    std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename)
}

/// `#RRGGBB` to an RGB triple
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn paint(text: &str, hex: &str) -> ColoredString {
    match hex_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn paint_element(glyph: char, element: Option<Element>) -> ColoredString {
    let text = glyph.to_string();
    match element {
        Some(e) => paint(&text, e.color()).bold(),
        None => text.normal(),
    }
}

fn style_score(score: u8, band: ScoreBand) -> ColoredString {
    let formatted = format!("{:>3}", score);
    match band {
        ScoreBand::Favorable => formatted.green().bold(),
        ScoreBand::Average => formatted.normal(),
        ScoreBand::Unfavorable => formatted.red(),
    }
}

fn score_bar(score: u8) -> String {
    let filled = (score as usize * BAR_WIDTH).div_ceil(100);
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}

/// Element energy is a share of roughly 100, drawn like a score
fn energy_bar(energy: f64) -> String {
    score_bar(energy.clamp(0.0, 100.0).round() as u8)
}

pub(crate) fn print_report_info(source: &str, report: &FortuneReport) {
    println!("Source: {}", get_display_name(source));
    if !report.nickname.is_empty() {
        println!("Name: {} {}", report.nickname, report.gender);
    }
    let info = &report.birth_info;
    if !info.solar.is_empty() {
        println!("Born: {} {}", info.solar, info.location);
    }
    if !report.bazi.pillars.is_empty() {
        print!("Pillars:");
        for pillar in &report.bazi.pillars {
            print!(" ");
            print_pillar(pillar);
        }
        println!();
    }
    print_day_master(report);
    println!();
}

fn print_day_master(report: &FortuneReport) {
    let bazi = &report.bazi;
    let soul = report.meta.as_ref().and_then(|m| m.soul.as_ref());
    let Some(stem) = bazi.day_master.chars().next() else {
        if let Some(soul) = soul {
            println!("Day master: {} {} {}", soul.icon, soul.gan, soul.image);
        }
        return;
    };

    print!("Day master: {}", paint_element(stem, bazi.day_master_element()));
    if let Some(strength) = bazi.day_master_strength() {
        print!(" {}", style_label(strength.label()));
    }
    if let Some(soul) = soul {
        print!("  {} {}", soul.icon, soul.image);
    }
    println!();

    let favorable = bazi.favorable_elements();
    if !favorable.is_empty() {
        print!("Favorable:");
        for element in favorable {
            print!(" {}", paint_element(element.glyph(), Some(element)));
        }
        println!();
    }

    if !bazi.energy_scores.is_empty() {
        println!("Energy:");
        for element in Element::ALL {
            let energy = bazi.energy(element);
            println!(
                "  {}  {:>5.1}  {}",
                paint_element(element.glyph(), Some(element)),
                energy,
                paint(&energy_bar(energy), element.color())
            );
        }
    }
}

fn print_pillar(pillar: &Pillar) {
    let stem = pillar.gan.chars().next();
    let branch = pillar.zhi.chars().next();
    if let Some(c) = stem {
        print!("{}", paint_element(c, Element::of_stem(c)));
    }
    if let Some(c) = branch {
        print!("{}", paint_element(c, Element::of_branch(c)));
    }
}

pub(crate) fn print_view_info(dimension: Dimension, window: TimeWindow, years: usize) {
    let info = dimension_info(dimension);
    println!(
        "{} {}  ({}, {} years)",
        info.icon,
        paint(info.name, info.color).bold(),
        window.label(),
        years
    );
    println!("{}", info.description.dimmed());
    println!();
}

pub(crate) fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

pub(crate) fn print_year_table(points: &[TrendPoint]) {
    println!("YEAR  GZ   SCORE  {:<width$}  MARKERS", "", width = BAR_WIDTH);
    print_separator(20 + BAR_WIDTH + 10);
    for point in points {
        print_year_row(point);
    }
}

fn print_year_row(point: &TrendPoint) {
    print!("{} ", point.year);
    for (i, c) in point.ganzhi.chars().take(2).enumerate() {
        let element = if i == 0 {
            Element::of_stem(c)
        } else {
            Element::of_branch(c)
        };
        print!("{}", paint_element(c, element));
    }
    print!("   {}  ", style_score(point.score, point.band()));
    let bar = score_bar(point.score);
    match point.band() {
        ScoreBand::Favorable => print!(" {}", bar.green()),
        ScoreBand::Average => print!(" {}", bar),
        ScoreBand::Unfavorable => print!(" {}", bar.red()),
    }
    for marker in &point.markers {
        print!("  {} {}", marker.icon, marker.name);
    }
    println!();
}

/// Header line of the insight panel
pub(crate) fn print_selection(selection: &SelectedYear, status: &str) {
    let point = &selection.point;
    let info = dimension_info(selection.dimension);
    let mut icons: Vec<&str> = point
        .markers
        .iter()
        .map(|m| m.icon.as_str())
        .take(MAX_HEADER_ICONS)
        .collect();
    let extra = point.markers.len().saturating_sub(MAX_HEADER_ICONS);
    let overflow = format!("+{}", extra);
    if extra > 0 {
        icons.push(&overflow);
    }

    println!(
        "{} {} {}  {} {}  {}",
        style_label(&point.year.to_string()),
        point.ganzhi,
        info.insight_label,
        style_score(point.score, point.band()),
        icons.join(" "),
        status.dimmed()
    );
    print_separator(40);
}

pub(crate) fn print_legend(dimension: Dimension) {
    let entries: Vec<String> = dimension_legend(dimension)
        .iter()
        .map(|e| format!("{} {}", e.icon, e.name))
        .collect();
    println!("Markers: {}", entries.join("  "));
    println!("Score: ≥70 favorable (green), <40 unfavorable (red)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb("#2ECC71"), Some((0x2E, 0xCC, 0x71)));
        assert_eq!(hex_rgb("2ECC71"), None);
        assert_eq!(hex_rgb("#FFF"), None);
        assert_eq!(hex_rgb("#GGGGGG"), None);
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0).chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(score_bar(100).chars().filter(|&c| c == '█').count(), BAR_WIDTH);
        assert_eq!(score_bar(51).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_energy_bar() {
        let filled = |s: String| s.chars().filter(|&c| c == '█').count();
        assert_eq!(filled(energy_bar(32.4)), filled(score_bar(32)));
        assert_eq!(filled(energy_bar(-5.0)), 0);
        assert_eq!(filled(energy_bar(140.0)), BAR_WIDTH);
        assert_eq!(energy_bar(f64::NAN).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_get_display_name() {
        assert_eq!(get_display_name("/tmp/report.json"), "report.json");
        assert_eq!(get_display_name("report.json"), "report.json");
    }
}
