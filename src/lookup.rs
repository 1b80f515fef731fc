//! Static lookup tables: elements, dimensions, marker kinds

use crate::trend::{Dimension, MarkerKind};

/// One of the five elements (wuxing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// Chinese glyph for the element
    pub fn glyph(self) -> char {
        match self {
            Element::Wood => '木',
            Element::Fire => '火',
            Element::Earth => '土',
            Element::Metal => '金',
            Element::Water => '水',
        }
    }

    /// Display color (hex)
    pub fn color(self) -> &'static str {
        match self {
            Element::Wood => "#2ECC71",
            Element::Fire => "#E74C3C",
            Element::Earth => "#F39C12",
            Element::Metal => "#BDC3C7",
            Element::Water => "#3498DB",
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Element> {
        Element::ALL.into_iter().find(|e| e.glyph() == glyph)
    }

    /// Element of a heavenly stem
    pub fn of_stem(stem: char) -> Option<Element> {
        match stem {
            '甲' | '乙' => Some(Element::Wood),
            '丙' | '丁' => Some(Element::Fire),
            '戊' | '己' => Some(Element::Earth),
            '庚' | '辛' => Some(Element::Metal),
            '壬' | '癸' => Some(Element::Water),
            _ => None,
        }
    }

    /// Element of an earthly branch
    pub fn of_branch(branch: char) -> Option<Element> {
        match branch {
            '寅' | '卯' => Some(Element::Wood),
            '巳' | '午' => Some(Element::Fire),
            '辰' | '戌' | '丑' | '未' => Some(Element::Earth),
            '申' | '酉' => Some(Element::Metal),
            '亥' | '子' => Some(Element::Water),
            _ => None,
        }
    }
}

/// Day master strength from its own element's share of the chart energy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Strong,
    Balanced,
    Weak,
}

impl Strength {
    /// Shares of 30 and up are strong, 20 and up balanced
    pub fn from_share(share: f64) -> Strength {
        if share >= 30.0 {
            Strength::Strong
        } else if share >= 20.0 {
            Strength::Balanced
        } else {
            Strength::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strength::Strong => "身强",
            Strength::Balanced => "中和",
            Strength::Weak => "身弱",
        }
    }
}

/// Presentation data for a dimension tab
pub struct DimensionInfo {
    /// Tab title
    pub name: &'static str,
    /// Label used in the insight panel and analysis requests
    pub insight_label: &'static str,
    pub icon: &'static str,
    /// Accent color (hex, no alpha)
    pub color: &'static str,
    pub description: &'static str,
}

const DIMENSIONS: [DimensionInfo; 7] = [
    DimensionInfo {
        name: "综合运势",
        insight_label: "综合运势",
        icon: "☯️",
        color: "#D4AF37",
        description: "整体运势走向",
    },
    DimensionInfo {
        name: "事业运",
        insight_label: "仕途事业",
        icon: "💼",
        color: "#3498DB",
        description: "事业发展、职场晋升",
    },
    DimensionInfo {
        name: "财运",
        insight_label: "正财偏财",
        icon: "💰",
        color: "#F39C12",
        description: "财富收入、投资理财",
    },
    DimensionInfo {
        name: "健康运",
        insight_label: "身体发肤",
        icon: "❤️",
        color: "#2ECC71",
        description: "身体健康、精神状态",
    },
    DimensionInfo {
        name: "姻缘运",
        insight_label: "姻缘桃花",
        icon: "💕",
        color: "#E91E63",
        description: "感情婚姻、人际关系",
    },
    DimensionInfo {
        name: "父母运",
        insight_label: "高堂父母",
        icon: "👨‍👩‍👧",
        color: "#9B59B6",
        description: "父母健康、家庭和睦",
    },
    DimensionInfo {
        name: "子女运",
        insight_label: "子孙后代",
        icon: "👶",
        color: "#1ABC9C",
        description: "子女健康、子女发展",
    },
];

pub fn dimension_info(dimension: Dimension) -> &'static DimensionInfo {
    let idx = match dimension {
        Dimension::Overall => 0,
        Dimension::Career => 1,
        Dimension::Wealth => 2,
        Dimension::Health => 3,
        Dimension::Love => 4,
        Dimension::Parents => 5,
        Dimension::Children => 6,
    };
    &DIMENSIONS[idx]
}

/// Glyph color for a marker kind; neutral markers take the dimension accent
pub fn marker_kind_color(kind: MarkerKind, accent: &'static str) -> &'static str {
    match kind {
        MarkerKind::Favorable => "#2ECC71",
        MarkerKind::Unfavorable => "#E74C3C",
        MarkerKind::Romantic => "#FF69B4",
        MarkerKind::Eventful => "#6495ED",
        MarkerKind::Neutral => accent,
    }
}

/// Legend entry shown under the chart
pub struct LegendEntry {
    pub icon: &'static str,
    pub name: &'static str,
}

const fn entry(icon: &'static str, name: &'static str) -> LegendEntry {
    LegendEntry { icon, name }
}

const CAREER_LEGEND: [LegendEntry; 5] = [
    entry("📜", "文昌"),
    entry("🛡️", "贵人"),
    entry("⭐", "天德"),
    entry("🐎", "驿马"),
    entry("⚠️", "凶煞"),
];

const WEALTH_LEGEND: [LegendEntry; 4] = [
    entry("💰", "禄神"),
    entry("🛡️", "贵人"),
    entry("💸", "劫煞"),
    entry("⚠️", "比劫"),
];

const HEALTH_LEGEND: [LegendEntry; 4] = [
    entry("✨", "天德"),
    entry("🛡️", "贵人"),
    entry("🏥", "病符"),
    entry("⚰️", "丧门"),
];

const LOVE_LEGEND: [LegendEntry; 5] = [
    entry("💍", "红鸾"),
    entry("🌸", "桃花"),
    entry("🎊", "天喜"),
    entry("💑", "正缘"),
    entry("🎨", "华盖"),
];

const DEFAULT_LEGEND: [LegendEntry; 5] = [
    entry("🛡️", "贵人"),
    entry("🌸", "桃花"),
    entry("💍", "红鸾"),
    entry("💰", "禄神"),
    entry("🐎", "驿马"),
];

/// Marker legend for the active dimension
pub fn dimension_legend(dimension: Dimension) -> &'static [LegendEntry] {
    match dimension {
        Dimension::Career => &CAREER_LEGEND,
        Dimension::Wealth => &WEALTH_LEGEND,
        Dimension::Health => &HEALTH_LEGEND,
        Dimension::Love => &LOVE_LEGEND,
        _ => &DEFAULT_LEGEND,
    }
}
