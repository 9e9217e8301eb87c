//! 单元格解析

use pagepulse_common::truncate_chars;

use crate::domain::entities::MAX_TITLE_CHARS;

/// 整数单元格：空值、`N/A` 与无法解析的值为 0；去掉千分位，小数截断
pub fn parse_int(raw: &str) -> i64 {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("n/a") {
        return 0;
    }
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    if let Ok(n) = cleaned.parse::<i64>() {
        return n;
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// 布尔单元格：true / yes / 1 / y
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "y"
    )
}

/// 文本单元格：去首尾空白，空串为 None
pub fn parse_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 标题按字符截断
pub fn parse_title(raw: &str) -> Option<String> {
    parse_text(raw).map(|t| truncate_chars(&t, MAX_TITLE_CHARS).to_string())
}
