//! 受众重叠估算
//!
//! 两个主页之间按内容关键词、发帖时间、互动水平与帖子类型四个维度比较，
//! 加权得出估算的受众重叠度

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use chrono::{NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use pagepulse_common::{ratio, round1, round2};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AudienceOverlap, Post};
use crate::domain::services::{local_hour, local_weekday};
use crate::domain::value_objects::PageId;

/// 每个主页最多分析的帖子数（最新的）
pub const OVERLAP_POST_LIMIT: usize = 500;

pub const ANALYSIS_METHOD: &str = "combined";

const CONTENT_WEIGHT: f64 = 0.4;
const TIMING_WEIGHT: f64 = 0.3;
const ENGAGEMENT_WEIGHT: f64 = 0.3;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http\S+|www\.\S+").expect("valid regex"));
static NON_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid regex"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
        "our", "out", "has", "have", "been", "this", "that", "with", "they", "from", "will",
        "what", "when", "where", "which", "their", "there", "about", "would", "could", "should",
        "your", "just", "like", "more", "some", "into", "only", "other", "than", "then", "very",
        "also", "back", "after", "most", "over", "such", "each", "those", "both", "being", "here",
        "live", "stream", "video", "post", "watch", "now", "new", "today",
    ]
    .into_iter()
    .collect()
});

/// 提取关键词：去掉链接，仅保留字母，小写，至少 3 个字母，去停用词
pub fn extract_keywords(text: &str) -> Vec<String> {
    let without_urls = URL_PATTERN.replace_all(text, "");
    let letters = NON_LETTER.replace_all(&without_urls, " ");
    letters
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(w.as_str()))
        .collect()
}

fn keyword_counts(posts: &[Post]) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for post in posts {
        for text in [post.title.as_deref(), post.description.as_deref()]
            .into_iter()
            .flatten()
        {
            for word in extract_keywords(text) {
                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// 余弦相似度（0-1），任一侧为空时为 0
pub fn cosine_similarity<K, V>(a: &HashMap<K, V>, b: &HashMap<K, V>) -> f64
where
    K: Eq + Hash,
    V: Copy + Into<f64>,
{
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(k, va)| b.get(k).map(|vb| Into::<f64>::into(*va) * Into::<f64>::into(*vb)))
        .sum();
    let magnitude = |m: &HashMap<K, V>| {
        m.values()
            .map(|v| Into::<f64>::into(*v).powi(2))
            .sum::<f64>()
            .sqrt()
    };
    let (mag_a, mag_b) = (magnitude(a), magnitude(b));
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// 按计数降序取前 n 个，计数相同按键升序
fn most_common<K: Ord + Clone>(counts: &HashMap<K, u32>, n: usize) -> Vec<K> {
    let mut entries: Vec<(&K, &u32)> = counts.iter().collect();
    entries.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    entries.into_iter().take(n).map(|(k, _)| k.clone()).collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn round4(value: f64) -> f64 {
    (value * 10000.0).round() / 10000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSimilarity {
    pub cosine_similarity: f64,
    pub jaccard_similarity: f64,
    pub common_keywords: usize,
    pub unique_page_1: usize,
    pub unique_page_2: usize,
    pub top_common: Vec<String>,
    pub top_unique_1: Vec<String>,
    pub top_unique_2: Vec<String>,
}

pub fn analyze_content(posts_1: &[Post], posts_2: &[Post]) -> ContentSimilarity {
    let k1 = keyword_counts(posts_1);
    let k2 = keyword_counts(posts_2);

    let keys_1: HashSet<&String> = k1.keys().collect();
    let keys_2: HashSet<&String> = k2.keys().collect();
    let union = keys_1.union(&keys_2).count();

    let common: HashMap<String, u32> = keys_1
        .intersection(&keys_2)
        .map(|k| ((*k).clone(), k1[*k] + k2[*k]))
        .collect();
    let unique_1: HashMap<String, u32> = k1
        .iter()
        .filter(|(k, _)| !k2.contains_key(*k))
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    let unique_2: HashMap<String, u32> = k2
        .iter()
        .filter(|(k, _)| !k1.contains_key(*k))
        .map(|(k, v)| (k.clone(), *v))
        .collect();

    ContentSimilarity {
        cosine_similarity: round2(cosine_similarity(&k1, &k2) * 100.0),
        jaccard_similarity: round2(ratio(common.len() as f64, union as f64) * 100.0),
        common_keywords: common.len(),
        unique_page_1: unique_1.len(),
        unique_page_2: unique_2.len(),
        top_common: most_common(&common, 10),
        top_unique_1: most_common(&unique_1, 5),
        top_unique_2: most_common(&unique_2, 5),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPatterns {
    pub hour_correlation: f64,
    pub day_correlation: f64,
    pub peak_hours_page_1: Vec<u32>,
    pub peak_hours_page_2: Vec<u32>,
    pub common_peak_hours: Vec<u32>,
    pub peak_days_page_1: Vec<String>,
    pub peak_days_page_2: Vec<String>,
    pub posts_analyzed_1: usize,
    pub posts_analyzed_2: usize,
}

fn day_name(weekday: u32) -> String {
    const NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    NAMES[weekday as usize % 7].to_string()
}

fn time_histograms(posts: &[Post], tz: Tz) -> (HashMap<u32, u32>, HashMap<u32, u32>) {
    let mut hours = HashMap::new();
    let mut days = HashMap::new();
    for instant in posts.iter().filter_map(|p| p.publish_time) {
        *hours.entry(local_hour(instant, tz)).or_insert(0) += 1;
        let weekday: Weekday = local_weekday(instant, tz);
        *days.entry(weekday.num_days_from_monday()).or_insert(0) += 1;
    }
    (hours, days)
}

pub fn analyze_timing(posts_1: &[Post], posts_2: &[Post], tz: Tz) -> TimingPatterns {
    let (hours_1, days_1) = time_histograms(posts_1, tz);
    let (hours_2, days_2) = time_histograms(posts_2, tz);

    let peak_hours_1 = most_common(&hours_1, 3);
    let peak_hours_2 = most_common(&hours_2, 3);
    let mut common_peak_hours: Vec<u32> = peak_hours_1
        .iter()
        .filter(|h| peak_hours_2.contains(h))
        .copied()
        .collect();
    common_peak_hours.sort_unstable();

    TimingPatterns {
        hour_correlation: round3(cosine_similarity(&hours_1, &hours_2)),
        day_correlation: round3(cosine_similarity(&days_1, &days_2)),
        peak_hours_page_1: peak_hours_1,
        peak_hours_page_2: peak_hours_2,
        common_peak_hours,
        peak_days_page_1: most_common(&days_1, 3).into_iter().map(day_name).collect(),
        peak_days_page_2: most_common(&days_2, 3).into_iter().map(day_name).collect(),
        posts_analyzed_1: posts_1.len(),
        posts_analyzed_2: posts_2.len(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub avg_engagement: f64,
    pub avg_reactions: f64,
    pub avg_comments: f64,
    pub avg_shares: f64,
    pub avg_views: f64,
    pub engagement_rate: f64,
    pub total_posts: usize,
}

impl EngagementMetrics {
    fn from_posts(posts: &[Post]) -> Self {
        if posts.is_empty() {
            return Self::default();
        }
        let n = posts.len() as f64;
        let sum = |f: fn(&Post) -> i64| posts.iter().map(f).sum::<i64>() as f64;

        let reactions = sum(|p| p.counters.reactions);
        let comments = sum(|p| p.counters.comments);
        let shares = sum(|p| p.counters.shares);
        let views = sum(|p| p.counters.views);
        let reach = sum(|p| p.counters.reach);
        let engagement = reactions + comments + shares;

        Self {
            avg_engagement: round2(engagement / n),
            avg_reactions: round2(reactions / n),
            avg_comments: round2(comments / n),
            avg_shares: round2(shares / n),
            avg_views: round2(views / n),
            engagement_rate: round4(ratio(engagement, reach) * 100.0),
            total_posts: posts.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementPatterns {
    pub page_1_metrics: EngagementMetrics,
    pub page_2_metrics: EngagementMetrics,
    pub pattern_similarity: f64,
    pub engagement_rate_similarity: f64,
    pub page_1_distribution: BTreeMap<String, u32>,
    pub page_2_distribution: BTreeMap<String, u32>,
}

/// 互动量分档：low < 10 ≤ medium < 50 ≤ high < 200 ≤ viral
fn engagement_level(engagement: i64) -> &'static str {
    match engagement {
        e if e < 10 => "low",
        e if e < 50 => "medium",
        e if e < 200 => "high",
        _ => "viral",
    }
}

fn level_histogram(posts: &[Post]) -> HashMap<String, u32> {
    let mut levels = HashMap::new();
    for post in posts {
        *levels
            .entry(engagement_level(post.engagement()).to_string())
            .or_insert(0) += 1;
    }
    levels
}

pub fn analyze_engagement(posts_1: &[Post], posts_2: &[Post]) -> EngagementPatterns {
    let metrics_1 = EngagementMetrics::from_posts(posts_1);
    let metrics_2 = EngagementMetrics::from_posts(posts_2);
    let levels_1 = level_histogram(posts_1);
    let levels_2 = level_histogram(posts_2);

    let rate_diff = (metrics_1.engagement_rate - metrics_2.engagement_rate).abs();

    EngagementPatterns {
        pattern_similarity: round2(cosine_similarity(&levels_1, &levels_2) * 100.0),
        engagement_rate_similarity: round2((100.0 - rate_diff * 100.0).max(0.0)),
        page_1_metrics: metrics_1,
        page_2_metrics: metrics_2,
        page_1_distribution: levels_1.into_iter().collect(),
        page_2_distribution: levels_2.into_iter().collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTypeMix {
    pub page_1_distribution: BTreeMap<String, f64>,
    pub page_2_distribution: BTreeMap<String, f64>,
    pub distribution_similarity: f64,
    pub common_types: Vec<String>,
}

/// 各类型占比（百分比，1 位小数）
fn type_distribution(posts: &[Post]) -> HashMap<String, f64> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for post in posts {
        *counts.entry(post.post_type.as_str().to_string()).or_insert(0) += 1;
    }
    let total = posts.len() as f64;
    counts
        .into_iter()
        .map(|(t, c)| (t, round1(ratio(f64::from(c), total) * 100.0)))
        .collect()
}

pub fn analyze_post_types(posts_1: &[Post], posts_2: &[Post]) -> PostTypeMix {
    let dist_1 = type_distribution(posts_1);
    let dist_2 = type_distribution(posts_2);

    let mut common_types: Vec<String> = dist_1
        .keys()
        .filter(|t| dist_2.contains_key(*t))
        .cloned()
        .collect();
    common_types.sort();

    PostTypeMix {
        distribution_similarity: round2(cosine_similarity(&dist_1, &dist_2) * 100.0),
        common_types,
        page_1_distribution: dist_1.into_iter().collect(),
        page_2_distribution: dist_2.into_iter().collect(),
    }
}

/// 各维度明细，存入 `notes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapNotes {
    pub content: ContentSimilarity,
    pub timing: TimingPatterns,
    pub engagement: EngagementPatterns,
    pub post_types: PostTypeMix,
}

fn recommendations(notes: &OverlapNotes, content_score: f64) -> Vec<String> {
    let mut out = Vec::new();
    if content_score > 50.0 {
        out.push("High content similarity - consider differentiating topics".to_string());
    } else if content_score < 20.0 {
        out.push("Low content similarity - pages target different topics".to_string());
    }

    if !notes.timing.common_peak_hours.is_empty() {
        let hours: Vec<String> = notes
            .timing
            .common_peak_hours
            .iter()
            .map(u32::to_string)
            .collect();
        out.push(format!("Both pages peak at hours: {}", hours.join(", ")));
    }

    if notes.engagement.page_1_metrics.engagement_rate
        > notes.engagement.page_2_metrics.engagement_rate
    {
        out.push("Page 1 has higher engagement rate".to_string());
    } else {
        out.push("Page 2 has higher engagement rate".to_string());
    }

    if notes.post_types.distribution_similarity > 70.0 {
        out.push("Similar content type mix - audiences may overlap".to_string());
    }
    out
}

/// 对两个主页的帖子做重叠分析
///
/// 调用方负责把帖子限制为各自最新的 [`OVERLAP_POST_LIMIT`] 条
pub fn analyze_overlap(
    page_id_1: &PageId,
    posts_1: &[Post],
    page_id_2: &PageId,
    posts_2: &[Post],
    tz: Tz,
    analysis_date: NaiveDate,
) -> AudienceOverlap {
    let notes = OverlapNotes {
        content: analyze_content(posts_1, posts_2),
        timing: analyze_timing(posts_1, posts_2, tz),
        engagement: analyze_engagement(posts_1, posts_2),
        post_types: analyze_post_types(posts_1, posts_2),
    };

    let content_score =
        (notes.content.cosine_similarity + notes.content.jaccard_similarity) / 2.0;
    let timing_correlation =
        (notes.timing.hour_correlation + notes.timing.day_correlation) / 2.0;
    let timing_score = timing_correlation * 100.0;
    let engagement_score = notes.engagement.pattern_similarity;
    let estimated = content_score * CONTENT_WEIGHT
        + timing_score * TIMING_WEIGHT
        + engagement_score * ENGAGEMENT_WEIGHT;

    let recommendations = recommendations(&notes, content_score);

    AudienceOverlap {
        id: None,
        page_id_1: page_id_1.clone(),
        page_id_2: page_id_2.clone(),
        analysis_date,
        content_similarity: round2(content_score),
        timing_correlation: round3(timing_correlation),
        engagement_pattern_score: engagement_score,
        estimated_overlap_percentage: round2(estimated),
        analysis_method: ANALYSIS_METHOD.to_string(),
        recommendations,
        notes: serde_json::to_value(&notes).unwrap_or(serde_json::Value::Null),
        created_at: Utc::now(),
    }
}
