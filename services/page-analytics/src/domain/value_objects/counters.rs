//! 互动计数与评分

use pagepulse_common::{ratio, round2};
use serde::{Deserialize, Serialize};

/// 帖子互动计数（最新值或某日快照）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounters {
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: i64,
    pub reach: i64,
    pub total_clicks: i64,
    pub link_clicks: i64,
    pub other_clicks: i64,
}

impl EngagementCounters {
    /// reactions + comments + shares
    pub fn engagement(&self) -> i64 {
        self.reactions + self.comments + self.shares
    }

    /// Primary Engagement Score，评论和分享权重更高
    pub fn pes(&self) -> i64 {
        self.reactions + self.comments * 2 + self.shares * 3
    }

    /// 至少有一项互动
    pub fn is_active(&self) -> bool {
        self.reactions > 0 || self.comments > 0 || self.shares > 0
    }

    /// shares / engagement
    pub fn viral_coefficient(&self) -> f64 {
        round2(ratio(self.shares as f64, self.engagement() as f64))
    }

    /// engagement / reach 百分比
    pub fn engagement_rate(&self) -> f64 {
        round2(ratio(self.engagement() as f64, self.reach as f64) * 100.0)
    }

    /// 手工导出对账：各项取较大值，点击数保持不变
    pub fn raised_to(&self, other: &EngagementCounters) -> EngagementCounters {
        EngagementCounters {
            reactions: self.reactions.max(other.reactions),
            comments: self.comments.max(other.comments),
            shares: self.shares.max(other.shares),
            views: self.views.max(other.views),
            reach: self.reach.max(other.reach),
            ..*self
        }
    }
}

/// 表情细分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionBreakdown {
    pub like: i64,
    pub love: i64,
    pub haha: i64,
    pub wow: i64,
    pub sad: i64,
    pub angry: i64,
}

impl ReactionBreakdown {
    pub const TYPES: [&'static str; 6] = ["LIKE", "LOVE", "HAHA", "WOW", "SAD", "ANGRY"];

    pub fn total(&self) -> i64 {
        self.like + self.love + self.haha + self.wow + self.sad + self.angry
    }

    /// 按 Graph API 的表情类型名写入
    pub fn set(&mut self, reaction_type: &str, count: i64) {
        match reaction_type {
            "LIKE" => self.like = count,
            "LOVE" => self.love = count,
            "HAHA" => self.haha = count,
            "WOW" => self.wow = count,
            "SAD" => self.sad = count,
            "ANGRY" => self.angry = count,
            _ => {}
        }
    }

    /// Quality Engagement Score: (love + wow + haha) / reactions · 100
    pub fn qes(&self, reactions: i64) -> f64 {
        round2(ratio((self.love + self.wow + self.haha) as f64, reactions as f64) * 100.0)
    }
}
