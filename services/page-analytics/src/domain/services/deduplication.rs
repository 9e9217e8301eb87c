//! 重复帖子清理
//!
//! 同一帖子可能以 `{page}_{post}` 与 `{post}` 两种 ID 各存一份

use std::collections::BTreeMap;

use crate::domain::entities::Post;
use crate::domain::value_objects::{PageId, PostId};

/// 一组重复帖子
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub page_id: PageId,
    pub core_id: String,
    pub keep: PostId,
    pub remove: Vec<PostId>,
}

/// 清理计划
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupePlan {
    pub groups: Vec<DuplicateGroup>,
}

impl DedupePlan {
    /// 需要删除的全部帖子
    pub fn to_delete(&self) -> Vec<PostId> {
        self.groups
            .iter()
            .flat_map(|g| g.remove.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// 按 (page_id, core_id) 分组，每组保留互动最高的一条（平局保留 ID 较小者）
pub fn plan_duplicate_cleanup(posts: &[Post]) -> DedupePlan {
    let mut groups: BTreeMap<(&PageId, &str), Vec<&Post>> = BTreeMap::new();
    for post in posts {
        groups
            .entry((&post.page_id, post.post_id.core_id()))
            .or_default()
            .push(post);
    }

    let groups = groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|((page_id, core_id), mut members)| {
            members.sort_by(|a, b| {
                b.engagement()
                    .cmp(&a.engagement())
                    .then_with(|| a.post_id.cmp(&b.post_id))
            });
            DuplicateGroup {
                page_id: page_id.clone(),
                core_id: core_id.to_string(),
                keep: members[0].post_id.clone(),
                remove: members[1..].iter().map(|p| p.post_id.clone()).collect(),
            }
        })
        .collect();

    DedupePlan { groups }
}
