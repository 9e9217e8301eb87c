//! 通用类型定义

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 分页参数
///
/// `page` 从 1 开始；`page_size` 即前端的 `per_page`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// 超大页码饱和到 `u64::MAX`，不会溢出
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.page_size))
    }

    /// 对内存中的切片做分页
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset())
            .unwrap_or(usize::MAX)
            .min(items.len());
        let end = start
            .saturating_add(self.page_size as usize)
            .min(items.len());
        &items[start..end]
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        ((self.total as f64) / (self.page_size as f64)).ceil() as u32
    }
}

/// 闭区间日期范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 由一组日期计算最小/最大值，空集合返回 None
    pub fn spanning<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().fold(None, |acc, date| match acc {
            None => Some(Self {
                start: date,
                end: date,
            }),
            Some(range) => Some(Self {
                start: range.start.min(date),
                end: range.end.max(date),
            }),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset() {
        assert_eq!(Pagination::new(1, 50).offset(), 0);
        assert_eq!(Pagination::new(3, 20).offset(), 40);
        // page 0 被修正为 1
        assert_eq!(Pagination::new(0, 20).offset(), 0);
    }

    #[test]
    fn test_pagination_slice() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(Pagination::new(2, 3).slice(&items), &[4, 5, 6]);
        assert_eq!(Pagination::new(3, 3).slice(&items), &[7]);
        assert!(Pagination::new(9, 3).slice(&items).is_empty());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let pagination = Pagination::new(u32::MAX, 200);
        assert_eq!(pagination.offset(), u64::from(u32::MAX - 1) * 200);
        assert!(Pagination::new(100_000_000, 50).slice(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_total_pages() {
        let result: PagedResult<u8> = PagedResult::new(vec![], 101, &Pagination::new(1, 50));
        assert_eq!(result.total_pages(), 3);
    }

    #[test]
    fn test_date_range_spanning() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let range = DateRange::spanning(vec![d("2025-01-05"), d("2024-12-30"), d("2025-01-02")])
            .unwrap();
        assert_eq!(range.start, d("2024-12-30"));
        assert_eq!(range.end, d("2025-01-05"));
        assert!(range.contains(d("2025-01-01")));
        assert!(DateRange::spanning(Vec::<NaiveDate>::new()).is_none());
    }
}
