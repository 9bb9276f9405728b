use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Zero-based page selection sent as `page` and `size` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn first(size: u32) -> Self {
        Self::new(0, size)
    }

    pub fn next(&self) -> Self {
        Self::new(self.page + 1, self.size)
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

/// Append `incoming` to `existing`, one entry per id.
///
/// Pages can overlap when new items are published between requests. A
/// repeated id keeps its original position but takes the newer value, so a
/// status change seen on a later page is not lost.
pub fn merge_unique_by_id<T, F>(existing: &mut Vec<T>, incoming: Vec<T>, id: F)
where
    F: Fn(&T) -> &str,
{
    let mut positions: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(index, item)| (id(item).to_string(), index))
        .collect();
    for item in incoming {
        match positions.get(id(&item)) {
            Some(&index) => existing[index] = item,
            None => {
                positions.insert(id(&item).to_string(), existing.len());
                existing.push(item);
            }
        }
    }
}
