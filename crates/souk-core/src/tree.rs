//! # Category Tree Denormalization
//!
//! Pure computation of the `children` / `subchildren` caches embedded on
//! main-category documents. The migration endpoint and the standalone
//! `souk-migrate` binary both call [`rebuild`] and write the result back
//! wholesale; nothing here is incremental.
//!
//! ## Invariant
//! For every main category M:
//! - `children(M)`  == sorted set of names of categories with
//!   `mainCategoryId == M.id`
//! - `subchildren(M)[C.name]` == sorted set of names of subcategories with
//!   `categoryId == C.id`, for each such category C
//!
//! Output is sorted and set-valued, so rebuilding twice from the same
//! relational data yields identical documents (idempotence).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Category, MainCategory, Subcategory};

/// The recomputed cache content for one main category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    pub children: Vec<String>,
    pub subchildren: BTreeMap<String, Vec<String>>,
}

/// Recomputes the denormalized tree for every main category.
///
/// Returns a map keyed by main-category id. Main categories with no
/// children still get an entry (empty lists), so stale caches are cleared
/// by the write-back.
pub fn rebuild(
    mains: &[MainCategory],
    categories: &[Category],
    subcategories: &[Subcategory],
) -> BTreeMap<String, TreeSnapshot> {
    let mut result: BTreeMap<String, TreeSnapshot> = mains
        .iter()
        .map(|m| {
            (
                m.id.clone(),
                TreeSnapshot {
                    children: Vec::new(),
                    subchildren: BTreeMap::new(),
                },
            )
        })
        .collect();

    for category in categories {
        let Some(snapshot) = result.get_mut(&category.main_category_id) else {
            // Dangling mainCategoryId: the category points at a main that no
            // longer exists. It simply doesn't appear in any cache.
            continue;
        };
        snapshot.children.push(category.name.clone());

        let subs: Vec<String> = subcategories
            .iter()
            .filter(|s| s.category_id == category.id)
            .map(|s| s.name.clone())
            .collect();
        snapshot.subchildren.insert(category.name.clone(), subs);
    }

    for snapshot in result.values_mut() {
        snapshot.children.sort();
        snapshot.children.dedup();
        for subs in snapshot.subchildren.values_mut() {
            subs.sort();
            subs.dedup();
        }
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn main_cat(id: &str, name: &str) -> MainCategory {
        let now = Utc::now();
        MainCategory {
            id: id.to_string(),
            name: name.to_string(),
            name_ar: None,
            children: vec!["stale".to_string()],
            subchildren: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn cat(id: &str, name: &str, main_id: &str) -> Category {
        let now = Utc::now();
        Category {
            id: id.to_string(),
            name: name.to_string(),
            name_ar: None,
            main_category_id: main_id.to_string(),
            children: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn sub(id: &str, name: &str, cat_id: &str, main_id: &str) -> Subcategory {
        let now = Utc::now();
        Subcategory {
            id: id.to_string(),
            name: name.to_string(),
            name_ar: None,
            category_id: cat_id.to_string(),
            main_category_id: main_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rebuild_matches_relational_data() {
        let mains = vec![main_cat("m1", "Tools")];
        let cats = vec![cat("c1", "Drills", "m1"), cat("c2", "Saws", "m1")];
        let subs = vec![
            sub("s1", "Cordless", "c1", "m1"),
            sub("s2", "Hammer", "c1", "m1"),
            sub("s3", "Circular", "c2", "m1"),
        ];

        let tree = rebuild(&mains, &cats, &subs);
        let snapshot = &tree["m1"];

        assert_eq!(snapshot.children, vec!["Drills", "Saws"]);
        assert_eq!(snapshot.subchildren["Drills"], vec!["Cordless", "Hammer"]);
        assert_eq!(snapshot.subchildren["Saws"], vec!["Circular"]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mains = vec![main_cat("m1", "Tools"), main_cat("m2", "Garden")];
        let cats = vec![cat("c1", "Drills", "m1"), cat("c2", "Hoses", "m2")];
        let subs = vec![sub("s1", "Cordless", "c1", "m1")];

        let first = rebuild(&mains, &cats, &subs);
        let second = rebuild(&mains, &cats, &subs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rebuild_clears_empty_mains() {
        // The main has a stale `children` entry and no real categories.
        let mains = vec![main_cat("m1", "Tools")];
        let tree = rebuild(&mains, &[], &[]);

        assert!(tree["m1"].children.is_empty());
        assert!(tree["m1"].subchildren.is_empty());
    }

    #[test]
    fn test_rebuild_skips_dangling_category() {
        let mains = vec![main_cat("m1", "Tools")];
        let cats = vec![cat("c1", "Orphan", "missing-main")];
        let tree = rebuild(&mains, &cats, &[]);

        assert!(tree["m1"].children.is_empty());
        assert_eq!(tree.len(), 1);
    }
}
