//! Category backfill after the greedy pass.

use tracing::{debug, info};

use crate::taxonomy::Category;

use super::{Candidate, SelectionState};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub(crate) limit: usize,
    pub(crate) cap: usize,
}

/// 採用0件の対象カテゴリを、優先順に1件ずつ補充する。
///
/// 枠に空きがありソースにも余裕があれば末尾に追加する。満杯の場合や
/// ソースが上限に達している場合は、入れ替え可能な最下位の採用記事と差し替える。
/// ソース上限と件数上限は補充後も守られる。
pub(crate) fn fill_missing_categories(
    candidates: &[Candidate],
    picked: &mut Vec<usize>,
    state: &mut SelectionState,
    limits: Limits,
    targets: &[Category],
) {
    for (position, target) in targets.iter().enumerate() {
        if targets[..position].contains(target) || state.category_count(*target) > 0 {
            continue;
        }

        let mut filled = false;
        for (index, candidate) in candidates.iter().enumerate() {
            if candidate.article.category != *target || state.has_link(&candidate.article.link) {
                continue;
            }
            if try_place(candidates, picked, state, limits, targets, index, candidate) {
                filled = true;
                break;
            }
        }

        if !filled {
            debug!(category = %target, "no candidate available for backfill");
        }
    }
}

fn try_place(
    candidates: &[Candidate],
    picked: &mut Vec<usize>,
    state: &mut SelectionState,
    limits: Limits,
    targets: &[Category],
    index: usize,
    candidate: &Candidate,
) -> bool {
    let source_full = state.source_count(&candidate.article.source) >= limits.cap;

    if picked.len() < limits.limit && !source_full {
        candidate.record(state);
        picked.push(index);
        info!(
            category = %candidate.article.category,
            link = %candidate.article.link,
            "backfilled missing category"
        );
        return true;
    }

    // 満杯、またはソースが上限: 同じソースの余剰採用と入れ替える
    let Some(slot) = picked.iter().rposition(|&accepted| {
        let victim = &candidates[accepted].article;
        let replaceable = !targets.contains(&victim.category)
            || state.category_count(victim.category) > 1;
        replaceable && (!source_full || victim.source == candidate.article.source)
    }) else {
        return false;
    };

    let victim = &candidates[picked.remove(slot)];
    victim.release(state);
    candidate.record(state);
    picked.push(index);
    info!(
        category = %candidate.article.category,
        link = %candidate.article.link,
        replaced = %victim.article.link,
        "backfilled missing category by replacement"
    );
    true
}
