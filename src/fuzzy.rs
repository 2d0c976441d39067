pub const DEFAULT_THRESHOLD: u32 = 90;

// Normalized similarity in 0..=100. Edit distance with substitutions costing
// two (one delete plus one insert), so the score matches the classic
// ratio-style scorers: 100 * (len_a + len_b - distance) / (len_a + len_b).
pub fn similarity(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let dist = weighted_distance(&a, &b);
    (100 * (total - dist) / total) as u32
}

fn weighted_distance(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let sub = prev[j] + if ca == cb { 0 } else { 2 };
            curr[j + 1] = sub.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

// Highest-scoring candidate at or above the threshold. Ties keep the first
// candidate seen in enumeration order.
pub fn best_match<'a, I>(target: &str, candidates: I, threshold: u32) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, u32)> = None;
    for candidate in candidates {
        let score = similarity(target, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.and_then(|(candidate, score)| (score >= threshold).then_some(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity("done", "done"), 100);
    }

    #[test]
    fn comparison_ignores_case() {
        assert_eq!(similarity("TODO", "todo"), 100);
    }

    #[test]
    fn single_trailing_insertion_scores_90() {
        // "creat" vs "create": one insertion over 11 total chars.
        assert_eq!(similarity("creat", "create"), 90);
    }

    #[test]
    fn substitution_costs_two() {
        // One substitution over 8 total chars: 100 * 6 / 8.
        assert_eq!(similarity("mode", "move"), 75);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity("abc", "xyz"), 0);
    }

    #[test]
    fn empty_against_nonempty_scores_zero() {
        assert_eq!(similarity("", "todo"), 0);
    }

    #[test]
    fn best_match_returns_candidate_above_threshold() {
        // "backlogg" vs "backlog": one insertion over 15 total chars, score 93.
        let columns = ["todo", "doing", "backlog"];
        let got = best_match("backlogg", columns.iter().copied(), DEFAULT_THRESHOLD);
        assert_eq!(got, Some("backlog"));
    }

    #[test]
    fn best_match_is_none_below_threshold() {
        let columns = ["todo", "doing", "done"];
        assert_eq!(
            best_match("xyz", columns.iter().copied(), DEFAULT_THRESHOLD),
            None
        );
    }

    #[test]
    fn best_match_result_is_a_member_of_candidates() {
        let columns = ["backlog", "blocked"];
        if let Some(hit) = best_match("backlogg", columns.iter().copied(), 80) {
            assert!(columns.contains(&hit));
        }
    }

    #[test]
    fn best_match_handles_empty_candidate_set() {
        assert_eq!(best_match("todo", std::iter::empty(), 0), None);
    }

    #[test]
    fn lower_threshold_admits_weaker_matches() {
        let columns = ["doing"];
        assert_eq!(best_match("dong", columns.iter().copied(), 80), Some("doing"));
        assert_eq!(
            best_match("dong", columns.iter().copied(), DEFAULT_THRESHOLD),
            None
        );
    }
}
