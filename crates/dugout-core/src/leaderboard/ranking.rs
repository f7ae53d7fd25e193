// Ordering, pagination with tie overflow, and competition ranking.

use std::cmp::Ordering;

use super::TieOverflow;

/// Order two stat values best-first. Missing values sink to the bottom in
/// either direction; `reverse` flips only the order of present values.
pub fn compare_values(a: Option<f64>, b: Option<f64>, lower_is_better: bool, reverse: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let natural = if lower_is_better {
                a.partial_cmp(&b)
            } else {
                b.partial_cmp(&a)
            }
            .unwrap_or(Ordering::Equal);
            if reverse {
                natural.reverse()
            } else {
                natural
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// How much of a sorted leaderboard to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    /// Leading rows to display.
    pub shown: usize,
    pub tie: Option<TieOverflow>,
}

/// Cut sorted `values` to `page_size`. When the last shown row ties the
/// first hidden one, the whole tied block is pulled off the page and
/// reported as a [`TieOverflow`] instead. Zero and missing values are never
/// reported as ties.
pub fn paginate(values: &[Option<f64>], page_size: usize) -> Page {
    let truncated = Page {
        shown: values.len().min(page_size),
        tie: None,
    };
    if page_size == 0 || values.len() <= page_size {
        return truncated;
    }

    let last = values[page_size - 1];
    let tie_value = match last {
        Some(v) if v != 0.0 && values[page_size] == last => v,
        _ => return truncated,
    };

    let mut first = page_size - 1;
    while first > 0 && values[first - 1] == last {
        first -= 1;
    }
    let count = values.iter().filter(|v| **v == last).count();

    Page {
        shown: first,
        tie: Some(TieOverflow {
            count,
            value: tie_value,
        }),
    }
}

/// 1-based ranks where equal adjacent values share the rank of the first
/// row in the group and the next distinct value resumes at its position
/// (`[10, 10, 9, 8]` ranks `[1, 1, 3, 4]`).
pub fn competition_ranks(values: &[Option<f64>]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        let rank = match ranks.last() {
            Some(&prev) if values[i - 1] == *value => prev,
            _ => i + 1,
        };
        ranks.push(rank);
    }
    ranks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn ranks_skip_after_ties() {
        assert_eq!(competition_ranks(&some(&[10.0, 10.0, 9.0, 8.0])), vec![1, 1, 3, 4]);
        assert_eq!(competition_ranks(&some(&[5.0, 4.0, 4.0, 2.0])), vec![1, 2, 2, 4]);
        assert!(competition_ranks(&[]).is_empty());
    }

    #[test]
    fn adjacent_rank_property_holds() {
        let values = some(&[9.0, 9.0, 9.0, 7.0, 7.0, 6.0, 5.0, 5.0]);
        let ranks = competition_ranks(&values);
        for i in 0..values.len() - 1 {
            if values[i] == values[i + 1] {
                assert_eq!(ranks[i], ranks[i + 1]);
            } else {
                assert_eq!(ranks[i + 1], i + 2);
            }
        }
    }

    #[test]
    fn compare_sorts_missing_last_in_both_directions() {
        let mut values = vec![Some(1.0), None, Some(3.0), Some(2.0)];
        values.sort_by(|a, b| compare_values(*a, *b, false, false));
        assert_eq!(values, vec![Some(3.0), Some(2.0), Some(1.0), None]);
        values.sort_by(|a, b| compare_values(*a, *b, false, true));
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), None]);
        values.sort_by(|a, b| compare_values(*a, *b, true, false));
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), None]);
    }

    #[test]
    fn paginate_plain_truncation() {
        let values = some(&[5.0, 4.0, 3.0, 2.0]);
        assert_eq!(paginate(&values, 2), Page { shown: 2, tie: None });
        assert_eq!(paginate(&values, 10), Page { shown: 4, tie: None });
        assert_eq!(paginate(&values, 0), Page { shown: 0, tie: None });
    }

    #[test]
    fn tie_across_the_cut_moves_block_to_overflow() {
        // Rows 9..=12 (1-based) share 3.0.
        let values = some(&[12.0, 11.0, 10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 3.0, 3.0, 3.0, 3.0, 1.0]);
        let page = paginate(&values, 10);
        assert_eq!(page.shown, 8);
        assert_eq!(page.tie, Some(TieOverflow { count: 4, value: 3.0 }));
    }

    #[test]
    fn tie_count_covers_whole_qualified_set() {
        let values = some(&[2.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let page = paginate(&values, 2);
        assert_eq!(page.shown, 1);
        assert_eq!(page.tie.map(|t| t.count), Some(5));
    }

    #[test]
    fn tie_at_top_hides_everything() {
        let values = some(&[4.0, 4.0, 4.0]);
        let page = paginate(&values, 2);
        assert_eq!(page.shown, 0);
        assert_eq!(page.tie, Some(TieOverflow { count: 3, value: 4.0 }));
    }

    #[test]
    fn zero_and_missing_ties_are_plain_truncation() {
        let zeros = some(&[3.0, 0.0, 0.0]);
        assert_eq!(paginate(&zeros, 2), Page { shown: 2, tie: None });
        let missing = vec![Some(3.0), None, None];
        assert_eq!(paginate(&missing, 2), Page { shown: 2, tie: None });
    }

    #[test]
    fn no_tie_when_cut_falls_between_values() {
        let values = some(&[3.0, 2.0, 2.0, 1.0]);
        assert_eq!(paginate(&values, 3), Page { shown: 3, tie: None });
    }
}
