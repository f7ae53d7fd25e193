// Career aggregation from season rows.
//
// Used when an export ships without pre-baked `Career` rows, and to build
// franchise-only careers for franchise-filtered All-Time leaderboards.

use std::collections::HashMap;
use tracing::info;

use crate::stats::{PlayerId, Role, Season, StatRow};

/// Hitting fields recomputed from components rather than summed.
const HITTING_DERIVED: &[&str] = &[
    "AVG", "OBP", "SLG", "OPS", "ISO", "BABIP", "SB%", "HR%", "SO%", "BB%", "GB%", "FB%", "GB/FB",
    "Avg Diff",
];

/// Pitching fields recomputed from components rather than summed.
const PITCHING_DERIVED: &[&str] = &[
    "ERA", "WHIP", "H/6", "HR/6", "BB/6", "K/6", "K/BB", "BAA", "OBPA", "SLGA", "OPSA", "BABIP_A",
    "HR%_A", "K%_A", "BB%_A", "GB%_A", "FB%_A", "GB/FB_A", "SB%_A", "W-L%", "Avg Diff",
];

/// League-relative or season-constant fields that cannot be rebuilt from a
/// player's own totals.
const NOT_CARRIED: &[&str] = &["OPS+", "ERA+", "FIP", "nOBP", "nSLG"];

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Aggregate season rows into one `Career` row per player, in first-seen
/// order.
pub fn aggregate_careers<'r, I>(rows: I, role: Role) -> Vec<StatRow>
where
    I: IntoIterator<Item = &'r StatRow>,
{
    let mut order: Vec<PlayerId> = Vec::new();
    let mut groups: HashMap<PlayerId, Vec<&StatRow>> = HashMap::new();
    for row in rows {
        if row.season.is_career() {
            continue;
        }
        groups
            .entry(row.player_id)
            .or_insert_with(|| {
                order.push(row.player_id);
                Vec::new()
            })
            .push(row);
    }

    order
        .into_iter()
        .map(|id| aggregate_player(id, &groups[&id], role))
        .collect()
}

/// Append synthesized career rows when `rows` has none. Stint rows are left
/// out so traded players are not counted twice. Returns how many were added.
pub fn ensure_career_rows(rows: &mut Vec<StatRow>, role: Role) -> usize {
    if rows.iter().any(|r| r.season.is_career()) {
        return 0;
    }
    let careers = aggregate_careers(rows.iter().filter(|r| !r.is_sub_row), role);
    let added = careers.len();
    if added > 0 {
        info!("synthesized {added} {role} career rows");
    }
    rows.extend(careers);
    added
}

fn aggregate_player(player_id: PlayerId, rows: &[&StatRow], role: Role) -> StatRow {
    let derived = match role {
        Role::Hitting => HITTING_DERIVED,
        Role::Pitching => PITCHING_DERIVED,
    };

    let mut totals: HashMap<&str, f64> = HashMap::new();
    for row in rows {
        for (key, value) in row.stats() {
            if derived.contains(&key) || NOT_CARRIED.contains(&key) {
                continue;
            }
            *totals.entry(key).or_insert(0.0) += value;
        }
    }

    let mut career = StatRow::new(player_id, Season::Career);
    for (key, value) in &totals {
        career.insert_stat(*key, *value);
    }

    let weight_key = match role {
        Role::Hitting => "PA",
        Role::Pitching => "BF",
    };
    if let Some(diff) = weighted_mean(rows, "Avg Diff", weight_key) {
        career.insert_stat("Avg Diff", diff);
    }

    let get = |key: &str| totals.get(key).copied().unwrap_or(0.0);
    let rates = match role {
        Role::Hitting => hitting_rates(&get),
        Role::Pitching => pitching_rates(&get),
    };
    for (key, value) in rates {
        career.insert_stat(key, value);
    }
    career
}

/// Mean of `key` weighted by `weight_key`, over rows that carry `key`.
fn weighted_mean(rows: &[&StatRow], key: &str, weight_key: &str) -> Option<f64> {
    let mut weighted = 0.0;
    let mut weight = 0.0;
    let mut seen = false;
    for row in rows {
        if let Some(value) = row.stat(key) {
            let w = row.counting(weight_key);
            weighted += value * w;
            weight += w;
            seen = true;
        }
    }
    seen.then(|| ratio(weighted, weight))
}

fn hitting_rates(get: &dyn Fn(&str) -> f64) -> Vec<(&'static str, f64)> {
    let (pa, ab, h, bb, hr, k, sf) = (get("PA"), get("AB"), get("H"), get("BB"), get("HR"), get("K"), get("SF"));
    let (doubles, triples) = (get("2B"), get("3B"));
    let (sb, cs) = (get("SB"), get("CS"));
    let (gb, fb) = (get("GB_outs"), get("FB_outs"));

    let total_bases = h + doubles + 2.0 * triples + 3.0 * hr;
    let avg = ratio(h, ab);
    let obp = ratio(h + bb, pa);
    let slg = ratio(total_bases, ab);

    vec![
        ("AVG", avg),
        ("OBP", obp),
        ("SLG", slg),
        ("OPS", obp + slg),
        ("ISO", slg - avg),
        ("BABIP", ratio(h - hr, ab - k - hr + sf)),
        ("SB%", ratio(sb, sb + cs)),
        ("HR%", ratio(hr, pa)),
        ("SO%", ratio(k, pa)),
        ("BB%", ratio(bb, pa)),
        ("GB%", ratio(gb, gb + fb)),
        ("FB%", ratio(fb, gb + fb)),
        ("GB/FB", ratio(gb, fb)),
    ]
}

fn pitching_rates(get: &dyn Fn(&str) -> f64) -> Vec<(&'static str, f64)> {
    let (ip, bf, h, bb, k, hr, r) = (get("IP"), get("BF"), get("H"), get("BB"), get("K"), get("HR"), get("R"));
    let (ab, sf) = (get("AB_A"), get("SF_A"));
    let (doubles, triples) = (get("2B_A"), get("3B_A"));
    let (gb, fb) = (get("GB_outs_A"), get("FB_outs_A"));
    let (w, l) = (get("W"), get("L"));
    let (sb, cs) = (get("SB_A"), get("CS_A"));

    let total_bases = h + doubles + 2.0 * triples + 3.0 * hr;
    let obpa = ratio(h + bb, bf);
    let slga = ratio(total_bases, ab);

    vec![
        // Six-inning games.
        ("ERA", ratio(r * 6.0, ip)),
        ("WHIP", ratio(bb + h, ip)),
        ("H/6", ratio(h, ip) * 6.0),
        ("HR/6", ratio(hr, ip) * 6.0),
        ("BB/6", ratio(bb, ip) * 6.0),
        ("K/6", ratio(k, ip) * 6.0),
        ("K/BB", ratio(k, bb)),
        ("BAA", ratio(h, ab)),
        ("OBPA", obpa),
        ("SLGA", slga),
        ("OPSA", obpa + slga),
        ("BABIP_A", ratio(h - hr, ab - k - hr + sf)),
        ("HR%_A", ratio(hr, bf)),
        ("K%_A", ratio(k, bf)),
        ("BB%_A", ratio(bb, bf)),
        ("GB%_A", ratio(gb, gb + fb)),
        ("FB%_A", ratio(fb, gb + fb)),
        ("GB/FB_A", ratio(gb, fb)),
        ("SB%_A", ratio(sb, sb + cs)),
        ("W-L%", ratio(w, w + l)),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SeasonId;

    fn season(player: u32, n: u32) -> StatRow {
        StatRow::new(PlayerId(player), Season::Regular(SeasonId(n)))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sums_counting_and_recomputes_hitting_rates() {
        let rows = vec![
            season(1, 1)
                .with_stat("PA", 10.0)
                .with_stat("AB", 8.0)
                .with_stat("H", 2.0)
                .with_stat("BB", 2.0)
                .with_stat("AVG", 0.250),
            season(1, 2)
                .with_stat("PA", 10.0)
                .with_stat("AB", 10.0)
                .with_stat("H", 5.0)
                .with_stat("HR", 1.0)
                .with_stat("AVG", 0.500),
        ];
        let careers = aggregate_careers(&rows, Role::Hitting);
        assert_eq!(careers.len(), 1);
        let c = &careers[0];
        assert_eq!(c.season, Season::Career);
        assert_eq!(c.stat("PA"), Some(20.0));
        assert_eq!(c.stat("H"), Some(7.0));
        assert!(close(c.stat("AVG").unwrap(), 7.0 / 18.0));
        assert!(close(c.stat("OBP").unwrap(), 9.0 / 20.0));
        // 6 singles + 1 HR = 10 total bases over 18 AB.
        assert!(close(c.stat("SLG").unwrap(), 10.0 / 18.0));
    }

    #[test]
    fn pitching_rates_use_six_inning_games() {
        let rows = vec![
            season(2, 1).with_stat("IP", 12.0).with_stat("R", 4.0).with_stat("W", 3.0).with_stat("L", 1.0),
            season(2, 2).with_stat("IP", 6.0).with_stat("R", 2.0).with_stat("L", 1.0),
        ];
        let c = &aggregate_careers(&rows, Role::Pitching)[0];
        assert!(close(c.stat("ERA").unwrap(), 2.0));
        assert!(close(c.stat("W-L%").unwrap(), 0.6));
    }

    #[test]
    fn stolen_base_rate_against_is_recomputed() {
        let rows = vec![
            season(6, 1).with_stat("SB_A", 3.0).with_stat("CS_A", 3.0).with_stat("SB%_A", 0.5),
            season(6, 2).with_stat("SB_A", 3.0).with_stat("CS_A", 1.0).with_stat("SB%_A", 0.75),
        ];
        let c = &aggregate_careers(&rows, Role::Pitching)[0];
        assert_eq!(c.stat("SB_A"), Some(6.0));
        assert!(close(c.stat("SB%_A").unwrap(), 0.6));
    }

    #[test]
    fn zero_denominators_yield_zero() {
        let rows = vec![season(3, 1).with_stat("G", 1.0)];
        let c = &aggregate_careers(&rows, Role::Pitching)[0];
        assert_eq!(c.stat("ERA"), Some(0.0));
        assert_eq!(c.stat("K/BB"), Some(0.0));
    }

    #[test]
    fn avg_diff_is_weighted_by_volume() {
        let rows = vec![
            season(4, 1).with_stat("PA", 30.0).with_stat("Avg Diff", 100.0),
            season(4, 2).with_stat("PA", 10.0).with_stat("Avg Diff", 200.0),
        ];
        let c = &aggregate_careers(&rows, Role::Hitting)[0];
        assert!(close(c.stat("Avg Diff").unwrap(), 125.0));
    }

    #[test]
    fn league_relative_fields_are_dropped() {
        let rows = vec![season(5, 1).with_stat("OPS+", 120.0).with_stat("PA", 5.0)];
        let c = &aggregate_careers(&rows, Role::Hitting)[0];
        assert_eq!(c.stat("OPS+"), None);
        assert_eq!(c.stat("Avg Diff"), None);
    }

    #[test]
    fn ensure_career_rows_skips_stints_and_existing_careers() {
        let mut rows = vec![
            season(1, 1).with_stat("HR", 10.0),
            season(1, 1).as_sub_row().with_stat("HR", 4.0),
            season(1, 1).as_sub_row().with_stat("HR", 6.0),
            season(2, 1).with_stat("HR", 3.0),
        ];
        assert_eq!(ensure_career_rows(&mut rows, Role::Hitting), 2);
        let career = rows.iter().find(|r| r.season.is_career() && r.player_id == PlayerId(1)).unwrap();
        assert_eq!(career.stat("HR"), Some(10.0));

        assert_eq!(ensure_career_rows(&mut rows, Role::Hitting), 0);
    }

    #[test]
    fn preserves_first_seen_player_order() {
        let rows = vec![season(9, 1), season(3, 1), season(9, 2)];
        let ids: Vec<u32> = aggregate_careers(&rows, Role::Hitting).iter().map(|r| r.player_id.0).collect();
        assert_eq!(ids, vec![9, 3]);
    }
}
