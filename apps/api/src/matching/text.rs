//! Text utilities backing the scorer and filters: whitespace/case-insensitive
//! comparison, coarse metro-region matching, and salary extraction from free
//! text. Thresholds and substring rules are pinned by tests — they encode the
//! Korean phrasing conventions the intake flow produces.

/// Strips all whitespace and lower-cases. Every substring comparison in the
/// matching core goes through this first.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Metro areas whose sub-districts count as the same region.
const MACRO_REGIONS: [&str; 3] = ["부산", "울산", "경남"];

/// Coarse region equivalence: either normalized string contains the other,
/// or both fall under the same macro region. "해운대구" matches "부산" only
/// through the prefix rule when the item spells the metro out, so catalog
/// entries are expected to carry the metro prefix ("부산 해운대구").
pub fn is_close_region(item_region: &str, target_region: &str) -> bool {
    let item = normalize(item_region);
    let target = normalize(target_region);
    item.contains(&target)
        || target.contains(&item)
        || MACRO_REGIONS
            .iter()
            .any(|prefix| item.starts_with(prefix) && target.starts_with(prefix))
}

/// Extracts every digit run from free text, concatenates them into one
/// number, and guesses the unit: values under 100 000 are read as an hourly
/// wage and scaled by 160 (roughly 20h/week × 4 weeks). Returns `None` when
/// the text carries no digits or the digits read zero — "0원" is no salary
/// signal, not an expectation of nothing.
///
/// Multi-number text mis-parses by construction ("200~250만원" becomes
/// 200250). Known limitation, kept for behavioral compatibility.
pub fn parse_salary(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<i64>().ok()?;
    if value == 0 {
        return None;
    }
    Some(if value >= 100_000 { value } else { value * 160 })
}
