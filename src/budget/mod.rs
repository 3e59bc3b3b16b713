//! Token budget allocation and redistribution.
//!
//! The total document budget is split into fixed-weight section shares
//! (first pass), then rebalanced after actual usage is measured (second
//! pass): sections that consumed less than their share release the unused
//! portion as surplus, and sections that overran receive a slice of that
//! surplus proportional to their excess demand.
//!
//! All budgets are expressed in estimated tokens; see [`estimate_tokens`].

use serde::{Deserialize, Serialize};

/// Characters per estimated token. The estimate is `ceil(chars / 4)`.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a rendered text.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// The five sections of a generated context document, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Overview,
    Structure,
    KeyFiles,
    CodeMap,
    Knowledge,
}

impl SectionId {
    /// All sections in document order.
    pub const ALL: [SectionId; 5] = [
        SectionId::Overview,
        SectionId::Structure,
        SectionId::KeyFiles,
        SectionId::CodeMap,
        SectionId::Knowledge,
    ];

    /// Budget weight in percent. The weights sum to 100.
    pub fn weight_percent(&self) -> usize {
        match self {
            SectionId::Overview => 8,
            SectionId::Structure => 12,
            SectionId::KeyFiles => 25,
            SectionId::CodeMap => 40,
            SectionId::Knowledge => 15,
        }
    }

    /// Heading used for this section in the output document.
    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Overview => "Overview",
            SectionId::Structure => "Structure",
            SectionId::KeyFiles => "Key Files",
            SectionId::CodeMap => "Code Map",
            SectionId::Knowledge => "Knowledge",
        }
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionId::Overview => write!(f, "overview"),
            SectionId::Structure => write!(f, "structure"),
            SectionId::KeyFiles => write!(f, "key_files"),
            SectionId::CodeMap => write!(f, "code_map"),
            SectionId::Knowledge => write!(f, "knowledge"),
        }
    }
}

/// Integer token shares per section.
///
/// Also used to carry measured per-section usage, which has the same shape.
/// Shares are only renegotiated by [`redistribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Allocation {
    shares: [usize; 5],
}

impl Allocation {
    /// An all-zero allocation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SectionId) -> usize {
        self.shares[id as usize]
    }

    pub fn set(&mut self, id: SectionId, tokens: usize) {
        self.shares[id as usize] = tokens;
    }

    /// Sum of all section shares.
    pub fn total(&self) -> usize {
        self.shares.iter().sum()
    }
}

/// Split a total token budget into per-section shares using the fixed
/// weights. Each share is `floor(total * weight / 100)`, so the sum of the
/// shares never exceeds the requested total.
pub fn allocate(total_budget: usize) -> Allocation {
    let mut allocation = Allocation::new();
    for id in SectionId::ALL {
        allocation.set(id, total_budget * id.weight_percent() / 100);
    }
    allocation
}

/// Rebalance an allocation against measured usage.
///
/// Sections that used less than their share shrink to what they used;
/// sections that used more grow by `surplus * demand_i / total_demand`.
/// When there is no surplus or no demand the original allocation is
/// returned unchanged, so callers never divide by zero. Single pass, pure,
/// order-independent.
pub fn redistribute(allocation: &Allocation, used: &Allocation) -> Allocation {
    let mut total_surplus = 0usize;
    let mut total_demand = 0usize;

    for id in SectionId::ALL {
        let allocated = allocation.get(id);
        let actual = used.get(id);
        if actual < allocated {
            total_surplus += allocated - actual;
        } else {
            total_demand += actual - allocated;
        }
    }

    if total_surplus == 0 || total_demand == 0 {
        return *allocation;
    }

    let mut revised = Allocation::new();
    for id in SectionId::ALL {
        let allocated = allocation.get(id);
        let actual = used.get(id);
        let share = if actual < allocated {
            actual
        } else if actual > allocated {
            allocated + total_surplus * (actual - allocated) / total_demand
        } else {
            allocated
        };
        revised.set(id, share);
    }
    revised
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(values: [usize; 5]) -> Allocation {
        let mut used = Allocation::new();
        for (i, id) in SectionId::ALL.into_iter().enumerate() {
            used.set(id, values[i]);
        }
        used
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("12345678"), 2);
    }

    #[test]
    fn test_weights_sum_to_100() {
        let sum: usize = SectionId::ALL.iter().map(|id| id.weight_percent()).sum();
        assert_eq!(sum, 100);
    }

    #[test]
    fn test_allocate_zero_budget() {
        let allocation = allocate(0);
        for id in SectionId::ALL {
            assert_eq!(allocation.get(id), 0);
        }
    }

    #[test]
    fn test_allocate_10000_exact_shares() {
        let allocation = allocate(10_000);
        assert_eq!(allocation.get(SectionId::Overview), 800);
        assert_eq!(allocation.get(SectionId::Structure), 1_200);
        assert_eq!(allocation.get(SectionId::KeyFiles), 2_500);
        assert_eq!(allocation.get(SectionId::CodeMap), 4_000);
        assert_eq!(allocation.get(SectionId::Knowledge), 1_500);
    }

    #[test]
    fn test_allocate_never_exceeds_budget() {
        for budget in [0, 1, 7, 99, 1_000, 9_999, 12_345, 100_000] {
            let allocation = allocate(budget);
            assert!(allocation.total() <= budget, "budget {}", budget);
            for id in SectionId::ALL {
                // usize shares are non-negative by construction; check the
                // floor never rounds a nonzero weight above its slice.
                assert!(allocation.get(id) <= budget * id.weight_percent() / 100 + 1);
            }
        }
    }

    #[test]
    fn test_redistribute_noop_when_usage_matches() {
        let allocation = allocate(10_000);
        let revised = redistribute(&allocation, &allocation);
        assert_eq!(revised, allocation);
    }

    #[test]
    fn test_redistribute_noop_when_all_under_budget() {
        let allocation = allocate(10_000);
        let used = usage([100, 200, 300, 400, 500]);
        let revised = redistribute(&allocation, &used);
        assert_eq!(revised, allocation);
    }

    #[test]
    fn test_redistribute_noop_when_all_over_budget() {
        // No surplus to hand out: everything stays as allocated.
        let allocation = allocate(10_000);
        let used = usage([900, 1_300, 2_600, 4_100, 1_600]);
        let revised = redistribute(&allocation, &used);
        assert_eq!(revised, allocation);
    }

    #[test]
    fn test_redistribute_proportional_to_demand() {
        // overview releases 800; key files demand 500, code map 1000.
        let allocation = allocate(10_000);
        let used = usage([0, 1_200, 3_000, 5_000, 1_500]);
        let revised = redistribute(&allocation, &used);

        assert_eq!(revised.get(SectionId::Overview), 0);
        assert_eq!(revised.get(SectionId::Structure), 1_200);
        assert_eq!(revised.get(SectionId::Knowledge), 1_500);

        let key_files_gain = revised.get(SectionId::KeyFiles) - 2_500;
        let code_map_gain = revised.get(SectionId::CodeMap) - 4_000;
        assert_eq!(key_files_gain, 800 * 500 / 1_500);
        assert_eq!(code_map_gain, 800 * 1_000 / 1_500);
        assert!(code_map_gain > key_files_gain);
    }

    #[test]
    fn test_redistribute_total_never_grows() {
        let allocation = allocate(10_000);
        let used = usage([0, 0, 9_000, 9_000, 0]);
        let revised = redistribute(&allocation, &used);
        assert!(revised.total() <= allocation.total());
    }

    #[test]
    fn test_section_id_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SectionId::KeyFiles).unwrap(),
            "\"key_files\""
        );
        assert_eq!(SectionId::CodeMap.to_string(), "code_map");
    }
}
