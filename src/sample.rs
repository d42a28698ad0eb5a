// Krejcie & Morgan (1970) minimum sample sizes.
//
// Each pair is (population ceiling, required sample). The table is also
// printed verbatim in chapter II of the report.

pub const KREJCIE_MORGAN: [(u64, u64); 90] = [
    (10, 10), (15, 14), (20, 19), (25, 24), (30, 28), (35, 32), (40, 36), (45, 40),
    (50, 44), (55, 48), (60, 52), (65, 56), (70, 59), (75, 63), (80, 66), (85, 70),
    (90, 73), (95, 76), (100, 80), (110, 86), (120, 92), (130, 97), (140, 103),
    (150, 108), (160, 113), (170, 118), (180, 123), (190, 127), (200, 132), (210, 136),
    (220, 140), (230, 144), (240, 148), (250, 152), (260, 155), (270, 159), (280, 162),
    (290, 165), (300, 169), (320, 175), (340, 181), (360, 186), (380, 191), (400, 196),
    (420, 201), (440, 205), (460, 210), (480, 214), (500, 217), (550, 226), (600, 234),
    (650, 242), (700, 248), (750, 254), (800, 260), (850, 265), (900, 269), (950, 274),
    (1000, 278), (1100, 285), (1200, 291), (1300, 297), (1400, 302), (1500, 306),
    (1600, 310), (1700, 313), (1800, 317), (1900, 320), (2000, 322), (2200, 327),
    (2400, 331), (2600, 335), (2800, 338), (3000, 341), (3500, 346), (4000, 351),
    (4500, 354), (5000, 357), (6000, 361), (7000, 364), (8000, 367), (9000, 368),
    (10000, 370), (15000, 375), (20000, 377), (30000, 379), (40000, 380), (50000, 381),
    (75000, 382), (1000000, 384),
];

/// Sample size for populations beyond the last bracket.
pub const ASYMPTOTIC_SAMPLE: u64 = 384;

/// Minimum number of respondents for a population of `population`.
///
/// Populations of 10 or fewer are surveyed in full. Otherwise the first
/// bracket whose ceiling is at least `population` wins; brackets are never
/// interpolated.
pub fn minimum_sample(population: u64) -> u64 {
    if population <= 10 {
        return population;
    }
    KREJCIE_MORGAN
        .iter()
        .find(|(ceiling, _)| population <= *ceiling)
        .map(|(_, sample)| *sample)
        .unwrap_or(ASYMPTOTIC_SAMPLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_populations_are_a_census() {
        for p in 0..=10 {
            assert_eq!(minimum_sample(p), p);
        }
    }

    #[test]
    fn published_brackets() {
        assert_eq!(minimum_sample(2400), 331);
        assert_eq!(minimum_sample(100), 80);
        assert_eq!(minimum_sample(75000), 382);
        assert_eq!(minimum_sample(1_000_000), 384);
    }

    #[test]
    fn rounds_up_to_next_bracket() {
        assert_eq!(minimum_sample(11), 14);
        assert_eq!(minimum_sample(2401), 335);
        assert_eq!(minimum_sample(75001), 384);
    }

    #[test]
    fn beyond_table_is_asymptotic() {
        assert_eq!(minimum_sample(5_000_000), ASYMPTOTIC_SAMPLE);
    }

    #[test]
    fn table_is_strictly_increasing() {
        for pair in KREJCIE_MORGAN.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 < pair[1].1);
        }
    }
}
