use super::{FrequencyPair, FrequencyScheme};

static FREQUENCIES: [f64; 6] = [700.0, 900.0, 1100.0, 1300.0, 1500.0, 1700.0];

// One code per unordered pair of FREQUENCIES, in the order the pairs are
// enumerated by `pair_indices`.
static CODES: [&str; 15] = [
    "1", "2", "3",
    "4", "5", "6",
    "7", "8", "9",
    "0", "11", "12",
    "KP", "KP2", "ST",
];

static ALIASES: [(&str, &str); 3] = [
    ("10", "0"),
    ("ST3", "11"),
    ("ST2", "12"),
];

/// Inverts the triangular numbering of 2-combinations: pair `idx` is made of
/// frequency `row` and frequency `column + 1`, with `row <= column`.
fn pair_indices(idx: usize) -> (usize, usize) {
    let column = ((((1 + 8 * idx) as f64).sqrt() - 1.0) / 2.0).floor() as usize;
    let row = idx - column * (column + 1) / 2;
    (row, column + 1)
}

/// Legacy in-band trunk signaling, MF 2/8 (two of six frequencies).
#[derive(Copy, Clone, Debug, Default)]
pub struct Mf;

impl FrequencyScheme for Mf {
    fn name(&self) -> &'static str {
        "mf"
    }

    fn codes(&self) -> &[&'static str] {
        &CODES
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &ALIASES
    }

    fn pair(&self, index: usize) -> FrequencyPair {
        let (low, high) = pair_indices(index);
        FrequencyPair::new(FREQUENCIES[low], FREQUENCIES[high])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_table() {
        let expected = [
            ("1",   700.0,  900.0),
            ("2",   700.0, 1100.0),
            ("3",   900.0, 1100.0),
            ("4",   700.0, 1300.0),
            ("5",   900.0, 1300.0),
            ("6",  1100.0, 1300.0),
            ("7",   700.0, 1500.0),
            ("8",   900.0, 1500.0),
            ("9",  1100.0, 1500.0),
            ("0",  1300.0, 1500.0),
            ("11",  700.0, 1700.0),
            ("12",  900.0, 1700.0),
            ("KP", 1100.0, 1700.0),
            ("KP2",1300.0, 1700.0),
            ("ST", 1500.0, 1700.0),
        ];

        for (code, low, high) in expected {
            assert_eq!(Mf.lookup(code).unwrap(), FrequencyPair::new(low, high), "code {code}");
        }
    }

    #[test]
    fn aliases_match_canonical() {
        for (alias, canonical) in ALIASES {
            assert_eq!(Mf.lookup(alias).unwrap(), Mf.lookup(canonical).unwrap(), "alias {alias}");
            assert_eq!(Mf.canonical(alias), Some(canonical));
        }
        assert_eq!(Mf.lookup("10").unwrap(), FrequencyPair::new(1300.0, 1500.0));
        assert_eq!(Mf.lookup("ST3").unwrap(), FrequencyPair::new(700.0, 1700.0));
    }

    #[test]
    fn every_pair_is_distinct() {
        let mut seen = Vec::new();
        for index in 0..CODES.len() {
            let (low, high) = pair_indices(index);
            assert!(low < high, "index {index}");
            assert!(!seen.contains(&(low, high)), "index {index}");
            seen.push((low, high));
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn codes() {
        assert_eq!(Mf.size(), 15);
        assert_eq!(Mf.valid_codes().len(), 18);
        assert!(Mf.contains("KP2"));
        assert!(Mf.contains("ST2"));
        assert!(!Mf.contains("KP3"));
        assert!(!Mf.contains("A"));
    }

    #[test]
    fn lookup_is_deterministic() {
        let valid = Mf.valid_codes();
        for code in valid.iter().copied() {
            let pair = Mf.lookup(code).unwrap();
            assert_eq!(Mf.lookup(code).unwrap(), pair, "code {code}");
            assert_eq!(Mf::default().lookup(code).unwrap(), pair, "code {code}");
            assert!(Mf.contains(code));
        }
        for code in CODES {
            assert!(valid.contains(&code));
        }
    }
}
