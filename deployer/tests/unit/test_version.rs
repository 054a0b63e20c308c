//! Version ordering tests

use std::cmp::Ordering;

use opsdeploy::version::{compare, Version};

const SAMPLES: &[&str] = &[
    "0", "1", "1.0", "1.5.5.0", "1.6", "1.6.0", "1.6.0.0", "1.6.2.0", "1.6.4", "1.6.8.0",
    "1.6.11.0", "1.7", "2", "10.0.1",
];

#[test]
fn test_padding_equivalence() {
    assert_eq!(compare("1.6", "1.6.0").unwrap(), Ordering::Equal);
    assert_eq!(compare("1.6.0", "1.6").unwrap(), Ordering::Equal);
}

#[test]
fn test_antisymmetric() {
    for a in SAMPLES {
        for b in SAMPLES {
            let ab = compare(a, b).unwrap();
            let ba = compare(b, a).unwrap();
            assert_eq!(ab, ba.reverse(), "{a} vs {b}");
        }
    }
}

#[test]
fn test_transitive() {
    for a in SAMPLES {
        for b in SAMPLES {
            for c in SAMPLES {
                let ab = compare(a, b).unwrap();
                let bc = compare(b, c).unwrap();
                if ab != Ordering::Greater && bc != Ordering::Greater {
                    assert_ne!(compare(a, c).unwrap(), Ordering::Greater, "{a} <= {b} <= {c}");
                }
            }
        }
    }
}

#[test]
fn test_sorting_uses_numeric_order() {
    let mut versions: Vec<Version> = ["1.6.11.0", "1.6.8.0", "1.6.2.0", "1.6.4"]
        .iter()
        .map(|s| Version::parse(s).unwrap())
        .collect();
    versions.sort();
    let sorted: Vec<String> = versions.iter().map(Version::to_string).collect();
    assert_eq!(sorted, ["1.6.2.0", "1.6.4", "1.6.8.0", "1.6.11.0"]);
}

#[test]
fn test_deterministic() {
    for _ in 0..3 {
        assert_eq!(compare("1.6.4", "1.6.11.0").unwrap(), Ordering::Less);
    }
}
