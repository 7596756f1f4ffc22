//! Organization and vessel name canonicalization.

/// Trailing legal-entity suffixes stripped before comparison, longest first
/// so "private limited" goes before "limited".
const LEGAL_SUFFIXES: &[&str] = &[
    "private limited",
    "incorporated",
    "corporation",
    "company",
    "limited",
    "trading",
    "fzco",
    "dmcc",
    "gmbh",
    "corp",
    "llc",
    "llp",
    "ltd",
    "inc",
    "plc",
    "pte",
    "fze",
    "fzc",
    "ag",
    "bv",
    "sa",
    "co",
];

/// Leading vessel-type prefixes stripped before comparison.
const VESSEL_PREFIXES: &[&str] = &["m/v", "m/t", "m/s", "mv", "mt", "ms", "ss"];

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form of an organization name: lowercased, trailing punctuation
/// and legal-entity suffixes removed, whitespace collapsed.
pub fn canonical_name(raw: &str) -> String {
    let mut name = collapse(&raw.to_lowercase());

    loop {
        let trimmed = name
            .trim_end_matches(|c: char| c == '.' || c == ',' || c == ';')
            .trim_end()
            .to_string();

        let mut next = None;
        for suffix in LEGAL_SUFFIXES {
            if let Some(prefix) = trimmed.strip_suffix(suffix) {
                if prefix.ends_with(' ') {
                    next = Some(prefix.trim_end().to_string());
                    break;
                }
            }
        }

        match next {
            Some(n) => name = n,
            None => {
                name = trimmed;
                break;
            }
        }
    }

    name
}

fn strip_punctuation(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Two organization names refer to the same party if their canonical forms
/// are equal, one contains the other, or they agree exactly once
/// punctuation is stripped. Symmetric.
pub fn names_match(a: &str, b: &str) -> bool {
    let ca = canonical_name(a);
    let cb = canonical_name(b);
    if ca.is_empty() || cb.is_empty() {
        return false;
    }

    if ca == cb || ca.contains(&cb) || cb.contains(&ca) {
        return true;
    }

    strip_punctuation(&ca) == strip_punctuation(&cb)
}

/// Canonical form of a vessel name: common type prefixes (MV, M/V, MT, ...)
/// removed, lowercased, whitespace collapsed.
pub fn canonical_vessel(raw: &str) -> String {
    let collapsed = collapse(&raw.to_lowercase());

    for prefix in VESSEL_PREFIXES {
        if let Some(rest) = collapsed.strip_prefix(prefix) {
            if rest.starts_with(' ') || rest.starts_with('.') {
                return rest.trim_start_matches(['.', ' ']).to_string();
            }
        }
    }
    collapsed
}

/// Two vessel names match after prefix normalization. Symmetric.
pub fn vessels_match(a: &str, b: &str) -> bool {
    let ca = canonical_vessel(a);
    let cb = canonical_vessel(b);
    !ca.is_empty() && !cb.is_empty() && ca == cb
}
