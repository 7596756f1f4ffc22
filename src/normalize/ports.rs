//! Port-name canonicalization and permissive matching.
//!
//! False negatives (flagging a real match as a mismatch) cost user trust
//! more than false positives in documentary checks, so matching here is
//! intentionally loose: strip the noise a port name accumulates across
//! documents, then accept equality, containment, or a shared leading pair
//! of words.

/// Trailing country names stripped before comparison.
const COUNTRY_SUFFIXES: &[&str] = &[
    "united arab emirates",
    "uae",
    "u.a.e",
    "united states of america",
    "united states",
    "usa",
    "u.s.a",
    "united kingdom",
    "uk",
    "saudi arabia",
    "ksa",
    "india",
    "singapore",
    "china",
    "netherlands",
    "the netherlands",
    "qatar",
    "oman",
    "kuwait",
    "bahrain",
    "iraq",
    "turkey",
    "egypt",
    "malaysia",
    "indonesia",
    "south korea",
    "korea",
    "japan",
    "nigeria",
    "angola",
    "brazil",
];

/// Trailing facility-type words stripped before comparison.
const FACILITY_SUFFIXES: &[&str] = &[
    "terminal",
    "port",
    "harbour",
    "harbor",
    "anchorage",
    "jetty",
    "berth",
    "dock",
    "wharf",
];

/// Canonical form of a port name: truncated at the first comma, country and
/// facility suffixes stripped, whitespace collapsed, lowercased.
pub fn canonical_port(raw: &str) -> String {
    let base = raw.split(',').next().unwrap_or(raw);
    let mut words: Vec<String> = base
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect();

    loop {
        let joined = words.join(" ");
        let mut stripped = false;

        for suffix in COUNTRY_SUFFIXES {
            if joined == *suffix {
                break;
            }
            if let Some(prefix) = joined.strip_suffix(suffix) {
                if prefix.ends_with(' ') {
                    words = prefix.split_whitespace().map(String::from).collect();
                    stripped = true;
                    break;
                }
            }
        }
        if stripped {
            continue;
        }

        match words.last() {
            Some(last) if FACILITY_SUFFIXES.contains(&last.as_str()) && words.len() > 1 => {
                words.pop();
            }
            _ => break,
        }
    }

    words.join(" ")
}

/// Two port names refer to the same port if their canonical forms are
/// equal, one contains the other, or their first two words agree and are at
/// least four characters long. Symmetric by construction.
pub fn ports_match(a: &str, b: &str) -> bool {
    let ca = canonical_port(a);
    let cb = canonical_port(b);
    if ca.is_empty() || cb.is_empty() {
        return false;
    }

    if ca == cb || ca.contains(&cb) || cb.contains(&ca) {
        return true;
    }

    let head = |s: &str| {
        s.split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    };
    let ha = head(&ca);
    let hb = head(&cb);
    ha == hb && ha.len() >= 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_strips_country_and_facility() {
        assert_eq!(canonical_port("Jebel Ali Port, UAE"), "jebel ali");
        assert_eq!(canonical_port("Houston Terminal, USA"), "houston");
        assert_eq!(canonical_port("Fujairah Anchorage"), "fujairah");
        assert_eq!(canonical_port("Rotterdam, The Netherlands"), "rotterdam");
    }

    #[test]
    fn canonical_truncates_at_first_comma() {
        assert_eq!(
            canonical_port("Houston, Texas, United States"),
            "houston"
        );
    }

    #[test]
    fn equal_canonical_forms_match() {
        assert!(ports_match("Jebel Ali, UAE", "JEBEL ALI PORT"));
        assert!(ports_match("Houston", "Houston Terminal, USA"));
    }

    #[test]
    fn containment_matches() {
        assert!(ports_match("Jebel Ali Free Zone", "Jebel Ali"));
    }

    #[test]
    fn leading_word_pair_matches() {
        assert!(ports_match(
            "Ras Tanura Sea Island",
            "Ras Tanura North Pier"
        ));
    }

    #[test]
    fn distinct_ports_do_not_match() {
        assert!(!ports_match("Jebel Ali, UAE", "Dubai, UAE"));
        assert!(!ports_match("Houston", "Rotterdam"));
    }

    /// portsMatch(a, b) == portsMatch(b, a) for representative pairs.
    #[test]
    fn matching_is_symmetric() {
        let pairs = [
            ("Jebel Ali, UAE", "JEBEL ALI PORT"),
            ("Jebel Ali, UAE", "Dubai, UAE"),
            ("Ras Tanura Sea Island", "Ras Tanura North Pier"),
            ("Houston Terminal", "Houston"),
        ];
        for (a, b) in pairs {
            assert_eq!(ports_match(a, b), ports_match(b, a), "{a} vs {b}");
        }
    }

    #[test]
    fn empty_or_suffix_only_never_matches() {
        assert!(!ports_match("", "Houston"));
        assert!(!ports_match("   ", "   "));
    }
}
