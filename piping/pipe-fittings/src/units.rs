//! Nominal size designations: metric DN against imperial NPS.

/// DN label and NPS designation pairs, in ascending size.
const DN_NPS: [(&str, &str); 33] = [
    ("DN6", "1/8"),
    ("DN8", "1/4"),
    ("DN10", "3/8"),
    ("DN15", "1/2"),
    ("DN20", "3/4"),
    ("DN25", "1"),
    ("DN32", "1-1/4"),
    ("DN40", "1-1/2"),
    ("DN50", "2"),
    ("DN65", "2-1/2"),
    ("DN80", "3"),
    ("DN90", "3-1/2"),
    ("DN100", "4"),
    ("DN125", "5"),
    ("DN150", "6"),
    ("DN200", "8"),
    ("DN250", "10"),
    ("DN300", "12"),
    ("DN350", "14"),
    ("DN400", "16"),
    ("DN450", "18"),
    ("DN500", "20"),
    ("DN550", "22"),
    ("DN600", "24"),
    ("DN650", "26"),
    ("DN700", "28"),
    ("DN750", "30"),
    ("DN800", "32"),
    ("DN850", "34"),
    ("DN900", "36"),
    ("DN1000", "40"),
    ("DN1050", "42"),
    ("DN1200", "48"),
];

/// System used to display nominal sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeSystem {
    /// `DN50`.
    #[default]
    Metric,
    /// `NPS 2`.
    Imperial,
}

/// NPS designation for a DN label, e.g. `"2"` for `"DN50"`.
#[must_use]
pub fn nps_for_dn(dn: &str) -> Option<&'static str> {
    let dn = dn.trim();
    DN_NPS
        .iter()
        .find(|(d, _)| d.eq_ignore_ascii_case(dn))
        .map(|&(_, nps)| nps)
}

/// DN label for an NPS designation. Accepts an optional `NPS` prefix and a
/// trailing inch mark.
#[must_use]
pub fn dn_for_nps(nps: &str) -> Option<&'static str> {
    let bare = nps.trim();
    let bare = bare
        .strip_prefix("NPS")
        .or_else(|| bare.strip_prefix("nps"))
        .unwrap_or(bare)
        .trim()
        .trim_end_matches('"');
    DN_NPS.iter().find(|(_, n)| *n == bare).map(|&(dn, _)| dn)
}

/// Display form of a catalog DN label. Unknown labels are returned unchanged.
#[must_use]
pub fn format_size(dn: &str, system: SizeSystem) -> String {
    match (system, nps_for_dn(dn)) {
        (SizeSystem::Imperial, Some(nps)) => format!("NPS {nps}"),
        _ => dn.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_size() {
        for (dn, nps) in DN_NPS {
            assert_eq!(nps_for_dn(dn), Some(nps));
            assert_eq!(dn_for_nps(nps), Some(dn));
        }
    }

    #[test]
    fn test_lenient_input() {
        assert_eq!(nps_for_dn(" dn50 "), Some("2"));
        assert_eq!(dn_for_nps("NPS 1-1/2"), Some("DN40"));
        assert_eq!(dn_for_nps("6\""), Some("DN150"));
        assert_eq!(nps_for_dn("DN55"), None);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size("DN80", SizeSystem::Imperial), "NPS 3");
        assert_eq!(format_size("DN80", SizeSystem::Metric), "DN80");
        assert_eq!(format_size("HEA200", SizeSystem::Imperial), "HEA200");
    }
}
