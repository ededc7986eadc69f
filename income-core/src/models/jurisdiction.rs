use std::collections::BTreeMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::income::NO_JURISDICTION;

/// A jurisdiction with a flat income-tax rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub code: String,
    pub name: String,
    /// Fraction of gross income, `0 <= rate < 1`.
    pub rate: Decimal,
}

impl Jurisdiction {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            rate,
        }
    }
}

/// Lookup from jurisdiction code to flat rate.
///
/// Codes are matched case-insensitively. Unknown codes and `"NONE"` both
/// yield a zero rate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JurisdictionTable {
    entries: BTreeMap<String, Jurisdiction>,
}

impl JurisdictionTable {
    pub fn new(jurisdictions: impl IntoIterator<Item = Jurisdiction>) -> Self {
        let entries = jurisdictions
            .into_iter()
            .map(|j| (j.code.to_ascii_uppercase(), j))
            .collect();
        Self { entries }
    }

    /// The built-in illustrative table: every US state plus `"NONE"`.
    pub fn builtin() -> Self {
        DEFAULT_JURISDICTIONS.clone()
    }

    /// Looks up `code` after trimming it and folding it to upper case, so
    /// `" ca "` finds `CA`. Stored codes are exact upper-case keys; the
    /// folding is a deliberate widening of an exact-code lookup so that
    /// hand-typed CLI input and older stored payloads still resolve.
    pub fn get(
        &self,
        code: &str,
    ) -> Option<&Jurisdiction> {
        self.entries.get(&code.trim().to_ascii_uppercase())
    }

    pub fn rate(
        &self,
        code: &str,
    ) -> Decimal {
        self.get(code).map_or(Decimal::ZERO, |j| j.rate)
    }

    pub fn contains(
        &self,
        code: &str,
    ) -> bool {
        self.get(code).is_some()
    }

    /// Entries with `"NONE"` first, then by code.
    pub fn iter(&self) -> impl Iterator<Item = &Jurisdiction> {
        let none = self.entries.get(NO_JURISDICTION);
        none.into_iter().chain(
            self.entries
                .iter()
                .filter(|(code, _)| code.as_str() != NO_JURISDICTION)
                .map(|(_, j)| j),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in illustrative table shared by the convenience entry points.
pub static DEFAULT_JURISDICTIONS: LazyLock<JurisdictionTable> = LazyLock::new(|| {
    JurisdictionTable::new(
        BUILTIN_RATES
            .iter()
            .map(|&(code, name, rate)| Jurisdiction::new(code, name, rate)),
    )
});

// Simplified flat estimates, not authoritative.
const BUILTIN_RATES: &[(&str, &str, Decimal)] = &[
    ("NONE", "No State Tax / Federal Only", Decimal::ZERO),
    ("AL", "Alabama", Decimal::from_parts(5, 0, 0, false, 2)),
    ("AK", "Alaska", Decimal::ZERO),
    ("AZ", "Arizona", Decimal::from_parts(25, 0, 0, false, 3)),
    ("AR", "Arkansas", Decimal::from_parts(49, 0, 0, false, 3)),
    ("CA", "California", Decimal::from_parts(8, 0, 0, false, 2)),
    ("CO", "Colorado", Decimal::from_parts(44, 0, 0, false, 3)),
    ("CT", "Connecticut", Decimal::from_parts(5, 0, 0, false, 2)),
    ("DE", "Delaware", Decimal::from_parts(6, 0, 0, false, 2)),
    ("FL", "Florida", Decimal::ZERO),
    ("GA", "Georgia", Decimal::from_parts(57, 0, 0, false, 3)),
    ("HI", "Hawaii", Decimal::from_parts(8, 0, 0, false, 2)),
    ("ID", "Idaho", Decimal::from_parts(58, 0, 0, false, 3)),
    ("IL", "Illinois", Decimal::from_parts(49, 0, 0, false, 3)),
    ("IN", "Indiana", Decimal::from_parts(32, 0, 0, false, 3)),
    ("IA", "Iowa", Decimal::from_parts(6, 0, 0, false, 2)),
    ("KS", "Kansas", Decimal::from_parts(57, 0, 0, false, 3)),
    ("KY", "Kentucky", Decimal::from_parts(5, 0, 0, false, 2)),
    ("LA", "Louisiana", Decimal::from_parts(4, 0, 0, false, 2)),
    ("ME", "Maine", Decimal::from_parts(7, 0, 0, false, 2)),
    ("MD", "Maryland", Decimal::from_parts(5, 0, 0, false, 2)),
    ("MA", "Massachusetts", Decimal::from_parts(5, 0, 0, false, 2)),
    ("MI", "Michigan", Decimal::from_parts(4, 0, 0, false, 2)),
    ("MN", "Minnesota", Decimal::from_parts(7, 0, 0, false, 2)),
    ("MS", "Mississippi", Decimal::from_parts(5, 0, 0, false, 2)),
    ("MO", "Missouri", Decimal::from_parts(5, 0, 0, false, 2)),
    ("MT", "Montana", Decimal::from_parts(6, 0, 0, false, 2)),
    ("NE", "Nebraska", Decimal::from_parts(6, 0, 0, false, 2)),
    ("NV", "Nevada", Decimal::ZERO),
    ("NH", "New Hampshire", Decimal::ZERO),
    ("NJ", "New Jersey", Decimal::from_parts(6, 0, 0, false, 2)),
    ("NM", "New Mexico", Decimal::from_parts(5, 0, 0, false, 2)),
    ("NY", "New York", Decimal::from_parts(6, 0, 0, false, 2)),
    ("NC", "North Carolina", Decimal::from_parts(47, 0, 0, false, 3)),
    ("ND", "North Dakota", Decimal::from_parts(2, 0, 0, false, 2)),
    ("OH", "Ohio", Decimal::from_parts(3, 0, 0, false, 2)),
    ("OK", "Oklahoma", Decimal::from_parts(4, 0, 0, false, 2)),
    ("OR", "Oregon", Decimal::from_parts(9, 0, 0, false, 2)),
    ("PA", "Pennsylvania", Decimal::from_parts(3, 0, 0, false, 2)),
    ("RI", "Rhode Island", Decimal::from_parts(5, 0, 0, false, 2)),
    ("SC", "South Carolina", Decimal::from_parts(7, 0, 0, false, 2)),
    ("SD", "South Dakota", Decimal::ZERO),
    ("TN", "Tennessee", Decimal::ZERO),
    ("TX", "Texas", Decimal::ZERO),
    ("UT", "Utah", Decimal::from_parts(48, 0, 0, false, 3)),
    ("VT", "Vermont", Decimal::from_parts(6, 0, 0, false, 2)),
    ("VA", "Virginia", Decimal::from_parts(5, 0, 0, false, 2)),
    ("WA", "Washington", Decimal::ZERO),
    ("WV", "West Virginia", Decimal::from_parts(6, 0, 0, false, 2)),
    ("WI", "Wisconsin", Decimal::from_parts(5, 0, 0, false, 2)),
    ("WY", "Wyoming", Decimal::ZERO),
];
