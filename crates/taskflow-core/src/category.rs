use std::fmt::Debug;

/// A closed enumeration stored as a display string in the backend, such as a
/// task status. Statistics group records by these values.
pub trait CategoryValue: Copy + Ord + Debug + Send + Sync + 'static {
    /// Every member, in display order.
    const ALL: &'static [Self];

    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    /// The exact string stored in the backend.
    fn as_str(&self) -> &'static str;

    /// Exact match first, then case-insensitive.
    fn parse_value(raw: &str) -> crate::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == raw)
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(raw.trim()))
            })
            .ok_or_else(|| crate::Error::UnknownVariant {
                kind: Self::KIND,
                value: raw.to_string(),
            })
    }
}

/// `Display` and `FromStr` for a `CategoryValue`, both through its stored string.
macro_rules! display_from_str {
    ($($ty:ty),*) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.pad($crate::category::CategoryValue::as_str(self))
                }
            }

            impl std::str::FromStr for $ty {
                type Err = $crate::Error;

                fn from_str(s: &str) -> $crate::Result<Self> {
                    <$ty as $crate::category::CategoryValue>::parse_value(s)
                }
            }
        )*
    };
}

pub(crate) use display_from_str;
