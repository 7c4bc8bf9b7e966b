//! Unicode selectors: `*` or a comma-separated list of hex codepoints and
//! ranges, each optionally prefixed with `U+`, `u` and the like.

use std::{collections::BTreeSet, str::FromStr};

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnicodeSelection {
    /// Every codepoint the font maps.
    #[default]
    All,
    /// Sorted, deduplicated codepoints.
    Codepoints(Vec<u32>),
}

impl UnicodeSelection {
    /// The selected codepoints out of those the font maps, in ascending order.
    pub fn select(&self, mapped: impl IntoIterator<Item = u32>) -> Vec<u32> {
        let mapped: BTreeSet<u32> = mapped.into_iter().collect();
        match self {
            UnicodeSelection::All => mapped.into_iter().collect(),
            UnicodeSelection::Codepoints(codepoints) => codepoints
                .iter()
                .copied()
                .filter(|c| mapped.contains(c))
                .collect(),
        }
    }
}

fn parse_codepoint(s: &str) -> Result<u32> {
    let hex = s.trim().trim_start_matches(['U', 'u', '+']);
    let value = u32::from_str_radix(hex, 16)
        .with_context(|| format!("Invalid codepoint '{}'", s.trim()))?;
    if char::from_u32(value).is_none() {
        bail!("Codepoint {value:04X} is not a Unicode scalar value");
    }
    Ok(value)
}

impl FromStr for UnicodeSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == "*" {
            return Ok(UnicodeSelection::All);
        }
        let mut codepoints = BTreeSet::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_codepoint(start)?, parse_codepoint(end)?);
                    if start > end {
                        bail!("Empty codepoint range '{}'", part.trim());
                    }
                    codepoints.extend(start..=end);
                }
                None => {
                    codepoints.insert(parse_codepoint(part)?);
                }
            }
        }
        Ok(UnicodeSelection::Codepoints(
            codepoints.into_iter().collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_selects_everything_mapped() {
        let selection: UnicodeSelection = "*".parse().unwrap();
        assert_eq!(selection.select([0x62, 0x41, 0x61]), [0x41, 0x61, 0x62]);
    }

    #[test]
    fn test_values_and_ranges() {
        let selection: UnicodeSelection = "U+0041, u61-63,2B".parse().unwrap();
        assert_eq!(
            selection,
            UnicodeSelection::Codepoints(vec![0x2B, 0x41, 0x61, 0x62, 0x63])
        );
        assert_eq!(selection.select([0x41, 0x62, 0x7A]), [0x41, 0x62]);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!("zz".parse::<UnicodeSelection>().is_err());
        assert!("63-61".parse::<UnicodeSelection>().is_err());
        assert!("D800".parse::<UnicodeSelection>().is_err());
    }
}
