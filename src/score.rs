//! Fixed-width decimal score kept as a digit string.
//!
//! The score is 7 ASCII characters, most significant first, with blanks as
//! leading digits (`"   2048"`). Additions run digit by digit with an
//! explicit carry; the value wraps modulo 10^7.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::ParseError;

/// Number of digit positions.
pub const SCORE_DIGITS: usize = 7;

/// Digit positions (counted from the least significant, 0-based) followed by a separator.
const GROUP_MARKS: [usize; 2] = [3, 6];

const BLANK: u8 = b' ';

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Score([u8; SCORE_DIGITS]);

impl Score {
    /// The starting score, `"      0"`.
    pub const ZERO: Score = Score(*b"      0");

    pub fn new() -> Self { Score::ZERO }

    /// Add the value of a tile of `rank` (2^rank).
    #[inline]
    pub fn add_rank(&mut self, rank: u8) { self.add(1u32 << rank) }

    /// Add `value` digit by digit.
    ///
    /// A blank position becomes numeric as soon as the addend or the carry
    /// reaches it; every position below a numeric one is numeric too.
    ///
    /// ```
    /// use emu2048::score::Score;
    /// let mut s: Score = "   1024".parse().unwrap();
    /// s.add_rank(10);
    /// assert_eq!(s.as_str(), "   2048");
    /// ```
    pub fn add(&mut self, value: u32) {
        let mut rest = value;
        let mut carry = 0u8;
        for pos in (0..SCORE_DIGITS).rev() {
            if rest == 0 && carry == 0 { break; }
            let held = match self.0[pos] {
                BLANK => 0,
                d => d - b'0',
            };
            let sum = held + (rest % 10) as u8 + carry;
            self.0[pos] = b'0' + sum % 10;
            carry = sum / 10;
            rest /= 10;
        }
        // Whatever is left of `rest`/`carry` lies above the 7th digit.
    }

    /// Numeric value of the digit string.
    pub fn value(&self) -> u32 {
        self.0.iter().fold(0, |acc, &d| match d {
            BLANK => acc * 10,
            d => acc * 10 + u32::from(d - b'0'),
        })
    }

    /// Bit `i` set when the digit `i` places from the right is followed by a
    /// grouping separator (thousands and millions, numeric positions only).
    ///
    /// ```
    /// use emu2048::score::Score;
    /// let s: Score = "   2048".parse().unwrap();
    /// assert_eq!(s.grouping(), 1 << 3);
    /// ```
    pub fn grouping(&self) -> u8 {
        GROUP_MARKS.iter().fold(0, |mask, &pos| {
            if self.0[SCORE_DIGITS - 1 - pos] == BLANK { mask } else { mask | (1 << pos) }
        })
    }

    /// The raw 7-character digit string.
    pub fn as_str(&self) -> &str {
        // Only ASCII blanks and digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Digit string with `,` inserted after every marked position, e.g. `"   2,048"`.
    pub fn grouped(&self) -> String {
        let mask = self.grouping();
        let mut out = String::with_capacity(SCORE_DIGITS + GROUP_MARKS.len());
        for (i, &d) in self.0.iter().enumerate() {
            out.push(char::from(d));
            let pos = SCORE_DIGITS - 1 - i;
            if mask & (1 << pos) != 0 { out.push(','); }
        }
        out
    }
}

impl Default for Score {
    fn default() -> Self { Score::ZERO }
}

impl FromStr for Score {
    type Err = ParseError;

    /// Accepts exactly 7 characters: optional blanks followed by digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let invalid = || ParseError::Score(s.to_string());
        if bytes.len() != SCORE_DIGITS { return Err(invalid()); }
        let mut digits = [BLANK; SCORE_DIGITS];
        let mut numeric = false;
        for (slot, &b) in digits.iter_mut().zip(bytes) {
            match b {
                BLANK if !numeric => {}
                b'0'..=b'9' => numeric = true,
                _ => return Err(invalid()),
            }
            *slot = b;
        }
        Ok(Score(digits))
    }
}

impl TryFrom<String> for Score {
    type Error = ParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Score> for String {
    fn from(s: Score) -> Self { s.as_str().to_string() }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score({:?})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(s: &str) -> Score { s.parse().unwrap() }

    #[test]
    fn it_starts_at_zero() {
        assert_eq!(Score::new().as_str(), "      0");
        assert_eq!(Score::new().value(), 0);
        assert_eq!(Score::new().grouping(), 0);
    }

    #[test]
    fn it_adds_with_carry() {
        let mut s = score("   1024");
        s.add_rank(10);
        assert_eq!(s.as_str(), "   2048");
        assert_eq!(s.grouping(), 0b000_1000);
        assert_eq!(s.grouped(), "   2,048");

        let mut s = score("     96");
        s.add(4);
        assert_eq!(s.as_str(), "    100");
    }

    #[test]
    fn it_zero_pads_below_new_digits() {
        let mut s = Score::new();
        s.add(1024);
        assert_eq!(s.as_str(), "   1024");
        let mut s = score("       ");
        s.add(100_000);
        assert_eq!(s.as_str(), " 100000");
    }

    #[test]
    fn it_wraps_past_seven_digits() {
        let mut s = score("9999996");
        s.add_rank(2);
        assert_eq!(s.as_str(), "0000000");
        assert_eq!(s.value(), 0);
        assert_eq!(s.grouping(), (1 << 3) | (1 << 6));
        assert_eq!(s.grouped(), "0,000,000");
    }

    #[test]
    fn it_marks_millions() {
        let mut s = score(" 999999");
        s.add(2);
        assert_eq!(s.as_str(), "1000001");
        assert_eq!(s.grouped(), "1,000,001");
    }

    #[test]
    fn it_tracks_running_sum() {
        let mut s = Score::new();
        let mut expected = 0u32;
        for rank in (1..=17).chain(1..=17) {
            s.add_rank(rank);
            expected += 1 << rank;
            assert_eq!(s.value(), expected % 10_000_000);
        }
    }

    #[test]
    fn it_rejects_malformed() {
        assert!("12".parse::<Score>().is_err());
        assert!("  1 2 3".parse::<Score>().is_err());
        assert!("  12a34".parse::<Score>().is_err());
        assert!("0000000".parse::<Score>().is_ok());
    }
}
