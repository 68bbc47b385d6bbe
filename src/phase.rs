//! Rational multiples of π, stored in lowest terms with an exact canonical
//! form, used throughout the tableau/ZX layers for rotation angles: exact
//! rational arithmetic instead of floating point, because tableau rewriting
//! depends on exact equality of phases.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::error::{Error, Result};

/// A rational multiple of π: `num / den * π`, `den > 0`, `num` reduced into
/// `[-den, den)`, `gcd(|num|, den) == 1` (or `num == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase {
    num: i64,
    den: i64,
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    if a == 0 {
        1
    } else {
        a
    }
}

impl Phase {
    pub const fn zero() -> Self {
        Phase { num: 0, den: 1 }
    }

    pub const fn pi() -> Self {
        Phase { num: 1, den: 1 }
    }

    /// Build and normalize `num/den * π`.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "Phase denominator must not be zero");
        let mut num = num;
        let mut den = den;
        if den < 0 {
            num = -num;
            den = -den;
        }
        let g = gcd(num, den);
        num /= g;
        den /= g;
        // reduce num modulo 2*den into [-den, den)
        let window = 2 * den;
        let mut num = num.rem_euclid(window);
        if num >= den {
            num -= window;
        }
        if num == 0 {
            den = 1;
        } else {
            let g = gcd(num, den);
            num /= g;
            den /= g;
        }
        Phase { num, den }
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn to_f64(&self) -> f64 {
        (self.num as f64 / self.den as f64) * std::f64::consts::PI
    }

    pub fn neg(&self) -> Self {
        Phase::new(-self.num, self.den)
    }

    pub fn add(&self, rhs: &Phase) -> Self {
        // a/b + c/d = (a*d + c*b) / (b*d)
        Phase::new(self.num * rhs.den + rhs.num * self.den, self.den * rhs.den)
    }

    pub fn sub(&self, rhs: &Phase) -> Self {
        self.add(&rhs.neg())
    }

    /// Multiply by an integer scalar.
    pub fn mul_scalar(&self, k: i64) -> Self {
        Phase::new(self.num * k, self.den)
    }

    /// Approximate an arbitrary real angle (radians) as a rational multiple
    /// of π, via a continued-fraction search bounded by `max_denominator`.
    /// Used only by [`crate::decompose`], whose SU(2)/two-level synthesis
    /// produces angles with no exact rational representation in general —
    /// every other producer of a `Phase` builds one exactly.
    pub fn approximate(radians: f64, max_denominator: i64) -> Self {
        let target = radians / std::f64::consts::PI;
        let (mut h_prev, mut h_curr) = (0i64, 1i64);
        let (mut k_prev, mut k_curr) = (1i64, 0i64);
        let mut x = target;
        loop {
            let a = x.floor();
            let a_i = a as i64;
            let h_next = a_i.saturating_mul(h_curr).saturating_add(h_prev);
            let k_next = a_i.saturating_mul(k_curr).saturating_add(k_prev);
            if k_next == 0 || k_next.abs() > max_denominator {
                break;
            }
            h_prev = h_curr;
            h_curr = h_next;
            k_prev = k_curr;
            k_curr = k_next;
            let frac = x - a;
            if frac.abs() < 1e-12 {
                break;
            }
            x = 1.0 / frac;
        }
        if k_curr == 0 {
            return Phase::zero();
        }
        Phase::new(h_curr, k_curr)
    }

    /// Parse phase text: `π`, `pi`, signed
    /// fractions/decimals of π (the symbol is optional — a bare rational or
    /// decimal is itself read as a coefficient of π, since `Phase` is always
    /// a multiple of π).
    pub fn from_string(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(Error::Parse("empty phase token".to_string()));
        }

        // Strip a leading sign so it can be reattached to whatever's left.
        let (neg, rest) = match raw.as_bytes()[0] {
            b'-' => (true, &raw[1..]),
            b'+' => (false, &raw[1..]),
            _ => (false, raw),
        };

        // Locate the pi/π token, case-insensitively, and remove it along
        // with an adjacent multiplication sign (`*` or `·`).
        let lower = rest.to_lowercase();
        let pi_pos = lower.find('π').or_else(|| lower.find("pi"));

        let coeff_str: String = match pi_pos {
            None => rest.to_string(),
            Some(pos) => {
                let pi_len = if lower[pos..].starts_with('π') {
                    'π'.len_utf8()
                } else {
                    2
                };
                let before = rest[..pos].trim_end_matches(['*', '\u{b7}']).trim();
                let after = rest[pos + pi_len..].trim();

                if !after.is_empty() && !after.starts_with('/') {
                    return Err(Error::Parse(format!("malformed phase literal {s:?}")));
                }

                match (before.is_empty(), after.is_empty()) {
                    (true, true) => "1".to_string(),
                    (false, true) => before.to_string(),
                    (true, false) => format!("1{after}"),
                    (false, false) => format!("{before}{after}"),
                }
            }
        };

        let mut phase = Self::parse_coefficient(&coeff_str)?;
        if neg {
            phase = phase.neg();
        }
        Ok(phase)
    }

    fn parse_coefficient(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((num_str, den_str)) = s.split_once('/') {
            let num: i64 = num_str
                .trim()
                .parse()
                .map_err(|_| Error::Parse(format!("bad numerator in {s:?}")))?;
            let den: i64 = den_str
                .trim()
                .parse()
                .map_err(|_| Error::Parse(format!("bad denominator in {s:?}")))?;
            if den == 0 {
                return Err(Error::Parse(format!("zero denominator in {s:?}")));
            }
            return Ok(Phase::new(num, den));
        }
        if let Some(dot) = s.find('.') {
            let digits_after = s.len() - dot - 1;
            let den = 10i64.pow(digits_after as u32);
            let joined: String = s.chars().filter(|&c| c != '.').collect();
            let num: i64 = joined
                .parse()
                .map_err(|_| Error::Parse(format!("bad decimal {s:?}")))?;
            return Ok(Phase::new(num, den));
        }
        let num: i64 = s.parse().map_err(|_| Error::Parse(format!("bad phase {s:?}")))?;
        Ok(Phase::new(num, 1))
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::zero()
    }
}

impl Add for Phase {
    type Output = Phase;
    fn add(self, rhs: Phase) -> Phase {
        Phase::add(&self, &rhs)
    }
}

impl Sub for Phase {
    type Output = Phase;
    fn sub(self, rhs: Phase) -> Phase {
        Phase::sub(&self, &rhs)
    }
}

impl Neg for Phase {
    type Output = Phase;
    fn neg(self) -> Phase {
        Phase::neg(&self)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num == 0 {
            write!(f, "0")
        } else if self.den == 1 {
            match self.num {
                1 => write!(f, "π"),
                -1 => write!(f, "-π"),
                n => write!(f, "{n}π"),
            }
        } else {
            match self.num {
                1 => write!(f, "π/{}", self.den),
                -1 => write!(f, "-π/{}", self.den),
                n => write!(f, "{n}π/{}", self.den),
            }
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Phase::from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_into_canonical_window() {
        assert_eq!(Phase::new(3, 2), Phase::new(-1, 2));
        assert_eq!(Phase::new(4, 2), Phase::new(0, 1));
        assert_eq!(Phase::new(-4, 2), Phase::new(0, 1));
    }

    #[test]
    fn zero_equals_plus_minus_two_pi() {
        assert_eq!(Phase::new(0, 1), Phase::new(2, 1));
        assert_eq!(Phase::new(0, 1), Phase::new(-2, 1));
    }

    #[test]
    fn add_then_subtract_is_identity() {
        let p = Phase::new(3, 8);
        let q = Phase::new(-5, 7);
        assert_eq!(p.add(q).sub(q), p);
    }

    #[test]
    fn display_matches_spec_rules() {
        assert_eq!(Phase::zero().to_string(), "0");
        assert_eq!(Phase::pi().to_string(), "π");
        assert_eq!(Phase::new(-1, 1).to_string(), "-π");
        assert_eq!(Phase::new(3, 4).to_string(), "3π/4");
        assert_eq!(Phase::new(-3, 4).to_string(), "-3π/4");
    }

    #[test]
    fn parses_documented_scenario_inputs() {
        assert_eq!(Phase::from_string("π").unwrap(), Phase::pi());
        assert_eq!(Phase::from_string("pi").unwrap(), Phase::pi());
        assert_eq!(Phase::from_string("-π/4").unwrap(), Phase::new(-1, 4));
        assert_eq!(Phase::from_string("3*pi/2").unwrap(), Phase::new(-1, 2));
        assert_eq!(Phase::from_string("0.5").unwrap(), Phase::new(1, 2));
        assert_eq!(Phase::from_string("1/3").unwrap(), Phase::new(1, 3));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Phase::from_string("not a phase").is_err());
        assert!(Phase::from_string("").is_err());
    }
}
