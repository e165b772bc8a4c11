// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Nuclear isotopes supported by the spin-system model.

use std::fmt;
use std::str::FromStr;

/// A magnetically active nucleus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Isotope {
    #[default]
    H1,
    H2,
    C13,
    N15,
    F19,
    P31,
}

impl Isotope {
    /// Twice the spin quantum number (2I), kept integral.
    pub fn twice_spin(self) -> u32 {
        match self {
            Isotope::H2 => 2,
            _ => 1,
        }
    }

    /// Spin quantum number I.
    pub fn spin(self) -> f64 {
        self.twice_spin() as f64 / 2.0
    }

    /// Number of Zeeman levels, 2I + 1.
    pub fn multiplicity(self) -> usize {
        self.twice_spin() as usize + 1
    }

    /// Gyromagnetic ratio relative to 1H.
    pub fn relative_gamma(self) -> f64 {
        match self {
            Isotope::H1 => 1.0,
            Isotope::H2 => 0.153_506,
            Isotope::C13 => 0.251_449,
            Isotope::N15 => -0.101_329,
            Isotope::F19 => 0.940_866,
            Isotope::P31 => 0.404_808,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Isotope::H1 => "1H",
            Isotope::H2 => "2H",
            Isotope::C13 => "13C",
            Isotope::N15 => "15N",
            Isotope::F19 => "19F",
            Isotope::P31 => "31P",
        }
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Isotope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1H" | "H" => Ok(Isotope::H1),
            "2H" | "D" => Ok(Isotope::H2),
            "13C" => Ok(Isotope::C13),
            "15N" => Ok(Isotope::N15),
            "19F" => Ok(Isotope::F19),
            "31P" => Ok(Isotope::P31),
            other => Err(format!("unknown isotope '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!("1H".parse::<Isotope>().unwrap(), Isotope::H1);
        assert_eq!(" 13C ".parse::<Isotope>().unwrap(), Isotope::C13);
        assert!("7Li".parse::<Isotope>().is_err());
    }

    #[test]
    fn test_multiplicity() {
        assert_eq!(Isotope::H1.multiplicity(), 2);
        assert_eq!(Isotope::H2.multiplicity(), 3);
        assert_eq!(Isotope::P31.spin(), 0.5);
    }

    #[test]
    fn test_display_roundtrip() {
        for iso in [Isotope::H1, Isotope::H2, Isotope::C13, Isotope::N15, Isotope::F19, Isotope::P31] {
            assert_eq!(iso.to_string().parse::<Isotope>().unwrap(), iso);
        }
    }
}
