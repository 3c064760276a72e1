use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};
use std::str::FromStr;

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Version
//------------------------------------------------------------------------------

/// Symbol version, 1 to 40. Width of the symbol is `17 + 4 * version` modules.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(version: usize) -> QRResult<Self> {
        if !(1..=40).contains(&version) {
            return Err(QRError::InvalidVersion);
        }
        Ok(Self(version))
    }

    pub(crate) fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    // Center coordinates of alignment patterns along either axis. Finder corners are
    // included and must be skipped by the caller.
    pub fn alignment_pattern(self) -> Vec<i16> {
        let v = self.0 as i16;
        if v == 1 {
            return Vec::new();
        }

        let count = v / 7 + 2;
        let step = if v == 32 { 26 } else { (v * 4 + count * 2 + 1) / (count * 2 - 2) * 2 };
        let last = self.width() as i16 - 7;

        let mut res = vec![6];
        res.extend((0..count - 1).rev().map(|i| last - i * step));
        res
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let tier = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][tier],
            Mode::Alphanumeric => [9, 11, 13][tier],
            Mode::Byte => [8, 16, 16][tier],
        }
    }

    // Modules available for data and ecc once every function pattern is placed
    fn raw_data_modules(self) -> usize {
        let v = self.0;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_count = v / 7 + 2;
            res -= (25 * align_count - 10) * align_count - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn ecc_per_block(self, ec_level: ECLevel) -> usize {
        ECC_PER_BLOCK[ec_level as usize][self.0 - 1]
    }

    pub fn block_count(self, ec_level: ECLevel) -> usize {
        BLOCK_COUNT[ec_level as usize][self.0 - 1]
    }

    /// Data codewords per block as `(group1 size, group1 count, group2 size, group2 count)`.
    /// Group 2 blocks carry one more data codeword than group 1.
    pub fn data_codewords_per_block(self, ec_level: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.block_count(ec_level);
        let ecc = self.ecc_per_block(ec_level);

        let long_count = total % blocks;
        let short_count = blocks - long_count;
        let short_size = total / blocks - ecc;

        if long_count == 0 {
            (short_size, short_count, 0, 0)
        } else {
            (short_size, short_count, short_size + 1, long_count)
        }
    }

    pub fn data_capacity(self, ec_level: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ec_level) * self.block_count(ec_level)
    }

    pub fn data_bit_capacity(self, ec_level: ECLevel) -> usize {
        self.data_capacity(ec_level) << 3
    }

    // 6 bit version number followed by 12 bit BCH(18, 6) remainder
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is only defined from version 7: {}", self.0);

        let data = self.0 as u32;
        let mut rem = data;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * VERSION_INFO_GENERATOR);
        }
        (data << 12) | rem
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Default)]
pub enum ECLevel {
    /// Recovers ~7% of the symbol
    L = 0,
    /// Recovers ~15% of the symbol
    #[default]
    M = 1,
    /// Recovers ~25% of the symbol
    Q = 2,
    /// Recovers ~30% of the symbol
    H = 3,
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Format information
//------------------------------------------------------------------------------

// 2 bit ec level + 3 bit mask, followed by 10 bit BCH(15, 5) remainder, xored with the
// fixed mask so that the result is never all zero
pub fn format_info(ec_level: ECLevel, mask: MaskPattern) -> u32 {
    let data = (((ec_level as u32) ^ 1) << 3) | *mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_INFO_GENERATOR);
    }
    ((data << 10) | rem) ^ FORMAT_INFO_MASK
}

#[cfg(test)]
mod format_info_tests {
    use test_case::test_case;

    use super::{format_info, ECLevel};
    use crate::common::mask::MaskPattern;

    #[test_case(ECLevel::L, 0, 0b111011111000100)]
    #[test_case(ECLevel::L, 7, 0b110100101110110)]
    #[test_case(ECLevel::M, 0, 0b101010000010010)]
    #[test_case(ECLevel::M, 5, 0b100000011001110)]
    #[test_case(ECLevel::Q, 2, 0b011111100110001)]
    #[test_case(ECLevel::H, 4, 0b000011101100010)]
    fn test_format_info(ec_level: ECLevel, mask: u8, exp: u32) {
        assert_eq!(format_info(ec_level, MaskPattern::new(mask).unwrap()), exp);
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

static FORMAT_INFO_GENERATOR: u32 = 0b101_0011_0111;

static FORMAT_INFO_MASK: u32 = 0b101_0100_0001_0010;

static VERSION_INFO_GENERATOR: u32 = 0b1_1111_0010_0101;

// Most significant bit first. Negative indices wrap around from the far edge.
pub static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

static ECC_PER_BLOCK: [[usize; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

static BLOCK_COUNT: [[usize; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13, 14,
        15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34,
        34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
