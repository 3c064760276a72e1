use std::ops::Deref;

use tracing::debug;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskingPattern);
        }
        Ok(Self(pattern))
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Each function returns true where the module at (row, col) is flipped
mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Mask pattern is validated on construction"),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Tries all 8 patterns and applies the one with the lowest penalty. Ties go to the
/// lowest pattern index.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let best = (0..8)
        .map(MaskPattern)
        .min_by_key(|&m| {
            let mut qr = qr.clone();
            qr.apply_mask(m);
            compute_total_penalty(&qr)
        })
        .unwrap_or(MaskPattern(0));
    debug!(mask = *best, "Selected mask pattern");
    qr.apply_mask(best);
    best
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width();
    let rows: Vec<Vec<Color>> =
        (0..w).map(|r| (0..w).map(|c| *qr.get(r as i16, c as i16)).collect()).collect();
    let cols: Vec<Vec<Color>> =
        (0..w).map(|c| (0..w).map(|r| rows[r][c]).collect()).collect();

    let adj_pen: u32 = rows.iter().chain(cols.iter()).map(|l| compute_adjacent_penalty(l)).sum();
    let fp_pen: u32 =
        rows.iter().chain(cols.iter()).map(|l| compute_finder_pattern_penalty(l)).sum();
    adj_pen + compute_block_penalty(&rows) + fp_pen + compute_balance_penalty(&rows)
}

// Runs of 5 or more same colored modules score 3, plus 1 for each extra module
fn compute_adjacent_penalty(line: &[Color]) -> u32 {
    let mut pen = 0;
    let mut run = 0;
    let mut last = None;
    for &clr in line {
        if last == Some(clr) {
            run += 1;
        } else {
            if run >= 5 {
                pen += run - 2;
            }
            last = Some(clr);
            run = 1;
        }
    }
    if run >= 5 {
        pen += run - 2;
    }
    pen
}

// Every 2x2 block of a single color scores 3. Blocks may overlap.
fn compute_block_penalty(rows: &[Vec<Color>]) -> u32 {
    let mut pen = 0;
    for pair in rows.windows(2) {
        for c in 0..pair[0].len().saturating_sub(1) {
            let clr = pair[0][c];
            if clr == pair[0][c + 1] && clr == pair[1][c] && clr == pair[1][c + 1] {
                pen += 3;
            }
        }
    }
    pen
}

// 1:1:3:1:1 finder-like pattern with 4 light modules on a side scores 40 per side.
// Modules beyond the symbol edge are light.
fn compute_finder_pattern_penalty(line: &[Color]) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let w = line.len() as isize;
    let is_light = |i: isize| i < 0 || i >= w || line[i as usize] == Color::Light;

    let mut pen = 0;
    for j in 0..(w - 6).max(0) {
        let start = j as usize;
        if line[start..start + 7] != PATTERN {
            continue;
        }
        if (j - 4..j).all(is_light) {
            pen += 40;
        }
        if (j + 7..j + 11).all(is_light) {
            pen += 40;
        }
    }
    pen
}

// 10 points for every full 5% the dark ratio deviates from 50%
fn compute_balance_penalty(rows: &[Vec<Color>]) -> u32 {
    let total = rows.iter().map(|r| r.len()).sum::<usize>() as i64;
    if total == 0 {
        return 0;
    }
    let dark = rows.iter().flatten().filter(|&&c| c == Color::Dark).count() as i64;
    let k = (dark * 20 - total * 10).abs() / total;
    k as u32 * 10
}
