use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Walks every coordinate of the symbol in codeword placement order: two-column strips
/// from the bottom right, alternating upward and downward, skipping the vertical timing
/// column. Function modules are yielded too and must be skipped by the caller.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);

        // Columns left of the timing column are shifted by one to keep strip parity
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        match (self.width - adjusted_col) % 4 {
            // Left column of an upward strip
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            // Left column of a downward strip
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}


// Global constants
//------------------------------------------------------------------------------

static VERT_TIMING_COL: i16 = 6;
