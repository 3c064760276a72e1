use std::cmp::Ordering;

pub use encode::*;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl PartialOrd for Mode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Ordered by the character sets they cover
impl Ord for Mode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (a, b) if a == b => Ordering::Equal,
            (Self::Numeric, _) | (_, Self::Byte) => Ordering::Less,
            (_, Self::Numeric) | (Self::Byte, _) => Ordering::Greater,
            _ => unreachable!(),
        }
    }
}

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric chunk: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric chunk: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte chunk: {len}");
                data[0] as u16
            }
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10 + 2) / 3,
            Self::Alphanumeric => (len * 11 + 1) / 2,
            Self::Byte => len * 8,
        }
    }
}

#[cfg(test)]
mod mode_tests {
    use super::Mode;
    use super::Mode::*;

    #[test]
    fn test_comparison() {
        assert!(Numeric == Numeric);
        assert!(Numeric < Alphanumeric);
        assert!(Numeric < Byte);
        assert!(Alphanumeric < Byte);
        assert!(Byte == Byte);
    }

    #[test]
    fn test_alphanumeric_digit() {
        assert_eq!(Mode::alphanumeric_digit(b'0'), 0);
        assert_eq!(Mode::alphanumeric_digit(b'Z'), 35);
        assert_eq!(Mode::alphanumeric_digit(b' '), 36);
        assert_eq!(Mode::alphanumeric_digit(b':'), 44);
    }

    #[test]
    #[should_panic]
    fn test_invalid_alphanumeric_digit() {
        Mode::alphanumeric_digit(b'a');
    }

    #[test]
    fn test_numeric_encoding() {
        assert_eq!(Numeric.encode_chunk(b"012"), 0b0000001100);
        assert_eq!(Numeric.encode_chunk(b"345"), 0b0101011001);
        assert_eq!(Numeric.encode_chunk(b"901"), 0b1110000101);
        assert_eq!(Numeric.encode_chunk(b"67"), 0b1000011);
        assert_eq!(Numeric.encode_chunk(b"8"), 0b1000);
    }

    #[test]
    fn test_alphanumeric_encoding() {
        assert_eq!(Alphanumeric.encode_chunk(b"AC"), 0b00111001110);
        assert_eq!(Alphanumeric.encode_chunk(b"-4"), 0b11100111001);
        assert_eq!(Alphanumeric.encode_chunk(b"2"), 0b000010);
    }

    #[test]
    fn test_contains() {
        assert!(Numeric.contains(b'9'));
        assert!(!Numeric.contains(b'A'));
        assert!(Alphanumeric.contains(b'Z'));
        assert!(Alphanumeric.contains(b':'));
        assert!(!Alphanumeric.contains(b'a'));
        assert!(!Alphanumeric.contains(b'?'));
        assert!(Byte.contains(0xff));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Numeric.encoded_len(3), 10);
        assert_eq!(Numeric.encoded_len(2), 7);
        assert_eq!(Numeric.encoded_len(1), 4);
        assert_eq!(Alphanumeric.encoded_len(2), 11);
        assert_eq!(Alphanumeric.encoded_len(1), 6);
        assert_eq!(Byte.encoded_len(1), 8);
    }
}

// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    mode: Mode,
    mode_bits: usize,
    len_bits: usize, // Bit len of char count
    data: &'a [u8],  // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, mode_bits: usize, len_bits: usize, data: &'a [u8]) -> Self {
        Self { mode, mode_bits, len_bits, data }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}

#[cfg(test)]
mod segment_tests {
    use test_case::test_case;

    use super::{Mode, Segment};
    use crate::common::metadata::Version;

    #[test_case(1, Mode::Numeric, "123", 24)]
    #[test_case(1, Mode::Numeric, "45", 21)]
    #[test_case(10, Mode::Numeric, "6", 20)]
    #[test_case(27, Mode::Numeric, "123", 28)]
    #[test_case(1, Mode::Alphanumeric, "AZ", 24)]
    #[test_case(10, Mode::Alphanumeric, "-", 21)]
    #[test_case(27, Mode::Alphanumeric, "AZ", 28)]
    #[test_case(1, Mode::Byte, "a", 20)]
    #[test_case(10, Mode::Byte, "ab", 36)]
    #[test_case(27, Mode::Byte, "abc", 44)]
    fn test_bit_len(ver: usize, mode: Mode, data: &str, exp: usize) {
        let ver = Version::new(ver).unwrap();
        let seg = Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data.as_bytes());
        assert_eq!(seg.bit_len(), exp);
    }
}

// Writer for encoded data
//------------------------------------------------------------------------------

mod writer {
    use super::{Mode, Segment, PADDING_CODEWORDS};
    use crate::common::bitstream::BitStream;

    pub fn push_segment(seg: Segment, out: &mut BitStream) {
        push_header(&seg, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u16, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            let data = Mode::Numeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            let data = Mode::Alphanumeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            let data = Mode::Byte.encode_chunk(chunk);
            out.push_bits(data, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc as u16, 8);
        });
    }

}

// Encoder
//------------------------------------------------------------------------------

mod encode {
    use std::mem::swap;

    use tracing::debug;

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};
    use super::{Mode, Segment, MODES};
    use crate::common::bitstream::BitStream;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    /// Encodes data into the smallest version that fits and returns the padded data
    /// codewords along with that version.
    pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        if data.is_empty() {
            return Err(QRError::EmptyData);
        }

        let (ver, segments) = find_optimal_ver_and_segments(data, ecl)?;
        Ok((write_segments(segments, ver, ecl), ver))
    }

    pub fn encode_with_version(data: &[u8], ecl: ECLevel, ver: Version) -> QRResult<BitStream> {
        if data.is_empty() {
            return Err(QRError::EmptyData);
        }

        let segments = compute_optimal_segments(data, ver);
        let size: usize = segments.iter().map(|s| s.bit_len()).sum();
        if size > ver.data_bit_capacity(ecl) {
            return Err(QRError::DataTooLong);
        }
        Ok(write_segments(segments, ver, ecl))
    }

    fn write_segments(segments: Vec<Segment>, ver: Version, ecl: ECLevel) -> BitStream {
        debug!(
            version = *ver,
            modes = ?segments.iter().map(Segment::mode).collect::<Vec<_>>(),
            "Encoding segments"
        );

        let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
        for seg in segments {
            push_segment(seg, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        bs
    }

    fn find_optimal_ver_and_segments(
        data: &[u8],
        ecl: ECLevel,
    ) -> QRResult<(Version, Vec<Segment<'_>>)> {
        let mut segments = vec![];
        let mut size = 0;
        for ver in Version::all() {
            let capacity = ver.data_bit_capacity(ecl);
            // Char count widths only change at these versions
            if matches!(*ver, 1 | 10 | 27) {
                segments = compute_optimal_segments(data, ver);
                size = segments.iter().map(|s| s.bit_len()).sum();
            }
            if size <= capacity {
                return Ok((ver, segments));
            }
        }
        Err(QRError::DataTooLong)
    }

    // Dynamic programming to compute optimum mode segments. Costs are in sixths of a
    // bit so that every mode has an integral per char cost.
    fn compute_optimal_segments(data: &[u8], ver: Version) -> Vec<Segment<'_>> {
        debug_assert!(!data.is_empty(), "Empty data");

        let len = data.len();
        let mut prev_cost: [usize; 3] = [0; 3];
        MODES.iter().enumerate().for_each(|(i, &m)| prev_cost[i] = (4 + ver.char_cnt_bits(m)) * 6);
        let mut cur_cost: [usize; 3] = [usize::MAX; 3];
        let mut min_path: Vec<Vec<usize>> = vec![vec![usize::MAX; 3]; len];
        for (i, b) in data.iter().enumerate() {
            for (j, to_mode) in MODES.iter().enumerate() {
                if !to_mode.contains(*b) {
                    continue;
                }
                let encoded_char_size = match to_mode {
                    Mode::Numeric => 20,
                    Mode::Alphanumeric => 33,
                    Mode::Byte => 48,
                };
                for (k, from_mode) in MODES.iter().enumerate() {
                    if prev_cost[k] == usize::MAX {
                        continue;
                    }
                    let mut cost = 0;
                    if to_mode != from_mode {
                        cost += (prev_cost[k] + 5) / 6 * 6;
                        cost += (4 + ver.char_cnt_bits(*to_mode)) * 6;
                    } else {
                        cost += prev_cost[k];
                    }
                    cost += encoded_char_size;
                    if cost < cur_cost[j] {
                        cur_cost[j] = cost;
                        min_path[i][j] = k;
                    }
                }
            }
            swap(&mut prev_cost, &mut cur_cost);
            cur_cost.fill(usize::MAX);
        }

        let char_modes = trace_optimal_modes(min_path, prev_cost);
        build_segments(ver, char_modes, data)
    }

    // Backtrack min_path and identify optimal char mode
    fn trace_optimal_modes(min_path: Vec<Vec<usize>>, prev_cost: [usize; 3]) -> Vec<Mode> {
        let len = min_path.len();
        let mut mode_index = 0;
        for i in 1..3 {
            if prev_cost[i] < prev_cost[mode_index] {
                mode_index = i;
            }
        }
        (0..len)
            .rev()
            .scan(mode_index, |mi, i| {
                let old_mi = *mi;
                *mi = min_path[i][*mi];
                Some(MODES[old_mi])
            })
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    // Groups consecutive chars of the same mode
    fn build_segments(ver: Version, char_modes: Vec<Mode>, data: &[u8]) -> Vec<Segment<'_>> {
        let mut segs: Vec<Segment> = vec![];
        let mut seg_start = 0;
        let mut seg_mode = char_modes[0];
        for (i, &m) in char_modes.iter().enumerate().skip(1) {
            if seg_mode != m {
                push_run(ver, seg_mode, &data[seg_start..i], &mut segs);
                seg_mode = m;
                seg_start = i;
            }
        }
        push_run(ver, seg_mode, &data[seg_start..], &mut segs);

        segs
    }

    // Runs longer than the char count field can express are split
    fn push_run<'a>(ver: Version, mode: Mode, run: &'a [u8], segs: &mut Vec<Segment<'a>>) {
        let len_bits = ver.char_cnt_bits(mode);
        let max_len = (1 << len_bits) - 1;
        for chunk in run.chunks(max_len) {
            segs.push(Segment::new(mode, ver.mode_bits(), len_bits, chunk));
        }
    }

}

// Global constants
//------------------------------------------------------------------------------

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];
