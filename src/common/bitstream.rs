// Bit stream
//------------------------------------------------------------------------------

/// Append-only, most significant bit first buffer with a fixed bit capacity.
#[derive(Debug, Clone)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: Vec::with_capacity((capacity + 7) >> 3), len: 0, capacity }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn push(&mut self, bit: bool) {
        debug_assert!(
            self.len < self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + 1
        );

        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b1000_0000 >> offset;
        }
        self.len += 1;
    }

    pub fn push_bits(&mut self, bits: u16, size: usize) {
        debug_assert!(size <= 16, "Bit count exceeds 16: {size}");
        debug_assert!(
            size >= (16 - bits.leading_zeros()) as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        for i in (0..size).rev() {
            self.push((bits >> i) & 1 == 1);
        }
    }
}
