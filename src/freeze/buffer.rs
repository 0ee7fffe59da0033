//! Freeze buffer and sample codec.
//!
//! The buffer is a fixed byte arena. Samples are packed into it at the active
//! [`BitDepth`]: 16-bit samples are stored as-is (little endian), 8-bit samples
//! keep only the high byte, which is an audible lo-fi quantization and part of
//! the effect.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitDepth {
    Eight = 8,
    #[default]
    Sixteen = 16,
}

impl BitDepth {
    /// Nearest supported depth for an arbitrary bit count.
    pub fn from_bits(bits: u8) -> Self {
        if bits <= 12 {
            BitDepth::Eight
        } else {
            BitDepth::Sixteen
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }

    /// Largest error a store/load round trip can introduce.
    #[inline]
    pub const fn quantization_step(self) -> i32 {
        match self {
            BitDepth::Eight => 1 << 8,
            BitDepth::Sixteen => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FreezeBuffer<const CAPACITY: usize> {
    data: [u8; CAPACITY],
    bit_depth: BitDepth,
    size_in_samples: usize,
}

impl<const CAPACITY: usize> Default for FreezeBuffer<CAPACITY> {
    fn default() -> Self {
        Self::new(BitDepth::default())
    }
}

impl<const CAPACITY: usize> FreezeBuffer<CAPACITY> {
    pub fn new(bit_depth: BitDepth) -> Self {
        Self {
            data: [0; CAPACITY],
            bit_depth,
            size_in_samples: CAPACITY / bit_depth.bytes_per_sample(),
        }
    }

    /// Capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Switches the packing. Existing bytes are reinterpreted, not converted.
    pub fn set_bit_depth(&mut self, bit_depth: BitDepth) {
        self.bit_depth = bit_depth;
        self.size_in_samples = CAPACITY / bit_depth.bytes_per_sample();
    }

    #[inline]
    pub fn size_in_samples(&self) -> usize {
        self.size_in_samples
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Stores `value` at sample `index`. The index must be below
    /// [`size_in_samples`](Self::size_in_samples).
    #[inline]
    pub fn write_sample(&mut self, value: i16, index: usize) {
        match self.bit_depth {
            BitDepth::Eight => {
                self.data[index] = (value >> 8) as i8 as u8;
            }
            BitDepth::Sixteen => {
                let offset = index * 2;
                let bytes = value.to_le_bytes();
                self.data[offset] = bytes[0];
                self.data[offset + 1] = bytes[1];
            }
        }
    }

    /// Loads the sample at `index`, expanded back to 16 bits.
    #[inline]
    pub fn read_sample(&self, index: usize) -> i16 {
        match self.bit_depth {
            BitDepth::Eight => (self.data[index] as i8 as i16) << 8,
            BitDepth::Sixteen => {
                let offset = index * 2;
                i16::from_le_bytes([self.data[offset], self.data[offset + 1]])
            }
        }
    }
}
