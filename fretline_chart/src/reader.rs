/// Longest variable-length quantity the format allows.
pub const MAX_VARIABLE_LENGTH_BYTES: usize = 4;

/// Decodes a variable-length quantity from the front of `bytes`.
///
/// Seven bits per byte, most significant group first; a set high bit means
/// another byte follows. Decoding stops after four bytes even if the fourth
/// still has its continuation bit set. Returns the value and the number of
/// bytes consumed, or `None` when the input ends mid-quantity.
pub fn read_variable_length(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &b) in bytes.iter().take(MAX_VARIABLE_LENGTH_BYTES).enumerate() {
        value = (value << 7) | u32::from(b & 0x7F);
        if b & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    if bytes.len() >= MAX_VARIABLE_LENGTH_BYTES {
        Some((value, MAX_VARIABLE_LENGTH_BYTES))
    } else {
        None
    }
}

/// Forward-only cursor over a byte slice. Reads past the end return `None`
/// and leave the cursor where it was.
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn read_u8(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    /// Steps back over bytes that were already read.
    pub(crate) fn rewind(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    pub(crate) fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    pub(crate) fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Some(out)
    }

    pub(crate) fn skip(&mut self, n: usize) -> bool {
        self.take(n).is_some()
    }

    pub(crate) fn read_u16_be(&mut self) -> Option<u16> {
        self.take_array::<2>().map(u16::from_be_bytes)
    }

    pub(crate) fn read_u32_be(&mut self) -> Option<u32> {
        self.take_array::<4>().map(u32::from_be_bytes)
    }

    pub(crate) fn read_variable_length(&mut self) -> Option<u32> {
        let (value, used) = read_variable_length(&self.bytes[self.pos..])?;
        self.pos += used;
        Some(value)
    }
}
