// Little-endian field decoding over fixed-layout byte blocks
//
// Headers are decoded field by field at fixed offsets. Nothing is cast onto
// a struct, so host layout, padding and endianness never matter.

/// Read little-endian 16-bit integer at `offset`
pub fn le_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

/// Read little-endian 32-bit integer at `offset`
pub fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buffer = [0u8; 4];
    buffer.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buffer)
}

/// Read little-endian 64-bit integer at `offset`
pub fn le_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut buffer = [0u8; 8];
    buffer.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(buffer)
}

/// Copy a fixed-size signature out of a header block
pub fn signature<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut buffer = [0u8; N];
    buffer.copy_from_slice(&bytes[offset..offset + N]);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_at_offsets() {
        let bytes = [0xFFu8, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        assert_eq!(le_u16(&bytes, 1), 0x1234);
        assert_eq!(le_u32(&bytes, 3), 0x1234_5678);
    }

    #[test]
    fn decodes_u64() {
        let value: u64 = 0x0102_0304_0506_0708;
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&value.to_le_bytes());
        assert_eq!(le_u64(&bytes, 1), value);
    }

    #[test]
    fn copies_signature() {
        let sig: [u8; 4] = signature(b"xxOggSyy", 2);
        assert_eq!(&sig, b"OggS");
    }
}
