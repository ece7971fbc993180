use super::error::FrameError;

/// Bounds-checked access to one raw frame. A read past the end of the buffer
/// reports the missing offset instead of panicking or reading garbage.
pub struct FrameReader<'a> {
    frame: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(frame: &'a [u8]) -> Self {
        Self { frame }
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FrameError> {
        if self.frame.len() < needed {
            return Err(FrameError::TooShort {
                needed,
                actual: self.frame.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, FrameError> {
        self.frame
            .get(offset)
            .copied()
            .ok_or(FrameError::TooShort {
                needed: offset + 1,
                actual: self.frame.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, FrameError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(FrameError::TooShort {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], FrameError> {
        self.frame
            .get(range.clone())
            .ok_or(FrameError::TooShort {
                needed: range.end,
                actual: self.frame.len(),
            })
    }

    /// Read at most `range.end - range.start` bytes starting at `range.start`,
    /// clamped to the end of the frame. Several panel firmwares declare
    /// lengths that overrun the data section; the decoder takes what is there.
    pub fn read_slice_clamped(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], FrameError> {
        let end = range.end.min(self.frame.len());
        if range.start > end {
            return Err(FrameError::TooShort {
                needed: range.start,
                actual: self.frame.len(),
            });
        }
        Ok(&self.frame[range.start..end])
    }

    pub fn expect_marker(&self, offset: usize, expected: u8) -> Result<(), FrameError> {
        let found = self.read_u8(offset)?;
        if found != expected {
            return Err(FrameError::MissingMarker {
                offset,
                expected,
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FrameReader;

    #[test]
    fn read_u8_past_end() {
        let reader = FrameReader::new(&[1, 2, 3]);
        let err = reader.read_u8(3).unwrap_err();
        assert!(err.to_string().contains("need 4 bytes, got 3"));
    }

    #[test]
    fn read_u16_le_order() {
        let reader = FrameReader::new(&[0x34, 0x12]);
        assert_eq!(reader.read_u16_le(0..2).unwrap(), 0x1234);
    }

    #[test]
    fn clamped_slice_stops_at_end() {
        let reader = FrameReader::new(&[1, 2, 3]);
        assert_eq!(reader.read_slice_clamped(1..10).unwrap(), &[2, 3]);
        assert!(reader.read_slice_clamped(5..10).is_err());
    }

    #[test]
    fn expect_marker_reports_found_byte() {
        let reader = FrameReader::new(&[0x0E]);
        let err = reader.expect_marker(0, 0x0D).unwrap_err();
        assert!(err.to_string().contains("expected 0x0d"));
    }
}
