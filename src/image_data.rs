use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Encoded image data with a read/write position.
///
/// Used as the input of decoders and as the output of encoders.
/// The format of data is not stored, it is either passed explicitly
/// (encoding) or detected from the content (decoding).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImageBytes {
    cursor: Cursor<Vec<u8>>,
}

impl RawImageBytes {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    #[inline]
    pub fn set_position(&mut self, position: u64) {
        self.cursor.set_position(position)
    }

    /// All bytes regardless of the current position.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    /// Bytes from the current position up to the end.
    pub fn remaining(&self) -> &[u8] {
        let data = self.cursor.get_ref();
        let start = (self.cursor.position() as usize).min(data.len());
        &data[start..]
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl From<Vec<u8>> for RawImageBytes {
    fn from(data: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }
}

impl From<&[u8]> for RawImageBytes {
    fn from(data: &[u8]) -> Self {
        data.to_vec().into()
    }
}

impl AsRef<[u8]> for RawImageBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Read for RawImageBytes {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for RawImageBytes {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for RawImageBytes {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

/// Opaque encoder options.
///
/// The content is passed to an encoder as is, its meaning is
/// defined by the encoder of a particular format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecOptions(Vec<u8>);

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for CodecOptions {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for CodecOptions {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}
