//! Big-endian binary cursor over a seekable byte source.
//!
//! Every console structure in BLH, BLI and PAK files is big-endian, so the
//! cursor has no endianness switch. Reads that come back short are reported
//! as [`Error::IncompleteData`] so callers can decide whether one record or
//! the whole section is lost.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use crate::error::{Error, Result};

/// Sequential big-endian reader with absolute seeking.
#[derive(Debug)]
pub struct BinaryCursor<R> {
    reader: R,
    pos: u64,
    len: u64,
}

impl BinaryCursor<BufReader<File>> {
    /// Open a file read-only. The handle is released when the cursor is dropped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<'a> BinaryCursor<Cursor<&'a [u8]>> {
    /// Wrap an in-memory buffer.
    #[must_use]
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            reader: Cursor::new(data),
            pos: 0,
            len: data.len() as u64,
        }
    }
}

impl<R: Read + Seek> BinaryCursor<R> {
    /// Wrap a reader, measuring its length and rewinding to the start.
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self { reader, pos: 0, len })
    }

    /// Total size of the source in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current absolute position.
    #[must_use]
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Seek to an absolute position. Seeking past the end is allowed; the next read comes back short.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.pos = self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Run `f` at `offset`, then put the cursor back where it was, whether `f` failed or not.
    pub fn with_position<T>(
        &mut self,
        offset: u64,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.pos;
        self.seek(offset)?;
        let result = f(self);
        self.seek(saved)?;
        result
    }

    /// Advance past alignment padding after a block of `consumed` bytes.
    pub fn skip_padding(&mut self, consumed: u64, alignment: u64) -> Result<()> {
        let remainder = consumed % alignment;
        if remainder > 0 {
            self.seek(self.pos + (alignment - remainder))?;
        }
        Ok(())
    }

    /// Read up to `len` bytes, stopping early at end of file.
    pub fn read_bytes_available(&mut self, len: usize) -> Result<Vec<u8>> {
        let remaining = self.len.saturating_sub(self.pos);
        let mut buf = Vec::with_capacity((len as u64).min(remaining) as usize);
        (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
        self.pos += buf.len() as u64;
        Ok(buf)
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let offset = self.pos;
        let buf = self.read_bytes_available(len)?;
        if buf.len() < len {
            return Err(Error::IncompleteData {
                offset,
                expected: len,
                actual: buf.len(),
            });
        }
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let offset = self.pos;
        let value = self
            .reader
            .read_u8()
            .map_err(|e| self.short_read(e, offset, 1))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let offset = self.pos;
        let value = self
            .reader
            .read_u16::<BigEndian>()
            .map_err(|e| self.short_read(e, offset, 2))?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let offset = self.pos;
        let value = self
            .reader
            .read_u32::<BigEndian>()
            .map_err(|e| self.short_read(e, offset, 4))?;
        self.pos += 4;
        Ok(value)
    }

    /// Read a 32-bit word and reinterpret its bits as an IEEE-754 float.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_u32().map(f32::from_bits)
    }

    /// Read a half-precision float, widened to `f32`.
    pub fn read_f16(&mut self) -> Result<f32> {
        self.read_u16().map(|bits| half::f16::from_bits(bits).to_f32())
    }

    /// Read `count` consecutive `u16` values.
    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>> {
        let bytes = self.read_bytes(count * 2)?;
        Ok(bytes.chunks_exact(2).map(BigEndian::read_u16).collect())
    }

    /// Read `count` consecutive `u32` values.
    pub fn read_u32_array(&mut self, count: usize) -> Result<Vec<u32>> {
        let bytes = self.read_bytes(count * 4)?;
        Ok(bytes.chunks_exact(4).map(BigEndian::read_u32).collect())
    }

    /// Read a fixed number of `u32` values into an array.
    pub fn read_u32s<const N: usize>(&mut self) -> Result<[u32; N]> {
        let bytes = self.read_bytes(N * 4)?;
        let mut out = [0u32; N];
        BigEndian::read_u32_into(&bytes, &mut out);
        Ok(out)
    }

    /// Read a NUL-terminated string.
    ///
    /// Stops at the terminator or at end of file; the cursor ends up just
    /// past the terminator.
    pub fn read_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            if self.reader.read(&mut byte)? == 0 {
                break;
            }
            self.pos += 1;
            if byte[0] == 0 {
                break;
            }
            bytes.push(byte[0]);
        }
        Ok(String::from_utf8(bytes)?)
    }

    /// Map a failed fixed-size read, putting the reader back at `offset`.
    fn short_read(&mut self, err: std::io::Error, offset: u64, expected: usize) -> Error {
        if let Err(seek_err) = self.seek(offset) {
            return seek_err;
        }
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::IncompleteData {
                offset,
                expected,
                actual: self.len.saturating_sub(offset).min(expected as u64) as usize,
            }
        } else {
            Error::Io(err)
        }
    }
}
