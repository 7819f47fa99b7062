/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::io::{Error, ErrorKind};

/// Reads primitive values out of an in-memory buffer in a switchable byte
/// order. Reads past the end of the buffer return `UnexpectedEof`.
pub struct ByteOrderReader {
    pub byte_order: Endianness,
    pub buffer: Vec<u8>,
    pub pos: usize,
}

impl ByteOrderReader {
    pub fn new(buffer: Vec<u8>, byte_order: Endianness) -> ByteOrderReader {
        ByteOrderReader {
            buffer: buffer,
            byte_order: byte_order,
            pos: 0usize,
        }
    }

    pub fn seek(&mut self, position: usize) {
        self.pos = position;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&[u8], Error> {
        if self.pos + n > self.buffer.len() {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "Attempt to read {} bytes at offset {} of a {} byte buffer.",
                    n,
                    self.pos,
                    self.buffer.len()
                ),
            ));
        }
        let st = self.pos;
        self.pos += n;
        Ok(&self.buffer[st..st + n])
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let le = self.byte_order == Endianness::LittleEndian;
        let buf = self.take(2)?;
        Ok(if le {
            LittleEndian::read_u16(buf)
        } else {
            BigEndian::read_u16(buf)
        })
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let le = self.byte_order == Endianness::LittleEndian;
        let buf = self.take(4)?;
        Ok(if le {
            LittleEndian::read_u32(buf)
        } else {
            BigEndian::read_u32(buf)
        })
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        let le = self.byte_order == Endianness::LittleEndian;
        let buf = self.take(4)?;
        Ok(if le {
            LittleEndian::read_i32(buf)
        } else {
            BigEndian::read_i32(buf)
        })
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        let le = self.byte_order == Endianness::LittleEndian;
        let buf = self.take(8)?;
        Ok(if le {
            LittleEndian::read_f64(buf)
        } else {
            BigEndian::read_f64(buf)
        })
    }

    pub fn read_utf8(&mut self, num_bytes: usize) -> Result<String, Error> {
        let buf = self.take(num_bytes)?;
        Ok(String::from_utf8_lossy(buf).into_owned())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

impl Default for Endianness {
    fn default() -> Endianness {
        Endianness::LittleEndian
    }
}

#[cfg(test)]
mod test {
    use super::{ByteOrderReader, Endianness};

    #[test]
    fn test_switching_byte_order() {
        let buffer = vec![0x00, 0x00, 0x27, 0x0A, 0xE8, 0x03, 0x00, 0x00];
        let mut bor = ByteOrderReader::new(buffer, Endianness::BigEndian);
        assert_eq!(bor.read_i32().unwrap(), 9994);
        bor.byte_order = Endianness::LittleEndian;
        assert_eq!(bor.read_i32().unwrap(), 1000);
        assert_eq!(bor.remaining(), 0);
    }

    #[test]
    fn test_read_past_end() {
        let mut bor = ByteOrderReader::new(vec![1, 2, 3], Endianness::LittleEndian);
        assert!(bor.read_i32().is_err());
        // a failed read leaves the position untouched
        assert_eq!(bor.pos, 0);
        assert_eq!(bor.read_u8().unwrap(), 1);
    }
}
