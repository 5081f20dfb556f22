//! Calibration record codec.
//!
//! The record is a MessagePack array:
//! `[u16:gain_pos, u16:gain_neg, u16:zero, u16:min, u16:max, u8:update_period]`
//!
//! ```text
//! offset 0:      array-of-6 header (0x96)
//! offset 1-3:    0xcd + gain_pos (be)
//! offset 4-6:    0xcd + gain_neg (be)
//! offset 7-9:    0xcd + zero (be)
//! offset 10-12:  0xcd + min (be)
//! offset 13-15:  0xcd + max (be)
//! offset 16-17:  0xcc + update_period
//! ```
//!
//! Only the subset needed for the record is implemented. Field types are
//! checked strictly: a u16 field must carry the u16 tag, even if the value
//! would fit in a smaller encoding.

use crate::calib::{Calibration, CALIBRATION_ARRAY_LEN, CALIBRATION_BUFFER_SIZE};
use crate::err::{Error, Marker};

/// Read cursor over a byte slice.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unread part of the input.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(n).ok_or(Error::UnexpectedEof)?;
        let bytes = self.buf.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn read_be_u16(&mut self) -> Result<u16, Error> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_be_u32(&mut self) -> Result<u32, Error> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read an array header of any width and return the element count.
    pub fn read_array(&mut self) -> Result<u32, Error> {
        let tag = self.read_byte()?;
        match Marker::from_byte(tag) {
            Some(Marker::FixArray) => Ok((tag & 0x0f) as u32),
            Some(Marker::Array16) => Ok(self.read_be_u16()? as u32),
            Some(Marker::Array32) => self.read_be_u32(),
            _ => Err(Error::TypeTag {
                expected: Marker::FixArray,
                found: tag,
            }),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.expect(Marker::U16)?;
        self.read_be_u16()
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.expect(Marker::U8)?;
        self.read_byte()
    }

    fn expect(&mut self, marker: Marker) -> Result<(), Error> {
        let tag = self.read_byte()?;
        if tag != marker.to_byte() {
            return Err(Error::TypeTag {
                expected: marker,
                found: tag,
            });
        }
        Ok(())
    }
}

/// Write cursor over a mutable byte slice.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Room left in the destination.
    pub fn capacity(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consume the writer, handing back the unwritten tail.
    pub fn into_remaining(self) -> &'a mut [u8] {
        let Writer { buf, pos } = self;
        &mut buf[pos..]
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let len = self.buf.len();
        let end = self.pos + bytes.len();
        let dst = self
            .buf
            .get_mut(self.pos..end)
            .ok_or(Error::BufferTooSmall(len))?;
        dst.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Write an array header using the narrowest form that fits `len`.
    pub fn write_array(&mut self, len: u32) -> Result<(), Error> {
        if len <= 0x0f {
            self.put(&[Marker::FixArray.to_byte() | len as u8])
        } else if let Ok(len) = u16::try_from(len) {
            self.put(&[Marker::Array16.to_byte()])?;
            self.put(&len.to_be_bytes())
        } else {
            self.put(&[Marker::Array32.to_byte()])?;
            self.put(&len.to_be_bytes())
        }
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.put(&[Marker::U16.to_byte()])?;
        self.put(&value.to_be_bytes())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.put(&[Marker::U8.to_byte(), value])
    }
}

/// Decode one calibration record at the reader's position.
///
/// Fails unless the record occupies exactly `CALIBRATION_BUFFER_SIZE` bytes.
pub fn read_calibration(rd: &mut Reader<'_>) -> Result<Calibration, Error> {
    let start = rd.position();

    let len = rd.read_array()?;
    if len != CALIBRATION_ARRAY_LEN {
        return Err(Error::ArrayLen(len));
    }
    let calib = Calibration {
        gain_pos: rd.read_u16()?,
        gain_neg: rd.read_u16()?,
        zero: rd.read_u16()?,
        min: rd.read_u16()?,
        max: rd.read_u16()?,
        update_period: rd.read_u8()?,
    };

    let consumed = rd.position() - start;
    if consumed != CALIBRATION_BUFFER_SIZE {
        return Err(Error::Length(consumed));
    }
    Ok(calib)
}

/// Encode one calibration record at the writer's position.
pub fn write_calibration(wr: &mut Writer<'_>, calib: &Calibration) -> Result<(), Error> {
    if wr.capacity() < CALIBRATION_BUFFER_SIZE {
        return Err(Error::BufferTooSmall(wr.capacity()));
    }
    wr.write_array(CALIBRATION_ARRAY_LEN)?;
    wr.write_u16(calib.gain_pos)?;
    wr.write_u16(calib.gain_neg)?;
    wr.write_u16(calib.zero)?;
    wr.write_u16(calib.min)?;
    wr.write_u16(calib.max)?;
    wr.write_u8(calib.update_period)?;
    Ok(())
}

/// Load a calibration record from the start of `src` into `calib`.
///
/// Returns the bytes following the record so consecutive records can be read
/// back to back. On error `calib` is left untouched.
pub fn load<'a>(calib: &mut Calibration, src: &'a [u8]) -> Result<&'a [u8], Error> {
    let mut rd = Reader::new(src);
    *calib = read_calibration(&mut rd)?;
    Ok(rd.remaining())
}

/// Save `calib` to the start of `dst`, returning the unwritten tail.
pub fn save<'a>(calib: &Calibration, dst: &'a mut [u8]) -> Result<&'a mut [u8], Error> {
    let mut wr = Writer::new(dst);
    write_calibration(&mut wr, calib)?;
    Ok(wr.into_remaining())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_RECORD: [u8; CALIBRATION_BUFFER_SIZE] = [
        0x96, 0xcd, 0x13, 0x88, 0xcd, 0x13, 0x88, 0xcd, 0x3a, 0x98, 0xcd, 0x23, 0x28, 0xcd, 0x52,
        0x08, 0xcc, 0xc8,
    ];

    #[test]
    fn read_array_forms() {
        assert_eq!(Reader::new(&[0x96]).read_array(), Ok(6));
        assert_eq!(Reader::new(&[0xdc, 0x00, 0x06]).read_array(), Ok(6));
        assert_eq!(
            Reader::new(&[0xdd, 0x00, 0x01, 0x00, 0x00]).read_array(),
            Ok(0x0001_0000)
        );
        assert_eq!(
            Reader::new(&[0xcd]).read_array(),
            Err(Error::TypeTag {
                expected: Marker::FixArray,
                found: 0xcd
            })
        );
    }

    #[test]
    fn write_array_forms() {
        let mut buf = [0u8; 5];
        let mut wr = Writer::new(&mut buf);
        wr.write_array(20).unwrap();
        assert_eq!(wr.position(), 3);
        assert_eq!(&buf[..3], &[0xdc, 0x00, 0x14]);

        let mut wr = Writer::new(&mut buf);
        wr.write_array(0x0001_0000).unwrap();
        assert_eq!(buf, [0xdd, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn u8_is_not_u16() {
        let mut rd = Reader::new(&[0xcc, 0x05]);
        assert_eq!(
            rd.read_u16(),
            Err(Error::TypeTag {
                expected: Marker::U16,
                found: 0xcc
            })
        );
    }

    #[test]
    fn short_u16() {
        let mut rd = Reader::new(&[0xcd, 0x05]);
        assert_eq!(rd.read_u16(), Err(Error::UnexpectedEof));
    }

    #[test]
    fn load_chains_records() {
        let custom = Calibration {
            gain_pos: 1000,
            gain_neg: 1000,
            zero: 13000,
            min: 10000,
            max: 20000,
            update_period: 100,
        };
        let mut buf = [0u8; 2 * CALIBRATION_BUFFER_SIZE];
        let rest = save(&Calibration::default(), &mut buf).unwrap();
        let rest = save(&custom, rest).unwrap();
        assert!(rest.is_empty());

        let mut a = custom;
        let mut b = Calibration::default();
        let rest = load(&mut a, &buf).unwrap();
        assert_eq!(rest.len(), CALIBRATION_BUFFER_SIZE);
        let rest = load(&mut b, rest).unwrap();
        assert!(rest.is_empty());
        assert_eq!(a, Calibration::default());
        assert_eq!(b, custom);
    }

    #[test]
    fn array16_header_is_too_long() {
        // same content, but the header takes 3 bytes
        let mut buf = [0u8; CALIBRATION_BUFFER_SIZE + 2];
        buf[..3].copy_from_slice(&[0xdc, 0x00, 0x06]);
        buf[3..].copy_from_slice(&DEFAULT_RECORD[1..]);
        let mut c = Calibration::default();
        assert_eq!(load(&mut c, &buf), Err(Error::Length(20)));
    }

    #[test]
    fn failed_load_keeps_calibration() {
        let mut bad = DEFAULT_RECORD;
        bad[16] = 0xcd;
        let custom = Calibration {
            gain_pos: 1,
            gain_neg: 2,
            zero: 3,
            min: 4,
            max: 5,
            update_period: 6,
        };
        let mut c = custom;
        assert!(load(&mut c, &bad).is_err());
        assert_eq!(c, custom);
    }

    #[test]
    fn save_short_buffer() {
        let mut buf = [0u8; CALIBRATION_BUFFER_SIZE - 1];
        assert_eq!(
            save(&Calibration::default(), &mut buf).map(|r| r.len()),
            Err(Error::BufferTooSmall(CALIBRATION_BUFFER_SIZE - 1))
        );
        // nothing written
        assert!(buf.iter().all(|&b| b == 0));
    }
}
