use anyhow::Result;
use derive_more::{Deref, From};
use std::io::{self, Read};
use std::mem;

/// Byte length of a string body.
#[derive(From, Deref, Clone, Copy)]
pub struct StrLen(u32);
impl StrLen {
    pub fn from_body(buf: &[u8]) -> Result<Self> {
        let int = u32::try_from(buf.len())?;
        Ok(Self(int))
    }
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<u32>()];
        r.read_exact(&mut buf)?;
        let int = u32::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// Element count of an array, list, or dict.
#[derive(From, Deref, Clone, Copy)]
pub struct ElemCount(i32);
impl ElemCount {
    pub fn from_len(len: usize) -> Result<Self> {
        let int = i32::try_from(len)?;
        Ok(Self(int))
    }
    pub fn to_usize(&self) -> Result<usize> {
        let len = usize::try_from(self.0)?;
        Ok(len)
    }
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<i32>()];
        r.read_exact(&mut buf)?;
        let int = i32::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// Byte length of a whole object block, counting everything after itself.
/// Readers use it to skip a block they cannot decode.
#[derive(From, Deref, Clone, Copy)]
pub struct BlockLen(i32);
impl BlockLen {
    pub fn from_sections(len: usize) -> Result<Self> {
        let int = i32::try_from(len)?;
        Ok(Self(int))
    }
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<i32>()];
        r.read_exact(&mut buf)?;
        let int = i32::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// Byte length of one length-delimited section inside an object block
/// (base-class bytes, field index, field blob).
#[derive(From, Deref, Clone, Copy)]
pub struct SectionLen(i32);
impl SectionLen {
    pub fn from_section(buf: &[u8]) -> Result<Self> {
        let int = i32::try_from(buf.len())?;
        Ok(Self(int))
    }
    pub fn to_usize(&self) -> Result<usize> {
        let len = usize::try_from(self.0)?;
        Ok(len)
    }
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<i32>()];
        r.read_exact(&mut buf)?;
        let int = i32::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// Count of field records in one object block.
#[derive(From, Deref, Clone, Copy)]
pub struct FieldCount(u16);
impl FieldCount {
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<u16>()];
        r.read_exact(&mut buf)?;
        let int = u16::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// Byte offset of one field record inside an object block's field blob.
#[derive(From, Deref, Clone, Copy)]
pub struct BlobOffset(i32);
impl BlobOffset {
    pub fn from_position(pos: usize) -> Result<Self> {
        let int = i32::try_from(pos)?;
        Ok(Self(int))
    }
    pub fn to_u64(&self) -> Result<u64> {
        let pos = u64::try_from(self.0)?;
        Ok(pos)
    }
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<i32>()];
        r.read_exact(&mut buf)?;
        let int = i32::from_le_bytes(buf);
        Ok(Self(int))
    }
}
