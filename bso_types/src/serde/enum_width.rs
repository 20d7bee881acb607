use anyhow::{anyhow, Result};
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::any;
use std::io::{self, Read, Write};
use std::mem;

#[derive(From, Deref, Clone, Copy)]
pub struct EnumWidthInt(u8);
impl From<EnumWidth> for EnumWidthInt {
    fn from(width: EnumWidth) -> Self {
        let int = width.to_u8().unwrap();
        Self(int)
    }
}
impl EnumWidthInt {
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<u8>()];
        r.read_exact(&mut buf)?;
        let int = u8::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// The integer width backing a serialized enum value.
///
/// The variant order doubles as the encode-time probe order: the first
/// width the value fits is the one written. Stable on-wire numbering, same
/// rationale as [`crate::serde::ValueType`].
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum EnumWidth {
    I8 = 0,
    U8 = 1,
    I16 = 2,
    U16 = 3,
    I32 = 4,
    U32 = 5,
    I64 = 6,
    U64 = 7,
}
impl TryFrom<EnumWidthInt> for EnumWidth {
    type Error = anyhow::Error;
    fn try_from(int: EnumWidthInt) -> Result<Self> {
        EnumWidth::from_u8(int.0).ok_or(anyhow!(
            "Unknown {} {}",
            any::type_name::<EnumWidthInt>(),
            int.0
        ))
    }
}

const PROBE_ORDER: [EnumWidth; 8] = [
    EnumWidth::I8,
    EnumWidth::U8,
    EnumWidth::I16,
    EnumWidth::U16,
    EnumWidth::I32,
    EnumWidth::U32,
    EnumWidth::I64,
    EnumWidth::U64,
];

impl EnumWidth {
    /// The narrowest width `v` fits, in the fixed probe order.
    /// `None` when no supported width holds the value.
    pub fn fitting(v: i128) -> Option<EnumWidth> {
        PROBE_ORDER.into_iter().find(|width| width.fits(v))
    }

    pub fn fits(&self, v: i128) -> bool {
        match self {
            Self::I8 => i128::from(i8::MIN) <= v && v <= i128::from(i8::MAX),
            Self::U8 => 0 <= v && v <= i128::from(u8::MAX),
            Self::I16 => i128::from(i16::MIN) <= v && v <= i128::from(i16::MAX),
            Self::U16 => 0 <= v && v <= i128::from(u16::MAX),
            Self::I32 => i128::from(i32::MIN) <= v && v <= i128::from(i32::MAX),
            Self::U32 => 0 <= v && v <= i128::from(u32::MAX),
            Self::I64 => i128::from(i64::MIN) <= v && v <= i128::from(i64::MAX),
            Self::U64 => 0 <= v && v <= i128::from(u64::MAX),
        }
    }

    /// Writes `v` in this width. The caller must have checked [`Self::fits`].
    pub fn ser_value(&self, w: &mut impl Write, v: i128) -> Result<(), io::Error> {
        match self {
            Self::I8 => w.write_all(&(v as i8).to_le_bytes()),
            Self::U8 => w.write_all(&(v as u8).to_le_bytes()),
            Self::I16 => w.write_all(&(v as i16).to_le_bytes()),
            Self::U16 => w.write_all(&(v as u16).to_le_bytes()),
            Self::I32 => w.write_all(&(v as i32).to_le_bytes()),
            Self::U32 => w.write_all(&(v as u32).to_le_bytes()),
            Self::I64 => w.write_all(&(v as i64).to_le_bytes()),
            Self::U64 => w.write_all(&(v as u64).to_le_bytes()),
        }
    }

    pub fn deser_value(&self, r: &mut impl Read) -> Result<i128, io::Error> {
        fn read_arr<const LEN: usize>(r: &mut impl Read) -> Result<[u8; LEN], io::Error> {
            let mut buf = [0u8; LEN];
            r.read_exact(&mut buf)?;
            Ok(buf)
        }
        let v = match self {
            Self::I8 => i128::from(i8::from_le_bytes(read_arr(r)?)),
            Self::U8 => i128::from(u8::from_le_bytes(read_arr(r)?)),
            Self::I16 => i128::from(i16::from_le_bytes(read_arr(r)?)),
            Self::U16 => i128::from(u16::from_le_bytes(read_arr(r)?)),
            Self::I32 => i128::from(i32::from_le_bytes(read_arr(r)?)),
            Self::U32 => i128::from(u32::from_le_bytes(read_arr(r)?)),
            Self::I64 => i128::from(i64::from_le_bytes(read_arr(r)?)),
            Self::U64 => i128::from(u64::from_le_bytes(read_arr(r)?)),
        };
        Ok(v)
    }
}
