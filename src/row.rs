use binary_serde::{BinarySerde, Endianness};

use crate::error::{DbError, Result};
use crate::ROW_SIZE;

pub const USER_ID_SIZE: usize = 36;
pub const NAME_SIZE: usize = 255;
pub const EMAIL_SIZE: usize = 255;

/// Column names of `user_data`, in table order.
pub const COLUMNS: [&str; 4] = ["user_id", "name", "email", "age"];

pub type UserId = [u8; USER_ID_SIZE];

pub type Name = [u8; NAME_SIZE];

pub type Email = [u8; EMAIL_SIZE];

/// One record of the `user_data` table, stored as fixed-width fields.
#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq, BinarySerde)]
pub struct Row {
    user_id: UserId,
    name: Name,
    email: Email,
    age: u32,
}

/// A single column value as seen by callers that address rows by column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Number(i64),
}

impl Row {
    pub fn new(user_id: &str, name: &str, email: &str, age: u32) -> Result<Self> {
        Ok(Self {
            user_id: to_u8_array("user_id", user_id)?,
            name: to_u8_array("name", name)?,
            email: to_u8_array("email", email)?,
            age,
        })
    }

    pub fn user_id(&self) -> &str {
        text(&self.user_id)
    }

    pub fn name(&self) -> &str {
        text(&self.name)
    }

    pub fn email(&self) -> &str {
        text(&self.email)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn value(&self, column: &str) -> Option<Value> {
        match column {
            "user_id" => Some(Value::Text(self.user_id().to_string())),
            "name" => Some(Value::Text(self.name().to_string())),
            "email" => Some(Value::Text(self.email().to_string())),
            "age" => Some(Value::Number(i64::from(self.age))),
            _ => None,
        }
    }

    pub fn encode(&self) -> [u8; ROW_SIZE] {
        let mut buf = [0u8; ROW_SIZE];
        self.binary_serialize(&mut buf, Endianness::Big);
        buf
    }

    /// Decodes a stored row. `row_num` is only used to label the error.
    pub fn decode(buf: &[u8], row_num: usize) -> Result<Self> {
        if buf.len() != ROW_SIZE {
            return Err(DbError::Decode { row_num });
        }
        let row = Self::binary_deserialize(buf, Endianness::Big)
            .map_err(|_| DbError::Decode { row_num })?;
        let fields: [&[u8]; 3] = [&row.user_id, &row.name, &row.email];
        if fields
            .iter()
            .any(|f| std::str::from_utf8(trim_nul(f)).is_err())
        {
            return Err(DbError::Decode { row_num });
        }
        Ok(row)
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.user_id(),
            self.name(),
            self.email(),
            self.age
        )
    }
}

pub fn to_u8_array<const N: usize>(column: &'static str, s: &str) -> Result<[u8; N]> {
    if s.len() > N {
        return Err(DbError::StringTooLong { column, max: N });
    }
    // fields are NUL padded, an inner NUL would cut the value short on read
    if s.contains('\0') {
        return Err(DbError::NulByte { column });
    }
    let mut a = [0u8; N];
    a[..s.len()].copy_from_slice(s.as_bytes());
    Ok(a)
}

fn trim_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

fn text(bytes: &[u8]) -> &str {
    std::str::from_utf8(trim_nul(bytes)).unwrap_or_default()
}
