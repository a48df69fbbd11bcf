//! Classfile signature encoding and decoding.

use thiserror::Error;

use super::TypePool;
use crate::TypeId;

/// A signature that does not describe a type.
///
/// Signatures are produced by this crate or by the binary reader, so a
/// decoding failure means an earlier phase broke its contract.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("empty type signature")]
    Empty,
    #[error("type signature `{signature}` ends early")]
    UnexpectedEnd { signature: String },
    #[error("invalid character `{found}` at offset {offset} in type signature `{signature}`")]
    InvalidCharacter {
        signature: String,
        found: char,
        offset: usize,
    },
    #[error("trailing characters after offset {offset} in type signature `{signature}`")]
    TrailingCharacters { signature: String, offset: usize },
}

/// Signature of the class named `text`: `a.b.C` encodes as `La/b/C;`.
pub(super) fn class_signature(text: &str) -> String {
    format!("L{};", text.replace('.', "/"))
}

struct Decoder<'a> {
    pool: &'a TypePool,
    signature: &'a str,
    offset: usize,
}

impl Decoder<'_> {
    fn end(&self) -> SignatureError {
        SignatureError::UnexpectedEnd {
            signature: self.signature.to_owned(),
        }
    }

    fn invalid(&self, found: char, offset: usize) -> SignatureError {
        SignatureError::InvalidCharacter {
            signature: self.signature.to_owned(),
            found,
            offset,
        }
    }

    fn next_char(&mut self) -> Result<char, SignatureError> {
        let c = self.signature[self.offset..]
            .chars()
            .next()
            .ok_or_else(|| self.end())?;
        self.offset += c.len_utf8();
        Ok(c)
    }

    /// One field type: a primitive, an array or a class.
    fn field(&mut self) -> Result<TypeId, SignatureError> {
        let start = self.offset;
        match self.next_char()? {
            'Z' => Ok(TypeId::BOOLEAN),
            'B' => Ok(TypeId::BYTE),
            'C' => Ok(TypeId::CHAR),
            'S' => Ok(TypeId::SHORT),
            'I' => Ok(TypeId::INT),
            'J' => Ok(TypeId::LONG),
            'F' => Ok(TypeId::FLOAT),
            'D' => Ok(TypeId::DOUBLE),
            '[' => {
                let element = self.field()?;
                Ok(self.pool.array(element))
            }
            'L' => {
                let rest = &self.signature[self.offset..];
                let len = rest.find(';').ok_or_else(|| self.end())?;
                if len == 0 {
                    return Err(self.invalid(';', self.offset));
                }
                let name = rest[..len].replace('/', ".");
                self.offset += len + 1;
                let symbol = self.pool.symbols.intern(&name);
                Ok(self.pool.class_type(symbol))
            }
            other => Err(self.invalid(other, start)),
        }
    }

    /// A field type or `V`; void only appears as a return type.
    fn return_type(&mut self) -> Result<TypeId, SignatureError> {
        if self.signature[self.offset..].starts_with('V') {
            self.offset += 1;
            return Ok(TypeId::VOID);
        }
        self.field()
    }

    fn method(&mut self) -> Result<TypeId, SignatureError> {
        let mut args = Vec::new();
        loop {
            if self.signature[self.offset..].starts_with(')') {
                self.offset += 1;
                break;
            }
            if self.offset >= self.signature.len() {
                return Err(self.end());
            }
            args.push(self.field()?);
        }
        let ret = self.return_type()?;
        Ok(self.pool.method(ret, &args))
    }
}

impl TypePool {
    /// Decode a classfile signature, interning every type it names.
    pub fn from_signature(&self, signature: &str) -> Result<TypeId, SignatureError> {
        if signature.is_empty() {
            return Err(SignatureError::Empty);
        }
        if let Some(&id) = self.inner.read().by_signature.get(signature) {
            return Ok(id);
        }

        let mut decoder = Decoder {
            pool: self,
            signature,
            offset: 0,
        };
        let ty = if signature.starts_with('(') {
            decoder.offset = 1;
            decoder.method()?
        } else {
            decoder.return_type()?
        };
        if decoder.offset != signature.len() {
            return Err(SignatureError::TrailingCharacters {
                signature: signature.to_owned(),
                offset: decoder.offset,
            });
        }
        Ok(ty)
    }
}
