//! The accumulating encoder.

use byteordered::{ByteOrdered, Endianness};
use dcmio_core::error::{Error, IoSnafu, Result};
use snafu::IntoError;

/// An appendable encoder that serializes into a growable byte buffer.
///
/// Mirrors the [`Decoder`](crate::decode::Decoder): the active transfer
/// syntax sits on an explicit stack and the first recorded error is sticky.
/// Element writers serialize payloads into a nested `Encoder` first so that
/// headers can carry the exact byte count.
#[derive(Debug)]
pub struct Encoder {
    buffer: Vec<u8>,
    endianness: Endianness,
    implicit_vr: bool,
    error: Option<Error>,
    syntax_stack: Vec<(Endianness, bool)>,
}

impl Encoder {
    /// Create an empty encoder with the given transfer syntax.
    pub fn new(endianness: Endianness, implicit_vr: bool) -> Self {
        Encoder {
            buffer: Vec::new(),
            endianness,
            implicit_vr,
            error: None,
            syntax_stack: Vec::new(),
        }
    }

    /// The active transfer syntax as `(byte order, implicit VR)`.
    pub fn transfer_syntax(&self) -> (Endianness, bool) {
        (self.endianness, self.implicit_vr)
    }

    /// Temporarily switch the transfer syntax.
    /// [`pop_transfer_syntax`](Encoder::pop_transfer_syntax) restores the
    /// previous one.
    pub fn push_transfer_syntax(&mut self, endianness: Endianness, implicit_vr: bool) {
        self.syntax_stack.push((self.endianness, self.implicit_vr));
        self.endianness = endianness;
        self.implicit_vr = implicit_vr;
    }

    /// Restore the transfer syntax active before the last push.
    pub fn pop_transfer_syntax(&mut self) {
        let (endianness, implicit_vr) = self
            .syntax_stack
            .pop()
            .expect("transfer syntax stack must not be empty");
        self.endianness = endianness;
        self.implicit_vr = implicit_vr;
    }

    /// Record an error, unless one was recorded before (the first wins).
    pub fn set_error(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// The first error recorded so far, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Whether an error has been recorded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The bytes serialized so far.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// The number of bytes serialized so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been serialized yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Conclude encoding, returning the serialized payload or the first
    /// recorded error.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        debug_assert!(self.syntax_stack.is_empty(), "unbalanced syntax stack");
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(self.buffer),
        }
    }

    fn record_io(&mut self, error: std::io::Error) {
        self.set_error(IoSnafu.into_error(error));
    }

    /// Append one byte.
    pub fn write_u8(&mut self, value: u8) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = ByteOrdered::runtime(&mut self.buffer, self.endianness).write_u8(value) {
            self.record_io(e);
        }
    }

    /// Append an unsigned 16-bit integer in the active byte order.
    pub fn write_u16(&mut self, value: u16) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = ByteOrdered::runtime(&mut self.buffer, self.endianness).write_u16(value) {
            self.record_io(e);
        }
    }

    /// Append an unsigned 32-bit integer in the active byte order.
    pub fn write_u32(&mut self, value: u32) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = ByteOrdered::runtime(&mut self.buffer, self.endianness).write_u32(value) {
            self.record_io(e);
        }
    }

    /// Append a signed 16-bit integer in the active byte order.
    pub fn write_i16(&mut self, value: i16) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = ByteOrdered::runtime(&mut self.buffer, self.endianness).write_i16(value) {
            self.record_io(e);
        }
    }

    /// Append a signed 32-bit integer in the active byte order.
    pub fn write_i32(&mut self, value: i32) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = ByteOrdered::runtime(&mut self.buffer, self.endianness).write_i32(value) {
            self.record_io(e);
        }
    }

    /// Append a 32-bit float in the active byte order.
    pub fn write_f32(&mut self, value: f32) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = ByteOrdered::runtime(&mut self.buffer, self.endianness).write_f32(value) {
            self.record_io(e);
        }
    }

    /// Append a 64-bit float in the active byte order.
    pub fn write_f64(&mut self, value: f64) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = ByteOrdered::runtime(&mut self.buffer, self.endianness).write_f64(value) {
            self.record_io(e);
        }
    }

    /// Append raw bytes verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        self.buffer.extend_from_slice(bytes);
    }

    /// Append the UTF-8 bytes of a string verbatim.
    pub fn write_str(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    /// Append `length` zero bytes.
    pub fn write_zeros(&mut self, length: usize) {
        if self.error.is_some() {
            return;
        }
        self.buffer.resize(self.buffer.len() + length, 0);
    }
}
