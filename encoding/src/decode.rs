//! The bounded streaming decoder.

use crate::text::{CodingSystem, CodingSystemKind};
use byteordered::{ByteOrdered, Endianness};
use dcmio_core::error::{Error, IoSnafu, NotEnoughDataSnafu, Result, TrailingDataSnafu};
use snafu::IntoError;
use std::io::Read;

/// A length-bounded streaming decoder over a readable byte source.
///
/// The decoder tracks the cumulative read position against a stack of nested
/// byte limits, carries the active transfer syntax (byte order plus
/// implicit/explicit VR discipline) on a second stack, and keeps the first
/// error it encounters in a sticky slot. After an error is recorded every
/// read returns a zero value without touching the source, so reading code
/// can run straight-line and check the error once per logical unit;
/// [`finish`](Decoder::finish) also fails when data remains unconsumed
/// within the outermost limit.
///
/// The text decoding of string reads honors the installed
/// [`CodingSystem`], which may change mid-stream when a
/// SpecificCharacterSet element is parsed.
#[derive(Debug)]
pub struct Decoder<R> {
    source: R,
    endianness: Endianness,
    implicit_vr: bool,
    /// Absolute upper bound on `position`.
    limit: u64,
    /// Cumulative number of bytes read.
    position: u64,
    coding_system: CodingSystem,
    error: Option<Error>,
    syntax_stack: Vec<(Endianness, bool)>,
    limit_stack: Vec<u64>,
}

impl<'a> Decoder<&'a [u8]> {
    /// Create a decoder reading an in-memory byte slice in full.
    pub fn from_bytes(data: &'a [u8], endianness: Endianness, implicit_vr: bool) -> Self {
        Decoder::new(data, data.len() as u64, endianness, implicit_vr)
    }
}

impl<R: Read> Decoder<R> {
    /// Create a decoder that reads up to `limit` bytes from `source`.
    ///
    /// The limit must accurately bound the data: `finish` reports an error
    /// when bytes remain below it.
    pub fn new(source: R, limit: u64, endianness: Endianness, implicit_vr: bool) -> Self {
        Decoder {
            source,
            endianness,
            implicit_vr,
            limit,
            position: 0,
            coding_system: CodingSystem::default(),
            error: None,
            syntax_stack: Vec::new(),
            limit_stack: Vec::new(),
        }
    }

    /// The cumulative number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The number of bytes still available below the active limit.
    pub fn remaining(&self) -> u64 {
        self.limit - self.position
    }

    /// The active transfer syntax as `(byte order, implicit VR)`.
    pub fn transfer_syntax(&self) -> (Endianness, bool) {
        (self.endianness, self.implicit_vr)
    }

    /// Temporarily switch the transfer syntax.
    /// [`pop_transfer_syntax`](Decoder::pop_transfer_syntax) restores the
    /// previous one.
    pub fn push_transfer_syntax(&mut self, endianness: Endianness, implicit_vr: bool) {
        self.syntax_stack.push((self.endianness, self.implicit_vr));
        self.endianness = endianness;
        self.implicit_vr = implicit_vr;
    }

    /// Restore the transfer syntax active before the last push.
    ///
    /// Mis-nested push/pop pairs are a programming error.
    pub fn pop_transfer_syntax(&mut self) {
        let (endianness, implicit_vr) = self
            .syntax_stack
            .pop()
            .expect("transfer syntax stack must not be empty");
        self.endianness = endianness;
        self.implicit_vr = implicit_vr;
    }

    /// Install a nested byte limit `n` bytes past the current position.
    /// The new bound must lie within the active one; otherwise the error is
    /// recorded and the limit collapses to the current position.
    pub fn push_limit(&mut self, n: u64) {
        let new_limit = self.position + n;
        let clamped = if new_limit > self.limit {
            self.set_error(
                NotEnoughDataSnafu {
                    requested: n,
                    remaining: self.remaining(),
                }
                .build(),
            );
            self.position
        } else {
            new_limit
        };
        self.limit_stack.push(self.limit);
        self.limit = clamped;
    }

    /// Restore the limit active before the last [`push_limit`]
    /// (Decoder::push_limit).
    pub fn pop_limit(&mut self) {
        self.limit = self
            .limit_stack
            .pop()
            .expect("limit stack must not be empty");
    }

    /// Replace the character repertoire used by string reads.
    pub fn set_coding_system(&mut self, coding_system: CodingSystem) {
        self.coding_system = coding_system;
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

    /// Remove and return the recorded error, clearing the sticky slot.
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// Conclude decoding: returns the first recorded error, or an error if
    /// bytes remain unconsumed within the outermost limit.
    pub fn finish(mut self) -> Result<()> {
        debug_assert!(self.limit_stack.is_empty(), "unbalanced limit stack");
        debug_assert!(self.syntax_stack.is_empty(), "unbalanced syntax stack");
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        if self.remaining() != 0 {
            return TrailingDataSnafu {
                remaining: self.remaining(),
            }
            .fail();
        }
        Ok(())
    }

    fn admit(&mut self, n: u64) -> bool {
        if self.error.is_some() {
            return false;
        }
        if self.remaining() < n {
            self.set_error(
                NotEnoughDataSnafu {
                    requested: n,
                    remaining: self.remaining(),
                }
                .build(),
            );
            return false;
        }
        true
    }

    fn record_io(&mut self, error: std::io::Error) {
        self.set_error(IoSnafu.into_error(error));
    }

    /// Read one byte. On failure a zero value is returned and the error is
    /// recorded for [`error`](Decoder::error)/[`finish`](Decoder::finish).
    pub fn read_u8(&mut self) -> u8 {
        if !self.admit(1) {
            return 0;
        }
        match ByteOrdered::runtime(&mut self.source, self.endianness).read_u8() {
            Ok(v) => {
                self.position += 1;
                v
            }
            Err(e) => {
                self.record_io(e);
                0
            }
        }
    }

    /// Read an unsigned 16-bit integer in the active byte order.
    pub fn read_u16(&mut self) -> u16 {
        if !self.admit(2) {
            return 0;
        }
        match ByteOrdered::runtime(&mut self.source, self.endianness).read_u16() {
            Ok(v) => {
                self.position += 2;
                v
            }
            Err(e) => {
                self.record_io(e);
                0
            }
        }
    }

    /// Read an unsigned 32-bit integer in the active byte order.
    pub fn read_u32(&mut self) -> u32 {
        if !self.admit(4) {
            return 0;
        }
        match ByteOrdered::runtime(&mut self.source, self.endianness).read_u32() {
            Ok(v) => {
                self.position += 4;
                v
            }
            Err(e) => {
                self.record_io(e);
                0
            }
        }
    }

    /// Read a signed 16-bit integer in the active byte order.
    pub fn read_i16(&mut self) -> i16 {
        if !self.admit(2) {
            return 0;
        }
        match ByteOrdered::runtime(&mut self.source, self.endianness).read_i16() {
            Ok(v) => {
                self.position += 2;
                v
            }
            Err(e) => {
                self.record_io(e);
                0
            }
        }
    }

    /// Read a signed 32-bit integer in the active byte order.
    pub fn read_i32(&mut self) -> i32 {
        if !self.admit(4) {
            return 0;
        }
        match ByteOrdered::runtime(&mut self.source, self.endianness).read_i32() {
            Ok(v) => {
                self.position += 4;
                v
            }
            Err(e) => {
                self.record_io(e);
                0
            }
        }
    }

    /// Read a 32-bit float in the active byte order.
    pub fn read_f32(&mut self) -> f32 {
        if !self.admit(4) {
            return 0.0;
        }
        match ByteOrdered::runtime(&mut self.source, self.endianness).read_f32() {
            Ok(v) => {
                self.position += 4;
                v
            }
            Err(e) => {
                self.record_io(e);
                0.0
            }
        }
    }

    /// Read a 64-bit float in the active byte order.
    pub fn read_f64(&mut self) -> f64 {
        if !self.admit(8) {
            return 0.0;
        }
        match ByteOrdered::runtime(&mut self.source, self.endianness).read_f64() {
            Ok(v) => {
                self.position += 8;
                v
            }
            Err(e) => {
                self.record_io(e);
                0.0
            }
        }
    }

    /// Read exactly `length` raw bytes.
    /// Returns an empty vector after recording an error on failure.
    pub fn read_bytes(&mut self, length: usize) -> Vec<u8> {
        if !self.admit(length as u64) {
            return Vec::new();
        }
        let mut buffer = vec![0u8; length];
        match self.source.read_exact(&mut buffer) {
            Ok(()) => {
                self.position += length as u64;
                buffer
            }
            Err(e) => {
                self.record_io(e);
                Vec::new()
            }
        }
    }

    /// Discard the next `length` bytes.
    pub fn skip(&mut self, length: u64) {
        if !self.admit(length) {
            return;
        }
        let mut taken = (&mut self.source).take(length);
        match std::io::copy(&mut taken, &mut std::io::sink()) {
            Ok(copied) => {
                self.position += copied;
                if copied != length {
                    self.record_io(std::io::ErrorKind::UnexpectedEof.into());
                }
            }
            Err(e) => self.record_io(e),
        }
    }

    /// Read a string of exactly `length` bytes, decoded with the
    /// ideographic slot of the active coding system.
    pub fn read_str(&mut self, length: usize) -> String {
        self.read_str_with(CodingSystemKind::Ideographic, length)
    }

    /// Read a string of exactly `length` bytes, decoded with the given slot
    /// of the active coding system.
    pub fn read_str_with(&mut self, kind: CodingSystemKind, length: usize) -> String {
        let bytes = self.read_bytes(length);
        if bytes.is_empty() {
            return String::new();
        }
        match self.coding_system.decode(kind, &bytes) {
            Ok(text) => text,
            Err(e) => {
                self.set_error(e);
                String::new()
            }
        }
    }

    /// Read a Person Name payload of exactly `length` bytes.
    ///
    /// The component groups separated by `=` decode with the alphabetic,
    /// ideographic and phonetic slots respectively.
    pub fn read_person_name(&mut self, length: usize) -> String {
        let bytes = self.read_bytes(length);
        if bytes.is_empty() {
            return String::new();
        }
        let slots = [
            CodingSystemKind::Alphabetic,
            CodingSystemKind::Ideographic,
            CodingSystemKind::Phonetic,
        ];
        let mut groups = Vec::new();
        for (i, group) in bytes.split(|&b| b == b'=').take(3).enumerate() {
            match self.coding_system.decode(slots[i], group) {
                Ok(text) => groups.push(text),
                Err(e) => {
                    self.set_error(e);
                    return String::new();
                }
            }
        }
        groups.join("=")
    }
}
