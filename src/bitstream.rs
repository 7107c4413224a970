//! Bit-level stream reader and writer.
//!
//! Fast Infoset packs structural tags and the leading bits of integers and
//! lengths into the same octet (X.891 7, Annex C). Bits within each octet are
//! numbered 1 (most significant, written/read first) to 8.

use std::io::Write;

use crate::{Error, Result};

/// Writes individual bits into a growable byte buffer, MSB first.
///
/// Intern wird ein u64-Akkumulator verwendet: Bits werden zuerst in `accum`
/// gesammelt und erst bei >= 8 akkumulierten Bits als volle Bytes in `buf`
/// geflusht.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    /// Akkumulator: enthält die nächsten `accum_bits` Bits (MSB = ältestes Bit).
    accum: u64,
    /// Anzahl gültiger Bits im Akkumulator (0..7 nach Flush).
    accum_bits: u8,
}

impl BitWriter {
    /// Creates a new empty `BitWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flusht volle Bytes aus dem Akkumulator in den Buffer.
    #[inline(always)]
    fn flush_to_buf(&mut self) {
        while self.accum_bits >= 8 {
            self.accum_bits -= 8;
            self.buf.push((self.accum >> self.accum_bits) as u8);
        }
        if self.accum_bits > 0 {
            self.accum &= (1u64 << self.accum_bits) - 1;
        } else {
            self.accum = 0;
        }
    }

    /// Writes a single bit. `true` = 1, `false` = 0.
    #[inline(always)]
    pub fn write_bit(&mut self, val: bool) {
        self.accum = (self.accum << 1) | u64::from(val);
        self.accum_bits += 1;
        if self.accum_bits >= 8 {
            self.flush_to_buf();
        }
    }

    /// Writes the lower `n` bits of `val`, MSB first. `n == 0` is a no-op.
    ///
    /// Fast Infoset never writes more than 40 bits in one piece (Tag-Rest plus
    /// 32-Bit-Länge), daher passt alles in den Akkumulator.
    #[inline]
    pub fn write_bits(&mut self, val: u64, n: u8) {
        debug_assert!(n <= 56, "bit count must be 0..=56, got {n}");
        if n == 0 {
            return;
        }
        self.accum = (self.accum << n) | (val & ((1u64 << n) - 1));
        self.accum_bits += n;
        if self.accum_bits >= 8 {
            self.flush_to_buf();
        }
    }

    /// Pads with zero bits until the current position is byte-aligned.
    /// No-op if already aligned.
    pub fn align_to_byte(&mut self) {
        if self.accum_bits > 0 {
            self.buf.push((self.accum << (8 - self.accum_bits)) as u8);
            self.accum = 0;
            self.accum_bits = 0;
        }
    }

    /// Writes a whole octet. Falls back to `write_bits(8)` when not aligned.
    #[inline(always)]
    pub fn write_octet(&mut self, val: u8) {
        if self.accum_bits == 0 {
            self.buf.push(val);
        } else {
            self.write_bits(u64::from(val), 8);
        }
    }

    /// Schreibt ein Byte-Slice. Bei byte-aligned: direkt `extend_from_slice`.
    pub fn write_octets(&mut self, bytes: &[u8]) {
        if self.accum_bits == 0 {
            self.buf.extend_from_slice(bytes);
        } else {
            for &b in bytes {
                self.write_bits(u64::from(b), 8);
            }
        }
    }

    /// Number of bits already written into the current (partial) octet.
    ///
    /// `0` means aligned; a codec "starting on the third bit" expects `2`.
    #[inline]
    pub fn bits_in_octet(&self) -> u8 {
        self.accum_bits
    }

    /// True when the next bit starts a fresh octet.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.accum_bits == 0
    }

    /// Returns the current bit position (number of bits written so far).
    pub fn bit_position(&self) -> usize {
        self.buf.len() * 8 + self.accum_bits as usize
    }

    /// Gibt die Anzahl vollständiger Bytes im Buffer zurück.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty() && self.accum_bits == 0
    }

    /// Schreibt alle vollständigen Bytes in den Writer und entfernt sie aus dem Buffer.
    /// Der Akkumulator (partielle Bits) bleibt erhalten.
    pub fn drain_to(&mut self, writer: &mut impl Write) -> std::io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.buf)?;
        self.buf.clear();
        Ok(())
    }

    /// Verwirft alles Geschriebene (Encoder-Reset zwischen Dokumenten).
    pub fn clear(&mut self) {
        self.buf.clear();
        self.accum = 0;
        self.accum_bits = 0;
    }

    /// Finalises the writer, padding the last byte with zero bits, and returns the buffer.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.buf
    }

    /// Wie `into_vec`, lässt den Writer aber leer und wiederverwendbar zurück.
    pub fn take_vec(&mut self) -> Vec<u8> {
        self.align_to_byte();
        std::mem::take(&mut self.buf)
    }
}

/// Reads individual bits from a byte slice, MSB first.
///
/// Position wird in Bits geführt; Fast Infoset liest überwiegend ganze
/// Oktette, daher genügt ein einfacher Index statt Akkumulator.
#[derive(Debug, Clone, Copy)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Nächstes ungelesenes Bit (absolut).
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Reads a single bit. Returns `true` for 1, `false` for 0.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads `n` bits and returns them as a `u64`, MSB first.
    /// When `n` is 0 this is a no-op returning 0.
    pub fn read_bits(&mut self, n: u8) -> Result<u64> {
        debug_assert!(n <= 56, "bit count must be 0..=56, got {n}");
        // Upfront-Check: Position bleibt bei Fehler unverändert
        if usize::from(n) > self.remaining_bits() {
            return Err(Error::PrematureEndOfStream);
        }
        let mut val = 0u64;
        let mut left = n;
        while left > 0 {
            let byte = self.data[self.pos / 8];
            let available = 8 - (self.pos % 8) as u8;
            let take = available.min(left);
            let bits = (u16::from(byte) >> (available - take)) & ((1u16 << take) - 1);
            val = (val << take) | u64::from(bits);
            self.pos += usize::from(take);
            left -= take;
        }
        Ok(val)
    }

    /// Reads one octet (aligned fast path, otherwise eight bits).
    pub fn read_octet(&mut self) -> Result<u8> {
        if self.is_aligned() {
            let byte = *self.data.get(self.pos / 8).ok_or(Error::PrematureEndOfStream)?;
            self.pos += 8;
            Ok(byte)
        } else {
            Ok(self.read_bits(8)? as u8)
        }
    }

    /// Returns the next `n` octets and advances past them.
    ///
    /// Requires an aligned position; mitten im Oktett beginnende Strings gibt es
    /// im Format nicht.
    pub fn read_octets(&mut self, n: usize) -> Result<&'a [u8]> {
        if !self.is_aligned() {
            return Err(Error::ordering_violation("aligned octet string", "unaligned position"));
        }
        let start = self.pos / 8;
        let end = start.checked_add(n).ok_or(Error::PrematureEndOfStream)?;
        let slice = self.data.get(start..end).ok_or(Error::PrematureEndOfStream)?;
        self.pos = end * 8;
        Ok(slice)
    }

    /// Peeks at the next octet without consuming it (aligned positions only).
    pub fn peek_octet(&self) -> Option<u8> {
        if self.is_aligned() {
            self.data.get(self.pos / 8).copied()
        } else {
            None
        }
    }

    /// Discards unread bits up to the next byte boundary. No-op if already aligned.
    pub fn align_to_byte(&mut self) {
        self.pos = self.pos.div_ceil(8) * 8;
    }

    /// Number of bits already consumed from the current octet.
    pub fn bits_in_octet(&self) -> u8 {
        (self.pos % 8) as u8
    }

    /// True when the next bit starts a fresh octet.
    pub fn is_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    /// Returns the current bit position.
    pub fn bit_position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bits remaining to be read.
    pub fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// True when every bit has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining_bits() == 0
    }
}
