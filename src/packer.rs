//! Radix-91 and radix-93 binary-to-text packing.
//!
//! A [`Packer`] turns arbitrary bytes into printable ASCII that survives
//! inside a JSON string without escaping. Input bits are consumed in windows
//! of 13 or 14 bits; each window is written as two alphabet digits. The
//! 13-bit window is used whenever its value exceeds the packer's threshold,
//! which keeps every 14-bit value below `N * N`.
//!
//! Two configurations are provided:
//!
//! - [`BASE91`]: the classic basE91 alphabet with `"` replaced by `-`
//! - [`BASE93`]: every printable ASCII character except `"` and `\`
//!
//! Decoding skips any byte outside the alphabet, so packed text can be
//! embedded after a prefix or split across lines. Feeding it text that no
//! packer produced yields unspecified bytes, never an error.
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonesc::packer::BASE93;
//!
//! let packed = BASE93.encode(&[91, 82, 112, 207]);
//! assert_eq!(packed, "xy'/z");
//! assert_eq!(BASE93.decode(&packed), vec![91, 82, 112, 207]);
//! ```

const ALPHABET_91: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&()*+,./:;<=>?@[]^_`{|}~-";

const ALPHABET_93: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&'()*+,-./:;<=>?@[]^_`{|}~ ";

const INVALID: u8 = 0xFF;

/// The 91-symbol packer.
pub const BASE91: Packer = Packer::new(ALPHABET_91, 88);

/// The 93-symbol packer.
pub const BASE93: Packer = Packer::new(ALPHABET_93, 456);

/// A radix-N bit packer over a fixed ASCII alphabet.
#[derive(Clone, Copy, Debug)]
pub struct Packer {
    alphabet: &'static [u8],
    threshold: u32,
    decode_table: [u8; 128],
}

impl Packer {
    const fn new(alphabet: &'static [u8], threshold: u32) -> Self {
        let mut decode_table = [INVALID; 128];
        let mut i = 0;
        while i < alphabet.len() {
            decode_table[alphabet[i] as usize] = i as u8;
            i += 1;
        }
        Packer {
            alphabet,
            threshold,
            decode_table,
        }
    }

    /// Returns the number of symbols in the alphabet.
    #[inline]
    #[must_use]
    pub const fn radix(&self) -> usize {
        self.alphabet.len()
    }

    /// Returns the alphabet as ASCII text.
    #[must_use]
    pub fn alphabet(&self) -> &'static str {
        // Both alphabets are ASCII literals
        std::str::from_utf8(self.alphabet).unwrap_or_default()
    }

    /// Packs `data` into a new string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::packer::BASE91;
    ///
    /// assert_eq!(BASE91.encode(&[1]), "BA");
    /// assert_eq!(BASE91.encode(&[]), "");
    /// ```
    #[must_use]
    pub fn encode(&self, data: &[u8]) -> String {
        self.encode_with_prefix(data, "")
    }

    /// Packs `data` after `prefix`, in a single allocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::packer::BASE93;
    ///
    /// assert_eq!(BASE93.encode_with_prefix(&[255], "Bin:"), "Bin:)C");
    /// ```
    #[must_use]
    pub fn encode_with_prefix(&self, data: &[u8], prefix: &str) -> String {
        let radix = self.radix() as u32;
        let mut out = String::with_capacity(prefix.len() + (data.len() * 16 + 12) / 13);
        out.push_str(prefix);

        let mut queue: u32 = 0;
        let mut nbits: u32 = 0;
        for &byte in data {
            queue |= u32::from(byte) << nbits;
            nbits += 8;
            if nbits > 13 {
                let mut value = queue & 0x1FFF;
                if value > self.threshold {
                    queue >>= 13;
                    nbits -= 13;
                } else {
                    value = queue & 0x3FFF;
                    queue >>= 14;
                    nbits -= 14;
                }
                self.push_digit(&mut out, value % radix);
                self.push_digit(&mut out, value / radix);
            }
        }

        if nbits > 0 {
            self.push_digit(&mut out, queue % radix);
            if nbits > 7 || queue > radix - 1 {
                self.push_digit(&mut out, queue / radix);
            }
        }
        out
    }

    /// Unpacks the whole of `text`.
    #[must_use]
    pub fn decode(&self, text: &str) -> Vec<u8> {
        self.decode_range(text, 0, None)
    }

    /// Unpacks `length` bytes of `text` starting at byte `offset`, or
    /// everything after `offset` when `length` is `None`.
    ///
    /// Offsets are clamped to the text, so out-of-range values yield an empty
    /// or shortened result rather than a panic.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonesc::packer::BASE93;
    ///
    /// let text = "\u{1b}Bin:xy'/z";
    /// assert_eq!(BASE93.decode_range(text, 5, None), vec![91, 82, 112, 207]);
    /// ```
    #[must_use]
    pub fn decode_range(&self, text: &str, offset: usize, length: Option<usize>) -> Vec<u8> {
        let bytes = text.as_bytes();
        let start = offset.min(bytes.len());
        let end = length.map_or(bytes.len(), |len| start.saturating_add(len).min(bytes.len()));
        let input = &bytes[start..end];

        let radix = self.radix() as u32;
        let mut out = Vec::with_capacity(input.len() * 13 / 16 + 1);
        let mut queue: u32 = 0;
        let mut nbits: u32 = 0;
        let mut pending: Option<u32> = None;

        for digit in input.iter().filter_map(|&c| self.digit(c)) {
            let Some(low) = pending.take() else {
                pending = Some(digit);
                continue;
            };
            let value = low + digit * radix;
            queue |= value << nbits;
            nbits += if value & 0x1FFF > self.threshold { 13 } else { 14 };
            loop {
                out.push(queue as u8);
                queue >>= 8;
                nbits -= 8;
                if nbits <= 7 {
                    break;
                }
            }
        }

        if let Some(low) = pending {
            out.push((queue | low << nbits) as u8);
        }
        out
    }

    #[inline]
    fn digit(&self, c: u8) -> Option<u32> {
        match self.decode_table.get(usize::from(c)) {
            Some(&d) if d != INVALID => Some(u32::from(d)),
            _ => None,
        }
    }

    #[inline]
    fn push_digit(&self, out: &mut String, value: u32) {
        out.push(char::from(self.alphabet[value as usize]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut data: Vec<u8> = (0..32).collect();
        data.push(127);
        data
    }

    #[test]
    fn test_alphabets() {
        assert_eq!(BASE91.radix(), 91);
        assert_eq!(BASE93.radix(), 93);
        assert!(!BASE91.alphabet().contains('"'));
        assert!(!BASE93.alphabet().contains('"'));
        assert!(!BASE93.alphabet().contains('\\'));
        assert!(BASE93.alphabet().ends_with(' '));
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(
            BASE91.encode(&sample()),
            ":C#(:C?hVB$MSiVEwndBAMZRxwFfBB;IW<}YQVH`H"
        );
        assert_eq!(
            BASE93.encode(&sample()),
            "*CLhr|aIk{7|3H;+quJW*W0GC6|'1Q339EDUV[>V"
        );
        assert_eq!(BASE93.encode(&[91, 82, 112, 207]), "xy'/z");
        assert_eq!(BASE91.encode(&[1]), "BA");
        assert_eq!(BASE93.encode(&[255]), ")C");
        assert_eq!(BASE93.encode(&[1, 2]), "wFA");
    }

    #[test]
    fn test_reference_vectors_decode() {
        assert_eq!(BASE91.decode(":C#(:C?hVB$MSiVEwndBAMZRxwFfBB;IW<}YQVH`H"), sample());
        assert_eq!(BASE93.decode("*CLhr|aIk{7|3H;+quJW*W0GC6|'1Q339EDUV[>V"), sample());
        assert_eq!(BASE93.decode("wFA"), vec![1, 2]);
    }

    #[test]
    fn test_round_trip_lengths() {
        for packer in [BASE91, BASE93] {
            assert!(packer.decode(&packer.encode(&[])).is_empty());
            for len in 1..260usize {
                let patterns = [
                    vec![0u8; len],
                    vec![0xFFu8; len],
                    (0..len).map(|i| (i * 2) as u8).collect::<Vec<u8>>(),
                ];
                for data in patterns {
                    let packed = packer.encode(&data);
                    assert_eq!(packer.decode(&packed), data, "radix {} len {}", packer.radix(), len);
                }
            }
        }
    }

    #[test]
    fn test_prefix_and_range() {
        let data = sample();
        for packer in [BASE91, BASE93] {
            let packed = packer.encode(&data);
            let prefixed = packer.encode_with_prefix(&data, "\u{1b}Bin:");
            assert_eq!(prefixed, format!("\u{1b}Bin:{}", packed));
            assert_eq!(packer.decode_range(&prefixed, "\u{1b}Bin:".len(), None), data);

            let framed = format!("ab{}\"\"", packed);
            assert_eq!(packer.decode_range(&framed, 2, Some(packed.len())), data);
        }
    }

    #[test]
    fn test_decode_skips_foreign_bytes() {
        let data = sample();
        for packer in [BASE91, BASE93] {
            let packed = packer.encode(&data);
            let (head, tail) = packed.split_at(packed.len() / 2);
            let noisy = format!("\"{}\\é\"{}", head, tail);
            assert_eq!(packer.decode(&noisy), data);
        }
    }

    #[test]
    fn test_out_of_range_offsets() {
        assert!(BASE93.decode_range("xy'/z", 100, None).is_empty());
        assert!(BASE93.decode_range("xy'/z", 0, Some(0)).is_empty());
        assert_eq!(BASE93.decode_range("xy'/z", 0, Some(usize::MAX)), vec![91, 82, 112, 207]);
    }
}
