//! Text formatting helpers
//!
//! Pure, stateless conversions between numbers and the terminal's text
//! forms. No protocol semantics live here.

use heapless::String;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Parse a hex string into a 32-bit value.
///
/// Not case-sensitive; non-hex characters count as zero rather than
/// failing, matching the terminal's forgiving input handling. Input
/// longer than eight digits keeps the last eight.
pub fn parse_hex_u32(text: &str) -> u32 {
    let mut value: u32 = 0;
    for byte in text.bytes() {
        value = (value << 4) | u32::from(hex_digit_value(byte));
    }
    value
}

fn hex_digit_value(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => 0,
    }
}

/// Render a 32-bit value as eight uppercase hex digits.
pub fn hex_u32(value: u32) -> String<8> {
    let mut out = String::new();
    for shift in (0..8).rev() {
        let _ = out.push(HEX_DIGITS[((value >> (shift * 4)) & 0xF) as usize] as char);
    }
    out
}

/// Render a 16-bit value as four uppercase hex digits.
pub fn hex_u16(value: u16) -> String<4> {
    let mut out = String::new();
    for shift in (0..4).rev() {
        let _ = out.push(HEX_DIGITS[((value >> (shift * 4)) & 0xF) as usize] as char);
    }
    out
}

/// Render a byte as two uppercase hex digits.
pub fn hex_u8(value: u8) -> String<2> {
    let mut out = String::new();
    let _ = out.push(HEX_DIGITS[(value >> 4) as usize] as char);
    let _ = out.push(HEX_DIGITS[(value & 0xF) as usize] as char);
    out
}

/// Render a byte as a decimal string without leading zeros.
pub fn decimal_u8(value: u8) -> String<3> {
    let mut out = String::new();
    let hundreds = value / 100;
    let tens = (value / 10) % 10;
    if hundreds > 0 {
        let _ = out.push((b'0' + hundreds) as char);
    }
    if hundreds > 0 || tens > 0 {
        let _ = out.push((b'0' + tens) as char);
    }
    let _ = out.push((b'0' + value % 10) as char);
    out
}
