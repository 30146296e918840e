//! Bounded line input with echo
//!
//! Reads one line of operator input over the UART pair, echoing printable
//! characters as they arrive and rubbing out on backspace. Lines are
//! bounded; input beyond the limit is dropped silently.

use heapless::String;
use wbi2c_hal::{UartRx, UartTx};

/// Longest accepted command line
pub const MAX_LINE: usize = 16;

/// Read a line, echoing as we go.
///
/// CR or LF terminates the line (the terminator is echoed as CRLF and
/// not included in the result). Backspace and DEL rub out the previous
/// character; other control bytes are ignored.
pub fn read_line<TX, RX>(tx: &mut TX, rx: &mut RX) -> Result<String<MAX_LINE>, TX::Error>
where
    TX: UartTx,
    RX: UartRx<Error = TX::Error>,
{
    let mut line: String<MAX_LINE> = String::new();
    loop {
        let byte = rx.read_byte()?;
        match byte {
            b'\r' | b'\n' => {
                tx.write_blocking(b"\r\n")?;
                return Ok(line);
            }
            0x08 | 0x7F => {
                if line.pop().is_some() {
                    tx.write_blocking(b"\x08 \x08")?;
                }
            }
            0x20..=0x7E => {
                if line.push(byte as char).is_ok() {
                    tx.write_blocking(&[byte])?;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use heapless::Vec;

    struct ScriptRx {
        data: Vec<u8, 64>,
        position: usize,
    }

    impl ScriptRx {
        fn new(data: &[u8]) -> Self {
            Self {
                data: Vec::from_slice(data).unwrap(),
                position: 0,
            }
        }
    }

    impl UartRx for ScriptRx {
        type Error = Infallible;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
            for slot in buf.iter_mut() {
                *slot = self.data[self.position];
                self.position += 1;
            }
            Ok(buf.len())
        }
    }

    #[derive(Default)]
    struct CaptureTx {
        output: Vec<u8, 256>,
    }

    impl UartTx for CaptureTx {
        type Error = Infallible;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
            self.output.extend_from_slice(data).unwrap();
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[test]
    fn test_line_terminates_on_cr() {
        let mut rx = ScriptRx::new(b"help\r");
        let mut tx = CaptureTx::default();
        let line = read_line(&mut tx, &mut rx).unwrap();
        assert_eq!(line.as_str(), "help");
        assert_eq!(&tx.output, b"help\r\n");
    }

    #[test]
    fn test_backspace_rubs_out() {
        let mut rx = ScriptRx::new(b"hxlp\x08\x08\x08elp\n");
        let mut tx = CaptureTx::default();
        let line = read_line(&mut tx, &mut rx).unwrap();
        assert_eq!(line.as_str(), "help");
    }

    #[test]
    fn test_backspace_on_empty_line_is_ignored() {
        let mut rx = ScriptRx::new(b"\x08id\r");
        let mut tx = CaptureTx::default();
        let line = read_line(&mut tx, &mut rx).unwrap();
        assert_eq!(line.as_str(), "id");
        // No rub-out sequence was echoed
        assert_eq!(&tx.output, b"id\r\n");
    }

    #[test]
    fn test_input_beyond_limit_is_dropped() {
        let mut rx = ScriptRx::new(b"abcdefghijklmnopqrstuvwxyz\r");
        let mut tx = CaptureTx::default();
        let line = read_line(&mut tx, &mut rx).unwrap();
        assert_eq!(line.len(), MAX_LINE);
        assert_eq!(line.as_str(), "abcdefghijklmnop");
    }

    #[test]
    fn test_control_bytes_are_ignored() {
        let mut rx = ScriptRx::new(b"i\x01\x02d\r");
        let mut tx = CaptureTx::default();
        let line = read_line(&mut tx, &mut rx).unwrap();
        assert_eq!(line.as_str(), "id");
    }
}
