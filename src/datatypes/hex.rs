use std::fmt;

/// Upper-case hex rendering of a byte slice, without separators
#[derive(Debug, Clone, Copy)]
pub struct HexData<'a>(pub &'a [u8]);

impl fmt::Display for HexData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}
