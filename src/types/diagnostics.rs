/// Maximum length of a recorded message, in bytes. Longer messages are
/// truncated. Inherited from the original engine's fixed 512-byte buffer
/// (511 bytes plus terminator).
pub const MAX_MESSAGE_LEN: usize = 511;

/// Per-context buffer holding the most recent compile or match diagnostic.
///
/// Each [`record`](Diagnostics::record) overwrites the previous message, so
/// the buffer always reflects the last message of the most recent operation.
/// The owning [`Context`](crate::Context) clears it before every load or
/// normalize call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    buf: String,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the buffer with `message`, truncating to
    /// [`MAX_MESSAGE_LEN`] bytes on a character boundary.
    pub fn record(&mut self, message: &str) {
        let mut end = message.len().min(MAX_MESSAGE_LEN);
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.clear();
        self.buf.push_str(&message[..end]);
    }

    /// The most recent message, or `None` if nothing was recorded since the
    /// last clear.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.as_str())
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
