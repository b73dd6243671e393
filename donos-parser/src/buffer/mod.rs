pub mod reader;
pub mod writer;

pub use reader::ReaderError;
pub use writer::WriterError;

const BUFFER_SIZE: usize = 512;

#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary, Debug, Clone))]
pub struct BytePacketBuffer {
    pub buf: [u8; BUFFER_SIZE],
    pub pos: usize,
}

impl Default for BytePacketBuffer {
    /// This gives us a fresh buffer for holding the packet contents, and a
    /// field for keeping track of where we are.
    fn default() -> Self {
        BytePacketBuffer {
            buf: [0; BUFFER_SIZE],
            pos: 0,
        }
    }
}

impl BytePacketBuffer {
    /// Wraps an already-filled buffer (e.g. a received datagram) for reading
    /// from the start.
    pub fn new(buf: [u8; BUFFER_SIZE]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current position within buffer
    pub fn pos(&self) -> usize {
        self.pos
    }
}
