//! Forward-only record reader for logs too large to hold in memory

use std::io::{ErrorKind, Read};

use crate::config::ConversionConfig;
use crate::demux::{DemuxError, Demuxer, SensorStreams};
use crate::packet::RawPacket;

/// Iterator over the records of a log read from any [`Read`] source
///
/// Yields one record at a time. A trailing partial record yields a
/// [`DemuxError::Format`] carrying the total number of bytes read, after
/// which the iterator is exhausted.
pub struct PacketReader<R> {
    inner: R,
    bytes_read: usize,
    done: bool,
}

impl<R: Read> PacketReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
            done: false,
        }
    }

    /// Total bytes consumed so far
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Fill `buf` as far as the source allows, returning the byte count.
    /// Short only at end of input.
    fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for PacketReader<R> {
    type Item = Result<RawPacket, DemuxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = [0u8; RawPacket::PACKET_SIZE];
        let filled = match self.fill(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(DemuxError::Io(e)));
            }
        };
        self.bytes_read += filled;

        if filled == 0 {
            self.done = true;
            return None;
        }
        if filled < RawPacket::PACKET_SIZE {
            self.done = true;
            return Some(Err(DemuxError::Format {
                len: self.bytes_read,
                record_size: RawPacket::PACKET_SIZE,
            }));
        }

        Some(Ok(bytemuck::cast(buf)))
    }
}

/// Demux a log from a reader in a single forward pass.
///
/// Produces the same streams as [`crate::demux()`] for the same bytes. When
/// a range error and a trailing partial record are both present, the range
/// error is reported if its sensor appears first, since the reader cannot
/// see the length in advance.
pub fn demux_reader<R: Read>(
    reader: R,
    config: &ConversionConfig,
) -> Result<SensorStreams, DemuxError> {
    let mut demuxer = Demuxer::new(config);
    let mut packets = PacketReader::new(reader);
    for packet in packets.by_ref() {
        demuxer.push(&packet?)?;
    }
    log::debug!("Read {} bytes from stream", packets.bytes_read());
    Ok(demuxer.finish())
}
