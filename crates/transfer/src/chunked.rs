use std::io::Read;
use std::path::Path;

use crate::{CHUNK_SIZE, TransferError};

/// A chunk of payload data.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Byte offset within the file.
    pub offset: u64,
    /// Raw chunk data, at most [`CHUNK_SIZE`] bytes.
    pub data: Vec<u8>,
}

/// Reads a file as a finite, forward-only sequence of fixed-size
/// chunks, tracking bytes emitted so the caller can derive progress
/// without re-reading the file. Restarting from the beginning means
/// reopening.
pub struct ChunkReader {
    file: std::fs::File,
    chunk_size: usize,
    offset: u64,
    file_size: u64,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    ///
    /// If `chunk_size` is 0, [`CHUNK_SIZE`] is used.
    pub fn new(path: &Path, chunk_size: usize) -> Result<Self, TransferError> {
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        let chunk_size = if chunk_size == 0 { CHUNK_SIZE } else { chunk_size };
        Ok(Self {
            file,
            chunk_size,
            offset: 0,
            file_size,
        })
    }

    /// Reads the next chunk. Returns `None` at end of file.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        let remaining = self.file_size.saturating_sub(self.offset);
        if remaining == 0 {
            return Ok(None);
        }

        let read_size = std::cmp::min(remaining as usize, self.chunk_size);
        let mut buf = vec![0u8; read_size];
        let n = self.file.read(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);

        let chunk = Chunk {
            offset: self.offset,
            data: buf,
        };
        self.offset += n as u64;
        Ok(Some(chunk))
    }

    /// Cumulative bytes emitted so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Bytes remaining to read.
    pub fn remaining(&self) -> u64 {
        self.file_size - self.offset
    }
}
