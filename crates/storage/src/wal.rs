// SPDX-License-Identifier: MIT

//! JSONL event write-ahead log.
//!
//! Each entry is a single line of JSON: `{"seq":N,"event":{...}}\n`. Events
//! are appended and flushed immediately (no group-commit buffering — the
//! event volume here is orders of magnitude lower than a multi-tenant job
//! queue, so the extra durability is worth the syscall).

use crate::error::StoreError;
use crate::store_event::StoreEvent;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Serialize)]
struct WalRecordRef<'a> {
    seq: u64,
    event: &'a StoreEvent,
}

#[derive(Deserialize)]
struct WalRecord {
    seq: u64,
    event: StoreEvent,
}

#[derive(Debug, Clone)]
pub struct WalEntry {
    pub seq: u64,
    pub event: StoreEvent,
}

const MAX_BAK_FILES: u32 = 3;

fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };
    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = std::fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = std::fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

/// JSONL WAL for durable event storage.
pub struct Wal {
    file: File,
    read_file: File,
    path: PathBuf,
    write_seq: u64,
    processed_seq: u64,
    read_offset: u64,
}

impl Wal {
    /// Open or create a WAL at `path`. `processed_seq` should come from the
    /// last snapshot (or 0 if there is none).
    pub fn open(path: &Path, processed_seq: u64) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).read(true).append(true).open(path)?;

        let (mut write_seq, mut read_offset, corrupt) = Self::scan(&file, processed_seq)?;

        if corrupt {
            let valid_lines = Self::read_valid_lines(&file)?;
            drop(file);

            let bak_path = rotate_bak_path(path);
            warn!(
                path = %path.display(),
                bak = %bak_path.display(),
                valid_entries = valid_lines.len(),
                "corrupt WAL detected, rotating to .bak and preserving valid entries",
            );
            std::fs::rename(path, &bak_path)?;

            {
                let mut new_file = File::create(path)?;
                for line in &valid_lines {
                    new_file.write_all(line.as_bytes())?;
                    new_file.write_all(b"\n")?;
                }
                new_file.sync_all()?;
            }

            file = OpenOptions::new().create(true).read(true).append(true).open(path)?;
            let scan = Self::scan(&file, processed_seq)?;
            write_seq = scan.0;
            read_offset = scan.1;
        }

        let read_file = file.try_clone()?;

        Ok(Self {
            file,
            read_file,
            path: path.to_owned(),
            write_seq,
            processed_seq,
            read_offset,
        })
    }

    fn scan(file: &File, processed_seq: u64) -> Result<(u64, u64, bool), StoreError> {
        let mut reader = BufReader::new(file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut max_seq = 0u64;
        let mut read_offset = 0u64;
        let mut current_offset = 0u64;
        let mut corrupt = false;
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    corrupt = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                current_offset += bytes_read as u64;
                continue;
            }

            let record: WalRecord = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(_) => {
                    corrupt = true;
                    break;
                }
            };

            max_seq = max_seq.max(record.seq);
            if record.seq > processed_seq && read_offset == 0 {
                read_offset = current_offset;
            }
            current_offset += bytes_read as u64;
        }

        if read_offset == 0 {
            read_offset = current_offset;
        }

        Ok((max_seq, read_offset, corrupt))
    }

    fn read_valid_lines(file: &File) -> Result<Vec<String>, StoreError> {
        let mut reader = BufReader::new(file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut valid_lines = Vec::new();
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => break,
                Err(e) => return Err(e.into()),
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let _: WalRecord = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(_) => break,
            };
            valid_lines.push(trimmed.to_string());
        }

        Ok(valid_lines)
    }

    /// Append and immediately fsync a single event, returning its sequence number.
    pub fn append(&mut self, event: &StoreEvent) -> Result<u64, StoreError> {
        self.write_seq += 1;
        let seq = self.write_seq;
        let record = WalRecordRef { seq, event };
        let mut bytes = serde_json::to_vec(&record)?;
        bytes.push(b'\n');
        self.file.write_all(&bytes)?;
        self.file.sync_all()?;
        Ok(seq)
    }

    /// Get the next unprocessed entry, if any.
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>, StoreError> {
        let mut reader = BufReader::new(&self.read_file);
        reader.seek(SeekFrom::Start(self.read_offset))?;

        let mut line = String::new();
        let bytes_read = match reader.read_line(&mut line) {
            Ok(0) => return Ok(None),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let record: WalRecord = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(offset = self.read_offset, error = %e, "corrupt WAL entry, skipping");
                self.read_offset += bytes_read as u64;
                return Ok(None);
            }
        };

        self.read_offset += bytes_read as u64;
        Ok(Some(WalEntry {
            seq: record.seq,
            event: record.event,
        }))
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = seq;
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    /// Rewrite the WAL keeping only entries with `seq >= seq`, for space
    /// reclamation after a snapshot checkpoint.
    pub fn truncate_before(&mut self, seq: u64) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("tmp");

        let mut reader = BufReader::new(self.file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut kept: Vec<(u64, String)> = Vec::new();
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => break,
                Err(e) => return Err(e.into()),
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: WalRecord = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(_) => break,
            };
            if record.seq >= seq {
                kept.push((record.seq, trimmed.to_string()));
            }
        }

        let new_read_offset;
        {
            let mut tmp_file = File::create(&tmp_path)?;
            let mut current_offset = 0u64;
            let mut first_unprocessed = None;
            for (entry_seq, kept_line) in &kept {
                if *entry_seq > self.processed_seq && first_unprocessed.is_none() {
                    first_unprocessed = Some(current_offset);
                }
                tmp_file.write_all(kept_line.as_bytes())?;
                tmp_file.write_all(b"\n")?;
                current_offset += kept_line.len() as u64 + 1;
            }
            new_read_offset = first_unprocessed.unwrap_or(current_offset);
            tmp_file.sync_all()?;
        }

        std::fs::rename(&tmp_path, &self.path)?;

        self.file = OpenOptions::new().create(true).read(true).append(true).open(&self.path)?;
        self.read_file = self.file.try_clone()?;
        self.read_offset = new_read_offset;

        Ok(())
    }

    /// All entries after `seq`, used to replay into a fresh snapshot.
    pub fn entries_after(&self, seq: u64) -> Result<Vec<WalEntry>, StoreError> {
        let mut reader = BufReader::new(self.file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut entries = Vec::new();
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => break,
                Err(e) => return Err(e.into()),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: WalRecord = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "corrupt WAL entry during replay, stopping at corruption point");
                    break;
                }
            };
            let _ = bytes_read;
            if record.seq > seq {
                entries.push(WalEntry {
                    seq: record.seq,
                    event: record.event,
                });
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
