use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use tracing::{debug, warn};

use cpl_types::{EntityId, LedgerEvent};

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_extends_tip, EventLog};

/// Flush/sync strategy for the segment file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// `fsync` after every append (safest, highest latency).
    #[default]
    EveryWrite,
    /// Rely on OS page-cache buffering (fastest, least durable).
    OsDefault,
}

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Internal mutable state for the log writer.
struct LogWriter {
    writer: BufWriter<File>,
    /// Current write offset in the segment file.
    offset: u64,
}

/// Crash-recoverable file-backed event log.
///
/// On-disk format per record:
/// ```text
/// [4 bytes: record length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (serde_json-serialized LedgerEvent)]
/// ```
///
/// On open the segment is read front-to-back to rebuild the per-entity
/// index. A torn tail (incomplete frame from a crash) is truncated away, so
/// a failed append is invisible after restart. A complete record failing its
/// CRC check is skipped with a warning; the severed chain link that leaves
/// behind is then reported by integrity verification rather than silently
/// repaired.
///
/// Appends to the single segment file are serialized behind one writer lock;
/// the index is updated only after the frame is durably written, so readers
/// never observe a partial event.
pub struct FileEventLog {
    path: PathBuf,
    writer: Mutex<LogWriter>,
    index: RwLock<HashMap<EntityId, Vec<LedgerEvent>>>,
    sync_mode: SyncMode,
}

impl FileEventLog {
    /// Open (or create) a segment file at the given path and recover its
    /// contents.
    pub fn open(path: &Path, sync_mode: SyncMode) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let (index, valid_len) = Self::recover(path)?;

        // Drop any torn tail so later appends stay recoverable.
        if valid_len < file.metadata()?.len() {
            file.set_len(valid_len)?;
        }

        debug!(
            path = %path.display(),
            entities = index.len(),
            offset = valid_len,
            "event log opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(LogWriter {
                writer: BufWriter::new(file),
                offset: valid_len,
            }),
            index: RwLock::new(index),
            sync_mode,
        })
    }

    /// Path to the segment file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all valid records front-to-back, returning the rebuilt index and
    /// the offset of the last complete frame.
    fn recover(path: &Path) -> StoreResult<(HashMap<EntityId, Vec<LedgerEvent>>, u64)> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut index: HashMap<EntityId, Vec<LedgerEvent>> = HashMap::new();
        let mut offset: u64 = 0;
        let mut recovered = 0usize;

        while offset + HEADER_SIZE as u64 <= file_len {
            reader.seek(SeekFrom::Start(offset))?;

            let mut header = [0u8; HEADER_SIZE];
            match reader.read_exact(&mut header) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            if length == 0 || offset + HEADER_SIZE as u64 + length as u64 > file_len {
                warn!(offset, length, file_len, "torn record at log tail; truncating");
                break;
            }

            let mut payload = vec![0u8; length as usize];
            match reader.read_exact(&mut payload) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    warn!(offset, "torn record at log tail; truncating");
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            let actual_crc = crc32fast::hash(&payload);
            if actual_crc != expected_crc {
                warn!(
                    offset,
                    expected = expected_crc,
                    actual = actual_crc,
                    "CRC mismatch; skipping record"
                );
            } else {
                match serde_json::from_slice::<LedgerEvent>(&payload) {
                    Ok(event) => {
                        index.entry(event.entity_id.clone()).or_default().push(event);
                        recovered += 1;
                    }
                    Err(e) => warn!(offset, error = %e, "undecodable record; skipping"),
                }
            }

            offset += HEADER_SIZE as u64 + length as u64;
        }

        debug!(recovered, "event log recovery complete");
        Ok((index, offset))
    }
}

impl EventLog for FileEventLog {
    fn append(&self, event: &LedgerEvent) -> StoreResult<()> {
        let payload =
            serde_json::to_vec(event).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let crc = crc32fast::hash(&payload);

        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&payload);

        let mut w = self.writer.lock().map_err(|_| poisoned("log writer"))?;

        {
            let index = self.index.read().map_err(|_| poisoned("log index"))?;
            let tip = index.get(&event.entity_id).and_then(|chain| chain.last());
            check_extends_tip(tip, event)?;
        }

        if let Err(e) = write_frame(&mut w, &frame, self.sync_mode == SyncMode::EveryWrite) {
            // Roll the file back to the last good frame so later appends
            // stay recoverable.
            let _ = w.writer.get_ref().set_len(w.offset);
            return Err(e.into());
        }
        w.offset += frame.len() as u64;

        let mut index = self.index.write().map_err(|_| poisoned("log index"))?;
        index
            .entry(event.entity_id.clone())
            .or_default()
            .push(event.clone());

        debug!(
            entity = %event.entity_id,
            seq = event.seq,
            len = payload.len(),
            "event appended"
        );
        Ok(())
    }

    fn tip(&self, entity: &EntityId) -> StoreResult<Option<LedgerEvent>> {
        let index = self.index.read().map_err(|_| poisoned("log index"))?;
        Ok(index.get(entity).and_then(|chain| chain.last()).cloned())
    }

    fn read_all(&self, entity: &EntityId) -> StoreResult<Vec<LedgerEvent>> {
        let index = self.index.read().map_err(|_| poisoned("log index"))?;
        Ok(index.get(entity).cloned().unwrap_or_default())
    }

    fn event_count(&self, entity: &EntityId) -> StoreResult<u64> {
        let index = self.index.read().map_err(|_| poisoned("log index"))?;
        Ok(index.get(entity).map(|chain| chain.len() as u64).unwrap_or(0))
    }

    fn entities(&self) -> StoreResult<Vec<EntityId>> {
        let index = self.index.read().map_err(|_| poisoned("log index"))?;
        let mut ids: Vec<_> = index.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

fn write_frame(w: &mut LogWriter, frame: &[u8], sync: bool) -> io::Result<()> {
    w.writer.write_all(frame)?;
    w.writer.flush()?;
    if sync {
        w.writer.get_ref().sync_all()?;
    }
    Ok(())
}

fn poisoned(what: &str) -> StoreError {
    StoreError::Unavailable(format!("{what} lock poisoned"))
}
