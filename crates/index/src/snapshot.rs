//! Binary snapshot codec for the graph index.
//!
//! ## Snapshot format (version 0x01)
//!
//! ```text
//! [Version: u8]
//! [Header length: u32 LE]
//! [Header: MessagePack SnapshotHeader]
//! For each node (in item-id order):
//!   [Embedding: dims * f32 LE]
//!   [Assigned layer: u8]
//!   For each layer 0..=assigned layer:
//!     [Neighbor count: u32 LE]
//!     [Neighbor ids: count * u32 LE]
//! ```
//!
//! Item ids are implicit in the write order, so the layout carries no
//! per-node id field. Loading validates structure (version, header,
//! neighbor ids in range, entry-point invariant) and reports
//! `CorruptIndex` on any mismatch; a loaded index answers every query
//! identically to the one that produced the bytes.

use crate::graph::HnswIndex;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use proxima_core::{DistanceSpace, IndexConfig, ProximaError, ProximaResult};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Write};
use tracing::debug;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u8 = 0x01;

/// Graph snapshot header (MessagePack serialized)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotHeader {
    dims: u32,
    m: u32,
    m_max0: u32,
    ef_construction: u32,
    ef_search: u32,
    max_layers: u32,
    /// Distance space (as byte)
    space: u8,
    entry_point: Option<u32>,
    max_layer: u32,
    node_count: u32,
}

impl HnswIndex {
    /// Serialize the graph to a self-contained byte blob
    pub fn save(&self) -> ProximaResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_snapshot(&mut buffer)?;
        debug!(
            nodes = self.len(),
            bytes = buffer.len(),
            "serialized index snapshot"
        );
        Ok(buffer)
    }

    /// Serialize the graph into a writer
    pub fn write_snapshot<W: Write>(&self, writer: &mut W) -> ProximaResult<()> {
        writer.write_u8(SNAPSHOT_VERSION)?;

        let header = SnapshotHeader {
            dims: self.config.dims as u32,
            m: self.config.m as u32,
            m_max0: self.config.m_max0 as u32,
            ef_construction: self.config.ef_construction as u32,
            ef_search: self.config.ef_search as u32,
            max_layers: self.config.max_layers as u32,
            space: self.config.space.to_byte(),
            entry_point: self.entry_point,
            max_layer: self.max_layer as u32,
            node_count: self.len() as u32,
        };
        let header_bytes =
            rmp_serde::to_vec(&header).map_err(|e| ProximaError::Serialization {
                message: e.to_string(),
            })?;
        writer.write_u32::<LittleEndian>(header_bytes.len() as u32)?;
        writer.write_all(&header_bytes)?;

        for id in 0..self.len() as u32 {
            for &value in self.embedding(id) {
                writer.write_f32::<LittleEndian>(value)?;
            }
            let layer = self.layers[id as usize];
            writer.write_u8(layer)?;
            for l in 0..=layer as usize {
                let neighbors = self.neighbors_at(id, l);
                writer.write_u32::<LittleEndian>(neighbors.len() as u32)?;
                for &nb in neighbors {
                    writer.write_u32::<LittleEndian>(nb)?;
                }
            }
        }

        Ok(())
    }

    /// Reconstruct an index from snapshot bytes, validating structure
    pub fn load(bytes: &[u8]) -> ProximaResult<Self> {
        let mut cursor = Cursor::new(bytes);
        let index = Self::read_snapshot(&mut cursor)?;
        if cursor.position() != bytes.len() as u64 {
            return Err(ProximaError::corrupt(format!(
                "{} trailing bytes after snapshot",
                bytes.len() as u64 - cursor.position()
            )));
        }
        debug!(nodes = index.len(), "loaded index snapshot");
        Ok(index)
    }

    /// Reconstruct an index from a reader
    pub fn read_snapshot<R: Read>(reader: &mut R) -> ProximaResult<Self> {
        let version = reader.read_u8().map_err(truncated)?;
        if version != SNAPSHOT_VERSION {
            return Err(ProximaError::corrupt(format!(
                "unsupported snapshot version: {version}"
            )));
        }

        let header_len = reader.read_u32::<LittleEndian>().map_err(truncated)? as usize;
        let mut header_bytes = vec![0u8; header_len];
        reader.read_exact(&mut header_bytes).map_err(truncated)?;
        let header: SnapshotHeader = rmp_serde::from_slice(&header_bytes)
            .map_err(|e| ProximaError::corrupt(format!("bad snapshot header: {e}")))?;

        let space = DistanceSpace::from_byte(header.space)
            .ok_or_else(|| ProximaError::corrupt(format!("invalid space byte: {}", header.space)))?;
        let config = IndexConfig {
            dims: header.dims as usize,
            m: header.m as usize,
            m_max0: header.m_max0 as usize,
            ef_construction: header.ef_construction as usize,
            ef_search: header.ef_search as usize,
            max_layers: header.max_layers as usize,
            space,
        };
        config
            .validate()
            .map_err(|e| ProximaError::corrupt(format!("invalid config in header: {e}")))?;

        let node_count = header.node_count as usize;
        let max_layer = header.max_layer as usize;
        if max_layer >= config.max_layers {
            return Err(ProximaError::corrupt(format!(
                "max_layer {max_layer} exceeds layer bound {}",
                config.max_layers
            )));
        }
        match header.entry_point {
            Some(ep) if ep as usize >= node_count => {
                return Err(ProximaError::corrupt(format!(
                    "entry point {ep} out of range for {node_count} nodes"
                )));
            }
            None if node_count > 0 => {
                return Err(ProximaError::corrupt(
                    "non-empty snapshot without an entry point",
                ));
            }
            _ => {}
        }

        let mut embeddings = Vec::with_capacity(node_count * config.dims);
        let mut neighbors = Vec::with_capacity(node_count);
        let mut layers = Vec::with_capacity(node_count);

        for id in 0..node_count {
            for _ in 0..config.dims {
                embeddings.push(reader.read_f32::<LittleEndian>().map_err(truncated)?);
            }

            let layer = reader.read_u8().map_err(truncated)?;
            if layer as usize > max_layer {
                return Err(ProximaError::corrupt(format!(
                    "node {id} assigned layer {layer} above max_layer {max_layer}"
                )));
            }
            layers.push(layer);

            let mut node_neighbors = Vec::with_capacity(layer as usize + 1);
            for l in 0..=layer as usize {
                let count = reader.read_u32::<LittleEndian>().map_err(truncated)? as usize;
                let mut ids = Vec::with_capacity(count);
                for _ in 0..count {
                    let nb = reader.read_u32::<LittleEndian>().map_err(truncated)?;
                    if nb as usize >= node_count {
                        return Err(ProximaError::corrupt(format!(
                            "neighbor id {nb} out of range at node {id} layer {l}"
                        )));
                    }
                    ids.push(nb);
                }
                node_neighbors.push(ids);
            }
            neighbors.push(node_neighbors);
        }

        if let Some(ep) = header.entry_point {
            // The entry point must sit on the highest layer in use
            if layers[ep as usize] as usize != max_layer {
                return Err(ProximaError::corrupt(format!(
                    "entry point {ep} is on layer {} but max_layer is {max_layer}",
                    layers[ep as usize]
                )));
            }
        }

        HnswIndex::from_parts(
            config,
            embeddings,
            neighbors,
            layers,
            header.entry_point,
            max_layer,
        )
    }
}

fn truncated(e: std::io::Error) -> ProximaError {
    ProximaError::corrupt(format!("truncated snapshot: {e}"))
}
