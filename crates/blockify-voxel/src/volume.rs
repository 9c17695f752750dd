//! Volumes produced by an external voxelizer.
//!
//! The exchange format is a little-endian header of three `i32` counts in
//! `x, z, y` order, followed by one byte per cell. Bytes are written with x
//! outermost, then z, then y running from the top down:
//!
//! | byte   | meaning                    |
//! |--------|----------------------------|
//! | `0x00` | enclosed interior          |
//! | `0xFF` | open space                 |
//! | other  | occupied                   |

use std::io::{ErrorKind, Read, Write};

use blockify_core::{CellPos, CellState, Error, GridDims, Result};

use crate::grid::{check_dims, Grid};

/// Interior marker byte
pub const INTERIOR_BYTE: u8 = 0x00;
/// Open-space marker byte
pub const EXTERIOR_BYTE: u8 = 0xFF;
/// Byte written for occupied cells
pub const SOLID_BYTE: u8 = 0x12;

/// Decoded voxelizer output, stored in grid order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelVolume {
    dims: GridDims,
    bytes: Vec<u8>,
}

impl VoxelVolume {
    /// Wrap raw cell bytes laid out in grid storage order.
    pub fn from_bytes(dims: GridDims, bytes: Vec<u8>) -> Result<Self> {
        check_dims(dims, u64::MAX)?;
        if bytes.len() as u64 != dims.cell_count() {
            return Err(Error::InvalidInput(format!(
                "volume of {}x{}x{} needs {} bytes, got {}",
                dims.x,
                dims.y,
                dims.z,
                dims.cell_count(),
                bytes.len()
            )));
        }
        Ok(Self { dims, bytes })
    }

    /// Decode a volume stream, refusing anything over `max_cells` before
    /// reading the payload.
    pub fn read_from<R: Read>(mut reader: R, max_cells: u64) -> Result<Self> {
        let mut header = [0_u8; 12];
        read_exact(&mut reader, &mut header, "header")?;
        let count = |i: usize| {
            let raw = i32::from_le_bytes([
                header[i * 4],
                header[i * 4 + 1],
                header[i * 4 + 2],
                header[i * 4 + 3],
            ]);
            u32::try_from(raw)
                .map_err(|_| Error::InvalidInput(format!("negative volume dimension {raw}")))
        };
        let (x_count, z_count, y_count) = (count(0)?, count(1)?, count(2)?);
        let dims = GridDims::new(x_count, y_count, z_count);
        check_dims(dims, max_cells)?;

        let mut payload = vec![0_u8; dims.cell_count() as usize];
        read_exact(&mut reader, &mut payload, "payload")?;

        let mut bytes = vec![EXTERIOR_BYTE; payload.len()];
        let mut source = payload.into_iter();
        for x in 0..x_count {
            for z in 0..z_count {
                for y in (0..y_count).rev() {
                    if let Some(b) = source.next() {
                        bytes[dims.to_index(CellPos::new(x, y, z))] = b;
                    }
                }
            }
        }
        Ok(Self { dims, bytes })
    }

    /// Encode in the exchange format.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let dims = self.dims;
        for count in [dims.x, dims.z, dims.y] {
            writer.write_all(&(count as i32).to_le_bytes())?;
        }
        let mut payload = Vec::with_capacity(self.bytes.len());
        for x in 0..dims.x {
            for z in 0..dims.z {
                for y in (0..dims.y).rev() {
                    payload.push(self.bytes[dims.to_index(CellPos::new(x, y, z))]);
                }
            }
        }
        writer.write_all(&payload)?;
        Ok(())
    }

    /// Grid dimensions
    #[inline]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Returns true if any cell is occupied.
    pub fn has_shape(&self) -> bool {
        self.bytes
            .iter()
            .any(|&b| b != INTERIOR_BYTE && b != EXTERIOR_BYTE)
    }

    /// Convert to a grid ready for the exterior pass.
    ///
    /// Occupied cells become `Solid`, open space `Empty`, and interior cells
    /// `Void`, or `Solid` when `fill_interior` is set.
    pub fn into_grid(self, fill_interior: bool) -> Result<Grid> {
        let interior = if fill_interior {
            CellState::Solid
        } else {
            CellState::Void
        };
        let cells = self
            .bytes
            .into_iter()
            .map(|b| match b {
                INTERIOR_BYTE => interior,
                EXTERIOR_BYTE => CellState::Empty,
                _ => CellState::Solid,
            })
            .collect();
        Grid::from_cells(self.dims, cells)
    }
}

/// `read_exact` that reports a short stream as malformed input.
fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            Error::InvalidInput(format!("truncated volume {what}"))
        } else {
            Error::Io(err)
        }
    })
}

/// Parameters handed to a [`VoxelSource`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoxelizeRequest {
    /// Cells along the longest axis, or `None` for the model's native size
    pub resolution: Option<u32>,
    /// Ask the voxelizer to close gaps between surface cells
    pub gapless: bool,
}

/// An external voxelizer.
pub trait VoxelSource {
    /// Voxelize the source model.
    fn voxelize(&mut self, request: &VoxelizeRequest) -> Result<VoxelVolume>;
}

/// Fetch a volume, retrying once in gapless mode if the first attempt
/// contains no occupied cells.
///
/// A volume that is still empty after the retry is returned as is.
pub fn acquire_volume<S: VoxelSource + ?Sized>(
    source: &mut S,
    resolution: Option<u32>,
) -> Result<VoxelVolume> {
    let _span = tracing::trace_span!("voxel.acquire_volume").entered();

    let mut request = VoxelizeRequest {
        resolution,
        gapless: false,
    };
    let volume = source.voxelize(&request)?;
    if volume.has_shape() {
        return Ok(volume);
    }

    tracing::debug!("voxelizer produced no shape, retrying gapless");
    request.gapless = true;
    let volume = source.voxelize(&request)?;
    if !volume.has_shape() {
        tracing::warn!(
            x = volume.dims.x,
            y = volume.dims.y,
            z = volume.dims.z,
            "voxelizer produced no shape"
        );
    }
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(x: i32, z: i32, y: i32) -> Vec<u8> {
        [x, z, y].iter().flat_map(|c| c.to_le_bytes()).collect()
    }

    #[test]
    fn axes_are_remapped() {
        // x = 2, z = 1, y = 3; per x column y is written top-down.
        let mut data = header(2, 1, 3);
        data.extend([0xFF, 0x00, 0x12, 0xFF, 0xFF, 0x12]);

        let volume = VoxelVolume::read_from(Cursor::new(data), u64::MAX).unwrap();
        assert_eq!(volume.dims(), GridDims::new(2, 3, 1));
        let grid = volume.into_grid(false).unwrap();

        assert_eq!(grid.get(CellPos::new(0, 2, 0)), Some(CellState::Empty));
        assert_eq!(grid.get(CellPos::new(0, 1, 0)), Some(CellState::Void));
        assert_eq!(grid.get(CellPos::new(0, 0, 0)), Some(CellState::Solid));
        assert_eq!(grid.get(CellPos::new(1, 0, 0)), Some(CellState::Solid));
        assert_eq!(grid.get(CellPos::new(1, 1, 0)), Some(CellState::Empty));
    }

    #[test]
    fn fill_interior_makes_solid() {
        let volume = VoxelVolume::from_bytes(GridDims::new(1, 1, 2), vec![0x00, 0x12]).unwrap();
        let grid = volume.into_grid(true).unwrap();
        assert_eq!(grid.census().solid, 2);
    }

    #[test]
    fn negative_dimension_rejected() {
        let data = header(2, -1, 3);
        assert!(matches!(
            VoxelVolume::read_from(Cursor::new(data), u64::MAX),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn truncated_stream_rejected() {
        let mut data = header(2, 2, 2);
        data.extend([0x12; 5]);
        assert!(matches!(
            VoxelVolume::read_from(Cursor::new(data), u64::MAX),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            VoxelVolume::read_from(Cursor::new(vec![1, 0, 0]), u64::MAX),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn zero_dimension_rejected() {
        let data = header(2, 0, 3);
        assert!(matches!(
            VoxelVolume::read_from(Cursor::new(data), u64::MAX),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn oversized_volume_rejected_before_payload() {
        let data = header(1000, 1000, 1000);
        assert!(matches!(
            VoxelVolume::read_from(Cursor::new(data), 1 << 20),
            Err(Error::ResourceExhausted { .. })
        ));
    }

    #[test]
    fn write_then_read() {
        let bytes = [SOLID_BYTE, EXTERIOR_BYTE, EXTERIOR_BYTE].repeat(4);
        let volume = VoxelVolume::from_bytes(GridDims::new(2, 3, 2), bytes).unwrap();
        let mut encoded = Vec::new();
        volume.write_to(&mut encoded).unwrap();
        assert_eq!(encoded.len(), 12 + 12);
        assert_eq!(
            VoxelVolume::read_from(Cursor::new(encoded), u64::MAX).unwrap(),
            volume
        );
    }

    /// Voxelizer that only finds the shape in gapless mode.
    struct Fussy {
        requests: Vec<VoxelizeRequest>,
        always_empty: bool,
    }

    impl VoxelSource for Fussy {
        fn voxelize(&mut self, request: &VoxelizeRequest) -> Result<VoxelVolume> {
            self.requests.push(*request);
            let byte = if request.gapless && !self.always_empty {
                SOLID_BYTE
            } else {
                EXTERIOR_BYTE
            };
            VoxelVolume::from_bytes(GridDims::splat(2), vec![byte; 8])
        }
    }

    #[test]
    fn retries_once_gapless() {
        let mut source = Fussy {
            requests: Vec::new(),
            always_empty: false,
        };
        let volume = acquire_volume(&mut source, Some(8)).unwrap();
        assert!(volume.has_shape());
        assert_eq!(
            source.requests,
            vec![
                VoxelizeRequest {
                    resolution: Some(8),
                    gapless: false
                },
                VoxelizeRequest {
                    resolution: Some(8),
                    gapless: true
                },
            ]
        );
    }

    #[test]
    fn gives_up_after_retry() {
        let mut source = Fussy {
            requests: Vec::new(),
            always_empty: true,
        };
        let volume = acquire_volume(&mut source, None).unwrap();
        assert!(!volume.has_shape());
        assert_eq!(source.requests.len(), 2);
    }
}
