use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read as _, Write as _},
    path::Path,
};

use crate::network::NTupleNetwork;

/// Failure while reading or writing a weight file.
///
/// These are configuration errors: a network that cannot restore its weights
/// must not keep running, so callers surface them as fatal rather than
/// recovering partially.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum WeightFileError {
    #[display("weight file I/O failed: {_0}")]
    #[from]
    Io(io::Error),
    #[display("weight file holds {found} tables, network expects {expected}")]
    TableCountMismatch { expected: usize, found: usize },
    #[display("weight file has trailing bytes after the last table")]
    TrailingData,
}

/// Writes every table of `network` to `path`.
///
/// Layout: a little-endian `u32` table count, then each table's raw `f32`
/// weight sequence in network order. Table lengths are implied by the
/// network's tuple patterns and are not stored.
pub fn save<P>(network: &NTupleNetwork, path: P) -> Result<(), WeightFileError>
where
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let count = u32::try_from(network.tables().len()).expect("table count fits in u32");
    writer.write_all(&count.to_le_bytes())?;
    for table in network.tables() {
        for &weight in table.as_slice() {
            writer.write_all(&weight.to_le_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Restores every table of `network` from `path`.
///
/// The stored table count must match the network's pattern count and the
/// file must contain exactly the implied number of weights; a short file
/// surfaces as an I/O error and surplus bytes as
/// [`WeightFileError::TrailingData`]. On error the network's tables are left
/// in an unspecified partially-read state, which is fine because callers
/// treat any load failure as fatal.
pub fn load<P>(network: &mut NTupleNetwork, path: P) -> Result<(), WeightFileError>
where
    P: AsRef<Path>,
{
    let mut reader = BufReader::new(File::open(path)?);

    let mut count_bytes = [0; 4];
    reader.read_exact(&mut count_bytes)?;
    let found = usize::try_from(u32::from_le_bytes(count_bytes)).expect("u32 fits in usize");
    let expected = network.tables().len();
    if found != expected {
        return Err(WeightFileError::TableCountMismatch { expected, found });
    }

    let mut weight_bytes = [0; 4];
    for table in network.tables_mut() {
        for weight in table.as_mut_slice() {
            reader.read_exact(&mut weight_bytes)?;
            *weight = f32::from_le_bytes(weight_bytes);
        }
    }

    if reader.read(&mut [0])? != 0 {
        return Err(WeightFileError::TrailingData);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, iter, path::PathBuf};

    use crate::pattern::TuplePattern;

    use super::*;

    fn small_network() -> NTupleNetwork {
        NTupleNetwork::with_patterns(vec![
            TuplePattern::new(&[0, 1]),
            TuplePattern::new(&[2, 3, 7]),
        ])
    }

    fn scratch_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("tilefuse-persist-{name}-{}", std::process::id()))
    }

    #[test]
    fn test_save_load_roundtrip_is_bit_exact() {
        let mut network = small_network();
        for (i, table) in network.tables_mut().iter_mut().enumerate() {
            for (j, weight) in table.as_mut_slice().iter_mut().enumerate() {
                #[expect(clippy::cast_precision_loss)]
                {
                    *weight = (i * 1000 + j) as f32 * 0.125 - 3.5;
                }
            }
        }

        let path = scratch_path("roundtrip");
        save(&network, &path).unwrap();

        let mut restored = small_network();
        load(&mut restored, &path).unwrap();
        fs::remove_file(&path).unwrap();

        for (a, b) in iter::zip(network.tables(), restored.tables()) {
            for (x, y) in iter::zip(a.as_slice(), b.as_slice()) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }
    }

    #[test]
    fn test_zeroed_network_roundtrips() {
        let network = small_network();
        let path = scratch_path("zeroed");
        save(&network, &path).unwrap();

        let mut restored = small_network();
        restored.tables_mut()[0].accumulate(0, 9.0);
        load(&mut restored, &path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(restored.tables()[0].get(0), 0.0);
    }

    #[test]
    fn test_table_count_mismatch_is_rejected() {
        let network = small_network();
        let path = scratch_path("count-mismatch");
        save(&network, &path).unwrap();

        let mut other = NTupleNetwork::with_patterns(vec![TuplePattern::new(&[0, 1])]);
        let result = load(&mut other, &path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(WeightFileError::TableCountMismatch {
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let network = small_network();
        let path = scratch_path("truncated");
        save(&network, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

        let mut restored = small_network();
        let result = load(&mut restored, &path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(WeightFileError::Io(_))));
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let network = small_network();
        let path = scratch_path("trailing");
        save(&network, &path).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        fs::write(&path, &bytes).unwrap();

        let mut restored = small_network();
        let result = load(&mut restored, &path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(WeightFileError::TrailingData)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let mut network = small_network();
        let result = load(&mut network, scratch_path("does-not-exist"));
        assert!(matches!(result, Err(WeightFileError::Io(_))));
    }
}
