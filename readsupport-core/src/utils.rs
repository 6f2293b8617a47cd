use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::consts::STDIN_PATH;

///
/// Get a reader for a payload path: `-` reads standard input, a `.gz` suffix is
/// decompressed on the fly, anything else is read as plain text.
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path.as_os_str() == STDIN_PATH {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path).map_err(|err| {
        io::Error::new(err.kind(), format!("{}: {}", path.display(), err))
    })?;

    let is_gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let reader: Box<dyn BufRead> = if is_gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Read, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_reads_plain_and_gzipped_files() {
        let dir = tempdir().unwrap();

        let plain = dir.path().join("request.json");
        std::fs::write(&plain, b"{\"reads\": []}").unwrap();

        let gz = dir.path().join("request.json.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(b"{\"reads\": []}").unwrap();
        encoder.finish().unwrap();

        for path in [plain, gz] {
            let mut content = String::new();
            get_dynamic_reader(&path)
                .unwrap()
                .read_to_string(&mut content)
                .unwrap();
            assert_eq!(content, "{\"reads\": []}");
        }
    }

    #[rstest]
    fn test_missing_file_names_the_path() {
        let err = get_dynamic_reader(Path::new("/nonexistent/request.json"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/request.json"));
    }
}
