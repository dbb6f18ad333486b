//! Debug dump of the central third of the depth buffer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::depth::DepthBuffer;

/// Write cells with `x` and `y` in `[dim / 3, 2 * dim / 3)`, one buffer row
/// per line. Unset cells print as `| |`, others as `|value|`.
pub fn write_depth_dump<W: Write>(depth: &DepthBuffer, out: &mut W) -> std::io::Result<()> {
    let (w, h) = (depth.width(), depth.height());
    for y in h / 3..2 * h / 3 {
        for x in w / 3..2 * w / 3 {
            match depth.get(x, y) {
                Some(v) if v.is_finite() => write!(out, "|{v}|")?,
                _ => write!(out, "| |")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Truncate `path` and write the dump into it.
pub fn dump_to_file(depth: &DepthBuffer, path: &Path) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_depth_dump(depth, &mut out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_covers_central_third() {
        let mut depth = DepthBuffer::new(6, 6);
        depth.test_and_set(2, 2, 0.5);
        depth.test_and_set(0, 0, 1.0); // outside the dumped region

        let mut out = Vec::new();
        write_depth_dump(&depth, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "|0.5|| |\n| || |\n");
    }

    #[test]
    fn test_dump_to_file() {
        let path = std::env::temp_dir().join(format!("zraster-dump-{}.txt", std::process::id()));
        let depth = DepthBuffer::new(3, 3);
        dump_to_file(&depth, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "| |\n");
        std::fs::remove_file(&path).unwrap();
    }
}
