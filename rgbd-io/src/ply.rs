//! ASCII PLY point-cloud writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rgbd_core::PointCloud;

use crate::Result;

/// Write the valid points of a cloud as an ASCII PLY file. Colors are
/// emitted as `uchar` RGB when the cloud carries them. Coordinates stay in
/// millimeters.
pub fn write_point_cloud<P: AsRef<Path>>(path: P, cloud: &PointCloud) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    let with_color = cloud.colors().is_some();

    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "element vertex {}", cloud.valid_count())?;
    writeln!(w, "property float x")?;
    writeln!(w, "property float y")?;
    writeln!(w, "property float z")?;
    if with_color {
        writeln!(w, "property uchar red")?;
        writeln!(w, "property uchar green")?;
        writeln!(w, "property uchar blue")?;
    }
    writeln!(w, "end_header")?;

    for (point, color) in cloud.valid_points() {
        if let Some([b, g, r, _a]) = color {
            writeln!(w, "{} {} {} {} {} {}", point.x, point.y, point.z, r, g, b)?;
        } else {
            writeln!(w, "{} {} {}", point.x, point.y, point.z)?;
        }
    }

    w.flush()?;
    Ok(())
}
