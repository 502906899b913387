use pde_types::MDIndex;
use std::fmt::Write as _;
use std::io;

/// Write marker points as VTK XML PolyData, for visual debugging of the
/// AMR partitioning pass. Gated behind a `debug` flag by the caller,
/// mirroring the original's `#ifndef NDEBUG` guard on `dump_points`.
pub fn dump_points<const D: usize>(points: &[MDIndex<D>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0"?>"#);
    let _ = writeln!(
        out,
        r#"<VTKFile type="PolyData" version="0.1" byte_order="LittleEndian">"#
    );
    let _ = writeln!(out, "  <PolyData>");
    let _ = writeln!(
        out,
        r#"    <Piece NumberOfPoints="{}" NumberOfVerts="{}">"#,
        points.len(),
        points.len()
    );
    let _ = writeln!(out, "      <Points>");
    let _ = writeln!(
        out,
        r#"        <DataArray type="Float64" NumberOfComponents="3" format="ascii">"#
    );
    for p in points {
        let c = p.as_slice();
        let x = c.first().copied().unwrap_or(0);
        let y = c.get(1).copied().unwrap_or(0);
        let z = c.get(2).copied().unwrap_or(0);
        let _ = writeln!(out, "          {x} {y} {z}");
    }
    let _ = writeln!(out, "        </DataArray>");
    let _ = writeln!(out, "      </Points>");
    let _ = writeln!(out, "      <Verts>");
    let _ = writeln!(
        out,
        r#"        <DataArray type="Int64" Name="connectivity" format="ascii">"#
    );
    for i in 0..points.len() {
        let _ = writeln!(out, "          {i}");
    }
    let _ = writeln!(out, "        </DataArray>");
    let _ = writeln!(
        out,
        r#"        <DataArray type="Int64" Name="offsets" format="ascii">"#
    );
    for i in 1..=points.len() {
        let _ = writeln!(out, "          {i}");
    }
    let _ = writeln!(out, "        </DataArray>");
    let _ = writeln!(out, "      </Verts>");
    let _ = writeln!(out, "    </Piece>");
    let _ = writeln!(out, "  </PolyData>");
    let _ = writeln!(out, "</VTKFile>");
    out
}

pub fn dump_points_to<const D: usize>(points: &[MDIndex<D>], mut w: impl io::Write) -> io::Result<()> {
    w.write_all(dump_points(points).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_is_well_formed_xml_header() {
        let pts = vec![MDIndex::<2>::new([1, 2]), MDIndex::new([3, 4])];
        let xml = dump_points(&pts);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("NumberOfPoints=\"2\""));
    }
}
