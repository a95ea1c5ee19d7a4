//! Wavefront OBJ export
//!
//! The renderable mesh is handed to an external renderer in-memory; for
//! offline use the same mesh can be written as an OBJ file (positions,
//! UVs, normals, faces, and optionally per-vertex colors using the
//! widespread `v x y z r g b` extension).

use crate::assemble::RenderMesh;
use relief_core::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a mesh as Wavefront OBJ.
///
/// `colors` must be index-aligned with the mesh vertices when present;
/// the alpha component is dropped (OBJ vertex colors are RGB).
pub fn write_obj<W: Write>(
    mesh: &RenderMesh,
    colors: Option<&[[f32; 4]]>,
    out: &mut W,
) -> Result<()> {
    debug_assert!(colors.map_or(true, |c| c.len() == mesh.num_vertices()));

    writeln!(out, "# relief terrain mesh")?;
    writeln!(
        out,
        "# {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    )?;

    for (i, p) in mesh.positions.iter().enumerate() {
        match colors {
            Some(colors) => {
                let c = colors[i];
                writeln!(
                    out,
                    "v {:.6} {:.6} {:.6} {:.4} {:.4} {:.4}",
                    p[0], p[1], p[2], c[0], c[1], c[2]
                )?;
            }
            None => writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?,
        }
    }
    for uv in &mesh.uvs {
        writeln!(out, "vt {:.6} {:.6}", uv[0], uv[1])?;
    }
    for n in &mesh.normals {
        writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        // OBJ indices are 1-based; position/uv/normal lists are aligned
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }

    Ok(())
}

/// Write a mesh to an OBJ file at `path`.
pub fn write_obj_file<P: AsRef<Path>>(
    mesh: &RenderMesh,
    colors: Option<&[[f32; 4]]>,
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, colors, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_mesh() -> RenderMesh {
        RenderMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.5]],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn obj_structure() {
        let mut out = Vec::new();
        write_obj(&tiny_mesh(), None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 1);
        assert!(text.contains("f 1/1/1 2/2/2 3/3/3"));
    }

    #[test]
    fn obj_vertex_colors() {
        let colors = vec![[1.0, 0.5, 0.0, 1.0]; 3];
        let mut out = Vec::new();
        write_obj(&tiny_mesh(), Some(&colors), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let v_line = text.lines().find(|l| l.starts_with("v ")).unwrap();
        // x y z r g b
        assert_eq!(v_line.split_whitespace().count(), 7);
        assert!(v_line.ends_with("1.0000 0.5000 0.0000"));
    }
}
