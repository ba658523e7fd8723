use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use anyhow::{bail, Context, Result};
use obj::{load_obj, Obj, Position};

use slicer::{
    mesh::{Mesh, Triangle},
    Pos,
};

/// Loads a triangle mesh from disk. Supported formats are `.stl` and
/// `.obj`; the format is chosen by file extension.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    match extension.as_str() {
        "stl" => load_stl(reader),
        "obj" => load_obj_mesh(reader),
        other => bail!("unsupported mesh format `{other}`"),
    }
}

fn load_stl(mut reader: impl Read + Seek) -> Result<Mesh> {
    let stl = stl_io::read_stl(&mut reader).context("parsing stl")?;

    let triangles = stl
        .faces
        .iter()
        .map(|face| {
            let vertices = face.vertices.map(|i| {
                let v = stl.vertices[i];
                Pos::new(v[0], v[1], v[2])
            });

            let n = face.normal;
            Triangle::with_normal(vertices, Pos::new(n[0], n[1], n[2]))
        })
        .collect();

    Ok(Mesh::new(triangles))
}

fn load_obj_mesh(reader: impl std::io::BufRead) -> Result<Mesh> {
    let model: Obj<Position, u32> = load_obj(reader).context("parsing obj")?;

    let position = |index: u32| {
        let p = model.vertices[index as usize].position;
        Pos::new(p[0], p[1], p[2])
    };

    let triangles = model
        .indices
        .chunks_exact(3)
        .map(|face| Triangle::new([position(face[0]), position(face[1]), position(face[2])]))
        .collect();

    Ok(Mesh::new(triangles))
}
