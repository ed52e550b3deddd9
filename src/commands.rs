//! CLI command implementations
//!
//! Each command takes the loaded configuration plus its own arguments and
//! writes user-facing output to the writer it is given.

use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use gcodeobj_core::{ExtractMode, ObjCodec};
use gcodeobj_host::{AppState, ObjQueryService, SharedJobState};
use gcodeobj_mesh::{inject_mesh, ObjMesh, StlToObj};
use gcodeobj_settings::Config;
use tracing::info;

fn codec(config: &Config) -> Result<ObjCodec> {
    ObjCodec::new(config.marker.clone()).context("Invalid marker configuration")
}

/// Append the OBJ file to the gcode file
pub fn embed(config: &Config, obj: &Path, gcode: &Path, out: &mut impl Write) -> Result<usize> {
    let written = codec(config)?.embed_file(obj, gcode)?;
    writeln!(out, "Embedded {} lines into {}", written, gcode.display())?;
    Ok(written)
}

/// Extract the embedded OBJ
///
/// Inline mode writes the OBJ text to `out` unless `output` names a file;
/// derived-file mode writes next to the gcode file.
pub fn extract(
    config: &Config,
    gcode: &Path,
    mode: ExtractMode,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let codec = codec(config)?;

    match (mode, output) {
        (_, Some(output)) => {
            let derived = codec.extract_to(gcode, output)?;
            writeln!(out, "Wrote {} lines to {}", derived.tagged_lines, derived.path.display())?;
        }
        (ExtractMode::DerivedFile, None) => {
            let derived = codec.extract_to_derived(gcode)?;
            writeln!(out, "Wrote {} lines to {}", derived.tagged_lines, derived.path.display())?;
        }
        (ExtractMode::Inline, None) => {
            let text = codec.extract_obj(gcode)?;
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }

    Ok(())
}

fn prompt_path(label: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<PathBuf> {
    write!(out, "{}: ", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("No {} given", label);
    }

    let answer = line.trim();
    if answer.is_empty() {
        bail!("No {} given", label);
    }
    Ok(PathBuf::from(answer))
}

/// Convert an STL file and inject it into a gcode file
///
/// Paths not given as arguments are prompted for on `input`.
pub fn inject(
    config: &Config,
    stl: Option<PathBuf>,
    gcode: Option<PathBuf>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let stl = match stl {
        Some(path) => path,
        None => prompt_path("name of stl file", input, out)?,
    };
    let gcode = match gcode {
        Some(path) => path,
        None => prompt_path("name of gcode file", input, out)?,
    };

    let report = inject_mesh(&StlToObj::new(), &codec(config)?, &stl, &gcode)
        .with_context(|| format!("Failed to inject {} into {}", stl.display(), gcode.display()))?;

    info!(
        "{} vertices, {} faces, {} lines embedded",
        report.conversion.vertices, report.conversion.faces, report.lines_embedded
    );
    writeln!(out, "Injected obj into gcode")?;
    Ok(())
}

/// Describe the mesh in an OBJ file or embedded in a gcode file
pub fn inspect(config: &Config, file: &Path, out: &mut impl Write) -> Result<ObjMesh> {
    let is_obj = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));

    let text = if is_obj {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?
    } else {
        let extraction = codec(config)?.extract_file(file)?;
        writeln!(
            out,
            "Tagged lines: {} of {}",
            extraction.tagged_lines, extraction.lines_scanned
        )?;
        extraction.into_payload()?
    };

    let mesh = ObjMesh::parse(&text)?;
    writeln!(out, "Name: {}", mesh.name.as_deref().unwrap_or("(unnamed)"))?;
    writeln!(out, "Vertices: {}", mesh.vertices.len())?;
    writeln!(out, "Triangles: {}", mesh.triangle_count())?;
    if let Some((min, max)) = mesh.bounds() {
        writeln!(
            out,
            "Bounds: [{}, {}, {}] - [{}, {}, {}]",
            min[0], min[1], min[2], max[0], max[1], max[2]
        )?;
    }
    Ok(mesh)
}

/// Run the HTTP server until Ctrl-C
pub async fn serve(config: &Config, bind: Option<&str>) -> Result<()> {
    let addr: SocketAddr = match bind {
        Some(bind) => bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", bind))?,
        None => config.server.bind_addr()?,
    };

    let jobs = SharedJobState::default();
    let service = ObjQueryService::from_config(config, Arc::new(jobs.clone()))?;
    info!(
        "Serving meshes from {} ({} mode)",
        config.host.uploads_folder().display(),
        service.mode()
    );

    let state = AppState {
        service: Arc::new(service),
        jobs,
        build_date: crate::BUILD_DATE,
    };

    gcodeobj_host::serve(addr, state)
        .await
        .with_context(|| format!("HTTP server on {} failed", addr))
}
