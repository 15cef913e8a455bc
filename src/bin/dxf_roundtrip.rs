//! Read a DXF file, report what was decoded, and write it back out,
//! optionally at another release.
//!
//! Usage: dxf-roundtrip <input.dxf> <output.dxf> [AC10xx]
//!
//! Set RUST_LOG=dxf_entity_codec=debug to trace every record.

use anyhow::{bail, Context, Result};
use dxf_entity_codec::io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter};
use dxf_entity_codec::notification::TracingSink;
use dxf_entity_codec::DxfVersion;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = match args.as_slice() {
        [input, output, ..] => (input, output),
        _ => bail!("usage: dxf-roundtrip <input.dxf> <output.dxf> [AC10xx]"),
    };
    let target = args.get(2).map(|v| DxfVersion::parse(v)).transpose()?;

    let config = DxfReaderConfiguration::default().with_failsafe(true);
    let mut document = DxfReader::from_file(input)
        .with_context(|| format!("opening {}", input))?
        .with_configuration(config)
        .read()
        .with_context(|| format!("reading {}", input))?;

    println!("Read {} ({})", input, document.version);
    for (section, chains) in [
        ("TABLES", &document.tables),
        ("ENTITIES", &document.entities),
        ("OBJECTS", &document.objects),
    ] {
        for chain in chains.iter() {
            println!("  {:<9} {:<12} {:>6}", section, chain.entity_type(), chain.len());
        }
    }

    if !document.notifications.is_empty() {
        println!("{} diagnostics", document.notifications.len());
        document.notifications.forward_to(&mut TracingSink);
    }

    if let Some(version) = target {
        document.version = version;
    }
    let written_version = document.version;
    DxfWriter::new(document)
        .write_to_file(output)
        .with_context(|| format!("writing {}", output))?;
    println!("Wrote {} ({})", output, written_version);
    Ok(())
}
