//! Archive inspector: read a scene archive and print its tree plus any
//! notifications the read produced.

use anyhow::{bail, Context};

use milorust::{DirectoryMeta, Entry, MiloFile};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: inspect <archive.milo> [...]");
    }

    for path in &args {
        let file = MiloFile::from_file(path).with_context(|| format!("reading {path}"))?;
        println!(
            "{path}: {} stream, block storage {:?}",
            file.endian, file.compression
        );
        print_dir(&file.dir, 1);

        if !file.notifications.is_empty() {
            println!("  {} notification(s):", file.notifications.len());
            for note in &file.notifications {
                println!("    {note}");
            }
        }
    }

    Ok(())
}

fn print_dir(dir: &DirectoryMeta, depth: usize) {
    let pad = "  ".repeat(depth);
    println!(
        "{pad}{} <{}> rev {} ({} entries)",
        dir.name,
        dir.dir_type,
        dir.revision,
        dir.entries.len()
    );
    for entry in &dir.entries {
        print_entry(entry, depth + 1);
    }
    for (index, sub) in dir.inline_sub_dirs.iter().enumerate() {
        let filename = dir
            .inline_sub_dir_names
            .get(index)
            .map(|s| s.as_str())
            .unwrap_or("?");
        println!("{pad}  [inline {filename}]");
        print_dir(sub, depth + 2);
    }
}

fn print_entry(entry: &Entry, depth: usize) {
    let pad = "  ".repeat(depth);
    let state = if entry.is_proxy {
        "proxy"
    } else if entry.is_resolved() {
        "parsed"
    } else {
        "opaque"
    };
    println!(
        "{pad}{} <{}> {} ({} bytes)",
        entry.name,
        entry.entry_type,
        state,
        entry.obj_bytes.len()
    );
    if let Some(dir) = &entry.dir {
        print_dir(dir, depth + 1);
    }
}
