use crate::book::ContactBook;
use anyhow::Result;
use std::path::Path;

/// Display store and name index statistics
pub fn show_stats(book: &ContactBook) -> Result<()> {
    let store = book.store();
    let index = book.index_stats();

    println!("Contact Book Statistics");
    println!("=======================");
    println!();
    match store.path() {
        Some(path) => println!("Database:         {}", path.display()),
        None => println!("Database:         (in memory)"),
    }
    println!("Schema version:   {}", store.schema_version()?);
    println!("Persons:          {}", store.count_persons()?);
    println!("Groups:           {}", store.list_groups()?.len());

    println!();
    println!("Name index:");
    println!("  People indexed: {}", index.people);
    println!("  Tokens:         {}", index.tokens);

    // Database size, WAL included
    if let Some(path) = store.path() {
        let size = file_size(path) + file_size(&wal_path(path));
        println!();
        println!("Database size:    {}", format_size(size));
    }

    Ok(())
}

fn wal_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("-wal");
    name.into()
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_wal_path() {
        assert_eq!(
            wal_path(Path::new("/data/contacts.db")),
            Path::new("/data/contacts.db-wal")
        );
    }
}
