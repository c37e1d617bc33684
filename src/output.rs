//! Terminal output for lookup results, persons and groups

use crate::index::types::LookupEntry;
use crate::query::NameQuery;
use crate::store::{Group, Person};
use crate::utils::fold_token;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print name lookup results, one per line, with the matched prefix of
/// each name part highlighted
pub fn print_lookup_entries(entries: &[LookupEntry], query: &NameQuery, color: bool) -> io::Result<()> {
    write_lookup_entries(&mut stdout(color), entries, query)
}

pub fn print_person(person: &Person, color: bool) -> io::Result<()> {
    write_person(&mut stdout(color), person)
}

/// Print persons as a short `id name` listing
pub fn print_persons(persons: &[Person], color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    for person in persons {
        write_id(&mut out, i64::from(person.id))?;
        writeln!(out, "{}", person.full_name())?;
    }
    Ok(())
}

pub fn print_groups(groups: &[Group], color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    for group in groups {
        write_id(&mut out, group.id)?;
        writeln!(out, "{}", group.name)?;
    }
    Ok(())
}

pub(crate) fn write_lookup_entries<W: WriteColor>(
    out: &mut W,
    entries: &[LookupEntry],
    query: &NameQuery,
) -> io::Result<()> {
    for entry in entries {
        write_id(out, i64::from(entry.id))?;
        write_highlighted_name(out, &entry.full_name, &query.words)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_id<W: WriteColor>(out: &mut W, id: i64) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{:>6}", id)?;
    out.reset()?;
    write!(out, "  ")
}

/// Write `name`, highlighting in each space-separated part the longest
/// prefix that some query word matches
fn write_highlighted_name<W: WriteColor>(out: &mut W, name: &str, words: &[String]) -> io::Result<()> {
    for (i, part) in name.split(' ').enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }

        let matched = words
            .iter()
            .filter_map(|word| matched_prefix_len(part, word))
            .max()
            .unwrap_or(0);

        if matched > 0 {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "{}", &part[..matched])?;
            out.reset()?;
        }
        write!(out, "{}", &part[matched..])?;
    }
    Ok(())
}

/// Byte length of the shortest prefix of `part` that folds to `word`.
/// Folding can change the length of a character, so prefixes are compared
/// after folding rather than by count.
fn matched_prefix_len(part: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let ends = part
        .char_indices()
        .map(|(i, ch)| i + ch.len_utf8());
    for end in ends {
        let folded = fold_token(&part[..end]);
        if folded == word {
            return Some(end);
        }
        if folded.len() >= word.len() {
            break;
        }
    }
    None
}

pub(crate) fn write_person<W: WriteColor>(out: &mut W, person: &Person) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    write!(out, "{}", person.full_name())?;
    out.reset()?;
    writeln!(out, " (#{})", person.id)?;

    section(out, "Phone numbers", person.phone_numbers.iter().map(|p| {
        (p.id, p.label.clone(), p.phone.clone())
    }))?;
    section(out, "Email addresses", person.email_addresses.iter().map(|e| {
        (e.id, e.label.clone(), e.email.clone())
    }))?;
    section(out, "Addresses", person.addresses.iter().map(|a| {
        (a.id, a.label.clone(), a.summary())
    }))?;
    section(out, "Groups", person.groups.iter().map(|g| (g.id, None, g.name.clone())))
}

fn section<W, I>(out: &mut W, title: &str, rows: I) -> io::Result<()>
where
    W: WriteColor,
    I: Iterator<Item = (i64, Option<String>, String)>,
{
    let mut rows = rows.peekable();
    if rows.peek().is_none() {
        return Ok(());
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    writeln!(out, "{}:", title)?;
    out.reset()?;

    for (id, label, text) in rows {
        write!(out, "  ")?;
        write_id(out, id)?;
        match label {
            Some(label) => writeln!(out, "{}: {}", label, text)?,
            None => writeln!(out, "{}", text)?,
        }
    }
    Ok(())
}
