use crate::parse::{ParsedName, parse_filename};

/// Two-phase fuzzy matcher for queries like "show s03e03" or "avatar 2009
/// 1080p".
///
/// Phase 1 tokenizes the normalized query and requires every token in the
/// normalized filename; short tokens (<= 2 chars) additionally need a word
/// boundary on at least one side. Phase 2 falls back to plain substring
/// matching against a text synthesized from the parsed fields, which lets
/// "s3" match a file marked "S03".
pub fn smart_search(filename: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let name = normalize(filename);
    let query = normalize(query);
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return true;
    }

    let all_found = tokens.iter().all(|t| {
        if t.chars().count() > 2 {
            name.contains(t)
        } else {
            boundary_match(&name, t)
        }
    });
    if all_found {
        return true;
    }

    let parsed = parse_filename(filename);
    let searchable = searchable_text(&parsed);
    tokens.iter().all(|t| searchable.contains(t))
}

/// Lowercase, separator characters to spaces, whitespace runs collapsed.
fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_ws = false;
    for c in s.to_lowercase().chars() {
        let c = if matches!(c, '.' | '_' | '-') { ' ' } else { c };
        if c.is_whitespace() {
            if !last_ws {
                out.push(' ');
            }
            last_ws = true;
        } else {
            out.push(c);
            last_ws = false;
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Does `needle` occur in `haystack` with a word boundary on either side?
/// String edges count as boundaries.
fn boundary_match(haystack: &str, needle: &str) -> bool {
    for (idx, matched) in haystack.match_indices(needle) {
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = haystack[idx + matched.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        if before_ok || after_ok {
            return true;
        }
    }
    false
}

/// Space-joined lowercase rendition of the parsed fields, including padded
/// and unpadded season/episode forms.
fn searchable_text(parsed: &ParsedName) -> String {
    let mut parts: Vec<String> = vec![parsed.title.clone()];

    if let Some(year) = parsed.year {
        parts.push(year.to_string());
    }
    if let Some(season) = parsed.season {
        parts.push(format!("s{season}"));
        parts.push(format!("s{season:02}"));
    }
    if let Some(episode) = parsed.episode {
        parts.push(format!("e{episode}"));
        parts.push(format!("e{episode:02}"));
    }
    for field in [
        &parsed.episode_title,
        &parsed.resolution,
        &parsed.source,
        &parsed.codec,
        &parsed.group,
    ] {
        if let Some(value) = field {
            parts.push(value.clone());
        }
    }

    parts.retain(|p| !p.is_empty());
    parts.join(" ").to_lowercase()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
