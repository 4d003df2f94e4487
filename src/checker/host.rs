// src/checker/host.rs
// =============================================================================
// Pulls the host out of whatever the user typed.
//
// Users type all sorts of things:
//   https://example.com/about   -> example.com
//   example.com                 -> example.com
//   example.com/blog?page=2     -> example.com
//   //cdn.example.com/x.js      -> cdn.example.com
//   localhost:8080              -> localhost:8080
//
// Rules:
// 1. A "scheme:" prefix is only stripped when "//" follows it, so that
//    "localhost:8080" is not mistaken for a URL with scheme "localhost"
// 2. After "//" comes the network location, up to the first '/', '?' or '#'
// 3. With no network location we fall back to the first path segment
//
// This is a pure function: no I/O, same input -> same output.
// =============================================================================

// Characters that end the network location or the first path segment
const DELIMITERS: &[char] = &['/', '?', '#'];

// Returns the host part of a target
//
// Never fails: if there is nothing usable the result is "" and the
// probe reports the attempts as invalid URLs.
pub fn extract_host(target: &str) -> &str {
    let rest = strip_scheme(target.trim());

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let netloc = first_segment(after_slashes);
        if !netloc.is_empty() {
            return netloc;
        }
        // "http:///path" has an empty network location; the path that
        // follows starts with '/', so its first segment is empty as well
        return first_segment(&after_slashes[netloc.len()..]);
    }

    first_segment(rest)
}

// Removes "scheme:" when it is followed by "//"
fn strip_scheme(target: &str) -> &str {
    let Some(colon) = target.find(':') else {
        return target;
    };

    let (scheme, rest) = (&target[..colon], &target[colon + 1..]);
    if is_scheme(scheme) && rest.starts_with("//") {
        rest
    } else {
        target
    }
}

// A scheme is a letter followed by letters, digits, '+', '-' or '.'
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn first_segment(text: &str) -> &str {
    match text.find(DELIMITERS) {
        Some(end) => &text[..end],
        None => text,
    }
}
