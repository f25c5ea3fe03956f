use regex::Captures;

/// Expand a replacement template for one match, appending to `dst`.
///
/// Recognized references:
///
/// | Template | Inserts |
/// |----------|---------|
/// | `$$` | a literal `$` |
/// | `$&` | the whole match |
/// | `` $` `` | text before the match |
/// | `$'` | text after the match |
/// | `$1`..`$99` | capture group by index |
/// | `$<name>` | named capture group |
///
/// A two-digit index is used only when that many groups exist; otherwise
/// the second digit is literal text. A reference to a group the pattern does
/// not have is copied through unchanged, and an unmatched group inserts
/// nothing. `$<name>` is only a reference when `named_groups` is set, i.e.
/// the pattern declares at least one named group; an unknown name then
/// inserts nothing.
pub fn expand_template(
    template: &str,
    caps: &Captures<'_>,
    haystack: &str,
    named_groups: bool,
    dst: &mut String,
) {
    let group_count = caps.len() - 1;
    let whole = caps.get(0);
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let Some(offset) = template[i..].find('$') else {
            dst.push_str(&template[i..]);
            break;
        };
        dst.push_str(&template[i..i + offset]);
        i += offset;

        let next = bytes.get(i + 1).copied();
        match next {
            Some(b'$') => {
                dst.push('$');
                i += 2;
            }
            Some(b'&') => {
                if let Some(m) = whole {
                    dst.push_str(m.as_str());
                }
                i += 2;
            }
            Some(b'`') => {
                if let Some(m) = whole {
                    dst.push_str(&haystack[..m.start()]);
                }
                i += 2;
            }
            Some(b'\'') => {
                if let Some(m) = whole {
                    dst.push_str(&haystack[m.end()..]);
                }
                i += 2;
            }
            Some(d) if d.is_ascii_digit() => {
                let first = usize::from(d - b'0');
                let second = bytes
                    .get(i + 2)
                    .filter(|b| b.is_ascii_digit())
                    .map(|b| usize::from(b - b'0'));

                let two_digit = second
                    .map(|s| first * 10 + s)
                    .filter(|&n| n >= 1 && n <= group_count);

                if let Some(index) = two_digit {
                    push_group(caps, index, dst);
                    i += 3;
                } else if first >= 1 && first <= group_count {
                    push_group(caps, first, dst);
                    i += 2;
                } else {
                    dst.push('$');
                    i += 1;
                }
            }
            Some(b'<') if named_groups => match template[i + 2..].find('>') {
                Some(end) => {
                    let name = &template[i + 2..i + 2 + end];
                    if let Some(m) = caps.name(name) {
                        dst.push_str(m.as_str());
                    }
                    i += end + 3;
                }
                None => {
                    dst.push('$');
                    i += 1;
                }
            },
            _ => {
                dst.push('$');
                i += 1;
            }
        }
    }
}

fn push_group(caps: &Captures<'_>, index: usize, dst: &mut String) {
    if let Some(m) = caps.get(index) {
        dst.push_str(m.as_str());
    }
}
