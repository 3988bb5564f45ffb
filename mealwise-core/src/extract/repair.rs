//! Single-pass structural repair for almost-JSON replies.

/// Repair minor structural defects in a JSON candidate.
///
/// Handles raw control characters inside strings, trailing and doubled
/// commas, unmatched closing brackets, and truncation (an unterminated
/// string, a dangling key, unclosed objects and arrays). The result is not
/// guaranteed to parse; callers re-parse and validate.
pub fn repair_json(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len() + 8);
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in candidate.chars() {
        if in_string {
            if escaped {
                out.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    out.push(c);
                    escaped = true;
                }
                '"' => {
                    out.push(c);
                    in_string = false;
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {}
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                closers.push('}');
                out.push(c);
            }
            '[' => {
                closers.push(']');
                out.push(c);
            }
            '}' | ']' => {
                strip_trailing_comma(&mut out);
                // An unmatched closer is a stray character
                if closers.last() == Some(&c) {
                    closers.pop();
                    out.push(c);
                }
            }
            ',' => {
                if !matches!(last_significant(&out), Some(',') | Some('{') | Some('[') | None) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    if escaped {
        out.pop();
    }
    if in_string {
        out.push('"');
    }
    finish_dangling_value(&mut out);

    while let Some(closer) = closers.pop() {
        strip_trailing_comma(&mut out);
        out.push(closer);
    }

    out
}

fn last_significant(out: &str) -> Option<char> {
    out.trim_end().chars().last()
}

fn strip_trailing_comma(out: &mut String) {
    let len = out.trim_end().len();
    if out[..len].ends_with(',') {
        out.truncate(len - 1);
    }
}

/// A reply cut off right after `"key":` gets a null value.
fn finish_dangling_value(out: &mut String) {
    let len = out.trim_end().len();
    if out[..len].ends_with(':') {
        out.truncate(len);
        out.push_str(" null");
    }
}
