//! Template identity and rendering
//!
//! Errors built from the same template are the same kind of error no matter
//! which arguments were substituted, so identity is a hash of the template,
//! never of the rendered message.

use std::fmt::{self, Write};
use twox_hash::XxHash32;

const SEED: u32 = 0;

/// Hashes a message template into an error identity.
///
/// Total over all strings. Two different templates may collide; comparing
/// kinds as well keeps the false-positive rate low enough to accept.
pub fn identity(template: &str) -> u32 {
    XxHash32::oneshot(SEED, template.as_bytes())
}

/// Renders `template`, substituting each `{}` with the next argument.
///
/// `{{` and `}}` produce literal braces. A placeholder without a matching
/// argument is kept verbatim and surplus arguments are ignored, so rendering
/// never fails.
pub fn render(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('{', Some('{')) | ('}', Some('}')) => {
                chars.next();
                out.push(c);
            }
            ('{', Some('}')) => {
                chars.next();
                match args.next() {
                    // Writing into a String cannot fail.
                    Some(arg) => {
                        let _ = write!(out, "{arg}");
                    }
                    None => out.push_str("{}"),
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_stable() {
        assert_eq!(identity("user {} not found"), identity("user {} not found"));
        assert_ne!(identity("user {} not found"), identity("group {} not found"));
        assert_eq!(identity(""), identity(""));
    }

    #[test]
    fn test_render_substitutes_in_order() {
        let id = 42;
        assert_eq!(render("user {} in {}", &[&id, &"eu-west"]), "user 42 in eu-west");
    }

    #[test]
    fn test_render_escapes() {
        assert_eq!(render("{{}} and {{{}}}", &[&"x"]), "{} and {x}");
    }

    #[test]
    fn test_render_missing_and_surplus_args() {
        assert_eq!(render("{} and {}", &[&1]), "1 and {}");
        assert_eq!(render("no placeholders", &[&1, &2]), "no placeholders");
        assert_eq!(render("dangling { brace }", &[]), "dangling { brace }");
    }
}
